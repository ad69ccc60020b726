use std::time::Duration;

use reqwest::StatusCode;

use crate::spotify_rs::types::{SpotifyPage, SpotifyPlaylist, SpotifyPlaylistItem, SpotifyTrack};

const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum GetPlaylistError {
    #[error("Playlist not found: {playlist_id}")]
    NotFound { playlist_id: String },
    #[error("Spotify API returned {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error("Failed to send http request: {0}")]
    Request(#[from] reqwest::Error),
}

/// A playlist with every page of its tracks collected.
#[derive(Debug, Clone)]
pub struct FullPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Playlist order; removed tracks are already dropped
    pub tracks: Vec<SpotifyTrack>,
}

/// Spotify API client
pub struct SpotifyClient {
    access_token: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl SpotifyClient {
    pub fn new(access_token: String, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            access_token,
            client,
            timeout,
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(url)
            .bearer_auth(&self.access_token)
            .timeout(self.timeout)
            .send()
            .await
    }

    /// Get a playlist and all of its tracks
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<FullPlaylist, GetPlaylistError> {
        let url = format!(
            "{}/playlists/{}",
            SPOTIFY_API_URL,
            urlencoding::encode(playlist_id)
        );
        let response = self.get(&url).await?;

        let status = response.status();
        // Spotify answers 400 for malformed ids and 404 for unknown ones
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(GetPlaylistError::NotFound {
                playlist_id: playlist_id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(GetPlaylistError::Status {
                status: status.as_u16(),
                reason: response.text().await.unwrap_or_default(),
            });
        }

        let playlist: SpotifyPlaylist = response.json().await?;
        tracing::debug!(
            "Fetched spotify playlist '{}' ({} tracks)",
            playlist.name,
            playlist.tracks.total
        );

        let mut tracks = collect_tracks(playlist.tracks.items);
        let mut next_url = playlist.tracks.next;
        while let Some(url) = next_url {
            let response = self.get(&url).await?.error_for_status()?;
            let page: SpotifyPage<SpotifyPlaylistItem> = response.json().await?;
            tracks.extend(collect_tracks(page.items));
            next_url = page.next;
        }

        Ok(FullPlaylist {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            tracks,
        })
    }
}

fn collect_tracks(items: Vec<SpotifyPlaylistItem>) -> Vec<SpotifyTrack> {
    items.into_iter().filter_map(|item| item.track).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_response_parses_and_skips_removed_tracks() {
        let body = r#"{
            "id": "37i9dQZF1DXcBWIGoYBM5M",
            "name": "Today's Top Hits",
            "description": null,
            "tracks": {
                "total": 3,
                "next": "https://api.spotify.com/v1/playlists/37i9dQZF1DXcBWIGoYBM5M/tracks?offset=100&limit=100",
                "items": [
                    {"track": {"id": "1", "name": "I Don't Care", "artists": [
                        {"id": "a", "name": "Ed Sheeran"},
                        {"id": "b", "name": "Justin Bieber"}
                    ]}},
                    {"track": null},
                    {"track": {"id": null, "name": "Local Demo", "artists": [{"id": null, "name": "Me"}]}}
                ]
            }
        }"#;

        let playlist: SpotifyPlaylist = serde_json::from_str(body).unwrap();
        assert!(playlist.tracks.next.is_some());

        let tracks = collect_tracks(playlist.tracks.items);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].artists[1].name, "Justin Bieber");
        assert_eq!(tracks[1].name, "Local Demo");
    }
}
