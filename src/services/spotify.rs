use std::time::Duration;

use crate::ports::spotify::{CatalogError, SourceCatalog};
use crate::spotify_rs::auth::request_client_credentials_token;
use crate::spotify_rs::client::{FullPlaylist, GetPlaylistError, SpotifyClient};
use crate::track_identity::{Playlist, TrackIdentity};

#[derive(Debug, Clone)]
pub struct SpotifyApiCredentials {
    client_id: String,
    client_secret: String,
}

impl SpotifyApiCredentials {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }
}

/// Source catalog backed by the Spotify Web API, authenticated as the app itself.
pub struct SpotifyCatalog {
    credentials: SpotifyApiCredentials,
    client: reqwest::Client,
    timeout: Duration,
}

impl SpotifyCatalog {
    pub fn new(credentials: SpotifyApiCredentials, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            credentials,
            client,
            timeout,
        }
    }
}

fn into_playlist(playlist: FullPlaylist) -> Playlist {
    let tracks = playlist
        .tracks
        .into_iter()
        .map(|track| {
            TrackIdentity::new(
                track.name,
                track.artists.into_iter().map(|artist| artist.name),
            )
        })
        .collect();

    Playlist {
        name: playlist.name,
        description: playlist.description.unwrap_or_default(),
        tracks,
    }
}

#[async_trait::async_trait]
impl SourceCatalog for SpotifyCatalog {
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError> {
        let token = request_client_credentials_token(
            &self.client,
            &self.credentials.client_id,
            &self.credentials.client_secret,
            self.timeout,
        )
        .await
        .map_err(|error| CatalogError::Request(error.to_string()))?;
        tracing::debug!(
            "Got spotify {} token valid for {}s",
            token.token_type,
            token.expires_in
        );

        let client = SpotifyClient::new(token.access_token, self.client.clone(), self.timeout);
        let playlist = client
            .get_playlist(playlist_id)
            .await
            .map_err(|error| match error {
                GetPlaylistError::NotFound { playlist_id } => {
                    CatalogError::InvalidPlaylistId(playlist_id)
                }
                other => CatalogError::Request(other.to_string()),
            })?;

        tracing::info!(
            "Fetched spotify playlist '{}' ({}) with {} tracks",
            playlist.name,
            playlist.id,
            playlist.tracks.len()
        );
        Ok(into_playlist(playlist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify_rs::types::{SpotifyArtist, SpotifyTrack};

    fn spotify_track(name: &str, artists: &[&str]) -> SpotifyTrack {
        SpotifyTrack {
            id: Some(format!("id-{}", name)),
            name: name.to_string(),
            artists: artists
                .iter()
                .map(|artist| SpotifyArtist {
                    id: None,
                    name: artist.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_into_playlist_keeps_order_and_credits() {
        let playlist = into_playlist(FullPlaylist {
            id: "pl1".into(),
            name: "Road Trip".into(),
            description: None,
            tracks: vec![
                spotify_track("I Don't Care", &["Ed Sheeran", "Justin Bieber"]),
                spotify_track("Perfect", &["Ed Sheeran"]),
            ],
        });

        assert_eq!(playlist.name, "Road Trip");
        assert_eq!(playlist.description, "");
        assert_eq!(
            playlist.tracks,
            vec![
                TrackIdentity::new("I Don't Care", ["Ed Sheeran", "Justin Bieber"]),
                TrackIdentity::new("Perfect", ["Ed Sheeran"]),
            ]
        );
    }
}
