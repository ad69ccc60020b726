use std::time::Duration;

use crate::ports::youtube::{RemoteError, RemotePlaylists, ResolveError, VideoResolver};
use crate::track_identity::TrackIdentity;
use crate::youtube_rs::client::{YoutubeApiError, YoutubeClient};
use crate::youtube_rs::search::{SearchError, search_video_id};
use crate::youtube_rs::types::PrivacyStatus;

impl From<YoutubeApiError> for RemoteError {
    fn from(error: YoutubeApiError) -> Self {
        match error {
            YoutubeApiError::QuotaExceeded { message } => {
                tracing::warn!("YouTube quota exceeded: {}", message);
                RemoteError::QuotaExceeded
            }
            other => RemoteError::Api(other.to_string()),
        }
    }
}

/// Remote playlists on the authenticated YouTube channel.
pub struct YoutubePlaylists {
    client: YoutubeClient,
    privacy_status: PrivacyStatus,
}

impl YoutubePlaylists {
    pub fn new(client: YoutubeClient, privacy_status: PrivacyStatus) -> Self {
        Self {
            client,
            privacy_status,
        }
    }
}

#[async_trait::async_trait]
impl RemotePlaylists for YoutubePlaylists {
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Option<String>, RemoteError> {
        let playlist = self
            .client
            .create_playlist(name, description, self.privacy_status)
            .await?;
        Ok(playlist.id)
    }

    async fn insert_track(&self, playlist_id: &str, video_id: &str) -> Result<(), RemoteError> {
        self.client
            .insert_playlist_item(playlist_id, video_id)
            .await?;
        Ok(())
    }
}

/// Resolves tracks by reading the first hit of a YouTube results page.
pub struct YoutubeSearchResolver {
    client: reqwest::Client,
    timeout: Duration,
}

impl YoutubeSearchResolver {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait::async_trait]
impl VideoResolver for YoutubeSearchResolver {
    async fn resolve(&self, track: &TrackIdentity) -> Result<String, ResolveError> {
        match search_video_id(&self.client, track, self.timeout).await {
            Ok(video_id) => {
                tracing::debug!("Resolved {} to video {}", track, video_id);
                Ok(video_id)
            }
            Err(error @ (SearchError::Timeout | SearchError::NoVideo)) => {
                Err(ResolveError::NotFound(error.to_string()))
            }
            Err(error) => Err(ResolveError::Request(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_maps_to_quota_exceeded() {
        let error: RemoteError = YoutubeApiError::QuotaExceeded {
            message: "daily limit".into(),
        }
        .into();

        assert_eq!(error, RemoteError::QuotaExceeded);
    }

    #[test]
    fn test_api_error_keeps_message() {
        let error: RemoteError = YoutubeApiError::Api {
            status: 404,
            message: "Playlist not found".into(),
        }
        .into();

        assert_eq!(
            error,
            RemoteError::Api("YouTube API returned 404: Playlist not found".into())
        );
    }
}
