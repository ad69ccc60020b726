use crate::track_identity::TrackIdentity;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("YouTube quota exceeded")]
    QuotaExceeded,
    #[error("YouTube API error: {0}")]
    Api(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("{0}")]
    NotFound(String),
    #[error("YouTube search failed: {0}")]
    Request(String),
}

/// Port trait wrapping the YouTube playlist endpoints used by the transfer.
///
/// Implementations live in `services::youtube` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RemotePlaylists: Send + Sync {
    /// Create a playlist, returning its id. `Ok(None)` means the API answered without an id.
    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Option<String>, RemoteError>;

    /// Append a video to the end of a playlist.
    async fn insert_track(&self, playlist_id: &str, video_id: &str) -> Result<(), RemoteError>;
}

/// Port trait turning a track into a YouTube video id.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoResolver: Send + Sync {
    async fn resolve(&self, track: &TrackIdentity) -> Result<String, ResolveError>;
}
