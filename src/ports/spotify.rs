use crate::track_identity::Playlist;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid Spotify playlist id: {0}")]
    InvalidPlaylistId(String),
    #[error("Spotify request failed: {0}")]
    Request(String),
}

/// Port trait wrapping the source catalog the playlist is read from.
///
/// Implementations live in `services::spotify` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Fetch a playlist with its tracks in playback order.
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Playlist, CatalogError>;
}
