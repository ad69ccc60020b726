use tracing::instrument;

use crate::ports::spotify::{CatalogError, SourceCatalog};
use crate::ports::track_cache::{CacheError, TrackCache};
use crate::ports::youtube::{RemoteError, RemotePlaylists, ResolveError, VideoResolver};
use crate::track_identity::TrackIdentity;

/// Where a transfer run currently is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    CreatingPlaylist,
    ProcessingTracks,
    Completed,
    Aborted,
}

/// Every way a transfer run can stop early. Positions are 1-based playlist positions.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("Invalid Spotify playlist id '{playlist_id}'. Check the id and try again.")]
    InvalidPlaylistId { playlist_id: String },
    #[error("Could not read Spotify playlist '{playlist_id}': {reason}")]
    CatalogUnavailable { playlist_id: String, reason: String },
    #[error("Could not create YouTube playlist '{name}': {reason}")]
    PlaylistCreationFailed { name: String, reason: String },
    #[error("No video found for track #{position} {track}: {source}")]
    TrackResolutionFailed {
        position: usize,
        track: TrackIdentity,
        #[source]
        source: ResolveError,
    },
    #[error("YouTube quota exceeded while adding track #{position} {track}")]
    QuotaExceeded { position: usize, track: TrackIdentity },
    #[error("Failed to add track #{position} {track} to playlist: {source}")]
    InsertionFailed {
        position: usize,
        track: TrackIdentity,
        #[source]
        source: RemoteError,
    },
    #[error("Cache entry {id} for track #{position} {track} does not exist")]
    UnknownCacheEntry {
        position: usize,
        track: TrackIdentity,
        id: i64,
    },
    #[error("Track cache failed on track #{position} {track}: {source}")]
    CacheFailure {
        position: usize,
        track: TrackIdentity,
        #[source]
        source: CacheError,
    },
}

impl TransferError {
    /// Playlist position of the failing track, if the run got that far.
    pub fn position(&self) -> Option<usize> {
        match self {
            TransferError::TrackResolutionFailed { position, .. }
            | TransferError::QuotaExceeded { position, .. }
            | TransferError::InsertionFailed { position, .. }
            | TransferError::UnknownCacheEntry { position, .. }
            | TransferError::CacheFailure { position, .. } => Some(*position),
            _ => None,
        }
    }

    fn from_cache(position: usize, track: &TrackIdentity, error: CacheError) -> Self {
        match error {
            CacheError::UnknownEntry { id } => TransferError::UnknownCacheEntry {
                position,
                track: track.clone(),
                id,
            },
            source => TransferError::CacheFailure {
                position,
                track: track.clone(),
                source,
            },
        }
    }
}

/// How the video for a transferred track was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Found in the cache; its upload count was bumped.
    Reused,
    /// Resolved by search and stored as a new cache entry.
    Cached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferredTrack {
    pub position: usize,
    pub track: TrackIdentity,
    pub cache_id: i64,
    pub youtube_id: String,
    pub outcome: CacheOutcome,
}

/// Outcome of one transfer run, successful or not.
#[derive(Debug)]
pub struct TransferReport {
    pub source_playlist_id: String,
    pub playlist_name: Option<String>,
    pub remote_playlist_id: Option<String>,
    pub state: TransferState,
    pub total_tracks: usize,
    /// Tracks added to the remote playlist, in playlist order.
    pub transferred: Vec<TransferredTrack>,
    pub error: Option<TransferError>,
}

impl TransferReport {
    fn new(source_playlist_id: &str) -> Self {
        Self {
            source_playlist_id: source_playlist_id.to_string(),
            playlist_name: None,
            remote_playlist_id: None,
            state: TransferState::CreatingPlaylist,
            total_tracks: 0,
            transferred: Vec::new(),
            error: None,
        }
    }

    fn abort(mut self, error: TransferError) -> Self {
        tracing::error!(
            "Transfer of playlist {} aborted after {}/{} tracks: {}",
            self.source_playlist_id,
            self.transferred.len(),
            self.total_tracks,
            error
        );
        self.state = TransferState::Aborted;
        self.error = Some(error);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.state == TransferState::Completed
    }

    pub fn into_result(mut self) -> Result<Self, TransferError> {
        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

/// Moves one Spotify playlist into a new YouTube playlist.
///
/// Tracks are handled strictly one after another in playlist order. Each track is looked up in
/// the cache first and only searched for on a miss. The first failure of any kind ends the run;
/// tracks already added stay in the remote playlist.
pub struct PlaylistTransferEngine<S, R, V, C> {
    source: S,
    remote: R,
    resolver: V,
    cache: C,
}

impl<S, R, V, C> PlaylistTransferEngine<S, R, V, C>
where
    S: SourceCatalog,
    R: RemotePlaylists,
    V: VideoResolver,
    C: TrackCache,
{
    pub fn new(source: S, remote: R, resolver: V, cache: C) -> Self {
        Self {
            source,
            remote,
            resolver,
            cache,
        }
    }

    #[cfg(test)]
    pub fn cache(&self) -> &C {
        &self.cache
    }

    #[instrument(skip(self))]
    pub async fn transfer(&self, source_playlist_id: &str) -> TransferReport {
        let mut report = TransferReport::new(source_playlist_id);

        let playlist = match self.source.fetch_playlist(source_playlist_id).await {
            Ok(playlist) => playlist,
            Err(CatalogError::InvalidPlaylistId(_)) => {
                return report.abort(TransferError::InvalidPlaylistId {
                    playlist_id: source_playlist_id.to_string(),
                });
            }
            Err(CatalogError::Request(reason)) => {
                return report.abort(TransferError::CatalogUnavailable {
                    playlist_id: source_playlist_id.to_string(),
                    reason,
                });
            }
        };

        tracing::info!(
            "Transferring playlist '{}' ({} tracks)",
            playlist.name,
            playlist.len()
        );
        if playlist.is_empty() {
            tracing::warn!("Playlist '{}' has no tracks", playlist.name);
        }
        report.playlist_name = Some(playlist.name.clone());
        report.total_tracks = playlist.len();

        let remote_playlist_id = match self
            .remote
            .create_playlist(&playlist.name, &playlist.description)
            .await
        {
            Ok(Some(id)) => id,
            Ok(None) => {
                return report.abort(TransferError::PlaylistCreationFailed {
                    name: playlist.name,
                    reason: "no playlist id returned".to_string(),
                });
            }
            Err(error) => {
                return report.abort(TransferError::PlaylistCreationFailed {
                    name: playlist.name,
                    reason: error.to_string(),
                });
            }
        };

        tracing::info!("Created YouTube playlist {}", remote_playlist_id);
        report.remote_playlist_id = Some(remote_playlist_id.clone());
        report.state = TransferState::ProcessingTracks;

        for (index, track) in playlist.tracks.iter().enumerate() {
            match self
                .transfer_track(&remote_playlist_id, index + 1, track)
                .await
            {
                Ok(transferred) => report.transferred.push(transferred),
                Err(error) => return report.abort(error),
            }
        }

        report.state = TransferState::Completed;
        tracing::info!(
            "Playlist '{}' has been successfully transferred to YouTube",
            playlist.name
        );
        report
    }

    async fn transfer_track(
        &self,
        remote_playlist_id: &str,
        position: usize,
        track: &TrackIdentity,
    ) -> Result<TransferredTrack, TransferError> {
        let cached = self
            .cache
            .find(track)
            .await
            .map_err(|error| TransferError::from_cache(position, track, error))?;

        let (youtube_id, cached_id) = match cached {
            Some(hit) => (hit.youtube_id, Some(hit.id)),
            None => {
                let youtube_id = self.resolver.resolve(track).await.map_err(|source| {
                    TransferError::TrackResolutionFailed {
                        position,
                        track: track.clone(),
                        source,
                    }
                })?;
                (youtube_id, None)
            }
        };

        self.remote
            .insert_track(remote_playlist_id, &youtube_id)
            .await
            .map_err(|error| match error {
                RemoteError::QuotaExceeded => TransferError::QuotaExceeded {
                    position,
                    track: track.clone(),
                },
                source => TransferError::InsertionFailed {
                    position,
                    track: track.clone(),
                    source,
                },
            })?;

        let (cache_id, outcome) = match cached_id {
            Some(id) => {
                self.cache
                    .record_reuse(id)
                    .await
                    .map_err(|error| TransferError::from_cache(position, track, error))?;
                (id, CacheOutcome::Reused)
            }
            None => {
                let id = self
                    .cache
                    .insert(track, &youtube_id)
                    .await
                    .map_err(|error| TransferError::from_cache(position, track, error))?;
                (id, CacheOutcome::Cached)
            }
        };

        tracing::info!("Track {} has been added to playlist", track);
        Ok(TransferredTrack {
            position,
            track: track.clone(),
            cache_id,
            youtube_id,
            outcome,
        })
    }
}
