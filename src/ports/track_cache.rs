use crate::track_identity::{Artist, TrackIdentity};

/// A persisted track that has already been resolved to a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub id: i64,
    pub title: String,
    /// Artists in credit order.
    pub artists: Vec<Artist>,
    pub youtube_id: String,
    pub upload_count: i32,
}

impl CacheEntry {
    pub fn identity(&self) -> TrackIdentity {
        TrackIdentity {
            title: self.title.clone(),
            artists: self.artists.clone(),
        }
    }
}

/// A cache hit: the entry id and the video it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedVideo {
    pub id: i64,
    pub youtube_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Unknown cache entry: {id}")]
    UnknownEntry { id: i64 },
    #[error("Track cache storage error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Persistent mapping from tracks to resolved videos.
///
/// Every call is atomic on its own; nothing spans more than one call.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackCache: Send + Sync {
    /// First entry whose title and artist multiset match `track` exactly.
    async fn find(&self, track: &TrackIdentity) -> Result<Option<CachedVideo>, CacheError>;

    /// Store a newly resolved track, creating any artists not seen before.
    async fn insert(&self, track: &TrackIdentity, youtube_id: &str) -> Result<i64, CacheError>;

    /// Count one more playlist insertion that reused the entry.
    async fn record_reuse(&self, id: i64) -> Result<(), CacheError>;

    async fn entry(&self, id: i64) -> Result<Option<CacheEntry>, CacheError>;

    /// All entries ordered by id.
    async fn entries(&self) -> Result<Vec<CacheEntry>, CacheError>;
}
