use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::ports::track_cache::{CacheEntry, CacheError, CachedVideo, TrackCache};
use crate::track_identity::{Artist, TrackIdentity};

/// Track cache stored in the sqlite database through sea-orm.
pub struct DatabaseTrackCache {
    db: Arc<Database>,
}

impl DatabaseTrackCache {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn load_artists(
        &self,
        conn: &impl ConnectionTrait,
        cached_track_id: i64,
    ) -> Result<Vec<Artist>, DbErr> {
        let credits = entities::cached_track_artist::Entity::find()
            .filter(entities::cached_track_artist::Column::CachedTrackId.eq(cached_track_id))
            .order_by_asc(entities::cached_track_artist::Column::Position)
            .find_also_related(entities::artist::Entity)
            .all(conn)
            .await?;

        credits
            .into_iter()
            .map(|(credit, artist)| {
                artist.map(|a| Artist::new(a.name)).ok_or_else(|| {
                    DbErr::RecordNotFound(format!(
                        "Artist {} credited on cached track {}",
                        credit.artist_id, cached_track_id
                    ))
                })
            })
            .collect()
    }

    async fn load_entry(
        &self,
        conn: &impl ConnectionTrait,
        model: entities::cached_track::Model,
    ) -> Result<CacheEntry, DbErr> {
        let artists = self.load_artists(conn, model.id).await?;
        Ok(CacheEntry {
            id: model.id,
            title: model.title,
            artists,
            youtube_id: model.youtube_id,
            upload_count: model.upload_count,
        })
    }
}

/// Look up an artist by exact name, creating it when missing.
async fn get_or_create_artist(conn: &impl ConnectionTrait, name: &str) -> Result<i64, DbErr> {
    if let Some(existing) = entities::artist::Entity::find()
        .filter(entities::artist::Column::Name.eq(name))
        .one(conn)
        .await?
    {
        tracing::debug!("Artist already exists: '{}' (ID: {})", name, existing.id);
        return Ok(existing.id);
    }

    let artist = entities::artist::ActiveModel {
        name: Set(name.to_string()),
        ..entities::artist::ActiveModel::new()
    }
    .insert(conn)
    .await?;

    tracing::debug!("Artist created: '{}' (ID: {})", name, artist.id);
    Ok(artist.id)
}

#[async_trait::async_trait]
impl TrackCache for DatabaseTrackCache {
    async fn find(&self, track: &TrackIdentity) -> Result<Option<CachedVideo>, CacheError> {
        // Title equality is only a coarse filter; artists decide the match
        let candidates = entities::cached_track::Entity::find()
            .filter(entities::cached_track::Column::Title.eq(&track.title))
            .order_by_asc(entities::cached_track::Column::Id)
            .all(&self.db.conn)
            .await?;

        for candidate in candidates {
            let artists = self.load_artists(&self.db.conn, candidate.id).await?;
            let cached = TrackIdentity {
                title: candidate.title,
                artists,
            };
            if cached.matches(track) {
                tracing::debug!("Cache hit for {} (ID: {})", track, candidate.id);
                return Ok(Some(CachedVideo {
                    id: candidate.id,
                    youtube_id: candidate.youtube_id,
                }));
            }
        }

        tracing::debug!("Cache miss for {}", track);
        Ok(None)
    }

    async fn insert(&self, track: &TrackIdentity, youtube_id: &str) -> Result<i64, CacheError> {
        // Rolled back on drop unless committed
        let txn = self.db.conn.begin().await?;

        let mut artist_ids = Vec::with_capacity(track.artists.len());
        for artist in &track.artists {
            artist_ids.push(get_or_create_artist(&txn, &artist.name).await?);
        }

        let entry = entities::cached_track::ActiveModel {
            title: Set(track.title.clone()),
            youtube_id: Set(youtube_id.to_string()),
            ..entities::cached_track::ActiveModel::new()
        }
        .insert(&txn)
        .await?;

        for (position, artist_id) in artist_ids.into_iter().enumerate() {
            let credit = entities::cached_track_artist::ActiveModel {
                cached_track_id: Set(entry.id),
                position: Set(position as i32),
                artist_id: Set(artist_id),
            };
            entities::cached_track_artist::Entity::insert(credit)
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        tracing::info!(
            "Cached {} as video {} (ID: {})",
            track,
            youtube_id,
            entry.id
        );
        Ok(entry.id)
    }

    async fn record_reuse(&self, id: i64) -> Result<(), CacheError> {
        // Atomic increment in SQL
        let result = entities::cached_track::Entity::update_many()
            .col_expr(
                entities::cached_track::Column::UploadCount,
                Expr::cust("upload_count + 1"),
            )
            .col_expr(
                entities::cached_track::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(entities::cached_track::Column::Id.eq(id))
            .exec(&self.db.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(CacheError::UnknownEntry { id });
        }

        tracing::debug!("Recorded reuse of cached track {}", id);
        Ok(())
    }

    async fn entry(&self, id: i64) -> Result<Option<CacheEntry>, CacheError> {
        let Some(model) = entities::cached_track::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(self.load_entry(&self.db.conn, model).await?))
    }

    async fn entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let models = entities::cached_track::Entity::find()
            .order_by_asc(entities::cached_track::Column::Id)
            .all(&self.db.conn)
            .await?;

        let mut entries = Vec::with_capacity(models.len());
        for model in models {
            entries.push(self.load_entry(&self.db.conn, model).await?);
        }
        Ok(entries)
    }
}
