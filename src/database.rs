use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection};
use std::path::Path;
use std::time::Duration;

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create the track cache database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());

        // Single writer: one pooled connection is enough
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(1)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {}", path.display()))?;

        conn.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .context("Failed to enable foreign keys")?;

        tracing::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database ready at: {}", path.display());
        Ok(Database { conn })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ports::track_cache::TrackCache;
    use crate::services::track_cache::DatabaseTrackCache;
    use crate::track_identity::TrackIdentity;

    #[tokio::test]
    async fn test_open_migrates_a_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("spottube.db");

        let db = Database::open(&path).await.unwrap();
        assert!(path.exists());

        let cache = DatabaseTrackCache::new(Arc::new(db));
        let track = TrackIdentity::new("I Don't Care", ["Ed Sheeran", "Justin Bieber"]);
        let id = cache.insert(&track, "y83x7MgzWOA").await.unwrap();

        let hit = cache.find(&track).await.unwrap().unwrap();
        assert_eq!(hit.id, id);
        assert_eq!(hit.youtube_id, "y83x7MgzWOA");

        cache.record_reuse(id).await.unwrap();
        let entry = cache.entry(id).await.unwrap().unwrap();
        assert_eq!(entry.upload_count, 1);
        assert_eq!(entry.identity(), track);
    }

    #[tokio::test]
    async fn test_reopen_keeps_cached_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spottube.db");
        let track = TrackIdentity::new("Perfect", ["Ed Sheeran"]);

        {
            let db = Database::open(&path).await.unwrap();
            DatabaseTrackCache::new(Arc::new(db))
                .insert(&track, "2Vv-BfVoq4g")
                .await
                .unwrap();
        }

        let cache = DatabaseTrackCache::new(Arc::new(Database::open(&path).await.unwrap()));
        let hit = cache.find(&track).await.unwrap().unwrap();
        assert_eq!(hit.youtube_id, "2Vv-BfVoq4g");
    }
}
