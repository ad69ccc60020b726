use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database as SeaDatabase};

use crate::database::Database;
use crate::services::track_cache::DatabaseTrackCache;

/// Fresh in-memory database built from `schema.sql`.
pub async fn test_db() -> Arc<Database> {
    let conn = SeaDatabase::connect("sqlite::memory:?mode=rwc")
        .await
        .unwrap();

    conn.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .unwrap();

    for sql in schema_statements(include_str!("../schema.sql")) {
        conn.execute_unprepared(&sql)
            .await
            .unwrap_or_else(|e| panic!("Failed to execute SQL: {}\nStatement: {}", e, sql));
    }

    Arc::new(Database { conn })
}

/// Split a SQL script into statements. Comment lines are dropped before splitting on `;`.
fn schema_statements(script: &str) -> Vec<String> {
    script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n")
        .split(';')
        .map(str::trim)
        .filter(|sql| !sql.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn test_cache() -> DatabaseTrackCache {
    DatabaseTrackCache::new(test_db().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_ignore_semicolons_in_comments() {
        let script = "-- first; with a semicolon\nCREATE TABLE a (id INTEGER);\n\n  -- second; too\nCREATE TABLE b (id INTEGER);\n";

        assert_eq!(
            schema_statements(script),
            vec![
                "CREATE TABLE a (id INTEGER)".to_string(),
                "CREATE TABLE b (id INTEGER)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_db_creates_cache_tables() {
        let db = test_db().await;

        for table in ["artist", "cached_track", "cached_track_artist"] {
            db.conn
                .execute_unprepared(&format!("SELECT COUNT(*) FROM {}", table))
                .await
                .unwrap_or_else(|e| panic!("Missing table {}: {}", table, e));
        }
    }
}
