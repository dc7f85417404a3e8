//! SQLite-backed mirror store.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{decode, encode, MirrorStore};
use crate::errors::AppError;
use crate::portal::PortalState;

/// Initialize the database connection pool and create the mirror table.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mirror (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

/// Key-value mirror living in one SQLite table.
#[derive(Clone)]
pub struct SqliteMirror {
    pool: SqlitePool,
}

impl SqliteMirror {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MirrorStore for SqliteMirror {
    async fn load(&self) -> Result<PortalState, AppError> {
        let rows = sqlx::query("SELECT key, value FROM mirror")
            .fetch_all(&self.pool)
            .await?;

        let mut blobs: HashMap<String, String> = rows
            .into_iter()
            .map(|row| (row.get("key"), row.get("value")))
            .collect();

        decode(|key| blobs.remove(key))
    }

    async fn save(&self, state: &PortalState) -> Result<(), AppError> {
        let encoded = encode(state)?;
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        for (key, value) in encoded {
            sqlx::query(
                "INSERT INTO mirror (key, value, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            )
            .bind(key)
            .bind(&value)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SUBJECTS_KEY;
    use crate::models::{Material, PageId, Post};
    use tempfile::TempDir;

    async fn open(dir: &TempDir) -> SqliteMirror {
        let pool = init_database(&dir.path().join("portal.sqlite"))
            .await
            .expect("Failed to init DB");
        SqliteMirror::new(pool)
    }

    #[tokio::test]
    async fn test_fresh_database_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        assert_eq!(store.load().await.unwrap(), PortalState::default());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let mut state = PortalState::default();
        state.posts.push(Post {
            id: "1767225600000".into(),
            category: PageId::Avisos,
            title: "Semana acadêmica".into(),
            content: "Inscrições abertas".into(),
            image_url: None,
            date: "01/01/2026".into(),
            author: "Prof. Téo".into(),
        });
        state.subjects[4].materials.push(Material {
            id: "1767225600001".into(),
            name: "BNCC".into(),
            kind: "PDF".into(),
            url: Some("https://example.edu/bncc.pdf".into()),
        });

        {
            let store = open(&dir).await;
            store.save(&state).await.unwrap();
            // second save overwrites rather than duplicates
            store.save(&state).await.unwrap();
        }

        let store = open(&dir).await;
        assert_eq!(store.load().await.unwrap(), state);
    }

    #[tokio::test]
    async fn test_corrupt_row_fails_load() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        sqlx::query("INSERT INTO mirror (key, value, updated_at) VALUES (?, 'oops', 'now')")
            .bind(SUBJECTS_KEY)
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.load().await.unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
