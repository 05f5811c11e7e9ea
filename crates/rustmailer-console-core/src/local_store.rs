//! Local key/value storage for UI state that survives restarts.
//!
//! Values are plain strings: draft editor contents (keyed by
//! [`Draft::storage_key`](crate::compose::Draft::storage_key)) and layout state
//! such as which mailbox tree nodes are collapsed.

use std::collections::BTreeSet;
use std::path::PathBuf;

use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::Result;

const DATA_DIR: &str = "rustmailer-console";
const DATABASE_FILE: &str = "console.db";

/// Default database location in the platform data directory.
#[must_use]
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR)
        .join(DATABASE_FILE)
}

/// Key under which the collapsed tree nodes of an account are kept.
#[must_use]
pub fn collapsed_nodes_key(account_id: u64) -> String {
    format!("layout:collapsed:{account_id}")
}

/// String store backed by `SQLite`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    /// Opens (or creates) the store at `database_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Opens the store at [`default_database_path`], creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub async fn open_default() -> Result<Self> {
        let path = default_database_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Self::new(&path.to_string_lossy()).await
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Reads `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("value")))
    }

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        debug!("Stored {key}");
        Ok(())
    }

    /// Removes `key`. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Keys starting with `prefix`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r"
            SELECT key FROM kv
            WHERE substr(key, 1, length(?)) = ?
            ORDER BY key
            ",
        )
        .bind(prefix)
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(|r| r.get("key")).collect())
    }

    /// Saves a draft body; an empty body removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn save_draft(&self, key: &str, body: &str) -> Result<()> {
        if body.trim().is_empty() {
            self.delete(key).await?;
            Ok(())
        } else {
            self.set(key, body).await
        }
    }

    /// Collapsed mailbox tree nodes of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn collapsed_nodes(&self, account_id: u64) -> Result<BTreeSet<String>> {
        let value = self.get(&collapsed_nodes_key(account_id)).await?;
        Ok(value
            .as_deref()
            .unwrap_or_default()
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Replaces the collapsed mailbox tree nodes of an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn set_collapsed_nodes(
        &self,
        account_id: u64,
        nodes: &BTreeSet<String>,
    ) -> Result<()> {
        let key = collapsed_nodes_key(account_id);
        if nodes.is_empty() {
            self.delete(&key).await?;
            return Ok(());
        }
        let value = nodes.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
        self.set(&key, &value).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = LocalStore::in_memory().await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);

        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        assert_eq!(store.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_drafts() {
        let store = LocalStore::in_memory().await.unwrap();
        store.save_draft("draft:1:INBOX:7", "hello").await.unwrap();
        store.save_draft("draft:1:new", "new one").await.unwrap();
        store.save_draft("draft:2:new", "other").await.unwrap();
        store.set(&collapsed_nodes_key(1), "Archive").await.unwrap();

        assert_eq!(
            store.keys_with_prefix("draft:1:").await.unwrap(),
            ["draft:1:INBOX:7", "draft:1:new"]
        );

        store.save_draft("draft:1:new", "  ").await.unwrap();
        assert_eq!(store.get("draft:1:new").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_collapsed_nodes() {
        let store = LocalStore::in_memory().await.unwrap();
        assert!(store.collapsed_nodes(1).await.unwrap().is_empty());

        let nodes: BTreeSet<String> = ["Archive".to_string(), "Archive/2023".to_string()].into();
        store.set_collapsed_nodes(1, &nodes).await.unwrap();
        assert_eq!(store.collapsed_nodes(1).await.unwrap(), nodes);
        assert!(store.collapsed_nodes(2).await.unwrap().is_empty());

        store.set_collapsed_nodes(1, &BTreeSet::new()).await.unwrap();
        assert_eq!(store.get(&collapsed_nodes_key(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists() {
        let path = std::env::temp_dir().join(format!("rmc-store-{}.db", std::process::id()));
        let path = path.to_string_lossy().to_string();
        {
            let store = LocalStore::new(&path).await.unwrap();
            store.set("draft:9:new", "kept").await.unwrap();
            store.pool.close().await;
        }
        let store = LocalStore::new(&path).await.unwrap();
        assert_eq!(store.get("draft:9:new").await.unwrap().as_deref(), Some("kept"));
        store.pool.close().await;
        let _ = std::fs::remove_file(&path);
    }
}
