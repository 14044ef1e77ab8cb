//! SQLite-backed key-value store
//!
//! A single `kv` table with a text primary key. The connection sits behind a
//! `std::sync::Mutex` because `rusqlite::Connection` is not `Sync`.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::kv::KeyValueStore;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Durable key-value store in a SQLite file
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Create or open a store at `path`
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Self::init(conn, Some(path))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        tracing::debug!("Opened key-value store at {:?}", path);

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(format!("Failed to acquire connection lock: {}", e)))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(changed > 0)
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        // substr comparison avoids LIKE wildcard escaping
        let mut stmt = conn.prepare(
            "SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn clear(&self) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip_in_memory() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.path().is_none());

        store.set("shopping:items", "[]").unwrap();
        assert_eq!(
            store.get("shopping:items").unwrap(),
            Some("[]".to_string())
        );

        store.set("shopping:items", "[1]").unwrap();
        assert_eq!(
            store.get("shopping:items").unwrap(),
            Some("[1]".to_string())
        );

        assert!(store.remove("shopping:items").unwrap());
        assert_eq!(store.get("shopping:items").unwrap(), None);
    }

    #[test]
    fn test_prefix_scan_treats_wildcards_literally() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("chat:a_b", "[]").unwrap();
        store.set("chat:axb", "[]").unwrap();
        store.set("mood:history", "[]").unwrap();

        assert_eq!(store.keys_with_prefix("chat:").unwrap().len(), 2);
        assert_eq!(
            store.keys_with_prefix("chat:a_").unwrap(),
            vec!["chat:a_b".to_string()]
        );
        assert_eq!(store.keys().unwrap().len(), 3);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("homedash.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("preferences:settings", r#"{"dark_mode":false}"#).unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.get("preferences:settings").unwrap(),
            Some(r#"{"dark_mode":false}"#.to_string())
        );

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
