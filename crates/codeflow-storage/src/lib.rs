use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod credentials;
mod schema;

pub use credentials::{API_KEY_ENTRY, CredentialProvider, MemoryCredentials};

const SCHEMA_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Credential must not be empty")]
    EmptyCredential,
    #[error("No data directory available on this platform")]
    NoDataDir,
    #[error("Other error: {0}")]
    Other(String),
}

/// Small SQLite-backed key/value store holding the locally persisted state.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        let _ = conn.busy_timeout(Duration::from_millis(2_500));
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init()?;
        tracing::debug!(path = %path.display(), "opened storage");
        Ok(storage)
    }

    pub fn new_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init()?;
        Ok(storage)
    }

    /// `<data dir>/codeflow/codeflow.db`
    pub fn default_path() -> Result<PathBuf, StorageError> {
        dirs::data_dir()
            .map(|dir| dir.join("codeflow").join("codeflow.db"))
            .ok_or(StorageError::NoDataDir)
    }

    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(Self::default_path()?)
    }

    fn init(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        schema::create_tables(&conn)?;
        schema::apply_schema_migrations(&conn)
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Inserts or fully replaces the value stored under `key`.
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn delete_value(&self, key: &str) -> Result<bool, StorageError> {
        let conn = self.conn.lock();
        let removed = conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    /// RFC 3339 timestamp of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn schema_version(&self) -> Result<u32, StorageError> {
        schema::schema_version(&self.conn.lock())
    }
}

#[cfg(test)]
mod tests;
