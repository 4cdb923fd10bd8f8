//! SQLite-backed key/value storage

use anyhow::{Context, Result};
use chrono::Utc;
use kindview_core::{KindCache, KindviewError, StateStore};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Entry holding the last encoded query state
pub const STATE_KEY: &str = "query_state";

/// Entry holding the cached kind names as a JSON array
pub const KINDS_KEY: &str = "kinds";

/// Handle for database connections - either owned or shared
enum ConnectionHandle {
    Owned(Connection),
    Shared(Arc<Mutex<Connection>>),
}

impl ConnectionHandle {
    fn with_conn<T, F: FnOnce(&Connection) -> Result<T>>(&self, f: F) -> Result<T> {
        match self {
            ConnectionHandle::Owned(conn) => f(conn),
            ConnectionHandle::Shared(arc) => {
                let guard = arc
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {}", e))?;
                f(&guard)
            }
        }
    }
}

/// Client-local storage in a SQLite file
pub struct LocalStorage {
    db_path: PathBuf,
    /// Holds the connection for in-memory databases (where each open creates a new db)
    memory_conn: Option<Arc<Mutex<Connection>>>,
}

impl LocalStorage {
    /// Open or create storage at the given path
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = path.into();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let storage = Self {
            db_path,
            memory_conn: None,
        };
        storage.initialize_schema()?;
        tracing::debug!(path = ?storage.db_path, "opened local storage");
        Ok(storage)
    }

    /// Create an in-memory storage for testing
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().with_context(|| "Failed to create in-memory database")?;
        let storage = Self {
            db_path: PathBuf::from(":memory:"),
            memory_conn: Some(Arc::new(Mutex::new(conn))),
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<ConnectionHandle> {
        if let Some(ref conn) = self.memory_conn {
            Ok(ConnectionHandle::Shared(conn.clone()))
        } else {
            let conn = Connection::open(&self.db_path)
                .with_context(|| format!("Failed to open database at {:?}", self.db_path))?;
            Ok(ConnectionHandle::Owned(conn))
        }
    }

    fn initialize_schema(&self) -> Result<()> {
        let handle = self.connect()?;
        handle.with_conn(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS kv (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )?;
            Ok(())
        })
    }

    /// Read an entry
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let handle = self.connect()?;
        handle.with_conn(|conn| {
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()
                .with_context(|| format!("Failed to read {}", key))?;
            Ok(value)
        })
    }

    /// Write an entry, replacing any previous value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let handle = self.connect()?;
        let now = Utc::now().to_rfc3339();
        handle.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, value, now],
            )
            .with_context(|| format!("Failed to write {}", key))?;
            Ok(())
        })
    }
}

fn storage_error(err: anyhow::Error) -> KindviewError {
    KindviewError::Storage(format!("{:#}", err))
}

impl StateStore for LocalStorage {
    fn load_state(&self) -> kindview_core::Result<Option<String>> {
        self.get(STATE_KEY).map_err(storage_error)
    }

    fn save_state(&self, encoded: &str) -> kindview_core::Result<()> {
        self.set(STATE_KEY, encoded).map_err(storage_error)
    }
}

impl KindCache for LocalStorage {
    fn load_kinds(&self) -> kindview_core::Result<Option<Vec<String>>> {
        let Some(raw) = self.get(KINDS_KEY).map_err(storage_error)? else {
            return Ok(None);
        };
        // A damaged cache entry reads as a miss
        match serde_json::from_str(&raw) {
            Ok(kinds) => Ok(Some(kinds)),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable kind cache");
                Ok(None)
            }
        }
    }

    fn store_kinds(&self, kinds: &[String]) -> kindview_core::Result<()> {
        let raw = serde_json::to_string(kinds)?;
        self.set(KINDS_KEY, &raw).map_err(storage_error)
    }
}
