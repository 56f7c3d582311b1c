//! Session persistence
//!
//! Sessions are stored whole, as one JSON document per id, so a reload
//! restores the lead, the transcript and the summary latch together.

mod memory;

pub use memory::MemorySessionStore;

use crate::conversation::SessionState;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// SQL schema for initialization
const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    state TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_updated ON sessions(updated_at DESC);
";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Corrupt session record: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Failed to create store directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Loads and saves whole sessions by id
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &str) -> StoreResult<Option<SessionState>>;

    /// Insert or replace the session
    fn save(&self, session: &SessionState) -> StoreResult<()>;
}

/// Thread-safe SQLite-backed store
#[derive(Clone)]
pub struct SqliteSessionStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSessionStore {
    /// Open or create the database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self, id: &str) -> StoreResult<Option<SessionState>> {
        let conn = self.conn()?;
        let state: Option<String> = conn
            .query_row(
                "SELECT state FROM sessions WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        state
            .map(|json| serde_json::from_str(&json).map_err(StoreError::from))
            .transpose()
    }

    fn save(&self, session: &SessionState) -> StoreResult<()> {
        let state = serde_json::to_string(session)?;
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (id, state, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET state = excluded.state, updated_at = excluded.updated_at",
            params![session.id, state, session.started_at.to_rfc3339(), now],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::LeadData;

    fn session(id: &str) -> SessionState {
        let lead = LeadData {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            phone: "5512345678".to_string(),
            event_type: Some("boda".to_string()),
        };
        let mut s = SessionState::new(id, lead, Utc::now());
        s.push_model("¡Hola!");
        s
    }

    #[test]
    fn test_load_missing_is_none() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        assert!(store.load("nope").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let s = session("s-1");
        store.save(&s).unwrap();
        assert_eq!(store.load("s-1").unwrap(), Some(s));
    }

    #[test]
    fn test_save_replaces_existing() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        let mut s = session("s-1");
        store.save(&s).unwrap();

        s.push_user("necesito cotizar un evento");
        s.summary.claim(Utc::now());
        store.save(&s).unwrap();

        let loaded = store.load("s-1").unwrap().unwrap();
        assert_eq!(loaded.turns.len(), 2);
        assert!(loaded.summary.is_sent());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sessions.db");
        let s = session("s-1");
        {
            let store = SqliteSessionStore::open(&path).unwrap();
            store.save(&s).unwrap();
        }
        let store = SqliteSessionStore::open(&path).unwrap();
        assert_eq!(store.load("s-1").unwrap(), Some(s));
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let store = SqliteSessionStore::open_in_memory().unwrap();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO sessions (id, state, created_at, updated_at) VALUES ('x', 'not json', '', '')",
                [],
            )
            .unwrap();
        assert!(matches!(store.load("x"), Err(StoreError::Serde(_))));
    }
}
