//! In-process session store

use super::{SessionStore, StoreError, StoreResult};
use crate::conversation::SessionState;
use std::collections::HashMap;
use std::sync::Mutex;

/// Sessions kept in a map; lost on restart
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionState>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, id: &str) -> StoreResult<Option<SessionState>> {
        let sessions = self.sessions.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions.get(id).cloned())
    }

    fn save(&self, session: &SessionState) -> StoreResult<()> {
        let mut sessions = self.sessions.lock().map_err(|_| StoreError::Poisoned)?;
        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
}
