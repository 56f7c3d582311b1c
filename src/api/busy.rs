//! Per-session turn guard

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Session ids with a turn in flight
#[derive(Default)]
pub struct BusySessions {
    active: Arc<Mutex<HashSet<String>>>,
}

impl BusySessions {
    /// Mark `id` busy. Returns `None` when a turn already holds it.
    pub fn try_acquire(&self, id: &str) -> Option<TurnGuard> {
        let mut active = self
            .active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !active.insert(id.to_string()) {
            return None;
        }
        Some(TurnGuard {
            active: Arc::clone(&self.active),
            id: id.to_string(),
        })
    }
}

/// Releases the session when dropped
pub struct TurnGuard {
    active: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&self.id);
    }
}
