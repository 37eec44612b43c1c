//! In-memory store (for testing and previews)

use breaker_api::AppState;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::warn;

use crate::{DocumentStore, StoreError, StoreResult};

/// Keeps the last saved document in memory
#[derive(Default)]
pub struct MemoryStore {
    document: Mutex<Option<AppState>>,
    saves: AtomicUsize,

    /// Configure saves to fail
    pub fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing document
    pub fn with_document(state: AppState) -> Self {
        Self {
            document: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    /// Last successfully saved document
    pub fn saved(&self) -> Option<AppState> {
        match self.document.lock() {
            Ok(doc) => doc.clone(),
            Err(_) => None,
        }
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> AppState {
        self.saved().unwrap_or_default()
    }

    fn save(&self, state: &AppState) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("Mock save failure")));
        }

        let mut doc = self.document.lock().map_err(|_| {
            warn!("Memory store lock poisoned");
            StoreError::Io(std::io::Error::other("lock poisoned"))
        })?;
        *doc = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        !self.fail_saves.load(Ordering::SeqCst) && self.document.lock().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.load(), AppState::default());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn failing_store_keeps_previous_document() {
        let mut first = AppState::default();
        first.successful_urges = 1;
        let store = MemoryStore::with_document(first.clone());

        store.set_fail_saves(true);
        let mut second = first.clone();
        second.successful_urges = 2;

        assert!(store.save(&second).is_err());
        assert!(!store.is_healthy());
        assert_eq!(store.load(), first);
    }
}
