//! Background persistence of journal snapshots
//!
//! The journal publishes a fresh snapshot on a `watch` channel after every
//! mutation. The writer saves whatever is newest whenever the previous save
//! finishes, so bursts of mutations collapse into a handful of writes and
//! an older snapshot can never overwrite a newer one.

use breaker_api::AppState;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::DocumentStore;

/// Serializes saves of published snapshots
pub struct PersistWriter {
    store: Arc<dyn DocumentStore>,
    snapshots: watch::Receiver<Arc<AppState>>,
}

impl PersistWriter {
    pub fn new(store: Arc<dyn DocumentStore>, snapshots: watch::Receiver<Arc<AppState>>) -> Self {
        Self { store, snapshots }
    }

    /// Run on the current tokio runtime.
    ///
    /// The task ends after the sending side is dropped and the last unseen
    /// snapshot has been written.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        debug!("Persist writer started");

        // An unseen snapshot is still delivered after the sender is gone
        while self.snapshots.changed().await.is_ok() {
            let snapshot = Arc::clone(&self.snapshots.borrow_and_update());
            let store = Arc::clone(&self.store);

            let result = tokio::task::spawn_blocking(move || store.save(&snapshot)).await;
            match result {
                Ok(Ok(())) => debug!("Snapshot persisted"),
                Ok(Err(e)) => warn!(error = %e, "Failed to persist snapshot"),
                Err(e) => warn!(error = %e, "Persist task panicked"),
            }
        }

        info!("Persist writer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn state_with_urges(n: u32) -> Arc<AppState> {
        let mut state = AppState::default();
        state.successful_urges = n;
        Arc::new(state)
    }

    #[tokio::test]
    async fn test_final_snapshot_is_flushed() {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = watch::channel(state_with_urges(0));
        let handle = PersistWriter::new(store.clone(), rx).spawn();

        for n in 1..=5 {
            tx.send_replace(state_with_urges(n));
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.saved().unwrap().successful_urges, 5);
        assert!(store.save_count() >= 1);
        assert!(store.save_count() <= 5);
    }

    #[tokio::test]
    async fn test_initial_value_is_not_saved() {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = watch::channel(state_with_urges(0));
        let handle = PersistWriter::new(store.clone(), rx).spawn();

        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.save_count(), 0);
        assert!(store.saved().is_none());
    }

    #[tokio::test]
    async fn test_failed_save_does_not_stop_writer() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_saves(true);

        let (tx, rx) = watch::channel(state_with_urges(0));
        let handle = PersistWriter::new(store.clone(), rx).spawn();

        tx.send_replace(state_with_urges(1));
        // Let the failing save run
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        store.set_fail_saves(false);
        tx.send_replace(state_with_urges(2));
        drop(tx);
        handle.await.unwrap();

        assert_eq!(store.saved().unwrap().successful_urges, 2);
    }
}
