//! Store trait definitions

use breaker_api::AppState;

use crate::StoreResult;

/// Load/save contract for the journal document
pub trait DocumentStore: Send + Sync {
    /// Load the document.
    ///
    /// Never fails: a missing, unreadable or undecodable document yields
    /// `AppState::default()`.
    fn load(&self) -> AppState;

    /// Replace the whole document. Readers never observe a partial write.
    fn save(&self, state: &AppState) -> StoreResult<()>;

    /// Check if the store is usable
    fn is_healthy(&self) -> bool;
}
