//! Persistence layer for breaker
//!
//! Provides:
//! - The `DocumentStore` load/save contract
//! - Atomic JSON file store and an in-memory store for tests
//! - A persist writer that serializes saves and keeps only the newest snapshot
//! - Journal export to a shareable file

mod export;
mod json;
mod memory;
mod traits;
mod writer;

pub use export::*;
pub use json::*;
pub use memory::*;
pub use traits::*;
pub use writer::*;

use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace {path}: {message}")]
    Persist { path: String, message: String },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
