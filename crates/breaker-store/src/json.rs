//! JSON file store implementation

use breaker_api::AppState;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{DocumentStore, StoreError, StoreResult};

/// Journal document stored as one JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use the document at `path`. Nothing is read or created until the
    /// first `load`/`save`.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> AppState {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No journal document yet, starting fresh");
                return AppState::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Journal document unreadable, using defaults");
                return AppState::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => {
                debug!(path = %self.path.display(), bytes = bytes.len(), "Journal document loaded");
                state
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Journal document corrupt, using defaults");
                AppState::default()
            }
        }
    }

    fn save(&self, state: &AppState) -> StoreResult<()> {
        let json = serde_json::to_vec(state)?;
        write_atomic(&self.path, &json)?;

        debug!(path = %self.path.display(), bytes = json.len(), "Journal document saved");
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => match std::fs::metadata(dir) {
                Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
                // Created on first save
                Err(e) => e.kind() == ErrorKind::NotFound,
            },
            _ => true,
        }
    }
}

/// Write `bytes` to `path` by writing a sibling temp file and renaming it
/// over the target.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| StoreError::Persist {
        path: path.display().to_string(),
        message: e.error.to_string(),
    })?;

    Ok(())
}
