//! Journal export
//!
//! Exports are human-readable (pretty-printed) copies of the whole document
//! meant to be handed to a share sheet or copied off the device.

use breaker_api::AppState;
use breaker_util::EXPORT_FILE_NAME;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::StoreResult;
use crate::json::write_atomic;

/// Render the document as pretty-printed JSON
pub fn render_export(state: &AppState) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Write an export into `dir`, replacing any earlier export there.
///
/// Returns the path of the written file.
pub fn export_document(state: &AppState, dir: impl AsRef<Path>) -> StoreResult<PathBuf> {
    let path = dir.as_ref().join(EXPORT_FILE_NAME);
    let json = render_export(state)?;
    write_atomic(&path, json.as_bytes())?;

    info!(path = %path.display(), bytes = json.len(), "Journal exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use breaker_api::{HabitConfig, HabitType};

    #[test]
    fn export_is_pretty_and_parseable() {
        let mut state = AppState::default();
        state.habit = HabitConfig::new(HabitType::Gambling);
        state.game_high_score = 17;

        let json = render_export(&state).unwrap();
        assert!(json.contains('\n'));

        let parsed: AppState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn export_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();

        let mut state = AppState::default();
        export_document(&state, dir.path()).unwrap();
        state.game_high_score = 3;
        let path = export_document(&state, dir.path()).unwrap();

        assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));
        let parsed: AppState = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.game_high_score, 3);
    }
}
