//! Configuration parsing and validation for breaker
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Storage locations for the journal document and exports
//! - Urge countdown length and default reminder times
//! - Validation with clear error messages
//!
//! Everything the user edits (reminders, home address, ...) lives in the
//! journal document, not here. This file only carries install-level knobs.

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load configuration, falling back to defaults when the file does not exist.
///
/// A file that exists but is invalid is still an error.
pub fn load_config_or_default(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(Settings::default());
    }
    load_config(path)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Settings> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Ok(Settings::from_raw(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn parse_minimal_config() {
        let settings = parse_config("config_version = 1").unwrap();
        assert_eq!(settings.urge_duration, Duration::from_secs(600));
        assert_eq!(settings.default_reminder_times.len(), 3);
        assert_eq!(settings.storage.document_name, "app_state.json");
    }

    #[test]
    fn parse_full_config() {
        let config = r#"
            config_version = 1

            [storage]
            data_dir = "/var/lib/breaker"
            document_name = "journal.json"
            export_dir = "/tmp/exports"

            [session]
            urge_minutes = 5

            [reminders]
            default_times = ["08:30", "21:15"]

            [logging]
            level = "debug"
        "#;

        let settings = parse_config(config).unwrap();
        assert_eq!(
            settings.storage.document_path(),
            PathBuf::from("/var/lib/breaker/journal.json")
        );
        assert_eq!(settings.storage.export_dir, PathBuf::from("/tmp/exports"));
        assert_eq!(settings.urge_duration_secs(), 300);
        assert_eq!(settings.default_reminder_times.len(), 2);
        assert_eq!(settings.default_reminder_times[1].to_string(), "21:15");
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn reject_wrong_version() {
        let result = parse_config("config_version = 99");
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_values() {
        let config = r#"
            config_version = 1

            [session]
            urge_minutes = 500
        "#;

        let result = parse_config(config);
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.urge_duration, Duration::from_secs(600));
    }

    #[test]
    fn existing_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "config_version = [").unwrap();

        assert!(matches!(
            load_config_or_default(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
