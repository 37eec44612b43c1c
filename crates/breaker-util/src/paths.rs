//! Default paths for breaker components
//!
//! Paths are user-writable by default:
//! - Data: `$BREAKER_DATA_DIR`, `$XDG_DATA_HOME/breaker` or `~/.local/share/breaker`
//! - Config: `$XDG_CONFIG_HOME/breaker/config.toml` or `~/.config/breaker/config.toml`
//! - Exports: the OS temp directory (shared from there, never kept)

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const BREAKER_DATA_DIR_ENV: &str = "BREAKER_DATA_DIR";

/// File name of the journal document within the data directory
pub const DEFAULT_DOCUMENT_NAME: &str = "app_state.json";

/// Fixed file name used for exported journals
pub const EXPORT_FILE_NAME: &str = "breaker-export.json";

/// Application subdirectory name
const APP_DIR: &str = "breaker";

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$BREAKER_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/breaker` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/breaker` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(BREAKER_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking BREAKER_DATA_DIR.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    std::env::temp_dir().join(APP_DIR).join("data")
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join("config.toml");
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml");
    }

    std::env::temp_dir().join(APP_DIR).join("config.toml")
}

/// Default directory for exported journals
pub fn default_export_dir() -> PathBuf {
    std::env::temp_dir()
}
