//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    #[serde(default)]
    pub storage: RawStorageConfig,

    #[serde(default)]
    pub session: RawSessionConfig,

    #[serde(default)]
    pub reminders: RawRemindersConfig,

    #[serde(default)]
    pub logging: RawLoggingConfig,
}

/// Where the journal document and exports live
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawStorageConfig {
    /// Data directory for the journal document
    pub data_dir: Option<PathBuf>,

    /// File name of the journal document (default: app_state.json)
    pub document_name: Option<String>,

    /// Directory exported journals are written to (default: OS temp dir)
    pub export_dir: Option<PathBuf>,
}

/// Urge session settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSessionConfig {
    /// Length of the delay countdown in minutes (default: 10)
    pub urge_minutes: Option<u32>,
}

/// Reminder defaults offered before the user picks their own
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRemindersConfig {
    /// Times in HH:MM format
    pub default_times: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLoggingConfig {
    /// Log level or EnvFilter directive (default: info)
    pub level: Option<String>,
}
