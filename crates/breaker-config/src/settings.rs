//! Validated settings structures

use breaker_util::{DEFAULT_DOCUMENT_NAME, TimeOfDay, default_data_dir, default_export_dir};
use std::path::PathBuf;
use std::time::Duration;

use crate::schema::RawConfig;

/// Default urge countdown length
pub const DEFAULT_URGE_MINUTES: u32 = 10;

/// Validated settings ready for use by the app wiring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage: StorageSettings,

    /// Length of the delay countdown
    pub urge_duration: Duration,

    /// Reminder times suggested before the user saves their own
    pub default_reminder_times: Vec<TimeOfDay>,

    /// Log level / EnvFilter directive
    pub log_level: String,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let minutes = raw.session.urge_minutes.unwrap_or(DEFAULT_URGE_MINUTES);

        // Validation already rejected unparseable entries
        let default_reminder_times = raw
            .reminders
            .default_times
            .map(|times| {
                times
                    .iter()
                    .filter_map(|t| TimeOfDay::parse(t).ok())
                    .collect()
            })
            .unwrap_or_else(default_reminder_times);

        Self {
            storage: StorageSettings {
                data_dir: raw.storage.data_dir.unwrap_or_else(default_data_dir),
                document_name: raw
                    .storage
                    .document_name
                    .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string()),
                export_dir: raw.storage.export_dir.unwrap_or_else(default_export_dir),
            },
            urge_duration: Duration::from_secs(minutes as u64 * 60),
            default_reminder_times,
            log_level: raw.logging.level.unwrap_or_else(|| "info".to_string()),
        }
    }

    /// Urge countdown in whole seconds
    pub fn urge_duration_secs(&self) -> u32 {
        self.urge_duration.as_secs() as u32
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            urge_duration: Duration::from_secs(DEFAULT_URGE_MINUTES as u64 * 60),
            default_reminder_times: default_reminder_times(),
            log_level: "info".to_string(),
        }
    }
}

/// Storage locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub document_name: String,
    pub export_dir: PathBuf,
}

impl StorageSettings {
    /// Full path of the journal document
    pub fn document_path(&self) -> PathBuf {
        self.data_dir.join(&self.document_name)
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            export_dir: default_export_dir(),
        }
    }
}

/// Morning, afternoon and evening check-ins
pub fn default_reminder_times() -> Vec<TimeOfDay> {
    [(9, 0), (14, 0), (20, 0)]
        .into_iter()
        .filter_map(|(h, m)| TimeOfDay::new(h, m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reminders_are_three_daily_slots() {
        let times = default_reminder_times();
        assert_eq!(times.len(), 3);
        assert_eq!(times[2].to_string(), "20:00");
    }

    #[test]
    fn document_path_joins_name() {
        let storage = StorageSettings {
            data_dir: PathBuf::from("/data"),
            document_name: "journal.json".into(),
            export_dir: PathBuf::from("/tmp"),
        };
        assert_eq!(storage.document_path(), PathBuf::from("/data/journal.json"));
    }
}
