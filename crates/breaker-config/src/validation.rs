//! Configuration validation

use breaker_util::TimeOfDay;
use thiserror::Error;

use crate::schema::RawConfig;

/// Allowed range for the urge countdown, in minutes
pub const URGE_MINUTES_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid time format '{value}': {message}")]
    InvalidTimeFormat { value: String, message: String },

    #[error("urge_minutes must be between 1 and 120, got {0}")]
    UrgeMinutesOutOfRange(u32),

    #[error("document_name cannot be empty or contain a path separator: '{0}'")]
    InvalidDocumentName(String),

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(name) = &config.storage.document_name
        && (name.trim().is_empty() || name.contains('/') || name.contains('\\'))
    {
        errors.push(ValidationError::InvalidDocumentName(name.clone()));
    }

    if let Some(minutes) = config.session.urge_minutes
        && !URGE_MINUTES_RANGE.contains(&minutes)
    {
        errors.push(ValidationError::UrgeMinutesOutOfRange(minutes));
    }

    if let Some(times) = &config.reminders.default_times {
        for value in times {
            if let Err(message) = TimeOfDay::parse(value) {
                errors.push(ValidationError::InvalidTimeFormat {
                    value: value.clone(),
                    message,
                });
            }
        }
    }

    if let Some(level) = &config.logging.level
        && level.trim().is_empty()
    {
        errors.push(ValidationError::InvalidLogLevel(level.clone()));
    }

    errors
}
