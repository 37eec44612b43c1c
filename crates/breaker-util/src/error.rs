//! Error types for breaker

use thiserror::Error;

/// Core error type for breaker operations
#[derive(Debug, Error)]
pub enum BreakerError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Signal {signal} is not valid during step {step}")]
    UnexpectedSignal { step: String, signal: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BreakerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn unexpected_signal(step: impl std::fmt::Debug, signal: impl std::fmt::Debug) -> Self {
        Self::UnexpectedSignal {
            step: format!("{:?}", step),
            signal: format!("{:?}", signal),
        }
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BreakerError>;
