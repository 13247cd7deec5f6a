//! Error types for Editor Session
//!
//! The session stores themselves are total: unknown identifiers and blank
//! input are silent no-ops. Errors only exist at the edges, where
//! configuration is parsed and where the runtime talks to its channel.

use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Event loop errors
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Reply delay bounds are unusable
    #[error("Invalid reply delay: min {min_ms} ms, max {max_ms} ms")]
    InvalidDelay { min_ms: u64, max_ms: u64 },

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Session event loop errors
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The event channel has no receiver anymore
    #[error("Session event channel is closed")]
    ChannelClosed,
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::ParseError(_) => {
                "The configuration file is not valid JSON for this version.".to_string()
            }
            ConfigError::InvalidDelay { .. } => {
                "Assistant reply delays must satisfy 0 < max and min <= max.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_delay_display() {
        let err = ConfigError::InvalidDelay {
            min_ms: 3000,
            max_ms: 1000,
        };
        assert!(err.to_string().contains("3000"));
        assert!(err.user_message().contains("min <= max"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let err = ConfigError::InvalidValue {
            key: "assistant.replies".to_string(),
            reason: "empty".to_string(),
        };
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Config(_)));
    }

    #[test]
    fn test_app_error_from_runtime_error() {
        let app_err: AppError = RuntimeError::ChannelClosed.into();
        assert_eq!(app_err.to_string(), "Session event channel is closed");
    }
}
