//! Error types for buildstamp.
//!
//! Metadata sources never surface these to the build; they are mapped to
//! placeholders where they occur. Only configuration and output errors
//! reach the caller.

use thiserror::Error;

/// Central error type for all buildstamp operations.
#[derive(Debug, Error)]
pub enum StampError {
    /// Configuration error (invalid environment values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// External command could not be spawned, exited non-zero, or printed nothing usable.
    #[error("Command error: {0}")]
    Command(String),

    /// IO error while writing rendered output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StampError {
    /// Log error with structured fields using tracing.
    pub fn log_with_operation(&self, operation: &str) {
        match self {
            Self::Command(_) => {
                tracing::debug!(error = %self, operation = operation, "Metadata source unavailable");
            }
            Self::Config(_) => {
                tracing::error!(error = %self, operation = operation, "Configuration error");
            }
            Self::Io(_) | Self::Json(_) => {
                tracing::error!(error = %self, operation = operation, "Output error");
            }
        }
    }
}

/// Result type alias for buildstamp operations.
pub type Result<T> = std::result::Result<T, StampError>;
