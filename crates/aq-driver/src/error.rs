//! Driver and controller errors.

use thiserror::Error;

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// `record_stop` or a bracket query without an active recording.
    #[error("No recording in progress")]
    NotRecording,

    /// `record_start` while a recording is already active.
    #[error("Recording already in progress")]
    AlreadyRecording,

    /// `play` requires the live connection.
    #[error("Cannot play a command log while the connection is simulated")]
    PlayWhileSimulated,

    /// Transport-level failure reported by the backend.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DriverError::Backend {
            message: "port closed".to_string(),
        };
        assert!(err.to_string().contains("port closed"));
    }
}
