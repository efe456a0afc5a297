//! Error types for engine invocations.

use thiserror::Error;

/// Errors surfaced by a [`DiagnosticEngine`](crate::DiagnosticEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// Nothing is listening at the configured server address.
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// The server answered with an error status.
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Any other transport failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured server address is not a valid base URL.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// The engine produced output that is not an alert mapping.
    #[error("Malformed engine output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    /// The engine process could not be started.
    #[error("Failed to spawn engine: {0}")]
    Spawn(#[source] std::io::Error),

    /// Reading from or writing to the engine process failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The engine exited with a code outside of its contract.
    #[error("child exited with code {0}")]
    UnexpectedExit(i32),

    /// The engine was terminated by a signal.
    #[error("child was terminated by a signal")]
    Terminated,
}

impl EngineError {
    /// Returns true when the remote engine could not be reached at all.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, EngineError::ConnectionRefused(_))
    }
}
