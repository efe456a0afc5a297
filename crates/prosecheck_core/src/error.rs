//! Check and settings error types.

use std::path::PathBuf;
use std::time::Duration;

use prosecheck_engine::EngineError;
use thiserror::Error;

/// Errors that can end a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The configured Vale binary is not a regular file.
    #[error("Vale binary not found at {}", .0.display())]
    MissingEngineBinary(PathBuf),

    /// The configured `.vale.ini` is not a regular file.
    #[error("Vale config not found at {}", .0.display())]
    MissingConfigFile(PathBuf),

    /// The engine itself failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The optional check timeout elapsed.
    #[error("Check timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),

    /// The task running the check ended without an outcome.
    #[error("Check aborted: {0}")]
    Aborted(String),
}

impl CheckError {
    /// Returns true when the Vale Server could not be reached.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, CheckError::Engine(e) if e.is_connection_refused())
    }

    /// Returns true when the failure means Vale has not been set up yet.
    pub fn needs_onboarding(&self) -> bool {
        matches!(
            self,
            CheckError::MissingEngineBinary(_) | CheckError::MissingConfigFile(_)
        )
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        if self.is_connection_refused() {
            "Couldn't connect to Vale Server.".to_string()
        } else {
            self.to_string()
        }
    }
}

/// Errors raised while loading plugin settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings are not valid JSON for the expected shape.
    #[error("Invalid settings: {0}")]
    Invalid(#[from] serde_json::Error),

    /// No data directory could be determined for managed mode.
    #[error("Could not determine a data directory; pass one explicitly")]
    NoDataDir,

    /// The configured server URL was rejected.
    #[error("Invalid settings: {0}")]
    Engine(#[from] EngineError),
}
