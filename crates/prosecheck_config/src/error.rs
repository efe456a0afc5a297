//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading, editing or writing the Vale configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is not a well-formed INI document.
    #[error("Failed to parse {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be persisted. The previous file is untouched.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration has no `StylesPath`.
    #[error("No StylesPath configured in {0}")]
    NoStylesPath(PathBuf),

    /// Listing or removing style files failed.
    #[error("Style directory error at {path}: {source}")]
    StyleDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Installing a style package failed.
    #[error("Failed to install style {style}: {message}")]
    StyleInstall { style: String, message: String },
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn style_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StyleDir {
            path: path.into(),
            source,
        }
    }
}

/// Line-level parse failure, before a path is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct IniSyntaxError {
    pub line: usize,
    pub message: String,
}

impl IniSyntaxError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn at(self, path: impl Into<PathBuf>) -> ConfigError {
        ConfigError::Parse {
            path: path.into(),
            line: self.line,
            message: self.message,
        }
    }
}
