//! Plugin settings.
//!
//! Selects the engine transport and where the Vale binary and config live.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use prosecheck_engine::DEFAULT_SERVER_URL;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SettingsError;

/// Which transport runs checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Pipe documents through a local Vale binary.
    #[default]
    Cli,
    /// Post documents to a running Vale Server.
    Server,
}

/// Vale Server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    #[serde(default = "default_server_url")]
    pub url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
        }
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

/// Local binary settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliSettings {
    /// Use the binary and config under the data directory.
    #[serde(default = "default_managed")]
    pub managed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vale_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            managed: default_managed(),
            vale_path: None,
            config_path: None,
        }
    }
}

fn default_managed() -> bool {
    true
}

/// Binary and configuration file used by the local transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnginePaths {
    pub binary: PathBuf,
    pub config: PathBuf,
}

/// Settings as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(rename = "type", default)]
    pub kind: EngineKind,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub cli: CliSettings,

    /// Upper bound for a single check. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_timeout_ms: Option<u64>,

    /// Directory relative unmanaged paths resolve against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from a JSON file. A missing file yields defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let mut settings = match fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if let Some(parent) = path.parent() {
            settings.base_dir = Some(parent.to_path_buf());
        }

        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn check_timeout(&self) -> Option<Duration> {
        self.check_timeout_ms.map(Duration::from_millis)
    }

    /// Resolves the local binary and config paths.
    ///
    /// Managed mode always uses the data directory. Unmanaged paths that are
    /// unset fall back to the managed location; relative ones resolve
    /// against [`Settings::base_dir`].
    pub fn engine_paths(&self, data_dir: &Path) -> EnginePaths {
        let managed_binary = managed_binary_path(data_dir);
        let managed_config = managed_config_path(data_dir);

        if self.cli.managed {
            return EnginePaths {
                binary: managed_binary,
                config: managed_config,
            };
        }

        EnginePaths {
            binary: self
                .cli
                .vale_path
                .as_deref()
                .map_or(managed_binary, |p| self.resolve(p)),
            config: self
                .cli
                .config_path
                .as_deref()
                .map_or(managed_config, |p| self.resolve(p)),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// `<data dir>/prosecheck`, if the platform has a data directory.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("prosecheck"))
}

/// Where managed mode keeps the Vale binary.
pub fn managed_binary_path(data_dir: &Path) -> PathBuf {
    let name = if cfg!(windows) { "vale.exe" } else { "vale" };
    data_dir.join("bin").join(name)
}

/// Where managed mode keeps `.vale.ini`.
pub fn managed_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".vale.ini")
}
