//! Command implementations

pub mod check;
pub mod init;
pub mod rules;
pub mod styles;

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result, miette};
use prosecheck_config::{ConfigStore, FormatSelector};
use prosecheck_core::{Settings, default_data_dir};
use tracing::debug;

use crate::cli::Cli;

/// Resolved settings shared by every command.
pub struct Context {
    pub settings: Settings,
    pub data_dir: PathBuf,
    pub selector: FormatSelector,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()
                .ok_or_else(|| miette!("Could not determine a data directory; use --data-dir"))?,
        };

        let settings_path = cli
            .settings
            .clone()
            .unwrap_or_else(|| data_dir.join("settings.json"));
        let settings = Settings::from_file(&settings_path).into_diagnostic()?;
        debug!(
            "Loaded settings from {} ({:?} engine)",
            settings_path.display(),
            settings.kind
        );

        Ok(Self {
            settings,
            data_dir,
            selector: FormatSelector::new(cli.selector.clone()),
        })
    }

    /// Store over the `.vale.ini` the settings point at.
    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(self.settings.engine_paths(&self.data_dir).config)
    }
}
