//! Disk-backed access to `.vale.ini`.
//!
//! The file may be edited by other programs at any time, so nothing is
//! cached: every operation reads the current file, and every mutation is a
//! reload, an in-memory edit and a whole-document rewrite.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::document::{ConfigDocument, FormatSelector, RuleDecision, RuleOverride};
use crate::error::ConfigError;
use crate::styles::{BUILTIN_STYLE, Style, StyleInstaller, StyleStatus, is_safe_style_name};

/// Reads and edits one Vale configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// True if the configuration path is a regular file.
    pub fn config_exists(&self) -> bool {
        fs::metadata(&self.config_path).is_ok_and(|m| m.is_file())
    }

    /// Loads the current document. A missing file is an empty document.
    pub fn load(&self) -> Result<ConfigDocument, ConfigError> {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} does not exist yet", self.config_path.display());
                return Ok(ConfigDocument::new());
            }
            Err(e) => return Err(ConfigError::read(&self.config_path, e)),
        };

        ConfigDocument::parse(&content).map_err(|e| e.at(&self.config_path))
    }

    /// Replaces the file with `doc`.
    ///
    /// The document is written to a sibling temp file and renamed over the
    /// target, so a failed write leaves the previous content in place.
    pub fn save(&self, doc: &ConfigDocument) -> Result<(), ConfigError> {
        // Write through symlinks instead of replacing them.
        let target = fs::canonicalize(&self.config_path).unwrap_or_else(|_| self.config_path.clone());
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&parent).map_err(|e| ConfigError::write(&target, e))?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| ConfigError::write(&target, e))?;
        tmp.write_all(doc.to_string().as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| ConfigError::write(&target, e))?;

        if let Ok(meta) = fs::metadata(&target) {
            fs::set_permissions(tmp.path(), meta.permissions())
                .map_err(|e| ConfigError::write(&target, e))?;
        }

        tmp.persist(&target)
            .map_err(|e| ConfigError::write(&target, e.error))?;

        info!("Updated {}", target.display());
        Ok(())
    }

    /// Reload, apply `edit`, and persist if it reports a change.
    fn update<F>(&self, edit: F) -> Result<bool, ConfigError>
    where
        F: FnOnce(&mut ConfigDocument) -> bool,
    {
        let mut doc = self.load()?;
        let changed = edit(&mut doc);
        if changed {
            self.save(&doc)?;
        } else {
            debug!("{} already up to date", self.config_path.display());
        }
        Ok(changed)
    }

    pub fn is_style_enabled(
        &self,
        selector: &FormatSelector,
        style: &str,
    ) -> Result<bool, ConfigError> {
        Ok(self.load()?.is_style_enabled(selector, style))
    }

    /// Enabled styles in configured order.
    pub fn enabled_styles(&self, selector: &FormatSelector) -> Result<Vec<String>, ConfigError> {
        Ok(self
            .load()?
            .based_on_styles(selector)
            .iter()
            .map(str::to_string)
            .collect())
    }

    /// Adds `style` to `BasedOnStyles`. Returns whether the file changed.
    pub fn enable_style(&self, selector: &FormatSelector, style: &str) -> Result<bool, ConfigError> {
        self.update(|doc| doc.enable_style(selector, style))
    }

    /// Removes `style` from `BasedOnStyles`. Returns whether the file changed.
    pub fn disable_style(
        &self,
        selector: &FormatSelector,
        style: &str,
    ) -> Result<bool, ConfigError> {
        self.update(|doc| doc.disable_style(selector, style))
    }

    /// Applies `decision` to `style.rule`. Returns whether the file changed.
    pub fn set_rule_override(
        &self,
        selector: &FormatSelector,
        style: &str,
        rule: &str,
        decision: RuleDecision,
    ) -> Result<bool, ConfigError> {
        self.update(|doc| doc.set_rule_override(selector, style, rule, decision))
    }

    pub fn list_configured_rules(
        &self,
        selector: &FormatSelector,
        style: &str,
    ) -> Result<Vec<RuleOverride>, ConfigError> {
        Ok(self.load()?.rule_overrides(selector, style))
    }

    /// The styles directory, resolved against the config file's directory.
    pub fn styles_path(&self) -> Result<Option<PathBuf>, ConfigError> {
        let doc = self.load()?;
        Ok(doc.styles_path().map(|styles| {
            self.config_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(styles)
        }))
    }

    fn require_styles_path(&self) -> Result<PathBuf, ConfigError> {
        self.styles_path()?
            .ok_or_else(|| ConfigError::NoStylesPath(self.config_path.clone()))
    }

    fn style_dir(&self, style: &str) -> Result<PathBuf, ConfigError> {
        let styles = self.require_styles_path()?;
        if !is_safe_style_name(style) {
            return Err(ConfigError::style_dir(
                styles.join(style),
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid style name"),
            ));
        }
        Ok(styles.join(style))
    }

    /// Style directories present on disk, plus the built-in style.
    pub fn installed_styles(&self) -> Result<Vec<String>, ConfigError> {
        let mut installed = Vec::new();

        if let Some(styles) = self.styles_path()? {
            match fs::read_dir(&styles) {
                Ok(entries) => {
                    for entry in entries {
                        let entry = entry.map_err(|e| ConfigError::style_dir(&styles, e))?;
                        if entry.file_type().is_ok_and(|t| t.is_dir()) {
                            installed.push(entry.file_name().to_string_lossy().into_owned());
                        }
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(ConfigError::style_dir(&styles, e)),
            }
        }

        installed.sort();
        if !installed.iter().any(|s| s == BUILTIN_STYLE) {
            installed.push(BUILTIN_STYLE.to_string());
        }
        Ok(installed)
    }

    /// Rule names shipped by an installed style (its `.yml` files).
    pub fn rules_for_style(&self, style: &str) -> Result<Vec<String>, ConfigError> {
        let dir = self.style_dir(style)?;
        let entries = fs::read_dir(&dir).map_err(|e| ConfigError::style_dir(&dir, e))?;

        let mut rules = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ConfigError::style_dir(&dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == "yml")
                && let Some(stem) = path.file_stem()
            {
                rules.push(stem.to_string_lossy().into_owned());
            }
        }
        rules.sort();
        Ok(rules)
    }

    /// Installs `style` unless its directory already exists.
    pub async fn install_style(
        &self,
        style: &Style,
        installer: &dyn StyleInstaller,
    ) -> Result<(), ConfigError> {
        let dir = self.style_dir(&style.name)?;
        if dir.is_dir() {
            debug!("{} is already installed", style.name);
            return Ok(());
        }

        let styles = self.require_styles_path()?;
        fs::create_dir_all(&styles).map_err(|e| ConfigError::style_dir(&styles, e))?;

        installer
            .install(style, &styles)
            .await
            .map_err(|e| ConfigError::StyleInstall {
                style: style.name.clone(),
                message: e.to_string(),
            })?;

        info!("Installed {}", style.name);
        Ok(())
    }

    /// Removes an installed style. Missing styles are not an error.
    pub fn uninstall_style(&self, style: &str) -> Result<(), ConfigError> {
        let dir = self.style_dir(style)?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                info!("Removed {}", dir.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::style_dir(&dir, e)),
        }
    }

    /// Writes the initial configuration if none exists and creates the
    /// styles directory.
    pub fn initialize(&self) -> Result<(), ConfigError> {
        if !self.config_exists() {
            self.save(&ConfigDocument::initial())?;
        }

        if let Some(styles) = self.styles_path()? {
            fs::create_dir_all(&styles).map_err(|e| ConfigError::style_dir(&styles, e))?;
        }
        Ok(())
    }

    /// Every catalog style with its enabled and installed state.
    pub fn catalog_status(
        &self,
        selector: &FormatSelector,
        catalog: Vec<Style>,
    ) -> Result<Vec<StyleStatus>, ConfigError> {
        let doc = self.load()?;
        let enabled = doc.based_on_styles(selector);
        let installed = self.installed_styles()?;

        Ok(catalog
            .into_iter()
            .map(|style| StyleStatus {
                enabled: enabled.contains(&style.name),
                installed: installed.contains(&style.name),
                style,
            })
            .collect())
    }
}
