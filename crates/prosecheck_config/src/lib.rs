//! Vale configuration management.
//!
//! Reads and edits `.vale.ini`: which styles are enabled for a file format,
//! per-rule severity overrides, and the installed style packages under
//! `StylesPath`.

mod document;
mod error;
mod ini;
mod store;
mod styles;

pub use document::{
    BASED_ON_STYLES_KEY, ConfigDocument, DISABLED_TOKEN, ENABLED_TOKEN, FormatSelector,
    OverrideValue, RuleDecision, RuleOverride, STYLES_PATH_KEY, StyleSet,
};
pub use error::{ConfigError, IniSyntaxError};
pub use ini::{Entries, IniDocument};
pub use store::ConfigStore;
pub use styles::{BUILTIN_STYLE, Style, StyleInstaller, StyleStatus, catalog, find_style};
