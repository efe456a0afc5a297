//! Typed view over the Vale configuration document.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use prosecheck_engine::Severity;
use tracing::warn;

use crate::error::IniSyntaxError;
use crate::ini::IniDocument;

/// Global key holding the styles directory, relative to the config file.
pub const STYLES_PATH_KEY: &str = "StylesPath";

/// Per-format key listing the enabled styles.
pub const BASED_ON_STYLES_KEY: &str = "BasedOnStyles";

/// Override value that turns a rule off.
pub const DISABLED_TOKEN: &str = "NO";

/// Override value that turns a rule on at its default severity.
pub const ENABLED_TOKEN: &str = "YES";

/// Section name selecting which files a block applies to, e.g. `*.md`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatSelector(String);

impl FormatSelector {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// The Markdown block every default configuration carries.
    pub fn markdown() -> Self {
        Self::new("*.md")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FormatSelector {
    fn default() -> Self {
        Self::markdown()
    }
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of style names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSet(IndexSet<String>);

impl StyleSet {
    /// Parses a comma separated list; blanks and repeats are dropped.
    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, style: &str) -> bool {
        self.0.contains(style)
    }

    /// Appends `style`. Returns false if it was already present.
    pub fn insert(&mut self, style: &str) -> bool {
        self.0.insert(style.to_string())
    }

    /// Removes `style` keeping the order of the rest. Returns false if absent.
    pub fn remove(&mut self, style: &str) -> bool {
        self.0.shift_remove(style)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, style) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(style)?;
        }
        Ok(())
    }
}

/// Value stored under a `Style.Rule` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideValue {
    /// `NO`
    Disabled,
    /// `YES`
    Enabled,
    Severity(Severity),
}

impl OverrideValue {
    pub fn as_str(self) -> &'static str {
        match self {
            OverrideValue::Disabled => DISABLED_TOKEN,
            OverrideValue::Enabled => ENABLED_TOKEN,
            OverrideValue::Severity(severity) => severity.as_str(),
        }
    }
}

impl FromStr for OverrideValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DISABLED_TOKEN => Ok(OverrideValue::Disabled),
            ENABLED_TOKEN => Ok(OverrideValue::Enabled),
            other => other
                .parse::<Severity>()
                .map(OverrideValue::Severity)
                .map_err(|e| e.to_string()),
        }
    }
}

/// What the user wants for a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDecision {
    /// Remove any override so the style's own setting applies.
    UseDefault,
    Disabled,
    Severity(Severity),
}

impl FromStr for RuleDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(RuleDecision::UseDefault),
            "off" | "disabled" => Ok(RuleDecision::Disabled),
            other => other
                .parse::<Severity>()
                .map(RuleDecision::Severity)
                .map_err(|_| {
                    format!(
                        "expected one of default, off, suggestion, warning, error; got {}",
                        other
                    )
                }),
        }
    }
}

/// A rule override found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOverride {
    /// Rule name without the style prefix.
    pub rule: String,
    /// `None` means the style's default severity.
    pub severity: Option<Severity>,
    pub disabled: bool,
}

impl RuleOverride {
    pub fn decision(&self) -> RuleDecision {
        match (self.disabled, self.severity) {
            (true, _) => RuleDecision::Disabled,
            (false, Some(severity)) => RuleDecision::Severity(severity),
            (false, None) => RuleDecision::UseDefault,
        }
    }
}

/// The `.vale.ini` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    ini: IniDocument,
}

impl ConfigDocument {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration written when none exists yet.
    pub fn initial() -> Self {
        let mut doc = Self::new();
        doc.ini.set_global(STYLES_PATH_KEY, "styles");
        doc.ini
            .section_mut(FormatSelector::markdown().as_str())
            .insert(BASED_ON_STYLES_KEY.to_string(), "Vale".to_string());
        doc
    }

    pub fn parse(input: &str) -> Result<Self, IniSyntaxError> {
        Ok(Self {
            ini: IniDocument::parse(input)?,
        })
    }

    pub fn ini(&self) -> &IniDocument {
        &self.ini
    }

    /// `StylesPath` as written, if set and not blank.
    pub fn styles_path(&self) -> Option<&str> {
        self.ini
            .global(STYLES_PATH_KEY)
            .filter(|path| !path.trim().is_empty())
    }

    pub fn based_on_styles(&self, selector: &FormatSelector) -> StyleSet {
        self.ini
            .section(selector.as_str())
            .and_then(|entries| entries.get(BASED_ON_STYLES_KEY))
            .map(|list| StyleSet::parse(list))
            .unwrap_or_default()
    }

    fn set_based_on_styles(&mut self, selector: &FormatSelector, styles: &StyleSet) {
        self.ini
            .section_mut(selector.as_str())
            .insert(BASED_ON_STYLES_KEY.to_string(), styles.to_string());
    }

    pub fn is_style_enabled(&self, selector: &FormatSelector, style: &str) -> bool {
        self.based_on_styles(selector).contains(style)
    }

    /// Adds `style` to `BasedOnStyles`. Returns whether the document changed.
    pub fn enable_style(&mut self, selector: &FormatSelector, style: &str) -> bool {
        let mut styles = self.based_on_styles(selector);
        if !styles.insert(style) {
            return false;
        }
        self.set_based_on_styles(selector, &styles);
        true
    }

    /// Removes `style` from `BasedOnStyles`. Returns whether the document changed.
    pub fn disable_style(&mut self, selector: &FormatSelector, style: &str) -> bool {
        let mut styles = self.based_on_styles(selector);
        if !styles.remove(style) {
            return false;
        }
        self.set_based_on_styles(selector, &styles);
        true
    }

    /// Applies `decision` to `Style.Rule`. Returns whether the document changed.
    pub fn set_rule_override(
        &mut self,
        selector: &FormatSelector,
        style: &str,
        rule: &str,
        decision: RuleDecision,
    ) -> bool {
        let key = format!("{}.{}", style, rule);

        let value = match decision {
            RuleDecision::UseDefault => {
                // Only touch the section if it exists; deleting never creates one.
                return self
                    .ini
                    .section(selector.as_str())
                    .is_some_and(|entries| entries.contains_key(&key))
                    && self
                        .ini
                        .section_mut(selector.as_str())
                        .shift_remove(&key)
                        .is_some();
            }
            RuleDecision::Disabled => OverrideValue::Disabled,
            RuleDecision::Severity(severity) => OverrideValue::Severity(severity),
        };

        let entries = self.ini.section_mut(selector.as_str());
        if entries.get(&key).map(String::as_str) == Some(value.as_str()) {
            return false;
        }
        entries.insert(key, value.as_str().to_string());
        true
    }

    /// Overrides configured for rules of `style`.
    pub fn rule_overrides(&self, selector: &FormatSelector, style: &str) -> Vec<RuleOverride> {
        let Some(entries) = self.ini.section(selector.as_str()) else {
            return Vec::new();
        };
        let prefix = format!("{}.", style);

        entries
            .iter()
            .filter_map(|(key, value)| {
                let rule = key.strip_prefix(&prefix)?;
                match value.parse::<OverrideValue>() {
                    Ok(OverrideValue::Disabled) => Some(RuleOverride {
                        rule: rule.to_string(),
                        severity: None,
                        disabled: true,
                    }),
                    Ok(OverrideValue::Enabled) => Some(RuleOverride {
                        rule: rule.to_string(),
                        severity: None,
                        disabled: false,
                    }),
                    Ok(OverrideValue::Severity(severity)) => Some(RuleOverride {
                        rule: rule.to_string(),
                        severity: Some(severity),
                        disabled: false,
                    }),
                    Err(e) => {
                        warn!("Ignoring override {} = {}: {}", key, value, e);
                        None
                    }
                }
            })
            .collect()
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ini, f)
    }
}
