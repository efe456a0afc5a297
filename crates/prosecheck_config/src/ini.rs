//! Minimal INI codec for `.vale.ini`.
//!
//! Only the subset Vale uses is supported: global `key = value` pairs followed
//! by `[section]` blocks. Comments (`;` or `#`) are accepted on input and not
//! written back. Entry order is preserved, and values that need quotes to
//! round-trip are written quoted.

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;

use crate::error::IniSyntaxError;

/// Ordered key/value pairs of one section.
pub type Entries = IndexMap<String, String>;

/// Parsed INI document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    globals: Entries,
    sections: IndexMap<String, Entries>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `input`, reporting the first malformed line.
    pub fn parse(input: &str) -> Result<Self, IniSyntaxError> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        let mut doc = Self::new();
        let mut current: Option<String> = None;

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = section_name(rest)
                    .ok_or_else(|| IniSyntaxError::new(line_no, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(IniSyntaxError::new(line_no, "empty section name"));
                }
                doc.sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| IniSyntaxError::new(line_no, "expected `key = value`"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(IniSyntaxError::new(line_no, "missing key"));
            }

            let entries = match &current {
                Some(section) => doc.sections.entry(section.clone()).or_default(),
                None => &mut doc.globals,
            };
            entries.insert(key.to_string(), unquote(value.trim()).to_string());
        }

        Ok(doc)
    }

    pub fn global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(String::as_str)
    }

    pub fn set_global(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.globals.insert(key.into(), value.into());
    }

    pub fn section(&self, name: &str) -> Option<&Entries> {
        self.sections.get(name)
    }

    /// Returns the section, creating an empty one at the end if needed.
    pub fn section_mut(&mut self, name: &str) -> &mut Entries {
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Entries)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_entries(f, &self.globals)?;

        for (idx, (name, entries)) in self.sections.iter().enumerate() {
            if idx > 0 || !self.globals.is_empty() {
                writeln!(f)?;
            }
            writeln!(f, "[{}]", name)?;
            write_entries(f, entries)?;
        }

        Ok(())
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &Entries) -> fmt::Result {
    for (key, value) in entries {
        if value.is_empty() {
            writeln!(f, "{} =", key)?;
        } else {
            writeln!(f, "{} = {}", key, quote(value))?;
        }
    }
    Ok(())
}

/// Name of a `[section]` header given the text after `[`.
///
/// The header ends at the first `]` followed only by whitespace or a comment,
/// so `[*.md] ; markdown` and `[*.[mM]d]` both parse.
fn section_name(rest: &str) -> Option<&str> {
    rest.match_indices(']').map(|(idx, _)| idx).find_map(|idx| {
        let tail = rest[idx + 1..].trim_start();
        (tail.is_empty() || tail.starts_with(';') || tail.starts_with('#')).then(|| &rest[..idx])
    })
}

/// Quotes values that would not survive a re-parse written bare.
fn quote(value: &str) -> Cow<'_, str> {
    let padded = value.trim() != value;
    let looks_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if padded || looks_quoted {
        Cow::Owned(format!("\"{}\"", value))
    } else {
        Cow::Borrowed(value)
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
