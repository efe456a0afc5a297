//! Document positions and ranges.
//!
//! Lines are 0-based and columns count characters, matching how editors
//! address text. Alerts use 1-based lines and 1-based inclusive spans.

use std::cmp::Ordering;
use std::fmt;

use prosecheck_engine::Alert;

/// A point in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextPosition {
    pub line: u32,
    pub ch: u32,
}

impl TextPosition {
    pub const fn new(line: u32, ch: u32) -> Self {
        Self { line, ch }
    }
}

impl PartialOrd for TextPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TextPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.ch.cmp(&other.ch))
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.ch + 1)
    }
}

/// A span between two positions, `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub from: TextPosition,
    pub to: TextPosition,
}

impl TextRange {
    pub fn new(from: TextPosition, to: TextPosition) -> Self {
        if to < from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    /// The range an alert underlines.
    pub fn from_alert(alert: &Alert) -> Self {
        let line = alert.line.saturating_sub(1);
        let [start, end] = alert.span;
        Self::new(
            TextPosition::new(line, start.saturating_sub(1)),
            TextPosition::new(line, end),
        )
    }

    /// Inclusive at both ends.
    pub fn contains(&self, pos: TextPosition) -> bool {
        self.from <= pos && pos <= self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Converts a byte offset in `text` to a position.
pub fn offset_to_position(offset: usize, text: &str) -> Option<TextPosition> {
    if offset > text.len() {
        return None;
    }

    let mut line = 0u32;
    let mut ch = 0u32;
    let mut current = 0;

    for c in text.chars() {
        if current >= offset {
            break;
        }

        if c == '\n' {
            line += 1;
            ch = 0;
        } else {
            ch += 1;
        }

        current += c.len_utf8();
    }

    Some(TextPosition::new(line, ch))
}

/// Converts a position to a byte offset in `text`, clamping the column to
/// the end of its line.
pub fn position_to_offset(pos: TextPosition, text: &str) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..pos.line {
        line_start += text[line_start..].find('\n')? + 1;
    }

    let line = &text[line_start..];
    let line = line.split('\n').next().unwrap_or_default();
    let within = line
        .char_indices()
        .nth(pos.ch as usize)
        .map_or(line.len(), |(idx, _)| idx);

    Some(line_start + within)
}
