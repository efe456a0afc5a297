//! In-memory editor surface.
//!
//! Lays text out on a fixed grid: one unit of `y` per line and one unit of
//! `x` per character. Used by the command line front end and in tests.

use std::collections::BTreeMap;

use crate::annotations::{DecorationId, EditorMode, EditorSurface};
use crate::position::{TextPosition, TextRange, position_to_offset};

#[derive(Debug, Clone)]
struct Decoration {
    range: TextRange,
    class: String,
}

/// A text buffer with decorations, a cursor and a scroll position.
#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    text: String,
    decorations: BTreeMap<DecorationId, Decoration>,
    next_id: u64,
    cursor: TextPosition,
    scroll: Option<TextPosition>,
    mode: EditorMode,
}

impl TextSurface {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self, line: u32) -> Option<&str> {
        self.text.split('\n').nth(line as usize)
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Live decorations in creation order.
    pub fn decorations(&self) -> impl Iterator<Item = (DecorationId, TextRange, &str)> {
        self.decorations
            .iter()
            .map(|(id, d)| (*id, d.range, d.class.as_str()))
    }

    pub fn cursor(&self) -> TextPosition {
        self.cursor
    }

    /// Last position scrolled into view.
    pub fn scroll_position(&self) -> Option<TextPosition> {
        self.scroll
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    /// Inserts `insert` at `pos`, moving decorations that follow it.
    pub fn insert(&mut self, pos: TextPosition, insert: &str) {
        let Some(offset) = position_to_offset(pos, &self.text) else {
            return;
        };
        self.text.insert_str(offset, insert);

        let added_lines = insert.matches('\n').count() as u32;
        let tail = insert.rsplit('\n').next().unwrap_or_default().chars().count() as u32;

        let shift = |p: &mut TextPosition| {
            if p.line > pos.line {
                p.line += added_lines;
            } else if p.line == pos.line && p.ch >= pos.ch {
                if added_lines == 0 {
                    p.ch += tail;
                } else {
                    p.line += added_lines;
                    p.ch = tail + (p.ch - pos.ch);
                }
            }
        };

        for decoration in self.decorations.values_mut() {
            shift(&mut decoration.range.from);
            shift(&mut decoration.range.to);
        }
    }
}

impl EditorSurface for TextSurface {
    fn add_decoration(&mut self, range: TextRange, class: &str) -> DecorationId {
        let id = DecorationId(self.next_id);
        self.next_id += 1;
        self.decorations.insert(
            id,
            Decoration {
                range,
                class: class.to_string(),
            },
        );
        id
    }

    fn remove_decoration(&mut self, id: DecorationId) {
        self.decorations.remove(&id);
    }

    fn decoration_range(&self, id: DecorationId) -> Option<TextRange> {
        self.decorations.get(&id).map(|d| d.range)
    }

    fn position_at(&self, x: f64, y: f64) -> Option<TextPosition> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let line = self.line(y as u32)?;
        let ch = (x as u32).min(line.chars().count() as u32);
        Some(TextPosition::new(y as u32, ch))
    }

    fn scroll_into_view(&mut self, pos: TextPosition) {
        self.scroll = Some(pos);
    }

    fn set_cursor(&mut self, pos: TextPosition) {
        self.cursor = pos;
    }

    fn mode(&self) -> EditorMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> TextRange {
        TextRange::new(TextPosition::new(l1, c1), TextPosition::new(l2, c2))
    }

    #[test]
    fn test_decoration_lifecycle() {
        let mut surface = TextSurface::new("one\ntwo");
        let a = surface.add_decoration(range(0, 0, 0, 3), "a");
        let b = surface.add_decoration(range(1, 0, 1, 3), "b");
        assert_ne!(a, b);

        surface.remove_decoration(a);
        assert_eq!(surface.decoration_range(a), None);
        assert_eq!(surface.decoration_range(b), Some(range(1, 0, 1, 3)));
    }

    #[test]
    fn test_position_at() {
        let surface = TextSurface::new("short\nmuch longer line");
        assert_eq!(surface.position_at(2.5, 0.2), Some(TextPosition::new(0, 2)));
        assert_eq!(surface.position_at(40.0, 0.0), Some(TextPosition::new(0, 5)));
        assert_eq!(surface.position_at(1.0, 2.0), None);
        assert_eq!(surface.position_at(-1.0, 0.0), None);
        assert_eq!(surface.position_at(f64::NAN, 0.0), None);
    }

    #[test]
    fn test_insert_moves_following_decorations() {
        let mut surface = TextSurface::new("ab cd\nef");
        let same_line = surface.add_decoration(range(0, 3, 0, 5), "x");
        let before = surface.add_decoration(range(0, 0, 0, 2), "x");
        let next_line = surface.add_decoration(range(1, 0, 1, 2), "x");

        surface.insert(TextPosition::new(0, 2), "\nzz");

        assert_eq!(surface.text(), "ab\nzz cd\nef");
        assert_eq!(surface.decoration_range(same_line), Some(range(1, 3, 1, 5)));
        assert_eq!(surface.decoration_range(before), Some(range(0, 0, 1, 2)));
        assert_eq!(surface.decoration_range(next_line), Some(range(2, 0, 2, 2)));
    }
}
