//! Keeps editor decorations in step with the current alert table.
//!
//! Each alert gets one underline decoration. The synchronizer remembers
//! which decoration belongs to which alert, routes clicks on decorations to
//! alerts and back, and keeps at most one alert highlighted.

use prosecheck_engine::Severity;
use tracing::debug;

use crate::events::{AlertBatch, AlertId};
use crate::position::{TextPosition, TextRange};
use crate::session::SessionId;

/// Class shared by every alert underline.
pub const UNDERLINE_CLASS: &str = "vale-underline";

/// Class of the overlay drawn on the highlighted alert.
pub const HIGHLIGHT_CLASS: &str = "vale-underline-highlight";

/// Full class list for an underline of `severity`.
pub fn marker_class(severity: Severity) -> String {
    format!("{} vale-{}", UNDERLINE_CLASS, severity)
}

/// Handle to a decoration owned by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Source,
    Preview,
}

/// The editing surface decorations are drawn on.
///
/// The editor owns decoration ranges and may move them as the text is
/// edited, so the synchronizer always asks for the current range.
pub trait EditorSurface {
    fn add_decoration(&mut self, range: TextRange, class: &str) -> DecorationId;

    fn remove_decoration(&mut self, id: DecorationId);

    /// Current range of a decoration, or `None` if the editor dropped it.
    fn decoration_range(&self, id: DecorationId) -> Option<TextRange>;

    /// Document position under a pointer, or `None` outside the editor.
    fn position_at(&self, x: f64, y: f64) -> Option<TextPosition>;

    fn scroll_into_view(&mut self, pos: TextPosition);

    fn set_cursor(&mut self, pos: TextPosition);

    fn mode(&self) -> EditorMode;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Normal,
    Highlighted,
}

/// A decoration standing for one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub decoration: DecorationId,
    /// Index into the current alert table.
    pub alert: usize,
    pub kind: MarkerKind,
}

#[derive(Debug, Clone, Copy)]
struct Highlight {
    marker: usize,
    overlay: DecorationId,
}

/// What a pointer release in the editor resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// The pointer was outside the editor.
    Ignored,
    /// A marker contained the pointer and its alert is now highlighted.
    Selected(AlertId),
    /// No marker contained the pointer; the highlight was cleared.
    Deselected,
}

/// Owns the markers of the current alert table.
#[derive(Debug, Default)]
pub struct AnnotationSynchronizer {
    session: Option<SessionId>,
    markers: Vec<Marker>,
    highlight: Option<Highlight>,
}

impl AnnotationSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The highlighted alert, if any.
    pub fn highlighted(&self) -> Option<AlertId> {
        let highlight = self.highlight?;
        Some(self.alert_id(&self.markers[highlight.marker]))
    }

    /// Replaces every marker with one per alert in `batch`.
    pub fn apply_alerts(&mut self, surface: &mut dyn EditorSurface, batch: &AlertBatch) {
        self.clear(surface);

        self.markers = batch
            .alerts
            .iter()
            .enumerate()
            .map(|(index, alert)| Marker {
                decoration: surface
                    .add_decoration(TextRange::from_alert(alert), &marker_class(alert.severity)),
                alert: index,
                kind: MarkerKind::Normal,
            })
            .collect();
        self.session = Some(batch.session);

        debug!(
            "Marked {} alerts for session {}",
            self.markers.len(),
            batch.session
        );
    }

    /// Removes every marker and the highlight.
    pub fn clear(&mut self, surface: &mut dyn EditorSurface) {
        self.clear_highlight(surface);
        for marker in self.markers.drain(..) {
            surface.remove_decoration(marker.decoration);
        }
        self.session = None;
    }

    /// Removes the highlight overlay, keeping the markers.
    pub fn clear_highlight(&mut self, surface: &mut dyn EditorSurface) {
        if let Some(highlight) = self.highlight.take() {
            surface.remove_decoration(highlight.overlay);
            if let Some(marker) = self.markers.get_mut(highlight.marker) {
                marker.kind = MarkerKind::Normal;
            }
        }
    }

    /// Highlights the alert picked in the result list and scrolls to it.
    ///
    /// Only acts in source mode. Returns false if nothing was highlighted.
    pub fn select_from_list(&mut self, surface: &mut dyn EditorSurface, id: AlertId) -> bool {
        if surface.mode() != EditorMode::Source || self.session != Some(id.session) {
            return false;
        }
        let Some(marker) = self.markers.iter().position(|m| m.alert == id.index) else {
            return false;
        };

        match self.highlight_marker(surface, marker) {
            Some(range) => {
                surface.scroll_into_view(range.from);
                true
            }
            None => false,
        }
    }

    /// Resolves a pointer release at `(x, y)`.
    ///
    /// The first marker whose current range contains the position is
    /// highlighted and the cursor moves to its end.
    pub fn on_pointer_up(&mut self, surface: &mut dyn EditorSurface, x: f64, y: f64) -> PointerOutcome {
        let Some(pos) = surface.position_at(x, y) else {
            return PointerOutcome::Ignored;
        };

        let hit = self.markers.iter().position(|marker| {
            surface
                .decoration_range(marker.decoration)
                .is_some_and(|range| range.contains(pos))
        });

        let Some(marker) = hit else {
            self.clear_highlight(surface);
            return PointerOutcome::Deselected;
        };

        match self.highlight_marker(surface, marker) {
            Some(range) => {
                surface.set_cursor(range.to);
                PointerOutcome::Selected(self.alert_id(&self.markers[marker]))
            }
            None => PointerOutcome::Deselected,
        }
    }

    /// Makes `marker` the only highlighted one. Returns its current range.
    fn highlight_marker(
        &mut self,
        surface: &mut dyn EditorSurface,
        marker: usize,
    ) -> Option<TextRange> {
        self.clear_highlight(surface);

        let range = surface.decoration_range(self.markers[marker].decoration)?;
        let overlay = surface.add_decoration(range, HIGHLIGHT_CLASS);
        self.markers[marker].kind = MarkerKind::Highlighted;
        self.highlight = Some(Highlight { marker, overlay });
        Some(range)
    }

    fn alert_id(&self, marker: &Marker) -> AlertId {
        AlertId {
            session: self.session.unwrap_or_default(),
            index: marker.alert,
        }
    }
}
