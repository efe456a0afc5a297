//! Text output formatter

use std::path::Path;

use prosecheck_core::{Alert, AnnotationSynchronizer, EditorSurface, Severity, TextSurface};

/// Renders each marker with its source line and a caret underline.
pub fn render_text(
    path: &Path,
    alerts: &[Alert],
    surface: &TextSurface,
    sync: &AnnotationSynchronizer,
) -> String {
    if alerts.is_empty() {
        return format!("No alerts in {}\n", path.display());
    }

    let mut out = format!("\n{}:\n", path.display());
    for marker in sync.markers() {
        let (Some(alert), Some(range)) = (
            alerts.get(marker.alert),
            surface.decoration_range(marker.decoration),
        ) else {
            continue;
        };

        out.push_str(&format!(
            "  {} {:<10} {} [{}]\n",
            range.from, alert.severity, alert.message, alert.check
        ));

        if let Some(line) = surface.line(range.from.line) {
            let start = range.from.ch as usize;
            let width = if range.to.line == range.from.line {
                (range.to.ch as usize).saturating_sub(start).max(1)
            } else {
                line.chars().count().saturating_sub(start).max(1)
            };
            out.push_str(&format!("    {}\n", line));
            out.push_str(&format!("    {}{}\n", " ".repeat(start), "^".repeat(width)));
        }
    }

    let count = |severity: Severity| alerts.iter().filter(|a| a.severity == severity).count();
    out.push_str(&format!(
        "\nFound {} alerts ({} errors, {} warnings, {} suggestions)\n",
        alerts.len(),
        count(Severity::Error),
        count(Severity::Warning),
        count(Severity::Suggestion)
    ));

    out
}
