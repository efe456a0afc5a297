//! Output formatting module

mod json;
mod text;

use std::path::Path;

use miette::Result;
use prosecheck_core::{Alert, AnnotationSynchronizer, TextSurface};

use crate::cli::OutputFormat;

pub fn output_report(
    path: &Path,
    format: &str,
    alerts: &[Alert],
    surface: &TextSurface,
    sync: &AnnotationSynchronizer,
    output: OutputFormat,
) -> Result<()> {
    match output {
        OutputFormat::Json => json::output_json(path, format, alerts)?,
        OutputFormat::Text => print!("{}", text::render_text(path, alerts, surface, sync)),
    }
    Ok(())
}
