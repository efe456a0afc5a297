//! JSON output formatter

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use prosecheck_core::Alert;

pub fn output_json(path: &Path, format: &str, alerts: &[Alert]) -> Result<()> {
    let output = serde_json::json!({
        "path": path.display().to_string(),
        "format": format,
        "alerts": alerts,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).into_diagnostic()?
    );
    Ok(())
}
