//! Check command implementation

use std::path::Path;
use std::sync::Arc;

use miette::{IntoDiagnostic, Result, miette};
use prosecheck_core::{CheckRunner, EventBus, HostBridge, Report, ResultView, TextSurface};
use tracing::info;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::output_report;
use crate::utils::{create_tokio_runtime, normalize_ext};

/// Checks `file` and prints its alerts. Returns whether any were found.
pub fn run_check(
    ctx: &Context,
    file: &Path,
    ext: Option<&str>,
    output: OutputFormat,
) -> Result<bool> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| miette!("Failed to read {}: {}", file.display(), e))?;

    let format = ext
        .map(normalize_ext)
        .or_else(|| {
            file.extension()
                .map(|e| normalize_ext(&e.to_string_lossy()))
        })
        .unwrap_or_else(|| ".md".to_string());

    let runner = Arc::new(CheckRunner::from_settings(&ctx.settings, &ctx.data_dir).into_diagnostic()?);
    let runtime = create_tokio_runtime()?;

    let (state, bridge) = runtime.block_on(async {
        let bus = Arc::new(EventBus::new());
        let bridge = HostBridge::new(Arc::clone(&bus), TextSurface::new(text.as_str()));
        let view = ResultView::open(runner, bus);

        bridge.check_document(text.as_str(), format.as_str());
        (view.settled().await, bridge)
    });

    if state.onboarding {
        let paths = ctx.settings.engine_paths(&ctx.data_dir);
        return Err(miette!(
            help = "Run `prosecheck init` and install Vale at the binary path",
            "Vale is not set up (binary {}, config {})",
            paths.binary.display(),
            paths.config.display()
        ));
    }

    match state.report {
        Some(Report::Alerts(batch)) => {
            bridge.with_surface(|surface, sync| {
                output_report(file, &format, &batch.alerts, surface, sync, output)
            })?;
            info!("Checked {} ({} alerts)", file.display(), batch.alerts.len());
            Ok(!batch.alerts.is_empty())
        }
        Some(Report::Failure(message)) => Err(miette!("{}", message)),
        None => Err(miette!("Check finished without a result")),
    }
}
