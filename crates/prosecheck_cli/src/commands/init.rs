//! Init command implementation

use miette::{IntoDiagnostic, Result};
use tracing::info;

use crate::commands::Context;

pub fn run_init(ctx: &Context) -> Result<()> {
    let store = ctx.config_store();

    if store.config_exists() {
        info!("{} already exists", store.config_path().display());
    }
    store.initialize().into_diagnostic()?;

    if let Some(styles) = store.styles_path().into_diagnostic()? {
        info!("Styles directory: {}", styles.display());
    }
    info!("Initialized {}", store.config_path().display());
    Ok(())
}
