//! Style management commands

use miette::{IntoDiagnostic, Result};
use prosecheck_config::{BUILTIN_STYLE, Style, StyleStatus, catalog};
use tracing::info;

use crate::commands::Context;

pub fn run_list(ctx: &Context) -> Result<()> {
    let store = ctx.config_store();
    let mut statuses = store
        .catalog_status(&ctx.selector, catalog())
        .into_diagnostic()?;

    // Installed styles missing from the catalog, including the built-in one.
    let enabled = store.enabled_styles(&ctx.selector).into_diagnostic()?;
    for name in store.installed_styles().into_diagnostic()? {
        if statuses.iter().all(|s| s.style.name != name) {
            statuses.push(StyleStatus {
                enabled: enabled.contains(&name),
                installed: true,
                style: Style::new(name),
            });
        }
    }

    println!("{}", format_status_table(&statuses));
    Ok(())
}

fn format_status_table(statuses: &[StyleStatus]) -> String {
    let mut lines = vec![format!(
        "{:<14} {:<8} {:<10} {}",
        "Style", "Enabled", "Installed", "Description"
    )];
    for status in statuses {
        let description = if status.style.name == BUILTIN_STYLE {
            "Built-in rules shipped with Vale."
        } else {
            status.style.description.as_deref().unwrap_or("")
        };
        lines.push(format!(
            "{:<14} {:<8} {:<10} {}",
            status.style.name,
            if status.enabled { "yes" } else { "no" },
            if status.installed { "yes" } else { "no" },
            description
        ));
    }
    lines.join("\n")
}

pub fn run_enable(ctx: &Context, style: &str) -> Result<()> {
    let store = ctx.config_store();
    if store.enable_style(&ctx.selector, style).into_diagnostic()? {
        info!("Enabled {} for {}", style, ctx.selector);
    } else {
        info!("{} is already enabled for {}", style, ctx.selector);
    }
    Ok(())
}

pub fn run_disable(ctx: &Context, style: &str) -> Result<()> {
    let store = ctx.config_store();
    if store.disable_style(&ctx.selector, style).into_diagnostic()? {
        info!("Disabled {} for {}", style, ctx.selector);
    } else {
        info!("{} is not enabled for {}", style, ctx.selector);
    }
    Ok(())
}

pub fn run_uninstall(ctx: &Context, style: &str) -> Result<()> {
    let store = ctx.config_store();
    store.uninstall_style(style).into_diagnostic()?;
    // Also drop it from BasedOnStyles.
    store.disable_style(&ctx.selector, style).into_diagnostic()?;
    info!("Uninstalled {}", style);
    Ok(())
}
