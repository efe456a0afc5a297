//! prosecheck CLI
//!
//! Checks documents with Vale and manages the styles and rules in its config.

mod cli;
mod commands;
mod output;
mod utils;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, RulesCommands, StylesCommands};
use crate::commands::Context;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_alerts) => {
            if has_alerts {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let ctx = Context::load(&cli)?;

    match &cli.command {
        Commands::Check { file, ext, output } => {
            commands::check::run_check(&ctx, file, ext.as_deref(), *output)
        }
        Commands::Init => commands::init::run_init(&ctx).map(|_| false),
        Commands::Styles { command } => match command {
            StylesCommands::List => commands::styles::run_list(&ctx).map(|_| false),
            StylesCommands::Enable { style } => {
                commands::styles::run_enable(&ctx, style).map(|_| false)
            }
            StylesCommands::Disable { style } => {
                commands::styles::run_disable(&ctx, style).map(|_| false)
            }
            StylesCommands::Uninstall { style } => {
                commands::styles::run_uninstall(&ctx, style).map(|_| false)
            }
        },
        Commands::Rules { command } => match command {
            RulesCommands::List { style } => commands::rules::run_list(&ctx, style).map(|_| false),
            RulesCommands::Set {
                style,
                rule,
                decision,
            } => commands::rules::run_set(&ctx, style, rule, *decision).map(|_| false),
        },
    }
}
