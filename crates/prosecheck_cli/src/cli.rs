//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use prosecheck_config::RuleDecision;

/// prosecheck - Check prose with Vale
#[derive(Parser)]
#[command(name = "prosecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file path (defaults to settings.json in the data directory)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Data directory holding the managed Vale binary and config
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config section the style and rule commands edit
    #[arg(long, global = true, default_value = "*.md")]
    pub selector: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a document
    Check {
        /// File to check
        file: PathBuf,

        /// Format hint passed to Vale (defaults to the file extension)
        #[arg(long)]
        ext: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Write the default Vale config and create the styles directory
    Init,

    /// Manage styles
    Styles {
        #[command(subcommand)]
        command: StylesCommands,
    },

    /// Manage rule overrides
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
}

#[derive(Subcommand)]
pub enum StylesCommands {
    /// List catalog and installed styles
    List,

    /// Enable a style
    Enable {
        /// Style name
        style: String,
    },

    /// Disable a style
    Disable {
        /// Style name
        style: String,
    },

    /// Remove an installed style
    Uninstall {
        /// Style name
        style: String,
    },
}

#[derive(Subcommand)]
pub enum RulesCommands {
    /// List the rules of a style and their settings
    List {
        /// Style name
        style: String,
    },

    /// Override a rule (default, off, suggestion, warning, error)
    Set {
        /// Style name
        style: String,

        /// Rule name
        rule: String,

        /// New setting
        decision: RuleDecision,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
