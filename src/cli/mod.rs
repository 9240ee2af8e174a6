//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Sync Cubox articles into a Logseq graph
#[derive(Parser, Debug)]
#[command(name = "cubox-sync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: ~/.cubox-sync/config.json)
    #[arg(long, global = true, env = "CUBOX_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one sync pass
    Sync,

    /// Show configuration and sync state
    Status,

    /// List folders in the Cubox account
    Folders,

    /// Reset the pagination cursor so the next sync starts from scratch
    Reset,

    /// Get and set configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the full configuration
    Show,

    /// Print one configuration value
    Get {
        /// One of: domain, api-key, target-page, folders, only-annotated,
        /// logseq-endpoint, logseq-token
        key: String,
    },

    /// Set one configuration value
    Set {
        key: String,
        value: String,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
