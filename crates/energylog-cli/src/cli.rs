//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "energylog")]
#[command(author, version, about = "Local log of timestamped energy readings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Database file (overrides the config file and the platform default)
    #[arg(long, global = true, env = "ENERGYLOG_DB")]
    pub db: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long, global = true)]
    pub no_header: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store one reading
    Add {
        /// Energy value
        #[arg(allow_hyphen_values = true)]
        energy: String,

        /// Timestamp to store (defaults to the current UTC time, RFC 3339)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the newest readings, newest first
    Latest {
        /// Number of readings (defaults to the configured window, 60 if unset)
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Show the oldest readings, oldest first
    Earliest {
        /// Number of readings (defaults to the configured window, 60 if unset)
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },

    /// Delete the oldest readings, e.g. after they have been uploaded
    Trim {
        /// Number of readings to delete
        count: u32,

        /// Delete every reading sharing a timestamp with the selected ones
        #[arg(long)]
        by_timestamp: bool,
    },

    /// Print the number of stored readings
    Count,

    /// Show database location, schema version and size
    Info,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init,
}
