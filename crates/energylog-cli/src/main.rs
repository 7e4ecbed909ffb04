mod cli;
mod commands;
mod config;
mod format;
mod util;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{CommandContext, Window};
use config::{Config, resolve_db_path, resolve_delete_policy, resolve_format, resolve_window};
use format::FormatOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "energylog", &mut io::stdout());
        return Ok(());
    }

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();

    let ctx = CommandContext {
        db_path: resolve_db_path(cli.db, &config),
        format: FormatOptions {
            format: resolve_format(cli.format, &config),
            compact: cli.compact,
            no_header: cli.no_header,
        },
        output: cli.output,
        quiet: cli.quiet,
    };

    if let Some(ref path) = ctx.output {
        tracing::debug!("Output will be written to: {}", path.display());
    }

    match cli.command {
        Commands::Add { energy, date } => commands::cmd_add(&ctx, &energy, date),
        Commands::Latest { count } => {
            commands::cmd_window(&ctx, Window::Latest, resolve_window(count, &config))
        }
        Commands::Earliest { count } => {
            commands::cmd_window(&ctx, Window::Earliest, resolve_window(count, &config))
        }
        Commands::Trim {
            count,
            by_timestamp,
        } => commands::cmd_trim(&ctx, count, resolve_delete_policy(by_timestamp, &config)),
        Commands::Count => commands::cmd_count(&ctx),
        Commands::Info => commands::cmd_info(&ctx),
        Commands::Config { action } => commands::cmd_config(action, &config),
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }
}
