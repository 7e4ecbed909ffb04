//! Latest / earliest commands - print a window of readings.

use anyhow::{Context, Result};
use energylog_store::WindowQuery;

use super::CommandContext;
use crate::format::format_readings;
use crate::util::{open_store, write_output};

/// Which end of the log to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Latest,
    Earliest,
}

/// Execute the latest or earliest command.
pub fn cmd_window(ctx: &CommandContext, window: Window, count: u32) -> Result<()> {
    let store = open_store(&ctx.db_path)?;

    let query = match window {
        Window::Latest => WindowQuery::new().newest_first(),
        Window::Earliest => WindowQuery::new().oldest_first(),
    }
    .limit(count);

    let readings = store
        .query_window(&query)
        .context("Failed to read readings")?;

    let content = format_readings(&readings, &ctx.format)?;
    write_output(ctx.output.as_deref(), &content)
}
