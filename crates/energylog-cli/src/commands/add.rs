//! Add command - store one reading.

use anyhow::{Context, Result};
use energylog_types::Reading;

use super::CommandContext;
use crate::util::{now_timestamp, open_store};

/// Execute the add command.
pub fn cmd_add(ctx: &CommandContext, energy: &str, date: Option<String>) -> Result<()> {
    let date = match date {
        Some(date) => date,
        None => now_timestamp()?,
    };
    let reading = Reading::parse(energy, date).context("Invalid reading")?;

    let store = open_store(&ctx.db_path)?;
    let id = store.insert(&reading).context("Failed to store reading")?;
    tracing::debug!("Stored reading {} as row {}", reading, id);

    if !ctx.quiet {
        eprintln!("Stored {} at {}", reading.energy(), reading.date());
    }

    store.close().context("Failed to close database")
}
