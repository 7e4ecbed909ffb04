//! Trim command - delete the oldest readings.

use anyhow::{Context, Result};
use energylog_store::DeletePolicy;

use super::CommandContext;
use crate::format::{TrimSummary, format_trim};
use crate::util::{open_store, write_output};

/// Execute the trim command.
pub fn cmd_trim(ctx: &CommandContext, count: u32, policy: DeletePolicy) -> Result<()> {
    let store = open_store(&ctx.db_path)?;

    let deleted = store
        .delete_oldest_with(count, policy)
        .context("Failed to delete readings")?;
    let remaining = store.count().context("Failed to count readings")?;

    if deleted > count as usize {
        tracing::warn!(
            "Deleted {} readings for a request of {}: timestamps were shared",
            deleted,
            count
        );
    }

    let content = format_trim(&TrimSummary { deleted, remaining }, &ctx.format)?;
    write_output(ctx.output.as_deref(), &content)
}
