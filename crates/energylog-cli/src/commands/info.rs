//! Info and count commands.

use anyhow::{Context, Result};
use serde::Serialize;

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::util::{open_store, write_output};

#[derive(Debug, Serialize)]
struct DatabaseInfo {
    database: String,
    config: String,
    schema_version: i32,
    readings: u64,
}

/// Execute the count command.
pub fn cmd_count(ctx: &CommandContext) -> Result<()> {
    let store = open_store(&ctx.db_path)?;
    let count = store.count().context("Failed to count readings")?;

    let content = match ctx.format.format {
        OutputFormat::Json => ctx.format.as_json(&serde_json::json!({ "readings": count }))?,
        _ => format!("{}\n", count),
    };
    write_output(ctx.output.as_deref(), &content)
}

/// Execute the info command.
pub fn cmd_info(ctx: &CommandContext) -> Result<()> {
    let store = open_store(&ctx.db_path)?;

    let info = DatabaseInfo {
        database: ctx.db_path.display().to_string(),
        config: Config::path().display().to_string(),
        schema_version: store
            .schema_version()
            .context("Failed to read schema version")?,
        readings: store.count().context("Failed to count readings")?,
    };

    let content = match ctx.format.format {
        OutputFormat::Json => ctx.format.as_json(&info)?,
        _ => format!(
            "Database:       {}\nConfig:         {}\nSchema version: {}\nReadings:       {}\n",
            info.database, info.config, info.schema_version, info.readings
        ),
    };
    write_output(ctx.output.as_deref(), &content)
}
