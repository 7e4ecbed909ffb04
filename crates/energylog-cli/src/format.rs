//! Output formatting for readings.

use anyhow::{Context, Result};
use energylog_store::StoredReading;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Options shared by every formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub format: OutputFormat,
    /// Compact JSON output
    pub compact: bool,
    /// Skip the CSV header row
    pub no_header: bool,
}

impl FormatOptions {
    /// Serialize `value` as JSON, honoring `compact`.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut json = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
        .context("Failed to serialize JSON")?;
        json.push('\n');
        Ok(json)
    }
}

/// Format a window of readings.
pub fn format_readings(readings: &[StoredReading], opts: &FormatOptions) -> Result<String> {
    match opts.format {
        OutputFormat::Text => Ok(format_readings_text(readings)),
        OutputFormat::Json => opts.as_json(&readings),
        OutputFormat::Csv => format_readings_csv(readings, opts),
    }
}

pub fn format_readings_text(readings: &[StoredReading]) -> String {
    if readings.is_empty() {
        return "No readings stored.\n".to_string();
    }

    let date_width = readings
        .iter()
        .map(|r| r.date.len())
        .max()
        .unwrap_or(0)
        .max("DATE".len());

    let mut out = format!("{:>8}  {:<date_width$}  {:>12}\n", "ID", "DATE", "ENERGY");
    for reading in readings {
        out.push_str(&format!(
            "{:>8}  {:<date_width$}  {:>12.3}\n",
            reading.id, reading.date, reading.energy
        ));
    }
    out
}

pub fn format_readings_csv(readings: &[StoredReading], opts: &FormatOptions) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(!opts.no_header)
        .from_writer(Vec::new());

    for reading in readings {
        writer
            .serialize(reading)
            .context("Failed to write CSV record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Result of a `trim` run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrimSummary {
    pub deleted: usize,
    pub remaining: u64,
}

pub fn format_trim(summary: &TrimSummary, opts: &FormatOptions) -> Result<String> {
    match opts.format {
        OutputFormat::Text => Ok(format!(
            "Deleted {} readings, {} remaining\n",
            summary.deleted, summary.remaining
        )),
        OutputFormat::Json => opts.as_json(summary),
        OutputFormat::Csv => {
            let mut out = String::new();
            if !opts.no_header {
                out.push_str("deleted,remaining\n");
            }
            out.push_str(&format!("{},{}\n", summary.deleted, summary.remaining));
            Ok(out)
        }
    }
}
