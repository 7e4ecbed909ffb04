//! Utility functions for CLI operations.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use energylog_store::Store;

/// Write output to a file if given, stdout otherwise.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write output: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}

/// Open the store at `path` with a readable error.
pub fn open_store(path: &Path) -> Result<Store> {
    Store::open(path).with_context(|| format!("Failed to open database {}", path.display()))
}

/// Current UTC time as an RFC 3339 string with whole seconds.
///
/// Sub-second digits are dropped so that every generated timestamp has the
/// same length and sorts lexically.
pub fn now_timestamp() -> Result<String> {
    let now = time::OffsetDateTime::now_utc()
        .replace_nanosecond(0)
        .context("Failed to truncate timestamp")?;
    now.format(&time::format_description::well_known::Rfc3339)
        .context("Failed to format timestamp")
}
