//! Command implementations for the CLI.

mod add;
mod config;
mod info;
mod trim;
mod window;

pub use add::cmd_add;
pub use config::cmd_config;
pub use info::{cmd_count, cmd_info};
pub use trim::cmd_trim;
pub use window::{Window, cmd_window};

use std::path::PathBuf;

use crate::format::FormatOptions;

/// Settings every store command needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub db_path: PathBuf,
    pub format: FormatOptions,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}
