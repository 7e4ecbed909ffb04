//! Platform-agnostic types for timestamped energy readings.
//!
//! This crate holds the [`Reading`] value shared by the store and the CLI.
//!
//! # Example
//!
//! ```
//! use energylog_types::Reading;
//!
//! let reading = Reading::parse("12.5", "2017-01-04T10:00:00Z")?;
//! assert_eq!(reading.energy(), 12.5);
//! assert_eq!(reading.date(), "2017-01-04T10:00:00Z");
//! # Ok::<(), energylog_types::ParseError>(())
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::Reading;
