//! Error types for reading input in energylog-types.

use thiserror::Error;

/// Errors that can occur when building a [`Reading`](crate::Reading) from raw input.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// without breaking downstream code.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// The energy value is not a floating point number.
    #[error("Invalid energy value '{0}'")]
    InvalidEnergy(String),

    /// The energy value parsed but is NaN or infinite.
    #[error("Energy value must be finite, got {0}")]
    NonFiniteEnergy(f64),
}

/// Result type alias using energylog-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
