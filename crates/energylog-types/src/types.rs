//! Core reading type.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// One stored observation: an energy value and the time it was taken.
///
/// The timestamp is an opaque string supplied by the caller. It is never
/// parsed here; windows are ordered by comparing it lexically, so callers
/// should use a sortable format such as RFC 3339 in UTC.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Energy value.
    pub energy: f64,
    /// Opaque, lexically sortable timestamp.
    pub date: String,
}

impl Reading {
    /// Create a reading from a value and a timestamp.
    pub fn new(energy: f64, date: impl Into<String>) -> Self {
        Self {
            energy,
            date: date.into(),
        }
    }

    /// Parse the energy value from text, keeping the timestamp as given.
    ///
    /// Only the number itself is checked; the timestamp is accepted as-is.
    pub fn parse(energy: &str, date: impl Into<String>) -> ParseResult<Self> {
        let value: f64 = energy
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidEnergy(energy.to_string()))?;
        if !value.is_finite() {
            return Err(ParseError::NonFiniteEnergy(value));
        }
        Ok(Self::new(value, date))
    }

    /// The energy value.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// The timestamp string.
    pub fn date(&self) -> &str {
        &self.date
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.date, self.energy)
    }
}
