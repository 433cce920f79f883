//! Error types for the culture module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a culture or using it to parse and format.
#[derive(Debug, Error)]
pub enum CultureError {
    /// No culture definition exists for the id.
    #[error("Culture not found: {id}")]
    NotFound { id: String },

    /// The id cannot name a culture (empty, or escapes the data directory).
    #[error("Invalid culture id: {id:?}")]
    InvalidId { id: String },

    /// A culture definition file exists but could not be understood.
    #[error("Invalid culture definition at {path}: {reason}")]
    InvalidDefinition { path: PathBuf, reason: String },

    /// The definition names a calendar this build does not implement.
    #[error("Unsupported calendar: {calendar}")]
    UnsupportedCalendar { calendar: String },

    /// I/O error while reading culture data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input text does not match the culture's grammar.
    #[error("Cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// The formatting pattern is not valid for this culture.
    #[error("Invalid format pattern: {pattern:?}")]
    InvalidPattern { pattern: String },

    /// A day number falls outside the representable calendar range.
    #[error("Julian day {julian_day} is out of range")]
    OutOfRange { julian_day: i64 },
}

impl CultureError {
    /// Creates a new parse error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new invalid definition error.
    pub fn invalid_definition(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
