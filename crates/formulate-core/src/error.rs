//! Error types for formulate-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while converting text into values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text is not a number
    #[error("not a number: '{0}'")]
    InvalidNumber(String),

    /// Text does not match a date layout
    #[error("cannot parse '{value}' as a date with layout '{layout}': {reason}")]
    InvalidDate {
        value: String,
        layout: String,
        reason: String,
    },

    /// Unknown IANA time zone name
    #[error("unknown time zone: {0}")]
    InvalidTimeZone(String),

    /// A local wall-clock time that does not exist in the time zone
    #[error("local time {0} does not exist in the configured time zone")]
    NonexistentLocalTime(String),
}
