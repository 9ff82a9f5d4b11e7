//! Configuration error types.

use thiserror::Error;

use crate::constants::ThresholdError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An integer-valued variable could not be parsed.
    #[error("failed to parse {name}='{value}' as an integer: {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A numeric threshold variable could not be parsed.
    #[error("failed to parse {name}='{value}' as a number: {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// A variable was set to an empty or whitespace-only value.
    #[error("{name} must not be empty")]
    EmptyValue { name: &'static str },

    /// The configured thresholds are inconsistent.
    #[error("invalid thresholds: {0}")]
    InvalidThresholds(#[from] ThresholdError),
}
