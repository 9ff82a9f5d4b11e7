//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `FACEMATCH_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{DEFAULT_RETRY_BACKOFF_MS, MatchThresholds};

/// Default model bound to the primary scoring backend.
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.0-flash";

/// Default model bound to the fallback scoring backend. A lighter model
/// from the same family: distinct per-model quota pool, broad availability.
pub const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.0-flash-lite";

/// Identification pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FACEMATCH_*` overrides on top of
/// defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Model for the primary scoring backend. Default: `gemini-2.0-flash`.
    pub primary_model: String,

    /// Model for the fallback scoring backend. Default:
    /// `gemini-2.0-flash-lite`.
    pub fallback_model: String,

    /// Pause before the single in-backend retry, in milliseconds.
    /// Default: `300`.
    pub retry_backoff_ms: u64,

    /// Ranking thresholds. Defaults: high `95`, minimum `75`, margin `3`.
    pub thresholds: MatchThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            thresholds: MatchThresholds::default(),
        }
    }
}

impl Config {
    const ENV_PRIMARY_MODEL: &'static str = "FACEMATCH_PRIMARY_MODEL";
    const ENV_FALLBACK_MODEL: &'static str = "FACEMATCH_FALLBACK_MODEL";
    const ENV_RETRY_BACKOFF_MS: &'static str = "FACEMATCH_RETRY_BACKOFF_MS";
    const ENV_HIGH_CONFIDENCE: &'static str = "FACEMATCH_HIGH_CONFIDENCE";
    const ENV_MINIMUM_CONFIDENCE: &'static str = "FACEMATCH_MINIMUM_CONFIDENCE";
    const ENV_SCORE_MARGIN: &'static str = "FACEMATCH_SCORE_MARGIN";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let primary_model =
            Self::parse_string_from_env(Self::ENV_PRIMARY_MODEL, defaults.primary_model)?;
        let fallback_model =
            Self::parse_string_from_env(Self::ENV_FALLBACK_MODEL, defaults.fallback_model)?;
        let retry_backoff_ms =
            Self::parse_u64_from_env(Self::ENV_RETRY_BACKOFF_MS, defaults.retry_backoff_ms)?;

        let thresholds = MatchThresholds {
            high_confidence: Self::parse_f32_from_env(
                Self::ENV_HIGH_CONFIDENCE,
                defaults.thresholds.high_confidence,
            )?,
            minimum_confidence: Self::parse_f32_from_env(
                Self::ENV_MINIMUM_CONFIDENCE,
                defaults.thresholds.minimum_confidence,
            )?,
            minimum_margin: Self::parse_f32_from_env(
                Self::ENV_SCORE_MARGIN,
                defaults.thresholds.minimum_margin,
            )?,
        };

        Ok(Self {
            primary_model,
            fallback_model,
            retry_backoff_ms,
            thresholds,
        })
    }

    /// Validates basic invariants (threshold consistency).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        Ok(())
    }

    /// The retry backoff as a [`Duration`].
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    fn parse_string_from_env(name: &'static str, default: String) -> Result<String, ConfigError> {
        match env::var(name) {
            Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue { name }),
            Ok(value) => Ok(value),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::IntParseError {
                name,
                value: value.clone(),
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_f32_from_env(name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::FloatParseError {
                name,
                value: value.clone(),
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }
}
