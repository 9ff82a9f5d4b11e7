use thiserror::Error;

use crate::backend::BackendError;

/// Errors returned by the scorer adapter once both backends are exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The last observed failure was rate-limit-classified. Callers treat
    /// this as a skip, not a fault; waiting out a quota window would stall
    /// the scan.
    #[error("all scoring backends rate limited")]
    RateLimited,

    /// Both backends failed for non-rate-limit reasons; carries the last
    /// observed error.
    #[error("scoring failed on all backends: {0}")]
    Backend(#[from] BackendError),
}

impl ScoringError {
    /// Returns `true` for the rate-limited (skip) case.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}
