use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::backend::{BackendError, CompareBackend, ErrorClass, ScoreResult};
use crate::candidate::ImageData;
use crate::constants::DEFAULT_RETRY_BACKOFF_MS;

use super::error::ScoringError;

/// Primary/fallback pair of comparison backends with per-call retry policy.
///
/// Both backends are injected at construction so tests can substitute
/// deterministic stubs; nothing here is process-global, and no state is
/// retained between calls.
pub struct ScorerAdapter<P: CompareBackend, F: CompareBackend> {
    primary: P,
    fallback: F,
    retry_backoff: Duration,
}

impl<P: CompareBackend, F: CompareBackend> std::fmt::Debug for ScorerAdapter<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScorerAdapter")
            .field("retry_backoff", &self.retry_backoff)
            .finish_non_exhaustive()
    }
}

impl<P: CompareBackend, F: CompareBackend> ScorerAdapter<P, F> {
    /// Creates an adapter with the default retry backoff.
    pub fn new(primary: P, fallback: F) -> Self {
        Self {
            primary,
            fallback,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }

    /// Overrides the pause before each in-backend retry.
    pub fn with_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// The configured retry backoff.
    pub fn retry_backoff(&self) -> Duration {
        self.retry_backoff
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Scores one (probe, reference) pair through the backend ladder:
    /// primary, primary retry, fallback, fallback retry. Rate-limited
    /// failures skip the retry of their backend; if both backends are
    /// exhausted and the last failure was rate-limit-classified the result
    /// is [`ScoringError::RateLimited`], otherwise the last error
    /// propagates.
    pub async fn score(
        &self,
        probe: &ImageData,
        reference: &ImageData,
    ) -> Result<ScoreResult, ScoringError> {
        debug!("scoring started");

        let primary_err = match self
            .compare_with_retry(&self.primary, "primary", probe, reference)
            .await
        {
            Ok(score) => {
                debug!(confidence = score.confidence, "score obtained from primary");
                return Ok(score);
            }
            Err(e) => e,
        };

        debug!(error = %primary_err, "primary backend exhausted, trying fallback");

        let last_err = match self
            .compare_with_retry(&self.fallback, "fallback", probe, reference)
            .await
        {
            Ok(score) => {
                debug!(confidence = score.confidence, "score obtained from fallback");
                return Ok(score);
            }
            Err(e) => e,
        };

        if last_err.class() == ErrorClass::RateLimited {
            debug!("scoring skipped, rate limited on both backends");
            Err(ScoringError::RateLimited)
        } else {
            warn!(error = %last_err, "scoring failed on all backends");
            Err(ScoringError::Backend(last_err))
        }
    }

    /// Final same-person confirmation through the same backend ladder.
    ///
    /// Exposed for callers that want the verification capability; the
    /// identification decision path does not use it.
    pub async fn verify(
        &self,
        probe: &ImageData,
        reference: &ImageData,
        candidate_name: &str,
    ) -> Result<bool, ScoringError> {
        let primary_err = match self
            .verify_with_retry(&self.primary, "primary", probe, reference, candidate_name)
            .await
        {
            Ok(verdict) => return Ok(verdict),
            Err(e) => e,
        };

        debug!(error = %primary_err, "primary backend exhausted, trying fallback");

        let last_err = match self
            .verify_with_retry(&self.fallback, "fallback", probe, reference, candidate_name)
            .await
        {
            Ok(verdict) => return Ok(verdict),
            Err(e) => e,
        };

        if last_err.class() == ErrorClass::RateLimited {
            Err(ScoringError::RateLimited)
        } else {
            Err(ScoringError::Backend(last_err))
        }
    }

    async fn compare_with_retry<B: CompareBackend>(
        &self,
        backend: &B,
        label: &'static str,
        probe: &ImageData,
        reference: &ImageData,
    ) -> Result<ScoreResult, BackendError> {
        let first_err = match backend.compare(probe, reference).await {
            Ok(score) => return Ok(score),
            Err(e) => e,
        };

        if first_err.class() == ErrorClass::RateLimited {
            debug!(backend = label, "backend rate limited, skipping retry");
            return Err(first_err);
        }

        warn!(backend = label, error = %first_err, "compare failed, retrying once");
        sleep(self.retry_backoff).await;

        backend.compare(probe, reference).await
    }

    async fn verify_with_retry<B: CompareBackend>(
        &self,
        backend: &B,
        label: &'static str,
        probe: &ImageData,
        reference: &ImageData,
        candidate_name: &str,
    ) -> Result<bool, BackendError> {
        let first_err = match backend.verify(probe, reference, candidate_name).await {
            Ok(verdict) => return Ok(verdict),
            Err(e) => e,
        };

        if first_err.class() == ErrorClass::RateLimited {
            debug!(backend = label, "backend rate limited, skipping retry");
            return Err(first_err);
        }

        warn!(backend = label, error = %first_err, "verify failed, retrying once");
        sleep(self.retry_backoff).await;

        backend.verify(probe, reference, candidate_name).await
    }
}
