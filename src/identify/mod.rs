//! The face identification orchestrator.
//!
//! One [`identify`](FaceIdentifier::identify) call runs the full pipeline:
//! prepare the candidate pool, score candidates sequentially through the
//! scorer adapter, accumulate in a per-call [`RankingState`], and decide.
//!
//! Candidates are deliberately scored one at a time, not fanned out: a
//! high-confidence match stops the scan, and a parallel fan-out would issue
//! calls that end up discarded (or need cancellation). The ordering makes
//! the short-circuit order-sensitive; with several candidates above the
//! high-confidence threshold the first in preparation order wins, which is
//! an accepted property of the scan.


use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::backend::{CompareBackend, GenaiBackend};
use crate::candidate::{Candidate, ImageData, prepare_candidates};
use crate::config::{Config, ConfigError};
use crate::constants::MatchThresholds;
use crate::ranking::{RankOutcome, RankingState};
use crate::scoring::{ScorerAdapter, ScoringError};

/// Outcome of one identification call. Ownership passes to the caller;
/// nothing is retained between calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    /// Whether a matching candidate was found.
    pub match_found: bool,
    /// The matched candidate, or `None` if no match was found.
    pub matched_candidate: Option<Candidate>,
}

impl IdentificationResult {
    /// A positive result carrying the matched candidate.
    pub fn matched(candidate: Candidate) -> Self {
        Self {
            match_found: true,
            matched_candidate: Some(candidate),
        }
    }

    /// A definitive no-match result.
    pub fn no_match() -> Self {
        Self {
            match_found: false,
            matched_candidate: None,
        }
    }
}

/// Multi-stage face identification over an injected backend pair.
pub struct FaceIdentifier<P: CompareBackend, F: CompareBackend> {
    scorer: ScorerAdapter<P, F>,
    thresholds: MatchThresholds,
}

impl<P: CompareBackend, F: CompareBackend> std::fmt::Debug for FaceIdentifier<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceIdentifier")
            .field("scorer", &self.scorer)
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl<P: CompareBackend, F: CompareBackend> FaceIdentifier<P, F> {
    /// Creates an identifier with default thresholds.
    pub fn new(scorer: ScorerAdapter<P, F>) -> Self {
        Self::with_thresholds(scorer, MatchThresholds::default())
    }

    /// Creates an identifier with explicit thresholds.
    pub fn with_thresholds(scorer: ScorerAdapter<P, F>, thresholds: MatchThresholds) -> Self {
        Self { scorer, thresholds }
    }

    /// The underlying scorer adapter.
    pub fn scorer(&self) -> &ScorerAdapter<P, F> {
        &self.scorer
    }

    /// The configured thresholds.
    pub fn thresholds(&self) -> MatchThresholds {
        self.thresholds
    }

    /// Identifies the person in `probe` against the candidate pool.
    ///
    /// Failures while scoring a single candidate are absorbed here: the
    /// candidate is skipped (logged) and the scan continues. The call
    /// itself is infallible; an unmatchable pool yields a definitive
    /// no-match result.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn identify(
        &self,
        probe: &ImageData,
        candidates: &[Candidate],
    ) -> IdentificationResult {
        let prepared = prepare_candidates(candidates);

        if prepared.is_empty() {
            info!("no scoreable candidates, returning no match");
            return IdentificationResult::no_match();
        }

        let mut state = RankingState::new(self.thresholds);

        for scoreable in &prepared {
            let candidate = &scoreable.candidate;
            debug!(id = %candidate.id, name = %candidate.name, "scoring candidate");

            let score = match self.scorer.score(probe, &scoreable.image).await {
                Ok(score) => score.confidence,
                Err(ScoringError::RateLimited) => {
                    info!(id = %candidate.id, "scoring skipped, all backends rate limited");
                    continue;
                }
                Err(e) => {
                    warn!(id = %candidate.id, error = %e, "scoring failed, skipping candidate");
                    continue;
                }
            };

            debug!(id = %candidate.id, score, "confidence score obtained");

            if let RankOutcome::Accept(matched) = state.observe(candidate, score) {
                info!(id = %matched.id, score, "high-confidence match found");
                return IdentificationResult::matched(matched);
            }
        }

        let second_best = state.second_best_score();
        match state.finalize() {
            Some(best) => {
                info!(
                    id = %best.candidate.id,
                    score = best.score,
                    second_best,
                    "best candidate accepted without final verification"
                );
                IdentificationResult::matched(best.candidate)
            }
            None => {
                info!("no definitive match found after scan");
                IdentificationResult::no_match()
            }
        }
    }
}

impl FaceIdentifier<GenaiBackend, GenaiBackend> {
    /// Builds an identifier over live model backends from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let scorer = ScorerAdapter::new(
            GenaiBackend::new(&config.primary_model),
            GenaiBackend::new(&config.fallback_model),
        )
        .with_backoff(config.retry_backoff());

        Ok(Self::with_thresholds(scorer, config.thresholds))
    }
}
