//! Face identification core for the emergency face-scan flow.
//!
//! Given a probe image captured at intake and the registry's candidate
//! pool, [`FaceIdentifier::identify`] runs a multi-stage scan and returns
//! whether a registered person matches:
//!
//! 1. **Prepare** — dedup the pool by id and drop candidates without
//!    usable embedded image data ([`candidate`]).
//! 2. **Score** — sequentially obtain a 0-100 same-person confidence for
//!    each candidate from an external classification model, with a
//!    primary/fallback backend pair, one-retry policy, and rate-limit-aware
//!    skipping ([`scoring`], [`backend`]).
//! 3. **Rank** — track best and second-best scores; accept immediately at
//!    high confidence, otherwise accept at end of scan only when the best
//!    clears the confidence floor and leads by a minimum margin
//!    ([`ranking`]).
//!
//! The crate has no network or CLI surface of its own; the surrounding
//! application supplies the candidate list and acts on the result. Failures
//! scoring any single candidate are absorbed and logged, so a partial
//! backend outage degrades the scan instead of failing it.
//!
//! # Example
//!
//! ```no_run
//! use facematch::{Config, FaceIdentifier, ImageData};
//!
//! # async fn run(candidates: Vec<facematch::Candidate>) {
//! let identifier = FaceIdentifier::from_config(&Config::from_env().unwrap()).unwrap();
//! let probe = ImageData::parse("data:image/jpeg;base64,...").unwrap();
//! let result = identifier.identify(&probe, &candidates).await;
//! if let Some(patient) = result.matched_candidate {
//!     println!("matched {}", patient.name);
//! }
//! # }
//! ```

pub mod backend;
pub mod candidate;
pub mod config;
pub mod constants;
pub mod identify;
pub mod ranking;
pub mod scoring;

pub use backend::{BackendError, CompareBackend, ErrorClass, GenaiBackend, ScoreResult};
#[cfg(any(test, feature = "mock"))]
pub use backend::MockCompareBackend;

pub use candidate::{Candidate, ImageData, ScoreableCandidate, prepare_candidates};
pub use config::{Config, ConfigError, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL};
pub use constants::{
    DEFAULT_RETRY_BACKOFF_MS, HIGH_CONFIDENCE_THRESHOLD, MINIMUM_CONFIDENCE_THRESHOLD,
    MINIMUM_SCORE_MARGIN, MatchThresholds, ThresholdError,
};
pub use identify::{FaceIdentifier, IdentificationResult};
pub use ranking::{RankOutcome, RankedCandidate, RankingState};
pub use scoring::{ScorerAdapter, ScoringError};
