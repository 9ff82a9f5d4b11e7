//! Per-candidate scoring with retry, fallback, and rate-limit handling.
//!
//! [`ScorerAdapter`] fronts the primary and fallback comparison backends
//! behind a single `score` call. The design rule: a single backend outage or
//! one model's quota exhaustion must never block the whole scan. Each
//! backend gets at most two attempts (one retry after a short backoff,
//! skipped when the failure is rate-limit-classified), primary first, then
//! fallback.

pub mod adapter;
pub mod error;


pub use adapter::ScorerAdapter;
pub use error::ScoringError;
