//! Image-comparison backend bindings.
//!
//! A backend answers two questions about a pair of images: "how likely are
//! these the same person" ([`CompareBackend::compare`]) and "is this
//! definitively the same person" ([`CompareBackend::verify`]). The live
//! binding ([`GenaiBackend`]) drives a multimodal model through the `genai`
//! client; [`MockCompareBackend`] provides scripted answers for tests.
//!
//! Backends fail with the structured [`BackendError`], whose
//! [`class`](BackendError::class) drives the retry/skip policy in the
//! scorer adapter.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod types;


pub use client::GenaiBackend;
pub use error::{BackendError, ErrorClass};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCompareBackend;
pub use types::ScoreResult;

use crate::candidate::ImageData;

/// Uniform contract over the primary and fallback classification backends.
pub trait CompareBackend: Send + Sync {
    /// Scores the likelihood that `probe` and `reference` show the same
    /// person, on a 0-100 scale.
    fn compare(
        &self,
        probe: &ImageData,
        reference: &ImageData,
    ) -> impl std::future::Future<Output = Result<ScoreResult, BackendError>> + Send;

    /// Binary same-person confirmation for a top candidate.
    ///
    /// Part of the external collaborator's contract; the identification
    /// decision path does not call it (the margin rule stands in for it).
    fn verify(
        &self,
        probe: &ImageData,
        reference: &ImageData,
        candidate_name: &str,
    ) -> impl std::future::Future<Output = Result<bool, BackendError>> + Send;
}
