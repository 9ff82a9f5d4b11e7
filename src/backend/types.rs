use crate::constants::{SCORE_MAX, SCORE_MIN};

/// A same-person confidence score for one (probe, candidate) pair.
///
/// The contained value is always within `[0, 100]`; the constructor clamps,
/// so downstream ranking code does not re-validate the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    /// Clamped confidence score.
    pub confidence: f32,
}

impl ScoreResult {
    /// Creates a score, clamping into the valid range. NaN maps to the
    /// lower bound.
    pub fn new(confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            SCORE_MIN
        } else {
            confidence.clamp(SCORE_MIN, SCORE_MAX)
        };

        Self { confidence }
    }
}
