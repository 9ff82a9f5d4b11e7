//! Matching thresholds shared across the identification pipeline.
//!
//! The three threshold constants define the decision behavior of the ranking
//! engine and are tuned as a set; changing one without the others shifts the
//! false-accept/false-reject balance of the whole scan. Runtime overrides go
//! through [`MatchThresholds`] so they can be validated together.

use thiserror::Error;

/// Confidence at or above which a candidate is accepted immediately,
/// skipping the remaining pool.
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 95.0;

/// Floor a best candidate must clear to be accepted at end of scan.
pub const MINIMUM_CONFIDENCE_THRESHOLD: f32 = 75.0;

/// Required separation between the best and second-best scores for an
/// end-of-scan acceptance.
pub const MINIMUM_SCORE_MARGIN: f32 = 3.0;

/// Lower bound of the confidence range.
pub const SCORE_MIN: f32 = 0.0;

/// Upper bound of the confidence range.
pub const SCORE_MAX: f32 = 100.0;

/// Pause before the single in-backend retry of a failed scoring call.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 300;

/// Runtime threshold configuration for the ranking engine.
///
/// Defaults reproduce the constant values above. Use [`validate`](MatchThresholds::validate)
/// after constructing from external input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    /// Immediate-accept threshold.
    pub high_confidence: f32,
    /// End-of-scan acceptance floor.
    pub minimum_confidence: f32,
    /// Required best/second-best separation.
    pub minimum_margin: f32,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            high_confidence: HIGH_CONFIDENCE_THRESHOLD,
            minimum_confidence: MINIMUM_CONFIDENCE_THRESHOLD,
            minimum_margin: MINIMUM_SCORE_MARGIN,
        }
    }
}

impl MatchThresholds {
    /// Creates a threshold set with explicit values.
    pub fn new(high_confidence: f32, minimum_confidence: f32, minimum_margin: f32) -> Self {
        Self {
            high_confidence,
            minimum_confidence,
            minimum_margin,
        }
    }

    /// Validates that the thresholds form a usable set.
    ///
    /// Returns an error if:
    /// - either confidence threshold falls outside `[0, 100]`
    /// - the margin is negative or not finite
    /// - the floor exceeds the immediate-accept threshold
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for value in [self.high_confidence, self.minimum_confidence] {
            if !value.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&value) {
                return Err(ThresholdError::OutOfRange { value });
            }
        }

        if !self.minimum_margin.is_finite() || self.minimum_margin < 0.0 {
            return Err(ThresholdError::NegativeMargin {
                value: self.minimum_margin,
            });
        }

        if self.minimum_confidence > self.high_confidence {
            return Err(ThresholdError::FloorAboveCeiling {
                minimum: self.minimum_confidence,
                high: self.high_confidence,
            });
        }

        Ok(())
    }
}

/// Errors from threshold validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    /// A confidence threshold is outside the score range.
    #[error("threshold {value} is outside the score range 0..=100")]
    OutOfRange { value: f32 },

    /// The margin is negative or not finite.
    #[error("score margin {value} must be a non-negative number")]
    NegativeMargin { value: f32 },

    /// The acceptance floor exceeds the immediate-accept threshold.
    #[error("minimum confidence {minimum} exceeds high-confidence threshold {high}")]
    FloorAboveCeiling { minimum: f32, high: f32 },
}
