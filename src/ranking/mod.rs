//! Running best/second-best tracking and the match decision rules.
//!
//! A single pass over the scored candidates maintains two running maxima.
//! Three rules decide the outcome: a score at or above the high-confidence
//! threshold accepts immediately (the only early exit); at end of scan the
//! best candidate is accepted iff it clears the confidence floor and leads
//! the second-best score by the required margin. An ambiguous lead (two
//! candidates near the top) is rejected rather than guessed.


use tracing::debug;

use crate::candidate::Candidate;
use crate::constants::MatchThresholds;

/// The current best candidate and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    /// The candidate record.
    pub candidate: Candidate,
    /// Its confidence score.
    pub score: f32,
}

/// Outcome of feeding one score into the ranking state.
#[derive(Debug, Clone, PartialEq)]
pub enum RankOutcome {
    /// Score reached the high-confidence threshold; stop scanning and
    /// accept this candidate.
    Accept(Candidate),
    /// Keep scanning.
    Continue,
}

/// Per-call ranking state. One identification call owns exactly one of
/// these; concurrent calls never share it.
#[derive(Debug)]
pub struct RankingState {
    thresholds: MatchThresholds,
    best: Option<RankedCandidate>,
    second_best_score: f32,
}

impl RankingState {
    /// Creates an empty state with the given thresholds.
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self {
            thresholds,
            best: None,
            second_best_score: 0.0,
        }
    }

    /// Feeds one scored candidate into the running state.
    ///
    /// Only a strictly greater score replaces the best; the displaced
    /// best's score folds into the second-best via `max`. A score tying the
    /// current best raises the second-best to that score instead, which
    /// collapses the margin and blocks an ambiguous end-of-scan accept.
    pub fn observe(&mut self, candidate: &Candidate, score: f32) -> RankOutcome {
        if score >= self.thresholds.high_confidence {
            debug!(id = %candidate.id, score, "high-confidence match, short-circuiting");
            return RankOutcome::Accept(candidate.clone());
        }

        let replaces_best = self.best.as_ref().is_none_or(|best| score > best.score);

        if replaces_best {
            if let Some(previous) = self.best.take() {
                self.second_best_score = self.second_best_score.max(previous.score);
            }
            self.best = Some(RankedCandidate {
                candidate: candidate.clone(),
                score,
            });
        } else if score > self.second_best_score {
            self.second_best_score = score;
        }

        RankOutcome::Continue
    }

    /// The best candidate seen so far.
    pub fn best(&self) -> Option<&RankedCandidate> {
        self.best.as_ref()
    }

    /// The second-best score seen so far (0 until two candidates scored).
    pub fn second_best_score(&self) -> f32 {
        self.second_best_score
    }

    /// End-of-scan decision: the best candidate iff it clears the
    /// confidence floor and leads the second-best by the required margin.
    pub fn finalize(self) -> Option<RankedCandidate> {
        let second_best = self.second_best_score;
        let thresholds = self.thresholds;

        self.best.filter(|best| {
            best.score >= thresholds.minimum_confidence
                && best.score - second_best >= thresholds.minimum_margin
        })
    }
}
