use std::collections::HashSet;

use tracing::debug;

use super::{Candidate, ScoreableCandidate};

/// Deduplicates and filters the candidate pool ahead of scoring.
///
/// Dedup is by candidate id, first occurrence wins; later duplicates are
/// dropped. Candidates without usable embedded image data are dropped as
/// well. Both exclusions are logged, never surfaced as errors. Output
/// preserves first-seen order, which the scoring loop relies on for its
/// short-circuit behavior.
pub fn prepare_candidates(candidates: &[Candidate]) -> Vec<ScoreableCandidate> {
    let mut seen_ids: HashSet<&str> = HashSet::with_capacity(candidates.len());
    let mut prepared = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        if !seen_ids.insert(candidate.id.as_str()) {
            debug!(
                id = %candidate.id,
                name = %candidate.name,
                "skipping duplicate candidate"
            );
            continue;
        }

        let Some(image) = candidate.image() else {
            debug!(
                id = %candidate.id,
                name = %candidate.name,
                "skipping candidate without usable reference image"
            );
            continue;
        };

        prepared.push(ScoreableCandidate {
            candidate: candidate.clone(),
            image,
        });
    }

    debug!(
        input = candidates.len(),
        scoreable = prepared.len(),
        "candidate pool prepared"
    );

    prepared
}
