//! Scripted in-memory backend for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::candidate::ImageData;

use super::CompareBackend;
use super::error::BackendError;
use super::types::ScoreResult;

/// Deterministic [`CompareBackend`] whose answers are scripted per reference
/// image (keyed by the full data URI).
///
/// One-shot outcomes pushed with [`push_outcome`](Self::push_outcome) are
/// consumed in order before the steady score set with
/// [`score_for`](Self::score_for); an unscripted reference fails with a
/// transport error so tests notice unexpected calls. Every call is recorded
/// for assertions on call counts and ordering.
#[derive(Debug, Default)]
pub struct MockCompareBackend {
    state: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    queued: HashMap<String, VecDeque<Result<f32, BackendError>>>,
    steady: HashMap<String, f32>,
    queued_verdicts: HashMap<String, VecDeque<Result<bool, BackendError>>>,
    verdicts: HashMap<String, bool>,
    compare_calls: Vec<String>,
    verify_calls: Vec<String>,
}

impl MockCompareBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the steady-state score returned for `reference` once any queued
    /// outcomes are exhausted.
    pub fn score_for(&self, reference: &str, confidence: f32) {
        let mut state = self.lock();
        state.steady.insert(reference.to_string(), confidence);
    }

    /// Queues a one-shot outcome for `reference`, consumed before the
    /// steady score.
    pub fn push_outcome(&self, reference: &str, outcome: Result<f32, BackendError>) {
        let mut state = self.lock();
        state
            .queued
            .entry(reference.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Sets the verdict returned by `verify` for `reference`. Defaults to
    /// `false` when unset.
    pub fn verdict_for(&self, reference: &str, is_match: bool) {
        let mut state = self.lock();
        state.verdicts.insert(reference.to_string(), is_match);
    }

    /// Queues a one-shot `verify` outcome for `reference`, consumed before
    /// the steady verdict.
    pub fn push_verify_outcome(&self, reference: &str, outcome: Result<bool, BackendError>) {
        let mut state = self.lock();
        state
            .queued_verdicts
            .entry(reference.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Reference images of every `compare` call, in call order.
    pub fn compare_calls(&self) -> Vec<String> {
        self.lock().compare_calls.clone()
    }

    /// Total number of `compare` calls.
    pub fn compare_count(&self) -> usize {
        self.lock().compare_calls.len()
    }

    /// Total number of `verify` calls.
    pub fn verify_count(&self) -> usize {
        self.lock().verify_calls.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panic while holding the lock is already a failed test.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CompareBackend for MockCompareBackend {
    async fn compare(
        &self,
        _probe: &ImageData,
        reference: &ImageData,
    ) -> Result<ScoreResult, BackendError> {
        let mut state = self.lock();
        state.compare_calls.push(reference.as_str().to_string());

        if let Some(queue) = state.queued.get_mut(reference.as_str())
            && let Some(outcome) = queue.pop_front()
        {
            return outcome.map(ScoreResult::new);
        }

        match state.steady.get(reference.as_str()) {
            Some(&confidence) => Ok(ScoreResult::new(confidence)),
            None => Err(BackendError::Transport {
                message: "mock backend: no scripted outcome for reference image".to_string(),
            }),
        }
    }

    async fn verify(
        &self,
        _probe: &ImageData,
        reference: &ImageData,
        _candidate_name: &str,
    ) -> Result<bool, BackendError> {
        let mut state = self.lock();
        state.verify_calls.push(reference.as_str().to_string());

        if let Some(queue) = state.queued_verdicts.get_mut(reference.as_str())
            && let Some(outcome) = queue.pop_front()
        {
            return outcome;
        }

        Ok(state
            .verdicts
            .get(reference.as_str())
            .copied()
            .unwrap_or(false))
    }
}
