//! MetricsHook - Built-in hook for aggregating run statistics.
//!
//! Collects per-round and per-snapshot values and summarizes them. Useful
//! for progress reporting and for checking a regret curve without copying
//! the full logs out of the engine.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use types::{Outcome, RegretSample};

use crate::hooks::{HookContext, SimulationHook};

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    /// Rounds observed.
    pub total_rounds: u64,
    /// Regret snapshots observed.
    pub total_snapshots: u64,
    /// Mean rating across observed rounds (0.0 before the first round).
    pub mean_rating: f64,
    /// Most recent regret value.
    pub last_regret: Option<f64>,
    /// Smallest regret value seen.
    pub min_regret: Option<f64>,
    /// Largest regret value seen.
    pub max_regret: Option<f64>,
}

#[derive(Debug, Default)]
struct FloatState {
    rating_sum: f64,
    last_regret: Option<f64>,
    min_regret: Option<f64>,
    max_regret: Option<f64>,
    /// Limited to `max_history` entries to bound memory.
    regret_history: Vec<RegretSample>,
}

/// Built-in hook for collecting simulation metrics.
///
/// Counters are atomics; float accumulators sit behind a mutex.
pub struct MetricsHook {
    round_count: AtomicU64,
    snapshot_count: AtomicU64,
    state: Mutex<FloatState>,
    max_history: usize,
}

impl MetricsHook {
    /// Create a new metrics hook with default settings.
    pub fn new() -> Self {
        Self::with_max_history(10_000)
    }

    /// Create a metrics hook with custom history limit.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            round_count: AtomicU64::new(0),
            snapshot_count: AtomicU64::new(0),
            state: Mutex::new(FloatState {
                regret_history: Vec::with_capacity(max_history.min(10_000)),
                ..FloatState::default()
            }),
            max_history,
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_rounds = self.round_count.load(Ordering::Relaxed);
        let state = self.state.lock();

        let mean_rating = if total_rounds > 0 {
            state.rating_sum / total_rounds as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_rounds,
            total_snapshots: self.snapshot_count.load(Ordering::Relaxed),
            mean_rating,
            last_regret: state.last_regret,
            min_regret: state.min_regret,
            max_regret: state.max_regret,
        }
    }

    /// Regret samples seen so far (bounded by `max_history`).
    pub fn regret_history(&self) -> Vec<RegretSample> {
        self.state.lock().regret_history.clone()
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.round_count.store(0, Ordering::Relaxed);
        self.snapshot_count.store(0, Ordering::Relaxed);
        let mut state = self.state.lock();
        state.rating_sum = 0.0;
        state.last_regret = None;
        state.min_regret = None;
        state.max_regret = None;
        state.regret_history.clear();
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_round_end(&self, outcome: Outcome, _ctx: &HookContext) {
        self.state.lock().rating_sum += outcome.rating;
        self.round_count.fetch_add(1, Ordering::Relaxed);
    }

    fn on_regret(&self, sample: RegretSample, _ctx: &HookContext) {
        self.snapshot_count.fetch_add(1, Ordering::Relaxed);

        let mut state = self.state.lock();
        let regret = sample.regret;
        state.last_regret = Some(regret);
        state.min_regret = Some(state.min_regret.map_or(regret, |m| m.min(regret)));
        state.max_regret = Some(state.max_regret.map_or(regret, |m| m.max(regret)));

        if state.regret_history.len() < self.max_history {
            state.regret_history.push(sample);
        }
    }
}
