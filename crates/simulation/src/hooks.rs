//! Simulation hooks for observing run lifecycle events.
//!
//! Hooks are **observers**: they receive owned copies of what the run loop
//! just logged and cannot touch the logs themselves. Strategy decisions go
//! through [`BanditStrategy`](crate::BanditStrategy); hooks only watch.
//!
//! # Example
//!
//! ```
//! use simulation::{HookContext, SimulationHook};
//! use simulation::types::Outcome;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! struct RoundCounter {
//!     count: AtomicU64,
//! }
//!
//! impl SimulationHook for RoundCounter {
//!     fn name(&self) -> &str { "RoundCounter" }
//!
//!     fn on_round_end(&self, _outcome: Outcome, _ctx: &HookContext) {
//!         self.count.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//! ```

use std::sync::Arc;

use types::{Outcome, RegretSample, Step};

use crate::SimulationStats;

// ─────────────────────────────────────────────────────────────────────────────
// Hook Context
// ─────────────────────────────────────────────────────────────────────────────

/// Where in the run a hook call happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookContext {
    /// Global step counter (keeps counting across cumulative runs).
    pub step: Step,
    /// Round index within the current `run()` call.
    pub round: u64,
    /// Rounds the current `run()` call was asked to execute.
    pub rounds_in_run: u64,
}

impl HookContext {
    pub fn new(step: Step, round: u64, rounds_in_run: u64) -> Self {
        Self {
            step,
            round,
            rounds_in_run,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SimulationHook Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for simulation observers.
///
/// Use interior mutability (`Mutex`, atomics) for hook-owned state. Hooks are
/// `Send + Sync` so a caller can keep an `Arc` and read it from elsewhere
/// after (or while) the run executes.
///
/// # Lifecycle
///
/// ```text
/// for each round:
///   strategy hooks → outcome appended → on_round_end()
///   (checkpoint rounds) snapshot appended → on_regret()
/// after the last round (or an early stop):
///   on_simulation_end()
/// ```
pub trait SimulationHook: Send + Sync {
    /// Human-readable name for logging and debugging.
    fn name(&self) -> &str;

    /// Called after a round's outcome has been appended to the ratings log.
    #[allow(unused_variables)]
    fn on_round_end(&self, outcome: Outcome, ctx: &HookContext) {}

    /// Called after a regret snapshot has been appended.
    #[allow(unused_variables)]
    fn on_regret(&self, sample: RegretSample, ctx: &HookContext) {}

    /// Called once when `run()` returns successfully.
    #[allow(unused_variables)]
    fn on_simulation_end(&self, final_stats: &SimulationStats) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRunner
// ─────────────────────────────────────────────────────────────────────────────

/// Manages hook registration and sequential invocation.
///
/// Hooks are called in registration order.
#[derive(Default)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn SimulationHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Register a hook. Hooks are called in registration order.
    pub fn add(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Get hook names for debugging.
    pub fn hook_names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }

    pub fn on_round_end(&self, outcome: Outcome, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.on_round_end(outcome, ctx);
        }
    }

    pub fn on_regret(&self, sample: RegretSample, ctx: &HookContext) {
        for hook in &self.hooks {
            hook.on_regret(sample, ctx);
        }
    }

    pub fn on_simulation_end(&self, final_stats: &SimulationStats) {
        for hook in &self.hooks {
            hook.on_simulation_end(final_stats);
        }
    }
}

impl std::fmt::Debug for HookRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRunner")
            .field("hooks", &self.hook_names())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// A no-op hook useful for testing.
#[derive(Debug, Default)]
pub struct NoOpHook;

impl SimulationHook for NoOpHook {
    fn name(&self) -> &str {
        "NoOp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingHook {
        rounds: AtomicU64,
        regrets: Mutex<Vec<RegretSample>>,
        ends: AtomicU64,
    }

    impl CountingHook {
        fn new() -> Self {
            Self {
                rounds: AtomicU64::new(0),
                regrets: Mutex::new(Vec::new()),
                ends: AtomicU64::new(0),
            }
        }
    }

    impl SimulationHook for CountingHook {
        fn name(&self) -> &str {
            "CountingHook"
        }

        fn on_round_end(&self, _outcome: Outcome, _ctx: &HookContext) {
            self.rounds.fetch_add(1, Ordering::Relaxed);
        }

        fn on_regret(&self, sample: RegretSample, _ctx: &HookContext) {
            self.regrets.lock().push(sample);
        }

        fn on_simulation_end(&self, _final_stats: &SimulationStats) {
            self.ends.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_hook_runner_invocation() {
        let hook = Arc::new(CountingHook::new());
        let mut runner = HookRunner::new();
        runner.add(hook.clone());

        let ctx = HookContext::new(5, 5, 10);
        let outcome = Outcome::new(0u64, 0u64, 1.0);

        runner.on_round_end(outcome, &ctx);
        runner.on_round_end(outcome, &ctx);
        runner.on_regret(RegretSample::new(5, 0.0), &ctx);
        runner.on_simulation_end(&SimulationStats::default());

        assert_eq!(hook.rounds.load(Ordering::Relaxed), 2);
        assert_eq!(*hook.regrets.lock(), vec![RegretSample::new(5, 0.0)]);
        assert_eq!(hook.ends.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_multiple_hooks() {
        let hook1 = Arc::new(CountingHook::new());
        let hook2 = Arc::new(CountingHook::new());

        let mut runner = HookRunner::new();
        runner.add(hook1.clone());
        runner.add(hook2.clone());

        runner.on_round_end(Outcome::new(1u64, 1u64, 2.0), &HookContext::new(0, 0, 1));

        assert_eq!(hook1.rounds.load(Ordering::Relaxed), 1);
        assert_eq!(hook2.rounds.load(Ordering::Relaxed), 1);
        assert_eq!(runner.len(), 2);
    }

    #[test]
    fn test_hook_names() {
        let mut runner = HookRunner::new();
        assert!(runner.is_empty());
        runner.add(Arc::new(NoOpHook));
        runner.add(Arc::new(CountingHook::new()));

        assert_eq!(runner.hook_names(), vec!["NoOp", "CountingHook"]);
    }
}
