//! Simulation runner implementing the round-based experiment loop.
//!
//! The runner owns the ratings log, the regret log and the step counter.
//! Each round it asks the strategy for a user, an item and a rating, logs
//! the outcome, and on checkpoint rounds appends a regret snapshot computed
//! from everything logged so far (the current round included).
//!
//! # Repeated runs
//!
//! `run()` is cumulative. A second call appends to both logs and keeps
//! advancing the step counter; checkpoints are chosen by the round index
//! local to the call while samples record the global step. Call
//! [`Simulation::reset`] first to start a fresh experiment.
//!
//! # Failures
//!
//! A strategy error ends the run immediately and is returned unchanged
//! inside [`SimError::Strategy`]. Nothing is retried and nothing is rolled
//! back: the logs keep every row appended before the failing hook.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use types::{Outcome, RegretSample, Step};

use crate::config::BanditConfig;
use crate::error::{HookKind, Result, SimError, StrategyError};
use crate::hooks::{HookContext, HookRunner, SimulationHook};
use crate::logs::{RatingsLog, RatingsTable, RegretLog, RegretsTable};
use crate::regret::{self, UserRegret};
use crate::traits::BanditStrategy;

/// Pre-round predicate; returning `true` ends the run before that round.
type StopCondition = Box<dyn FnMut(Step) -> bool>;

/// Statistics about the simulation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Current step counter.
    pub step: Step,
    /// Rows in the ratings log.
    pub rounds_completed: usize,
    /// Rows in the regret log.
    pub regrets_logged: usize,
    /// Distinct users seen in the ratings log.
    pub distinct_users: usize,
    /// Distinct (user, item) pairs seen in the ratings log.
    pub distinct_pairs: usize,
}

/// What a single `run()` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rounds executed by this call.
    pub rounds: u64,
    /// Regret snapshots appended by this call.
    pub regrets_logged: usize,
    /// Whether the stop condition ended the run early.
    pub cancelled: bool,
}

/// The main simulation runner.
///
/// # Example
///
/// ```
/// use simulation::{BanditConfig, BanditStrategy, ItemId, Simulation, StrategyError, UserId};
///
/// struct Constant;
///
/// impl BanditStrategy for Constant {
///     fn populate_user(&mut self) -> Result<UserId, StrategyError> { Ok(UserId(0)) }
///     fn select_item(&mut self, _: UserId) -> Result<ItemId, StrategyError> { Ok(ItemId(0)) }
///     fn sim_rating(&mut self, _: UserId, _: ItemId) -> Result<f64, StrategyError> { Ok(10.0) }
/// }
///
/// let config = BanditConfig::new(10, 10, 10, 5).unwrap();
/// let mut sim = Simulation::new(config, Box::new(Constant));
/// sim.run().unwrap();
///
/// assert_eq!(sim.ratings_log().len(), 10);
/// assert_eq!(sim.regrets_log().len(), 1);
/// ```
pub struct Simulation {
    /// Configuration for this simulation.
    config: BanditConfig,

    /// Caller-supplied arrival, selection and reward decisions.
    strategy: Box<dyn BanditStrategy>,

    ratings: RatingsLog,

    regrets: RegretLog,

    /// Global step counter; never reset except by `reset()`.
    step: Step,

    /// Hook runner for simulation observers.
    hooks: HookRunner,

    stop_condition: Option<StopCondition>,
}

impl Simulation {
    /// Create a new simulation with empty logs and the step counter at 0.
    pub fn new(config: BanditConfig, strategy: Box<dyn BanditStrategy>) -> Self {
        Self {
            config,
            strategy,
            ratings: RatingsLog::new(),
            regrets: RegretLog::new(),
            step: 0,
            hooks: HookRunner::new(),
            stop_condition: None,
        }
    }

    /// Add an observer hook.
    pub fn add_hook(&mut self, hook: Arc<dyn SimulationHook>) {
        self.hooks.add(hook);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Install a predicate checked before every round with the current step.
    ///
    /// When it returns `true` the run stops there and `run()` reports
    /// `cancelled: true`. Replaces any previous condition.
    pub fn set_stop_condition(&mut self, condition: impl FnMut(Step) -> bool + 'static) {
        self.stop_condition = Some(Box::new(condition));
    }

    pub fn clear_stop_condition(&mut self) {
        self.stop_condition = None;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &BanditConfig {
        &self.config
    }

    /// Current step counter.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Every logged outcome, in round order.
    pub fn ratings_log(&self) -> &[Outcome] {
        self.ratings.as_slice()
    }

    /// Every logged regret snapshot, in step order.
    pub fn regrets_log(&self) -> &[RegretSample] {
        self.regrets.as_slice()
    }

    /// Columnar copy of the ratings log.
    pub fn ratings_table(&self) -> RatingsTable {
        self.ratings.to_table()
    }

    /// Columnar copy of the regret log.
    pub fn regrets_table(&self) -> RegretsTable {
        self.regrets.to_table()
    }

    /// Regret over the ratings log as it stands, without logging it.
    pub fn current_regret(&self) -> Option<f64> {
        regret::compute_regret(self.ratings.as_slice(), self.config.regret_baseline())
    }

    /// Per-user terms behind [`current_regret`](Self::current_regret).
    pub fn regret_breakdown(&self) -> Vec<UserRegret> {
        regret::per_user_breakdown(self.ratings.as_slice(), self.config.regret_baseline())
    }

    pub fn stats(&self) -> SimulationStats {
        let outcomes = self.ratings.as_slice();
        let distinct_users = outcomes.iter().map(|o| o.user).collect::<HashSet<_>>().len();
        let distinct_pairs = outcomes
            .iter()
            .map(|o| (o.user, o.item))
            .collect::<HashSet<_>>()
            .len();

        SimulationStats {
            step: self.step,
            rounds_completed: self.ratings.len(),
            regrets_logged: self.regrets.len(),
            distinct_users,
            distinct_pairs,
        }
    }

    /// Clear both logs and the step counter.
    ///
    /// The strategy, hooks and stop condition are kept as they are.
    pub fn reset(&mut self) {
        self.ratings.clear();
        self.regrets.clear();
        self.step = 0;
    }

    // =========================================================================
    // Round execution
    // =========================================================================

    fn hook_error(&self, hook: HookKind, source: StrategyError) -> SimError {
        SimError::Strategy {
            hook,
            step: self.step,
            source,
        }
    }

    /// Execute one round.
    ///
    /// `round` is the index within the current run; it decides whether this
    /// round is a regret checkpoint. Returns the logged outcome.
    ///
    /// Order of operations:
    /// 1. `populate_user`, `select_item`, `sim_rating`
    /// 2. Append the outcome, notify the strategy and hooks
    /// 3. On checkpoints, append the regret snapshot (if defined)
    /// 4. Advance the step counter
    pub fn step_round(&mut self, round: u64) -> Result<Outcome> {
        let user = self
            .strategy
            .populate_user()
            .map_err(|e| self.hook_error(HookKind::PopulateUser, e))?;
        let item = self
            .strategy
            .select_item(user)
            .map_err(|e| self.hook_error(HookKind::SelectItem, e))?;
        let rating = self
            .strategy
            .sim_rating(user, item)
            .map_err(|e| self.hook_error(HookKind::SimRating, e))?;

        let outcome = Outcome { user, item, rating };
        self.ratings.push(outcome);
        self.strategy.on_outcome(&outcome);

        if self.config.verbose() {
            debug!(step = self.step, %user, %item, rating, "round logged");
        }

        let ctx = HookContext::new(self.step, round, self.config.num_sims());
        self.hooks.on_round_end(outcome, &ctx);

        if self.config.is_checkpoint(round) {
            self.log_regret(&ctx);
        }

        self.step += 1;
        Ok(outcome)
    }

    fn log_regret(&mut self, ctx: &HookContext) {
        let Some(regret) = self.current_regret() else {
            return;
        };
        let sample = RegretSample::new(self.step, regret);
        self.regrets.push(sample);
        debug!(step = sample.step, regret, "regret snapshot");
        self.hooks.on_regret(sample, ctx);
    }

    /// Run `num_sims` rounds.
    ///
    /// Returns early with `cancelled: true` if the stop condition fires, or
    /// with the first strategy error.
    pub fn run(&mut self) -> Result<RunSummary> {
        let num_sims = self.config.num_sims();
        let regrets_before = self.regrets.len();
        info!(
            strategy = self.strategy.name(),
            num_sims,
            steps_to_log = self.config.steps_to_log(),
            start_step = self.step,
            "starting simulation run"
        );

        let mut rounds = 0;
        let mut cancelled = false;
        for round in 0..num_sims {
            let step = self.step;
            let stop_requested = self
                .stop_condition
                .as_mut()
                .is_some_and(|stop| stop(step));
            if stop_requested {
                warn!(step = self.step, round, "stop condition fired, ending run early");
                cancelled = true;
                break;
            }

            self.step_round(round).inspect_err(|err| {
                warn!(step = self.step, round, error = %err, "strategy hook failed");
            })?;
            rounds += 1;
        }

        let stats = self.stats();
        self.hooks.on_simulation_end(&stats);

        let summary = RunSummary {
            rounds,
            regrets_logged: self.regrets.len() - regrets_before,
            cancelled,
        };
        info!(
            rounds = summary.rounds,
            regrets_logged = summary.regrets_logged,
            cancelled,
            final_regret = ?self.regrets.last().map(|s| s.regret),
            "simulation run finished"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("strategy", &self.strategy.name())
            .field("step", &self.step)
            .field("ratings", &self.ratings.len())
            .field("regrets", &self.regrets.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegretBaseline;
    use types::{ItemId, UserId};

    /// Single user; items cycle through `ratings` by round.
    struct Cycling {
        round: u64,
        ratings: Vec<f64>,
    }

    impl Cycling {
        fn new(ratings: Vec<f64>) -> Self {
            Self { round: 0, ratings }
        }
    }

    impl BanditStrategy for Cycling {
        fn populate_user(&mut self) -> std::result::Result<UserId, StrategyError> {
            Ok(UserId(0))
        }

        fn select_item(&mut self, _user: UserId) -> std::result::Result<ItemId, StrategyError> {
            let item = self.round % self.ratings.len() as u64;
            self.round += 1;
            Ok(ItemId(item))
        }

        fn sim_rating(
            &mut self,
            _user: UserId,
            item: ItemId,
        ) -> std::result::Result<f64, StrategyError> {
            Ok(self.ratings[item.0 as usize])
        }
    }

    fn sim(num_sims: u64, steps_to_log: u64, ratings: Vec<f64>) -> Simulation {
        let config = BanditConfig::new(1, ratings.len() as u64, num_sims, steps_to_log).unwrap();
        Simulation::new(config, Box::new(Cycling::new(ratings)))
    }

    #[test]
    fn test_new_simulation_is_empty() {
        let sim = sim(10, 5, vec![1.0]);
        assert_eq!(sim.step(), 0);
        assert!(sim.ratings_log().is_empty());
        assert!(sim.regrets_log().is_empty());
        assert_eq!(sim.current_regret(), None);
        assert_eq!(sim.stats(), SimulationStats::default());
    }

    #[test]
    fn test_step_round_advances_one_row() {
        let mut sim = sim(10, 5, vec![1.0, 2.0]);
        let outcome = sim.step_round(0).unwrap();

        assert_eq!(outcome, Outcome::new(0u64, 0u64, 1.0));
        assert_eq!(sim.ratings_log(), &[outcome]);
        assert_eq!(sim.step(), 1);
        // round 0 is never a checkpoint
        assert!(sim.regrets_log().is_empty());
    }

    #[test]
    fn test_checkpoint_includes_current_round() {
        let mut sim = sim(10, 5, vec![10.0, 20.0]);
        sim.run().unwrap();

        // rounds 0..=5 logged at step 5: three 10s, three 20s
        assert_eq!(sim.regrets_log(), &[RegretSample::new(5, -5.0)]);
    }

    #[test]
    fn test_max_baseline() {
        let config = BanditConfig::new(1, 2, 10, 5)
            .unwrap()
            .with_regret_baseline(RegretBaseline::MaxObserved);
        let mut sim = Simulation::new(config, Box::new(Cycling::new(vec![10.0, 20.0])));
        sim.run().unwrap();

        assert_eq!(sim.regrets_log(), &[RegretSample::new(5, 5.0)]);
    }

    #[test]
    fn test_repeated_runs_accumulate() {
        let mut sim = sim(10, 5, vec![3.0]);
        sim.run().unwrap();
        let summary = sim.run().unwrap();

        assert_eq!(summary.rounds, 10);
        assert_eq!(summary.regrets_logged, 1);
        assert_eq!(sim.ratings_log().len(), 20);
        assert_eq!(sim.step(), 20);
        let steps: Vec<Step> = sim.regrets_log().iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![5, 15]);
    }

    #[test]
    fn test_reset_clears_logs_and_step() {
        let mut sim = sim(10, 5, vec![3.0]);
        sim.run().unwrap();
        sim.reset();

        assert_eq!(sim.step(), 0);
        assert!(sim.ratings_log().is_empty());
        assert!(sim.regrets_log().is_empty());

        sim.run().unwrap();
        assert_eq!(sim.ratings_log().len(), 10);
        assert_eq!(sim.regrets_log(), &[RegretSample::new(5, 0.0)]);
    }

    #[test]
    fn test_stop_condition_ends_run() {
        let mut sim = sim(10, 2, vec![1.0]);
        sim.set_stop_condition(|step| step >= 3);
        let summary = sim.run().unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.rounds, 3);
        assert_eq!(sim.ratings_log().len(), 3);
        assert_eq!(sim.regrets_log(), &[RegretSample::new(2, 0.0)]);

        sim.clear_stop_condition();
        sim.reset();
        assert!(!sim.run().unwrap().cancelled);
    }

    #[test]
    fn test_stats_counts_distinct_keys() {
        let mut sim = sim(6, 10, vec![1.0, 2.0, 3.0]);
        sim.run().unwrap();

        let stats = sim.stats();
        assert_eq!(stats.step, 6);
        assert_eq!(stats.rounds_completed, 6);
        assert_eq!(stats.regrets_logged, 0);
        assert_eq!(stats.distinct_users, 1);
        assert_eq!(stats.distinct_pairs, 3);
    }

    #[test]
    fn test_tables_match_logs() {
        let mut sim = sim(11, 5, vec![1.0, 2.0]);
        sim.run().unwrap();

        let ratings = sim.ratings_table();
        assert_eq!(ratings.len(), 11);
        assert_eq!(ratings.row(3), Some(sim.ratings_log()[3]));

        let regrets = sim.regrets_table();
        assert_eq!(regrets.steps, vec![5, 10]);
    }
}
