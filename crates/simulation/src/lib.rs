//! Simulation crate: the experiment loop for the bandit gym.
//!
//! This crate runs multi-user bandit experiments in the shape of a
//! recommendation system: users arrive one per round, a policy picks an item
//! for the arriving user, and a reward model rates the pair. The crate owns
//! the protocol around those decisions:
//!
//! - Round-based event loop
//! - Append-only ratings and regret logs
//! - Periodic regret snapshots over the data logged so far
//! - Hook-based observation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          Simulation.step_round(i)           │
//! │                                             │
//! │  1. strategy.populate_user()   → user       │
//! │  2. strategy.select_item(user) → item       │
//! │  3. strategy.sim_rating(user, item)         │
//! │  4. Append outcome to ratings log           │
//! │  5. strategy.on_outcome, hooks.on_round_end │
//! │  6. If i > 0 and i % steps_to_log == 0:     │
//! │       append regret snapshot, on_regret     │
//! │  7. Advance step counter                    │
//! │                                             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The three decisions come from a caller-supplied [`BanditStrategy`]; the
//! crate ships no policies of its own.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use simulation::{BanditConfig, BanditStrategy, ItemId, MetricsHook, Simulation, StrategyError, UserId};
//!
//! struct RoundRobin { next: u64 }
//!
//! impl BanditStrategy for RoundRobin {
//!     fn populate_user(&mut self) -> Result<UserId, StrategyError> { Ok(UserId(0)) }
//!     fn select_item(&mut self, _: UserId) -> Result<ItemId, StrategyError> {
//!         self.next += 1;
//!         Ok(ItemId(self.next % 2))
//!     }
//!     fn sim_rating(&mut self, _: UserId, item: ItemId) -> Result<f64, StrategyError> {
//!         Ok(if item == ItemId(0) { 1.0 } else { 0.0 })
//!     }
//! }
//!
//! let config = BanditConfig::new(1, 2, 100, 10).unwrap();
//! let mut sim = Simulation::new(config, Box::new(RoundRobin { next: 0 }));
//! let metrics = Arc::new(MetricsHook::new());
//! sim.add_hook(metrics.clone());
//!
//! let summary = sim.run().unwrap();
//! assert_eq!(summary.regrets_logged, 9);
//! assert_eq!(metrics.snapshot().total_rounds, 100);
//! ```

pub mod config;
pub mod error;
mod hooks;
pub mod logs;
mod metrics;
pub mod regret;
mod runner;
pub mod traits;

pub use types;
pub use types::{ItemId, Outcome, Rating, RegretSample, Step, UserId};

pub use config::{BanditConfig, RegretBaseline};
pub use error::{BoxError, ConfigError, HookKind, Result, SimError, StrategyError};
pub use hooks::{HookContext, HookRunner, NoOpHook, SimulationHook};
pub use logs::{RatingsTable, RegretsTable};
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use regret::UserRegret;
pub use runner::{RunSummary, Simulation, SimulationStats};
pub use traits::BanditStrategy;
