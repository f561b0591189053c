//! Simulation configuration options.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which per-item mean counts as a user's "best observed" reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegretBaseline {
    /// Lowest per-item mean. Regret can come out negative under this
    /// baseline; it matches the reference experiments' numbers.
    #[default]
    MinObserved,
    /// Highest per-item mean. Regret is never negative.
    MaxObserved,
}

/// Scale parameters for one experiment.
///
/// Built once through [`BanditConfig::new`], which rejects zero values where
/// the run loop needs a positive one. Fields are read through accessors so a
/// validated config cannot be edited back into an invalid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBanditConfig")]
pub struct BanditConfig {
    num_users: u64,
    num_items: u64,
    num_sims: u64,
    steps_to_log: u64,
    regret_baseline: RegretBaseline,
    verbose: bool,
}

impl BanditConfig {
    /// Create a validated configuration.
    ///
    /// `num_sims == 0` is accepted and makes `run()` a no-op.
    pub fn new(
        num_users: u64,
        num_items: u64,
        num_sims: u64,
        steps_to_log: u64,
    ) -> Result<Self, ConfigError> {
        if num_users == 0 {
            return Err(ConfigError::ZeroUsers);
        }
        if num_items == 0 {
            return Err(ConfigError::ZeroItems);
        }
        if steps_to_log == 0 {
            return Err(ConfigError::ZeroStepsToLog);
        }
        Ok(Self {
            num_users,
            num_items,
            num_sims,
            steps_to_log,
            regret_baseline: RegretBaseline::default(),
            verbose: false,
        })
    }

    /// Set the baseline used for "best observed" reward.
    pub fn with_regret_baseline(mut self, baseline: RegretBaseline) -> Self {
        self.regret_baseline = baseline;
        self
    }

    /// Enable per-round debug events.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Size of the user universe (advisory).
    pub fn num_users(&self) -> u64 {
        self.num_users
    }

    /// Size of the item catalog (advisory).
    pub fn num_items(&self) -> u64 {
        self.num_items
    }

    /// Rounds executed by each call to `run()`.
    pub fn num_sims(&self) -> u64 {
        self.num_sims
    }

    /// Regret checkpoint cadence, in rounds.
    pub fn steps_to_log(&self) -> u64 {
        self.steps_to_log
    }

    pub fn regret_baseline(&self) -> RegretBaseline {
        self.regret_baseline
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether round index `round` (local to one run) is a regret checkpoint.
    pub fn is_checkpoint(&self, round: u64) -> bool {
        round > 0 && round % self.steps_to_log == 0
    }
}

/// Unvalidated mirror used by serde before [`BanditConfig::new`] runs.
#[derive(Deserialize)]
struct RawBanditConfig {
    num_users: u64,
    num_items: u64,
    num_sims: u64,
    steps_to_log: u64,
    #[serde(default)]
    regret_baseline: RegretBaseline,
    #[serde(default)]
    verbose: bool,
}

impl TryFrom<RawBanditConfig> for BanditConfig {
    type Error = ConfigError;

    fn try_from(raw: RawBanditConfig) -> Result<Self, Self::Error> {
        Ok(
            BanditConfig::new(raw.num_users, raw.num_items, raw.num_sims, raw.steps_to_log)?
                .with_regret_baseline(raw.regret_baseline)
                .with_verbose(raw.verbose),
        )
    }
}
