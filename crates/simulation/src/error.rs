//! Error types for configuration, strategy hooks, and the run loop.

use std::error::Error as StdError;
use std::fmt;

use types::Step;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Boxed error raised by a strategy implementation.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("num_users must be positive")]
    ZeroUsers,

    #[error("num_items must be positive")]
    ZeroItems,

    /// Zero would make every round a modulo-by-zero checkpoint test.
    #[error("steps_to_log must be positive")]
    ZeroStepsToLog,
}

/// Failure raised from inside a strategy hook.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// The strategy asked the run to end here.
    #[error("stopped by strategy: {reason}")]
    Stop { reason: String },

    /// Any other failure in the strategy.
    #[error("{0}")]
    Failed(#[source] BoxError),
}

impl StrategyError {
    /// Signal a deliberate early stop.
    pub fn stop(reason: impl Into<String>) -> Self {
        StrategyError::Stop {
            reason: reason.into(),
        }
    }

    /// Wrap an arbitrary error.
    pub fn failed(err: impl Into<BoxError>) -> Self {
        StrategyError::Failed(err.into())
    }
}

/// Which strategy hook was executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    PopulateUser,
    SelectItem,
    SimRating,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::PopulateUser => "populate_user",
            HookKind::SelectItem => "select_item",
            HookKind::SimRating => "sim_rating",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by `Simulation::run`.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A strategy hook failed; logs keep everything appended before it.
    #[error("{hook} failed at step {step}: {source}")]
    Strategy {
        hook: HookKind,
        step: Step,
        #[source]
        source: StrategyError,
    },
}

impl SimError {
    /// Whether the failure is a deliberate [`StrategyError::Stop`].
    pub fn is_stop(&self) -> bool {
        matches!(
            self,
            SimError::Strategy {
                source: StrategyError::Stop { .. },
                ..
            }
        )
    }

    /// The hook that failed.
    pub fn hook(&self) -> HookKind {
        match self {
            SimError::Strategy { hook, .. } => *hook,
        }
    }
}
