//! Log record types produced by the run loop.

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, Step, UserId};

/// Realized reward for a (user, item) pair.
pub type Rating = f64;

/// One round's realized outcome: which user arrived, which item was shown,
/// and the rating it earned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub user: UserId,
    pub item: ItemId,
    pub rating: Rating,
}

impl Outcome {
    /// Create a new outcome record.
    pub fn new(user: impl Into<UserId>, item: impl Into<ItemId>, rating: Rating) -> Self {
        Self {
            user: user.into(),
            item: item.into(),
            rating,
        }
    }
}

/// Regret measured at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegretSample {
    /// Step at which the snapshot was taken.
    pub step: Step,
    /// Mean per-user gap between best observed and average reward.
    pub regret: f64,
}

impl RegretSample {
    pub fn new(step: Step, regret: f64) -> Self {
        Self { step, regret }
    }
}
