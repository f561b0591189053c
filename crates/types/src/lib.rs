//! Core types for the bandit gym simulation harness.
//!
//! This crate provides the value types shared by the run loop and by
//! strategy implementations: user and item identifiers, the per-round
//! outcome record, and the regret sample.

mod ids;
mod records;

pub use ids::{ItemId, Step, UserId};
pub use records::{Outcome, Rating, RegretSample};
