//! Trait definitions for the pluggable parts of an experiment.
//!
//! The run loop owns the logs and the step counter; everything that decides
//! *what happens* in a round lives behind [`BanditStrategy`].

mod strategy;

pub use strategy::BanditStrategy;
