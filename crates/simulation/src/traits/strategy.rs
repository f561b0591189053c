//! Strategy hooks driven by the run loop.

use types::{ItemId, Outcome, Rating, UserId};

use crate::error::StrategyError;

/// The three per-round decisions of an experiment.
///
/// Implementations own whatever state they need (RNGs, per-user histories,
/// model parameters). The engine calls, in order, [`populate_user`],
/// [`select_item`] and [`sim_rating`] once per round, then reports the
/// realized outcome through [`on_outcome`].
///
/// Any error returned from a hook aborts the run and reaches the caller
/// unchanged. Return [`StrategyError::Stop`] to end an experiment early on
/// purpose.
///
/// [`populate_user`]: BanditStrategy::populate_user
/// [`select_item`]: BanditStrategy::select_item
/// [`sim_rating`]: BanditStrategy::sim_rating
/// [`on_outcome`]: BanditStrategy::on_outcome
///
/// # Example
///
/// ```
/// use simulation::{BanditStrategy, ItemId, StrategyError, UserId};
///
/// struct AlwaysFirst;
///
/// impl BanditStrategy for AlwaysFirst {
///     fn populate_user(&mut self) -> Result<UserId, StrategyError> {
///         Ok(UserId(0))
///     }
///
///     fn select_item(&mut self, _user: UserId) -> Result<ItemId, StrategyError> {
///         Ok(ItemId(0))
///     }
///
///     fn sim_rating(&mut self, _user: UserId, _item: ItemId) -> Result<f64, StrategyError> {
///         Ok(1.0)
///     }
/// }
/// ```
pub trait BanditStrategy {
    /// Label used in tracing output.
    fn name(&self) -> &str {
        "strategy"
    }

    /// Pick the user arriving this round.
    fn populate_user(&mut self) -> Result<UserId, StrategyError>;

    /// Choose an item for `user`.
    fn select_item(&mut self, user: UserId) -> Result<ItemId, StrategyError>;

    /// Produce the realized rating for the pair. May be stochastic.
    fn sim_rating(&mut self, user: UserId, item: ItemId) -> Result<Rating, StrategyError>;

    /// Feedback after the outcome has been logged.
    #[allow(unused_variables)]
    fn on_outcome(&mut self, outcome: &Outcome) {}
}
