//! Regret estimation over the ratings log.
//!
//! For each observed user the snapshot compares two quantities taken from
//! the data logged so far:
//!
//! - **average reward**: mean rating over every round the user arrived in;
//! - **best observed reward**: the per-item mean rating, reduced over the
//!   items the user was shown according to [`RegretBaseline`].
//!
//! The snapshot is the mean of `best - average` over observed users. Users
//! that never arrived are left out rather than counted as zero.
//!
//! Grouping goes through `BTreeMap`, so summation order (and therefore the
//! exact floating-point result) depends only on the log contents.

use std::collections::BTreeMap;

use types::{ItemId, Outcome, UserId};

use crate::config::RegretBaseline;

/// Running sum and count for an arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: u64,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Per-user terms behind a regret snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserRegret {
    pub user: UserId,
    /// Mean rating over all of the user's rounds.
    pub average_reward: f64,
    /// Baseline-selected per-item mean rating.
    pub best_reward: f64,
    /// Number of rounds the user arrived in.
    pub rounds: u64,
    /// Number of distinct items the user was shown.
    pub items_tried: usize,
}

impl UserRegret {
    /// `best_reward - average_reward`.
    pub fn regret(&self) -> f64 {
        self.best_reward - self.average_reward
    }
}

/// Compute the per-user regret terms, ordered by user id.
///
/// Returns an empty vec for an empty log.
pub fn per_user_breakdown(outcomes: &[Outcome], baseline: RegretBaseline) -> Vec<UserRegret> {
    let mut by_user: BTreeMap<UserId, MeanAccumulator> = BTreeMap::new();
    let mut by_pair: BTreeMap<(UserId, ItemId), MeanAccumulator> = BTreeMap::new();

    for outcome in outcomes {
        by_user.entry(outcome.user).or_default().push(outcome.rating);
        by_pair
            .entry((outcome.user, outcome.item))
            .or_default()
            .push(outcome.rating);
    }

    // Reduce per-item means to one baseline value per user.
    let mut best: BTreeMap<UserId, (f64, usize)> = BTreeMap::new();
    for (&(user, _item), acc) in &by_pair {
        let mean = acc.mean();
        best.entry(user)
            .and_modify(|(current, tried)| {
                *current = match baseline {
                    RegretBaseline::MinObserved => current.min(mean),
                    RegretBaseline::MaxObserved => current.max(mean),
                };
                *tried += 1;
            })
            .or_insert((mean, 1));
    }

    by_user
        .into_iter()
        .filter_map(|(user, acc)| {
            let &(best_reward, items_tried) = best.get(&user)?;
            Some(UserRegret {
                user,
                average_reward: acc.mean(),
                best_reward,
                rounds: acc.count,
                items_tried,
            })
        })
        .collect()
}

/// Mean per-user regret over the log, or `None` if the log is empty.
pub fn compute_regret(outcomes: &[Outcome], baseline: RegretBaseline) -> Option<f64> {
    let rows = per_user_breakdown(outcomes, baseline);
    if rows.is_empty() {
        return None;
    }
    let total: f64 = rows.iter().map(UserRegret::regret).sum();
    Some(total / rows.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn log(rows: &[(u64, u64, f64)]) -> Vec<Outcome> {
        rows.iter()
            .map(|&(user, item, rating)| Outcome::new(user, item, rating))
            .collect()
    }

    #[test]
    fn test_empty_log_is_undefined() {
        assert_eq!(compute_regret(&[], RegretBaseline::MinObserved), None);
        assert!(per_user_breakdown(&[], RegretBaseline::MaxObserved).is_empty());
    }

    #[test]
    fn test_single_item_user_contributes_zero() {
        let outcomes = log(&[(0, 0, 10.0), (0, 0, 10.0), (0, 0, 10.0)]);
        let regret = compute_regret(&outcomes, RegretBaseline::MinObserved).unwrap();
        assert!(regret.abs() < EPS);
    }

    #[test]
    fn test_min_baseline_can_go_negative() {
        // items 0,1,0,1,0 -> item means 10 / 20, overall mean 14
        let outcomes = log(&[
            (0, 0, 10.0),
            (0, 1, 20.0),
            (0, 0, 10.0),
            (0, 1, 20.0),
            (0, 0, 10.0),
        ]);
        let regret = compute_regret(&outcomes, RegretBaseline::MinObserved).unwrap();
        assert!((regret - (-4.0)).abs() < EPS);
    }

    #[test]
    fn test_max_baseline_is_non_negative() {
        let outcomes = log(&[
            (0, 0, 10.0),
            (0, 1, 20.0),
            (0, 0, 10.0),
            (0, 1, 20.0),
            (0, 0, 10.0),
        ]);
        let regret = compute_regret(&outcomes, RegretBaseline::MaxObserved).unwrap();
        assert!((regret - 6.0).abs() < EPS);
    }

    #[test]
    fn test_mean_across_observed_users_only() {
        // user 0: items 0 (mean 1) and 1 (mean 3), average 2, min regret -1
        // user 5: one item, regret 0
        let outcomes = log(&[(0, 0, 1.0), (5, 2, 7.0), (0, 1, 3.0)]);
        let regret = compute_regret(&outcomes, RegretBaseline::MinObserved).unwrap();
        assert!((regret - (-0.5)).abs() < EPS);
    }

    #[test]
    fn test_breakdown_rows() {
        let outcomes = log(&[(2, 0, 4.0), (1, 0, 2.0), (1, 1, 6.0), (1, 1, 8.0)]);
        let rows = per_user_breakdown(&outcomes, RegretBaseline::MaxObserved);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user, UserId(1));
        assert_eq!(rows[0].rounds, 3);
        assert_eq!(rows[0].items_tried, 2);
        assert!((rows[0].average_reward - 16.0 / 3.0).abs() < EPS);
        assert!((rows[0].best_reward - 7.0).abs() < EPS);

        assert_eq!(rows[1].user, UserId(2));
        assert_eq!(rows[1].items_tried, 1);
        assert!(rows[1].regret().abs() < EPS);
    }
}
