//! Append-only outcome and regret logs, with columnar views for analysis.
//!
//! The logs store rows; [`RatingsTable`] and [`RegretsTable`] are built on
//! demand for callers that want one vector per column (plotting, dataframe
//! export).

use serde::Serialize;
use types::{ItemId, Outcome, Rating, RegretSample, Step, UserId};

/// Ratings log: one [`Outcome`] per round, in round order.
#[derive(Debug, Clone, Default)]
pub struct RatingsLog {
    rows: Vec<Outcome>,
}

impl RatingsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: Outcome) {
        self.rows.push(outcome);
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn as_slice(&self) -> &[Outcome] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materialize a column-per-field copy.
    pub fn to_table(&self) -> RatingsTable {
        let mut table = RatingsTable::with_capacity(self.rows.len());
        for outcome in &self.rows {
            table.users.push(outcome.user);
            table.items.push(outcome.item);
            table.ratings.push(outcome.rating);
        }
        table
    }
}

/// Regret log: snapshots in increasing step order.
#[derive(Debug, Clone, Default)]
pub struct RegretLog {
    rows: Vec<RegretSample>,
}

impl RegretLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sample: RegretSample) {
        debug_assert!(
            self.rows.last().is_none_or(|last| last.step < sample.step),
            "regret samples must be appended in increasing step order"
        );
        self.rows.push(sample);
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn as_slice(&self) -> &[RegretSample] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent snapshot.
    pub fn last(&self) -> Option<&RegretSample> {
        self.rows.last()
    }

    /// Materialize a column-per-field copy.
    pub fn to_table(&self) -> RegretsTable {
        RegretsTable {
            steps: self.rows.iter().map(|s| s.step).collect(),
            regrets: self.rows.iter().map(|s| s.regret).collect(),
        }
    }
}

/// Columnar copy of the ratings log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingsTable {
    pub users: Vec<UserId>,
    pub items: Vec<ItemId>,
    pub ratings: Vec<Rating>,
}

impl RatingsTable {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            users: Vec::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
            ratings: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Reassemble row `index`.
    pub fn row(&self, index: usize) -> Option<Outcome> {
        Some(Outcome {
            user: *self.users.get(index)?,
            item: *self.items.get(index)?,
            rating: *self.ratings.get(index)?,
        })
    }
}

/// Columnar copy of the regret log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegretsTable {
    pub steps: Vec<Step>,
    pub regrets: Vec<f64>,
}

impl RegretsTable {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
