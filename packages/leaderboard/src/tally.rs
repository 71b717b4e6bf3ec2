//! Accumulation of per-participant point totals.
//!
//! A [`Tally`] folds (amount, name-list) pairs from completed distributions
//! into per-participant running statistics. The fold is commutative and
//! associative (sum/sum/max), so partial tallies built per event can be
//! merged in any order and always produce the same numbers as a single pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::roster;

/// Running statistics for one participant.
///
/// Amounts are validated as positive integers at the write boundary before
/// they ever reach a tally; nothing here re-validates them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ParticipantTotals {
    /// Sum of all counted amounts.
    pub total: u64,
    /// Number of distributions the participant appeared in (duplicate lines
    /// within one name list count separately).
    pub distributions: u32,
    /// Largest single counted amount.
    pub highest: u32,
}

impl ParticipantTotals {
    /// Credit one distribution amount to this participant.
    pub fn record(&mut self, amount: u32) {
        self.total += u64::from(amount);
        self.distributions += 1;
        self.highest = self.highest.max(amount);
    }

    /// Fold another partial total into this one.
    pub fn merge(&mut self, other: &ParticipantTotals) {
        self.total += other.total;
        self.distributions += other.distributions;
        self.highest = self.highest.max(other.highest);
    }

    /// Average amount per counted distribution, rounded half-up.
    pub fn average(&self) -> u64 {
        round_div(self.total, u64::from(self.distributions))
    }
}

/// A mapping from participant name (verbatim, case-sensitive) to totals.
#[derive(Clone, Debug, Default)]
pub struct Tally {
    totals: HashMap<String, ParticipantTotals>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one (amount, name-list blob) pair into the tally.
    ///
    /// A blob that parses to zero names contributes nothing; that is a
    /// deliberate skip, not an error.
    pub fn add(&mut self, amount: u32, name_list: &str) {
        for name in roster::names(name_list) {
            self.totals.entry(name.to_string()).or_default().record(amount);
        }
    }

    /// Build a tally from a sequence of (amount, name-list blob) pairs.
    pub fn from_awards<'a, I>(awards: I) -> Self
    where
        I: IntoIterator<Item = (u32, &'a str)>,
    {
        let mut tally = Tally::new();
        for (amount, name_list) in awards {
            tally.add(amount, name_list);
        }
        tally
    }

    /// Merge another tally into this one.
    pub fn merge(&mut self, other: Tally) {
        for (name, totals) in other.totals {
            self.totals.entry(name).or_default().merge(&totals);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn get(&self, name: &str) -> Option<&ParticipantTotals> {
        self.totals.get(name)
    }

    pub(crate) fn into_inner(self) -> HashMap<String, ParticipantTotals> {
        self.totals
    }
}

/// Integer division rounded half-up, matching `Math.round` on the positive
/// domain. Returns 0 when `count` is 0.
pub(crate) fn round_div(total: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    (total + count / 2) / count
}
