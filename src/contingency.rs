//! 2×2 contingency tables for candidate pairs.
//!
//! For a pair `(a, b)` over a population of `N` context keys:
//!
//! |             | b present | b absent |
//! |-------------|-----------|----------|
//! | a present   | k11       | k21      |
//! | a absent    | k12       | k22      |
//!
//! with `k12 = marginal(b) − k11`, `k21 = marginal(a) − k11` and
//! `k22 = N − (marginal(a) + marginal(b) − k11)`.

use std::collections::HashMap;

use crate::cooccurrence::{CooccurrencePair, Cooccurrences};
use crate::dataflow;
use crate::error::{LlrError, Result};
use crate::interactions::EntityId;
use crate::llr;
use crate::rank::ScoredPair;

/// Joint and exclusive occurrence counts of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContingencyTable {
    /// Both present
    pub k11: u64,
    /// Second present, first absent
    pub k12: u64,
    /// First present, second absent
    pub k21: u64,
    /// Neither present
    pub k22: u64,
}

impl ContingencyTable {
    /// Create a table from its four cells.
    pub fn new(k11: u64, k12: u64, k21: u64, k22: u64) -> Self {
        Self { k11, k12, k21, k22 }
    }

    /// Sum of all cells; equals the population the table was built over.
    pub fn total(&self) -> u64 {
        self.k11 + self.k12 + self.k21 + self.k22
    }

    /// Raw G² statistic.
    pub fn log_likelihood(&self) -> f64 {
        llr::log_likelihood(self.k11, self.k12, self.k21, self.k22)
    }

    /// Normalized association score in `[0, 1)`.
    pub fn score(&self) -> f64 {
        llr::log_likelihood_ratio(self.k11, self.k12, self.k21, self.k22)
    }
}

/// Builds contingency tables from marginals and a population size.
///
/// Every cell is computed with checked arithmetic. A cell that would be
/// negative means the counts upstream disagree with each other, so the
/// builder reports [`LlrError::InvariantViolation`] instead of clamping.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use llr_similarity::contingency::{ContingencyTable, ContingencyTableBuilder};
///
/// let marginals = HashMap::from([(10, 3), (11, 2)]);
/// let builder = ContingencyTableBuilder::new(&marginals, 3);
/// let table = builder.build(10, 11, 2).expect("consistent counts");
/// assert_eq!(table, ContingencyTable::new(2, 0, 1, 0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ContingencyTableBuilder<'a> {
    marginals: &'a HashMap<EntityId, u64>,
    population: u64,
}

impl<'a> ContingencyTableBuilder<'a> {
    /// Create a builder over `marginals` and `population`.
    pub fn new(marginals: &'a HashMap<EntityId, u64>, population: u64) -> Self {
        Self {
            marginals,
            population,
        }
    }

    /// Create a builder over the counts gathered by [`Cooccurrences::count`].
    pub fn from_cooccurrences(cooccurrences: &'a Cooccurrences) -> Self {
        Self::new(cooccurrences.marginals(), cooccurrences.population())
    }

    /// Table for `(first, second)` given their joint count `k11`.
    ///
    /// # Errors
    ///
    /// Returns [`LlrError::InvariantViolation`] if a marginal is missing or
    /// any cell would be negative.
    pub fn build(&self, first: EntityId, second: EntityId, k11: u64) -> Result<ContingencyTable> {
        let violation = |detail: String| LlrError::InvariantViolation {
            first,
            second,
            detail,
        };
        let marginal = |entity: EntityId| {
            self.marginals
                .get(&entity)
                .copied()
                .ok_or_else(|| violation(format!("no marginal count for entity {entity}")))
        };

        let first_total = marginal(first)?;
        let second_total = marginal(second)?;

        let k12 = second_total.checked_sub(k11).ok_or_else(|| {
            violation(format!("k12 negative: marginal {second_total} < k11 {k11}"))
        })?;
        let k21 = first_total.checked_sub(k11).ok_or_else(|| {
            violation(format!("k21 negative: marginal {first_total} < k11 {k11}"))
        })?;
        let union = k11 + k12 + k21;
        let k22 = self.population.checked_sub(union).ok_or_else(|| {
            violation(format!(
                "k22 negative: population {} < union {union}",
                self.population
            ))
        })?;

        Ok(ContingencyTable { k11, k12, k21, k22 })
    }

    /// Table for a counted pair.
    ///
    /// # Errors
    ///
    /// See [`ContingencyTableBuilder::build`].
    pub fn build_pair(&self, pair: &CooccurrencePair) -> Result<ContingencyTable> {
        self.build(pair.first, pair.second, pair.count)
    }
}

/// Score every counted pair, anchored on its smaller entity id.
///
/// # Errors
///
/// Returns [`LlrError::InvariantViolation`] if any table is inconsistent; no
/// partial result is returned.
pub fn score_pairs(cooccurrences: &Cooccurrences) -> Result<Vec<ScoredPair>> {
    let builder = ContingencyTableBuilder::from_cooccurrences(cooccurrences);
    dataflow::try_map(cooccurrences.pairs(), |pair| {
        let table = builder.build_pair(pair)?;
        Ok(ScoredPair::new(pair.first, pair.second, table.score()))
    })
}
