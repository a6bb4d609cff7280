//! Pair co-occurrence counting.
//!
//! Interactions are grouped along a context axis (baskets per user for
//! item-item scoring, buyer sets per item for user-user scoring). Every
//! unordered 2-combination inside a group is one co-occurrence of that
//! pair. This is the dominant cost of a job: `O(Σ C(group_size, 2))`,
//! which is why oversized groups are capped upstream.

use std::collections::HashMap;

use crate::dataflow;
use crate::interactions::{Axis, EntityId, Group, Interactions};

/// An unordered pair with `first < second` and its co-occurrence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooccurrencePair {
    /// Smaller entity id
    pub first: EntityId,
    /// Larger entity id
    pub second: EntityId,
    /// Number of groups containing both
    pub count: u64,
}

/// Co-occurrence counts plus the marginals and population needed to turn
/// them into contingency tables.
///
/// # Examples
///
/// ```
/// use llr_similarity::cooccurrence::Cooccurrences;
/// use llr_similarity::interactions::{Axis, Interactions};
///
/// let data = Interactions::from_pairs(vec![(1, 10), (1, 11), (2, 10), (2, 11), (3, 10)]);
/// let cooc = Cooccurrences::count(&data, Axis::User);
///
/// assert_eq!(cooc.pairs()[0].count, 2);
/// assert_eq!(cooc.marginal(10), Some(3));
/// assert_eq!(cooc.population(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cooccurrences {
    pairs: Vec<CooccurrencePair>,
    marginals: HashMap<EntityId, u64>,
    population: u64,
}

impl Cooccurrences {
    /// Count co-occurrences of members within groups keyed by `context`.
    ///
    /// Marginals count, for every member entity, the groups it belongs to;
    /// the population is the number of distinct context keys.
    pub fn count(interactions: &Interactions, context: Axis) -> Self {
        let groups = interactions.group_by(context);

        let counts = dataflow::count_by_key(&groups, |(_, members): &Group, emit| {
            if members.len() < 2 {
                return;
            }
            for (i, &first) in members.iter().enumerate() {
                for &second in &members[i + 1..] {
                    emit((first, second));
                }
            }
        });

        let marginals = dataflow::count_by_key(&groups, |(_, members): &Group, emit| {
            members.iter().for_each(|&m| emit(m));
        });

        let mut pairs: Vec<CooccurrencePair> = counts
            .into_iter()
            .map(|((first, second), count)| CooccurrencePair {
                first,
                second,
                count,
            })
            .collect();
        pairs.sort_unstable_by_key(|p| (p.first, p.second));

        Self {
            pairs,
            marginals,
            population: groups.len() as u64,
        }
    }

    /// Candidate pairs, ordered by `(first, second)`.
    pub fn pairs(&self) -> &[CooccurrencePair] {
        &self.pairs
    }

    /// Number of groups containing `entity`.
    pub fn marginal(&self, entity: EntityId) -> Option<u64> {
        self.marginals.get(&entity).copied()
    }

    /// All marginals.
    pub fn marginals(&self) -> &HashMap<EntityId, u64> {
        &self.marginals
    }

    /// Number of distinct context keys.
    pub fn population(&self) -> u64 {
        self.population
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Interactions {
        Interactions::from_pairs(vec![(1, 10), (1, 11), (2, 10), (2, 11), (3, 10)])
    }

    #[test]
    fn test_item_pairs_grouped_by_user() {
        let cooc = Cooccurrences::count(&scenario(), Axis::User);
        assert_eq!(
            cooc.pairs(),
            &[CooccurrencePair {
                first: 10,
                second: 11,
                count: 2
            }]
        );
        assert_eq!(cooc.marginal(10), Some(3));
        assert_eq!(cooc.marginal(11), Some(2));
        assert_eq!(cooc.population(), 3);
    }

    #[test]
    fn test_user_pairs_grouped_by_item() {
        let cooc = Cooccurrences::count(&scenario(), Axis::Item);
        let pairs: Vec<_> = cooc
            .pairs()
            .iter()
            .map(|p| (p.first, p.second, p.count))
            .collect();
        assert_eq!(pairs, vec![(1, 2, 2), (1, 3, 1), (2, 3, 1)]);
        assert_eq!(cooc.marginal(1), Some(2));
        assert_eq!(cooc.marginal(3), Some(1));
        assert_eq!(cooc.population(), 2);
    }

    #[test]
    fn test_singleton_groups_produce_no_pairs() {
        let data = Interactions::from_pairs(vec![(1, 10), (2, 11), (3, 12)]);
        let cooc = Cooccurrences::count(&data, Axis::User);
        assert!(cooc.pairs().is_empty());
        assert_eq!(cooc.marginals().len(), 3);
        assert_eq!(cooc.population(), 3);
    }

    #[test]
    fn test_empty_dataset() {
        let cooc = Cooccurrences::count(&Interactions::default(), Axis::User);
        assert!(cooc.pairs().is_empty());
        assert_eq!(cooc.population(), 0);
    }

    #[test]
    fn test_combination_count_matches_group_sizes() {
        // One basket of 5 items yields C(5, 2) = 10 pairs.
        let data = Interactions::from_pairs((0..5).map(|item| (1, item)));
        let cooc = Cooccurrences::count(&data, Axis::User);
        assert_eq!(cooc.pairs().len(), 10);
        assert!(cooc.pairs().iter().all(|p| p.first < p.second && p.count == 1));
    }

    #[test]
    fn test_count_never_exceeds_marginals() {
        let data = Interactions::from_pairs(vec![
            (1, 1),
            (1, 2),
            (1, 3),
            (2, 1),
            (2, 2),
            (3, 2),
            (3, 3),
            (4, 1),
        ]);
        let cooc = Cooccurrences::count(&data, Axis::User);
        for pair in cooc.pairs() {
            let m1 = cooc.marginal(pair.first).expect("marginal");
            let m2 = cooc.marginal(pair.second).expect("marginal");
            assert!(pair.count <= m1.min(m2));
        }
    }
}
