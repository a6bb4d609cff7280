//! Neighbor propagation for user-user recommendations.
//!
//! Every user inherits the items of its ranked neighbors, weighted by the
//! neighbor's similarity score. Items the user already has are excluded,
//! duplicate candidates are summed, and the best `k` survive.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataflow;
use crate::interactions::{Axis, EntityId, Interactions};
use crate::rank::{RankedPair, TopKRanker};

/// One recommended item for a user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    /// User receiving the recommendation
    pub user: EntityId,
    /// Recommended item
    pub item: EntityId,
    /// Sum of the scores of all neighbors holding the item
    #[serde(rename = "LLR_agg")]
    pub llr_agg: f64,
}

/// Turns ranked neighbor lists into ranked item recommendations.
///
/// # Examples
///
/// ```
/// use llr_similarity::interactions::Interactions;
/// use llr_similarity::rank::RankedPair;
/// use llr_similarity::recommend::RecommendationAggregator;
///
/// let histories = Interactions::from_pairs(vec![(1, 10), (2, 10), (2, 20), (3, 20), (3, 30)]);
/// let neighbors = vec![
///     RankedPair { anchor: 1, candidate: 2, score: 0.5, rank: 1 },
///     RankedPair { anchor: 1, candidate: 3, score: 0.25, rank: 2 },
/// ];
///
/// let recs = RecommendationAggregator::new(10).aggregate(&neighbors, &histories, &histories);
/// let items: Vec<_> = recs.iter().map(|r| (r.item, r.llr_agg)).collect();
/// assert_eq!(items, vec![(20, 0.75), (30, 0.25)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationAggregator {
    ranker: TopKRanker,
}

impl RecommendationAggregator {
    /// Keep `k` recommendations per user.
    pub fn new(k: usize) -> Self {
        Self {
            ranker: TopKRanker::new(k),
        }
    }

    /// Propagate neighbor scores onto items.
    ///
    /// `neighbors` must be grouped by anchor (as [`TopKRanker::rank`]
    /// returns them). Candidate items come from `histories`; exclusions come
    /// from `known`. Users with no neighbors produce no rows.
    pub fn aggregate(
        &self,
        neighbors: &[RankedPair],
        histories: &Interactions,
        known: &Interactions,
    ) -> Vec<Recommendation> {
        let items_by_user: HashMap<EntityId, Vec<EntityId>> =
            histories.group_by(Axis::User).into_iter().collect();

        let neighborhoods: Vec<&[RankedPair]> = neighbors
            .chunk_by(|a, b| a.anchor == b.anchor)
            .collect();

        dataflow::flat_map(&neighborhoods, |neighborhood| {
            self.recommend_for(neighborhood, &items_by_user, known)
        })
    }

    fn recommend_for(
        &self,
        neighborhood: &[RankedPair],
        items_by_user: &HashMap<EntityId, Vec<EntityId>>,
        known: &Interactions,
    ) -> Vec<Recommendation> {
        let Some(user) = neighborhood.first().map(|n| n.anchor) else {
            return Vec::new();
        };

        // Sum in rank order so the result does not depend on scheduling.
        let mut scores: HashMap<EntityId, f64> = HashMap::new();
        for neighbor in neighborhood {
            let Some(items) = items_by_user.get(&neighbor.candidate) else {
                continue;
            };
            for &item in items {
                if !known.contains(user, item) {
                    *scores.entry(item).or_insert(0.0) += neighbor.score;
                }
            }
        }

        self.ranker
            .select(scores)
            .into_iter()
            .map(|(item, llr_agg)| Recommendation {
                user,
                item,
                llr_agg,
            })
            .collect()
    }
}
