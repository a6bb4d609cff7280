//! Threshold filtering and per-anchor top-K ranking.
//!
//! Ranking keeps a bounded heap of at most `k` candidates per anchor, so
//! memory per group is `O(k)` no matter how many candidates stream past.
//! Ties on score are broken by the smaller candidate id, which makes the
//! output independent of input order and partitioning.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::interactions::EntityId;

/// A candidate scored against an anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    /// Entity the group is keyed by
    pub anchor: EntityId,
    /// Entity being ranked
    pub candidate: EntityId,
    /// Association score
    pub score: f64,
}

impl ScoredPair {
    /// Create a scored pair.
    pub fn new(anchor: EntityId, candidate: EntityId, score: f64) -> Self {
        Self {
            anchor,
            candidate,
            score,
        }
    }

    /// The same score seen from the candidate's side.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.candidate, self.anchor, self.score)
    }
}

/// A scored pair with its 1-based position inside the anchor's group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPair {
    /// Entity the group is keyed by
    pub anchor: EntityId,
    /// Entity being ranked
    pub candidate: EntityId,
    /// Association score
    pub score: f64,
    /// Position in the group, starting at 1
    pub rank: usize,
}

/// Drop pairs scoring below `threshold`.
pub fn apply_threshold(pairs: Vec<ScoredPair>, threshold: f64) -> Vec<ScoredPair> {
    pairs.into_iter().filter(|p| p.score >= threshold).collect()
}

/// Emit every unordered pair once from each side.
pub fn symmetrize(pairs: &[ScoredPair]) -> Vec<ScoredPair> {
    pairs.iter().flat_map(|p| [*p, p.reversed()]).collect()
}

/// Heap entry ordered so that the *worst* candidate is the maximum.
#[derive(Debug, Clone, Copy)]
struct Entry {
    candidate: EntityId,
    score: f64,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.candidate.cmp(&other.candidate))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Bounded best-`k` accumulator for one group.
#[derive(Debug, Clone)]
struct BoundedHeap {
    k: usize,
    heap: BinaryHeap<Entry>,
}

impl BoundedHeap {
    fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k.min(1024) + 1),
        }
    }

    fn push(&mut self, entry: Entry) {
        if self.heap.len() < self.k {
            self.heap.push(entry);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if entry < *worst {
                *worst = entry;
            }
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for entry in other.heap {
            self.push(entry);
        }
        self
    }

    /// Best first.
    fn into_sorted(self) -> Vec<Entry> {
        self.heap.into_sorted_vec()
    }
}

/// Keeps the `k` highest-scoring candidates per anchor.
///
/// # Examples
///
/// ```
/// use llr_similarity::rank::{ScoredPair, TopKRanker};
///
/// let ranked = TopKRanker::new(2).rank(vec![
///     ScoredPair::new(1, 10, 0.2),
///     ScoredPair::new(1, 11, 0.9),
///     ScoredPair::new(1, 12, 0.5),
///     ScoredPair::new(2, 10, 0.1),
/// ]);
///
/// let kept: Vec<_> = ranked.iter().map(|r| (r.anchor, r.candidate, r.rank)).collect();
/// assert_eq!(kept, vec![(1, 11, 1), (1, 12, 2), (2, 10, 1)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopKRanker {
    k: usize,
}

impl TopKRanker {
    /// Create a ranker keeping `k` candidates per anchor.
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Candidates kept per anchor.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Rank `pairs` within their anchor groups.
    ///
    /// Output is ordered by anchor ascending, then rank ascending. Ranks in
    /// every group run `1..=min(k, group size)` without gaps.
    pub fn rank(&self, pairs: Vec<ScoredPair>) -> Vec<RankedPair> {
        let k = self.k;
        let insert = |mut groups: BTreeMap<EntityId, BoundedHeap>, pair: ScoredPair| {
            groups
                .entry(pair.anchor)
                .or_insert_with(|| BoundedHeap::new(k))
                .push(Entry {
                    candidate: pair.candidate,
                    score: pair.score,
                });
            groups
        };

        #[cfg(feature = "parallel")]
        let groups = pairs
            .into_par_iter()
            .fold(BTreeMap::new, insert)
            .reduce(BTreeMap::new, merge_groups);

        #[cfg(not(feature = "parallel"))]
        let groups = pairs.into_iter().fold(BTreeMap::new(), insert);

        groups
            .into_iter()
            .flat_map(|(anchor, heap)| {
                heap.into_sorted()
                    .into_iter()
                    .enumerate()
                    .map(move |(i, entry)| RankedPair {
                        anchor,
                        candidate: entry.candidate,
                        score: entry.score,
                        rank: i + 1,
                    })
            })
            .collect()
    }

    /// Best `k` of a single group's `(candidate, score)` entries, best first.
    pub fn select<I>(&self, candidates: I) -> Vec<(EntityId, f64)>
    where
        I: IntoIterator<Item = (EntityId, f64)>,
    {
        let mut heap = BoundedHeap::new(self.k);
        for (candidate, score) in candidates {
            heap.push(Entry { candidate, score });
        }
        heap.into_sorted()
            .into_iter()
            .map(|entry| (entry.candidate, entry.score))
            .collect()
    }
}

#[cfg(feature = "parallel")]
fn merge_groups(
    mut left: BTreeMap<EntityId, BoundedHeap>,
    right: BTreeMap<EntityId, BoundedHeap>,
) -> BTreeMap<EntityId, BoundedHeap> {
    for (anchor, heap) in right {
        let merged = match left.remove(&anchor) {
            Some(existing) => existing.merge(heap),
            None => heap,
        };
        left.insert(anchor, merged);
    }
    left
}
