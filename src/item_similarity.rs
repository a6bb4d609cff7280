//! Item-item similarity job.
//!
//! Baskets (items grouped by user) yield co-occurring item pairs; each pair
//! is scored with the normalized LLR over the population of distinct users,
//! filtered by threshold, and every item keeps its best
//! `max_similarities_per_item` partners.

use serde::Serialize;

use crate::config::ItemSimilarityConfig;
use crate::contingency;
use crate::cooccurrence::Cooccurrences;
use crate::error::Result;
use crate::interactions::{Axis, EntityId, Interactions};
use crate::observe::{PipelineEvent, Reporter, Stage};
use crate::rank::{self, ScoredPair, TopKRanker};

/// One row of the item similarity table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemSimilarity {
    /// Anchor item
    pub item1: EntityId,
    /// Similar item
    pub item2: EntityId,
    /// Normalized LLR score, single precision
    #[serde(rename = "LLR")]
    pub llr: f32,
}

/// Computes an item-item similarity table.
///
/// # Examples
///
/// ```
/// use llr_similarity::config::ItemSimilarityConfig;
/// use llr_similarity::interactions::Interactions;
/// use llr_similarity::item_similarity::ItemSimilarityJob;
/// use llr_similarity::observe::NullReporter;
///
/// // Users 1 and 2 buy items 1 and 2 together; users 3 and 4 buy item 3.
/// let data = Interactions::from_pairs(vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 3), (4, 3)]);
/// let job = ItemSimilarityJob::new(ItemSimilarityConfig::default()).expect("valid config");
/// let table = job.run(&data, &NullReporter).expect("consistent counts");
///
/// let pairs: Vec<_> = table.iter().map(|row| (row.item1, row.item2)).collect();
/// assert_eq!(pairs, vec![(1, 2), (2, 1)]);
/// ```
#[derive(Debug, Clone)]
pub struct ItemSimilarityJob {
    config: ItemSimilarityConfig,
}

impl ItemSimilarityJob {
    /// Create a job after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LlrError::InvalidConfig`] for out-of-range values.
    pub fn new(config: ItemSimilarityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &ItemSimilarityConfig {
        &self.config
    }

    /// Run the job over `interactions`.
    ///
    /// Rows are ordered by `item1`, then by descending score, ties broken
    /// by the smaller `item2`. Each unordered pair is scored once and then
    /// offered to both of its items.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LlrError::ResourceExhausted`] if a basket exceeds
    /// `max_prefs` under the fail policy, or
    /// [`crate::LlrError::InvariantViolation`] on inconsistent counts.
    pub fn run(
        &self,
        interactions: &Interactions,
        reporter: &dyn Reporter,
    ) -> Result<Vec<ItemSimilarity>> {
        let baskets = interactions.cap_groups(
            Axis::User,
            self.config.max_prefs,
            self.config.cap_policy,
            reporter,
        )?;

        let cooccurrences = Cooccurrences::count(&baskets, Axis::User);
        report(reporter, Stage::Cooccurrence, cooccurrences.pairs().len());

        // Rows carry single-precision scores; threshold and rank on those.
        let scored: Vec<ScoredPair> = contingency::score_pairs(&cooccurrences)?
            .into_iter()
            .map(|p| ScoredPair::new(p.anchor, p.candidate, f64::from(p.score as f32)))
            .collect();
        report(reporter, Stage::Score, scored.len());

        let kept = rank::apply_threshold(scored, self.config.threshold);
        report(reporter, Stage::Threshold, kept.len());

        let ranked = TopKRanker::new(self.config.max_similarities_per_item)
            .rank(rank::symmetrize(&kept));
        report(reporter, Stage::Rank, ranked.len());

        Ok(ranked
            .into_iter()
            .map(|r| ItemSimilarity {
                item1: r.anchor,
                item2: r.candidate,
                llr: r.score as f32,
            })
            .collect())
    }
}

fn report(reporter: &dyn Reporter, stage: Stage, rows: usize) {
    reporter.report(&PipelineEvent::StageFinished { stage, rows });
}
