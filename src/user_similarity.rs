//! User-user neighborhood recommendation job.
//!
//! Buyer sets (users grouped by item) yield co-occurring user pairs scored
//! with the normalized LLR over the population of distinct items. Each
//! user keeps its `num_neighbors` best neighbors, whose items are then
//! propagated back as recommendations.

use crate::config::UserSimilarityConfig;
use crate::contingency;
use crate::cooccurrence::Cooccurrences;
use crate::error::Result;
use crate::interactions::{Axis, Interactions};
use crate::observe::{PipelineEvent, Reporter, Stage};
use crate::rank::{self, RankedPair, TopKRanker};
use crate::recommend::{Recommendation, RecommendationAggregator};

/// Computes per-user recommendations from user-user similarity.
///
/// # Examples
///
/// ```
/// use llr_similarity::config::UserSimilarityConfig;
/// use llr_similarity::interactions::Interactions;
/// use llr_similarity::observe::NullReporter;
/// use llr_similarity::user_similarity::UserSimilarityJob;
///
/// let data = Interactions::from_pairs(vec![
///     (1, 10), (1, 11),
///     (2, 10), (2, 11), (2, 12),
///     (3, 12), (3, 13),
///     (4, 13), (4, 14),
/// ]);
/// let job = UserSimilarityJob::new(UserSimilarityConfig::default()).expect("valid config");
/// let recs = job.run(&data, &NullReporter).expect("consistent counts");
///
/// assert!(recs.iter().any(|r| r.user == 1 && r.item == 12));
/// assert!(recs.iter().all(|r| !data.contains(r.user, r.item)));
/// ```
#[derive(Debug, Clone)]
pub struct UserSimilarityJob {
    config: UserSimilarityConfig,
}

impl UserSimilarityJob {
    /// Create a job after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LlrError::InvalidConfig`] for out-of-range values.
    pub fn new(config: UserSimilarityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &UserSimilarityConfig {
        &self.config
    }

    /// Items that can link users: those with at least `min_users_per_item` buyers.
    fn linked(&self, interactions: &Interactions, reporter: &dyn Reporter) -> Interactions {
        let linked = interactions.retain_items_with_min_users(self.config.min_users_per_item);
        report(reporter, Stage::Prune, linked.len());
        linked
    }

    /// Every user's top `num_neighbors` neighbors, by anchor then rank.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LlrError::ResourceExhausted`] if a buyer set exceeds
    /// `max_prefs` under the fail policy, or
    /// [`crate::LlrError::InvariantViolation`] on inconsistent counts.
    pub fn neighbors(
        &self,
        interactions: &Interactions,
        reporter: &dyn Reporter,
    ) -> Result<Vec<RankedPair>> {
        let linked = self.linked(interactions, reporter);
        self.rank_neighbors(&linked, reporter)
    }

    fn rank_neighbors(
        &self,
        linked: &Interactions,
        reporter: &dyn Reporter,
    ) -> Result<Vec<RankedPair>> {
        let capped;
        let buyers = match self.config.max_prefs {
            Some(cap) => {
                capped = linked.cap_groups(Axis::Item, cap, self.config.cap_policy, reporter)?;
                &capped
            }
            None => linked,
        };

        let cooccurrences = Cooccurrences::count(buyers, Axis::Item);
        report(reporter, Stage::Cooccurrence, cooccurrences.pairs().len());

        let scored = contingency::score_pairs(&cooccurrences)?;
        report(reporter, Stage::Score, scored.len());

        let ranked = TopKRanker::new(self.config.num_neighbors).rank(rank::symmetrize(&scored));
        report(reporter, Stage::Rank, ranked.len());
        Ok(ranked)
    }

    /// Run the job over `interactions`.
    ///
    /// Candidate items come from the neighbors' linked items; anything the
    /// user already interacted with in `interactions` is excluded. Rows are
    /// ordered by user, then by descending aggregated score.
    ///
    /// # Errors
    ///
    /// See [`UserSimilarityJob::neighbors`].
    pub fn run(
        &self,
        interactions: &Interactions,
        reporter: &dyn Reporter,
    ) -> Result<Vec<Recommendation>> {
        let linked = self.linked(interactions, reporter);
        let neighbors = self.rank_neighbors(&linked, reporter)?;

        let recommendations = RecommendationAggregator::new(self.config.num_recommendations)
            .aggregate(&neighbors, &linked, interactions);
        report(reporter, Stage::Aggregate, recommendations.len());
        Ok(recommendations)
    }
}

fn report(reporter: &dyn Reporter, stage: Stage, rows: usize) {
    reporter.report(&PipelineEvent::StageFinished { stage, rows });
}
