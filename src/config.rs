//! Typed job configuration.
//!
//! Command-line parsing lives in the CLI crate; the core only consumes these
//! structs. Both configs validate eagerly so a bad value fails before any
//! input is read.

use crate::error::{LlrError, Result};

/// What to do with a raw record that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    /// Drop the record, count it, and report it.
    #[default]
    Skip,
    /// Abort the job on the first malformed record.
    Fail,
}

/// What to do with a group larger than `max_prefs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupCapPolicy {
    /// Deterministically down-sample the group to the cap.
    #[default]
    Truncate,
    /// Abort the job with [`LlrError::ResourceExhausted`].
    Fail,
}

/// Configuration for the item-item similarity job.
///
/// # Examples
///
/// ```
/// use llr_similarity::config::ItemSimilarityConfig;
///
/// let config = ItemSimilarityConfig::default()
///     .with_max_similarities_per_item(20)
///     .with_threshold(0.5);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_prefs, 500);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSimilarityConfig {
    /// Similar items kept per item.
    pub max_similarities_per_item: usize,
    /// Largest user basket enumerated for co-occurrences.
    pub max_prefs: usize,
    /// Minimum normalized LLR score for a pair to be kept.
    pub threshold: f64,
    /// Behavior for baskets above `max_prefs`.
    pub cap_policy: GroupCapPolicy,
    /// Behavior for unparsable input rows.
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for ItemSimilarityConfig {
    fn default() -> Self {
        Self {
            max_similarities_per_item: 100,
            max_prefs: 500,
            threshold: 0.001,
            cap_policy: GroupCapPolicy::Truncate,
            malformed_rows: MalformedRowPolicy::Skip,
        }
    }
}

impl ItemSimilarityConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of similar items kept per item.
    #[must_use]
    pub fn with_max_similarities_per_item(mut self, k: usize) -> Self {
        self.max_similarities_per_item = k;
        self
    }

    /// Set the basket size cap.
    #[must_use]
    pub fn with_max_prefs(mut self, max_prefs: usize) -> Self {
        self.max_prefs = max_prefs;
        self
    }

    /// Set the score threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the cap policy.
    #[must_use]
    pub fn with_cap_policy(mut self, policy: GroupCapPolicy) -> Self {
        self.cap_policy = policy;
        self
    }

    /// Set the malformed-row policy.
    #[must_use]
    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    /// Check every field against its constraint.
    ///
    /// # Errors
    ///
    /// Returns [`LlrError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        require_positive("max_similarities_per_item", self.max_similarities_per_item)?;
        require_positive("max_prefs", self.max_prefs)?;
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(LlrError::invalid_config(
                "threshold",
                self.threshold,
                "must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Configuration for the user-user recommendation job.
///
/// # Examples
///
/// ```
/// use llr_similarity::config::UserSimilarityConfig;
///
/// let config = UserSimilarityConfig::default().with_num_neighbors(10);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.num_recommendations, 100);
/// assert_eq!(config.max_prefs, None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UserSimilarityConfig {
    /// Neighbors kept per user.
    pub num_neighbors: usize,
    /// Recommendations kept per user.
    pub num_recommendations: usize,
    /// Largest buyer set enumerated for co-occurrences; `None` is unbounded.
    pub max_prefs: Option<usize>,
    /// Items with fewer distinct buyers are dropped before scoring.
    pub min_users_per_item: usize,
    /// Behavior for buyer sets above `max_prefs`.
    pub cap_policy: GroupCapPolicy,
    /// Behavior for unparsable input rows.
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for UserSimilarityConfig {
    fn default() -> Self {
        Self {
            num_neighbors: 24,
            num_recommendations: 100,
            max_prefs: None,
            min_users_per_item: 2,
            cap_policy: GroupCapPolicy::Truncate,
            malformed_rows: MalformedRowPolicy::Skip,
        }
    }
}

impl UserSimilarityConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the neighborhood size.
    #[must_use]
    pub fn with_num_neighbors(mut self, k: usize) -> Self {
        self.num_neighbors = k;
        self
    }

    /// Set the number of recommendations per user.
    #[must_use]
    pub fn with_num_recommendations(mut self, k: usize) -> Self {
        self.num_recommendations = k;
        self
    }

    /// Set the buyer set cap.
    #[must_use]
    pub fn with_max_prefs(mut self, max_prefs: Option<usize>) -> Self {
        self.max_prefs = max_prefs;
        self
    }

    /// Set the minimum number of buyers an item needs to take part in scoring.
    #[must_use]
    pub fn with_min_users_per_item(mut self, min: usize) -> Self {
        self.min_users_per_item = min;
        self
    }

    /// Set the cap policy.
    #[must_use]
    pub fn with_cap_policy(mut self, policy: GroupCapPolicy) -> Self {
        self.cap_policy = policy;
        self
    }

    /// Set the malformed-row policy.
    #[must_use]
    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    /// Check every field against its constraint.
    ///
    /// # Errors
    ///
    /// Returns [`LlrError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        require_positive("num_neighbors", self.num_neighbors)?;
        require_positive("num_recommendations", self.num_recommendations)?;
        if let Some(cap) = self.max_prefs {
            require_positive("max_prefs", cap)?;
        }
        if self.min_users_per_item < 2 {
            return Err(LlrError::invalid_config(
                "min_users_per_item",
                self.min_users_per_item,
                "must be >= 2",
            ));
        }
        Ok(())
    }
}

fn require_positive(param: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(LlrError::invalid_config(param, value, "must be >= 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_defaults() {
        let config = ItemSimilarityConfig::default();
        assert_eq!(config.max_similarities_per_item, 100);
        assert_eq!(config.max_prefs, 500);
        assert!((config.threshold - 0.001).abs() < 1e-12);
        assert_eq!(config.cap_policy, GroupCapPolicy::Truncate);
        assert_eq!(config.malformed_rows, MalformedRowPolicy::Skip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_item_builder() {
        let config = ItemSimilarityConfig::new()
            .with_max_similarities_per_item(5)
            .with_max_prefs(50)
            .with_threshold(0.25)
            .with_cap_policy(GroupCapPolicy::Fail)
            .with_malformed_rows(MalformedRowPolicy::Fail);
        assert_eq!(config.max_similarities_per_item, 5);
        assert_eq!(config.max_prefs, 50);
        assert!((config.threshold - 0.25).abs() < 1e-12);
        assert_eq!(config.cap_policy, GroupCapPolicy::Fail);
        assert_eq!(config.malformed_rows, MalformedRowPolicy::Fail);
    }

    #[test]
    fn test_item_rejects_zero_k() {
        let err = ItemSimilarityConfig::default()
            .with_max_similarities_per_item(0)
            .validate()
            .expect_err("zero K must be rejected");
        assert!(err.to_string().contains("max_similarities_per_item"));
    }

    #[test]
    fn test_item_rejects_bad_threshold() {
        for bad in [f64::NAN, f64::INFINITY, -0.5] {
            let result = ItemSimilarityConfig::default()
                .with_threshold(bad)
                .validate();
            assert!(
                matches!(result, Err(LlrError::InvalidConfig { .. })),
                "threshold {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_item_rejects_zero_max_prefs() {
        assert!(ItemSimilarityConfig::default()
            .with_max_prefs(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_user_defaults() {
        let config = UserSimilarityConfig::default();
        assert_eq!(config.num_neighbors, 24);
        assert_eq!(config.num_recommendations, 100);
        assert_eq!(config.max_prefs, None);
        assert_eq!(config.min_users_per_item, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_user_rejects_invalid_values() {
        assert!(UserSimilarityConfig::default()
            .with_num_neighbors(0)
            .validate()
            .is_err());
        assert!(UserSimilarityConfig::default()
            .with_num_recommendations(0)
            .validate()
            .is_err());
        assert!(UserSimilarityConfig::default()
            .with_max_prefs(Some(0))
            .validate()
            .is_err());
        assert!(UserSimilarityConfig::default()
            .with_min_users_per_item(1)
            .validate()
            .is_err());
    }
}
