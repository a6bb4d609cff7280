//! Command-line arguments for both jobs.
//!
//! Long option names keep the camelCase spelling of the historical jobs,
//! including the `numOfRecommednations` typo (with a corrected alias).

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use llr_similarity::config::{
    GroupCapPolicy, ItemSimilarityConfig, MalformedRowPolicy, UserSimilarityConfig,
};

use crate::logging::Verbosity;

/// What to do with rows that are not two integer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnMalformed {
    /// Drop the row and log a warning
    Skip,
    /// Abort the job
    Fail,
}

impl From<OnMalformed> for MalformedRowPolicy {
    fn from(value: OnMalformed) -> Self {
        match value {
            OnMalformed::Skip => Self::Skip,
            OnMalformed::Fail => Self::Fail,
        }
    }
}

/// What to do with groups larger than `--maxPrefs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CapPolicy {
    /// Keep a deterministic sample of `maxPrefs` members
    Truncate,
    /// Abort the job
    Fail,
}

impl From<CapPolicy> for GroupCapPolicy {
    fn from(value: CapPolicy) -> Self {
        match value {
            CapPolicy::Truncate => Self::Truncate,
            CapPolicy::Fail => Self::Fail,
        }
    }
}

/// Options shared by both jobs.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Interaction log, one `user,item` pair per line
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory; must not already hold results
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Handling of malformed input rows
    #[arg(long = "onMalformed", value_enum, default_value_t = OnMalformed::Skip)]
    pub on_malformed: OnMalformed,

    /// Worker threads [default: all cores]
    #[arg(long)]
    pub threads: Option<NonZeroUsize>,

    /// Verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommonArgs {
    /// Log level selected by `-v` / `-q`.
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// item-similarity - LLR item-item similarity table
///
/// Reads `user,item` interactions and writes `item1,item2,LLR` rows: for
/// every item, its most strongly associated items.
#[derive(Debug, Clone, Parser)]
#[command(name = "item-similarity")]
#[command(author, version, about, long_about = None)]
pub struct ItemSimilarityArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Similar items kept per item [default: 100]
    #[arg(long = "maxSimilaritiesPerItem", value_name = "N")]
    pub max_similarities_per_item: Option<usize>,

    /// Largest basket considered per user [default: 500]
    #[arg(long = "maxPrefs", value_name = "N")]
    pub max_prefs: Option<usize>,

    /// Minimum normalized LLR score kept [default: 0.001]
    #[arg(long, value_name = "F", allow_negative_numbers = true)]
    pub threshold: Option<f64>,

    /// Handling of baskets larger than --maxPrefs
    #[arg(long = "capPolicy", value_enum, default_value_t = CapPolicy::Truncate)]
    pub cap_policy: CapPolicy,
}

impl ItemSimilarityArgs {
    /// Job configuration; unset options keep their defaults.
    pub fn config(&self) -> ItemSimilarityConfig {
        let mut config = ItemSimilarityConfig::default()
            .with_cap_policy(self.cap_policy.into())
            .with_malformed_rows(self.common.on_malformed.into());
        if let Some(k) = self.max_similarities_per_item {
            config = config.with_max_similarities_per_item(k);
        }
        if let Some(max_prefs) = self.max_prefs {
            config = config.with_max_prefs(max_prefs);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        config
    }
}

/// user-similarity - LLR user-user recommendations
///
/// Reads `user,item` interactions and writes `user,item,LLR_agg` rows:
/// items bought by a user's most similar users that the user lacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "user-similarity")]
#[command(author, version, about, long_about = None)]
pub struct UserSimilarityArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Neighbors kept per user [default: 24]
    #[arg(long = "numOfNeighbors", value_name = "N")]
    pub num_neighbors: Option<usize>,

    /// Recommendations kept per user [default: 100]
    #[arg(
        long = "numOfRecommednations",
        alias = "numOfRecommendations",
        value_name = "N"
    )]
    pub num_recommendations: Option<usize>,

    /// Largest buyer set considered per item [default: unbounded]
    #[arg(long = "maxPrefs", value_name = "N")]
    pub max_prefs: Option<usize>,

    /// Handling of buyer sets larger than --maxPrefs
    #[arg(long = "capPolicy", value_enum, default_value_t = CapPolicy::Truncate)]
    pub cap_policy: CapPolicy,
}

impl UserSimilarityArgs {
    /// Job configuration; unset options keep their defaults.
    pub fn config(&self) -> UserSimilarityConfig {
        let mut config = UserSimilarityConfig::default()
            .with_max_prefs(self.max_prefs)
            .with_cap_policy(self.cap_policy.into())
            .with_malformed_rows(self.common.on_malformed.into());
        if let Some(k) = self.num_neighbors {
            config = config.with_num_neighbors(k);
        }
        if let Some(k) = self.num_recommendations {
            config = config.with_num_recommendations(k);
        }
        config
    }
}
