//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use llr_similarity::prelude::*;
//! ```

pub use crate::config::{
    GroupCapPolicy, ItemSimilarityConfig, MalformedRowPolicy, UserSimilarityConfig,
};
pub use crate::error::{LlrError, Result};
pub use crate::interactions::{EntityId, Interaction, Interactions};
pub use crate::io::{PairExtractor, ResultWriter};
pub use crate::item_similarity::{ItemSimilarity, ItemSimilarityJob};
pub use crate::observe::{NullReporter, PipelineEvent, Reporter, TracingReporter};
pub use crate::recommend::Recommendation;
pub use crate::user_similarity::UserSimilarityJob;
