//! LLR similarity: log-likelihood-ratio co-occurrence analysis in pure Rust.
//!
//! Given a log of `(user, item)` interactions, this crate computes two
//! related tables:
//!
//! - an **item-item similarity table**: for every item, the items most
//!   strongly associated with it (see [`item_similarity`]);
//! - **user-user recommendations**: for every user, items bought by the
//!   most similar users but not by the user itself (see [`user_similarity`]).
//!
//! Both are driven by Dunning's log-likelihood ratio over a 2x2
//! contingency table, normalized into `[0, 1)`.
//!
//! # Quick Start
//!
//! ```
//! use llr_similarity::prelude::*;
//!
//! // Two users buy items 1 and 2 together; two others buy item 3.
//! let data = Interactions::from_pairs(vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 3), (4, 3)]);
//!
//! let job = ItemSimilarityJob::new(ItemSimilarityConfig::default()).unwrap();
//! let table = job.run(&data, &NullReporter).unwrap();
//!
//! assert_eq!(table.len(), 2);
//! assert!(table.iter().all(|row| row.llr > 0.8));
//! ```
//!
//! # Modules
//!
//! - [`llr`]: Entropy and log-likelihood ratio primitives
//! - [`interactions`]: Deduplicated interaction sets, grouping, pruning and capping
//! - [`cooccurrence`]: Pair co-occurrence and marginal counting
//! - [`contingency`]: 2x2 contingency tables and pair scoring
//! - [`rank`]: Thresholding and deterministic per-anchor top-K
//! - [`recommend`]: Neighbor score propagation onto items
//! - [`item_similarity`]: Item-item similarity job
//! - [`user_similarity`]: User-user recommendation job
//! - [`io`]: CSV interaction extraction and result writing
//! - [`observe`]: Pipeline events and reporters
//! - [`dataflow`]: Parallel grouping and counting helpers
//! - [`config`]: Job parameters and validation

pub mod config;
pub mod contingency;
pub mod cooccurrence;
pub mod dataflow;
pub mod error;
pub mod interactions;
pub mod io;
pub mod item_similarity;
pub mod llr;
pub mod observe;
pub mod prelude;
pub mod rank;
pub mod recommend;
pub mod user_similarity;

pub use error::{LlrError, Result};
pub use interactions::{EntityId, Interactions};
