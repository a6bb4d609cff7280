//! Shared plumbing for the `item-similarity` and `user-similarity` binaries.
//!
//! Usage:
//!   item-similarity ratings.csv out/items --maxSimilaritiesPerItem=50 --threshold=0.01
//!   user-similarity ratings.csv out/users --numOfNeighbors=24 --numOfRecommednations=100

pub mod args;
pub mod commands;
pub mod error;
pub mod logging;

pub use error::{CliError, Result};
