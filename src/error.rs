//! Error types for similarity jobs.
//!
//! Per-record format problems are recovered locally under the default
//! policy; everything else returned here aborts the job.

use std::path::PathBuf;
use thiserror::Error;

use crate::interactions::EntityId;

/// Result type alias for similarity operations.
pub type Result<T> = std::result::Result<T, LlrError>;

/// Main error type for similarity jobs.
///
/// # Examples
///
/// ```
/// use llr_similarity::error::LlrError;
///
/// let err = LlrError::InvalidConfig {
///     param: "threshold".to_string(),
///     value: "NaN".to_string(),
///     constraint: "must be finite and >= 0".to_string(),
/// };
/// assert!(err.to_string().contains("threshold"));
/// ```
#[derive(Error, Debug)]
pub enum LlrError {
    /// A raw record could not be parsed into an interaction.
    #[error("malformed record at line {line}: {cause}")]
    InputFormat {
        /// 1-based line number in the input
        line: u64,
        /// What was wrong with the record
        cause: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {param}={value} ({constraint})")]
    InvalidConfig {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// A contingency table could not be built consistently.
    #[error("contingency invariant violated for pair ({first}, {second}): {detail}")]
    InvariantViolation {
        /// First entity of the pair
        first: EntityId,
        /// Second entity of the pair
        second: EntityId,
        /// Which cell or marginal was inconsistent
        detail: String,
    },

    /// A group is larger than the configured cap and the cap policy forbids truncation.
    #[error("group {anchor} holds {size} members, exceeding the cap of {cap}")]
    ResourceExhausted {
        /// Group key
        anchor: EntityId,
        /// Number of members in the group
        size: usize,
        /// Configured cap
        cap: usize,
    },

    /// The output location already contains results.
    #[error("output path already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader/writer error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl LlrError {
    /// Shorthand for an [`LlrError::InvalidConfig`].
    pub fn invalid_config(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }
}
