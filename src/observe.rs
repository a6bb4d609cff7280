//! Observability sink passed into every job.
//!
//! The library never installs a logger. Jobs emit typed [`PipelineEvent`]s
//! to a caller-supplied [`Reporter`]; [`TracingReporter`] turns them into
//! structured `tracing` records.

use std::fmt;

use crate::interactions::{Axis, EntityId};

/// A named step of a similarity job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Raw records parsed into interactions
    Extract,
    /// Items with too few buyers dropped
    Prune,
    /// Oversized groups capped
    Cap,
    /// Pair co-occurrences counted
    Cooccurrence,
    /// Contingency tables scored
    Score,
    /// Pairs below the threshold dropped
    Threshold,
    /// Per-anchor top-K selection
    Rank,
    /// Neighbor scores propagated onto items
    Aggregate,
    /// Results written
    Write,
}

impl Stage {
    /// Stable lowercase name, used as a structured field value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Prune => "prune",
            Self::Cap => "cap",
            Self::Cooccurrence => "cooccurrence",
            Self::Score => "score",
            Self::Threshold => "threshold",
            Self::Rank => "rank",
            Self::Aggregate => "aggregate",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something worth telling the operator about.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A malformed record was dropped.
    RowSkipped {
        /// 1-based line number
        line: u64,
        /// Parse failure
        cause: String,
    },
    /// A group was down-sampled to the cap.
    GroupTruncated {
        /// Grouping axis
        axis: Axis,
        /// Group key
        anchor: EntityId,
        /// Members before capping
        size: usize,
        /// Members kept
        cap: usize,
    },
    /// A stage produced its output collection.
    StageFinished {
        /// Which stage
        stage: Stage,
        /// Rows in the stage output
        rows: usize,
    },
}

/// Receiver of pipeline events.
pub trait Reporter: Send + Sync {
    /// Handle one event.
    fn report(&self, event: &PipelineEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RowSkipped { line, cause } => {
                tracing::warn!(line, cause = %cause, "skipping malformed record");
            }
            PipelineEvent::GroupTruncated {
                axis,
                anchor,
                size,
                cap,
            } => {
                tracing::debug!(axis = %axis, anchor, size, cap, "group down-sampled");
            }
            PipelineEvent::StageFinished { stage, rows } => {
                tracing::info!(stage = %stage, rows, "stage finished");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &PipelineEvent) {}
}
