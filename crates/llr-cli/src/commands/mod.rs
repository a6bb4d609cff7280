//! Command implementations
//!
//! Both jobs share the same shape: validate parameters, refuse an existing
//! output, extract interactions, run the pipeline, publish the table.

pub mod item;
pub mod user;

use std::num::NonZeroUsize;

use llr_similarity::io::PairExtractor;
use llr_similarity::observe::Reporter;
use llr_similarity::Interactions;
use tracing::info;

use crate::args::CommonArgs;
use crate::error::Result;

/// Run `job` on a dedicated pool when `--threads` was given.
pub(crate) fn on_pool<T, F>(threads: Option<NonZeroUsize>, job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send,
    T: Send,
{
    match threads {
        Some(n) => rayon::ThreadPoolBuilder::new()
            .num_threads(n.get())
            .build()?
            .install(job),
        None => job(),
    }
}

/// Read and deduplicate the interaction log named by `common.input`.
pub(crate) fn load(common: &CommonArgs, reporter: &dyn Reporter) -> Result<Interactions> {
    let extraction = PairExtractor::new(common.on_malformed.into())
        .extract_path(&common.input, reporter)?;
    info!(
        rows_read = extraction.rows_read,
        rows_skipped = extraction.rows_skipped,
        duplicates = extraction.duplicates,
        interactions = extraction.interactions.len(),
        "input extracted"
    );
    Ok(extraction.interactions)
}
