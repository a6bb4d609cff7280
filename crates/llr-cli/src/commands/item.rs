//! item-similarity command implementation

use llr_similarity::io::ResultWriter;
use llr_similarity::item_similarity::ItemSimilarityJob;
use llr_similarity::observe::TracingReporter;
use tracing::info;

use crate::args::ItemSimilarityArgs;
use crate::error::Result;

/// Run the item-item similarity job
pub fn run(args: &ItemSimilarityArgs) -> Result<()> {
    let job = ItemSimilarityJob::new(args.config())?;
    let writer = ResultWriter::create(&args.common.output)?;

    let config = job.config();
    info!(
        input = %args.common.input.display(),
        output = %args.common.output.display(),
        max_similarities_per_item = config.max_similarities_per_item,
        max_prefs = config.max_prefs,
        threshold = config.threshold,
        cap_policy = ?config.cap_policy,
        on_malformed = ?config.malformed_rows,
        "item similarity parameters"
    );

    let reporter = TracingReporter;
    let table = super::on_pool(args.common.threads, || {
        let interactions = super::load(&args.common, &reporter)?;
        Ok(job.run(&interactions, &reporter)?)
    })?;

    let part = writer.write(&table, &reporter)?;
    info!(rows = table.len(), path = %part.display(), "item similarity table written");
    Ok(())
}
