//! user-similarity command implementation

use llr_similarity::io::ResultWriter;
use llr_similarity::observe::TracingReporter;
use llr_similarity::user_similarity::UserSimilarityJob;
use tracing::info;

use crate::args::UserSimilarityArgs;
use crate::error::Result;

/// Run the user-user recommendation job
pub fn run(args: &UserSimilarityArgs) -> Result<()> {
    let job = UserSimilarityJob::new(args.config())?;
    let writer = ResultWriter::create(&args.common.output)?;

    let config = job.config();
    info!(
        input = %args.common.input.display(),
        output = %args.common.output.display(),
        num_neighbors = config.num_neighbors,
        num_recommendations = config.num_recommendations,
        max_prefs = ?config.max_prefs,
        min_users_per_item = config.min_users_per_item,
        cap_policy = ?config.cap_policy,
        on_malformed = ?config.malformed_rows,
        "user similarity parameters"
    );

    let reporter = TracingReporter;
    let recommendations = super::on_pool(args.common.threads, || {
        let interactions = super::load(&args.common, &reporter)?;
        Ok(job.run(&interactions, &reporter)?)
    })?;

    let part = writer.write(&recommendations, &reporter)?;
    info!(
        rows = recommendations.len(),
        path = %part.display(),
        "recommendations written"
    );
    Ok(())
}
