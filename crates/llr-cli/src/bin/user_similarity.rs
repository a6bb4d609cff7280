//! user-similarity - LLR user-user recommendations

use std::process::ExitCode;

use clap::Parser;
use llr_cli::args::UserSimilarityArgs;
use llr_cli::{commands, logging};

fn main() -> ExitCode {
    let args = UserSimilarityArgs::parse();
    logging::init_tracing(args.common.verbosity());

    match commands::user::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
