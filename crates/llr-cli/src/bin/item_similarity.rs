//! item-similarity - LLR item-item similarity table

use std::process::ExitCode;

use clap::Parser;
use llr_cli::args::ItemSimilarityArgs;
use llr_cli::{commands, logging};

fn main() -> ExitCode {
    let args = ItemSimilarityArgs::parse();
    logging::init_tracing(args.common.verbosity());

    match commands::item::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
