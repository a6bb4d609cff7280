//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Console log level chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Stage summaries and warnings
    #[default]
    Normal,
    /// Per-group diagnostics as well
    Verbose,
}

impl Verbosity {
    /// Filter directive used when `RUST_LOG` is unset.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so the result tables never mix with diagnostics.
/// `RUST_LOG` takes precedence over `verbosity`.
pub fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
