//! Error types for the LLR command-line jobs.

use std::process::ExitCode;

use llr_similarity::LlrError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Failure raised by the pipeline
    #[error(transparent)]
    Llr(#[from] LlrError),

    /// Worker pool could not be started
    #[error("cannot start worker pool: {0}")]
    ThreadPool(String),
}

impl CliError {
    /// Get exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Llr(err) => match err {
                LlrError::InvalidConfig { .. } => ExitCode::from(2),
                LlrError::Io(_) => ExitCode::from(3),
                LlrError::Csv(err) if err.is_io_error() => ExitCode::from(3),
                LlrError::InputFormat { .. } | LlrError::Csv(_) => ExitCode::from(4),
                LlrError::OutputExists(_) => ExitCode::from(5),
                LlrError::ResourceExhausted { .. } => ExitCode::from(6),
                LlrError::InvariantViolation { .. } => ExitCode::from(7),
            },
            Self::ThreadPool(_) => ExitCode::from(1),
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for CliError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes_are_non_zero() {
        let errors = [
            CliError::from(LlrError::invalid_config("threshold", -1.0, "must be >= 0")),
            CliError::from(LlrError::OutputExists(PathBuf::from("out"))),
            CliError::from(LlrError::ResourceExhausted {
                anchor: 1,
                size: 10,
                cap: 5,
            }),
            CliError::ThreadPool("boom".to_string()),
        ];
        let success = format!("{:?}", ExitCode::SUCCESS);
        for err in &errors {
            assert_ne!(format!("{:?}", err.exit_code()), success, "{err}");
        }
    }

    #[test]
    fn test_message_is_passed_through() {
        let err = CliError::from(LlrError::OutputExists(PathBuf::from("out")));
        assert!(err.to_string().contains("out"));
    }
}
