//! Error handling for the submission pipeline.

use thiserror::Error;

/// Result type for submission pipeline operations.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Errors that can occur while batching and submitting commands.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Walltime string could not be normalized to `dd:hh:mm:ss`.
    #[error("Invalid walltime {0}")]
    InvalidWalltime(String),

    /// Batch size must be at least 1.
    #[error("Invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),

    /// Standard input is a terminal, not a piped command list.
    #[error("Standard input is required. For usage see: pipe2q --help")]
    StdinRequired,

    /// The qsub command itself could not be run.
    #[error("qsub command failed: {message}")]
    QsubCommand { message: String },

    /// Timed out waiting for the qsub command.
    #[error("qsub timeout: {0}")]
    Timeout(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
