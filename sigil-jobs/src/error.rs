//! Job error types

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, JobError>;

/// Scheduled-job errors
#[derive(Error, Debug)]
pub enum JobError {
    /// Store or query error; aborts the current cycle only
    #[error("Core error: {0}")]
    Core(#[from] sigil_core::Error),

    /// Store-contract violation (e.g. a committed transaction without a
    /// success status); fatal for the job run
    #[error("Consistency violation: {0}")]
    Consistency(String),
}
