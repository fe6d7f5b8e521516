//! Error types shared across the job-runner system.

use thiserror::Error;

/// Unified error type for configuration and file-handling operations.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Configuration error (bad settings, unreadable config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (PID file, status file, job file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
