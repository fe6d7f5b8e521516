//! Error types for the status client.
//!
//! All of these are client-side: they are reported to the person asking
//! for a status and never affect the running daemon.

use thiserror::Error;

/// Errors that can occur while requesting a status snapshot.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The PID file is missing or unreadable; the daemon is probably not
    /// running.
    #[error("file {0} cannot be opened")]
    PidFileUnreadable(String),

    /// The PID file exists but does not contain a process id.
    #[error("bad pid in {0}")]
    BadPid(String),

    /// The recorded process no longer exists.
    #[error("process not found")]
    ProcessNotFound,

    /// The status file never appeared within the timeout.
    #[error("file {0} not found\nstatus timeout")]
    StatusFileMissing(String),

    /// The status file stayed empty for the whole timeout.
    #[error("file {0} is empty\nstatus timeout")]
    StatusTimeout(String),

    /// Reading or clearing the status file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ClientError::ProcessNotFound.to_string(), "process not found");

        let err = ClientError::StatusTimeout(".runner.status".to_string());
        assert!(err.to_string().contains(".runner.status is empty"));
        assert!(err.to_string().contains("status timeout"));

        let err = ClientError::StatusFileMissing(".runner.status".to_string());
        assert!(err.to_string().contains("not found"));
    }
}
