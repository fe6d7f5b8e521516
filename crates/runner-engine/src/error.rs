//! Error types for the scheduling engine.

use thiserror::Error;

/// Errors raised while building or driving the schedule.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Fatal configuration problem detected before the dispatch loop starts:
    /// malformed or duplicate job-file lines, or two expanded jobs sharing
    /// the same run instant. The message names the offending line or instant.
    #[error("error in configuration: {0}")]
    Config(String),

    /// The run queue has no jobs left. This is the scheduler's terminal
    /// condition, not a failure.
    #[error("nothing left to run")]
    QueueEmpty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScheduleError::Config("every Funday at 0900 run /bin/echo".to_string());
        assert!(err.to_string().starts_with("error in configuration: "));

        assert_eq!(ScheduleError::QueueEmpty.to_string(), "nothing left to run");
    }
}
