//! Scheduling core for job-runner.
//!
//! This crate turns a job file into a live schedule and drives it:
//!
//! - `parse`: job-file grammar -> validated recurrence rules
//! - `resolve`: rule + reference instant -> next run instant (normal and
//!   forced-forward paths)
//! - `job`: expansion of rules into scheduled job instances
//! - `queue`: the run queue, ordered by next run instant, with the
//!   load-time duplicate-instant check
//! - `ledger`: append-only firing history
//! - `executor`: the process-execution seam
//! - `dispatcher`: the poll loop, firing, re-insertion, and the status
//!   snapshot channel
//! - `snapshot`: status report rendering
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use chrono::Local;
//! use runner_engine::{load_queue, Dispatcher, ProcessExecutor};
//!
//! # async fn demo() -> Result<(), runner_engine::ScheduleError> {
//! let queue = load_queue("every Monday at 0900 run /bin/echo hi", Local::now().naive_local())?;
//! let dispatcher = Dispatcher::new(queue, ProcessExecutor, Duration::from_secs(1));
//! # Ok(())
//! # }
//! ```

pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod job;
pub mod ledger;
pub mod parse;
pub mod queue;
pub mod resolve;
pub mod snapshot;

pub use dispatcher::{Dispatcher, StatusRequest, Tick};
pub use error::ScheduleError;
pub use executor::{ExecError, JobExecutor, ProcessExecutor};
pub use job::{expand, JobId, ScheduledJob};
pub use ledger::HistoryLedger;
pub use parse::{parse_job_file, parse_line};
pub use queue::RunQueue;
pub use snapshot::render_snapshot;

use chrono::NaiveDateTime;

/// Parse a job file and build the validated initial run queue against
/// `now`, applying every startup check: grammar, duplicate lines, and
/// duplicate run instants.
pub fn load_queue(contents: &str, now: NaiveDateTime) -> Result<RunQueue, ScheduleError> {
    let rules = parse_job_file(contents)?;
    RunQueue::from_jobs(expand(&rules, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_load_queue_end_to_end() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let queue = load_queue(
            "every Monday at 0900 run /bin/echo hi\nat 1200 run /bin/date\n",
            now,
        )
        .unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.peek_earliest().unwrap().next_run_at,
            NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_load_queue_rejects_colliding_lines() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let err = load_queue(
            "every Monday at 0900 run /bin/a\nat 0900 run /bin/b\n",
            now,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate run time"));
    }
}
