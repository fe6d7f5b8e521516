//! End-to-end test infrastructure for job-runner.
//!
//! Provides a shared harness for driving the whole parse -> resolve ->
//! queue -> dispatch pipeline against a simulated clock and a recording
//! executor, without touching the real system clock or spawning real
//! processes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use runner_engine::{expand, parse_job_file, Dispatcher, ExecError, JobExecutor, RunQueue, Tick};

/// Executor that records every invocation and fails for programs whose
/// path contains "fail".
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Command lines executed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobExecutor for RecordingExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> Result<(), ExecError> {
        let command_line = if args.is_empty() {
            program.to_string()
        } else {
            format!("{} {}", program, args.join(" "))
        };
        self.calls.lock().unwrap().push(command_line);

        if program.contains("fail") {
            Err(ExecError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted failure"),
            })
        } else {
            Ok(())
        }
    }
}

/// A dispatcher over a job file, driven by an explicit simulated clock.
pub struct TestHarness {
    pub dispatcher: Dispatcher<Arc<RecordingExecutor>>,
    pub executor: Arc<RecordingExecutor>,
    now: NaiveDateTime,
}

impl TestHarness {
    /// Load a job file at the given reference instant. Panics on a
    /// configuration error; use `runner_engine::load_queue` directly to
    /// test rejection paths.
    pub fn load(conf: &str, now: NaiveDateTime) -> Self {
        let rules = parse_job_file(conf).expect("valid job file");
        let queue = RunQueue::from_jobs(expand(&rules, now)).expect("no duplicate run times");
        let executor = RecordingExecutor::new();
        Self {
            dispatcher: Dispatcher::new(queue, Arc::clone(&executor), Duration::from_secs(1)),
            executor,
            now,
        }
    }

    /// The current simulated wall-clock instant.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Advance the simulated clock to the given instant and evaluate one
    /// poll tick there.
    pub async fn tick_at(&mut self, now: NaiveDateTime) -> Tick {
        self.now = now;
        let frozen = now;
        self.dispatcher.tick(&move || frozen).await
    }

    /// Evaluate one poll tick per minute from the current instant through
    /// `until`, inclusive, returning every non-idle transition.
    pub async fn run_until(&mut self, until: NaiveDateTime) -> Vec<(NaiveDateTime, Tick)> {
        let mut transitions = Vec::new();
        while self.now <= until {
            let tick = self.tick_at(self.now).await;
            if tick != Tick::Idle {
                transitions.push((self.now, tick));
            }
            if tick == Tick::Terminated {
                break;
            }
            // Re-test the same minute only after a firing, in case two
            // jobs are due in it.
            if !matches!(tick, Tick::Fired(_)) {
                self.now += chrono::Duration::minutes(1);
            }
        }
        transitions
    }
}

/// Shorthand for a minute-resolution instant in the test week
/// (Monday 2024-03-04 .. Sunday 2024-03-10).
pub fn day_at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}
