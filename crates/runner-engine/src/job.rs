//! Scheduled jobs: one live instance of "this rule, waiting to fire at
//! this instant".
//!
//! A rule expands into one job per (weekday x time-of-day) combination at
//! load time. Recurring jobs are superseded by a fresh successor after each
//! firing rather than mutated in place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike, Weekday};
use runner_types::{history::SNAPSHOT_TIME_FORMAT, RecurrenceRule, RuleKind, TimeOfDay};

use crate::resolve;

/// Identity for a queued job, unique within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

fn next_job_id() -> JobId {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    JobId(NEXT.fetch_add(1, Ordering::Relaxed))
}

/// One live scheduled job.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    /// Process-unique identity; a recurring job's successor gets a new one.
    pub id: JobId,
    /// The originating rule, shared read-only across expanded instances.
    pub rule: Arc<RecurrenceRule>,
    /// The weekday this instance targets. `None` for `Once` rules.
    pub day: Option<Weekday>,
    /// The time of day this instance targets.
    pub time: TimeOfDay,
    /// The concrete next run instant, at minute resolution.
    pub next_run_at: NaiveDateTime,
}

impl ScheduledJob {
    fn new(
        rule: Arc<RecurrenceRule>,
        day: Option<Weekday>,
        time: TimeOfDay,
        next_run_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: next_job_id(),
            rule,
            day,
            time,
            next_run_at,
        }
    }

    /// Whether this job fires again after running.
    pub fn is_recurring(&self) -> bool {
        self.rule.kind == RuleKind::Recurring
    }

    /// The single due-ness predicate: minute-equality between the current
    /// wall clock and the job's run instant. `now` must already be
    /// truncated to the minute.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now == self.next_run_at
    }

    /// The program path and arguments as one display string.
    pub fn command_line(&self) -> String {
        self.rule.command_line()
    }

    /// The `will run at ...` snapshot line for this job.
    pub fn snapshot_line(&self) -> String {
        format!(
            "will run at {} {}",
            self.next_run_at.format(SNAPSHOT_TIME_FORMAT),
            self.command_line()
        )
    }

    /// The successor instance after this job fired, or `None` when the job
    /// does not recur.
    ///
    /// `now` is the wall clock at the moment the firing finished. If the
    /// job's own trigger minute still equals `now`'s minute, the ordinary
    /// resolver would land on the same instant again, so the forced-forward
    /// path is taken instead and the successor lands in a following week.
    pub fn successor(&self, now: NaiveDateTime) -> Option<Self> {
        if !self.is_recurring() {
            return None;
        }
        let day = self.day?;
        let next_run_at = if (self.time.hour, self.time.minute) == (now.hour(), now.minute()) {
            resolve::next_occurrence_forced(day, self.time, now)
        } else {
            resolve::next_occurrence(day, self.time, now)
        };
        Some(Self::new(
            Arc::clone(&self.rule),
            self.day,
            self.time,
            next_run_at,
        ))
    }
}

/// Expand validated rules into the initial job population, resolving each
/// (day x time) combination against `now`.
pub fn expand(rules: &[RecurrenceRule], now: NaiveDateTime) -> Vec<ScheduledJob> {
    let mut jobs = Vec::new();
    for rule in rules {
        let rule = Arc::new(rule.clone());
        match rule.kind {
            RuleKind::Once => {
                for &time in &rule.times {
                    let at = resolve::next_once(time, now);
                    jobs.push(ScheduledJob::new(Arc::clone(&rule), None, time, at));
                }
            }
            RuleKind::OneShotOnDay | RuleKind::Recurring => {
                for &day in &rule.days {
                    for &time in &rule.times {
                        let at = resolve::next_occurrence(day, time, now);
                        jobs.push(ScheduledJob::new(Arc::clone(&rule), Some(day), time, at));
                    }
                }
            }
        }
    }
    jobs
}
