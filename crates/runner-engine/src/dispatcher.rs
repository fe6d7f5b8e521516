//! The dispatch loop: wake at fixed intervals, fire whatever is due,
//! re-enter recurring jobs, and answer status requests in between.
//!
//! The loop owns the run queue and the history ledger outright. Status
//! requests arrive over a channel and are answered from inside the same
//! select loop, so a snapshot only ever observes committed state and is
//! never torn by a firing in progress.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use runner_types::Outcome;

use crate::executor::JobExecutor;
use crate::ledger::HistoryLedger;
use crate::queue::RunQueue;
use crate::resolve::truncate_to_minute;
use crate::snapshot::render_snapshot;

/// A request for a point-in-time status snapshot. The listener blocks on
/// `reply` instead of reaching into dispatcher state.
#[derive(Debug)]
pub struct StatusRequest {
    pub reply: oneshot::Sender<String>,
}

/// Outcome of one poll-tick evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing due yet.
    Idle,
    /// The earliest job was due and fired with this outcome.
    Fired(Outcome),
    /// The queue is empty; the scheduler is done.
    Terminated,
}

/// The main-loop state machine.
pub struct Dispatcher<E> {
    queue: RunQueue,
    ledger: HistoryLedger,
    executor: E,
    poll_interval: Duration,
}

impl<E: JobExecutor> Dispatcher<E> {
    /// Create a dispatcher over an already-validated queue.
    pub fn new(queue: RunQueue, executor: E, poll_interval: Duration) -> Self {
        Self {
            queue,
            ledger: HistoryLedger::new(),
            executor,
            poll_interval,
        }
    }

    /// The firing history so far.
    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// The pending job queue.
    pub fn queue(&self) -> &RunQueue {
        &self.queue
    }

    /// Render the current status snapshot: history plus the earliest
    /// pending job.
    pub fn snapshot(&self) -> String {
        render_snapshot(&self.ledger, self.queue.peek_earliest().ok())
    }

    /// Evaluate one poll tick against the given clock.
    ///
    /// The clock is read twice: once to decide due-ness, and again after a
    /// firing completes, because the successor of a recurring job depends
    /// on whether execution pushed the wall clock past the trigger minute.
    pub async fn tick<C>(&mut self, clock: &C) -> Tick
    where
        C: Fn() -> NaiveDateTime,
    {
        let now = truncate_to_minute(clock());

        let job = match self.queue.peek_earliest() {
            Ok(job) => job.clone(),
            Err(_) => return Tick::Terminated,
        };
        if !job.is_due(now) {
            return Tick::Idle;
        }

        info!(job = %job.command_line(), at = %now, "firing job");
        let outcome = match self
            .executor
            .execute(&job.rule.program, &job.rule.args)
            .await
        {
            Ok(()) => Outcome::Ran,
            Err(err) => {
                warn!(job = %job.command_line(), error = %err, "job execution failed");
                Outcome::Errored
            }
        };

        self.ledger.record(outcome, now, job.command_line());
        self.queue.remove(job.id);

        // Fresh read: the decision between the normal and forced-forward
        // resolver depends on the clock after execution finished.
        let after = truncate_to_minute(clock());
        if let Some(next) = job.successor(after) {
            debug!(job = %next.command_line(), at = %next.next_run_at, "reinserting recurring job");
            self.queue.insert(next);
        }

        if self.queue.is_empty() {
            Tick::Terminated
        } else {
            Tick::Fired(outcome)
        }
    }

    /// Drive the loop until the queue empties or shutdown is requested.
    ///
    /// Status requests are serviced between ticks, never mid-firing.
    pub async fn run(
        mut self,
        mut status_rx: mpsc::Receiver<StatusRequest>,
        shutdown: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(pending = self.queue.len(), "dispatcher started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("dispatcher shutting down");
                    return;
                }
                Some(request) = status_rx.recv() => {
                    let _ = request.reply.send(self.snapshot());
                }
                _ = ticker.tick() => {
                    if let Tick::Terminated = self.tick(&now_local).await {
                        info!("nothing left to run");
                        return;
                    }
                }
            }
        }
    }
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}
