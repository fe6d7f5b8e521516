//! Run queue: the live set of scheduled jobs, ordered by next run instant.
//!
//! Construction from the initial expansion enforces instant uniqueness
//! (two jobs resolving to the same minute is a configuration error).
//! Collisions arising later from re-insertion are allowed; insertion order
//! breaks the tie so the queue always makes forward progress.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use runner_types::history::SNAPSHOT_TIME_FORMAT;

use crate::error::ScheduleError;
use crate::job::{JobId, ScheduledJob};

#[derive(Debug)]
struct Entry(ScheduledJob);

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .next_run_at
            .cmp(&other.0.next_run_at)
            .then_with(|| self.0.id.cmp(&other.0.id))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Min-ordered collection of pending jobs.
#[derive(Debug, Default)]
pub struct RunQueue {
    heap: BinaryHeap<Reverse<Entry>>,
}

impl RunQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial queue from the expanded job population, rejecting
    /// any two jobs that share a run instant.
    pub fn from_jobs(jobs: Vec<ScheduledJob>) -> Result<Self, ScheduleError> {
        let mut seen = HashSet::new();
        let mut queue = Self::new();
        for job in jobs {
            if !seen.insert(job.next_run_at) {
                return Err(ScheduleError::Config(format!(
                    "duplicate run time {}",
                    job.next_run_at.format(SNAPSHOT_TIME_FORMAT)
                )));
            }
            queue.insert(job);
        }
        Ok(queue)
    }

    /// Insert a job. Runtime instant collisions are allowed here.
    pub fn insert(&mut self, job: ScheduledJob) {
        self.heap.push(Reverse(Entry(job)));
    }

    /// The job with the globally minimal run instant.
    ///
    /// An empty queue is the scheduler's terminal condition and surfaces
    /// as `ScheduleError::QueueEmpty`.
    pub fn peek_earliest(&self) -> Result<&ScheduledJob, ScheduleError> {
        self.heap
            .peek()
            .map(|Reverse(Entry(job))| job)
            .ok_or(ScheduleError::QueueEmpty)
    }

    /// Remove a specific job by identity. Removing a job that is no longer
    /// queued is a no-op, not an error.
    pub fn remove(&mut self, id: JobId) {
        if self
            .heap
            .peek()
            .is_some_and(|Reverse(Entry(job))| job.id == id)
        {
            self.heap.pop();
            return;
        }
        // Rare path: the target is not the head.
        let entries = std::mem::take(&mut self.heap);
        self.heap = entries
            .into_iter()
            .filter(|Reverse(Entry(job))| job.id != id)
            .collect();
    }

    /// Number of pending jobs.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no jobs remain.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
