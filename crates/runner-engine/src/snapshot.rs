//! Status snapshot rendering.
//!
//! A snapshot is a line-oriented report: every successful firing (`ran`),
//! every failed firing (`error`), then the single earliest pending job
//! (`will run at`), omitted when nothing is pending.

use runner_types::Outcome;

use crate::job::ScheduledJob;
use crate::ledger::HistoryLedger;

/// Render a snapshot of the ledger plus the queue head.
pub fn render_snapshot(ledger: &HistoryLedger, next: Option<&ScheduledJob>) -> String {
    let mut out = String::new();
    for entry in ledger.with_outcome(Outcome::Ran) {
        out.push_str(&entry.snapshot_line());
        out.push('\n');
    }
    for entry in ledger.with_outcome(Outcome::Errored) {
        out.push_str(&entry.snapshot_line());
        out.push('\n');
    }
    if let Some(job) = next {
        out.push_str(&job.snapshot_line());
        out.push('\n');
    }
    out
}
