//! History ledger: append-only record of completed and failed firings.

use chrono::NaiveDateTime;
use runner_types::{HistoryEntry, Outcome};

/// Append-only firing history, in strictly increasing firing order.
///
/// Owned by the dispatcher; the status reporter only ever reads a rendered
/// snapshot of it.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one firing record.
    pub fn record(&mut self, outcome: Outcome, fired_at: NaiveDateTime, command_line: String) {
        self.entries.push(HistoryEntry {
            outcome,
            fired_at,
            command_line,
        });
    }

    /// All entries, in firing order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entries with the given outcome, in firing order.
    pub fn with_outcome(&self, outcome: Outcome) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.outcome == outcome)
    }

    /// Number of recorded firings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has fired yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
