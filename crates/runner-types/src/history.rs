//! History entries: the append-only record of one job firing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used in status snapshots, e.g. `Mon Mar 04 09:00:00 2024`.
pub const SNAPSHOT_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Outcome of one job firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The program was started and exited successfully.
    Ran,
    /// The program could not be started, or exited with a failure status.
    Errored,
}

/// One entry in the history ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Whether the firing succeeded.
    pub outcome: Outcome,
    /// The instant the job fired, at minute resolution.
    pub fired_at: NaiveDateTime,
    /// Program path plus arguments, as written in the job file.
    pub command_line: String,
}

impl HistoryEntry {
    /// Render this entry as one snapshot line
    /// (`ran <timestamp> <command>` or `error <timestamp> <command>`).
    pub fn snapshot_line(&self) -> String {
        let tag = match self.outcome {
            Outcome::Ran => "ran",
            Outcome::Errored => "error",
        };
        format!(
            "{} {} {}",
            tag,
            self.fired_at.format(SNAPSHOT_TIME_FORMAT),
            self.command_line
        )
    }
}
