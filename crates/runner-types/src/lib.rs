//! # runner-types
//!
//! Shared domain types for the job-runner scheduler.
//!
//! This crate defines the core data structures used throughout the system:
//! - Recurrence rules: the validated form of one job-file line
//! - History entries: the record of one job firing
//! - Settings: layered daemon/client configuration
//!
//! ## Usage
//!
//! ```rust
//! use runner_types::{RecurrenceRule, RuleKind, TimeOfDay};
//! ```

pub mod error;
pub mod history;
pub mod rule;
pub mod settings;

pub use error::RunnerError;
pub use history::{HistoryEntry, Outcome};
pub use rule::{parse_weekday, weekday_name, RecurrenceRule, RuleKind, TimeOfDay, WEEKDAY_NAMES};
pub use settings::Settings;
