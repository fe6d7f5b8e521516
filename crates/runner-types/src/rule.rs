//! Recurrence rules: the validated form of one job-file line.
//!
//! A rule names a program, its arguments, and when to run it: once today
//! or tomorrow ("at"), on the next occurrence of given weekdays ("on"), or
//! weekly on given weekdays ("every"). Weekdays are Monday-based, matching
//! `chrono::Weekday::num_days_from_monday` (0 = Monday .. 6 = Sunday).

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Canonical weekday names accepted in a job file, Monday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parse a canonical weekday name ("Monday".."Sunday", case-sensitive).
///
/// The job-file grammar only accepts the exact capitalized names, so this
/// is stricter than `chrono`'s own `FromStr` for `Weekday`.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let index = WEEKDAY_NAMES.iter().position(|&n| n == name)?;
    Some(WEEKDAYS[index])
}

/// Canonical name for a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// How often a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// "at": fires once, today or tomorrow depending on the time of day.
    Once,
    /// "on": fires once, on the next occurrence of the named weekday.
    OneShotOnDay,
    /// "every": fires weekly on the named weekday.
    Recurring,
}

impl RuleKind {
    /// The job-file keyword introducing this kind of rule.
    pub fn keyword(self) -> &'static str {
        match self {
            RuleKind::Once => "at",
            RuleKind::OneShotOnDay => "on",
            RuleKind::Recurring => "every",
        }
    }
}

/// A wall-clock time of day at minute resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

impl TimeOfDay {
    /// Create a time of day, rejecting out-of-range components.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Anchor this time of day on a calendar date, at second zero.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        // Infallible: hour/minute were range-checked at construction.
        date.and_hms_opt(self.hour, self.minute, 0)
            .expect("TimeOfDay components are in range")
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hour, self.minute)
    }
}

/// The validated, structured form of one job-file line.
///
/// `days` is empty for `Once` rules; `times` always has at least one entry.
/// One rule expands into one scheduled job per (day x time) combination at
/// load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// How often the rule fires.
    pub kind: RuleKind,
    /// Target weekdays, in the order they were written. Empty for `Once`.
    pub days: Vec<Weekday>,
    /// Target times of day, in the order they were written.
    pub times: Vec<TimeOfDay>,
    /// Full path of the program to run.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl RecurrenceRule {
    /// The program path and arguments as a single display string, the form
    /// used in status snapshots.
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday_canonical() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("Sunday"), Some(Weekday::Sun));
    }

    #[test]
    fn test_parse_weekday_rejects_noncanonical() {
        assert_eq!(parse_weekday("monday"), None);
        assert_eq!(parse_weekday("Mon"), None);
        assert_eq!(parse_weekday(""), None);
    }

    #[test]
    fn test_weekday_name_roundtrip() {
        for name in WEEKDAY_NAMES {
            let day = parse_weekday(name).unwrap();
            assert_eq!(weekday_name(day), name);
        }
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert!(TimeOfDay::new(0, 0).is_some());
        assert!(TimeOfDay::new(23, 59).is_some());
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(9, 60).is_none());
    }

    #[test]
    fn test_time_of_day_on_date() {
        let t = TimeOfDay::new(9, 30).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let dt = t.on(date);
        assert_eq!(dt.to_string(), "2024-03-04 09:30:00");
    }

    #[test]
    fn test_time_of_day_display() {
        assert_eq!(TimeOfDay::new(9, 5).unwrap().to_string(), "0905");
        assert_eq!(TimeOfDay::new(23, 59).unwrap().to_string(), "2359");
    }

    #[test]
    fn test_command_line() {
        let rule = RecurrenceRule {
            kind: RuleKind::Recurring,
            days: vec![Weekday::Mon],
            times: vec![TimeOfDay::new(9, 0).unwrap()],
            program: "/bin/echo".to_string(),
            args: vec!["hello".to_string(), "world".to_string()],
        };
        assert_eq!(rule.command_line(), "/bin/echo hello world");

        let bare = RecurrenceRule {
            args: vec![],
            ..rule
        };
        assert_eq!(bare.command_line(), "/bin/echo");
    }

    #[test]
    fn test_rule_kind_keyword() {
        assert_eq!(RuleKind::Once.keyword(), "at");
        assert_eq!(RuleKind::OneShotOnDay.keyword(), "on");
        assert_eq!(RuleKind::Recurring.keyword(), "every");
    }
}
