//! Job-file parser.
//!
//! A job file contains one rule per line:
//!
//! ```text
//! at HHMM[,HHMM...] run program [args...]
//! on day[,day...] at HHMM[,HHMM...] run program [args...]
//! every day[,day...] at HHMM[,HHMM...] run program [args...]
//! ```
//!
//! Weekday names are the exact capitalized English names ("Monday" ..
//! "Sunday"). Times are four digits, 24-hour. Blank lines are ignored.
//! An empty file, a malformed line, a weekday repeated within one line,
//! or two byte-identical lines all fail the whole load.

use runner_types::{parse_weekday, RecurrenceRule, RuleKind, TimeOfDay};

use crate::error::ScheduleError;

/// Parse a whole job file into validated recurrence rules.
pub fn parse_job_file(contents: &str) -> Result<Vec<RecurrenceRule>, ScheduleError> {
    let lines: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ScheduleError::Config("configuration file empty".to_string()));
    }

    // Byte-identical duplicate lines are a configuration error naming the line.
    for (i, line) in lines.iter().enumerate() {
        if lines[..i].contains(line) {
            return Err(ScheduleError::Config((*line).to_string()));
        }
    }

    lines.iter().map(|line| parse_line(line)).collect()
}

/// Parse one job-file line.
pub fn parse_line(line: &str) -> Result<RecurrenceRule, ScheduleError> {
    let bad = || ScheduleError::Config(line.to_string());
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.first() {
        Some(&"at") => {
            // at HHMM[,HHMM...] run program [args...]
            if tokens.len() < 4 || tokens[2] != "run" {
                return Err(bad());
            }
            Ok(RecurrenceRule {
                kind: RuleKind::Once,
                days: Vec::new(),
                times: parse_times(tokens[1]).ok_or_else(bad)?,
                program: tokens[3].to_string(),
                args: tokens[4..].iter().map(|s| s.to_string()).collect(),
            })
        }
        Some(&"on") | Some(&"every") => {
            // on|every day[,day...] at HHMM[,HHMM...] run program [args...]
            if tokens.len() < 6 || tokens[2] != "at" || tokens[4] != "run" {
                return Err(bad());
            }
            let kind = if tokens[0] == "on" {
                RuleKind::OneShotOnDay
            } else {
                RuleKind::Recurring
            };
            Ok(RecurrenceRule {
                kind,
                days: parse_days(tokens[1]).ok_or_else(bad)?,
                times: parse_times(tokens[3]).ok_or_else(bad)?,
                program: tokens[5].to_string(),
                args: tokens[6..].iter().map(|s| s.to_string()).collect(),
            })
        }
        _ => Err(bad()),
    }
}

/// Parse a comma-separated list of HHMM times. `None` on any bad element.
fn parse_times(field: &str) -> Option<Vec<TimeOfDay>> {
    field.split(',').map(parse_time).collect()
}

fn parse_time(field: &str) -> Option<TimeOfDay> {
    if field.len() != 4 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = field[..2].parse().ok()?;
    let minute = field[2..].parse().ok()?;
    TimeOfDay::new(hour, minute)
}

/// Parse a comma-separated list of weekday names. `None` on an unknown
/// name or a repeated day.
fn parse_days(field: &str) -> Option<Vec<chrono::Weekday>> {
    let mut days = Vec::new();
    for name in field.split(',') {
        let day = parse_weekday(name)?;
        if days.contains(&day) {
            return None;
        }
        days.push(day);
    }
    Some(days)
}
