//! Time resolution: recurrence rule + reference instant -> next run instant.
//!
//! Every function here is pure and works at minute resolution. The one
//! subtle piece is the split between the normal path and the forced-forward
//! path for weekly rules: when a recurring job fires exactly on its own
//! trigger minute, recomputing "today" would land on the same minute again
//! and the job would fire forever. The forced path skips the current week
//! unconditionally, so consecutive run instants for the same rule are
//! strictly increasing.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Weekday};
use runner_types::TimeOfDay;

/// Drop seconds and sub-second components. The whole system compares
/// instants at minute granularity.
pub fn truncate_to_minute(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .and_hms_opt(now.hour(), now.minute(), 0)
        .expect("hour and minute taken from a valid datetime")
}

/// Next run instant for a `Once` ("at") rule.
///
/// A time still ahead today, or exactly equal to the current minute,
/// resolves to today; a past time rolls to tomorrow. Past-due times always
/// roll and are always kept, on every weekday.
pub fn next_once(time: TimeOfDay, now: NaiveDateTime) -> NaiveDateTime {
    if (time.hour, time.minute) >= (now.hour(), now.minute()) {
        time.on(now.date())
    } else {
        time.on(now.date() + Days::new(1))
    }
}

/// Next run instant for an `on`/`every` rule instance, normal path.
///
/// If the target weekday is today and the time has not yet passed
/// (minute-equal counts as not passed), the job runs today; otherwise on
/// the next calendar occurrence of that weekday, 1..=7 days ahead.
pub fn next_occurrence(day: Weekday, time: TimeOfDay, now: NaiveDateTime) -> NaiveDateTime {
    if day == now.weekday() && (time.hour, time.minute) >= (now.hour(), now.minute()) {
        time.on(now.date())
    } else {
        time.on(next_weekday_after(now.date(), day))
    }
}

/// Next run instant for a recurring rule, forced-forward path.
///
/// Used only for re-entry when the job fired exactly on its own trigger
/// minute: today is never a candidate, so the same weekday resolves a full
/// week ahead.
pub fn next_occurrence_forced(day: Weekday, time: TimeOfDay, now: NaiveDateTime) -> NaiveDateTime {
    time.on(next_weekday_after(now.date(), day))
}

/// The next calendar date strictly after `date` falling on `day`
/// (1..=7 days ahead; the same weekday as `date` is 7 days ahead).
fn next_weekday_after(date: NaiveDate, day: Weekday) -> NaiveDate {
    let ahead =
        (day.num_days_from_monday() + 7 - date.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    date + Days::new(u64::from(ahead))
}
