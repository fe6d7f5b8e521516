//! Full-pipeline tests: job file in, firings and snapshots out.

use e2e_tests::{day_at, TestHarness};
use pretty_assertions::assert_eq;
use runner_engine::{load_queue, Tick};
use runner_types::Outcome;

#[tokio::test]
async fn one_shot_weekday_job_fires_exactly_once() {
    // Monday 08:00; the job targets Tuesday 11:00.
    let mut harness = TestHarness::load("on Tuesday at 1100 run /bin/echo hello", day_at(4, 8, 0));

    let transitions = harness.run_until(day_at(10, 23, 59)).await;
    // One firing, then termination on the same tick (the queue emptied).
    assert_eq!(transitions, vec![(day_at(5, 11, 0), Tick::Terminated)]);
    assert_eq!(harness.executor.calls(), vec!["/bin/echo hello"]);

    let entries = harness.dispatcher.ledger().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outcome, Outcome::Ran);
    assert_eq!(entries[0].fired_at, day_at(5, 11, 0));
    assert!(harness.dispatcher.queue().is_empty());
}

#[tokio::test]
async fn recurring_job_never_fires_twice_in_one_week() {
    let mut harness = TestHarness::load("every Monday at 0900 run /bin/echo hi", day_at(4, 8, 0));

    // Drive the full week, minute by minute.
    let transitions = harness.run_until(day_at(10, 23, 59)).await;
    assert_eq!(
        transitions,
        vec![(day_at(4, 9, 0), Tick::Fired(Outcome::Ran))]
    );
    assert_eq!(harness.dispatcher.ledger().len(), 1);

    // The successor sits exactly one week out.
    let next = harness.dispatcher.queue().peek_earliest().unwrap();
    assert_eq!(next.next_run_at, day_at(11, 9, 0));
}

#[tokio::test]
async fn daily_times_split_across_today_and_tomorrow() {
    // 09:00 already passed at 09:05, 12:00 has not.
    let mut harness = TestHarness::load("at 0900,1200 run /bin/echo hi", day_at(4, 9, 5));

    let transitions = harness.run_until(day_at(5, 23, 59)).await;
    assert_eq!(
        transitions,
        vec![
            (day_at(4, 12, 0), Tick::Fired(Outcome::Ran)),
            (day_at(5, 9, 0), Tick::Terminated),
        ]
    );
    assert_eq!(harness.dispatcher.ledger().len(), 2);
}

#[tokio::test]
async fn failing_job_is_recorded_and_the_rest_keep_running() {
    let mut harness = TestHarness::load(
        "at 0900 run /bin/failing arg\nat 1000 run /bin/echo ok\n",
        day_at(4, 8, 0),
    );

    let transitions = harness.run_until(day_at(4, 12, 0)).await;
    assert_eq!(
        transitions,
        vec![
            (day_at(4, 9, 0), Tick::Fired(Outcome::Errored)),
            (day_at(4, 10, 0), Tick::Terminated),
        ]
    );

    let entries = harness.dispatcher.ledger().entries();
    assert_eq!(entries[0].outcome, Outcome::Errored);
    assert_eq!(entries[0].command_line, "/bin/failing arg");
    assert_eq!(entries[1].outcome, Outcome::Ran);
}

#[tokio::test]
async fn snapshot_reflects_history_and_next_job() {
    let mut harness = TestHarness::load(
        "at 0900 run /bin/failing\nevery Monday,Thursday at 1000 run /bin/echo tick\n",
        day_at(4, 8, 0),
    );

    harness.run_until(day_at(4, 10, 30)).await;

    let snapshot = harness.dispatcher.snapshot();
    let lines: Vec<&str> = snapshot.lines().collect();
    assert_eq!(
        lines,
        vec![
            "ran Mon Mar 04 10:00:00 2024 /bin/echo tick",
            "error Mon Mar 04 09:00:00 2024 /bin/failing",
            "will run at Thu Mar 07 10:00:00 2024 /bin/echo tick",
        ]
    );
}

#[tokio::test]
async fn snapshot_omits_pending_line_after_termination() {
    let mut harness = TestHarness::load("at 0900 run /bin/echo bye", day_at(4, 8, 0));
    harness.run_until(day_at(4, 10, 0)).await;

    assert_eq!(
        harness.dispatcher.snapshot(),
        "ran Mon Mar 04 09:00:00 2024 /bin/echo bye\n"
    );
}

#[test]
fn startup_rejects_duplicate_run_instants() {
    let err = load_queue(
        "at 0900 run /bin/a\nevery Monday at 0900 run /bin/b\n",
        day_at(4, 8, 0),
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate run time"));
}

#[test]
fn startup_rejects_duplicate_lines_naming_the_line() {
    let err = load_queue(
        "on Tuesday at 1100 run /bin/echo hello\non Tuesday at 1100 run /bin/echo hello\n",
        day_at(4, 8, 0),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "error in configuration: on Tuesday at 1100 run /bin/echo hello"
    );
}

#[test]
fn startup_rejects_empty_job_file() {
    let err = load_queue("", day_at(4, 8, 0)).unwrap_err();
    assert!(err.to_string().contains("configuration file empty"));
}
