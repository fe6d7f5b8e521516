//! Status protocol round trip: signal, snapshot, read-and-clear.
//!
//! The daemon side is simulated in-process by a task that listens for
//! SIGUSR1 and writes a dispatcher snapshot to the status file, which is
//! exactly what `runner-daemon` does.

#![cfg(unix)]

use std::time::Duration;

use e2e_tests::{day_at, TestHarness};
use runner_client::{ClientError, StatusClient};
use runner_types::Settings;

fn settings_in(dir: &std::path::Path) -> Settings {
    Settings {
        pid_file: dir.join("runner.pid").to_string_lossy().to_string(),
        status_file: dir.join("runner.status").to_string_lossy().to_string(),
        status_timeout_secs: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn client_gets_snapshot_from_signalled_daemon() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());

    // "Daemon" state: one firing in the books, one job pending.
    let mut harness = TestHarness::load(
        "every Monday at 0900 run /bin/echo hi\nat 1200 run /bin/date\n",
        day_at(4, 8, 0),
    );
    harness.run_until(day_at(4, 9, 30)).await;
    let snapshot = harness.dispatcher.snapshot();

    // This process stands in for the daemon: record our PID and answer
    // SIGUSR1 by writing the snapshot.
    std::fs::write(&settings.pid_file, std::process::id().to_string()).unwrap();
    std::fs::write(&settings.status_file, "").unwrap();

    let status_path = settings.status_file.clone();
    let mut usr1 =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::user_defined1()).unwrap();
    let listener = tokio::spawn(async move {
        usr1.recv().await;
        tokio::fs::write(&status_path, &snapshot).await.unwrap();
    });

    // Give the listener a moment to be polled and registered.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = StatusClient::new(&settings);
    let report = client.fetch_status().await.unwrap();

    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ran Mon Mar 04 09:00:00 2024 /bin/echo hi"));
    assert!(lines[1].starts_with("will run at Mon Mar 04 12:00:00 2024 /bin/date"));

    // Read-and-clear: the side channel is empty again.
    assert_eq!(
        std::fs::read_to_string(&settings.status_file).unwrap(),
        ""
    );
    listener.await.unwrap();
}

#[tokio::test]
async fn client_reports_missing_daemon() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());

    let client = StatusClient::new(&settings);
    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, ClientError::PidFileUnreadable(_)));
}

#[tokio::test]
async fn client_reports_dead_process() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());

    // A PID that cannot exist.
    std::fs::write(&settings.pid_file, "999999999").unwrap();

    let client = StatusClient::new(&settings);
    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, ClientError::ProcessNotFound));
}
