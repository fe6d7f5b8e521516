//! Command implementations for the runner daemon.
//!
//! Handles:
//! - start: load config, validate the job file, run the dispatch loop
//! - stop: signal a running daemon to stop (via PID file)
//! - status: check whether the daemon is running

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::signal;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use runner_engine::{load_queue, Dispatcher, ProcessExecutor, StatusRequest};
use runner_types::Settings;

/// Overrides from `start` CLI flags, applied on top of loaded settings.
#[derive(Debug, Default)]
pub struct StartOverrides {
    pub job_file: Option<String>,
    pub status_file: Option<String>,
    pub poll_interval: Option<u64>,
    pub log_level: Option<String>,
}

/// Write this process's PID to the PID file.
fn write_pid_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, std::process::id().to_string())?;
    info!("Wrote PID file: {:?}", path);
    Ok(())
}

/// Remove the PID file, best effort.
fn remove_pid_file(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to remove PID file: {}", e);
        } else {
            info!("Removed PID file");
        }
    }
}

/// Read a PID from the PID file.
fn read_pid_file(path: &Path) -> Option<u32> {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

/// Check if a process is running.
#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    // On Unix, sending signal 0 checks if the process exists.
    // SAFETY: kill with signal 0 performs no action beyond the check.
    unsafe { libc::kill(pid as i32, 0) == 0 }
}

#[cfg(not(unix))]
fn is_process_running(_pid: u32) -> bool {
    true
}

/// Start the scheduler.
///
/// 1. Load configuration (defaults -> file -> env -> CLI)
/// 2. Parse and validate the job file; any configuration error exits
///    before anything runs
/// 3. Run the dispatch loop until the queue empties or SIGINT/SIGTERM
/// 4. Answer SIGUSR1 status requests by writing a snapshot to the
///    status file
pub async fn start_daemon(config_path: Option<&str>, foreground: bool, overrides: StartOverrides) -> Result<()> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    // CLI overrides have the highest precedence.
    if let Some(job_file) = overrides.job_file {
        settings.job_file = job_file;
    }
    if let Some(status_file) = overrides.status_file {
        settings.status_file = status_file;
    }
    if let Some(poll_interval) = overrides.poll_interval {
        settings.poll_interval_secs = poll_interval;
    }
    if let Some(log_level) = overrides.log_level {
        settings.log_level = log_level;
    }
    settings
        .validate()
        .context("Invalid configuration")?;

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Runner daemon starting...");
    info!("Configuration:");
    info!("  Job file: {}", settings.job_file);
    info!("  Status file: {}", settings.status_file);
    info!("  Poll interval: {}s", settings.poll_interval_secs);
    info!("  Log level: {}", settings.log_level);

    if !foreground {
        warn!("Background mode not yet implemented, running in foreground");
        warn!("Use a process manager (systemd, launchd) for background operation");
    }

    // Every configuration error is fatal here, before any job executes.
    let contents = fs::read_to_string(settings.job_file_path())
        .context("configuration file not found")?;
    let queue = load_queue(&contents, Local::now().naive_local())?;
    info!(jobs = queue.len(), "job file loaded");

    // The status side channel starts out present and empty.
    let status_path = settings.status_file_path();
    if !status_path.exists() {
        fs::write(&status_path, "").context("Failed to create status file")?;
    }

    let pid_path = settings.pid_file_path();
    write_pid_file(&pid_path)?;

    let shutdown = CancellationToken::new();
    let (status_tx, status_rx) = mpsc::channel(8);

    spawn_status_listener(status_tx, status_path, shutdown.clone())?;
    spawn_shutdown_watcher(shutdown.clone());

    let dispatcher = Dispatcher::new(
        queue,
        ProcessExecutor,
        Duration::from_secs(settings.poll_interval_secs),
    );
    dispatcher.run(status_rx, shutdown.clone()).await;

    // Stop the listener tasks before exiting.
    shutdown.cancel();
    remove_pid_file(&pid_path);
    Ok(())
}

/// Listen for SIGUSR1 and, on each delivery, request a snapshot from the
/// dispatcher and write it to the status file.
#[cfg(unix)]
fn spawn_status_listener(
    status_tx: mpsc::Sender<StatusRequest>,
    status_path: std::path::PathBuf,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut usr1 = signal::unix::signal(signal::unix::SignalKind::user_defined1())
        .context("Failed to install SIGUSR1 handler")?;

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                received = usr1.recv() => {
                    if received.is_none() {
                        return;
                    }
                }
            }

            info!("status request received");
            let (reply_tx, reply_rx) = oneshot::channel();
            if status_tx.send(StatusRequest { reply: reply_tx }).await.is_err() {
                // Dispatcher already terminated.
                return;
            }
            match reply_rx.await {
                Ok(snapshot) => {
                    if let Err(e) = tokio::fs::write(&status_path, &snapshot).await {
                        error!("Failed to write status file: {}", e);
                    }
                }
                Err(_) => return,
            }
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn spawn_status_listener(
    _status_tx: mpsc::Sender<StatusRequest>,
    _status_path: std::path::PathBuf,
    _shutdown: CancellationToken,
) -> Result<()> {
    warn!("Status requests are only supported on Unix");
    Ok(())
}

/// Cancel the shutdown token on SIGINT or SIGTERM.
fn spawn_shutdown_watcher(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if signal::ctrl_c().await.is_err() {
                error!("Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut term) => {
                    term.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C, shutting down...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down...");
            }
        }
        shutdown.cancel();
    });
}

/// Stop the running daemon by sending SIGTERM.
pub fn stop_daemon(config_path: Option<&str>) -> Result<()> {
    let settings = Settings::load(config_path).context("Failed to load configuration")?;
    let pid_path = settings.pid_file_path();
    let pid = read_pid_file(&pid_path).context("No PID file found - daemon may not be running")?;

    if !is_process_running(pid) {
        remove_pid_file(&pid_path);
        anyhow::bail!("Daemon not running (stale PID file removed)");
    }

    info!("Stopping daemon (PID {})", pid);

    #[cfg(unix)]
    {
        // SAFETY: delivers SIGTERM to another process, nothing else.
        let rc = unsafe { libc::kill(pid as i32, libc::SIGTERM) };
        if rc != 0 {
            anyhow::bail!("Failed to send SIGTERM to daemon");
        }
        println!("Sent SIGTERM to daemon (PID {})", pid);
    }

    #[cfg(not(unix))]
    {
        anyhow::bail!("Stop command not yet implemented on this platform");
    }

    Ok(())
}

/// Show daemon status.
pub fn show_status(config_path: Option<&str>) -> Result<()> {
    let settings = Settings::load(config_path).context("Failed to load configuration")?;
    let pid_path = settings.pid_file_path();

    match read_pid_file(&pid_path) {
        Some(pid) if is_process_running(pid) => {
            println!("Runner daemon is running (PID {})", pid);
            println!("PID file: {:?}", pid_path);
            Ok(())
        }
        Some(pid) => {
            println!(
                "Runner daemon is NOT running (stale PID {} in {:?})",
                pid, pid_path
            );
            Ok(())
        }
        None => {
            println!("Runner daemon is NOT running (no PID file)");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");

        write_pid_file(&path).unwrap();
        assert_eq!(read_pid_file(&path), Some(std::process::id()));

        remove_pid_file(&path);
        assert!(!path.exists());
        assert_eq!(read_pid_file(&path), None);
    }

    #[test]
    fn test_read_pid_file_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daemon.pid");
        fs::write(&path, "not a pid").unwrap();
        assert_eq!(read_pid_file(&path), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_own_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }
}
