//! Status client: signal the daemon, wait for the snapshot, read and clear.
//!
//! The protocol is fire-and-forget: SIGUSR1 carries no payload, it only
//! triggers snapshot production on the daemon side. The client then polls
//! the well-known status file once per second, up to a bounded timeout,
//! for non-empty content, returns it, and truncates the file so the next
//! request starts clean.

use std::path::PathBuf;
use std::time::Duration;

use runner_types::Settings;
use tracing::debug;

use crate::error::ClientError;

/// Client for requesting a status snapshot from a running daemon.
#[derive(Debug, Clone)]
pub struct StatusClient {
    pid_file: PathBuf,
    status_file: PathBuf,
    timeout: Duration,
}

impl StatusClient {
    /// Build a client from settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            pid_file: settings.pid_file_path(),
            status_file: settings.status_file_path(),
            timeout: Duration::from_secs(settings.status_timeout_secs),
        }
    }

    /// Request, await, and consume one status snapshot.
    pub async fn fetch_status(&self) -> Result<String, ClientError> {
        let pid = self.read_pid()?;
        debug!(pid, "sending status request signal");
        signal_status_request(pid)?;
        self.await_snapshot().await
    }

    /// Read the daemon's process id from the PID file.
    fn read_pid(&self) -> Result<i32, ClientError> {
        let name = self.pid_file.to_string_lossy().to_string();
        let contents = std::fs::read_to_string(&self.pid_file)
            .map_err(|_| ClientError::PidFileUnreadable(name.clone()))?;
        contents
            .trim()
            .parse()
            .map_err(|_| ClientError::BadPid(name))
    }

    /// Poll the status file once per second until it has content or the
    /// timeout elapses. On success the file is truncated after reading.
    async fn await_snapshot(&self) -> Result<String, ClientError> {
        let name = self.status_file.to_string_lossy().to_string();
        let deadline = self.timeout.as_secs();
        let mut exists = false;

        for elapsed in 0..=deadline {
            match tokio::fs::metadata(&self.status_file).await {
                Ok(meta) => {
                    exists = true;
                    if meta.len() > 0 {
                        let contents = tokio::fs::read_to_string(&self.status_file).await?;
                        // Read-and-clear: the next request starts empty.
                        tokio::fs::write(&self.status_file, "").await?;
                        return Ok(contents);
                    }
                }
                Err(_) => exists = false,
            }
            if elapsed < deadline {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }

        if exists {
            Err(ClientError::StatusTimeout(name))
        } else {
            Err(ClientError::StatusFileMissing(name))
        }
    }
}

/// Deliver the status-request signal to the daemon process.
#[cfg(unix)]
fn signal_status_request(pid: i32) -> Result<(), ClientError> {
    // SAFETY: kill with SIGUSR1 only delivers a signal; it does not touch
    // this process's memory.
    let rc = unsafe { libc::kill(pid, libc::SIGUSR1) };
    if rc == 0 {
        Ok(())
    } else {
        Err(ClientError::ProcessNotFound)
    }
}

#[cfg(not(unix))]
fn signal_status_request(_pid: i32) -> Result<(), ClientError> {
    Err(ClientError::ProcessNotFound)
}
