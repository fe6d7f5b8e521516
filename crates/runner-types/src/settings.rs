//! Configuration loading for job-runner.
//!
//! Layered precedence: built-in defaults -> config file
//! (~/.config/job-runner/config.toml) -> environment variables (RUNNER_*)
//! -> CLI flags (applied by the caller after loading).

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the job file, one rule per line.
    #[serde(default = "default_job_file")]
    pub job_file: String,

    /// Path to the status snapshot side channel.
    #[serde(default = "default_status_file")]
    pub status_file: String,

    /// Path to the daemon PID file.
    #[serde(default = "default_pid_file")]
    pub pid_file: String,

    /// Dispatcher poll interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// How long the status client waits for a non-empty snapshot, in seconds.
    #[serde(default = "default_status_timeout")]
    pub status_timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_job_file() -> String {
    "runner.conf".to_string()
}

fn default_status_file() -> String {
    ".runner.status".to_string()
}

fn default_pid_file() -> String {
    ".runner.pid".to_string()
}

fn default_poll_interval() -> u64 {
    1
}

fn default_status_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            job_file: default_job_file(),
            status_file: default_status_file(),
            pid_file: default_pid_file(),
            poll_interval_secs: default_poll_interval(),
            status_timeout_secs: default_status_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/job-runner/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (RUNNER_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, RunnerError> {
        let config_dir = ProjectDirs::from("", "", "job-runner")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("job_file", default_job_file())
            .map_err(|e| RunnerError::Config(e.to_string()))?
            .set_default("status_file", default_status_file())
            .map_err(|e| RunnerError::Config(e.to_string()))?
            .set_default("pid_file", default_pid_file())
            .map_err(|e| RunnerError::Config(e.to_string()))?
            .set_default("poll_interval_secs", default_poll_interval() as i64)
            .map_err(|e| RunnerError::Config(e.to_string()))?
            .set_default("status_timeout_secs", default_status_timeout() as i64)
            .map_err(|e| RunnerError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| RunnerError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: RUNNER_JOB_FILE, RUNNER_POLL_INTERVAL_SECS, etc.
        builder = builder.add_source(
            Environment::with_prefix("RUNNER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| RunnerError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| RunnerError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would stall the dispatcher or the status client.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.poll_interval_secs == 0 {
            return Err(RunnerError::Config(
                "poll_interval_secs must be > 0".to_string(),
            ));
        }
        if self.status_timeout_secs == 0 {
            return Err(RunnerError::Config(
                "status_timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The job file as a filesystem path.
    pub fn job_file_path(&self) -> PathBuf {
        PathBuf::from(&self.job_file)
    }

    /// The status file as a filesystem path.
    pub fn status_file_path(&self) -> PathBuf {
        PathBuf::from(&self.status_file)
    }

    /// The PID file as a filesystem path.
    pub fn pid_file_path(&self) -> PathBuf {
        PathBuf::from(&self.pid_file)
    }
}
