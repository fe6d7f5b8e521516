//! Job Runner Daemon
//!
//! A minimal cron-like scheduler: reads a job file, runs each job at its
//! next due time (forever for weekly jobs, once for one-shot jobs), and
//! answers asynchronous status requests from `runner-status`.
//!
//! # Usage
//!
//! ```bash
//! runner-daemon start [--foreground] [--job-file PATH]
//! runner-daemon stop
//! runner-daemon status
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/job-runner/config.toml)
//! 3. Environment variables (RUNNER_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use runner_daemon::{show_status, start_daemon, stop_daemon, Cli, Commands, StartOverrides};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            foreground,
            job_file,
            status_file,
            poll_interval,
        } => {
            start_daemon(
                cli.config.as_deref(),
                foreground,
                StartOverrides {
                    job_file,
                    status_file,
                    poll_interval,
                    log_level: cli.log_level,
                },
            )
            .await?;
        }
        Commands::Stop => {
            stop_daemon(cli.config.as_deref())?;
        }
        Commands::Status => {
            show_status(cli.config.as_deref())?;
        }
    }

    Ok(())
}
