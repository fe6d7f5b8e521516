//! CLI argument parsing for the runner daemon.

use clap::{Parser, Subcommand};

/// Job Runner Daemon
///
/// A minimal cron-like scheduler: reads a job file, runs each job at its
/// next due time, and answers status requests from `runner-status`.
#[derive(Parser, Debug)]
#[command(name = "runner-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/job-runner/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Daemon commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the scheduler
    Start {
        /// Run in foreground (don't daemonize)
        #[arg(short, long)]
        foreground: bool,

        /// Override the job file path
        #[arg(short, long)]
        job_file: Option<String>,

        /// Override the status file path
        #[arg(long)]
        status_file: Option<String>,

        /// Override the poll interval, in seconds
        #[arg(long)]
        poll_interval: Option<u64>,
    },

    /// Stop the running daemon
    Stop,

    /// Show daemon status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_start_foreground() {
        let cli = Cli::parse_from(["runner-daemon", "start", "--foreground"]);
        match cli.command {
            Commands::Start { foreground, .. } => assert!(foreground),
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_cli_start_with_job_file() {
        let cli = Cli::parse_from(["runner-daemon", "start", "-j", "/etc/runner.conf"]);
        match cli.command {
            Commands::Start { job_file, .. } => {
                assert_eq!(job_file, Some("/etc/runner.conf".to_string()));
            }
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_cli_start_with_poll_interval() {
        let cli = Cli::parse_from(["runner-daemon", "start", "--poll-interval", "2"]);
        match cli.command {
            Commands::Start { poll_interval, .. } => assert_eq!(poll_interval, Some(2)),
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["runner-daemon", "--config", "/path/to/config.toml", "start"]);
        assert_eq!(cli.config, Some("/path/to/config.toml".to_string()));
    }

    #[test]
    fn test_cli_with_log_level() {
        let cli = Cli::parse_from(["runner-daemon", "--log-level", "debug", "start"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_stop() {
        let cli = Cli::parse_from(["runner-daemon", "stop"]);
        assert!(matches!(cli.command, Commands::Stop));
    }

    #[test]
    fn test_cli_status() {
        let cli = Cli::parse_from(["runner-daemon", "status"]);
        assert!(matches!(cli.command, Commands::Status));
    }
}
