//! runner-status: query a running job-runner daemon for its status.
//!
//! Signals the daemon, waits for the snapshot side channel to fill, prints
//! the report, and clears the channel for the next request.

use clap::Parser;
use runner_client::StatusClient;
use runner_types::Settings;

/// Query the running job-runner daemon for a status snapshot.
#[derive(Parser, Debug)]
#[command(name = "runner-status")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (overrides default ~/.config/job-runner/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the PID file path
    #[arg(long)]
    pid_file: Option<String>,

    /// Override the status file path
    #[arg(long)]
    status_file: Option<String>,

    /// Override the snapshot wait timeout, in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // CLI flags take precedence over every other config source.
    if let Some(pid_file) = cli.pid_file {
        settings.pid_file = pid_file;
    }
    if let Some(status_file) = cli.status_file {
        settings.status_file = status_file;
    }
    if let Some(timeout) = cli.timeout {
        settings.status_timeout_secs = timeout;
    }

    let client = StatusClient::new(&settings);
    match client.fetch_status().await {
        Ok(snapshot) => {
            for line in snapshot.lines().filter(|l| !l.trim().is_empty()) {
                println!("{line}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
