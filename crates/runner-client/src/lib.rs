//! Client library for the job-runner daemon.
//!
//! Provides `StatusClient`, which asks a running daemon for a status
//! snapshot: it signals the daemon with SIGUSR1, waits up to a bounded
//! timeout for the snapshot to appear in the status file, and consumes it.
//!
//! # Example
//!
//! ```rust,no_run
//! use runner_client::StatusClient;
//! use runner_types::Settings;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(None)?;
//!     let client = StatusClient::new(&settings);
//!     let snapshot = client.fetch_status().await?;
//!     print!("{snapshot}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

pub use client::StatusClient;
pub use error::ClientError;
