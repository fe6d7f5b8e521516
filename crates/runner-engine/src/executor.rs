//! Job execution: the seam between the scheduling core and the operating
//! system.
//!
//! The dispatcher only ever sees `execute(program, args) -> Result`; tests
//! substitute a scripted executor, the daemon uses `ProcessExecutor`.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Why a firing failed.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program could not be started at all.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program started but reported failure.
    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Executes one job invocation. A failure is recorded and never retried.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    async fn execute(&self, program: &str, args: &[String]) -> Result<(), ExecError>;
}

#[async_trait]
impl<T: JobExecutor + ?Sized> JobExecutor for std::sync::Arc<T> {
    async fn execute(&self, program: &str, args: &[String]) -> Result<(), ExecError> {
        (**self).execute(program, args).await
    }
}

/// Real executor: spawns the program as a child process and waits for it.
///
/// One job at a time; the dispatcher loop resumes only after the child has
/// exited. A spawn failure or a non-zero exit status both count as a
/// failed firing.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

#[async_trait]
impl JobExecutor for ProcessExecutor {
    async fn execute(&self, program: &str, args: &[String]) -> Result<(), ExecError> {
        debug!(program, ?args, "spawning job process");
        let status = Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::Failed {
                program: program.to_string(),
                status,
            })
        }
    }
}
