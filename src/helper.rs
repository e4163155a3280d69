//! Usermode helper invocation.
//!
//! The dispatcher optionally hands a finished event off to an external
//! program. The spawn is no-wait: setup failures surface synchronously, but
//! the dispatcher never blocks on the child. Ownership of the environment
//! buffer moves into the spawn; it is released by the completion task once
//! the out-of-process call no longer needs the data.
//!
//! [`HelperSpawner`] is the seam; [`ProcessSpawner`] is the production
//! implementation on top of `tokio::process`. Tests install recording
//! doubles.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::envbuf::EnvBuffer;
use crate::types::{Error, Result};

/// Process-spawn provider consumed by the dispatcher.
#[async_trait]
pub trait HelperSpawner: Send + Sync {
    /// Starts `program` with `args`, the buffer entries as its sole
    /// environment, and no-wait semantics. Takes ownership of the buffer.
    async fn spawn_no_wait(&self, program: &Path, args: &[String], env: EnvBuffer) -> Result<()>;
}

/// Spawns real child processes, detached from the dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSpawner;

#[async_trait]
impl HelperSpawner for ProcessSpawner {
    async fn spawn_no_wait(&self, program: &Path, args: &[String], env: EnvBuffer) -> Result<()> {
        let mut command = Command::new(program);
        command
            .args(args)
            .env_clear()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        for entry in env.entries() {
            if let Some((key, value)) = entry.split_once('=') {
                command.env(key, value);
            }
        }

        let mut child = command.spawn().map_err(|e| {
            Error::spawn_failure(format!("{}: {e}", program.display()))
        })?;

        // Completion task: reap the child and release the transferred buffer.
        let program = program.to_path_buf();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    tracing::debug!(helper = %program.display(), %status, "helper finished");
                }
                Err(e) => {
                    tracing::warn!(helper = %program.display(), error = %e, "helper wait failed");
                }
            }
            drop(env);
        });

        Ok(())
    }
}
