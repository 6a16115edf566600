//! Launcher port for spawning server processes.

use crate::server_registry::domain::ServerDescriptor;
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for process launcher operations.
pub type ProcessLauncherResult<T> = Result<T, ProcessLauncherError>;

/// A process accepted by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchedProcess {
    /// OS process identifier.
    pub pid: u32,
}

/// Spawns detached server processes.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Spawns `server`'s launch script as a detached child process.
    ///
    /// Returns as soon as the OS has accepted the process; it does not wait
    /// for the server to initialize or exit. The child's output is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessLauncherError`] when the OS refuses the spawn.
    async fn launch(&self, server: &ServerDescriptor) -> ProcessLauncherResult<LaunchedProcess>;
}

/// Errors returned by process launcher adapters.
#[derive(Debug, Clone, Error)]
pub enum ProcessLauncherError {
    /// The OS failed to spawn the launch script.
    #[error("failed to spawn {launch_script}: {source}")]
    Spawn {
        /// Launch script that was being spawned.
        launch_script: Utf8PathBuf,
        /// Underlying OS failure.
        source: Arc<std::io::Error>,
    },

    /// The process exited before its identifier could be read.
    #[error("process for {0} exited before it could be recorded")]
    ExitedImmediately(Utf8PathBuf),

    /// A lock guarding launcher state was poisoned by a panicking holder.
    #[error("process launcher state lock poisoned: {0}")]
    Poisoned(String),
}

impl ProcessLauncherError {
    /// Wraps an OS spawn failure.
    pub fn spawn(launch_script: impl Into<Utf8PathBuf>, err: std::io::Error) -> Self {
        Self::Spawn {
            launch_script: launch_script.into(),
            source: Arc::new(err),
        }
    }
}
