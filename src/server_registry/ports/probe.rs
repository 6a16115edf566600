//! Liveness probe port for detecting already-running servers.

use async_trait::async_trait;
use camino::Utf8Path;
use std::sync::Arc;
use thiserror::Error;

/// Result type for process probe operations.
pub type ProcessProbeResult<T> = Result<T, ProcessProbeError>;

/// A live process found to be running a launch script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningProcess {
    /// OS process identifier.
    pub pid: u32,
}

/// Inspects the OS process table for running launch scripts.
///
/// Matching is a best-effort heuristic on process arguments: a process
/// launched through a rewritten path or with reordered arguments is not
/// recognized, and the answer is only valid at the instant of the query. It
/// is not a lock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessProbe: Send + Sync {
    /// Finds a live process that has `launch_script` among its arguments.
    ///
    /// Processes that cannot be inspected are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessProbeError`] only when the process table as a whole
    /// cannot be read.
    async fn find_running(
        &self,
        launch_script: &Utf8Path,
    ) -> ProcessProbeResult<Option<RunningProcess>>;

    /// Returns whether a live process is running `launch_script`.
    ///
    /// # Errors
    ///
    /// Returns errors from [`ProcessProbe::find_running`].
    async fn is_running(&self, launch_script: &Utf8Path) -> ProcessProbeResult<bool> {
        Ok(self.find_running(launch_script).await?.is_some())
    }
}

/// Errors returned by process probe adapters.
#[derive(Debug, Clone, Error)]
pub enum ProcessProbeError {
    /// A lock guarding probe state was poisoned by a panicking holder.
    #[error("process probe state lock poisoned: {0}")]
    Poisoned(String),

    /// Generic probe failure.
    #[error("process probe error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProcessProbeError {
    /// Wraps a runtime error from the probe adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
