//! Liveness probe backed by the OS process table.

use crate::server_registry::ports::{
    ProcessProbe, ProcessProbeError, ProcessProbeResult, RunningProcess,
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;
use sysinfo::{Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};
use tracing::debug;

/// Process probe that scans every process visible to the current user.
///
/// A fresh process table snapshot is taken for every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProcessProbe;

impl SysinfoProcessProbe {
    /// Creates a process table probe.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Returns whether a process in `status` can still be serving.
///
/// Interpreters running a server script spend most of their time blocked on
/// their child, so sleeping and waiting states count as live.
#[must_use]
pub const fn is_live_status(status: ProcessStatus) -> bool {
    !matches!(
        status,
        ProcessStatus::Zombie | ProcessStatus::Stop | ProcessStatus::Tracing | ProcessStatus::Dead
    )
}

fn runs_script(process: &Process, launch_script: &Path) -> bool {
    process
        .cmd()
        .iter()
        .any(|argument| Path::new(argument) == launch_script)
}

fn scan(launch_script: &Utf8Path) -> Option<RunningProcess> {
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_cmd(UpdateKind::OnlyIfNotSet),
    );

    let script = launch_script.as_std_path();
    system
        .processes()
        .values()
        .filter(|process| process.thread_kind().is_none())
        .filter(|process| is_live_status(process.status()))
        .find(|process| runs_script(process, script))
        .map(|process| RunningProcess {
            pid: process.pid().as_u32(),
        })
}

#[async_trait]
impl ProcessProbe for SysinfoProcessProbe {
    async fn find_running(
        &self,
        launch_script: &Utf8Path,
    ) -> ProcessProbeResult<Option<RunningProcess>> {
        let script: Utf8PathBuf = launch_script.to_owned();
        let found = tokio::task::spawn_blocking(move || scan(&script))
            .await
            .map_err(ProcessProbeError::runtime)?;
        if let Some(process) = found {
            debug!(pid = process.pid, path = %launch_script, "launch script is running");
        }
        Ok(found)
    }
}
