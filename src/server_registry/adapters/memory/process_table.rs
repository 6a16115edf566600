//! In-memory process table acting as both launcher and probe.

use crate::server_registry::{
    domain::ServerDescriptor,
    ports::{
        LaunchedProcess, ProcessLauncher, ProcessLauncherError, ProcessLauncherResult,
        ProcessProbe, ProcessProbeError, ProcessProbeResult, RunningProcess,
    },
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// First pid handed out by the in-memory process table.
const FIRST_PID: u32 = 1000;

/// In-memory process table.
///
/// This adapter models spawning and process inspection without touching the
/// OS. Launches register a live process for the server's launch script, which
/// the probe side then reports as running. It is suitable for unit and
/// integration tests of the launch supervisor.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProcessTable {
    state: Arc<RwLock<ProcessTableState>>,
}

#[derive(Debug, Default)]
struct ProcessTableState {
    processes: BTreeMap<u32, Utf8PathBuf>,
    last_pid: Option<u32>,
    launch_count: usize,
    failing_scripts: BTreeMap<Utf8PathBuf, String>,
    launch_delay: Option<Duration>,
}

impl ProcessTableState {
    fn next_pid(&mut self) -> u32 {
        let pid = self.last_pid.map_or(FIRST_PID, |last| last + 1);
        self.last_pid = Some(pid);
        pid
    }
}

impl InMemoryProcessTable {
    /// Creates an empty process table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, ProcessTableState>, String> {
        self.state.write().map_err(|err| err.to_string())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, ProcessTableState>, String> {
        self.state.read().map_err(|err| err.to_string())
    }

    /// Registers a process started outside the supervisor.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessProbeError::Poisoned`] when the table lock is poisoned.
    pub fn insert_running(&self, launch_script: impl Into<Utf8PathBuf>) -> ProcessProbeResult<u32> {
        let mut state = self.write_state().map_err(ProcessProbeError::Poisoned)?;
        let pid = state.next_pid();
        state.processes.insert(pid, launch_script.into());
        Ok(pid)
    }

    /// Removes a process, as if it had exited.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessProbeError::Poisoned`] when the table lock is poisoned.
    pub fn mark_exited(&self, pid: u32) -> ProcessProbeResult<bool> {
        let mut state = self.write_state().map_err(ProcessProbeError::Poisoned)?;
        Ok(state.processes.remove(&pid).is_some())
    }

    /// Makes launches of `launch_script` fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessProbeError::Poisoned`] when the table lock is poisoned.
    pub fn fail_launches_of(
        &self,
        launch_script: impl Into<Utf8PathBuf>,
        message: impl Into<String>,
    ) -> ProcessProbeResult<()> {
        self.write_state().map_err(ProcessProbeError::Poisoned)?
            .failing_scripts
            .insert(launch_script.into(), message.into());
        Ok(())
    }

    /// Delays every launch by `delay` before the process is registered.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessProbeError::Poisoned`] when the table lock is poisoned.
    pub fn set_launch_delay(&self, delay: Duration) -> ProcessProbeResult<()> {
        self.write_state().map_err(ProcessProbeError::Poisoned)?.launch_delay = Some(delay);
        Ok(())
    }

    /// Returns how many launches succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessProbeError::Poisoned`] when the table lock is poisoned.
    pub fn launch_count(&self) -> ProcessProbeResult<usize> {
        Ok(self.read_state().map_err(ProcessProbeError::Poisoned)?.launch_count)
    }

    /// Returns the pids of live processes running `launch_script`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessProbeError::Poisoned`] when the table lock is poisoned.
    pub fn pids_for(&self, launch_script: &Utf8Path) -> ProcessProbeResult<Vec<u32>> {
        Ok(self
            .read_state()?
            .processes
            .iter()
            .filter(|(_, script)| script.as_path() == launch_script)
            .map(|(pid, _)| *pid)
            .collect())
    }
}

#[async_trait]
impl ProcessLauncher for InMemoryProcessTable {
    async fn launch(&self, server: &ServerDescriptor) -> ProcessLauncherResult<LaunchedProcess> {
        let script = server.launch_script();
        let delay = {
            let state = self
                .read_state()
                .map_err(ProcessLauncherError::Poisoned)?;
            if let Some(message) = state.failing_scripts.get(script) {
                return Err(ProcessLauncherError::spawn(
                    script,
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, message.clone()),
                ));
            }
            state.launch_delay
        };

        if let Some(duration) = delay {
            tokio::time::sleep(duration).await;
        }

        let mut state = self
            .write_state()
            .map_err(ProcessLauncherError::Poisoned)?;
        let pid = state.next_pid();
        state.processes.insert(pid, script.to_owned());
        state.launch_count += 1;
        Ok(LaunchedProcess { pid })
    }
}

#[async_trait]
impl ProcessProbe for InMemoryProcessTable {
    async fn find_running(
        &self,
        launch_script: &Utf8Path,
    ) -> ProcessProbeResult<Option<RunningProcess>> {
        let state = self.read_state().map_err(ProcessProbeError::Poisoned)?;
        Ok(state
            .processes
            .iter()
            .find(|(_, script)| script.as_path() == launch_script)
            .map(|(pid, _)| RunningProcess { pid: *pid }))
    }
}
