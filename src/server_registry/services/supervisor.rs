//! Launch supervisor: validates, probes and spawns servers by name.

use super::handles::{LaunchHandleRegistry, SupervisorStateError, SupervisorStateResult};
use crate::server_registry::{
    domain::{LaunchHandle, ServerName, ServerRegistryDomainError},
    ports::{ProcessLauncher, ProcessLauncherError, ProcessProbe, ServerCatalog},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

/// Errors returned when starting a server.
///
/// Every variant is a recoverable, per-server outcome; none of them affect
/// other launches.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The requested name is missing or not a well-formed server name.
    #[error("invalid server name")]
    InvalidArgument(#[source] Option<ServerRegistryDomainError>),

    /// No server directory with a launch script has this name.
    #[error("server '{0}' could not be found")]
    ServiceNotFound(ServerName),

    /// A live process is already running the server's launch script.
    #[error("server '{name}' is already running (pid {pid})")]
    AlreadyRunning {
        /// Server name.
        name: ServerName,
        /// Process found running the launch script.
        pid: u32,
    },

    /// The OS refused to spawn the launch script.
    #[error("server '{name}' failed to launch")]
    LaunchFailure {
        /// Server name.
        name: ServerName,
        /// Spawn failure reported by the launcher.
        #[source]
        source: ProcessLauncherError,
    },

    /// Supervisor bookkeeping outside any single launch is unavailable.
    #[error("launch supervisor state is unavailable")]
    State(#[from] SupervisorStateError),

    /// Any other failure while starting the server.
    #[error("internal error while starting server '{name}'")]
    Internal {
        /// Requested name.
        name: String,
        /// Underlying failure.
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl LaunchError {
    fn internal(name: impl Into<String>, err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal {
            name: name.into(),
            source: Arc::new(err),
        }
    }
}

impl From<ServerRegistryDomainError> for LaunchError {
    fn from(err: ServerRegistryDomainError) -> Self {
        Self::InvalidArgument(Some(err))
    }
}

/// Result type for launch supervisor operations.
pub type LaunchResult<T> = Result<T, LaunchError>;

/// Outcome of one name in a batch launch.
#[derive(Debug)]
pub struct LaunchOutcome {
    /// Name as requested.
    pub requested: String,
    /// Result of starting that name.
    pub result: LaunchResult<LaunchHandle>,
}

/// Per-name async locks serializing launches of the same server.
#[derive(Debug, Default)]
struct LaunchLocks {
    locks: Mutex<HashMap<ServerName, Arc<tokio::sync::Mutex<()>>>>,
}

impl LaunchLocks {
    fn for_name(&self, name: &ServerName) -> SupervisorStateResult<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|err| SupervisorStateError::LocksPoisoned(err.to_string()))?;
        Ok(Arc::clone(locks.entry(name.clone()).or_default()))
    }
}

/// Launch supervisor orchestrating one launch request end to end.
///
/// A start request validates the name, re-resolves the server from the
/// catalog, probes for a live process running its launch script, and only
/// then spawns it. Launches of the same server are serialized; launches of
/// different servers run concurrently.
pub struct LaunchSupervisor<C, P, L, K>
where
    C: ServerCatalog,
    P: ProcessProbe,
    L: ProcessLauncher,
    K: Clock + Send + Sync,
{
    catalog: Arc<C>,
    probe: Arc<P>,
    launcher: Arc<L>,
    clock: Arc<K>,
    handles: Arc<LaunchHandleRegistry>,
    locks: Arc<LaunchLocks>,
}

impl<C, P, L, K> Clone for LaunchSupervisor<C, P, L, K>
where
    C: ServerCatalog,
    P: ProcessProbe,
    L: ProcessLauncher,
    K: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            probe: Arc::clone(&self.probe),
            launcher: Arc::clone(&self.launcher),
            clock: Arc::clone(&self.clock),
            handles: Arc::clone(&self.handles),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<C, P, L, K> LaunchSupervisor<C, P, L, K>
where
    C: ServerCatalog,
    P: ProcessProbe,
    L: ProcessLauncher,
    K: Clock + Send + Sync,
{
    /// Creates a supervisor with a default-sized handle registry.
    #[must_use]
    pub fn new(catalog: Arc<C>, probe: Arc<P>, launcher: Arc<L>, clock: Arc<K>) -> Self {
        Self {
            catalog,
            probe,
            launcher,
            clock,
            handles: Arc::new(LaunchHandleRegistry::default()),
            locks: Arc::new(LaunchLocks::default()),
        }
    }

    /// Replaces the handle registry with one holding at most `capacity`
    /// handles.
    #[must_use]
    pub fn with_handle_capacity(mut self, capacity: usize) -> Self {
        self.handles = Arc::new(LaunchHandleRegistry::with_capacity(capacity));
        self
    }

    /// Starts the server called `name`.
    ///
    /// # Errors
    ///
    /// See [`LaunchSupervisor::start_optional`].
    pub async fn start(&self, name: &str) -> LaunchResult<LaunchHandle> {
        self.start_optional(Some(name)).await
    }

    /// Starts a server whose name may be missing from the request.
    ///
    /// Returns once the OS has accepted the spawn; the server may still be
    /// initializing.
    ///
    /// # Errors
    ///
    /// - [`LaunchError::InvalidArgument`] when `name` is `None` or invalid.
    /// - [`LaunchError::ServiceNotFound`] when no server directory with a
    ///   launch script has the name.
    /// - [`LaunchError::AlreadyRunning`] when the probe finds a live process.
    /// - [`LaunchError::LaunchFailure`] when the OS refuses the spawn.
    /// - [`LaunchError::Internal`] for catalog, probe, launcher state or lock
    ///   failures.
    pub async fn start_optional(&self, name: Option<&str>) -> LaunchResult<LaunchHandle> {
        let requested = name.ok_or(LaunchError::InvalidArgument(None))?;
        let result = self.start_validated(requested).await;
        match &result {
            Ok(handle) => info!(server = %handle.server_name(), pid = handle.pid(), "started server"),
            Err(err @ (LaunchError::Internal { .. } | LaunchError::State(_))) => {
                error!(server = requested, error = ?err, "unexpected failure starting server");
            }
            Err(err) => warn!(server = requested, error = %err, "server not started"),
        }
        result
    }

    async fn start_validated(&self, requested: &str) -> LaunchResult<LaunchHandle> {
        let name = ServerName::new(requested)?;

        let server = self
            .catalog
            .resolve(&name)
            .await
            .map_err(|err| LaunchError::internal(requested, err))?
            .ok_or_else(|| LaunchError::ServiceNotFound(name.clone()))?;

        let lock = self
            .locks
            .for_name(&name)
            .map_err(|err| LaunchError::internal(requested, err))?;
        let _guard = lock.lock().await;

        let running = self
            .probe
            .find_running(server.launch_script())
            .await
            .map_err(|err| LaunchError::internal(requested, err))?;
        if let Some(process) = running {
            return Err(LaunchError::AlreadyRunning {
                name,
                pid: process.pid,
            });
        }

        info!(server = %name, path = %server.launch_script(), "starting server");
        let launched = self
            .launcher
            .launch(&server)
            .await
            .map_err(|source| match source {
                ProcessLauncherError::Poisoned(_) => LaunchError::internal(requested, source),
                _ => LaunchError::LaunchFailure {
                    name: name.clone(),
                    source,
                },
            })?;

        let handle = LaunchHandle::new(&server, launched.pid, &*self.clock);
        self.handles
            .record(handle.clone())
            .map_err(|err| LaunchError::internal(requested, err))?;
        Ok(handle)
    }

    /// Returns a snapshot of recorded launch handles, least recent first.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::State`] when the registry lock is poisoned.
    pub fn handles(&self) -> LaunchResult<Vec<LaunchHandle>> {
        Ok(self.handles.snapshot()?)
    }

    /// Evicts handles whose launch script is no longer seen running.
    ///
    /// Only the launch that was probed is evicted, so a handle recorded by a
    /// relaunch while the probe ran is kept. Returns the number of evicted
    /// handles.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Internal`] when the probe fails and
    /// [`LaunchError::State`] when the registry lock is poisoned.
    pub async fn prune_exited(&self) -> LaunchResult<usize> {
        let mut evicted = 0;
        for handle in self.handles()? {
            let name = handle.server_name();
            let running = self
                .probe
                .is_running(handle.launch_script())
                .await
                .map_err(|err| LaunchError::internal(name.as_str(), err))?;
            if running {
                continue;
            }
            if self.handles.evict_launch(handle.id())?.is_some() {
                info!(
                    server = %name,
                    launch = %handle.id(),
                    pid = handle.pid(),
                    "evicted handle of exited server"
                );
                evicted += 1;
            }
        }
        Ok(evicted)
    }
}

impl<C, P, L, K> LaunchSupervisor<C, P, L, K>
where
    C: ServerCatalog + 'static,
    P: ProcessProbe + 'static,
    L: ProcessLauncher + 'static,
    K: Clock + Send + Sync + 'static,
{
    /// Starts `name` on its own task without waiting for the result.
    #[must_use = "the join handle reports the launch outcome"]
    pub fn dispatch(&self, name: impl Into<String>) -> JoinHandle<LaunchResult<LaunchHandle>> {
        let supervisor = self.clone();
        let requested = name.into();
        tokio::spawn(async move { supervisor.start(&requested).await })
    }

    /// Starts every name in `names`, each on its own task.
    ///
    /// Returns one outcome per requested name in request order. A failure or
    /// panic while starting one name does not affect the others.
    pub async fn start_batch<I, S>(&self, names: I) -> Vec<LaunchOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requested: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut tasks = JoinSet::new();
        for (index, name) in requested.iter().enumerate() {
            let supervisor = self.clone();
            let task_name = name.clone();
            tasks.spawn(async move { (index, supervisor.start(&task_name).await) });
        }

        let mut results: Vec<Option<LaunchResult<LaunchHandle>>> =
            requested.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    if let Some(slot) = results.get_mut(index) {
                        *slot = Some(result);
                    }
                }
                Err(err) => error!(error = %err, "launch task failed"),
            }
        }

        requested
            .into_iter()
            .zip(results)
            .map(|(name, result)| {
                let outcome = result.unwrap_or_else(|| {
                    Err(LaunchError::internal(
                        name.as_str(),
                        std::io::Error::other("launch task did not complete"),
                    ))
                });
                LaunchOutcome {
                    requested: name,
                    result: outcome,
                }
            })
            .collect()
    }
}
