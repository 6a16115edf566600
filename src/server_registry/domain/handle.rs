//! Records of processes spawned by the launch supervisor.

use super::{ServerDescriptor, ServerName};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a single launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchId(Uuid);

impl LaunchId {
    /// Creates a new random launch identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LaunchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LaunchId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// In-memory record of a process spawned for a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchHandle {
    id: LaunchId,
    server_name: ServerName,
    label: String,
    launch_script: Utf8PathBuf,
    pid: u32,
    launched_at: DateTime<Utc>,
}

impl LaunchHandle {
    /// Creates a handle for a process spawned from `server`'s launch script.
    #[must_use]
    pub fn new(server: &ServerDescriptor, pid: u32, clock: &impl Clock) -> Self {
        Self {
            id: LaunchId::new(),
            server_name: server.name().clone(),
            label: format!("server-{}", server.name()),
            launch_script: server.launch_script().to_owned(),
            pid,
            launched_at: clock.utc(),
        }
    }

    /// Returns the launch identifier.
    #[must_use]
    pub const fn id(&self) -> LaunchId {
        self.id
    }

    /// Returns the name of the launched server.
    #[must_use]
    pub const fn server_name(&self) -> &ServerName {
        &self.server_name
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the launch script the process was started from.
    #[must_use]
    pub fn launch_script(&self) -> &Utf8Path {
        &self.launch_script
    }

    /// Returns the OS process identifier of the spawned process.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Returns when the spawn was requested.
    #[must_use]
    pub const fn launched_at(&self) -> DateTime<Utc> {
        self.launched_at
    }
}
