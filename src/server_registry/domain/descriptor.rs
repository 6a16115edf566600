//! Discovered view of a launchable server.

use super::{LaunchScriptKind, ServerMetadata, ServerName};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

/// A server found under the server root by a discovery scan.
///
/// Descriptors are rebuilt on every scan and are never mutated. Two scans
/// may produce different descriptors for the same server; only the name
/// carries identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDescriptor {
    name: ServerName,
    #[serde(flatten)]
    metadata: ServerMetadata,
    directory: Utf8PathBuf,
    launch_script_kind: LaunchScriptKind,
    launch_script: Utf8PathBuf,
}

impl ServerDescriptor {
    /// Creates a descriptor for a server directory.
    ///
    /// `directory` should be absolute; the launch script path is derived from
    /// it so the liveness probe can match it against process arguments.
    #[must_use]
    pub fn new(
        name: ServerName,
        directory: Utf8PathBuf,
        launch_script_kind: LaunchScriptKind,
        metadata: ServerMetadata,
    ) -> Self {
        let launch_script = directory.join(launch_script_kind.file_name());
        Self {
            name,
            metadata,
            directory,
            launch_script_kind,
            launch_script,
        }
    }

    /// Returns the server name.
    #[must_use]
    pub const fn name(&self) -> &ServerName {
        &self.name
    }

    /// Returns the server version, or `Unknown`.
    #[must_use]
    pub fn version(&self) -> &str {
        self.metadata.version()
    }

    /// Returns the mods tag, or `Unknown`.
    #[must_use]
    pub fn mods(&self) -> &str {
        self.metadata.mods()
    }

    /// Returns the resolved metadata.
    #[must_use]
    pub const fn metadata(&self) -> &ServerMetadata {
        &self.metadata
    }

    /// Returns the server directory.
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    /// Returns which launch script was selected.
    #[must_use]
    pub const fn launch_script_kind(&self) -> LaunchScriptKind {
        self.launch_script_kind
    }

    /// Returns the path of the launch script.
    #[must_use]
    pub fn launch_script(&self) -> &Utf8Path {
        &self.launch_script
    }
}
