//! Server catalog backed by a root directory of server directories.

use super::metadata::resolve_metadata;
use crate::server_registry::{
    domain::{LaunchScriptKind, ServerDescriptor, ServerName},
    ports::{ServerCatalog, ServerCatalogError, ServerCatalogResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::{debug, info, warn};

/// Catalog that treats each subdirectory of a root directory as a server.
///
/// A subdirectory is a server when it directly contains `start.bat` or
/// `run.bat`. The root is rescanned on every call.
#[derive(Debug, Clone)]
pub struct FilesystemServerCatalog {
    root: Utf8PathBuf,
}

impl FilesystemServerCatalog {
    /// Creates a catalog over `root`.
    ///
    /// The root is canonicalized so that launch script paths are absolute and
    /// match the arguments of processes spawned from them.
    ///
    /// # Errors
    ///
    /// Returns [`ServerCatalogError::RootUnavailable`] when the root does not
    /// exist or is not a directory.
    pub fn new(root: impl AsRef<Utf8Path>) -> ServerCatalogResult<Self> {
        let requested = root.as_ref();
        let canonical = requested
            .canonicalize_utf8()
            .map_err(|err| ServerCatalogError::root_unavailable(requested, err))?;
        if !canonical.is_dir() {
            return Err(ServerCatalogError::root_unavailable(
                requested,
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
        Ok(Self { root: canonical })
    }

    /// Returns the canonical server root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn open_root(&self) -> ServerCatalogResult<Dir> {
        Dir::open_ambient_dir(&self.root, ambient_authority())
            .map_err(|err| ServerCatalogError::root_unavailable(self.root.clone(), err))
    }

    fn scan(&self) -> ServerCatalogResult<Vec<ServerDescriptor>> {
        let root_dir = self.open_root()?;
        let entries = root_dir
            .entries()
            .map_err(|err| ServerCatalogError::root_unavailable(self.root.clone(), err))?;

        let mut servers = Vec::new();
        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(root = %self.root, error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            let Ok(file_name) = entry.file_name() else {
                warn!(root = %self.root, "skipping directory entry with a non UTF-8 name");
                continue;
            };
            let directory = self.root.join(&file_name);
            if !directory.is_dir() {
                if entry.file_type().is_ok_and(|file_type| file_type.is_symlink()) {
                    warn!(path = %directory, "ignoring symlink that does not resolve to a directory");
                } else {
                    debug!(path = %directory, "skipping non-directory entry");
                }
                continue;
            }
            let name = match ServerName::new(file_name.as_str()) {
                Ok(name) => name,
                Err(err) => {
                    warn!(directory = %file_name, error = %err, "ignoring server directory");
                    continue;
                }
            };
            if let Some(server) = self.describe(name) {
                servers.push(server);
            }
        }
        Ok(servers)
    }

    /// Describes the server directory `name`.
    ///
    /// The directory is opened through its path under the root rather than
    /// relative to the root handle, so symlinked server directories that
    /// point outside the root are followed.
    fn describe(&self, name: ServerName) -> Option<ServerDescriptor> {
        let directory = self.root.join(name.as_str());
        let server_dir = match Dir::open_ambient_dir(&directory, ambient_authority()) {
            Ok(server_dir) => server_dir,
            Err(err) => {
                warn!(path = %directory, error = %err, "server directory could not be opened");
                return None;
            }
        };

        let Some(kind) = detect_launch_script(&server_dir, &directory) else {
            info!(path = %directory, "no start file, ignoring");
            return None;
        };

        let metadata = resolve_metadata(&server_dir, name.as_str());
        debug!(server = %name, script = %kind, "discovered server");
        Some(ServerDescriptor::new(name, directory, kind, metadata))
    }

    fn lookup(&self, name: &ServerName) -> ServerCatalogResult<Option<ServerDescriptor>> {
        // Confirms the root is still there before judging the server.
        self.open_root()?;
        let directory = self.root.join(name.as_str());
        if !directory.is_dir() {
            info!(path = %directory, "not a valid server directory");
            return Ok(None);
        }
        Ok(self.describe(name.clone()))
    }
}

fn detect_launch_script(server_dir: &Dir, directory: &Utf8Path) -> Option<LaunchScriptKind> {
    let entries = match server_dir.entries() {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %directory, error = %err, "server directory could not be listed");
            return None;
        }
    };

    let files: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().ok())
        .filter(|file_name| directory.join(file_name).is_file())
        .collect();

    LaunchScriptKind::detect(files.iter().map(String::as_str))
}

#[async_trait]
impl ServerCatalog for FilesystemServerCatalog {
    async fn list(&self) -> ServerCatalogResult<Vec<ServerDescriptor>> {
        let catalog = self.clone();
        tokio::task::spawn_blocking(move || catalog.scan())
            .await
            .map_err(ServerCatalogError::runtime)?
    }

    async fn resolve(&self, name: &ServerName) -> ServerCatalogResult<Option<ServerDescriptor>> {
        let catalog = self.clone();
        let requested = name.clone();
        tokio::task::spawn_blocking(move || catalog.lookup(&requested))
            .await
            .map_err(ServerCatalogError::runtime)?
    }
}
