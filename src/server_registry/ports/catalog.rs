//! Catalog port for discovering and resolving servers.

use crate::server_registry::domain::{ServerDescriptor, ServerName};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type for server catalog operations.
pub type ServerCatalogResult<T> = Result<T, ServerCatalogError>;

/// Source of launchable servers.
///
/// Implementations must not cache: every call reflects the registry as it
/// is at the time of the call, since servers may be added or removed between
/// requests.
#[async_trait]
pub trait ServerCatalog: Send + Sync {
    /// Lists every launchable server.
    ///
    /// Entries that do not qualify as servers are skipped rather than failing
    /// the whole listing.
    ///
    /// # Errors
    ///
    /// Returns [`ServerCatalogError`] when the registry itself cannot be read.
    async fn list(&self) -> ServerCatalogResult<Vec<ServerDescriptor>>;

    /// Resolves a single server by name.
    ///
    /// Returns `Ok(None)` when no server directory has the name or when the
    /// directory has no recognized launch script.
    ///
    /// # Errors
    ///
    /// Returns [`ServerCatalogError`] when the registry cannot be read.
    async fn resolve(&self, name: &ServerName) -> ServerCatalogResult<Option<ServerDescriptor>>;
}

/// Errors returned by server catalog implementations.
#[derive(Debug, Clone, Error)]
pub enum ServerCatalogError {
    /// The server root could not be opened.
    #[error("server root {root} is unavailable: {source}")]
    RootUnavailable {
        /// Configured server root.
        root: Utf8PathBuf,
        /// Underlying I/O failure.
        source: Arc<std::io::Error>,
    },

    /// A lock guarding catalog state was poisoned by a panicking holder.
    #[error("server catalog state lock poisoned: {0}")]
    Poisoned(String),

    /// Generic catalog failure.
    #[error("server catalog error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServerCatalogError {
    /// Wraps an I/O failure while opening the server root.
    pub fn root_unavailable(root: impl Into<Utf8PathBuf>, err: std::io::Error) -> Self {
        Self::RootUnavailable {
            root: root.into(),
            source: Arc::new(err),
        }
    }

    /// Wraps a runtime failure from the catalog adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
