//! In-memory server catalog.

use crate::server_registry::{
    domain::{ServerDescriptor, ServerName},
    ports::{ServerCatalog, ServerCatalogError, ServerCatalogResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory server catalog.
///
/// Servers are listed in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServerCatalog {
    servers: Arc<RwLock<Vec<ServerDescriptor>>>,
}

impl InMemoryServerCatalog {
    /// Creates an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a server, replacing any existing server with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ServerCatalogError::Poisoned`] when the catalog lock is poisoned.
    pub fn insert(&self, server: ServerDescriptor) -> ServerCatalogResult<()> {
        let mut servers = self
            .servers
            .write()
            .map_err(|err| ServerCatalogError::Poisoned(err.to_string()))?;
        if let Some(existing) = servers
            .iter_mut()
            .find(|existing| existing.name() == server.name())
        {
            *existing = server;
        } else {
            servers.push(server);
        }
        Ok(())
    }

    /// Removes a server, returning whether it was present.
    ///
    /// # Errors
    ///
    /// Returns [`ServerCatalogError::Poisoned`] when the catalog lock is poisoned.
    pub fn remove(&self, name: &ServerName) -> ServerCatalogResult<bool> {
        let mut servers = self
            .servers
            .write()
            .map_err(|err| ServerCatalogError::Poisoned(err.to_string()))?;
        let before = servers.len();
        servers.retain(|server| server.name() != name);
        Ok(servers.len() != before)
    }
}

#[async_trait]
impl ServerCatalog for InMemoryServerCatalog {
    async fn list(&self) -> ServerCatalogResult<Vec<ServerDescriptor>> {
        let servers = self
            .servers
            .read()
            .map_err(|err| ServerCatalogError::Poisoned(err.to_string()))?;
        Ok(servers.clone())
    }

    async fn resolve(&self, name: &ServerName) -> ServerCatalogResult<Option<ServerDescriptor>> {
        let servers = self
            .servers
            .read()
            .map_err(|err| ServerCatalogError::Poisoned(err.to_string()))?;
        Ok(servers.iter().find(|server| server.name() == name).cloned())
    }
}
