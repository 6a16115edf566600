//! Service layer for listing launchable servers.

use crate::server_registry::{
    domain::ServerDescriptor,
    ports::{ServerCatalog, ServerCatalogError},
};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Order in which discovered servers are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingOrder {
    /// The order the catalog yields, which for a directory is whatever the
    /// filesystem returns.
    #[default]
    Listed,
    /// Sorted by server name.
    Name,
}

impl ListingOrder {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listed => "listed",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for ListingOrder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Error returned while parsing a listing order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown listing order '{0}' (expected 'listed' or 'name')")]
pub struct ParseListingOrderError(pub String);

impl FromStr for ListingOrder {
    type Err = ParseListingOrderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "listed" => Ok(Self::Listed),
            "name" => Ok(Self::Name),
            _ => Err(ParseListingOrderError(value.to_owned())),
        }
    }
}

/// Service-level errors for server discovery.
#[derive(Debug, Error)]
pub enum ServerDiscoveryError {
    /// Catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] ServerCatalogError),
}

/// Result type for discovery service operations.
pub type ServerDiscoveryResult<T> = Result<T, ServerDiscoveryError>;

/// Lists the servers currently available in a catalog.
pub struct ServerDiscoveryService<C>
where
    C: ServerCatalog,
{
    catalog: Arc<C>,
    order: ListingOrder,
}

impl<C> Clone for ServerDiscoveryService<C>
where
    C: ServerCatalog,
{
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            order: self.order,
        }
    }
}

impl<C> ServerDiscoveryService<C>
where
    C: ServerCatalog,
{
    /// Creates a discovery service returning servers in catalog order.
    #[must_use]
    pub const fn new(catalog: Arc<C>) -> Self {
        Self {
            catalog,
            order: ListingOrder::Listed,
        }
    }

    /// Sets the listing order.
    #[must_use]
    pub const fn with_order(mut self, order: ListingOrder) -> Self {
        self.order = order;
        self
    }

    /// Rescans the catalog and returns every launchable server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerDiscoveryError::Catalog`] when the catalog cannot be
    /// read.
    pub async fn list_servers(&self) -> ServerDiscoveryResult<Vec<ServerDescriptor>> {
        let mut servers = self.catalog.list().await?;
        if self.order == ListingOrder::Name {
            servers.sort_by(|left, right| left.name().cmp(right.name()));
        }
        Ok(servers)
    }
}
