//! Error types for server registry domain validation.

use thiserror::Error;

/// Errors returned while constructing server registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServerRegistryDomainError {
    /// The server name is empty.
    #[error("server name must not be empty")]
    EmptyServerName,

    /// The server name contains whitespace, which separates names on the
    /// command surface.
    #[error("server name '{0}' must not contain whitespace")]
    WhitespaceInServerName(String),

    /// The server name is not a single directory component.
    #[error("server name '{0}' must be a single directory name")]
    InvalidServerName(String),

    /// The server name exceeds the filesystem component limit.
    #[error("server name exceeds 255 byte limit: {0}")]
    ServerNameTooLong(String),
}
