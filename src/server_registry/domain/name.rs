//! Validated server name derived from a service directory.

use super::ServerRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a server name, matching the common filesystem limit for
/// a single path component.
const MAX_SERVER_NAME_LENGTH: usize = 255;

/// Validated server name.
///
/// A server name is the name of a directory directly under the server root.
/// Names are case-sensitive and are never normalized, so the value always
/// matches the directory it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerName(String);

impl ServerName {
    /// Creates a validated server name.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRegistryDomainError`] when the value is empty, contains
    /// whitespace, is not a single directory component, or is longer than
    /// 255 bytes.
    pub fn new(value: impl Into<String>) -> Result<Self, ServerRegistryDomainError> {
        let candidate = value.into();

        if candidate.is_empty() {
            return Err(ServerRegistryDomainError::EmptyServerName);
        }

        if candidate.chars().any(char::is_whitespace) {
            return Err(ServerRegistryDomainError::WhitespaceInServerName(candidate));
        }

        let is_component = candidate != "."
            && candidate != ".."
            && !candidate.contains(['/', '\\', '\0']);
        if !is_component {
            return Err(ServerRegistryDomainError::InvalidServerName(candidate));
        }

        if candidate.len() > MAX_SERVER_NAME_LENGTH {
            return Err(ServerRegistryDomainError::ServerNameTooLong(candidate));
        }

        Ok(Self(candidate))
    }

    /// Returns the server name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServerName {
    type Error = ServerRegistryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServerName> for String {
    fn from(value: ServerName) -> Self {
        value.0
    }
}

impl AsRef<str> for ServerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
