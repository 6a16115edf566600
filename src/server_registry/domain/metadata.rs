//! Optional descriptive metadata for a server.

use serde::{Deserialize, Serialize};

/// Descriptive metadata shown alongside a server in listings.
///
/// Both fields are free-form. A field that is absent or blank in the
/// metadata file keeps its [`ServerMetadata::UNKNOWN`] default on its own;
/// partial metadata is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMetadata {
    version: String,
    mods: String,
}

impl ServerMetadata {
    /// Placeholder used when a field is not provided.
    pub const UNKNOWN: &'static str = "Unknown";

    /// Builds metadata from optional raw values, applying the per-field
    /// default to absent or blank values.
    #[must_use]
    pub fn from_fields(version: Option<&str>, mods: Option<&str>) -> Self {
        Self {
            version: field_or_unknown(version),
            mods: field_or_unknown(mods),
        }
    }

    /// Returns the server version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the mods tag.
    #[must_use]
    pub fn mods(&self) -> &str {
        &self.mods
    }
}

impl Default for ServerMetadata {
    fn default() -> Self {
        Self::from_fields(None, None)
    }
}

fn field_or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .unwrap_or(ServerMetadata::UNKNOWN)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_is_unknown() {
        let metadata = ServerMetadata::default();
        assert_eq!(metadata.version(), "Unknown");
        assert_eq!(metadata.mods(), "Unknown");
    }

    #[rstest]
    #[case(Some("1.2"), None, "1.2", "Unknown")]
    #[case(None, Some("forge"), "Unknown", "forge")]
    #[case(Some(""), Some("  "), "Unknown", "Unknown")]
    #[case(Some(" 1.20.4 "), Some("none"), "1.20.4", "none")]
    fn fields_fall_back_individually(
        #[case] version: Option<&str>,
        #[case] mods: Option<&str>,
        #[case] expected_version: &str,
        #[case] expected_mods: &str,
    ) {
        let metadata = ServerMetadata::from_fields(version, mods);
        assert_eq!(metadata.version(), expected_version);
        assert_eq!(metadata.mods(), expected_mods);
    }
}
