//! Resolves optional `metadata.ini` files inside server directories.

use crate::server_registry::domain::ServerMetadata;
use cap_std::fs_utf8::Dir;
use ini::{Ini, ParseError, ParseOption, Properties};
use tracing::{debug, warn};

/// File name of the per-server metadata file.
pub const METADATA_FILE_NAME: &str = "metadata.ini";

/// Section of the metadata file that describes the server.
pub const METADATA_SECTION: &str = "server";

/// Raw outcome of reading a metadata file.
#[derive(Debug)]
pub enum MetadataReadOutcome {
    /// No metadata file is present.
    Missing,
    /// The file exists but could not be read.
    Unreadable(std::io::Error),
    /// The file was read but is not valid INI.
    Malformed(String),
    /// The file was parsed.
    Parsed(ServerMetadata),
}

/// Reads and parses `metadata.ini` from a server directory.
///
/// A parsed file without a `server` section yields default metadata.
#[must_use]
pub fn read_metadata(server_dir: &Dir) -> MetadataReadOutcome {
    let contents = match server_dir.read_to_string(METADATA_FILE_NAME) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return MetadataReadOutcome::Missing;
        }
        Err(err) => return MetadataReadOutcome::Unreadable(err),
    };

    match parse_literal_ini(&contents) {
        Ok(ini) => MetadataReadOutcome::Parsed(metadata_from_ini(&ini)),
        Err(err) => MetadataReadOutcome::Malformed(err.to_string()),
    }
}

/// Parses INI text keeping values literal.
///
/// Backslashes and surrounding quotes are part of the value, so Windows paths
/// such as `C:\servers\new` survive unchanged.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is not valid INI.
pub fn parse_literal_ini(contents: &str) -> Result<Ini, ParseError> {
    Ini::load_from_str_opt(
        contents,
        ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        },
    )
}

/// Resolves metadata for a server directory, falling back to defaults.
///
/// Missing, unreadable and malformed files all produce default metadata; the
/// three cases are reported with separate diagnostics.
#[must_use]
pub fn resolve_metadata(server_dir: &Dir, server: &str) -> ServerMetadata {
    match read_metadata(server_dir) {
        MetadataReadOutcome::Parsed(metadata) => metadata,
        MetadataReadOutcome::Missing => {
            debug!(server, "no metadata file, using defaults");
            ServerMetadata::default()
        }
        MetadataReadOutcome::Unreadable(err) => {
            warn!(server, error = %err, "metadata file could not be read, using defaults");
            ServerMetadata::default()
        }
        MetadataReadOutcome::Malformed(reason) => {
            warn!(server, %reason, "metadata file is malformed, using defaults");
            ServerMetadata::default()
        }
    }
}

fn metadata_from_ini(ini: &Ini) -> ServerMetadata {
    let Some(section) = ini.section(Some(METADATA_SECTION)) else {
        return ServerMetadata::default();
    };
    ServerMetadata::from_fields(
        lookup_key(section, "version"),
        lookup_key(section, "mods"),
    )
}

fn lookup_key<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cap_std::ambient_authority;
    use rstest::rstest;
    use tempfile::TempDir;

    fn server_dir_with(contents: Option<&str>) -> (TempDir, Dir) {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let dir = Dir::open_ambient_dir(
            camino::Utf8Path::from_path(temp.path()).expect("temp path should be UTF-8"),
            ambient_authority(),
        )
        .expect("temp dir should open");
        if let Some(text) = contents {
            dir.write(METADATA_FILE_NAME, text)
                .expect("metadata should be written");
        }
        (temp, dir)
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let (_temp, dir) = server_dir_with(None);
        assert!(matches!(read_metadata(&dir), MetadataReadOutcome::Missing));
        assert_eq!(resolve_metadata(&dir, "alpha"), ServerMetadata::default());
    }

    #[rstest]
    #[case("[server]\nversion = 1.2\nmods = none\n", "1.2", "none")]
    #[case("[server]\nversion = 1.20.4\n", "1.20.4", "Unknown")]
    #[case("[server]\nmods = forge\n", "Unknown", "forge")]
    #[case("[server]\nversion =\nmods = \n", "Unknown", "Unknown")]
    #[case("[server]\nVersion = 2.0\nMODS = fabric\n", "2.0", "fabric")]
    #[case("[other]\nversion = 9\n", "Unknown", "Unknown")]
    #[case("", "Unknown", "Unknown")]
    fn parsed_fields_fall_back_individually(
        #[case] contents: &str,
        #[case] version: &str,
        #[case] mods: &str,
    ) {
        let (_temp, dir) = server_dir_with(Some(contents));
        let metadata = resolve_metadata(&dir, "beta");
        assert_eq!(metadata.version(), version);
        assert_eq!(metadata.mods(), mods);
    }

    #[test]
    fn malformed_file_is_distinguished_from_missing() {
        let (_temp, dir) = server_dir_with(Some("[server\nversion = 1.2\n"));

        assert!(matches!(
            read_metadata(&dir),
            MetadataReadOutcome::Malformed(_)
        ));
        assert_eq!(resolve_metadata(&dir, "beta"), ServerMetadata::default());
    }

    #[rstest]
    #[case("[server]\nmods = forge\\new\\tweaks\n", "forge\\new\\tweaks")]
    #[case("[server]\nmods = C:\\mods\\x\n", "C:\\mods\\x")]
    #[case("[server]\nmods = \"quoted pack\"\n", "\"quoted pack\"")]
    fn values_are_kept_literally(#[case] contents: &str, #[case] mods: &str) {
        let (_temp, dir) = server_dir_with(Some(contents));

        assert_eq!(resolve_metadata(&dir, "beta").mods(), mods);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let (_temp, dir) = server_dir_with(None);
        dir.create_dir(METADATA_FILE_NAME)
            .expect("directory should be created");

        assert!(matches!(
            read_metadata(&dir),
            MetadataReadOutcome::Unreadable(_)
        ));
        assert_eq!(resolve_metadata(&dir, "beta"), ServerMetadata::default());
    }
}
