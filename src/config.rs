//! Launchpad configuration loaded from an INI file.
//!
//! Settings live in the `[DEFAULT]` section:
//!
//! ```ini
//! [DEFAULT]
//! server_dir = /srv/servers
//! interpreter = sh
//! listing_order = name
//! max_handles = 64
//! ```
//!
//! Only `server_dir` is required, and it may instead be supplied as an
//! override (from the command line or environment), in which case the file
//! itself may be absent.

use crate::server_registry::{
    adapters::{filesystem::parse_literal_ini, process::ScriptInterpreter},
    services::{DEFAULT_HANDLE_CAPACITY, ListingOrder},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ini::Ini;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Configuration file read when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Section holding launchpad settings.
pub const SETTINGS_SECTION: &str = "DEFAULT";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file '{path}'")]
    Read {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The configuration file is not valid INI.
    #[error("config file is malformed: {0}")]
    Malformed(String),

    /// No server directory was configured.
    #[error("no server directory configured (set server_dir in [DEFAULT])")]
    MissingServerDir,

    /// The configured server directory does not exist or is not a directory.
    #[error("server directory '{path}' is unavailable")]
    ServerDirUnavailable {
        /// Configured path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A setting has an unusable value.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Value found.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Resolved launchpad settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchpadConfig {
    server_dir: Utf8PathBuf,
    interpreter: ScriptInterpreter,
    listing_order: ListingOrder,
    max_handles: usize,
}

impl LaunchpadConfig {
    /// Loads configuration from `path`.
    ///
    /// When `server_dir_override` is set it wins over the file's
    /// `server_dir`, and a missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when any setting is invalid.
    pub fn load(path: &Utf8Path, server_dir_override: Option<&Utf8Path>) -> ConfigResult<Self> {
        let contents = match read_config_file(path) {
            Ok(contents) => contents,
            Err(err)
                if err.kind() == std::io::ErrorKind::NotFound && server_dir_override.is_some() =>
            {
                debug!(path = %path, "config file not found, using overrides and defaults");
                String::new()
            }
            Err(err) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source: Arc::new(err),
                });
            }
        };
        Self::from_ini_str(&contents, server_dir_override)
    }

    /// Builds configuration from INI text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the text is not valid INI or any setting
    /// is invalid.
    pub fn from_ini_str(contents: &str, server_dir_override: Option<&Utf8Path>) -> ConfigResult<Self> {
        let ini = parse_literal_ini(contents).map_err(|err| ConfigError::Malformed(err.to_string()))?;
        let setting = |key: &str| settings_value(&ini, key);

        let server_dir = match server_dir_override {
            Some(path) => path.to_owned(),
            None => setting("server_dir")
                .map(Utf8PathBuf::from)
                .ok_or(ConfigError::MissingServerDir)?,
        };

        let interpreter = match setting("interpreter") {
            Some(value) => ScriptInterpreter::parse(value)
                .ok_or_else(|| ConfigError::invalid("interpreter", value, "must name a program"))?,
            None => ScriptInterpreter::default(),
        };

        let listing_order = setting("listing_order")
            .map(|value| {
                value
                    .parse::<ListingOrder>()
                    .map_err(|err| ConfigError::invalid("listing_order", value, err))
            })
            .transpose()?
            .unwrap_or_default();

        let max_handles = setting("max_handles")
            .map(parse_max_handles)
            .transpose()?
            .unwrap_or(DEFAULT_HANDLE_CAPACITY);

        Ok(Self {
            server_dir: validate_server_dir(&server_dir)?,
            interpreter,
            listing_order,
            max_handles,
        })
    }

    /// Returns the canonical server root directory.
    #[must_use]
    pub fn server_dir(&self) -> &Utf8Path {
        &self.server_dir
    }

    /// Returns the launch script interpreter.
    #[must_use]
    pub const fn interpreter(&self) -> &ScriptInterpreter {
        &self.interpreter
    }

    /// Returns the server listing order.
    #[must_use]
    pub const fn listing_order(&self) -> ListingOrder {
        self.listing_order
    }

    /// Returns the launch handle registry capacity.
    #[must_use]
    pub const fn max_handles(&self) -> usize {
        self.max_handles
    }
}

fn read_config_file(path: &Utf8Path) -> std::io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "config path has no file name")
    })?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read_to_string(file_name)
}

/// Looks `key` up in the settings section, falling back to keys written
/// before any section header.
fn settings_value<'a>(ini: &'a Ini, key: &str) -> Option<&'a str> {
    ini.iter()
        .filter(|(section, _)| {
            section.is_none_or(|name| name.eq_ignore_ascii_case(SETTINGS_SECTION))
        })
        .flat_map(|(_, properties)| properties.iter())
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(key))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_max_handles(value: &str) -> ConfigResult<usize> {
    match value.parse::<usize>() {
        Ok(0) => Err(ConfigError::invalid("max_handles", value, "must be positive")),
        Ok(capacity) => Ok(capacity),
        Err(err) => Err(ConfigError::invalid("max_handles", value, err)),
    }
}

fn validate_server_dir(path: &Utf8Path) -> ConfigResult<Utf8PathBuf> {
    let unavailable = |err: std::io::Error| ConfigError::ServerDirUnavailable {
        path: path.to_owned(),
        source: Arc::new(err),
    };
    let canonical = path.canonicalize_utf8().map_err(unavailable)?;
    if !canonical.is_dir() {
        return Err(unavailable(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    Ok(canonical)
}
