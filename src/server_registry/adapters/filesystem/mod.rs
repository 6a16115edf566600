//! Filesystem adapters: the server root catalog and metadata resolution.

mod catalog;
mod metadata;

pub use catalog::FilesystemServerCatalog;
pub use metadata::{
    METADATA_FILE_NAME, METADATA_SECTION, MetadataReadOutcome, parse_literal_ini, read_metadata,
    resolve_metadata,
};
