//! Domain model for server discovery and launching.
//!
//! The server registry domain models server names, the recognized launch
//! scripts, descriptive metadata, discovered descriptors and launch handles.
//! Filesystem and process-table concerns remain outside this boundary.

mod descriptor;
mod error;
mod handle;
mod metadata;
mod name;
mod script;

pub use descriptor::ServerDescriptor;
pub use error::ServerRegistryDomainError;
pub use handle::{LaunchHandle, LaunchId};
pub use metadata::ServerMetadata;
pub use name::ServerName;
pub use script::LaunchScriptKind;
