//! Server registry and launch supervisor.
//!
//! Discovers launchable servers under a root directory, resolves their
//! metadata, and starts them as detached processes after checking that no
//! live process is already running their launch script. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
