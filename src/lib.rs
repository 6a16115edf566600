//! Launchpad: discovers local game servers and starts them on request.
//!
//! A server is any subdirectory of a configured root that contains a
//! `start.bat` or `run.bat` launch script, optionally described by a
//! `metadata.ini` file. Servers are started as detached processes, at most
//! one instance per launch script as observed in the OS process table.
//!
//! # Architecture
//!
//! Launchpad follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the filesystem and process table
//! - **Adapters**: Concrete implementations of ports (directories, `sysinfo`,
//!   `tokio::process`, in-memory fakes)
//!
//! # Modules
//!
//! - [`server_registry`]: Discovery, liveness probing and launching
//! - [`config`]: INI configuration for the command-line front end

pub mod config;
pub mod server_registry;
