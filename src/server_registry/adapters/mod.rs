//! Adapter implementations for the server registry ports.

pub mod filesystem;
pub mod memory;
pub mod process;
