//! In-memory adapters for deterministic tests.

mod catalog;
mod process_table;

pub use catalog::InMemoryServerCatalog;
pub use process_table::InMemoryProcessTable;
