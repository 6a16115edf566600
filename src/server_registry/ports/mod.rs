//! Port contracts for server discovery and launching.

mod catalog;
mod launcher;
mod probe;

pub use catalog::{ServerCatalog, ServerCatalogError, ServerCatalogResult};
pub use launcher::{LaunchedProcess, ProcessLauncher, ProcessLauncherError, ProcessLauncherResult};
#[cfg(test)]
pub use probe::MockProcessProbe;
pub use probe::{ProcessProbe, ProcessProbeError, ProcessProbeResult, RunningProcess};
