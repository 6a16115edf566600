//! Shared test helpers for in-memory server registry tests.

use camino::Utf8PathBuf;
use launchpad::server_registry::{
    adapters::memory::{InMemoryProcessTable, InMemoryServerCatalog},
    domain::{LaunchScriptKind, ServerDescriptor, ServerMetadata, ServerName},
    services::LaunchSupervisor,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Supervisor wired to in-memory adapters.
pub type TestSupervisor =
    LaunchSupervisor<InMemoryServerCatalog, InMemoryProcessTable, InMemoryProcessTable, DefaultClock>;

/// Catalog, process table and supervisor sharing the same state.
pub struct TestContext {
    pub catalog: Arc<InMemoryServerCatalog>,
    pub table: Arc<InMemoryProcessTable>,
    pub supervisor: TestSupervisor,
}

/// Builds a descriptor rooted at `/srv/servers/<name>`.
pub fn descriptor(
    name: &str,
    kind: LaunchScriptKind,
    version: Option<&str>,
    mods: Option<&str>,
) -> ServerDescriptor {
    ServerDescriptor::new(
        ServerName::new(name).expect("valid server name"),
        Utf8PathBuf::from(format!("/srv/servers/{name}")),
        kind,
        ServerMetadata::from_fields(version, mods),
    )
}

/// Provides `alpha` (start script, no metadata) and `beta` (run script,
/// version 1.2, no mods).
#[fixture]
pub fn context() -> TestContext {
    let catalog = Arc::new(InMemoryServerCatalog::new());
    catalog
        .insert(descriptor("alpha", LaunchScriptKind::Start, None, None))
        .expect("insert should succeed");
    catalog
        .insert(descriptor("beta", LaunchScriptKind::Run, Some("1.2"), Some("none")))
        .expect("insert should succeed");

    let table = Arc::new(InMemoryProcessTable::new());
    let supervisor = LaunchSupervisor::new(
        catalog.clone(),
        table.clone(),
        table.clone(),
        Arc::new(DefaultClock),
    );
    TestContext {
        catalog,
        table,
        supervisor,
    }
}
