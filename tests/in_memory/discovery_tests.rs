//! Listing servers through the discovery service.

use super::helpers::{TestContext, context, descriptor};
use launchpad::server_registry::{
    domain::{LaunchScriptKind, ServerName},
    services::{ListingOrder, ServerDiscoveryService},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_reports_metadata_with_defaults(context: TestContext) {
    let service = ServerDiscoveryService::new(context.catalog.clone());

    let servers = service.list_servers().await.expect("listing should succeed");

    let summary: Vec<(&str, &str, &str)> = servers
        .iter()
        .map(|server| (server.name().as_str(), server.version(), server.mods()))
        .collect();
    assert_eq!(
        summary,
        vec![("alpha", "Unknown", "Unknown"), ("beta", "1.2", "none")]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_reflects_catalog_changes(context: TestContext) {
    let service = ServerDiscoveryService::new(context.catalog.clone());
    context
        .catalog
        .insert(descriptor("creative", LaunchScriptKind::Start, None, Some("forge")))
        .expect("insert should succeed");
    context
        .catalog
        .remove(&ServerName::new("alpha").expect("valid server name"))
        .expect("remove should succeed");

    let servers = service.list_servers().await.expect("listing should succeed");

    let names: Vec<&str> = servers.iter().map(|server| server.name().as_str()).collect();
    assert_eq!(names, vec!["beta", "creative"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn name_order_sorts_listing(context: TestContext) {
    context
        .catalog
        .insert(descriptor("aardvark", LaunchScriptKind::Run, None, None))
        .expect("insert should succeed");
    let service =
        ServerDiscoveryService::new(context.catalog.clone()).with_order(ListingOrder::Name);

    let servers = service.list_servers().await.expect("listing should succeed");

    let names: Vec<&str> = servers.iter().map(|server| server.name().as_str()).collect();
    assert_eq!(names, vec!["aardvark", "alpha", "beta"]);
}
