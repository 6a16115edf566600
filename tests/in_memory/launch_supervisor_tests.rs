//! Launch outcomes through the launch supervisor.

use super::helpers::{TestContext, context};
use launchpad::server_registry::{
    domain::{LaunchHandle, ServerName},
    services::LaunchError,
};
use rstest::rstest;
use std::time::Duration;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_records_one_handle(context: TestContext) {
    let handle = context
        .supervisor
        .start("alpha")
        .await
        .expect("start should succeed");

    assert_eq!(handle.label(), "server-alpha");
    assert_eq!(handle.launch_script().as_str(), "/srv/servers/alpha/start.bat");
    let handles = context.supervisor.handles().expect("handles should be readable");
    assert_eq!(handles, vec![handle.clone()]);
    assert_eq!(
        context
            .table
            .pids_for(handle.launch_script())
            .expect("lock should succeed"),
        vec![handle.pid()]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_script_is_launched_for_beta(context: TestContext) {
    let handle = context
        .supervisor
        .start("beta")
        .await
        .expect("start should succeed");

    assert_eq!(handle.launch_script().as_str(), "/srv/servers/beta/run.bat");
}

#[rstest]
#[case("")]
#[case("al pha")]
#[case("alpha/../beta")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_names_fail_with_invalid_argument(context: TestContext, #[case] name: &str) {
    let result = context.supervisor.start(name).await;

    assert!(matches!(result, Err(LaunchError::InvalidArgument(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn absent_name_fails_with_invalid_argument(context: TestContext) {
    let result = context.supervisor.start_optional(None).await;

    assert!(matches!(result, Err(LaunchError::InvalidArgument(None))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_name_fails_with_not_found(context: TestContext) {
    let result = context.supervisor.start("gamma").await;

    assert!(matches!(result, Err(LaunchError::ServiceNotFound(_))));
    assert_eq!(context.table.launch_count().expect("lock should succeed"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_server_is_not_found_on_next_start(context: TestContext) {
    context
        .catalog
        .remove(&ServerName::new("alpha").expect("valid server name"))
        .expect("remove should succeed");

    let result = context.supervisor.start("alpha").await;

    assert!(matches!(result, Err(LaunchError::ServiceNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_start_reports_running_pid(context: TestContext) {
    let first = context
        .supervisor
        .start("alpha")
        .await
        .expect("start should succeed");

    let second = context.supervisor.start("alpha").await;

    match second {
        Err(LaunchError::AlreadyRunning { name, pid }) => {
            assert_eq!(name.as_str(), "alpha");
            assert_eq!(pid, first.pid());
        }
        other => panic!("expected AlreadyRunning, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exited_server_can_be_started_again(context: TestContext) {
    let first = context
        .supervisor
        .start("alpha")
        .await
        .expect("start should succeed");
    context
        .table
        .mark_exited(first.pid())
        .expect("lock should succeed");

    let second = context
        .supervisor
        .start("alpha")
        .await
        .expect("restart should succeed");

    assert_ne!(first.pid(), second.pid());
    assert_ne!(first.id(), second.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_names_in_a_batch_launch_once(context: TestContext) {
    context
        .table
        .set_launch_delay(Duration::from_millis(25))
        .expect("lock should succeed");

    let outcomes = context.supervisor.start_batch(["alpha", "alpha"]).await;

    let started = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_ok())
        .count();
    let already_running = outcomes
        .iter()
        .filter(|outcome| matches!(outcome.result, Err(LaunchError::AlreadyRunning { .. })))
        .count();
    assert_eq!(started, 1);
    assert_eq!(already_running, 1);
    assert_eq!(context.table.launch_count().expect("lock should succeed"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn spawn_failure_does_not_affect_other_names(context: TestContext) {
    context
        .table
        .fail_launches_of("/srv/servers/alpha/start.bat", "exec format error")
        .expect("lock should succeed");

    let outcomes = context.supervisor.start_batch(["alpha", "beta"]).await;

    let results: Vec<(&str, bool)> = outcomes
        .iter()
        .map(|outcome| (outcome.requested.as_str(), outcome.result.is_ok()))
        .collect();
    assert_eq!(results, vec![("alpha", false), ("beta", true)]);
    assert!(matches!(
        outcomes.first().map(|outcome| &outcome.result),
        Some(Err(LaunchError::LaunchFailure { .. }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_batch_returns_no_outcomes(context: TestContext) {
    let outcomes = context
        .supervisor
        .start_batch(Vec::<String>::new())
        .await;

    assert!(outcomes.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn prune_drops_only_exited_handles(context: TestContext) {
    let alpha = context
        .supervisor
        .start("alpha")
        .await
        .expect("start should succeed");
    context
        .supervisor
        .start("beta")
        .await
        .expect("start should succeed");
    context
        .table
        .mark_exited(alpha.pid())
        .expect("lock should succeed");

    let evicted = context
        .supervisor
        .prune_exited()
        .await
        .expect("prune should succeed");

    assert_eq!(evicted, 1);
    let remaining: Vec<u32> = context
        .supervisor
        .handles()
        .expect("handles should be readable")
        .iter()
        .map(LaunchHandle::pid)
        .collect();
    assert_eq!(remaining.len(), 1);
    assert!(!remaining.contains(&alpha.pid()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn handle_capacity_bounds_the_registry(context: TestContext) {
    let supervisor = context.supervisor.clone().with_handle_capacity(1);

    supervisor.start("alpha").await.expect("start should succeed");
    supervisor.start("beta").await.expect("start should succeed");

    let handles = supervisor.handles().expect("handles should be readable");
    assert_eq!(handles.len(), 1);
    assert_eq!(
        handles.first().map(|handle| handle.server_name().as_str()),
        Some("beta")
    );
}
