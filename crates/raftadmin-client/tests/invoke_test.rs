//! End-to-end invocation tests against an in-process RaftAdmin node.
//!
//! All addresses use `127.0.0.1` with an explicit port.

mod support;

use std::sync::Arc;
use std::time::Duration;

use raftadmin_client::{
    invoke, Channel, ConnectOptions, HealthCheckConfig, Invocation, OperationState, RaftAdminClient,
    RpcChannel,
};
use raftadmin_common::protocol::error::{AdminError, Result};
use raftadmin_common::{bind, raft_admin};
use serde_json::json;
use support::{FakeRaftAdmin, LEADER_SERVICE};

fn fast_options() -> ConnectOptions {
    ConnectOptions::default()
        .with_connect_timeout(Duration::from_secs(2))
        .with_health_check(HealthCheckConfig {
            interval: Duration::from_millis(20),
            timeout: Duration::from_millis(500),
        })
}

async fn run(target: &str, options: ConnectOptions, command: &str, args: &[&str]) -> Result<Invocation> {
    let registry = Arc::new(raft_admin::registry()?);
    let method = registry.resolve(command)?;
    let request = bind(registry.catalog(), method, command, args)?;
    let channel = Channel::connect(target, options).await?;
    let client = RaftAdminClient::new(channel, Arc::clone(&registry));
    invoke(&client, method, &request).await
}

// ============================================================================
// Operation protocol
// ============================================================================

#[tokio::test]
async fn test_add_voter_sends_bound_request() {
    let node = FakeRaftAdmin::start().await;
    node.operation("AddVoter", "op-1", json!({"index": 7}));

    let invocation = run(
        node.addr(),
        fast_options(),
        "add_voter",
        &["serverB", "127.0.0.1:50052", "0"],
    )
    .await
    .unwrap();

    assert_eq!(
        node.calls()[0],
        (
            "/RaftAdmin/AddVoter".to_string(),
            json!({"id": "serverB", "address": "127.0.0.1:50052", "previous_index": 0})
        )
    );
    assert_eq!(invocation.response["index"], 7);
}

#[tokio::test]
async fn test_completed_operation_awaits_then_forgets() {
    let node = FakeRaftAdmin::start().await;
    node.operation("Barrier", "op-2", json!({"index": 7}));

    let invocation = run(node.addr(), fast_options(), "barrier", &[]).await.unwrap();

    assert_eq!(node.called_methods(), vec!["Barrier", "Await", "Forget"]);
    let calls = node.calls();
    assert_eq!(calls[1].1, json!({"operation_token": "op-2"}));
    assert_eq!(calls[2].1, json!({"operation_token": "op-2"}));

    let report = invocation.operation.unwrap();
    assert_eq!(
        report.transitions,
        vec![
            OperationState::Submitted,
            OperationState::Awaiting,
            OperationState::Completed,
            OperationState::Forgotten
        ]
    );
}

#[tokio::test]
async fn test_failed_operation_reports_logical_error() {
    let node = FakeRaftAdmin::start().await;
    node.operation(
        "LeadershipTransfer",
        "op-3",
        json!({"error": "cannot find peer"}),
    );

    let err = run(node.addr(), fast_options(), "leadership_transfer", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::OperationFailed { ref message, .. } if message == "cannot find peer"));
    assert!(!err.is_usage_error());
    assert_eq!(node.called_methods(), vec!["LeadershipTransfer", "Await", "Forget"]);
}

#[tokio::test]
async fn test_remote_error_aborts_before_await() {
    let node = FakeRaftAdmin::start().await;
    node.reply_error("RemoveServer", "node is not the leader");

    let err = run(node.addr(), fast_options(), "remove_server", &["serverC", "0"])
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Remote { ref message, .. } if message == "node is not the leader"));
    assert_eq!(node.called_methods(), vec!["RemoveServer"]);
}

#[tokio::test]
async fn test_forget_failure_keeps_result() {
    let node = FakeRaftAdmin::start().await;
    node.reply("Snapshot", json!({"operation_token": "op-4"}))
        .reply("Await", json!({"index": 12}))
        .reply_error("Forget", "no such operation");

    let invocation = run(node.addr(), fast_options(), "snapshot", &[]).await.unwrap();

    assert_eq!(invocation.response["index"], 12);
    let report = invocation.operation.unwrap();
    assert!(report.cleanup_error.unwrap().contains("no such operation"));
}

#[tokio::test]
async fn test_plain_response_decoded() {
    let node = FakeRaftAdmin::start().await;
    node.reply("Stats", json!({"stats": {"state": "Leader", "term": "4"}}));

    let invocation = run(node.addr(), fast_options(), "Stats", &[]).await.unwrap();

    assert!(invocation.operation.is_none());
    assert_eq!(invocation.response["stats"]["term"], "4");
    assert_eq!(node.called_methods(), vec!["Stats"]);
}

// ============================================================================
// Connection establishment
// ============================================================================

#[tokio::test]
async fn test_usage_errors_never_dial() {
    let node = FakeRaftAdmin::start().await;

    let err = run(node.addr(), fast_options(), "add_voter", &["serverB"])
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Arity { given: 1, .. }));

    let err = run(node.addr(), fast_options(), "frobnicate", &[]).await.unwrap_err();
    assert!(matches!(err, AdminError::UnknownCommand(_)));

    assert!(node.calls().is_empty());
    assert!(node.health_checks().is_empty());
}

#[tokio::test]
async fn test_leader_mode_calls_only_the_leader() {
    let follower_a = FakeRaftAdmin::start().await;
    let leader = FakeRaftAdmin::start().await;
    let follower_b = FakeRaftAdmin::start().await;
    leader.set_leader(true);
    leader.reply("AppliedIndex", json!({"index": 5}));
    leader.reply("AppliedIndex", json!({"index": 6}));

    let target = format!(
        "multi:///{},{},{}",
        follower_a.addr(),
        leader.addr(),
        follower_b.addr()
    );
    let options = fast_options().with_leader(true);
    let channel = Channel::connect(&target, options).await.unwrap();
    assert_eq!(channel.addresses().await, vec![leader.addr().to_string()]);

    for _ in 0..2 {
        channel.call("/RaftAdmin/AppliedIndex", json!({})).await.unwrap();
    }

    assert_eq!(leader.called_methods(), vec!["AppliedIndex", "AppliedIndex"]);
    assert!(follower_a.calls().is_empty());
    assert!(follower_b.calls().is_empty());
    assert_eq!(follower_a.health_checks(), vec![LEADER_SERVICE]);
}

#[tokio::test]
async fn test_leader_mode_uses_custom_health_service() {
    let node = FakeRaftAdmin::start().await;
    node.set_leader(true);

    let options = fast_options()
        .with_leader(true)
        .with_health_check_service("other.Service")
        .with_connect_timeout(Duration::from_millis(200));
    let err = Channel::connect(node.addr(), options).await.err().unwrap();

    assert!(matches!(err, AdminError::Connection(_)));
    assert!(node.health_checks().iter().all(|s| s == "other.Service"));
    assert!(!node.health_checks().is_empty());
}

#[tokio::test]
async fn test_leader_mode_waits_for_a_leader() {
    let node = FakeRaftAdmin::start().await;
    let target = format!("multi:///{}", node.addr());

    let elect = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        node.set_leader(true);
    };
    let connect = Channel::connect(&target, fast_options().with_leader(true));
    let (channel, _) = tokio::join!(connect, elect);

    let channel = channel.unwrap();
    assert_eq!(channel.addresses().await, vec![node.addr().to_string()]);
    assert!(node.health_checks().len() >= 2);
}

#[tokio::test]
async fn test_leader_mode_round_robins_across_healthy_nodes() {
    let a = FakeRaftAdmin::start().await;
    let b = FakeRaftAdmin::start().await;
    a.set_leader(true);
    b.set_leader(true);
    for node in [&a, &b] {
        node.reply("LastIndex", json!({"index": 1}));
    }

    let target = format!("multi:///{},{}", a.addr(), b.addr());
    let channel = Channel::connect(&target, fast_options().with_leader(true))
        .await
        .unwrap();
    channel.call("/RaftAdmin/LastIndex", json!({})).await.unwrap();
    channel.call("/RaftAdmin/LastIndex", json!({})).await.unwrap();

    assert_eq!(a.called_methods(), vec!["LastIndex"]);
    assert_eq!(b.called_methods(), vec!["LastIndex"]);
}
