// Copyright 2025 RaftAdmin Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # RaftAdmin CLI
//!
//! Command-line interface to the RaftAdmin service of a Raft cluster.
//!
//! ```text
//! raftadmin [--leader] [--health-check-service NAME] [--connect-timeout-ms N]
//!           <target> <command> [args...]
//! ```
//!
//! The command is any RaftAdmin method, typed either in snake case
//! (`add_voter`) or as its canonical name (`AddVoter`). Arguments are
//! positional and follow the field order of the method's request. Methods
//! that start a cluster operation are awaited and then forgotten
//! automatically; the final response is printed as JSON on stdout.
//!
//! ## Key Flags
//!
//! - `--leader`: dial whichever node currently reports itself as leader
//! - `--health-check-service`: health service name reported by the leader
//! - `--connect-timeout-ms`: stop waiting for a ready node after this long

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use argh::FromArgs;
use raftadmin_client::{invoke, Channel, ConnectOptions, Invocation, RaftAdminClient};
use raftadmin_common::health::DEFAULT_LEADER_SERVICE;
use raftadmin_common::schema::MethodRegistry;
use raftadmin_common::{bind, raft_admin, AdminError};

/// Environment variable consulted when `--health-check-service` is absent.
pub const HEALTH_CHECK_SERVICE_ENV: &str = "RAFTADMIN_HEALTH_CHECK_SERVICE";

#[derive(FromArgs, Debug)]
/// Invoke a RaftAdmin method on a Raft cluster
pub struct Cli {
    /// dial the current leader
    ///
    /// Health-checks every address of the target under the leader health
    /// service and sends calls only to the nodes reporting it as serving.
    #[argh(switch)]
    pub leader: bool,

    /// health service checked when searching for the leader
    ///
    /// Defaults to $RAFTADMIN_HEALTH_CHECK_SERVICE, then "quis.RaftLeader".
    #[argh(option, long = "health-check-service")]
    pub health_check_service: Option<String>,

    /// give up if no node is ready within this many milliseconds
    ///
    /// Waits indefinitely when not set.
    #[argh(option, long = "connect-timeout-ms")]
    pub connect_timeout_ms: Option<u64>,

    /// target (host:port or multi:///a:1,b:2), command, then the
    /// command's arguments
    #[argh(positional, greedy)]
    pub positionals: Vec<String>,
}

impl Cli {
    /// Connection options implied by the flags and the environment.
    pub fn connect_options(&self) -> ConnectOptions {
        let service = self
            .health_check_service
            .clone()
            .or_else(|| std::env::var(HEALTH_CHECK_SERVICE_ENV).ok())
            .unwrap_or_else(|| DEFAULT_LEADER_SERVICE.to_string());

        let mut options = ConnectOptions::default()
            .with_leader(self.leader)
            .with_health_check_service(service);
        if let Some(ms) = self.connect_timeout_ms {
            options = options.with_connect_timeout(Duration::from_millis(ms));
        }
        options
    }
}

/// Top-level usage, listing every command.
pub fn usage(registry: &MethodRegistry) -> String {
    format!(
        "Usage: raftadmin <host:port> <command> <args...>\nCommands: {}",
        registry.command_names().join(", ")
    )
}

/// Missing target or command; carries the top-level usage text.
#[derive(Debug)]
pub struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

/// Text printed to stderr for a failed run.
///
/// Mistakes in the command line are shown as-is so the usage line reads
/// cleanly; everything else is prefixed with `Error:`.
pub fn render_error(err: &anyhow::Error) -> String {
    let usage = err.downcast_ref::<UsageError>().is_some()
        || err
            .downcast_ref::<AdminError>()
            .is_some_and(AdminError::is_usage_error);
    if usage {
        err.to_string()
    } else {
        format!("Error: {:#}", err)
    }
}

/// Runs one invocation end to end.
///
/// Usage errors (unknown command, wrong argument count, malformed value)
/// are reported before any connection is attempted.
pub async fn run(cli: &Cli) -> Result<Invocation> {
    let registry = Arc::new(raft_admin::registry()?);

    let (target, command, args) = match cli.positionals.as_slice() {
        [target, command, args @ ..] => (target, command, args),
        _ => return Err(UsageError(usage(&registry)).into()),
    };

    let method = registry.resolve(command)?;
    let request = bind(registry.catalog(), method, command, args)?;

    let channel = Channel::connect(target, cli.connect_options()).await?;
    let client = RaftAdminClient::new(channel, Arc::clone(&registry));

    Ok(invoke(&client, method, &request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::from_args(&["raftadmin"], args).unwrap()
    }

    #[test]
    fn test_cli_parse_positionals() {
        let cli = parse(&["127.0.0.1:50051", "add_voter", "serverB", "127.0.0.1:50052", "0"]);
        assert!(!cli.leader);
        assert_eq!(cli.health_check_service, None);
        assert_eq!(cli.connect_timeout_ms, None);
        assert_eq!(
            cli.positionals,
            vec!["127.0.0.1:50051", "add_voter", "serverB", "127.0.0.1:50052", "0"]
        );
    }

    #[test]
    fn test_cli_parse_flags() {
        let cli = parse(&[
            "--leader",
            "--health-check-service",
            "custom.Leader",
            "--connect-timeout-ms",
            "1500",
            "multi:///10.0.0.1:50051,10.0.0.2:50051",
            "leader",
        ]);
        assert!(cli.leader);
        assert_eq!(cli.health_check_service.as_deref(), Some("custom.Leader"));
        assert_eq!(cli.connect_timeout_ms, Some(1500));

        let options = cli.connect_options();
        assert!(options.leader);
        assert_eq!(options.health_check_service, "custom.Leader");
        assert_eq!(options.connect_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_cli_parse_no_positionals() {
        assert!(parse(&[]).positionals.is_empty());
    }

    #[test]
    fn test_cli_rejects_non_numeric_timeout() {
        assert!(Cli::from_args(&["raftadmin"], &["--connect-timeout-ms", "soon", "t", "leader"]).is_err());
    }

    #[test]
    fn test_usage_lists_sorted_commands() {
        let registry = raft_admin::registry().unwrap();
        let usage = usage(&registry);
        assert!(usage.starts_with("Usage: raftadmin <host:port> <command> <args...>\nCommands: add_nonvoter, add_voter, applied_index, apply_log, await, barrier"));
        assert!(usage.ends_with("stats, verify_leader"));
    }

    #[tokio::test]
    async fn test_run_too_few_positionals() {
        let err = run(&parse(&["127.0.0.1:50051"])).await.unwrap_err();
        assert!(err.to_string().starts_with("Usage: raftadmin <host:port> <command> <args...>"));
        assert!(err.to_string().contains("Commands: add_nonvoter"));
    }

    #[tokio::test]
    async fn test_run_unknown_command() {
        let err = run(&parse(&["127.0.0.1:1", "frobnicate"])).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown command \"frobnicate\"");
        assert!(matches!(
            err.downcast_ref::<AdminError>(),
            Some(AdminError::UnknownCommand(_))
        ));
    }

    #[tokio::test]
    async fn test_run_arity_error() {
        let err = run(&parse(&["127.0.0.1:1", "add_voter", "serverB"])).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Usage: raftadmin <host:port> add_voter <id> <address> <previous_index>"
        );
    }

    #[tokio::test]
    async fn test_render_usage_errors_bare() {
        let err = run(&parse(&["127.0.0.1:1"])).await.unwrap_err();
        assert!(render_error(&err).starts_with("Usage: raftadmin <host:port> <command>"));

        let err = run(&parse(&["127.0.0.1:1", "frobnicate"])).await.unwrap_err();
        assert_eq!(render_error(&err), "unknown command \"frobnicate\"");

        let err = run(&parse(&["127.0.0.1:1", "leader", "extra"])).await.unwrap_err();
        assert_eq!(render_error(&err), "Usage: raftadmin <host:port> leader");

        let err = run(&parse(&["127.0.0.1:1", "remove_server", "serverC", "-1"])).await.unwrap_err();
        assert_eq!(render_error(&err), err.to_string());
        assert!(!render_error(&err).starts_with("Error:"));
    }

    #[test]
    fn test_render_other_errors_prefixed() {
        let err = anyhow::Error::from(AdminError::Transport("connection refused".into()));
        assert_eq!(render_error(&err), "Error: Transport error: connection refused");

        let err = anyhow::Error::from(AdminError::OperationFailed {
            token: "op-1".into(),
            message: "raft is shutting down".into(),
        });
        assert_eq!(render_error(&err), "Error: operation op-1 failed: raft is shutting down");
    }

    #[tokio::test]
    async fn test_run_coercion_error() {
        let err = run(&parse(&["127.0.0.1:1", "remove_server", "serverC", "-1"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdminError>(),
            Some(AdminError::Coercion { token, .. }) if token == "-1"
        ));
    }
}
