//! Operation Invoker
//!
//! Performs a call and, when the response is a pending-operation handle,
//! finishes the operation on the caller's behalf: `Await` for the outcome,
//! then `Forget` to free the server-side state.
//!
//! # Lifecycle
//!
//! ```text
//! Submitted → Awaiting → Completed ─┐
//!                      ↘ Failed ────┴→ Forgotten
//! ```
//!
//! Forget is attempted whenever Await was attempted, whatever Await
//! returned. Forgotten is terminal; a token is never awaited twice.

use std::fmt;

use serde_json::Value;
use tracing::warn;

use raftadmin_common::protocol::error::{AdminError, Result};
use raftadmin_common::raft_admin::{self, AwaitResponse, Future};
use raftadmin_common::schema::{DynamicMessage, Message, ResolvedMethod};

use crate::channel::RpcChannel;
use crate::client::RaftAdminClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Submitted,
    Awaiting,
    Completed,
    Failed,
    Forgotten,
}

impl OperationState {
    pub fn can_transition_to(self, next: OperationState) -> bool {
        use OperationState::*;
        matches!(
            (self, next),
            (Submitted, Awaiting)
                | (Awaiting, Completed)
                | (Awaiting, Failed)
                | (Completed, Forgotten)
                | (Failed, Forgotten)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == OperationState::Forgotten
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Terminal result of awaiting an operation.
#[derive(Debug)]
pub enum OperationOutcome {
    /// Await returned without an embedded error
    Completed(AwaitResponse),
    /// Await returned an embedded error
    Failed(AwaitResponse),
    /// Await itself failed; the operation's fate is unknown
    Unreachable(AdminError),
}

/// State machine for one operation token.
#[derive(Debug)]
pub struct Operation {
    token: String,
    state: OperationState,
    transitions: Vec<OperationState>,
}

impl Operation {
    pub fn submitted(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            state: OperationState::Submitted,
            transitions: vec![OperationState::Submitted],
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    pub fn transitions(&self) -> &[OperationState] {
        &self.transitions
    }

    pub fn advance(&mut self, next: OperationState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(AdminError::SchemaDefect(format!(
                "operation {} cannot move from {} to {}",
                self.token, self.state, next
            )));
        }
        self.state = next;
        self.transitions.push(next);
        Ok(())
    }
}

/// Everything that happened to one operation.
#[derive(Debug)]
pub struct OperationReport {
    pub token: String,
    pub state: OperationState,
    pub outcome: OperationOutcome,
    /// Forget failure, reported without overturning the outcome
    pub cleanup_error: Option<String>,
    pub transitions: Vec<OperationState>,
}

/// Result of a successful invocation.
#[derive(Debug)]
pub struct Invocation {
    /// Canonical name of the invoked method
    pub method: &'static str,
    /// Final response: the method's own response, or the Await response for
    /// a chained operation
    pub response: Value,
    pub operation: Option<OperationReport>,
}

/// Drives Await then Forget for `future`.
///
/// Failures of either call are recorded in the report rather than returned;
/// the only error is an illegal state transition.
pub async fn complete_operation<C: RpcChannel>(
    client: &RaftAdminClient<C>,
    future: &Future,
) -> Result<OperationReport> {
    let mut operation = Operation::submitted(future.operation_token.clone());
    operation.advance(OperationState::Awaiting)?;

    let outcome = match client.await_operation(future).await {
        Ok(response) if response.failure().is_none() => OperationOutcome::Completed(response),
        Ok(response) => OperationOutcome::Failed(response),
        Err(e) => OperationOutcome::Unreachable(e),
    };
    operation.advance(match outcome {
        OperationOutcome::Completed(_) => OperationState::Completed,
        _ => OperationState::Failed,
    })?;

    let cleanup_error = match client.forget(future).await {
        Ok(_) => None,
        Err(e) => {
            let e = AdminError::Cleanup(e.to_string());
            warn!("Operation {}: {}", operation.token(), e);
            Some(e.to_string())
        }
    };
    operation.advance(OperationState::Forgotten)?;

    Ok(OperationReport {
        token: operation.token,
        state: operation.state,
        outcome,
        cleanup_error,
        transitions: operation.transitions,
    })
}

/// Calls `method` and finishes any operation it starts.
///
/// A transport failure of the initial call is returned as-is and nothing
/// else is attempted. For a started operation, a failed Await is returned
/// as its transport error, an embedded Await error as
/// [`AdminError::OperationFailed`], and a failed Forget only lands in
/// [`OperationReport::cleanup_error`].
pub async fn invoke<C: RpcChannel>(
    client: &RaftAdminClient<C>,
    method: &ResolvedMethod,
    request: &DynamicMessage,
) -> Result<Invocation> {
    let response = client.call(method, request).await?;

    if !raft_admin::is_pending_operation(response.shape()) {
        return Ok(Invocation {
            method: method.name(),
            response: response.to_json_with_defaults(),
            operation: None,
        });
    }

    let future: Future = response.to_typed()?;
    let report = complete_operation(client, &future).await?;

    let response = match report.outcome {
        OperationOutcome::Completed(ref awaited) => client
            .registry()
            .catalog()
            .decode(AwaitResponse::describe(), &serde_json::to_value(awaited)?)?
            .to_json_with_defaults(),
        OperationOutcome::Failed(ref awaited) => {
            return Err(AdminError::OperationFailed {
                token: report.token.clone(),
                message: awaited.error.clone(),
            })
        }
        OperationOutcome::Unreachable(e) => return Err(e),
    };

    Ok(Invocation {
        method: method.name(),
        response,
        operation: Some(report),
    })
}
