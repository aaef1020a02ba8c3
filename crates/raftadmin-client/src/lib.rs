//! RaftAdmin Client
//!
//! Connection establishment and the operation invoker for the RaftAdmin
//! service.
//!
//! - [`Channel`] dials a target (`host:port` or `multi:///a:1,b:2`), either
//!   sticking to the first reachable node or, in leader mode, balancing
//!   across the nodes that report the leader health service as serving.
//! - [`RaftAdminClient`] sends registry-described calls over any
//!   [`RpcChannel`].
//! - [`invoke`] performs a call and transparently finishes any cluster
//!   operation it starts (Await, then Forget).

pub mod channel;
pub mod client;
pub mod health_checker;
mod http;
pub mod load_balancer;
pub mod operation;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use channel::{Channel, ConnectOptions, RpcChannel};
pub use client::RaftAdminClient;
pub use health_checker::{HealthCheckConfig, HealthChecker};
pub use load_balancer::LoadBalancer;
pub use operation::{
    complete_operation, invoke, Invocation, Operation, OperationOutcome, OperationReport,
    OperationState,
};
