//! Health check messages.
//!
//! A node answers `/grpc.health.v1.Health/Check` with the serving status of
//! a named service. In a RaftAdmin deployment only the current leader
//! reports `SERVING` for the leader service name, which is how leader mode
//! finds it.

use serde::{Deserialize, Serialize};

/// Method path of the health check.
pub const HEALTH_CHECK_PATH: &str = "/grpc.health.v1.Health/Check";

/// Service name reported healthy only by the current Raft leader.
pub const DEFAULT_LEADER_SERVICE: &str = "quis.RaftLeader";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckRequest {
    /// Service to check; empty means the server as a whole
    #[serde(default)]
    pub service: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingStatus {
    #[default]
    Unknown,
    Serving,
    NotServing,
    ServiceUnknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    #[serde(default)]
    pub status: ServingStatus,
}

impl HealthCheckResponse {
    pub fn new(status: ServingStatus) -> Self {
        Self { status }
    }

    pub fn is_serving(&self) -> bool {
        self.status == ServingStatus::Serving
    }
}
