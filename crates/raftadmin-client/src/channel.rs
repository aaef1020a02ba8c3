//! Connection establishment.
//!
//! A [`Channel`] is a ready-to-call connection to a RaftAdmin target. In the
//! default mode it sticks to the first candidate address that accepts a
//! connection. In leader mode it health-checks every candidate under a
//! leader-specific service name and round-robins calls across the ones that
//! report serving, which in a healthy cluster is exactly the current leader.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use raftadmin_common::health::DEFAULT_LEADER_SERVICE;
use raftadmin_common::protocol::error::{AdminError, Result};

use crate::health_checker::{HealthCheckConfig, HealthChecker};
use crate::http::{new_client, post_jsonrpc, HttpClient};
use crate::load_balancer::LoadBalancer;
use crate::resolver;

/// The call primitive the operation invoker runs on.
#[async_trait]
pub trait RpcChannel: Send + Sync {
    /// Calls `method_path` (`/<Service>/<Method>`) with a JSON request
    /// message and returns the JSON response message.
    async fn call(&self, method_path: &str, params: Value) -> Result<Value>;
}

/// Options for [`Channel::connect`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Health-check and round-robin toward the leader
    pub leader: bool,
    /// Service name probed in leader mode
    pub health_check_service: String,
    /// Give up if no address is ready within this time; `None` waits forever
    pub connect_timeout: Option<Duration>,
    pub health_check: HealthCheckConfig,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            leader: false,
            health_check_service: DEFAULT_LEADER_SERVICE.to_string(),
            connect_timeout: None,
            health_check: HealthCheckConfig::default(),
        }
    }
}

impl ConnectOptions {
    pub fn with_leader(mut self, leader: bool) -> Self {
        self.leader = leader;
        self
    }

    pub fn with_health_check_service(mut self, service: impl Into<String>) -> Self {
        self.health_check_service = service.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_health_check(mut self, config: HealthCheckConfig) -> Self {
        self.health_check = config;
        self
    }
}

/// HTTP channel to one or more RaftAdmin nodes.
///
/// Dropping the channel releases its HTTP client and pooled connections.
pub struct Channel {
    target: String,
    client: HttpClient,
    balancer: Mutex<LoadBalancer>,
}

impl Channel {
    /// Resolves `target` and blocks until at least one address is ready.
    pub async fn connect(target: &str, options: ConnectOptions) -> Result<Self> {
        let addresses = resolver::resolve(target)?;
        let client = new_client();
        let checker = HealthChecker::new(client.clone(), options.health_check.clone());
        let deadline = options.connect_timeout.map(|timeout| Instant::now() + timeout);

        debug!(
            "Connecting to {} ({} candidate addresses, leader mode: {})",
            target,
            addresses.len(),
            options.leader
        );

        let ready = loop {
            let ready = if options.leader {
                checker
                    .healthy(&addresses, &options.health_check_service)
                    .await
            } else {
                checker.first_reachable(&addresses).await.into_iter().collect()
            };
            if !ready.is_empty() {
                break ready;
            }

            let mut pause = options.health_check.interval;
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    return Err(AdminError::Connection(format!(
                        "no ready address for {} after {}ms",
                        target,
                        options.connect_timeout.unwrap_or_default().as_millis()
                    )));
                }
                pause = pause.min(deadline - now);
            }

            if options.leader {
                warn!(
                    "No address of {} reports serving {:?}, retrying in {}ms",
                    target,
                    options.health_check_service,
                    pause.as_millis()
                );
            } else {
                warn!(
                    "No address of {} is reachable, retrying in {}ms",
                    target,
                    pause.as_millis()
                );
            }
            tokio::time::sleep(pause).await;
        };

        info!("Connected to {} via {}", target, ready.join(", "));

        Ok(Self {
            target: target.to_string(),
            client,
            balancer: Mutex::new(LoadBalancer::new(ready)),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Addresses calls are currently balanced across.
    pub async fn addresses(&self) -> Vec<String> {
        self.balancer.lock().await.addresses()
    }
}

#[async_trait]
impl RpcChannel for Channel {
    async fn call(&self, method_path: &str, params: Value) -> Result<Value> {
        let address = self.balancer.lock().await.next_address().ok_or_else(|| {
            AdminError::Connection(format!("no ready address for {}", self.target))
        })?;
        debug!("Picked {} for {}", address, method_path);
        post_jsonrpc(&self.client, &address, method_path, params, None).await
    }
}
