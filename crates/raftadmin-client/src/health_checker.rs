use std::time::Duration;

use tokio::net::TcpStream;
use tracing::{debug, warn};

use raftadmin_common::health::{HealthCheckRequest, HealthCheckResponse, HEALTH_CHECK_PATH};
use raftadmin_common::protocol::error::{AdminError, Result};

use crate::http::{post_jsonrpc, HttpClient};

/// Health check configuration.
#[derive(Debug, Clone)]
pub struct HealthCheckConfig {
    /// Delay between readiness probes while no address is ready
    pub interval: Duration,
    /// Upper bound for a single probe
    pub timeout: Duration,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_millis(2000),
        }
    }
}

/// Probes candidate addresses for readiness.
pub struct HealthChecker {
    client: HttpClient,
    config: HealthCheckConfig,
}

impl HealthChecker {
    pub(crate) fn new(client: HttpClient, config: HealthCheckConfig) -> Self {
        Self { client, config }
    }

    /// Returns the addresses reporting `SERVING` for `service`, in the order
    /// given. All addresses are probed in parallel.
    pub async fn healthy(&self, addresses: &[String], service: &str) -> Vec<String> {
        let checks: Vec<_> = addresses
            .iter()
            .map(|address| async move {
                let result = self.check(address, service).await;
                (address, result)
            })
            .collect();

        let results = futures::future::join_all(checks).await;

        let mut healthy = Vec::new();
        for (address, result) in results {
            match result {
                Ok(()) => {
                    debug!("{} is serving {:?}", address, service);
                    healthy.push(address.clone());
                }
                Err(e) => debug!("{} is not serving {:?}: {}", address, service, e),
            }
        }
        healthy
    }

    /// Checks one address's serving status for `service`.
    pub async fn check(&self, address: &str, service: &str) -> Result<()> {
        let request = HealthCheckRequest {
            service: service.to_string(),
        };
        let result = post_jsonrpc(
            &self.client,
            address,
            HEALTH_CHECK_PATH,
            serde_json::to_value(&request)?,
            Some(self.config.timeout),
        )
        .await?;

        let response: HealthCheckResponse = serde_json::from_value(result)
            .map_err(|e| AdminError::InvalidResponse(format!("health check: {}", e)))?;
        if response.is_serving() {
            Ok(())
        } else {
            Err(AdminError::Connection(format!(
                "{} reports {:?} for {:?}",
                address, response.status, service
            )))
        }
    }

    /// Returns the first address, in the order given, that accepts a TCP
    /// connection.
    pub async fn first_reachable(&self, addresses: &[String]) -> Option<String> {
        for address in addresses {
            match tokio::time::timeout(self.config.timeout, TcpStream::connect(address.as_str())).await {
                Ok(Ok(_)) => return Some(address.clone()),
                Ok(Err(e)) => warn!("Failed to connect to {}: {}", address, e),
                Err(_) => warn!(
                    "Connecting to {} timed out after {}ms",
                    address,
                    self.config.timeout.as_millis()
                ),
            }
        }
        None
    }
}
