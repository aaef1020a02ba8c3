use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde_json::Value;
use tracing::debug;

use raftadmin_common::protocol::error::{AdminError, Result};
use raftadmin_common::protocol::JsonRpcRequest;
use raftadmin_common::transport::HttpTransport;

pub(crate) type HttpClient = Client<HttpConnector, Full<Bytes>>;

pub(crate) fn new_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build_http()
}

/// Sends one JSON-RPC call to `address` and returns its result.
///
/// Without a `timeout` the call waits as long as the server takes.
pub(crate) async fn post_jsonrpc(
    client: &HttpClient,
    address: &str,
    method_path: &str,
    params: Value,
    timeout: Option<Duration>,
) -> Result<Value> {
    let request = JsonRpcRequest::new(method_path, params);
    let http_request = HttpTransport::build_http_request(address, &request)?;
    debug!("POST {} to {} (id {})", method_path, address, request.id);

    let response_future = client.request(http_request);
    let response = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, response_future)
            .await
            .map_err(|_| AdminError::Timeout(timeout.as_millis() as u64))?,
        None => response_future.await,
    }
    .map_err(|e| AdminError::Transport(format!("HTTP request to {} failed: {}", address, e)))?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| AdminError::Transport(format!("Failed to read response: {}", e)))?
        .to_bytes();

    HttpTransport::parse_response(status, &body)?.into_result()
}
