//! HTTP Transport Utilities
//!
//! Conversions between JSON-RPC envelopes and hyper HTTP messages, shared by
//! the client channel and by servers speaking the RaftAdmin protocol.
//!
//! # Components
//!
//! - **[`HttpTransport`]**: Utility functions for HTTP/JSON-RPC conversion
//! - **[`HyperRequest`]**: Type alias for Hyper incoming requests
//! - **[`HyperResponse`]**: Type alias for Hyper responses
//!
//! # Example
//!
//! ```
//! use raftadmin_common::transport::http::HttpTransport;
//! use raftadmin_common::protocol::JsonRpcRequest;
//! use serde_json::json;
//!
//! let jsonrpc = JsonRpcRequest::new("/RaftAdmin/Leader", json!({}));
//! let request = HttpTransport::build_http_request("127.0.0.1:50051", &jsonrpc).unwrap();
//! assert_eq!(request.uri(), "http://127.0.0.1:50051/RaftAdmin/Leader");
//! ```

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};

use crate::protocol::error::{AdminError, Result};
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

/// Type alias for Hyper incoming requests
pub type HyperRequest = Request<Incoming>;

/// Type alias for Hyper responses with full body
pub type HyperResponse = Response<Full<Bytes>>;

const APPLICATION_JSON: &str = "application/json";

/// HTTP transport utility functions
pub struct HttpTransport;

impl HttpTransport {
    /// Builds the HTTP POST carrying `jsonrpc` to `address`.
    ///
    /// The request path is the JSON-RPC method path, so
    /// `/RaftAdmin/AddVoter` is posted to `http://<address>/RaftAdmin/AddVoter`.
    pub fn build_http_request(address: &str, jsonrpc: &JsonRpcRequest) -> Result<Request<Full<Bytes>>> {
        let body = serde_json::to_vec(jsonrpc)?;
        let uri = format!("http://{}{}", address, jsonrpc.method);

        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| AdminError::Transport(e.to_string()))?;
        Ok(request)
    }

    /// Parse a JSON-RPC request from an HTTP body
    pub fn parse_jsonrpc(body: Bytes) -> Result<JsonRpcRequest> {
        serde_json::from_slice(&body).map_err(AdminError::JsonSerialization)
    }

    /// Parse a JSON-RPC response from an HTTP body
    pub fn parse_response(status: StatusCode, body: &[u8]) -> Result<JsonRpcResponse> {
        match serde_json::from_slice::<JsonRpcResponse>(body) {
            Ok(response) => Ok(response),
            Err(_) if !status.is_success() => Err(AdminError::Transport(format!(
                "HTTP {}: {}",
                status,
                String::from_utf8_lossy(body)
            ))),
            Err(e) => Err(AdminError::InvalidResponse(format!(
                "malformed JSON-RPC response: {}",
                e
            ))),
        }
    }

    /// Create an HTTP response from a JSON-RPC response
    pub fn to_http_response(jsonrpc: JsonRpcResponse) -> HyperResponse {
        Self::to_http_response_with_status(jsonrpc, StatusCode::OK)
    }

    /// Create an HTTP error response from a JSON-RPC error
    pub fn to_http_error(id: serde_json::Value, error: JsonRpcError) -> HyperResponse {
        Self::to_http_response(JsonRpcResponse::error(id, error))
    }

    /// Create an HTTP response with a custom status code
    pub fn to_http_response_with_status(jsonrpc: JsonRpcResponse, status: StatusCode) -> HyperResponse {
        let body = serde_json::to_vec(&jsonrpc).unwrap_or_default();

        let mut response = Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        response
    }
}
