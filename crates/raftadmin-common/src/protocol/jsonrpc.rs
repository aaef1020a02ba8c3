//! JSON-RPC 2.0 Envelope
//!
//! Every RaftAdmin call travels as a JSON-RPC 2.0 request whose `method` is the
//! full method path (`/RaftAdmin/AddVoter`) and whose `params` is the request
//! message rendered as a JSON object.
//!
//! # Error Codes
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32700`: Parse error
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32000` to `-32099`: Server error
//!
//! # Example
//!
//! ```
//! use raftadmin_common::protocol::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::new("/RaftAdmin/Leader", json!({}));
//! assert_eq!(request.jsonrpc, "2.0");
//!
//! let response = JsonRpcResponse::success(request.id.clone(), json!({"address": "10.0.0.1:50051"}));
//! assert_eq!(response.into_result().unwrap(), json!({"address": "10.0.0.1:50051"}));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::{AdminError, Result};

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// JSON-RPC 2.0 request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Full method path, e.g. `/RaftAdmin/AddVoter`
    pub method: String,
    /// Request message as a JSON object
    pub params: Value,
    /// Request identifier
    pub id: Value,
}

/// JSON-RPC 2.0 response
///
/// Exactly one of `result` and `error` is expected to be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Invalid JSON was received by the server
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid Request object
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist / is not available
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Generic application error raised by the RaftAdmin server
pub const SERVER_ERROR: i32 = -32000;

impl JsonRpcRequest {
    /// Builds a request with a fresh, process-unique numeric id.
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: Value::from(next_request_id()),
        }
    }
}

fn next_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self {
            code: PARSE_ERROR,
            message: "Parse error".into(),
            data: None,
        }
    }

    pub fn invalid_request() -> Self {
        Self {
            code: INVALID_REQUEST,
            message: "Invalid Request".into(),
            data: None,
        }
    }

    pub fn method_not_found() -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: "Method not found".into(),
            data: None,
        }
    }

    /// Application-level failure such as "node is not the leader".
    pub fn server_error(msg: &str) -> Self {
        Self {
            code: SERVER_ERROR,
            message: msg.into(),
            data: None,
        }
    }
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Converts the envelope into the call result.
    ///
    /// An `error` member becomes [`AdminError::Remote`]; a response carrying
    /// neither member is an [`AdminError::InvalidResponse`].
    pub fn into_result(self) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(AdminError::Remote {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| AdminError::InvalidResponse("Response missing result".to_string()))
    }
}
