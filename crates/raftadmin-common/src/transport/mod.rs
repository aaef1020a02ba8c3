//! RaftAdmin Transport Layer
//!
//! RaftAdmin calls are JSON-RPC 2.0 requests POSTed over HTTP/1.1. The
//! request path and the JSON-RPC `method` are both the full method path
//! (`/<Service>/<Method>`). Connection management lives in the client crate;
//! this module only converts between envelopes and HTTP messages.

pub mod http;

pub use http::{HttpTransport, HyperRequest, HyperResponse};
