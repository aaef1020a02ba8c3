pub mod error;
pub mod jsonrpc;

pub use error::{AdminError, ErrorClass, Result};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
