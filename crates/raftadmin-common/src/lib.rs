//! RaftAdmin Common Types and Transport
//!
//! This crate provides the schema machinery, protocol definitions and HTTP
//! transport helpers shared by the raftadmin client and command line.
//!
//! # Overview
//!
//! raftadmin drives the administrative interface of a Raft cluster. A
//! command typed by an operator (`add_voter serverB 10.0.0.2:50051 0`) is
//! resolved to a method of the RaftAdmin service, its arguments are bound
//! onto a typed request according to the method's schema, and the request
//! is sent as JSON-RPC over HTTP.
//!
//! # Components
//!
//! - [`schema`] - Descriptors, catalog, method registry and request binder
//! - [`raft_admin`] - The RaftAdmin service definition
//! - [`protocol`] - JSON-RPC envelope and the error taxonomy
//! - [`transport`] - HTTP/JSON-RPC conversions
//! - [`health`] - Health check messages used for leader discovery
//!
//! # Example
//!
//! ```
//! use raftadmin_common::{bind, raft_admin, TypedValue};
//!
//! let registry = raft_admin::registry().unwrap();
//! let method = registry.resolve("remove_server").unwrap();
//! let request = bind(registry.catalog(), method, "remove_server", &["serverC", "12"]).unwrap();
//! assert_eq!(request.get("previous_index"), Some(&TypedValue::Uint64(12)));
//! ```

pub mod health;
pub mod protocol;
pub mod raft_admin;
pub mod schema;
pub mod transport;

pub use protocol::*;
pub use schema::{
    bind, DynamicMessage, FieldDescriptor, FieldKind, Message, MessageShape, MethodDescriptor,
    MethodRegistry, ResolvedMethod, SchemaCatalog, ServiceDescriptor, TypedValue,
};
