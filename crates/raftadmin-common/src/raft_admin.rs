//! RaftAdmin Service Definition
//!
//! Static description of the RaftAdmin service: every message shape, every
//! method, and the typed forms of the three messages the asynchronous
//! operation protocol needs to read (`Future`, `AwaitResponse`,
//! `ForgetResponse`).
//!
//! Methods that start a cluster operation return a [`Future`] holding an
//! opaque operation token. The caller then calls `Await` with that token to
//! obtain the outcome and `Forget` to release the server-side state.
//!
//! # Example
//!
//! ```
//! use raftadmin_common::raft_admin;
//!
//! let registry = raft_admin::registry().unwrap();
//! let method = registry.resolve("add_voter").unwrap();
//! assert_eq!(method.path, "/RaftAdmin/AddVoter");
//! assert_eq!(method.field_names(), vec!["id", "address", "previous_index"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::protocol::error::Result;
use crate::schema::descriptor::FieldKind::{Bytes, Enum, Int64, Map, Message as Nested, Text, Uint64};
use crate::schema::{
    FieldDescriptor as F, Message, MessageShape, MethodDescriptor, MethodRegistry, SchemaCatalog,
    ServiceDescriptor,
};

pub const SERVICE_NAME: &str = "RaftAdmin";

/// Method that blocks until an operation finishes.
pub const AWAIT: &str = "Await";
/// Method that releases an operation's server-side state.
pub const FORGET: &str = "Forget";

pub static FUTURE: MessageShape = MessageShape::new("Future", &[F::new(1, "operation_token", Text)]);
pub static AWAIT_RESPONSE: MessageShape = MessageShape::new(
    "AwaitResponse",
    &[F::new(1, "error", Text), F::new(2, "index", Uint64)],
);
pub static FORGET_RESPONSE: MessageShape = MessageShape::new("ForgetResponse", &[]);

const MEMBERSHIP_CHANGE: &[F] = &[
    F::new(1, "id", Text),
    F::new(2, "address", Text),
    F::new(3, "previous_index", Uint64),
];
const MEMBER_REMOVAL: &[F] = &[F::new(1, "id", Text), F::new(2, "previous_index", Uint64)];
const INDEX: &[F] = &[F::new(1, "index", Uint64)];

pub static ADD_VOTER_REQUEST: MessageShape = MessageShape::new("AddVoterRequest", MEMBERSHIP_CHANGE);
pub static ADD_NONVOTER_REQUEST: MessageShape =
    MessageShape::new("AddNonvoterRequest", MEMBERSHIP_CHANGE);
pub static APPLY_LOG_REQUEST: MessageShape = MessageShape::new(
    "ApplyLogRequest",
    &[F::new(1, "data", Bytes), F::new(2, "extensions", Bytes)],
);
pub static APPLIED_INDEX_REQUEST: MessageShape = MessageShape::new("AppliedIndexRequest", &[]);
pub static APPLIED_INDEX_RESPONSE: MessageShape = MessageShape::new("AppliedIndexResponse", INDEX);
pub static BARRIER_REQUEST: MessageShape = MessageShape::new("BarrierRequest", &[]);
pub static DEMOTE_VOTER_REQUEST: MessageShape =
    MessageShape::new("DemoteVoterRequest", MEMBER_REMOVAL);
pub static GET_CONFIGURATION_REQUEST: MessageShape =
    MessageShape::new("GetConfigurationRequest", &[]);
pub static GET_CONFIGURATION_RESPONSE: MessageShape = MessageShape::new(
    "GetConfigurationResponse",
    &[F::new(1, "servers", Nested)],
);
pub static LAST_CONTACT_REQUEST: MessageShape = MessageShape::new("LastContactRequest", &[]);
pub static LAST_CONTACT_RESPONSE: MessageShape =
    MessageShape::new("LastContactResponse", &[F::new(1, "unix_nano", Int64)]);
pub static LAST_INDEX_REQUEST: MessageShape = MessageShape::new("LastIndexRequest", &[]);
pub static LAST_INDEX_RESPONSE: MessageShape = MessageShape::new("LastIndexResponse", INDEX);
pub static LEADER_REQUEST: MessageShape = MessageShape::new("LeaderRequest", &[]);
pub static LEADER_RESPONSE: MessageShape =
    MessageShape::new("LeaderResponse", &[F::new(1, "address", Text)]);
pub static LEADERSHIP_TRANSFER_REQUEST: MessageShape =
    MessageShape::new("LeadershipTransferRequest", &[]);
pub static LEADERSHIP_TRANSFER_TO_SERVER_REQUEST: MessageShape = MessageShape::new(
    "LeadershipTransferToServerRequest",
    &[F::new(1, "id", Text), F::new(2, "address", Text)],
);
pub static REMOVE_SERVER_REQUEST: MessageShape =
    MessageShape::new("RemoveServerRequest", MEMBER_REMOVAL);
pub static SHUTDOWN_REQUEST: MessageShape = MessageShape::new("ShutdownRequest", &[]);
pub static SNAPSHOT_REQUEST: MessageShape = MessageShape::new("SnapshotRequest", &[]);
pub static STATE_REQUEST: MessageShape = MessageShape::new("StateRequest", &[]);
pub static STATE_RESPONSE: MessageShape =
    MessageShape::new("StateResponse", &[F::new(1, "state", Enum)]);
pub static STATS_REQUEST: MessageShape = MessageShape::new("StatsRequest", &[]);
pub static STATS_RESPONSE: MessageShape =
    MessageShape::new("StatsResponse", &[F::new(1, "stats", Map)]);
pub static VERIFY_LEADER_REQUEST: MessageShape = MessageShape::new("VerifyLeaderRequest", &[]);

/// Every shape the binary can instantiate. A method whose shapes are missing
/// here fails registry construction.
pub static CATALOG: &[&MessageShape] = &[
    &FUTURE,
    &AWAIT_RESPONSE,
    &FORGET_RESPONSE,
    &ADD_VOTER_REQUEST,
    &ADD_NONVOTER_REQUEST,
    &APPLY_LOG_REQUEST,
    &APPLIED_INDEX_REQUEST,
    &APPLIED_INDEX_RESPONSE,
    &BARRIER_REQUEST,
    &DEMOTE_VOTER_REQUEST,
    &GET_CONFIGURATION_REQUEST,
    &GET_CONFIGURATION_RESPONSE,
    &LAST_CONTACT_REQUEST,
    &LAST_CONTACT_RESPONSE,
    &LAST_INDEX_REQUEST,
    &LAST_INDEX_RESPONSE,
    &LEADER_REQUEST,
    &LEADER_RESPONSE,
    &LEADERSHIP_TRANSFER_REQUEST,
    &LEADERSHIP_TRANSFER_TO_SERVER_REQUEST,
    &REMOVE_SERVER_REQUEST,
    &SHUTDOWN_REQUEST,
    &SNAPSHOT_REQUEST,
    &STATE_REQUEST,
    &STATE_RESPONSE,
    &STATS_REQUEST,
    &STATS_RESPONSE,
    &VERIFY_LEADER_REQUEST,
];

const fn method(
    name: &'static str,
    input: &'static MessageShape,
    output: &'static MessageShape,
) -> MethodDescriptor {
    MethodDescriptor {
        name,
        input,
        output,
    }
}

pub static SERVICE: ServiceDescriptor = ServiceDescriptor {
    name: SERVICE_NAME,
    methods: &[
        method("AddNonvoter", &ADD_NONVOTER_REQUEST, &FUTURE),
        method("AddVoter", &ADD_VOTER_REQUEST, &FUTURE),
        method("AppliedIndex", &APPLIED_INDEX_REQUEST, &APPLIED_INDEX_RESPONSE),
        method("ApplyLog", &APPLY_LOG_REQUEST, &FUTURE),
        method(AWAIT, &FUTURE, &AWAIT_RESPONSE),
        method("Barrier", &BARRIER_REQUEST, &FUTURE),
        method("DemoteVoter", &DEMOTE_VOTER_REQUEST, &FUTURE),
        method(FORGET, &FUTURE, &FORGET_RESPONSE),
        method("GetConfiguration", &GET_CONFIGURATION_REQUEST, &GET_CONFIGURATION_RESPONSE),
        method("LastContact", &LAST_CONTACT_REQUEST, &LAST_CONTACT_RESPONSE),
        method("LastIndex", &LAST_INDEX_REQUEST, &LAST_INDEX_RESPONSE),
        method("Leader", &LEADER_REQUEST, &LEADER_RESPONSE),
        method("LeadershipTransfer", &LEADERSHIP_TRANSFER_REQUEST, &FUTURE),
        method(
            "LeadershipTransferToServer",
            &LEADERSHIP_TRANSFER_TO_SERVER_REQUEST,
            &FUTURE,
        ),
        method("RemoveServer", &REMOVE_SERVER_REQUEST, &FUTURE),
        method("Shutdown", &SHUTDOWN_REQUEST, &FUTURE),
        method("Snapshot", &SNAPSHOT_REQUEST, &FUTURE),
        method("State", &STATE_REQUEST, &STATE_RESPONSE),
        method("Stats", &STATS_REQUEST, &STATS_RESPONSE),
        method("VerifyLeader", &VERIFY_LEADER_REQUEST, &FUTURE),
    ],
};

/// Builds the method registry for the RaftAdmin service.
pub fn registry() -> Result<MethodRegistry> {
    MethodRegistry::build(&SERVICE, SchemaCatalog::new(CATALOG)?)
}

/// Whether a response of `shape` is a pending-operation handle that must be
/// followed by Await and Forget.
pub fn is_pending_operation(shape: &MessageShape) -> bool {
    *shape == FUTURE
}

/// Handle for a started cluster operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Future {
    #[serde(default)]
    pub operation_token: String,
}

impl Future {
    pub fn new(operation_token: impl Into<String>) -> Self {
        Self {
            operation_token: operation_token.into(),
        }
    }
}

impl Message for Future {
    fn describe() -> &'static MessageShape {
        &FUTURE
    }
}

/// Terminal outcome of an operation. A non-empty `error` is the operation's
/// logical failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub index: u64,
}

impl AwaitResponse {
    pub fn failure(&self) -> Option<&str> {
        if self.error.is_empty() {
            None
        } else {
            Some(&self.error)
        }
    }
}

impl Message for AwaitResponse {
    fn describe() -> &'static MessageShape {
        &AWAIT_RESPONSE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgetResponse {}

impl Message for ForgetResponse {
    fn describe() -> &'static MessageShape {
        &FORGET_RESPONSE
    }
}
