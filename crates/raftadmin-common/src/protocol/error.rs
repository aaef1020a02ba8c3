use thiserror::Error;

/// Coarse error classes reported by the admin pipeline.
///
/// Every [`AdminError`] maps onto exactly one class; callers use the class to
/// decide how to present a failure (usage text, internal defect, network
/// problem, failed cluster operation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Unknown command after both lookup spellings failed
    Resolution,
    /// Argument count does not match the request shape
    Arity,
    /// A token could not be converted to its field's kind
    Coercion,
    /// Inconsistent registry or catalog construction
    SchemaDefect,
    /// Dial or call failure
    Transport,
    /// Error embedded in an otherwise successful Await response
    Operation,
    /// Forget failed after the await outcome was already known
    Cleanup,
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{}", arity_usage(.command, .fields))]
    Arity {
        command: String,
        fields: Vec<String>,
        given: usize,
    },

    #[error("invalid value {token:?} for field {field}: {reason}")]
    Coercion {
        field: String,
        token: String,
        reason: String,
    },

    #[error("internal error: {0}")]
    SchemaDefect(String),

    #[error("internal error: kind {kind} is not yet supported (field {field})")]
    UnsupportedKind { field: String, kind: String },

    #[error("Invalid target: {0}")]
    Resolve(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote error {code}: {message}")]
    Remote { code: i32, message: String },

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("operation {token} failed: {message}")]
    OperationFailed { token: String, message: String },

    #[error("failed to release operation: {0}")]
    Cleanup(String),
}

impl AdminError {
    /// Returns the taxonomy class of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            AdminError::UnknownCommand(_) => ErrorClass::Resolution,
            AdminError::Arity { .. } => ErrorClass::Arity,
            AdminError::Coercion { .. } => ErrorClass::Coercion,
            AdminError::SchemaDefect(_) | AdminError::UnsupportedKind { .. } => {
                ErrorClass::SchemaDefect
            }
            AdminError::Resolve(_)
            | AdminError::Connection(_)
            | AdminError::Transport(_)
            | AdminError::Remote { .. }
            | AdminError::Timeout(_)
            | AdminError::InvalidResponse(_)
            | AdminError::JsonSerialization(_) => ErrorClass::Transport,
            AdminError::OperationFailed { .. } => ErrorClass::Operation,
            AdminError::Cleanup(_) => ErrorClass::Cleanup,
        }
    }

    /// True for failures caused by the caller's input rather than the
    /// binary or the network.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self.class(),
            ErrorClass::Resolution | ErrorClass::Arity | ErrorClass::Coercion
        )
    }
}

/// Renders the positional contract of a command, one `<name>` per field.
pub fn arity_usage(command: &str, fields: &[String]) -> String {
    let mut usage = format!("Usage: raftadmin <host:port> {}", command);
    for field in fields {
        usage.push_str(&format!(" <{}>", field));
    }
    usage
}

pub type Result<T> = std::result::Result<T, AdminError>;
