//! Typed Field Values
//!
//! [`TypedValue`] is the tagged union stored in a [`DynamicMessage`](super::DynamicMessage).
//! Values are produced either by coercing one command-line token
//! ([`TypedValue::coerce`]) or by decoding a JSON response field
//! ([`TypedValue::from_json`]).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use std::fmt;

use super::descriptor::{FieldDescriptor, FieldKind};
use crate::protocol::error::{AdminError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Bytes(Vec<u8>),
    Uint64(u64),
    Int64(i64),
    Bool(bool),
    Enum(i32),
    /// Nested, repeated or map value, kept as decoded JSON
    Composite(Value),
}

impl TypedValue {
    /// Coerces a raw command-line token into a value of the field's kind.
    ///
    /// Text and bytes never fail. Uint64 accepts only base-10 digits that fit
    /// in 64 bits; signs, whitespace and empty tokens are rejected. Any other
    /// kind is an [`AdminError::UnsupportedKind`].
    pub fn coerce(field: &FieldDescriptor, token: &str) -> Result<Self> {
        match field.kind {
            FieldKind::Text => Ok(TypedValue::Text(token.to_string())),
            FieldKind::Bytes => Ok(TypedValue::Bytes(token.as_bytes().to_vec())),
            FieldKind::Uint64 => parse_uint64(token)
                .map(TypedValue::Uint64)
                .map_err(|reason| AdminError::Coercion {
                    field: field.name.to_string(),
                    token: token.to_string(),
                    reason: reason.to_string(),
                }),
            other => Err(AdminError::UnsupportedKind {
                field: field.name.to_string(),
                kind: other.to_string(),
            }),
        }
    }

    /// Zero value of a kind, used for fields absent from a response.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => TypedValue::Text(String::new()),
            FieldKind::Bytes => TypedValue::Bytes(Vec::new()),
            FieldKind::Uint64 => TypedValue::Uint64(0),
            FieldKind::Int64 => TypedValue::Int64(0),
            FieldKind::Bool => TypedValue::Bool(false),
            FieldKind::Enum => TypedValue::Enum(0),
            FieldKind::Message => TypedValue::Composite(Value::Null),
            FieldKind::Map => TypedValue::Composite(Value::Object(Default::default())),
        }
    }

    /// Whether this value can be stored in a field of `kind`.
    pub fn matches_kind(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (TypedValue::Text(_), FieldKind::Text)
                | (TypedValue::Bytes(_), FieldKind::Bytes)
                | (TypedValue::Uint64(_), FieldKind::Uint64)
                | (TypedValue::Int64(_), FieldKind::Int64)
                | (TypedValue::Bool(_), FieldKind::Bool)
                | (TypedValue::Enum(_), FieldKind::Enum)
                | (TypedValue::Composite(_), FieldKind::Message)
                | (TypedValue::Composite(_), FieldKind::Map)
        )
    }

    /// JSON wire form. Bytes are standard base64.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::Text(s) => Value::String(s.clone()),
            TypedValue::Bytes(b) => Value::String(BASE64.encode(b)),
            TypedValue::Uint64(n) => Value::from(*n),
            TypedValue::Int64(n) => Value::from(*n),
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Enum(n) => Value::from(*n),
            TypedValue::Composite(v) => v.clone(),
        }
    }

    /// Decodes one JSON field of a response according to the field's kind.
    ///
    /// 64-bit integers are accepted both as JSON numbers and as decimal
    /// strings.
    pub fn from_json(field: &FieldDescriptor, value: &Value) -> Result<Self> {
        let mismatch = || {
            AdminError::InvalidResponse(format!(
                "field {} expects {}, got {}",
                field.name, field.kind, value
            ))
        };

        match field.kind {
            FieldKind::Text => value
                .as_str()
                .map(|s| TypedValue::Text(s.to_string()))
                .ok_or_else(mismatch),
            FieldKind::Bytes => {
                let encoded = value.as_str().ok_or_else(mismatch)?;
                BASE64
                    .decode(encoded)
                    .map(TypedValue::Bytes)
                    .map_err(|e| {
                        AdminError::InvalidResponse(format!("field {}: {}", field.name, e))
                    })
            }
            FieldKind::Uint64 => match value {
                Value::Number(n) => n.as_u64().map(TypedValue::Uint64).ok_or_else(mismatch),
                Value::String(s) => parse_uint64(s).map(TypedValue::Uint64).map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            FieldKind::Int64 => match value {
                Value::Number(n) => n.as_i64().map(TypedValue::Int64).ok_or_else(mismatch),
                Value::String(s) => s.parse::<i64>().map(TypedValue::Int64).map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            FieldKind::Bool => value.as_bool().map(TypedValue::Bool).ok_or_else(mismatch),
            FieldKind::Enum => value
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(TypedValue::Enum)
                .ok_or_else(mismatch),
            FieldKind::Message | FieldKind::Map => Ok(TypedValue::Composite(value.clone())),
        }
    }
}

/// Strict base-10 parse matching the usual `ParseUint(s, 10, 64)` contract.
fn parse_uint64(token: &str) -> std::result::Result<u64, &'static str> {
    if token.is_empty() {
        return Err("empty value");
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid digit found in string");
    }
    token
        .parse::<u64>()
        .map_err(|_| "number too large to fit in 64 bits")
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Text(s) => write!(f, "{:?}", s),
            TypedValue::Bytes(b) => write!(f, "{:?}", String::from_utf8_lossy(b)),
            TypedValue::Uint64(n) => write!(f, "{}", n),
            TypedValue::Int64(n) => write!(f, "{}", n),
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::Enum(n) => write!(f, "{}", n),
            TypedValue::Composite(v) => write!(f, "{}", v),
        }
    }
}
