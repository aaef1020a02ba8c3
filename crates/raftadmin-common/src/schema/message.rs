//! Dynamic Messages
//!
//! A [`DynamicMessage`] is a mutable record keyed by field position. It is
//! created blank from the [`SchemaCatalog`](super::SchemaCatalog), populated by
//! the binder (requests) or the decoder (responses), used once and dropped.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use super::descriptor::{FieldDescriptor, MessageShape};
use super::value::TypedValue;
use crate::protocol::error::{AdminError, Result};

/// Capability implemented by every statically typed message: it can describe
/// its own shape.
///
/// Typed messages travel through the same JSON mapping as dynamic ones, so a
/// [`DynamicMessage`] of the matching shape converts into the typed form with
/// [`DynamicMessage::to_typed`].
pub trait Message: Serialize + DeserializeOwned {
    fn describe() -> &'static MessageShape;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicMessage {
    shape: &'static MessageShape,
    values: BTreeMap<u32, TypedValue>,
}

impl DynamicMessage {
    pub(crate) fn new(shape: &'static MessageShape) -> Self {
        Self {
            shape,
            values: BTreeMap::new(),
        }
    }

    pub fn shape(&self) -> &'static MessageShape {
        self.shape
    }

    /// Whether this message is an instance of `shape`.
    pub fn is(&self, shape: &MessageShape) -> bool {
        self.shape == shape
    }

    /// Sets a field. The field must belong to this message's shape and the
    /// value must match its kind; anything else is a schema defect.
    pub fn set(&mut self, field: &FieldDescriptor, value: TypedValue) -> Result<()> {
        match self.shape.field_by_number(field.number) {
            Some(declared) if declared == field => {}
            _ => {
                return Err(AdminError::SchemaDefect(format!(
                    "field {} (position {}) does not belong to {}",
                    field.name, field.number, self.shape.full_name
                )))
            }
        }
        if !value.matches_kind(field.kind) {
            return Err(AdminError::SchemaDefect(format!(
                "value {} cannot be stored in {} field {}.{}",
                value, field.kind, self.shape.full_name, field.name
            )));
        }
        self.values.insert(field.number, value);
        Ok(())
    }

    /// Returns a field's value, or `None` if it was never set.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        let field = self.shape.field(name)?;
        self.values.get(&field.number)
    }

    /// Returns a field's value, falling back to the zero value of its kind.
    pub fn get_or_default(&self, name: &str) -> Option<TypedValue> {
        let field = self.shape.field(name)?;
        Some(
            self.values
                .get(&field.number)
                .cloned()
                .unwrap_or_else(|| TypedValue::default_for(field.kind)),
        )
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Renders the set fields as a JSON object keyed by field name.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (number, value) in &self.values {
            if let Some(field) = self.shape.field_by_number(*number) {
                object.insert(field.name.to_string(), value.to_json());
            }
        }
        Value::Object(object)
    }

    /// Renders every field of the shape, unset ones as the zero value of
    /// their kind. This is the form printed for a final response.
    pub fn to_json_with_defaults(&self) -> Value {
        let mut object = Map::new();
        for field in self.shape.fields {
            let value = match self.values.get(&field.number) {
                Some(value) => value.to_json(),
                None => TypedValue::default_for(field.kind).to_json(),
            };
            object.insert(field.name.to_string(), value);
        }
        Value::Object(object)
    }

    /// Populates fields from a JSON object. Unknown members are ignored and
    /// `null` members are treated as absent.
    pub(crate) fn merge_json(&mut self, value: &Value) -> Result<()> {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Ok(()),
            other => {
                return Err(AdminError::InvalidResponse(format!(
                    "expected {} object, got {}",
                    self.shape.full_name, other
                )))
            }
        };

        for field in self.shape.fields {
            match object.get(field.name) {
                None | Some(Value::Null) => {}
                Some(raw) => {
                    let typed = TypedValue::from_json(field, raw)?;
                    self.values.insert(field.number, typed);
                }
            }
        }
        Ok(())
    }

    /// Converts into the statically typed message of the same shape.
    pub fn to_typed<M: Message>(&self) -> Result<M> {
        if !self.is(M::describe()) {
            return Err(AdminError::SchemaDefect(format!(
                "cannot view {} as {}",
                self.shape.full_name,
                M::describe().full_name
            )));
        }
        Ok(serde_json::from_value(self.to_json())?)
    }
}

/// Compact text form: `Name{field: value field: value}`.
impl fmt::Display for DynamicMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.shape.name())?;
        let mut first = true;
        for (number, value) in &self.values {
            if let Some(field) = self.shape.field_by_number(*number) {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{}: {}", field.name, value)?;
                first = false;
            }
        }
        f.write_str("}")
    }
}
