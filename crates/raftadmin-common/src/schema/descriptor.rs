//! Static Schema Descriptors
//!
//! Shapes, fields and methods are plain `'static` data assembled once from the
//! service definition. They are never mutated and can be shared freely.

use std::fmt;

use crate::protocol::error::{AdminError, Result};

/// Declared kind of a message field.
///
/// Only [`Text`](FieldKind::Text), [`Bytes`](FieldKind::Bytes) and
/// [`Uint64`](FieldKind::Uint64) can be bound from command-line text; the
/// remaining kinds appear in response shapes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Bytes,
    Uint64,
    Int64,
    Bool,
    Enum,
    Message,
    Map,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Uint64 => "uint64",
            FieldKind::Int64 => "int64",
            FieldKind::Bool => "bool",
            FieldKind::Enum => "enum",
            FieldKind::Message => "message",
            FieldKind::Map => "map",
        }
    }

    /// Whether a value of this kind can be produced from a single text token.
    pub fn is_bindable(&self) -> bool {
        matches!(self, FieldKind::Text | FieldKind::Bytes | FieldKind::Uint64)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field of a message shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared position, 1-based
    pub number: u32,
    /// Text name used on the wire and in usage messages
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(number: u32, name: &'static str, kind: FieldKind) -> Self {
        Self { number, name, kind }
    }
}

/// The schema of a message: its full name and its kinded fields.
///
/// Shape identity is the full name; two shapes with the same full name are
/// the same shape.
#[derive(Debug)]
pub struct MessageShape {
    pub full_name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageShape {
    pub const fn new(full_name: &'static str, fields: &'static [FieldDescriptor]) -> Self {
        Self { full_name, fields }
    }

    /// Short name without the package prefix (`pkg.Future` → `Future`).
    pub fn name(&self) -> &'static str {
        match self.full_name.rfind('.') {
            Some(idx) => &self.full_name[idx + 1..],
            None => self.full_name,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_number(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Returns the fields ordered by declared position.
    ///
    /// Positions must be exactly `{1..N}`. A zero, out-of-range or duplicate
    /// position is a schema defect and is reported instead of silently
    /// misaligning positional arguments.
    pub fn ordered_fields(&self) -> Result<Vec<&'static FieldDescriptor>> {
        let count = self.fields.len();
        let mut slots: Vec<Option<&'static FieldDescriptor>> = vec![None; count];

        for field in self.fields {
            let number = field.number as usize;
            if number == 0 || number > count {
                return Err(AdminError::SchemaDefect(format!(
                    "field {}.{} has position {} outside 1..={}",
                    self.full_name, field.name, field.number, count
                )));
            }
            if let Some(existing) = slots[number - 1] {
                return Err(AdminError::SchemaDefect(format!(
                    "fields {}.{} and {}.{} share position {}",
                    self.full_name, existing.name, self.full_name, field.name, field.number
                )));
            }
            slots[number - 1] = Some(field);
        }

        // count slots for count fields with no duplicates: every slot is filled
        Ok(slots.into_iter().flatten().collect())
    }
}

impl PartialEq for MessageShape {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for MessageShape {}

impl fmt::Display for MessageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name)
    }
}

/// A callable remote method.
#[derive(Debug)]
pub struct MethodDescriptor {
    /// Canonical (word-capitalised) name, e.g. `AddVoter`
    pub name: &'static str,
    pub input: &'static MessageShape,
    pub output: &'static MessageShape,
}

/// A named group of methods, addressed on the wire as `/<Service>/<Method>`.
#[derive(Debug)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    pub methods: &'static [MethodDescriptor],
}

impl ServiceDescriptor {
    pub fn method(&self, name: &str) -> Option<&'static MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_path(&self, method: &MethodDescriptor) -> String {
        format!("/{}/{}", self.name, method.name)
    }
}
