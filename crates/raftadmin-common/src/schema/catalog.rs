use std::collections::BTreeMap;

use serde_json::Value;

use super::descriptor::MessageShape;
use super::message::DynamicMessage;
use crate::protocol::error::{AdminError, Result};

/// Table of every message shape the binary knows how to instantiate.
///
/// The catalog is built once from an explicit shape list and never mutated.
/// Asking it for a shape it does not hold means the registry and the catalog
/// drifted apart, which is reported as a schema defect.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    shapes: BTreeMap<&'static str, &'static MessageShape>,
}

impl SchemaCatalog {
    /// Builds the catalog, validating every shape's field positions.
    pub fn new(shapes: &[&'static MessageShape]) -> Result<Self> {
        let mut table = BTreeMap::new();
        for shape in shapes {
            shape.ordered_fields()?;
            if table.insert(shape.full_name, *shape).is_some() {
                return Err(AdminError::SchemaDefect(format!(
                    "shape {} registered twice",
                    shape.full_name
                )));
            }
        }
        Ok(Self { shapes: table })
    }

    pub fn contains(&self, shape: &MessageShape) -> bool {
        self.shapes.contains_key(shape.full_name)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Creates a blank message of `shape`.
    pub fn instantiate(&self, shape: &MessageShape) -> Result<DynamicMessage> {
        match self.shapes.get(shape.full_name) {
            Some(known) => Ok(DynamicMessage::new(known)),
            None => Err(AdminError::SchemaDefect(format!(
                "unknown type {:?}; please add it to the schema catalog",
                shape.full_name
            ))),
        }
    }

    /// Instantiates `shape` and fills it from a JSON response body.
    pub fn decode(&self, shape: &MessageShape, value: &Value) -> Result<DynamicMessage> {
        let mut message = self.instantiate(shape)?;
        message.merge_json(value)?;
        Ok(message)
    }
}
