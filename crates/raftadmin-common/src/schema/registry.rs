//! Method Registry
//!
//! Indexes the methods of a [`ServiceDescriptor`] by canonical name and
//! resolves operator-typed command names onto them. Everything derivable
//! from the static schema (ordered input fields, wire path) is computed once
//! in [`MethodRegistry::build`], so a registry that builds successfully can
//! never misalign positional arguments later.

use std::collections::BTreeMap;

use tracing::debug;

use super::case::{to_camel, to_snake};
use super::catalog::SchemaCatalog;
use super::descriptor::{FieldDescriptor, MethodDescriptor, ServiceDescriptor};
use crate::protocol::error::{AdminError, Result};

/// A method together with everything precomputed for invoking it.
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    pub descriptor: &'static MethodDescriptor,
    /// Input fields ordered by declared position
    pub fields: Vec<&'static FieldDescriptor>,
    /// `/<Service>/<Method>`
    pub path: String,
}

impl ResolvedMethod {
    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    /// Operator spelling of the method name, e.g. `add_voter`.
    pub fn command(&self) -> String {
        to_snake(self.descriptor.name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.to_string()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct MethodRegistry {
    service: &'static ServiceDescriptor,
    catalog: SchemaCatalog,
    methods: BTreeMap<&'static str, ResolvedMethod>,
}

impl MethodRegistry {
    /// Builds the registry for `service`.
    ///
    /// Fails with a schema defect if a method is declared twice, if a method
    /// references a shape missing from `catalog`, or if an input shape's
    /// positions are not dense.
    pub fn build(service: &'static ServiceDescriptor, catalog: SchemaCatalog) -> Result<Self> {
        let mut methods = BTreeMap::new();

        for method in service.methods {
            for shape in [method.input, method.output] {
                if !catalog.contains(shape) {
                    return Err(AdminError::SchemaDefect(format!(
                        "method {} references unknown type {:?}; please add it to the schema catalog",
                        method.name, shape.full_name
                    )));
                }
            }

            let resolved = ResolvedMethod {
                descriptor: method,
                fields: method.input.ordered_fields()?,
                path: service.method_path(method),
            };
            if methods.insert(method.name, resolved).is_some() {
                return Err(AdminError::SchemaDefect(format!(
                    "method {}.{} declared twice",
                    service.name, method.name
                )));
            }
        }

        debug!(
            "Built registry for {} with {} methods",
            service.name,
            methods.len()
        );

        Ok(Self {
            service,
            catalog,
            methods,
        })
    }

    pub fn service(&self) -> &'static ServiceDescriptor {
        self.service
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Canonical method names, sorted.
    pub fn list_methods(&self) -> Vec<&'static str> {
        // BTreeMap keys are already ordered
        self.methods.keys().copied().collect()
    }

    /// Operator spellings of every method, sorted.
    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.keys().map(|name| to_snake(name)).collect();
        names.sort();
        names
    }

    /// Looks up a method by canonical name only.
    pub fn get(&self, name: &str) -> Option<&ResolvedMethod> {
        self.methods.get(name)
    }

    /// Resolves a command name, trying it verbatim first and then in
    /// canonical casing. No suggestions are offered on failure.
    pub fn resolve(&self, name: &str) -> Result<&ResolvedMethod> {
        if let Some(method) = self.methods.get(name) {
            return Ok(method);
        }
        self.methods
            .get(to_camel(name).as_str())
            .ok_or_else(|| AdminError::UnknownCommand(name.to_string()))
    }
}
