//! Schema-driven command dispatch.
//!
//! The pieces here let a textual command and positional arguments reach a
//! typed request without any per-method binding code: static descriptors
//! describe every shape, the [`SchemaCatalog`] instantiates them, the
//! [`MethodRegistry`] resolves command names and the [`bind`] function fills
//! requests from text.

pub mod binder;
pub mod case;
pub mod catalog;
pub mod descriptor;
pub mod message;
pub mod registry;
pub mod value;

pub use binder::bind;
pub use case::{to_camel, to_snake};
pub use catalog::SchemaCatalog;
pub use descriptor::{FieldDescriptor, FieldKind, MessageShape, MethodDescriptor, ServiceDescriptor};
pub use message::{DynamicMessage, Message};
pub use registry::{MethodRegistry, ResolvedMethod};
pub use value::TypedValue;
