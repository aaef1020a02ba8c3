//! Request Binder
//!
//! Turns a flat list of command-line tokens into a populated request message
//! by walking the method's input fields in declared-position order. The
//! binder never performs I/O.

use super::catalog::SchemaCatalog;
use super::message::DynamicMessage;
use super::registry::ResolvedMethod;
use super::value::TypedValue;
use crate::protocol::error::{AdminError, Result};

/// Binds `args` onto a fresh instance of `method`'s input shape.
///
/// The argument count is checked before any token is coerced, so an arity
/// mismatch is always reported as such even if some tokens are also
/// malformed. `command` is the name as the operator typed it and is echoed
/// in the usage message.
pub fn bind<S: AsRef<str>>(
    catalog: &SchemaCatalog,
    method: &ResolvedMethod,
    command: &str,
    args: &[S],
) -> Result<DynamicMessage> {
    if args.len() != method.fields.len() {
        return Err(AdminError::Arity {
            command: command.to_string(),
            fields: method.field_names(),
            given: args.len(),
        });
    }

    let mut request = catalog.instantiate(method.descriptor.input)?;
    for (field, token) in method.fields.iter().zip(args) {
        let value = TypedValue::coerce(field, token.as_ref())?;
        request.set(field, value)?;
    }
    Ok(request)
}
