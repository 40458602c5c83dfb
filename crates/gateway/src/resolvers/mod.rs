//! Schema-facing resolver layer.
//!
//! One registry maps every query, mutation, and field name the schema knows
//! to a handler; the handlers live in sibling modules grouped the way the
//! schema groups them (checkout operations, order-form fields, profile
//! fields).

pub mod checkout;
pub mod order_form;
pub mod profile;
pub mod registry;

pub use registry::{Handler, HandlerFn, HandlerFuture, ResolverRegistry};

use serde_json::Value;

/// Project one member of a parent document, `null` when absent.
pub(crate) fn member(parent: &Value, key: &str) -> Value {
    parent.get(key).cloned().unwrap_or(Value::Null)
}
