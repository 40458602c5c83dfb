//! Order-form document normalization for the schema boundary.
//!
//! The backend returns every amount as a scaled integer (`10990` for
//! `109.90`); the schema expects decimal numbers. These helpers rewrite the
//! price members of an order-form document in place of the original values
//! and leave every other member untouched. They run exactly once per
//! document, at the field-resolver boundary.

use driftline_core::scaled_to_decimal;
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Line-item members carrying scaled-integer amounts.
const ITEM_PRICE_FIELDS: [&str; 3] = ["price", "listPrice", "sellingPrice"];

/// Convert one scaled-integer member to its decimal value.
///
/// # Errors
///
/// A member that is missing or not an integer is malformed upstream data;
/// money is never silently passed through or dropped.
pub fn normalized_amount(parent: &Value, field: &str) -> Result<Value> {
    let cents = parent
        .get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| GatewayError::UnexpectedShape {
            field: field.to_owned(),
            expected: "scaled-integer amount",
        })?;
    Ok(serde_json::to_value(scaled_to_decimal(cents))?)
}

/// Normalize the price members of every line item.
///
/// The output array has the same length and order as the input; non-price
/// members pass through unchanged.
///
/// # Errors
///
/// Fails when `items` is not an array or any item's price members are not
/// scaled integers.
pub fn normalized_items(parent: &Value) -> Result<Value> {
    let items = parent
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::UnexpectedShape {
            field: "items".to_owned(),
            expected: "array of line items",
        })?;

    let mut normalized = Vec::with_capacity(items.len());
    for item in items {
        let mut converted = item.clone();
        let object = converted
            .as_object_mut()
            .ok_or_else(|| GatewayError::UnexpectedShape {
                field: "items".to_owned(),
                expected: "array of line items",
            })?;
        for field in ITEM_PRICE_FIELDS {
            object.insert(field.to_owned(), normalized_amount(item, field)?);
        }
        normalized.push(converted);
    }

    Ok(Value::Array(normalized))
}
