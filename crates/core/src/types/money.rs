//! Scaled-integer currency conversion.
//!
//! The order-management backend collapses the decimal point into the integer
//! part of every amount it returns: `10990` means `109.90`. The storefront
//! schema expects plain decimal numbers, so amounts cross exactly one
//! conversion on their way out.

use rust_decimal::Decimal;

/// Convert a backend scaled-integer amount to its decimal value.
///
/// `10990` becomes `109.90` exactly. The backend only emits amounts on
/// two-decimal boundaries, so this is a representation change, not rounding.
///
/// Not idempotent: applying it to an already-converted value corrupts the
/// amount. Callers convert exactly once, at the schema boundary.
#[must_use]
pub fn scaled_to_decimal(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
