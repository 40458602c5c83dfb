//! Core types for the Driftline gateway.
//!
//! This module provides type-safe wrappers and the pure domain logic shared
//! by every component.

pub mod attribution;
pub mod id;
pub mod money;

pub use attribution::{MarketingData, SegmentData, is_divergent, merge_segment};
pub use id::*;
pub use money::scaled_to_decimal;
