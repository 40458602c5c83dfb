//! Driftline Core - Shared types library.
//!
//! This crate provides the domain types used across the Driftline gateway
//! components:
//! - `gateway` - storefront-facing resolver layer over the order-management API
//! - `integration-tests` - cross-crate test suite
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - newtype IDs, scaled-integer money conversion, and marketing
//!   attribution reconciliation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
