//! Driftline Gateway - storefront-facing resolver layer.
//!
//! Mediates between a storefront schema and the commerce order-management
//! backend: a [`resolvers::ResolverRegistry`] dispatches every schema
//! query/mutation/field to a handler, handlers call backend collaborators
//! through the traits in [`collaborators`], and the two pieces of real logic
//! live in `driftline_core` (scaled-integer money conversion and marketing
//! attribution reconciliation).
//!
//! The crate is a library: the embedding schema execution layer owns the
//! HTTP server and the client-facing error format. The gateway's contract is
//! to fail promptly, propagate collaborator errors untranslated, and never
//! commit partial state.
//!
//! # Usage
//!
//! ```rust,no_run
//! use driftline_gateway::config::GatewayConfig;
//! use driftline_gateway::context::{Gateway, RequestAuth};
//! use driftline_gateway::resolvers::ResolverRegistry;
//! use secrecy::SecretString;
//! use serde_json::{Value, json};
//!
//! # async fn handle() -> driftline_gateway::Result<()> {
//! let config = GatewayConfig::from_env().expect("configuration");
//! let registry = ResolverRegistry::new(&config.payments_url)?;
//! let gateway = Gateway::new(config);
//!
//! // Per incoming request:
//! let ctx = gateway.request_context(RequestAuth {
//!     auth_token: SecretString::from("service-token"),
//!     cookie: Some("checkout.session=abc".to_owned()),
//! });
//! let order_form = registry
//!     .execute_query("orderForm", Value::Null, json!({}), &ctx)
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod payments;
pub mod profile;
pub mod proxy;
pub mod resolvers;
pub mod session;

pub use error::{GatewayError, Result};
