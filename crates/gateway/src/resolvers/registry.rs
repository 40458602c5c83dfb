//! Resolver dispatch table.
//!
//! Three keyspaces (queries, mutations, `(type, field)` pairs), one uniform
//! entry point. Entries are tagged by shape: direct delegation to a
//! collaborator operation, a derived value computed from the parent
//! document, or a declarative pass-through descriptor compiled when the
//! registry is built. New operations are added by registration, never by
//! branching in a dispatcher.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use url::Url;

use crate::context::RequestContext;
use crate::error::{GatewayError, Result};
use crate::proxy::HttpProxy;
use crate::resolvers::{checkout, order_form, profile};

/// Boxed future every handler resolves through.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// Uniform handler signature: parent value, arguments, request context.
pub type HandlerFn = fn(Value, Value, RequestContext) -> HandlerFuture;

/// A registered resolver, tagged by shape.
#[derive(Clone)]
pub enum Handler {
    /// Forwards arguments to collaborator operations and returns the result
    /// unmodified.
    Direct(HandlerFn),
    /// Computes a value from the parent document.
    Derived(HandlerFn),
    /// Pass-through call described by a compiled descriptor.
    Declarative(HttpProxy),
}

impl Handler {
    /// Resolve one invocation.
    pub fn execute(&self, parent: Value, args: Value, ctx: RequestContext) -> HandlerFuture {
        match self {
            Self::Direct(handler) | Self::Derived(handler) => handler(parent, args, ctx),
            Self::Declarative(proxy) => {
                let proxy = proxy.clone();
                Box::pin(async move {
                    let request = proxy.resolve(&args, ctx.auth())?;
                    ctx.http().call(request).await
                })
            }
        }
    }
}

/// The gateway's full resolver surface.
pub struct ResolverRegistry {
    queries: HashMap<&'static str, Handler>,
    mutations: HashMap<&'static str, Handler>,
    fields: HashMap<(&'static str, &'static str), Handler>,
}

impl ResolverRegistry {
    /// Build the registry, compiling declarative descriptors against the
    /// payment gateway base URL.
    ///
    /// # Errors
    ///
    /// Fails when a descriptor endpoint cannot be built from the base URL.
    pub fn new(payments_url: &Url) -> Result<Self> {
        let mut queries: HashMap<&'static str, Handler> = HashMap::new();
        queries.insert("orderForm", Handler::Direct(checkout::order_form));
        queries.insert("orders", Handler::Direct(checkout::orders));
        queries.insert("shipping", Handler::Direct(checkout::shipping));

        let mut mutations: HashMap<&'static str, Handler> = HashMap::new();
        mutations.insert("addItem", Handler::Direct(checkout::add_item));
        mutations.insert(
            "addOrderFormPaymentToken",
            Handler::Direct(checkout::add_order_form_payment_token),
        );
        mutations.insert("cancelOrder", Handler::Direct(checkout::cancel_order));
        mutations.insert(
            "createPaymentSession",
            Handler::Declarative(checkout::create_payment_session(payments_url)?),
        );
        mutations.insert(
            "createPaymentTokens",
            Handler::Declarative(checkout::create_payment_tokens(payments_url)?),
        );
        mutations.insert(
            "setOrderFormCustomData",
            Handler::Direct(checkout::set_order_form_custom_data),
        );
        mutations.insert("updateItems", Handler::Direct(checkout::update_items));
        mutations.insert(
            "updateOrderFormIgnoreProfile",
            Handler::Direct(checkout::update_order_form_ignore_profile),
        );
        mutations.insert(
            "updateOrderFormPayment",
            Handler::Direct(checkout::update_order_form_payment),
        );
        mutations.insert(
            "updateOrderFormProfile",
            Handler::Direct(checkout::update_order_form_profile),
        );
        mutations.insert(
            "updateOrderFormShipping",
            Handler::Direct(checkout::update_order_form_shipping),
        );

        let mut fields: HashMap<(&'static str, &'static str), Handler> = HashMap::new();
        fields.insert(
            ("OrderForm", "cacheId"),
            Handler::Derived(order_form::cache_id),
        );
        fields.insert(("OrderForm", "items"), Handler::Derived(order_form::items));
        fields.insert(("OrderForm", "value"), Handler::Derived(order_form::value));
        fields.insert(("Profile", "cacheId"), Handler::Derived(profile::cache_id));
        fields.insert(
            ("Profile", "birthDate"),
            Handler::Derived(profile::birth_date),
        );
        fields.insert(
            ("Profile", "customFields"),
            Handler::Derived(profile::custom_fields),
        );
        fields.insert(("Profile", "address"), Handler::Direct(profile::addresses));
        fields.insert(("Profile", "addresses"), Handler::Direct(profile::addresses));
        fields.insert(("Profile", "payments"), Handler::Direct(profile::payments));
        fields.insert(
            ("Profile", "passwordLastUpdate"),
            Handler::Direct(profile::password_last_update),
        );
        fields.insert(
            ("Address", "cacheId"),
            Handler::Derived(profile::address_name),
        );
        fields.insert(("Address", "id"), Handler::Derived(profile::address_name));
        fields.insert(
            ("PaymentProfile", "cacheId"),
            Handler::Derived(profile::payment_profile_id),
        );
        fields.insert(
            ("ProfileCustomField", "cacheId"),
            Handler::Derived(profile::custom_field_key),
        );

        Ok(Self {
            queries,
            mutations,
            fields,
        })
    }

    /// Resolve a named query.
    ///
    /// # Errors
    ///
    /// `UnknownResolver` when no query is registered under `name`; otherwise
    /// whatever the handler produced.
    pub async fn execute_query(
        &self,
        name: &str,
        parent: Value,
        args: Value,
        ctx: &RequestContext,
    ) -> Result<Value> {
        let handler = self
            .queries
            .get(name)
            .ok_or_else(|| GatewayError::UnknownResolver(format!("Query.{name}")))?;
        handler.execute(parent, args, ctx.clone()).await
    }

    /// Resolve a named mutation.
    ///
    /// # Errors
    ///
    /// `UnknownResolver` when no mutation is registered under `name`;
    /// otherwise whatever the handler produced.
    pub async fn execute_mutation(
        &self,
        name: &str,
        parent: Value,
        args: Value,
        ctx: &RequestContext,
    ) -> Result<Value> {
        let handler = self
            .mutations
            .get(name)
            .ok_or_else(|| GatewayError::UnknownResolver(format!("Mutation.{name}")))?;
        handler.execute(parent, args, ctx.clone()).await
    }

    /// Resolve a field on a named schema type.
    ///
    /// # Errors
    ///
    /// `UnknownResolver` when no field resolver is registered for the pair;
    /// otherwise whatever the handler produced.
    pub async fn execute_field(
        &self,
        type_name: &str,
        field: &str,
        parent: Value,
        args: Value,
        ctx: &RequestContext,
    ) -> Result<Value> {
        let handler = self
            .fields
            .get(&(type_name, field))
            .ok_or_else(|| GatewayError::UnknownResolver(format!("{type_name}.{field}")))?;
        handler.execute(parent, args, ctx.clone()).await
    }

    /// Registered query names, for schema wiring.
    pub fn query_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.queries.keys().copied()
    }

    /// Registered mutation names, for schema wiring.
    pub fn mutation_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.mutations.keys().copied()
    }

    /// Registered `(type, field)` pairs, for schema wiring.
    pub fn field_names(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.fields.keys().copied()
    }
}
