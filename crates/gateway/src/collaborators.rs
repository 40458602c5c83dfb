//! Collaborator contracts the resolver layer depends on.
//!
//! Every backend the gateway talks to sits behind one of these traits, so
//! resolvers never know whether a call hits the real service or a test
//! double. Responses stay semi-structured (`serde_json::Value`): the gateway
//! only reasons about the handful of members it transforms and passes the
//! rest through byte-for-byte.

use async_trait::async_trait;
use driftline_core::{MarketingData, OrderFormId, SegmentData};
use serde_json::Value;

use crate::error::Result;
use crate::proxy::ProxyRequest;

/// Order-management (checkout) backend operations.
#[async_trait]
pub trait CheckoutOps: Send + Sync {
    /// Fetch (or lazily create) the current order form.
    async fn order_form(&self) -> Result<Value>;

    /// List the customer's orders.
    async fn orders(&self) -> Result<Value>;

    /// Run a shipping simulation for the given items and destination.
    async fn shipping(&self, simulation: Value) -> Result<Value>;

    /// Add items to an order form.
    async fn add_item(&self, order_form_id: &OrderFormId, items: Value) -> Result<Value>;

    /// Persist marketing attribution on an order form.
    async fn update_order_form_marketing_data(
        &self,
        order_form_id: &OrderFormId,
        marketing_data: &MarketingData,
    ) -> Result<Value>;

    /// Request cancellation of an order group.
    async fn cancel_order(&self, order_form_id: &OrderFormId, reason: &str) -> Result<Value>;

    /// Set one app-scoped custom data field on an order form.
    async fn set_order_form_custom_data(
        &self,
        order_form_id: &OrderFormId,
        app_id: &str,
        field: &str,
        value: Value,
    ) -> Result<Value>;

    /// Update quantities/selections of items already in the order form.
    async fn update_items(&self, order_form_id: &OrderFormId, items: Value) -> Result<Value>;

    /// Toggle whether the order form ignores the stored customer profile.
    async fn update_order_form_ignore_profile(
        &self,
        order_form_id: &OrderFormId,
        ignore_profile_data: bool,
    ) -> Result<Value>;

    /// Attach payment data to an order form.
    async fn update_order_form_payment(
        &self,
        order_form_id: &OrderFormId,
        payments: Value,
    ) -> Result<Value>;

    /// Attach client profile fields to an order form.
    async fn update_order_form_profile(
        &self,
        order_form_id: &OrderFormId,
        fields: Value,
    ) -> Result<Value>;
}

/// Session/analytics segment lookup.
#[async_trait]
pub trait SessionOps: Send + Sync {
    /// Current session-tracked attribution for this request.
    async fn get_segment_data(&self) -> Result<SegmentData>;
}

/// Customer-profile service operations backing the `Profile` field resolvers.
#[async_trait]
pub trait ProfileOps: Send + Sync {
    async fn get_addresses(&self) -> Result<Value>;
    async fn get_payments(&self) -> Result<Value>;
    async fn get_password_last_update(&self) -> Result<Value>;
}

/// Dedicated payment-token attachment behind `addOrderFormPaymentToken`.
#[async_trait]
pub trait PaymentTokenOps: Send + Sync {
    /// Attach a payment token to the order form named in `args`.
    async fn add_payment_token(&self, args: Value) -> Result<Value>;
}

/// Executes a fully resolved pass-through request (see [`crate::proxy`]).
#[async_trait]
pub trait HttpCaller: Send + Sync {
    async fn call(&self, request: ProxyRequest) -> Result<Value>;
}
