//! Test doubles for the gateway's collaborator traits.
//!
//! Every mock counts its calls, captures its arguments, and can be flipped
//! into a failing state, so tests can assert not just results but which
//! backend operations ran, with what, and in which order. The shared
//! [`MockCheckout::log`] records checkout operations in invocation order for
//! the ordering assertions the add-item orchestrator needs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use driftline_core::{MarketingData, OrderFormId, SegmentData};
use driftline_gateway::collaborators::{
    CheckoutOps, HttpCaller, PaymentTokenOps, ProfileOps, SessionOps,
};
use driftline_gateway::context::{RequestAuth, RequestContext};
use driftline_gateway::proxy::ProxyRequest;
use driftline_gateway::{GatewayError, Result};
use secrecy::SecretString;
use serde_json::{Value, json};

fn backend_failure(operation: &str) -> GatewayError {
    GatewayError::Backend {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: format!("{{\"error\":\"{operation} unavailable\"}}"),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().expect("mock state lock poisoned")
}

/// Mock order-management backend.
#[derive(Default)]
pub struct MockCheckout {
    /// Body served by `order_form`.
    pub order_form_body: Mutex<Value>,
    /// When set, `order_form` fails before returning a body.
    pub fail_order_form: AtomicBool,
    /// Checkout operations in invocation order.
    pub log: Mutex<Vec<String>>,
    pub order_form_calls: AtomicUsize,
    pub add_item_calls: AtomicUsize,
    pub marketing_calls: AtomicUsize,
    pub add_item_args: Mutex<Vec<(OrderFormId, Value)>>,
    /// Captured merged attribution, serialized to its wire shape.
    pub marketing_args: Mutex<Vec<(OrderFormId, Value)>>,
    /// Captured profile-attachment payloads (also fed by the shipping alias).
    pub profile_args: Mutex<Vec<(OrderFormId, Value)>>,
}

impl MockCheckout {
    /// Set the order form `order_form` will serve.
    pub fn serve_order_form(&self, body: Value) {
        *lock(&self.order_form_body) = body;
    }

    fn record(&self, operation: &str) {
        lock(&self.log).push(operation.to_owned());
    }
}

#[async_trait]
impl CheckoutOps for MockCheckout {
    async fn order_form(&self) -> Result<Value> {
        self.record("orderForm");
        self.order_form_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_order_form.load(Ordering::SeqCst) {
            return Err(backend_failure("orderForm"));
        }
        Ok(lock(&self.order_form_body).clone())
    }

    async fn orders(&self) -> Result<Value> {
        self.record("orders");
        Ok(json!({"list": []}))
    }

    async fn shipping(&self, simulation: Value) -> Result<Value> {
        self.record("shipping");
        Ok(json!({"simulation": simulation}))
    }

    async fn add_item(&self, order_form_id: &OrderFormId, items: Value) -> Result<Value> {
        self.record("addItem");
        self.add_item_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.add_item_args).push((order_form_id.clone(), items.clone()));
        Ok(json!({"orderFormId": order_form_id.as_str(), "items": items}))
    }

    async fn update_order_form_marketing_data(
        &self,
        order_form_id: &OrderFormId,
        marketing_data: &MarketingData,
    ) -> Result<Value> {
        self.record("updateOrderFormMarketingData");
        self.marketing_calls.fetch_add(1, Ordering::SeqCst);
        let wire = serde_json::to_value(marketing_data)?;
        lock(&self.marketing_args).push((order_form_id.clone(), wire.clone()));
        Ok(json!({"orderFormId": order_form_id.as_str(), "marketingData": wire}))
    }

    async fn cancel_order(&self, order_form_id: &OrderFormId, reason: &str) -> Result<Value> {
        self.record("cancelOrder");
        Ok(json!({"orderFormId": order_form_id.as_str(), "reason": reason}))
    }

    async fn set_order_form_custom_data(
        &self,
        order_form_id: &OrderFormId,
        app_id: &str,
        field: &str,
        value: Value,
    ) -> Result<Value> {
        self.record("setOrderFormCustomData");
        Ok(json!({
            "orderFormId": order_form_id.as_str(),
            "appId": app_id,
            "field": field,
            "value": value,
        }))
    }

    async fn update_items(&self, order_form_id: &OrderFormId, items: Value) -> Result<Value> {
        self.record("updateItems");
        Ok(json!({"orderFormId": order_form_id.as_str(), "items": items}))
    }

    async fn update_order_form_ignore_profile(
        &self,
        order_form_id: &OrderFormId,
        ignore_profile_data: bool,
    ) -> Result<Value> {
        self.record("updateOrderFormIgnoreProfile");
        Ok(json!({
            "orderFormId": order_form_id.as_str(),
            "ignoreProfileData": ignore_profile_data,
        }))
    }

    async fn update_order_form_payment(
        &self,
        order_form_id: &OrderFormId,
        payments: Value,
    ) -> Result<Value> {
        self.record("updateOrderFormPayment");
        Ok(json!({"orderFormId": order_form_id.as_str(), "payments": payments}))
    }

    async fn update_order_form_profile(
        &self,
        order_form_id: &OrderFormId,
        fields: Value,
    ) -> Result<Value> {
        self.record("updateOrderFormProfile");
        lock(&self.profile_args).push((order_form_id.clone(), fields.clone()));
        Ok(json!({"orderFormId": order_form_id.as_str(), "fields": fields}))
    }
}

/// Mock session service.
#[derive(Default)]
pub struct MockSession {
    pub segment: Mutex<SegmentData>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl MockSession {
    pub fn serve_segment(&self, segment: SegmentData) {
        *lock(&self.segment) = segment;
    }
}

#[async_trait]
impl SessionOps for MockSession {
    async fn get_segment_data(&self) -> Result<SegmentData> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(backend_failure("segment"));
        }
        Ok(lock(&self.segment).clone())
    }
}

/// Mock customer-profile service.
#[derive(Default)]
pub struct MockProfile {
    pub address_calls: AtomicUsize,
    pub payment_calls: AtomicUsize,
    pub password_calls: AtomicUsize,
}

#[async_trait]
impl ProfileOps for MockProfile {
    async fn get_addresses(&self) -> Result<Value> {
        self.address_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!([{"addressName": "home", "street": "Rua A"}]))
    }

    async fn get_payments(&self) -> Result<Value> {
        self.payment_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!([{"id": "pay-1", "paymentSystem": "2"}]))
    }

    async fn get_password_last_update(&self) -> Result<Value> {
        self.password_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!("2026-01-15T09:00:00.000Z"))
    }
}

/// Mock payment-token collaborator.
#[derive(Default)]
pub struct MockPaymentTokens {
    pub calls: AtomicUsize,
    pub args: Mutex<Vec<Value>>,
}

#[async_trait]
impl PaymentTokenOps for MockPaymentTokens {
    async fn add_payment_token(&self, args: Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.args).push(args.clone());
        Ok(json!({"tokenized": args}))
    }
}

/// Mock executor for pass-through requests; captures the resolved request.
#[derive(Default)]
pub struct MockHttpCaller {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<ProxyRequest>>,
}

#[async_trait]
impl HttpCaller for MockHttpCaller {
    async fn call(&self, request: ProxyRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let echo = json!({
            "method": request.method.as_str(),
            "url": request.url.as_str(),
            "body": request.body,
        });
        lock(&self.requests).push(request);
        Ok(echo)
    }
}

/// Auth material used across the test suite.
#[must_use]
pub fn test_auth() -> RequestAuth {
    RequestAuth {
        auth_token: SecretString::from("test-token"),
        cookie: Some("checkout.session=it-1".to_owned()),
    }
}

/// One request's worth of mock collaborators plus the context wired to them.
#[derive(Default)]
pub struct TestHarness {
    pub checkout: Arc<MockCheckout>,
    pub session: Arc<MockSession>,
    pub profile: Arc<MockProfile>,
    pub payment_tokens: Arc<MockPaymentTokens>,
    pub http: Arc<MockHttpCaller>,
}

impl TestHarness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a request context over this harness's mocks.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext::new(
            test_auth(),
            self.checkout.clone(),
            self.session.clone(),
            self.profile.clone(),
            self.payment_tokens.clone(),
            self.http.clone(),
        )
    }
}
