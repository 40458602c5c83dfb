//! Order-management API client.
//!
//! Default [`CheckoutOps`] implementation over REST. The backend treats
//! `GET orderForm` as an ensure-cart call (it creates the cart when the
//! session has none), so even the read path can mint state server-side.

pub mod conversions;
pub mod paths;

use std::sync::Arc;

use async_trait::async_trait;
use driftline_core::{MarketingData, OrderFormId};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::instrument;
use url::Url;

use crate::collaborators::CheckoutOps;
use crate::context::RequestAuth;
use crate::error::{GatewayError, Result};

/// Client for the order-management (checkout) API.
#[derive(Clone)]
pub struct CheckoutClient {
    inner: Arc<CheckoutClientInner>,
}

struct CheckoutClientInner {
    client: reqwest::Client,
    base: Url,
    auth_token: SecretString,
    cookie: Option<String>,
}

impl CheckoutClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url, auth: &RequestAuth) -> Self {
        Self {
            inner: Arc::new(CheckoutClientInner {
                client,
                base,
                auth_token: auth.auth_token.clone(),
                cookie: auth.cookie.clone(),
            }),
        }
    }

    fn base(&self) -> &Url {
        &self.inner.base
    }

    /// Send a request with this request's auth material and parse the
    /// response.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<Value> {
        let mut builder = builder.header(
            "Authorization",
            format!("Bearer {}", self.inner.auth_token.expose_secret()),
        );
        if let Some(cookie) = &self.inner.cookie {
            builder = builder.header("Cookie", cookie);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "checkout API returned non-success status"
            );
            return Err(GatewayError::Backend { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl CheckoutOps for CheckoutClient {
    #[instrument(skip(self))]
    async fn order_form(&self) -> Result<Value> {
        let url = paths::order_form(self.base())?;
        self.execute(self.inner.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn orders(&self) -> Result<Value> {
        let url = paths::orders(self.base())?;
        self.execute(self.inner.client.get(url)).await
    }

    #[instrument(skip(self, simulation))]
    async fn shipping(&self, simulation: Value) -> Result<Value> {
        let url = paths::shipping_simulation(self.base())?;
        self.execute(self.inner.client.post(url).json(&simulation))
            .await
    }

    #[instrument(skip(self, items), fields(order_form_id = %order_form_id))]
    async fn add_item(&self, order_form_id: &OrderFormId, items: Value) -> Result<Value> {
        let url = paths::add_item(self.base(), order_form_id)?;
        self.execute(
            self.inner
                .client
                .post(url)
                .json(&json!({ "orderItems": items })),
        )
        .await
    }

    #[instrument(skip(self, marketing_data), fields(order_form_id = %order_form_id))]
    async fn update_order_form_marketing_data(
        &self,
        order_form_id: &OrderFormId,
        marketing_data: &MarketingData,
    ) -> Result<Value> {
        let url = paths::attachment(self.base(), order_form_id, paths::Attachment::MarketingData)?;
        self.execute(self.inner.client.post(url).json(marketing_data))
            .await
    }

    #[instrument(skip(self), fields(order_form_id = %order_form_id))]
    async fn cancel_order(&self, order_form_id: &OrderFormId, reason: &str) -> Result<Value> {
        let url = paths::cancel_order(self.base(), order_form_id)?;
        self.execute(self.inner.client.post(url).json(&json!({ "reason": reason })))
            .await
    }

    #[instrument(skip(self, value), fields(order_form_id = %order_form_id))]
    async fn set_order_form_custom_data(
        &self,
        order_form_id: &OrderFormId,
        app_id: &str,
        field: &str,
        value: Value,
    ) -> Result<Value> {
        let url = paths::custom_data(self.base(), order_form_id, app_id, field)?;
        self.execute(self.inner.client.put(url).json(&json!({ "value": value })))
            .await
    }

    #[instrument(skip(self, items), fields(order_form_id = %order_form_id))]
    async fn update_items(&self, order_form_id: &OrderFormId, items: Value) -> Result<Value> {
        let url = paths::update_items(self.base(), order_form_id)?;
        self.execute(
            self.inner
                .client
                .post(url)
                .json(&json!({ "orderItems": items })),
        )
        .await
    }

    #[instrument(skip(self), fields(order_form_id = %order_form_id))]
    async fn update_order_form_ignore_profile(
        &self,
        order_form_id: &OrderFormId,
        ignore_profile_data: bool,
    ) -> Result<Value> {
        let url = paths::profile(self.base(), order_form_id)?;
        self.execute(
            self.inner
                .client
                .patch(url)
                .json(&json!({ "ignoreProfileData": ignore_profile_data })),
        )
        .await
    }

    #[instrument(skip(self, payments), fields(order_form_id = %order_form_id))]
    async fn update_order_form_payment(
        &self,
        order_form_id: &OrderFormId,
        payments: Value,
    ) -> Result<Value> {
        let url = paths::attachment(self.base(), order_form_id, paths::Attachment::PaymentData)?;
        self.execute(
            self.inner
                .client
                .post(url)
                .json(&json!({ "payments": payments })),
        )
        .await
    }

    #[instrument(skip(self, fields), fields(order_form_id = %order_form_id))]
    async fn update_order_form_profile(
        &self,
        order_form_id: &OrderFormId,
        fields: Value,
    ) -> Result<Value> {
        let url = paths::attachment(
            self.base(),
            order_form_id,
            paths::Attachment::ClientProfileData,
        )?;
        self.execute(self.inner.client.post(url).json(&fields))
            .await
    }
}
