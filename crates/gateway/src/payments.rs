//! Payment-token attachment client.
//!
//! `addOrderFormPaymentToken` goes through its own collaborator rather than
//! [`crate::collaborators::CheckoutOps`]: the token payload is opaque to the
//! gateway and the endpoint lives under the order form's payment data, so
//! the whole arguments object is forwarded as received.

use std::sync::Arc;

use async_trait::async_trait;
use driftline_core::OrderFormId;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::checkout::paths;
use crate::collaborators::PaymentTokenOps;
use crate::context::RequestAuth;
use crate::error::{GatewayError, Result};

/// Client attaching payment tokens to an order form.
#[derive(Clone)]
pub struct PaymentTokenClient {
    inner: Arc<PaymentTokenClientInner>,
}

struct PaymentTokenClientInner {
    client: reqwest::Client,
    base: Url,
    auth_token: SecretString,
    cookie: Option<String>,
}

impl PaymentTokenClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url, auth: &RequestAuth) -> Self {
        Self {
            inner: Arc::new(PaymentTokenClientInner {
                client,
                base,
                auth_token: auth.auth_token.clone(),
                cookie: auth.cookie.clone(),
            }),
        }
    }
}

#[async_trait]
impl PaymentTokenOps for PaymentTokenClient {
    #[instrument(skip(self, args))]
    async fn add_payment_token(&self, args: Value) -> Result<Value> {
        let order_form_id: OrderFormId = args
            .get("orderFormId")
            .and_then(Value::as_str)
            .map(OrderFormId::from)
            .ok_or(GatewayError::MissingArgument {
                operation: "addOrderFormPaymentToken",
                argument: "orderFormId",
            })?;

        let url = paths::payment_token(&self.inner.base, &order_form_id)?;

        let mut builder = self
            .inner
            .client
            .put(url)
            .header(
                "Authorization",
                format!("Bearer {}", self.inner.auth_token.expose_secret()),
            )
            .json(&args);
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
                "payment token endpoint returned non-success status"
            );
            return Err(GatewayError::Backend { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
