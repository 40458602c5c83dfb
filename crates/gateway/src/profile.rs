//! Customer-profile service client.
//!
//! Backs the `Profile` field resolvers that are not stored on the profile
//! document itself: addresses, payment profiles, and the password-last-update
//! timestamp. The cookie scopes every lookup to the requesting customer.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::collaborators::ProfileOps;
use crate::context::RequestAuth;
use crate::error::{GatewayError, Result};

/// Client for the customer-profile service.
#[derive(Clone)]
pub struct ProfileClient {
    inner: Arc<ProfileClientInner>,
}

struct ProfileClientInner {
    client: reqwest::Client,
    base: Url,
    auth_token: SecretString,
    cookie: Option<String>,
}

impl ProfileClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url, auth: &RequestAuth) -> Self {
        Self {
            inner: Arc::new(ProfileClientInner {
                client,
                base,
                auth_token: auth.auth_token.clone(),
                cookie: auth.cookie.clone(),
            }),
        }
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = self.inner.base.join(path)?;

        let mut builder = self.inner.client.get(url).header(
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
                "profile service returned non-success status"
            );
            return Err(GatewayError::Backend { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ProfileOps for ProfileClient {
    #[instrument(skip(self))]
    async fn get_addresses(&self) -> Result<Value> {
        self.get("api/profile/addresses").await
    }

    #[instrument(skip(self))]
    async fn get_payments(&self) -> Result<Value> {
        self.get("api/profile/payments").await
    }

    #[instrument(skip(self))]
    async fn get_password_last_update(&self) -> Result<Value> {
        self.get("api/profile/password-last-update").await
    }
}
