//! Session/segment service client.

use std::sync::Arc;

use async_trait::async_trait;
use driftline_core::SegmentData;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use url::Url;

use crate::collaborators::SessionOps;
use crate::context::RequestAuth;
use crate::error::{GatewayError, Result};

/// Client for the session service's segment endpoint.
///
/// The segment record is the session's live view of marketing attribution;
/// the cookie identifies which session is asking.
#[derive(Clone)]
pub struct SessionClient {
    inner: Arc<SessionClientInner>,
}

struct SessionClientInner {
    client: reqwest::Client,
    base: Url,
    auth_token: SecretString,
    cookie: Option<String>,
}

impl SessionClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base: Url, auth: &RequestAuth) -> Self {
        Self {
            inner: Arc::new(SessionClientInner {
                client,
                base,
                auth_token: auth.auth_token.clone(),
                cookie: auth.cookie.clone(),
            }),
        }
    }
}

#[async_trait]
impl SessionOps for SessionClient {
    #[instrument(skip(self))]
    async fn get_segment_data(&self) -> Result<SegmentData> {
        let url = self.inner.base.join("api/session/segment")?;

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
                "session service returned non-success status"
            );
            return Err(GatewayError::Backend { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
