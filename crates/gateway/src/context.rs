//! Per-request context and the gateway handle that mints it.
//!
//! Nothing in the gateway lives in process-wide mutable state: every resolver
//! invocation receives a [`RequestContext`] carrying that request's auth
//! material and collaborator handles. The [`Gateway`] handle owns the pieces
//! worth sharing across requests (configuration, the `reqwest` connection
//! pool) and builds a fresh context per request.

use std::sync::Arc;

use secrecy::SecretString;
use uuid::Uuid;

use crate::checkout::CheckoutClient;
use crate::collaborators::{CheckoutOps, HttpCaller, PaymentTokenOps, ProfileOps, SessionOps};
use crate::config::GatewayConfig;
use crate::payments::PaymentTokenClient;
use crate::profile::ProfileClient;
use crate::proxy::ProxyClient;
use crate::session::SessionClient;

/// Auth material for one request.
#[derive(Clone)]
pub struct RequestAuth {
    /// Bearer token attached to backend calls.
    pub auth_token: SecretString,
    /// Session cookie, forwarded to cookie-aware endpoints when present.
    pub cookie: Option<String>,
}

impl std::fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuth")
            .field("auth_token", &"[REDACTED]")
            .field("cookie", &self.cookie.as_deref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Everything a resolver invocation needs, injected per request.
///
/// Cheap to clone: collaborator handles are `Arc`s and the context crosses
/// `await` points freely (`Send + Sync` all the way down).
#[derive(Clone)]
pub struct RequestContext {
    request_id: Uuid,
    auth: RequestAuth,
    checkout: Arc<dyn CheckoutOps>,
    session: Arc<dyn SessionOps>,
    profile: Arc<dyn ProfileOps>,
    payment_tokens: Arc<dyn PaymentTokenOps>,
    http: Arc<dyn HttpCaller>,
}

impl RequestContext {
    /// Assemble a context from explicit collaborator handles.
    ///
    /// Production code goes through [`Gateway::request_context`]; tests
    /// inject doubles here.
    #[must_use]
    pub fn new(
        auth: RequestAuth,
        checkout: Arc<dyn CheckoutOps>,
        session: Arc<dyn SessionOps>,
        profile: Arc<dyn ProfileOps>,
        payment_tokens: Arc<dyn PaymentTokenOps>,
        http: Arc<dyn HttpCaller>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            auth,
            checkout,
            session,
            profile,
            payment_tokens,
            http,
        }
    }

    /// Identifier correlating log lines for this request.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    #[must_use]
    pub const fn auth(&self) -> &RequestAuth {
        &self.auth
    }

    #[must_use]
    pub fn checkout(&self) -> &dyn CheckoutOps {
        self.checkout.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> &dyn SessionOps {
        self.session.as_ref()
    }

    #[must_use]
    pub fn profile(&self) -> &dyn ProfileOps {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn payment_tokens(&self) -> &dyn PaymentTokenOps {
        self.payment_tokens.as_ref()
    }

    #[must_use]
    pub fn http(&self) -> &dyn HttpCaller {
        self.http.as_ref()
    }
}

/// Long-lived gateway handle.
///
/// Cheaply cloneable via `Arc`; holds the configuration and one shared
/// `reqwest::Client` so every request reuses the connection pool.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl Gateway {
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                config,
                client: reqwest::Client::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Mint a request context wired to the default collaborator clients.
    ///
    /// Each call builds fresh client handles carrying this request's auth
    /// material; only the connection pool is shared.
    #[must_use]
    pub fn request_context(&self, auth: RequestAuth) -> RequestContext {
        let config = &self.inner.config;
        let client = self.inner.client.clone();

        let checkout = Arc::new(CheckoutClient::new(
            client.clone(),
            config.checkout_url.clone(),
            &auth,
        ));
        let session = Arc::new(SessionClient::new(
            client.clone(),
            config.session_url.clone(),
            &auth,
        ));
        let profile = Arc::new(ProfileClient::new(
            client.clone(),
            config.profile_url.clone(),
            &auth,
        ));
        let payment_tokens = Arc::new(PaymentTokenClient::new(
            client.clone(),
            config.checkout_url.clone(),
            &auth,
        ));
        let http = Arc::new(ProxyClient::new(client));

        RequestContext::new(auth, checkout, session, profile, payment_tokens, http)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_auth_debug_redacts() {
        let auth = RequestAuth {
            auth_token: SecretString::from("tok-secret-1"),
            cookie: Some("checkout.session=abc123".to_owned()),
        };
        let output = format!("{auth:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("tok-secret-1"));
        assert!(!output.contains("abc123"));
    }
}
