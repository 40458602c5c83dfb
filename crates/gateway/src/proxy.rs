//! Declarative pass-through HTTP calls.
//!
//! Some mutations carry no business logic at all: the gateway forwards the
//! arguments to a fixed endpoint and hands the response back. Those are
//! described by an [`HttpProxy`] descriptor built once at registration time;
//! per call the descriptor resolves the arguments and the request's auth
//! material into a concrete [`ProxyRequest`], which an [`HttpCaller`]
//! implementation executes.

use std::sync::Arc;

use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::collaborators::HttpCaller;
use crate::context::RequestAuth;
use crate::error::{GatewayError, Result};

/// Maps the mutation's arguments into the forwarded request body.
pub type DataTransform = fn(&Value) -> Result<Value>;

/// Which headers the forwarded request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSpec {
    /// `Content-Type: application/json` only.
    Json,
    /// JSON content type plus the bearer auth token.
    JsonWithAuth,
}

/// Declarative descriptor for a pass-through call.
///
/// Plain configuration data: the registry holds one of these per declarative
/// mutation, compiled against the configured base URL when the registry is
/// built, never per call.
#[derive(Clone)]
pub struct HttpProxy {
    pub method: Method,
    pub url: Url,
    /// Upgrade `http://` targets to `https://` before sending.
    pub secure: bool,
    /// Forward the request's session cookie.
    pub enable_cookies: bool,
    pub headers: HeaderSpec,
    /// When absent the arguments object is forwarded as the body verbatim.
    pub data: Option<DataTransform>,
}

impl std::fmt::Debug for HttpProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProxy")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("secure", &self.secure)
            .field("enable_cookies", &self.enable_cookies)
            .field("headers", &self.headers)
            .field("data", &self.data.map(|_| "fn"))
            .finish()
    }
}

impl HttpProxy {
    /// Resolve the descriptor against one invocation's arguments and auth
    /// material.
    ///
    /// # Errors
    ///
    /// Fails when the body transform rejects the arguments.
    pub fn resolve(&self, args: &Value, auth: &RequestAuth) -> Result<ProxyRequest> {
        let mut url = self.url.clone();
        if self.secure && url.scheme() == "http" {
            // http -> https is always a permitted scheme change
            let _ = url.set_scheme("https");
        }

        let body = match self.data {
            Some(transform) => transform(args)?,
            None => args.clone(),
        };

        let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
        if self.headers == HeaderSpec::JsonWithAuth {
            headers.push((
                "Authorization".to_owned(),
                format!("Bearer {}", auth.auth_token.expose_secret()),
            ));
        }
        if self.enable_cookies
            && let Some(cookie) = &auth.cookie
        {
            headers.push(("Cookie".to_owned(), cookie.clone()));
        }

        Ok(ProxyRequest {
            method: self.method.clone(),
            url,
            headers,
            body: Some(body),
        })
    }
}

/// A fully resolved pass-through call: absolute URL, final header list,
/// optional JSON body. Nothing downstream re-reads configuration.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Default executor for resolved proxy requests.
#[derive(Clone)]
pub struct ProxyClient {
    inner: Arc<ProxyClientInner>,
}

struct ProxyClientInner {
    client: reqwest::Client,
}

impl ProxyClient {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(ProxyClientInner { client }),
        }
    }
}

#[async_trait::async_trait]
impl HttpCaller for ProxyClient {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn call(&self, request: ProxyRequest) -> Result<Value> {
        let mut builder = self
            .inner
            .client
            .request(request.method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "proxied endpoint returned non-success status"
            );
            return Err(GatewayError::Backend { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }
}
