//! Gateway configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GATEWAY_CHECKOUT_URL` - Order-management API base URL
//! - `GATEWAY_SESSION_URL` - Session/segment service base URL
//! - `GATEWAY_PROFILE_URL` - Customer-profile service base URL
//! - `GATEWAY_PAYMENTS_URL` - Payment gateway base URL
//! - `GATEWAY_API_TOKEN` - Service auth token attached to every backend call

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Gateway configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Order-management API base URL
    pub checkout_url: Url,
    /// Session/segment service base URL
    pub session_url: Url,
    /// Customer-profile service base URL
    pub profile_url: Url,
    /// Payment gateway base URL
    pub payments_url: Url,
    /// Service auth token attached to every backend call
    pub api_token: SecretString,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("checkout_url", &self.checkout_url.as_str())
            .field("session_url", &self.session_url.as_str())
            .field("profile_url", &self.profile_url.as_str())
            .field("payments_url", &self.payments_url.as_str())
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or are not
    /// valid URLs.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            checkout_url: get_required_url("GATEWAY_CHECKOUT_URL")?,
            session_url: get_required_url("GATEWAY_SESSION_URL")?,
            profile_url: get_required_url("GATEWAY_PROFILE_URL")?,
            payments_url: get_required_url("GATEWAY_PAYMENTS_URL")?,
            api_token: get_required_secret("GATEWAY_API_TOKEN")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get a required environment variable parsed as a URL.
fn get_required_url(key: &str) -> Result<Url, ConfigError> {
    let value = get_required_env(key)?;
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            checkout_url: Url::parse("https://checkout.test.example").unwrap(),
            session_url: Url::parse("https://session.test.example").unwrap(),
            profile_url: Url::parse("https://profile.test.example").unwrap(),
            payments_url: Url::parse("https://payments.test.example").unwrap(),
            api_token: SecretString::from("tok-3f9c2a71d8"),
        }
    }

    #[test]
    fn test_missing_env_var_names_the_variable() {
        let result = get_required_env("DRIFTLINE_TEST_VAR_THAT_IS_NEVER_SET");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
        assert!(
            err.to_string()
                .contains("DRIFTLINE_TEST_VAR_THAT_IS_NEVER_SET")
        );
    }

    #[test]
    fn test_debug_redacts_api_token() {
        let config = test_config();
        let debug_output = format!("{config:?}");

        // Endpoint fields should be visible
        assert!(debug_output.contains("checkout.test.example"));
        assert!(debug_output.contains("payments.test.example"));

        // The token should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok-3f9c2a71d8"));
    }

    #[test]
    fn test_token_still_exposable_for_headers() {
        let config = test_config();
        assert_eq!(config.api_token.expose_secret(), "tok-3f9c2a71d8");
    }
}
