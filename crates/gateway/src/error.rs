//! Gateway error type.
//!
//! The gateway is a thin, transparent layer: collaborator failures reach the
//! schema execution layer exactly as they occurred, with no wrapping or
//! translation. Clients and resolvers share one error enum so propagation is
//! a bare `?` everywhere.

use thiserror::Error;

/// Convenience alias used throughout the gateway.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while mediating a schema operation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status. The body is carried
    /// verbatim; nothing here rewrites what the backend said.
    #[error("backend returned {status}: {body}")]
    Backend {
        /// HTTP status the backend answered with.
        status: reqwest::StatusCode,
        /// Raw response body, unmodified.
        body: String,
    },

    /// JSON (de)serialization failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built from the configured base.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// A document member did not have the shape the backend promises.
    #[error("unexpected shape for `{field}`: expected {expected}")]
    UnexpectedShape {
        /// The offending document member.
        field: String,
        /// What the gateway expected to find there.
        expected: &'static str,
    },

    /// A handler or URL builder needed an argument the caller did not supply.
    #[error("{operation} requires argument `{argument}`")]
    MissingArgument {
        /// Schema operation that was invoked.
        operation: &'static str,
        /// The absent argument.
        argument: &'static str,
    },

    /// No handler is registered under this name.
    #[error("no resolver registered for {0}")]
    UnknownResolver(String),
}
