//! Remote service error types.
//!
//! Every variant makes the route coordinator fall back to the local engine;
//! the rendered message ends up in the outcome's `fallbackReason`.

/// A failed exchange with a remote path or graph service.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Connection refused, timeout, or other transport failure.
    #[error("path service unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// The body did not match the path/graph contract. `body` keeps the
    /// first 500 characters for the logs.
    #[error("malformed response: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Non-success status, or a 200 carrying an `error` field.
    #[error("path service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("path service is rate limiting requests")]
    RateLimited,

    #[error("path service rejected the API key")]
    Unauthorized,

    /// The service has nothing to answer with, e.g. a mock without a network.
    #[error("path service not configured: {0}")]
    NotConfigured(String),

    /// A well-formed answer the local graph cannot use.
    #[error("unusable remote path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = RemoteError::Api {
            status: 503,
            message: "down for maintenance".into(),
        };
        assert_eq!(err.to_string(), "path service returned 503: down for maintenance");

        let err = RemoteError::Json {
            message: "missing field `path`".into(),
            body: Some("{}".into()),
        };
        assert_eq!(err.to_string(), "malformed response: missing field `path`");

        let err = RemoteError::InvalidPath("unknown stop Z".into());
        assert_eq!(err.to_string(), "unusable remote path: unknown stop Z");
    }

    #[test]
    fn only_transport_errors_have_a_source() {
        use std::error::Error;
        assert!(RemoteError::RateLimited.source().is_none());
        assert!(RemoteError::Unauthorized.source().is_none());
    }
}
