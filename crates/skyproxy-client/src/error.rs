//! Error types for the gateway client.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use skyproxy_common::SessionError;

/// Errors that can occur when calling the SKY API.
///
/// Every failure the transport or the remote service can produce ends up here,
/// so callers never have to inspect a payload to tell success from failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Network or HTTP request failure.
    ///
    /// DNS resolution, connection refusal, TLS, or socket errors.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {}ms", timeout.as_millis())]
    TimeoutError {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// JSON encoding of the request or decoding of the response failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Client configuration issue.
    ///
    /// Invalid base URL or a subscription key that could not be resolved.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The session supplied by the caller is unusable.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The access token or subscription key was rejected (HTTP 401).
    #[error("Authentication error: {message}")]
    AuthenticationError {
        /// Message extracted from the response body.
        message: String,
        /// The decoded response body, or the raw text as a JSON string.
        body: Value,
    },

    /// Rate limit exceeded (HTTP 429).
    #[error("Rate limit exceeded (retry after {retry_after:?}): {message}")]
    RateLimitError {
        /// Wait time suggested by the `Retry-After` header, if any.
        retry_after: Option<Duration>,
        /// Message extracted from the response body.
        message: String,
        /// The decoded response body, or the raw text as a JSON string.
        body: Value,
    },

    /// The remote service failed (HTTP 5xx).
    #[error("Service unavailable ({status}): {message}")]
    ServiceUnavailable {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
        /// The decoded response body, or the raw text as a JSON string.
        body: Value,
    },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
        /// The decoded response body, or the raw text as a JSON string.
        body: Value,
    },
}

impl ClientError {
    /// HTTP status associated with this error, if the remote service answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationError { .. } => Some(401),
            Self::RateLimitError { .. } => Some(429),
            Self::Api { status, .. } | Self::ServiceUnavailable { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The remote error body, for statuses that keep it.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::AuthenticationError { body, .. }
            | Self::RateLimitError { body, .. }
            | Self::Api { body, .. }
            | Self::ServiceUnavailable { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Check if this error is potentially retryable.
    ///
    /// The gateway never retries on its own; this is a hint for callers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_)
                | Self::TimeoutError { .. }
                | Self::RateLimitError { .. }
                | Self::ServiceUnavailable { .. }
        )
    }

    /// Check if this is an authentication error.
    #[must_use]
    pub const fn is_authentication_error(&self) -> bool {
        matches!(self, Self::AuthenticationError { .. })
    }

    /// Check if this is a rate limit error.
    #[must_use]
    pub const fn is_rate_limit_error(&self) -> bool {
        matches!(self, Self::RateLimitError { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitError { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Pulls a human-readable message out of a SKY API error body.
///
/// The API answers with either `{"message": ...}` or `[{"message": ...}]`;
/// anything else falls back to the raw text.
pub(crate) fn extract_message(body: &Value, raw: &str) -> String {
    let message = match body {
        Value::Object(map) => map.get("message"),
        Value::Array(items) => items.first().and_then(|item| item.get("message")),
        _ => None,
    };

    message
        .and_then(Value::as_str)
        .map_or_else(|| raw.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_message_from_object() {
        let body = json!({"statusCode": 401, "message": "Access denied"});
        assert_eq!(extract_message(&body, "raw"), "Access denied");
    }

    #[test]
    fn test_extract_message_from_array() {
        let body = json!([{"message": "Constituent not found", "error_code": 404}]);
        assert_eq!(extract_message(&body, "raw"), "Constituent not found");
    }

    #[test]
    fn test_extract_message_falls_back_to_raw() {
        assert_eq!(
            extract_message(&Value::String("oops".into()), "oops"),
            "oops"
        );
        assert_eq!(extract_message(&json!({"code": 1}), "{\"code\":1}"), "{\"code\":1}");
    }

    #[test]
    fn test_error_classification() {
        let timeout = ClientError::TimeoutError {
            timeout: Duration::from_millis(29_000),
        };
        assert!(timeout.is_retryable());
        assert_eq!(timeout.to_string(), "Request timed out after 29000ms");
        assert_eq!(timeout.status(), None);

        let auth = ClientError::AuthenticationError {
            message: "bad token".into(),
            body: json!({"message": "bad token"}),
        };
        assert!(auth.is_authentication_error());
        assert!(!auth.is_retryable());
        assert_eq!(auth.status(), Some(401));

        let limited = ClientError::RateLimitError {
            retry_after: Some(Duration::from_secs(3)),
            message: "slow down".into(),
            body: json!({"message": "slow down"}),
        };
        assert!(limited.is_rate_limit_error());
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(3)));
        assert_eq!(limited.body(), Some(&json!({"message": "slow down"})));
        assert_eq!(auth.body(), Some(&json!({"message": "bad token"})));

        let api = ClientError::Api {
            status: 404,
            message: "missing".into(),
            body: json!({"message": "missing"}),
        };
        assert_eq!(api.status(), Some(404));
        assert_eq!(api.body(), Some(&json!({"message": "missing"})));
        assert!(!api.is_retryable());

        let unavailable = ClientError::ServiceUnavailable {
            status: 500,
            message: "boom".into(),
            body: json!({"status": 500}),
        };
        assert!(unavailable.is_retryable());
        assert_eq!(unavailable.status(), Some(500));
        assert_eq!(unavailable.body(), Some(&json!({"status": 500})));
    }
}
