//! Proxy gateway for the SKY API.
//!
//! Every call is a single authenticated request: resolve the URL, attach the
//! subscription key and bearer token, send, decode. Nothing is retried,
//! cached, or rewritten on the way through.
//!
//! # Examples
//!
//! ```no_run
//! use skyproxy_client::SkyClient;
//! use skyproxy_common::{Config, Session};
//!
//! # async fn example() -> Result<(), skyproxy_client::ClientError> {
//! let client = SkyClient::new(Config::default())?;
//! let session = Session::from_token("access-token")?;
//!
//! let constituent = client
//!     .get(&session, "constituent/v1/constituents/280")
//!     .await?;
//! println!("{constituent}");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;

use skyproxy_common::endpoint::resolve_url;
use skyproxy_common::{
    AuthenticatedSession, Config, EndpointRequest, Method, SUBSCRIPTION_KEY_HEADER,
};

use crate::error::{ClientError, extract_message};

/// Prefix of every failure line written to the log.
pub const ERROR_LOG_PREFIX: &str = "(!)[ERROR]";

/// Client for the SKY API.
///
/// Holds one pooled HTTP client and an immutable configuration, so clones are
/// cheap and concurrent calls share no mutable state.
#[derive(Clone)]
pub struct SkyClient {
    client: reqwest::Client,
    config: Arc<Config>,
}

impl std::fmt::Debug for SkyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkyClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SkyClient {
    /// Create a new client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: Config) -> Result<Self, ClientError> {
        config
            .validate()
            .map_err(|e| ClientError::ConfigurationError(e.to_string()))?;

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Issue a GET against `base_url + path`.
    ///
    /// # Errors
    ///
    /// See [`SkyClient::proxy`].
    pub async fn get<S>(&self, session: &S, path: &str) -> Result<Value, ClientError>
    where
        S: AuthenticatedSession + ?Sized,
    {
        self.proxy(session, EndpointRequest::get(path)).await
    }

    /// Issue a POST against `base_url + path` with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SerializationError`] if `body` cannot be encoded,
    /// otherwise see [`SkyClient::proxy`].
    pub async fn post<S, B>(&self, session: &S, path: &str, body: &B) -> Result<Value, ClientError>
    where
        S: AuthenticatedSession + ?Sized,
        B: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(|e| {
            error!("{ERROR_LOG_PREFIX} POST {path}: failed to encode body: {e}");
            ClientError::SerializationError(e)
        })?;
        self.proxy(session, EndpointRequest::post(path, body)).await
    }

    /// Send one authenticated request and decode the JSON response.
    ///
    /// A successful response with an empty body decodes to `Value::Null`.
    /// Every failure is logged with [`ERROR_LOG_PREFIX`] before it is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The URL or subscription key cannot be resolved
    /// - The request fails or exceeds the configured timeout
    /// - The API answers with a non-success status
    /// - The response body is not valid JSON
    pub async fn proxy<S>(&self, session: &S, request: EndpointRequest) -> Result<Value, ClientError>
    where
        S: AuthenticatedSession + ?Sized,
    {
        match self.send(session, &request).await {
            Ok(value) => Ok(value),
            Err(err) => {
                error!("{ERROR_LOG_PREFIX} {request}: {err}");
                Err(err)
            }
        }
    }

    async fn send<S>(&self, session: &S, request: &EndpointRequest) -> Result<Value, ClientError>
    where
        S: AuthenticatedSession + ?Sized,
    {
        let url = resolve_url(&self.config.base_url, &request.path);
        let url = reqwest::Url::parse(&url)
            .map_err(|e| ClientError::ConfigurationError(format!("Invalid URL '{url}': {e}")))?;

        let subscription_key = self.config.subscription_key.resolve().ok_or_else(|| {
            ClientError::ConfigurationError(format!(
                "Subscription key is not available from {}",
                self.config.subscription_key.describe()
            ))
        })?;

        debug!("{} {url}", request.method);

        let mut request_builder = self
            .client
            .request(http_method(request.method), url)
            .header(SUBSCRIPTION_KEY_HEADER, subscription_key.expose_secret())
            .header(
                reqwest::header::AUTHORIZATION,
                session.access_token().bearer(),
            );

        if let Some(body) = &request.body {
            request_builder = request_builder.json(body);
        }

        let response = request_builder
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let retry_after = retry_after(response.headers());
        let response_text = response.text().await.map_err(|e| {
            if !status.is_success() {
                warn!("Failed to read error response body: {e}");
            }
            self.transport_error(e)
        })?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &response_text, retry_after));
        }

        debug!(
            "Raw API response: {}",
            &response_text.chars().take(500).collect::<String>()
        );

        if response_text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&response_text)?)
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::TimeoutError {
                timeout: self.config.timeout,
            }
        } else {
            ClientError::NetworkError(err)
        }
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
    }
}

fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn status_error(status: u16, text: &str, retry_after: Option<Duration>) -> ClientError {
    let body = serde_json::from_str::<Value>(text).unwrap_or_else(|parse_err| {
        debug!("Failed to parse error response as JSON: {parse_err}. Using raw text instead.");
        Value::String(text.to_string())
    });
    let message = extract_message(&body, text);

    match status {
        401 => ClientError::AuthenticationError { message, body },
        429 => ClientError::RateLimitError {
            retry_after,
            message,
            body,
        },
        500..=599 => ClientError::ServiceUnavailable {
            status,
            message,
            body,
        },
        _ => ClientError::Api {
            status,
            message,
            body,
        },
    }
}
