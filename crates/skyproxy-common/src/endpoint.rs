//! Endpoint requests and path templates for the constituent API.
//!
//! Paths are built by plain concatenation. Caller input is never escaped,
//! so characters such as `&` or `?` in a search term reach the URL as given.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root of every constituent endpoint.
pub const CONSTITUENT_BASE_URI: &str = "constituent/v1/";

/// HTTP method used by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    Get,
    /// HTTP POST with a JSON body.
    Post,
}

impl Method {
    /// The method name as it appears on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single outbound call, built per request and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, without a leading slash.
    pub path: String,
    /// JSON body, sent as-is when present.
    pub body: Option<Value>,
}

impl EndpointRequest {
    /// A GET request with no body.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// A POST request carrying `body`.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

impl fmt::Display for EndpointRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// `constituent/v1/constituents/{id}`
#[must_use]
pub fn constituent_path(constituent_id: &str) -> String {
    format!("{CONSTITUENT_BASE_URI}constituents/{constituent_id}")
}

/// `constituent/v1/constituents/search?searchText={name}`
#[must_use]
pub fn constituent_search_path(name: &str) -> String {
    format!("{CONSTITUENT_BASE_URI}constituents/search?searchText={name}")
}

/// `constituent/v1/constituents/{id}/profilepicture`
#[must_use]
pub fn constituent_profile_picture_path(constituent_id: &str) -> String {
    format!("{CONSTITUENT_BASE_URI}constituents/{constituent_id}/profilepicture")
}

/// `constituent/v1/notes`
#[must_use]
pub fn notes_path() -> String {
    format!("{CONSTITUENT_BASE_URI}notes")
}

/// Joins a base URL and an endpoint path with exactly one `/` between them.
#[must_use]
pub fn resolve_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
