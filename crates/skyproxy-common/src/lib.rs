//! # skyproxy-common
//!
//! Shared types for the SKY API constituent gateway:
//! - Authenticated session capability and bearer token
//! - Gateway configuration (base URL, timeout, subscription key source)
//! - Endpoint requests and constituent path templates
//!
//! ## Example
//!
//! ```
//! use skyproxy_common::{Config, EndpointRequest, Session, endpoint};
//!
//! let session = Session::from_token("access-token")?;
//! let config = Config::default().with_subscription_key("subscription-key");
//! let request = EndpointRequest::get(endpoint::constituent_path("280"));
//!
//! assert_eq!(request.path, "constituent/v1/constituents/280");
//! # let _ = (session, config);
//! # Ok::<(), skyproxy_common::SessionError>(())
//! ```

/// Gateway configuration and subscription key sources.
pub mod config;
/// Endpoint request model and path templates.
pub mod endpoint;
pub mod error;
/// Session capability and access token.
pub mod session;

pub use config::{
    Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, SUBSCRIPTION_KEY_ENV, SUBSCRIPTION_KEY_HEADER,
    SubscriptionKey,
};
pub use endpoint::{EndpointRequest, Method};
pub use error::SessionError;
pub use session::{AccessToken, AuthenticatedSession, Session, Ticket};
