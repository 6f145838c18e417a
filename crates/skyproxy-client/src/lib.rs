//! # skyproxy-client
//!
//! Authenticated proxy client for the SKY API constituent endpoints.
//!
//! [`SkyClient`] turns a logical operation into one HTTP call against the
//! SKY API, attaching the `bb-api-subscription-key` header and the session's
//! bearer token. Results come back as `Result<serde_json::Value, ClientError>`:
//! payloads are passed through untouched and failures are always `Err`.
//!
//! ## Example
//!
//! ```no_run
//! use skyproxy_client::{ConstituentApi, SkyClient};
//! use skyproxy_common::{Config, Session};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default().with_subscription_key_env("AUTH_SUBSCRIPTION_KEY");
//! let client = SkyClient::new(config)?;
//!
//! let session = Session::from_json(r#"{"ticket": {"access_token": "..."}}"#)?;
//! let results = client.get_constituent_search(&session, "Hernandez").await?;
//! println!("{results}");
//!
//! let note = serde_json::json!({
//!     "constituent_id": "280",
//!     "type": "General",
//!     "summary": "Phone call"
//! });
//! client.post_notes(&session, &note).await?;
//! # Ok(())
//! # }
//! ```

pub mod constituent;
pub mod error;
pub mod gateway;

pub use constituent::ConstituentApi;
pub use error::ClientError;
pub use gateway::{ERROR_LOG_PREFIX, SkyClient};
