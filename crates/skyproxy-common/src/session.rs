//! Authenticated session types.
//!
//! Sessions are produced and refreshed by an external authentication flow.
//! This module only models the piece the gateway reads: the bearer token.
//!
//! # Examples
//!
//! ```
//! use skyproxy_common::{AuthenticatedSession, Session};
//! use secrecy::ExposeSecret;
//!
//! let session = Session::from_json(r#"{"ticket": {"access_token": "abc123"}}"#)?;
//! assert_eq!(session.access_token().expose_secret(), "abc123");
//! # Ok::<(), skyproxy_common::SessionError>(())
//! ```

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::SessionError;

/// A non-empty OAuth bearer token.
///
/// The token is held in a [`SecretString`] and is redacted from `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wraps a token, rejecting empty or whitespace-only values.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyAccessToken`] if the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyAccessToken);
        }
        Ok(Self(SecretString::new(token.into())))
    }

    /// Formats the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }
}

impl ExposeSecret<str> for AccessToken {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<String> for AccessToken {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Capability implemented by anything that can authenticate a gateway call.
///
/// Holding a value of this trait guarantees a token is present; the gateway
/// never has to probe the session's shape at request time.
pub trait AuthenticatedSession: Send + Sync {
    /// The bearer token to send with the request.
    fn access_token(&self) -> &AccessToken;
}

/// Token ticket issued by the authorization flow.
#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    /// Bearer token for the SKY API.
    pub access_token: AccessToken,
    /// Token type reported by the authorization server, usually `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Refresh token. Carried through but never used by the gateway.
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
}

/// Session as stored by the web tier: `{ "ticket": { "access_token": ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// The authorization ticket.
    pub ticket: Ticket,
}

impl Session {
    /// Builds a session around an already validated token.
    #[must_use]
    pub const fn new(access_token: AccessToken) -> Self {
        Self {
            ticket: Ticket {
                access_token,
                token_type: None,
                expires_in: None,
                refresh_token: None,
            },
        }
    }

    /// Builds a session from a raw token string.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyAccessToken`] if the token is blank.
    pub fn from_token(token: impl Into<String>) -> Result<Self, SessionError> {
        AccessToken::new(token).map(Self::new)
    }

    /// Decodes and validates a JSON-encoded session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyAccessToken`] if the ticket's token is
    /// blank, or [`SessionError::Malformed`] for any other decoding failure.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let raw: RawSession =
            serde_json::from_str(json).map_err(|e| SessionError::Malformed(e.to_string()))?;

        Ok(Self {
            ticket: Ticket {
                access_token: AccessToken::new(raw.ticket.access_token)?,
                token_type: raw.ticket.token_type,
                expires_in: raw.ticket.expires_in,
                refresh_token: raw.ticket.refresh_token,
            },
        })
    }
}

/// Wire shape of a session before the token is validated.
#[derive(Deserialize)]
struct RawSession {
    ticket: RawTicket,
}

#[derive(Deserialize)]
struct RawTicket {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    refresh_token: Option<SecretString>,
}

impl AuthenticatedSession for Session {
    fn access_token(&self) -> &AccessToken {
        &self.ticket.access_token
    }
}

impl AuthenticatedSession for AccessToken {
    fn access_token(&self) -> &AccessToken {
        self
    }
}
