//! Constituent endpoints.
//!
//! Each operation is a fixed-path call through [`SkyClient::proxy`].

use async_trait::async_trait;
use serde_json::Value;

use skyproxy_common::AuthenticatedSession;
use skyproxy_common::endpoint::{
    constituent_path, constituent_profile_picture_path, constituent_search_path, notes_path,
};

use crate::error::ClientError;
use crate::gateway::SkyClient;

/// Operations on SKY API constituent records.
///
/// Object-safe so callers can hold a `Box<dyn ConstituentApi>` and swap in a
/// fake for their own tests.
#[async_trait]
pub trait ConstituentApi: Send + Sync {
    /// Fetch a constituent by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    async fn get_constituent(
        &self,
        session: &dyn AuthenticatedSession,
        constituent_id: &str,
    ) -> Result<Value, ClientError>;

    /// Search constituents by name.
    ///
    /// `name` is appended to the query string exactly as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    async fn get_constituent_search(
        &self,
        session: &dyn AuthenticatedSession,
        name: &str,
    ) -> Result<Value, ClientError>;

    /// Fetch a constituent's profile picture metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    async fn get_constituent_profile_picture(
        &self,
        session: &dyn AuthenticatedSession,
        constituent_id: &str,
    ) -> Result<Value, ClientError>;

    /// Create a note. The payload is sent unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    async fn post_notes(
        &self,
        session: &dyn AuthenticatedSession,
        note: &Value,
    ) -> Result<Value, ClientError>;
}

#[async_trait]
impl ConstituentApi for SkyClient {
    async fn get_constituent(
        &self,
        session: &dyn AuthenticatedSession,
        constituent_id: &str,
    ) -> Result<Value, ClientError> {
        self.get(session, &constituent_path(constituent_id)).await
    }

    async fn get_constituent_search(
        &self,
        session: &dyn AuthenticatedSession,
        name: &str,
    ) -> Result<Value, ClientError> {
        self.get(session, &constituent_search_path(name)).await
    }

    async fn get_constituent_profile_picture(
        &self,
        session: &dyn AuthenticatedSession,
        constituent_id: &str,
    ) -> Result<Value, ClientError> {
        self.get(session, &constituent_profile_picture_path(constituent_id))
            .await
    }

    async fn post_notes(
        &self,
        session: &dyn AuthenticatedSession,
        note: &Value,
    ) -> Result<Value, ClientError> {
        self.post(session, &notes_path(), note).await
    }
}
