//! Profile operations.

use crate::client::{endpoint, parse_response, transport_error};
use crate::error::{ClientError, Result};
use crate::types::SuccessResponse;
use devhub_core::types::{
    EducationInput, ExperienceInput, ItemId, PopulatedProfile, ProfileInput, UserId,
};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Profiles client for a DevHub server.
///
/// Lookups by handle or user id and the profile listing are public;
/// everything touching the caller's own profile needs a token.
pub struct ProfilesClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: Option<&'a str>,
}

impl<'a> ProfilesClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: Option<&'a str>) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// The caller's own profile.
    pub async fn current(&self) -> Result<PopulatedProfile> {
        self.send::<(), _>(Method::GET, &["api", "profile"], None, true)
            .await
    }

    /// Every profile.
    pub async fn list(&self) -> Result<Vec<PopulatedProfile>> {
        let profiles: Vec<PopulatedProfile> = self
            .send::<(), _>(Method::GET, &["api", "profile", "all"], None, false)
            .await?;
        debug!(count = profiles.len(), "Fetched profiles");
        Ok(profiles)
    }

    /// Profile by handle.
    pub async fn by_handle(&self, handle: &str) -> Result<PopulatedProfile> {
        self.send::<(), _>(
            Method::GET,
            &["api", "profile", "handle", handle],
            None,
            false,
        )
        .await
    }

    /// Profile by owning user.
    pub async fn by_user(&self, user_id: &UserId) -> Result<PopulatedProfile> {
        self.send::<(), _>(
            Method::GET,
            &["api", "profile", "user", user_id.as_str()],
            None,
            false,
        )
        .await
    }

    /// Create the caller's profile, or update the provided fields of it.
    pub async fn save(&self, input: &ProfileInput) -> Result<PopulatedProfile> {
        self.send(Method::POST, &["api", "profile"], Some(input), true)
            .await
    }

    /// Add a work history entry at the front.
    pub async fn add_experience(&self, input: &ExperienceInput) -> Result<PopulatedProfile> {
        self.send(Method::POST, &["api", "profile", "experience"], Some(input), true)
            .await
    }

    /// Remove a work history entry by id.
    pub async fn remove_experience(&self, id: &ItemId) -> Result<PopulatedProfile> {
        self.send::<(), _>(
            Method::DELETE,
            &["api", "profile", "experience", id.as_str()],
            None,
            true,
        )
        .await
    }

    /// Add an education entry at the front.
    pub async fn add_education(&self, input: &EducationInput) -> Result<PopulatedProfile> {
        self.send(Method::POST, &["api", "profile", "education"], Some(input), true)
            .await
    }

    /// Remove an education entry by id.
    pub async fn remove_education(&self, id: &ItemId) -> Result<PopulatedProfile> {
        self.send::<(), _>(
            Method::DELETE,
            &["api", "profile", "education", id.as_str()],
            None,
            true,
        )
        .await
    }

    /// Delete the caller's profile and account.
    pub async fn delete_account(&self) -> Result<SuccessResponse> {
        self.send::<(), _>(Method::DELETE, &["api", "profile"], None, true)
            .await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        requires_auth: bool,
    ) -> Result<T> {
        let url = endpoint(self.base_url, segments)?;
        debug!(method = %method, url = %url, "Profile request");

        let mut request = self.http.request(method, url);
        match self.access_token {
            Some(token) => request = request.bearer_auth(token),
            None if requires_auth => return Err(ClientError::AuthRequired),
            None => {}
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        parse_response(response, "profile").await
    }
}
