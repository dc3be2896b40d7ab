//! Authentication endpoints.

use crate::client::{parse_response, transport_error};
use crate::error::{ClientError, Result};
use crate::types::LoginResponse;
use devhub_core::types::{LoginInput, RegisterInput, User};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Authentication client for a DevHub server.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Create an account.
    pub async fn register(&self, input: &RegisterInput) -> Result<User> {
        let url = format!("{}/api/auth/register", self.base_url);
        debug!(url = %url, "Registering user");

        let response = self
            .http
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(transport_error)?;

        let user: User = parse_response(response, "registered user").await?;
        info!(user_id = %user.id, "Registration successful");

        Ok(user)
    }

    /// Exchange credentials for a token.
    pub async fn login(&self, input: &LoginInput) -> Result<LoginResponse> {
        let url = format!("{}/api/auth/login", self.base_url);
        debug!(url = %url, "Attempting login");

        let response = self
            .http
            .post(&url)
            .json(input)
            .send()
            .await
            .map_err(transport_error)?;

        match parse_response::<LoginResponse>(response, "login response").await {
            Ok(login) => {
                info!("Login successful");
                Ok(login)
            }
            Err(e @ (ClientError::Validation(_) | ClientError::NotFound(_))) => {
                warn!(error = %e, "Login rejected");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// The user the token belongs to.
    pub async fn current(&self, access_token: &str) -> Result<User> {
        let url = format!("{}/api/auth/current", self.base_url);
        debug!(url = %url, "Getting current user");

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        parse_response(response, "current user").await
    }
}
