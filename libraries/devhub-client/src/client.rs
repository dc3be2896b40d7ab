//! Main DevHub client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::posts::PostsClient;
use crate::profiles::ProfilesClient;
use crate::types::{ClientConfig, HealthResponse, LoginResponse, SuccessResponse};
use devhub_core::types::{LoginInput, RegisterInput, User};
use devhub_core::FieldErrors;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Main client for a DevHub server.
///
/// Holds the base URL and the access token issued at login. Resource
/// operations go through the handles returned by [`posts`](Self::posts)
/// and [`profiles`](Self::profiles).
///
/// # Example
///
/// ```ignore
/// use devhub_client::{ClientConfig, DevHubClient};
///
/// let client = DevHubClient::new(ClientConfig::new("https://devhub.example.com"))?;
/// client.login("jane@example.com", "secret1").await?;
///
/// let posts = client.posts().await?;
/// let feed = posts.client().list().await?;
/// ```
pub struct DevHubClient {
    http: Client,
    config: Arc<RwLock<ClientConfig>>,
}

impl DevHubClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let normalized_config = ClientConfig {
            url,
            access_token: config.access_token,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("DevHub/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has an access token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.access_token.is_some()
    }

    /// Check that the server is up. Does not require authentication.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/api/health", self.url().await);
        debug!(url = %url, "Checking server health");

        let response = self.http.get(&url).send().await.map_err(transport_error)?;
        parse_response(response, "health").await
    }

    /// Register a new account. The caller still has to log in.
    pub async fn register(&self, input: &RegisterInput) -> Result<User> {
        let url = self.url().await;
        AuthClient::new(&self.http, &url).register(input).await
    }

    /// Login with email and password.
    ///
    /// On success the token is stored for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.url().await;

        let input = LoginInput {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let response = AuthClient::new(&self.http, &url).login(&input).await?;

        self.set_token(response.bare_token().to_string()).await;

        Ok(response)
    }

    /// Set the token directly (e.g., from stored credentials).
    pub async fn set_token(&self, access_token: String) {
        self.config.write().await.access_token = Some(access_token);
    }

    /// Get the current token.
    pub async fn token(&self) -> Option<String> {
        self.config.read().await.access_token.clone()
    }

    /// Clear the stored token (logout).
    pub async fn logout(&self) {
        self.config.write().await.access_token = None;
        info!("Logged out");
    }

    /// The logged-in user.
    pub async fn current_user(&self) -> Result<User> {
        let (url, token) = self.authenticated().await?;
        AuthClient::new(&self.http, &url).current(&token).await
    }

    /// Delete the logged-in user's profile and account, then log out.
    pub async fn delete_account(&self) -> Result<SuccessResponse> {
        let (url, token) = self.authenticated().await?;
        let response = ProfilesClient::new(&self.http, &url, Some(&token))
            .delete_account()
            .await?;

        self.logout().await;

        Ok(response)
    }

    /// Get a handle for post operations.
    ///
    /// Returns an error if not authenticated.
    pub async fn posts(&self) -> Result<PostsClientHandle> {
        let (url, access_token) = self.authenticated().await?;

        Ok(PostsClientHandle {
            http: self.http.clone(),
            url,
            access_token,
        })
    }

    /// Get a handle for profile operations.
    ///
    /// Public lookups work without a token; the rest return
    /// [`ClientError::AuthRequired`].
    pub async fn profiles(&self) -> ProfilesClientHandle {
        let config = self.config.read().await;

        ProfilesClientHandle {
            http: self.http.clone(),
            url: config.url.clone(),
            access_token: config.access_token.clone(),
        }
    }

    async fn authenticated(&self) -> Result<(String, String)> {
        let config = self.config.read().await;
        let token = config
            .access_token
            .clone()
            .ok_or(ClientError::AuthRequired)?;
        Ok((config.url.clone(), token))
    }
}

/// Handle for post operations.
pub struct PostsClientHandle {
    http: Client,
    url: String,
    access_token: String,
}

impl PostsClientHandle {
    /// Get the posts client.
    pub fn client(&self) -> PostsClient<'_> {
        PostsClient::new(&self.http, &self.url, &self.access_token)
    }
}

/// Handle for profile operations.
pub struct ProfilesClientHandle {
    http: Client,
    url: String,
    access_token: Option<String>,
}

impl ProfilesClientHandle {
    /// Get the profiles client.
    pub fn client(&self) -> ProfilesClient<'_> {
        ProfilesClient::new(&self.http, &self.url, self.access_token.as_deref())
    }
}

/// Append `segments` to the server URL, percent-encoding each one so that
/// user-chosen values such as handles stay a single path segment
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl(format!("{} cannot be a base URL", base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Classify a failure to get any response at all
pub(crate) fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Decode a success body, or classify the error response by status.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    response: Response,
    what: &str,
) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)));
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = %status, body = %body, "Request for {} failed", what);

    Err(classify_error(status, body))
}

fn classify_error(status: StatusCode, body: String) -> ClientError {
    let field_errors = || serde_json::from_str::<FieldErrors>(&body).ok();

    match status {
        StatusCode::UNAUTHORIZED => ClientError::AuthFailed(body),
        StatusCode::BAD_REQUEST => match field_errors() {
            Some(errors) => ClientError::Validation(errors),
            None => ClientError::ServerError {
                status: status.as_u16(),
                message: body,
            },
        },
        StatusCode::NOT_FOUND => ClientError::NotFound(
            field_errors().unwrap_or_else(|| FieldErrors::single("error", "Not found")),
        ),
        StatusCode::FORBIDDEN => ClientError::Forbidden(
            field_errors().unwrap_or_else(|| FieldErrors::single("error", "Forbidden")),
        ),
        _ => ClientError::ServerError {
            status: status.as_u16(),
            message: body,
        },
    }
}
