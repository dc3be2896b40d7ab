//! DevHub Client
//!
//! HTTP client and client-side state for the DevHub API.
//!
//! # Features
//!
//! - **Client**: one method per remote action, errors classified by kind
//! - **State**: per-resource slices driven by a pure reducer
//! - **Store**: `watch`-backed container with subscribe/snapshot
//! - **Actions**: remote calls that dispatch their outcome into the store
//!
//! # Example
//!
//! ```ignore
//! use devhub_client::{Actions, ClientConfig, DevHubClient, Store};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(DevHubClient::new(ClientConfig::new("http://localhost:5000"))?);
//!     let actions = Actions::new(client, Store::default());
//!
//!     actions.auth().login("jane@example.com", "secret1").await?;
//!     actions.posts().load_all().await?;
//!
//!     println!("{} posts", actions.store().snapshot().posts.posts.len());
//!     Ok(())
//! }
//! ```

mod actions;
mod auth;
mod client;
mod error;
mod posts;
mod profiles;
pub mod reducer;
mod state;
mod store;
mod types;

pub use actions::{Actions, AuthActions, PostActions, ProfileActions};
pub use client::{DevHubClient, PostsClientHandle, ProfilesClientHandle};
pub use error::{ClientError, Result};
pub use reducer::{reduce, AuthEvent, ClientEvent, PostEvent, ProfileEvent};
pub use state::{AuthState, ClientState, PostState, ProfileState, RequestStatus};
pub use store::Store;
pub use types::{ClientConfig, DeletedPost, HealthResponse, LoginResponse, SuccessResponse};

// Sub-clients for direct use
pub use auth::AuthClient;
pub use posts::PostsClient;
pub use profiles::ProfilesClient;
