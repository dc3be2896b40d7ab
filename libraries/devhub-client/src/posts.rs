//! Post feed operations.

use crate::client::{endpoint, parse_response, transport_error};
use crate::error::Result;
use crate::types::DeletedPost;
use devhub_core::types::{ItemId, Post, PostId, TextInput};
use reqwest::{Client, Method};
use tracing::debug;

/// Posts client for a DevHub server. Every route requires a token.
pub struct PostsClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: &'a str,
}

impl<'a> PostsClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: &'a str) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>> {
        let posts: Vec<Post> = self.send(Method::GET, &["api", "posts", "all"], None).await?;
        debug!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    /// A single post.
    pub async fn get(&self, id: &PostId) -> Result<Post> {
        self.send(Method::GET, &["api", "posts", "post", id.as_str()], None)
            .await
    }

    /// Publish a post.
    pub async fn create(&self, text: &str) -> Result<Post> {
        let body = text_body(text);
        self.send(Method::POST, &["api", "posts"], Some(&body)).await
    }

    /// Delete one of the caller's posts; returns the removed id.
    pub async fn delete(&self, id: &PostId) -> Result<PostId> {
        let deleted: DeletedPost = self
            .send(Method::DELETE, &["api", "posts", "post", id.as_str()], None)
            .await?;
        Ok(deleted.id)
    }

    /// Like a post. Liking twice leaves a single like.
    pub async fn like(&self, id: &PostId) -> Result<Post> {
        self.send(Method::POST, &["api", "posts", "like", id.as_str()], None)
            .await
    }

    /// Withdraw the caller's like.
    pub async fn unlike(&self, id: &PostId) -> Result<Post> {
        self.send(Method::DELETE, &["api", "posts", "like", id.as_str()], None)
            .await
    }

    /// Comment on a post; the new comment comes first in the result.
    pub async fn add_comment(&self, id: &PostId, text: &str) -> Result<Post> {
        let body = text_body(text);
        self.send(
            Method::POST,
            &["api", "posts", "comment", id.as_str()],
            Some(&body),
        )
        .await
    }

    /// Remove a comment by id.
    pub async fn remove_comment(&self, id: &PostId, comment_id: &ItemId) -> Result<Post> {
        self.send(
            Method::DELETE,
            &["api", "posts", "comment", id.as_str(), comment_id.as_str()],
            None,
        )
        .await
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&TextInput>,
    ) -> Result<T> {
        let url = endpoint(self.base_url, segments)?;
        debug!(method = %method, url = %url, "Posts request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(self.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(transport_error)?;
        parse_response(response, "post").await
    }
}

fn text_body(text: &str) -> TextInput {
    TextInput {
        text: Some(text.to_string()),
    }
}
