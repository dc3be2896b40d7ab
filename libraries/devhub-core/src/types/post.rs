/// Post aggregate with likes and comments
use super::ids::{ItemId, PostId, UserId};
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post on the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub user: UserId,
    pub text: String,
    pub name: String,
    pub avatar: String,
    /// One entry per liking user, in like order
    #[serde(default)]
    pub likes: Vec<Like>,
    /// Newest first
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

impl Post {
    /// Create a post authored by `author`. Name and avatar are copied so the
    /// post keeps rendering after the author changes them.
    pub fn new(author: &User, post: NewPost) -> Self {
        Self {
            id: PostId::generate(),
            user: author.id.clone(),
            text: post.text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        }
    }
}

/// A user's like on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub user: UserId,
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub user: UserId,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// Validated post input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub text: String,
}

/// Validated comment input, bound to its author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub user: UserId,
    pub text: String,
    pub name: String,
    pub avatar: String,
}

impl NewComment {
    /// Bind comment text to the commenting user
    pub fn by(author: &User, text: impl Into<String>) -> Self {
        Self {
            user: author.id.clone(),
            text: text.into(),
            name: author.name.clone(),
            avatar: author.avatar.clone(),
        }
    }

    pub(crate) fn into_comment(self) -> Comment {
        Comment {
            id: ItemId::generate(),
            user: self.user,
            text: self.text,
            name: self.name,
            avatar: self.avatar,
            date: Utc::now(),
        }
    }
}
