/// User domain type
use super::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// User account. The password hash is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    #[serde(rename = "_id")]
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Login email, unique across users
    pub email: String,

    /// Avatar image URI
    pub avatar: String,

    /// Account creation timestamp
    pub date: DateTime<Utc>,
}

impl User {
    /// The public part of the user embedded in populated views
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Name and avatar of a user, as populated into profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub avatar: String,
}

/// Data required to create a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub password_hash: String,
}

/// A user together with its stored password hash, used only for login
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Gravatar URL for an email (200px, PG rating, "mystery man" fallback).
pub fn gravatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = Sha256::digest(normalized.as_bytes());
    format!("https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", digest)
}
