//! Client-side state slices.

use devhub_core::types::{PopulatedProfile, Post, UserSummary};
use devhub_core::FieldErrors;

/// Where a list/get request for a slice stands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last request never got a response
    Failed(String),
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Post feed and the post being viewed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostState {
    pub posts: Vec<Post>,
    pub post: Option<Post>,
    pub status: RequestStatus,
}

/// The caller's profile, or the one being viewed, and the developer list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<PopulatedProfile>,
    pub profiles: Vec<PopulatedProfile>,
    pub status: RequestStatus,
}

/// Who is logged in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserSummary>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Everything the client renders from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub auth: AuthState,
    pub posts: PostState,
    pub profile: ProfileState,
    /// Field-keyed messages from the last failed mutation
    pub errors: FieldErrors,
}
