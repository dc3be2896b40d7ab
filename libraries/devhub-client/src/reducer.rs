//! Pure state transitions.
//!
//! Each slice has its own event type and reducer; [`reduce`] routes a
//! [`ClientEvent`] to the slice it belongs to. Reducers never fail: an
//! event that does not apply leaves the state as it was.

use crate::state::{AuthState, ClientState, PostState, ProfileState, RequestStatus};
use devhub_core::types::{PopulatedProfile, Post, PostId, UserSummary};
use devhub_core::FieldErrors;

/// Post slice events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostEvent {
    LoadingStarted,
    /// Feed arrived; `None` means the request produced no data
    ListReceived(Option<Vec<Post>>),
    SingleReceived(Option<Post>),
    /// The list/get request never got a response
    LoadFailed(String),
    Created(Post),
    Deleted(PostId),
    /// A like or unlike came back with the whole post
    LikeUpdated(Post),
    /// A comment add/remove came back with the whole post
    PostUpdated(Post),
}

/// Profile slice events
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileEvent {
    LoadingStarted,
    ProfileReceived(Option<PopulatedProfile>),
    ProfilesReceived(Option<Vec<PopulatedProfile>>),
    LoadFailed(String),
    ProfileCleared,
}

/// Auth slice events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    CurrentUserSet(Option<UserSummary>),
}

/// Any event the store accepts
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Posts(PostEvent),
    Profile(ProfileEvent),
    Auth(AuthEvent),
    ErrorsReceived(FieldErrors),
    ErrorsCleared,
}

impl From<PostEvent> for ClientEvent {
    fn from(event: PostEvent) -> Self {
        Self::Posts(event)
    }
}

impl From<ProfileEvent> for ClientEvent {
    fn from(event: ProfileEvent) -> Self {
        Self::Profile(event)
    }
}

impl From<AuthEvent> for ClientEvent {
    fn from(event: AuthEvent) -> Self {
        Self::Auth(event)
    }
}

/// Root reducer
pub fn reduce(mut state: ClientState, event: &ClientEvent) -> ClientState {
    match event {
        ClientEvent::Posts(e) => state.posts = reduce_posts(state.posts, e),
        ClientEvent::Profile(e) => state.profile = reduce_profile(state.profile, e),
        ClientEvent::Auth(e) => state.auth = reduce_auth(state.auth, e),
        ClientEvent::ErrorsReceived(errors) => state.errors = errors.clone(),
        ClientEvent::ErrorsCleared => state.errors = FieldErrors::new(),
    }
    state
}

pub fn reduce_posts(mut state: PostState, event: &PostEvent) -> PostState {
    match event {
        PostEvent::LoadingStarted => state.status = RequestStatus::Loading,
        PostEvent::ListReceived(posts) => {
            state.posts = posts.clone().unwrap_or_default();
            state.status = RequestStatus::Loaded;
        }
        PostEvent::SingleReceived(post) => {
            state.post = post.clone();
            state.status = RequestStatus::Loaded;
        }
        PostEvent::LoadFailed(message) => state.status = RequestStatus::Failed(message.clone()),
        PostEvent::Created(post) => state.posts.insert(0, post.clone()),
        PostEvent::Deleted(id) => state.posts.retain(|p| &p.id != id),
        PostEvent::LikeUpdated(updated) => {
            if let Some(slot) = state.posts.iter_mut().find(|p| p.id == updated.id) {
                *slot = updated.clone();
            }
        }
        PostEvent::PostUpdated(updated) => {
            if state.post.as_ref().is_some_and(|p| p.id == updated.id) {
                state.post = Some(updated.clone());
            }
        }
    }
    state
}

pub fn reduce_profile(mut state: ProfileState, event: &ProfileEvent) -> ProfileState {
    match event {
        ProfileEvent::LoadingStarted => state.status = RequestStatus::Loading,
        ProfileEvent::ProfileReceived(profile) => {
            state.profile = profile.clone();
            state.status = RequestStatus::Loaded;
        }
        ProfileEvent::ProfilesReceived(profiles) => {
            state.profiles = profiles.clone().unwrap_or_default();
            state.status = RequestStatus::Loaded;
        }
        ProfileEvent::LoadFailed(message) => {
            state.status = RequestStatus::Failed(message.clone());
        }
        ProfileEvent::ProfileCleared => state.profile = None,
    }
    state
}

pub fn reduce_auth(mut state: AuthState, event: &AuthEvent) -> AuthState {
    match event {
        AuthEvent::CurrentUserSet(user) => state.user = user.clone(),
    }
    state
}
