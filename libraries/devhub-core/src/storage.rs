//! Storage trait for the document store

use crate::error::{HubError, Result};
use crate::types::{
    CreateUser, PopulatedProfile, Post, PostId, Profile, User, UserCredentials, UserId,
};
use async_trait::async_trait;

/// Document operations the server performs on users, profiles and posts.
///
/// Aggregates are read and written whole: a nested mutation is a load,
/// an in-memory change through the mutation model, and a save of the
/// parent, performed atomically per document by `modify_*`. Uniqueness (user email, profile handle, one profile per user)
/// is enforced by the implementation and reported as
/// [`HubError::Conflict`].
#[async_trait]
pub trait Storage: Send + Sync {
    // ========================================================================
    // Users
    // ========================================================================

    /// Create a user; `Conflict { field: "email" }` when the email is taken
    async fn create_user(&self, user: CreateUser) -> Result<User>;

    /// Get user by ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Find a user and its password hash by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;

    /// Get all users
    async fn get_all_users(&self) -> Result<Vec<User>>;

    /// Delete a user; `false` when no such user existed
    async fn delete_user(&self, id: &UserId) -> Result<bool>;

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Find the profile owned by `user`
    async fn find_profile_by_user(&self, user: &UserId) -> Result<Option<Profile>>;

    /// Find the profile with `handle`
    async fn find_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>>;

    /// Get all profiles
    async fn get_all_profiles(&self) -> Result<Vec<Profile>>;

    /// Insert a new profile
    async fn create_profile(&self, profile: Profile) -> Result<Profile>;

    /// Apply `change` to the profile owned by `user` and persist it.
    ///
    /// `change` returns whether it modified the profile; nothing is written
    /// when it returns `false`. It may run more than once if another writer
    /// updates the profile concurrently, so it must not depend on having run
    /// before. `None` when the user has no profile.
    async fn modify_profile(
        &self,
        user: &UserId,
        change: &mut (dyn for<'p> FnMut(&'p mut Profile) -> bool + Send),
    ) -> Result<Option<Profile>>;

    /// Delete the profile owned by `user`; `false` when there was none
    async fn delete_profile_by_user(&self, user: &UserId) -> Result<bool>;

    // ========================================================================
    // Posts
    // ========================================================================

    /// Get all posts, newest first
    async fn get_all_posts(&self) -> Result<Vec<Post>>;

    /// Get post by ID
    async fn get_post(&self, id: &PostId) -> Result<Option<Post>>;

    /// Insert a new post
    async fn create_post(&self, post: Post) -> Result<Post>;

    /// Apply `change` to a post and persist it, with the same contract as
    /// [`Storage::modify_profile`]. `None` when there is no such post.
    async fn modify_post(
        &self,
        id: &PostId,
        change: &mut (dyn for<'p> FnMut(&'p mut Post) -> bool + Send),
    ) -> Result<Option<Post>>;

    /// Delete a post; `false` when no such post existed
    async fn delete_post(&self, id: &PostId) -> Result<bool>;

    // ========================================================================
    // Population
    // ========================================================================

    /// Expand the profile's user reference into name and avatar
    async fn populate_profile(&self, profile: Profile) -> Result<PopulatedProfile> {
        let user = self
            .get_user(&profile.user)
            .await?
            .ok_or_else(|| HubError::not_found("User", profile.user.as_str()))?;
        Ok(profile.populate(user.summary()))
    }

    /// Populate many profiles, skipping any whose user no longer exists
    async fn populate_profiles(&self, profiles: Vec<Profile>) -> Result<Vec<PopulatedProfile>> {
        let mut populated = Vec::with_capacity(profiles.len());
        for profile in profiles {
            if let Some(user) = self.get_user(&profile.user).await? {
                populated.push(profile.populate(user.summary()));
            }
        }
        Ok(populated)
    }
}
