use crate::{posts, profiles, users};
use async_trait::async_trait;
use devhub_core::{error::Result, storage::Storage, types::*};
use sqlx::SqlitePool;

/// Local storage context using `SQLite`
#[derive(Clone)]
pub struct LocalStorageContext {
    pool: SqlitePool,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for LocalStorageContext {
    // Users
    async fn create_user(&self, user: CreateUser) -> Result<User> {
        Ok(users::create(&self.pool, user).await?)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(users::get_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        Ok(users::find_credentials_by_email(&self.pool, email).await?)
    }

    async fn get_all_users(&self) -> Result<Vec<User>> {
        Ok(users::get_all(&self.pool).await?)
    }

    async fn delete_user(&self, id: &UserId) -> Result<bool> {
        Ok(users::delete(&self.pool, id).await?)
    }

    // Profiles
    async fn find_profile_by_user(&self, user: &UserId) -> Result<Option<Profile>> {
        Ok(profiles::get_by_user(&self.pool, user).await?)
    }

    async fn find_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>> {
        Ok(profiles::get_by_handle(&self.pool, handle).await?)
    }

    async fn get_all_profiles(&self) -> Result<Vec<Profile>> {
        Ok(profiles::get_all(&self.pool).await?)
    }

    async fn create_profile(&self, profile: Profile) -> Result<Profile> {
        Ok(profiles::create(&self.pool, profile).await?)
    }

    async fn modify_profile(
        &self,
        user: &UserId,
        change: &mut (dyn for<'p> FnMut(&'p mut Profile) -> bool + Send),
    ) -> Result<Option<Profile>> {
        Ok(profiles::modify(&self.pool, user, change).await?)
    }

    async fn delete_profile_by_user(&self, user: &UserId) -> Result<bool> {
        Ok(profiles::delete_by_user(&self.pool, user).await?)
    }

    // Posts
    async fn get_all_posts(&self) -> Result<Vec<Post>> {
        Ok(posts::get_all(&self.pool).await?)
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<Post>> {
        Ok(posts::get_by_id(&self.pool, id).await?)
    }

    async fn create_post(&self, post: Post) -> Result<Post> {
        Ok(posts::create(&self.pool, post).await?)
    }

    async fn modify_post(
        &self,
        id: &PostId,
        change: &mut (dyn for<'p> FnMut(&'p mut Post) -> bool + Send),
    ) -> Result<Option<Post>> {
        Ok(posts::modify(&self.pool, id, change).await?)
    }

    async fn delete_post(&self, id: &PostId) -> Result<bool> {
        Ok(posts::delete(&self.pool, id).await?)
    }
}
