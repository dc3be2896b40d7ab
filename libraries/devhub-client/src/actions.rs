//! Remote actions that feed their outcome into a [`Store`].
//!
//! Reads (list/get) dispatch `LoadingStarted` first and a received event
//! with `None` when the request fails. Mutations skip the loading
//! transition; failures land in the error slice and successes clear it.

use crate::client::DevHubClient;
use crate::error::{ClientError, Result};
use crate::reducer::{AuthEvent, ClientEvent, PostEvent, ProfileEvent};
use crate::store::Store;
use devhub_core::types::{
    EducationInput, ExperienceInput, ItemId, PopulatedProfile, Post, PostId, ProfileInput,
    RegisterInput, User, UserId,
};
use std::sync::Arc;
use tracing::debug;

/// Client plus store; hands out per-resource action groups.
#[derive(Clone)]
pub struct Actions {
    client: Arc<DevHubClient>,
    store: Store,
}

impl Actions {
    pub fn new(client: Arc<DevHubClient>, store: Store) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn auth(&self) -> AuthActions<'_> {
        AuthActions { actions: self }
    }

    pub fn posts(&self) -> PostActions<'_> {
        PostActions { actions: self }
    }

    pub fn profile(&self) -> ProfileActions<'_> {
        ProfileActions { actions: self }
    }

    fn mutation_succeeded(&self, event: impl Into<ClientEvent>) {
        self.store.dispatch(event);
        self.store.dispatch(ClientEvent::ErrorsCleared);
    }

    fn mutation_failed(&self, err: &ClientError) {
        debug!(error = %err, "Mutation failed");
        self.store
            .dispatch(ClientEvent::ErrorsReceived(err.field_errors()));
    }

    fn read_failed(&self, err: &ClientError, received: ClientEvent, failed: ClientEvent) {
        debug!(error = %err, "Read failed");
        self.store.dispatch(received);
        if err.is_transport() {
            self.store.dispatch(failed);
        }
    }
}

/// Register, login, logout, account deletion
pub struct AuthActions<'a> {
    actions: &'a Actions,
}

impl AuthActions<'_> {
    pub async fn register(&self, input: &RegisterInput) -> Result<User> {
        match self.actions.client.register(input).await {
            Ok(user) => {
                self.actions.store.dispatch(ClientEvent::ErrorsCleared);
                Ok(user)
            }
            Err(e) => {
                self.actions.mutation_failed(&e);
                Err(e)
            }
        }
    }

    /// Log in and record the current user
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let outcome = async {
            self.actions.client.login(email, password).await?;
            self.actions.client.current_user().await
        }
        .await;

        match outcome {
            Ok(user) => {
                self.actions
                    .mutation_succeeded(AuthEvent::CurrentUserSet(Some(user.summary())));
                Ok(user)
            }
            Err(e) => {
                self.actions.mutation_failed(&e);
                Err(e)
            }
        }
    }

    pub async fn logout(&self) {
        self.actions.client.logout().await;
        self.actions.store.dispatch(ProfileEvent::ProfileCleared);
        self.actions.store.dispatch(AuthEvent::CurrentUserSet(None));
    }

    /// Delete the profile and account, then forget the user
    pub async fn delete_account(&self) -> Result<()> {
        match self.actions.client.delete_account().await {
            Ok(_) => {
                self.actions.store.dispatch(ProfileEvent::ProfileCleared);
                self.actions
                    .mutation_succeeded(AuthEvent::CurrentUserSet(None));
                Ok(())
            }
            Err(e) => {
                self.actions.mutation_failed(&e);
                Err(e)
            }
        }
    }
}

/// Feed actions
pub struct PostActions<'a> {
    actions: &'a Actions,
}

impl PostActions<'_> {
    pub async fn load_all(&self) -> Result<Vec<Post>> {
        let store = &self.actions.store;
        store.dispatch(PostEvent::LoadingStarted);

        let outcome = async { self.actions.client.posts().await?.client().list().await }.await;

        match outcome {
            Ok(posts) => {
                store.dispatch(PostEvent::ListReceived(Some(posts.clone())));
                Ok(posts)
            }
            Err(e) => {
                self.actions.read_failed(
                    &e,
                    PostEvent::ListReceived(None).into(),
                    PostEvent::LoadFailed(e.to_string()).into(),
                );
                Err(e)
            }
        }
    }

    pub async fn load(&self, id: &PostId) -> Result<Post> {
        let store = &self.actions.store;
        store.dispatch(PostEvent::LoadingStarted);

        let outcome = async { self.actions.client.posts().await?.client().get(id).await }.await;

        match outcome {
            Ok(post) => {
                store.dispatch(PostEvent::SingleReceived(Some(post.clone())));
                Ok(post)
            }
            Err(e) => {
                self.actions.read_failed(
                    &e,
                    PostEvent::SingleReceived(None).into(),
                    PostEvent::LoadFailed(e.to_string()).into(),
                );
                Err(e)
            }
        }
    }

    pub async fn create(&self, text: &str) -> Result<Post> {
        let outcome = async { self.actions.client.posts().await?.client().create(text).await }.await;
        self.finish(outcome, PostEvent::Created)
    }

    pub async fn delete(&self, id: &PostId) -> Result<PostId> {
        let outcome = async { self.actions.client.posts().await?.client().delete(id).await }.await;
        self.finish(outcome, PostEvent::Deleted)
    }

    pub async fn like(&self, id: &PostId) -> Result<Post> {
        let outcome = async { self.actions.client.posts().await?.client().like(id).await }.await;
        self.finish(outcome, PostEvent::LikeUpdated)
    }

    pub async fn unlike(&self, id: &PostId) -> Result<Post> {
        let outcome = async { self.actions.client.posts().await?.client().unlike(id).await }.await;
        self.finish(outcome, PostEvent::LikeUpdated)
    }

    pub async fn add_comment(&self, id: &PostId, text: &str) -> Result<Post> {
        let outcome = async {
            self.actions
                .client
                .posts()
                .await?
                .client()
                .add_comment(id, text)
                .await
        }
        .await;
        self.finish(outcome, PostEvent::PostUpdated)
    }

    pub async fn remove_comment(&self, id: &PostId, comment_id: &ItemId) -> Result<Post> {
        let outcome = async {
            self.actions
                .client
                .posts()
                .await?
                .client()
                .remove_comment(id, comment_id)
                .await
        }
        .await;
        self.finish(outcome, PostEvent::PostUpdated)
    }

    fn finish<T: Clone>(&self, outcome: Result<T>, event: fn(T) -> PostEvent) -> Result<T> {
        match outcome {
            Ok(value) => {
                self.actions.mutation_succeeded(event(value.clone()));
                Ok(value)
            }
            Err(e) => {
                self.actions.mutation_failed(&e);
                Err(e)
            }
        }
    }
}

/// Profile actions
pub struct ProfileActions<'a> {
    actions: &'a Actions,
}

impl ProfileActions<'_> {
    /// Load the caller's own profile. A user without one ends up with
    /// `profile == None` and no error.
    pub async fn load_current(&self) -> Result<PopulatedProfile> {
        self.load_one(async {
            self.actions.client.profiles().await.client().current().await
        })
        .await
    }

    pub async fn load_by_handle(&self, handle: &str) -> Result<PopulatedProfile> {
        self.load_one(async {
            self.actions
                .client
                .profiles()
                .await
                .client()
                .by_handle(handle)
                .await
        })
        .await
    }

    pub async fn load_by_user(&self, user_id: &UserId) -> Result<PopulatedProfile> {
        self.load_one(async {
            self.actions
                .client
                .profiles()
                .await
                .client()
                .by_user(user_id)
                .await
        })
        .await
    }

    pub async fn load_all(&self) -> Result<Vec<PopulatedProfile>> {
        let store = &self.actions.store;
        store.dispatch(ProfileEvent::LoadingStarted);

        match self.actions.client.profiles().await.client().list().await {
            Ok(profiles) => {
                store.dispatch(ProfileEvent::ProfilesReceived(Some(profiles.clone())));
                Ok(profiles)
            }
            Err(e) => {
                self.actions.read_failed(
                    &e,
                    ProfileEvent::ProfilesReceived(None).into(),
                    ProfileEvent::LoadFailed(e.to_string()).into(),
                );
                Err(e)
            }
        }
    }

    /// Create or update the caller's profile
    pub async fn save(&self, input: &ProfileInput) -> Result<PopulatedProfile> {
        let outcome = self.actions.client.profiles().await.client().save(input).await;
        self.finish(outcome)
    }

    pub async fn add_experience(&self, input: &ExperienceInput) -> Result<PopulatedProfile> {
        let outcome = self
            .actions
            .client
            .profiles()
            .await
            .client()
            .add_experience(input)
            .await;
        self.finish(outcome)
    }

    pub async fn remove_experience(&self, id: &ItemId) -> Result<PopulatedProfile> {
        let outcome = self
            .actions
            .client
            .profiles()
            .await
            .client()
            .remove_experience(id)
            .await;
        self.finish(outcome)
    }

    pub async fn add_education(&self, input: &EducationInput) -> Result<PopulatedProfile> {
        let outcome = self
            .actions
            .client
            .profiles()
            .await
            .client()
            .add_education(input)
            .await;
        self.finish(outcome)
    }

    pub async fn remove_education(&self, id: &ItemId) -> Result<PopulatedProfile> {
        let outcome = self
            .actions
            .client
            .profiles()
            .await
            .client()
            .remove_education(id)
            .await;
        self.finish(outcome)
    }

    async fn load_one(
        &self,
        request: impl std::future::Future<Output = Result<PopulatedProfile>>,
    ) -> Result<PopulatedProfile> {
        let store = &self.actions.store;
        store.dispatch(ProfileEvent::LoadingStarted);

        match request.await {
            Ok(profile) => {
                store.dispatch(ProfileEvent::ProfileReceived(Some(profile.clone())));
                Ok(profile)
            }
            Err(e) => {
                self.actions.read_failed(
                    &e,
                    ProfileEvent::ProfileReceived(None).into(),
                    ProfileEvent::LoadFailed(e.to_string()).into(),
                );
                Err(e)
            }
        }
    }

    fn finish(&self, outcome: Result<PopulatedProfile>) -> Result<PopulatedProfile> {
        match outcome {
            Ok(profile) => {
                self.actions
                    .mutation_succeeded(ProfileEvent::ProfileReceived(Some(profile.clone())));
                Ok(profile)
            }
            Err(e) => {
                self.actions.mutation_failed(&e);
                Err(e)
            }
        }
    }
}
