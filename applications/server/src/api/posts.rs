/// Post feed API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use devhub_core::types::{ItemId, NewComment, Post, PostId, TextInput};
use devhub_core::validation::validate_text;
use devhub_core::Storage;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeletedPost {
    #[serde(rename = "_id")]
    pub id: PostId,
}

/// GET /api/posts/all
/// Newest first
pub async fn list(State(app_state): State<AppState>) -> Result<Json<Vec<Post>>> {
    let posts = app_state.db.get_all_posts().await?;
    Ok(Json(posts))
}

/// GET /api/posts/post/:id
pub async fn get(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    let post = load_post(&app_state, &PostId::new(id)).await?;
    Ok(Json(post))
}

/// POST /api/posts
pub async fn create(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Json(req): Json<TextInput>,
) -> Result<Json<Post>> {
    let new_post = validate_text(&req)?;

    let post = app_state
        .db
        .create_post(Post::new(auth.user(), new_post))
        .await?;

    Ok(Json(post))
}

/// DELETE /api/posts/post/:id
/// Only the author may delete a post
pub async fn delete(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<DeletedPost>> {
    let post = load_post(&app_state, &PostId::new(id)).await?;

    if &post.user != auth.user_id() {
        tracing::warn!(post_id = %post.id, user_id = %auth.user_id(), "Delete refused: not the author");
        return Err(ServerError::forbidden("notauthorized", "User not authorized"));
    }

    app_state.db.delete_post(&post.id).await?;
    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(Json(DeletedPost { id: post.id }))
}

/// POST /api/posts/like/:id
/// Liking a post twice keeps a single like
pub async fn like(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    let user_id = auth.user_id();
    let mut change = |post: &mut Post| post.add_like(user_id.clone());
    let post = modify_post(&app_state, &PostId::new(id), &mut change).await?;

    Ok(Json(post))
}

/// DELETE /api/posts/like/:id
pub async fn unlike(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Post>> {
    let user_id = auth.user_id();
    let mut change = |post: &mut Post| post.remove_like(user_id);
    let post = modify_post(&app_state, &PostId::new(id), &mut change).await?;

    Ok(Json(post))
}

/// POST /api/posts/comment/:id
pub async fn add_comment(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
    Json(req): Json<TextInput>,
) -> Result<Json<Post>> {
    let text = validate_text(&req)?.text;
    let comment = NewComment::by(auth.user(), text);

    let mut change = |post: &mut Post| {
        post.add_comment(comment.clone());
        true
    };
    let post = modify_post(&app_state, &PostId::new(id), &mut change).await?;

    Ok(Json(post))
}

/// DELETE /api/posts/comment/:id/:comment_id
pub async fn remove_comment(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Post>> {
    let comment_id = ItemId::new(comment_id);
    let mut change = |post: &mut Post| post.remove_comment(&comment_id);
    let post = modify_post(&app_state, &PostId::new(id), &mut change).await?;

    Ok(Json(post))
}

async fn modify_post(
    app_state: &AppState,
    id: &PostId,
    change: &mut (dyn FnMut(&mut Post) -> bool + Send),
) -> Result<Post> {
    app_state
        .db
        .modify_post(id, change)
        .await?
        .ok_or_else(no_post)
}

async fn load_post(app_state: &AppState, id: &PostId) -> Result<Post> {
    app_state
        .db
        .get_post(id)
        .await?
        .ok_or_else(no_post)
}

fn no_post() -> ServerError {
    ServerError::not_found("nopostfound", "No post found with that ID")
}
