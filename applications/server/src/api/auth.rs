/// Account API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{extract::State, Json};
use devhub_core::types::{gravatar_url, CreateUser, LoginInput, RegisterInput, User};
use devhub_core::validation::{validate_login, validate_register};
use devhub_core::Storage;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    /// `Bearer <jwt>`, ready for the Authorization header
    pub token: String,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> Result<Json<User>> {
    let registration = validate_register(&req)?;

    // Early friendly answer; the UNIQUE constraint still decides races
    if app_state
        .db
        .find_user_by_email(&registration.email)
        .await?
        .is_some()
    {
        return Err(ServerError::validation("email", "Email already exists"));
    }

    let password_hash = app_state
        .auth_service
        .hash_password(&registration.password)?;

    let user = app_state
        .db
        .create_user(CreateUser {
            avatar: gravatar_url(&registration.email),
            name: registration.name,
            email: registration.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(user))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginInput>,
) -> Result<Json<LoginResponse>> {
    let login = validate_login(&req)?;

    let credentials = app_state
        .db
        .find_user_by_email(&login.email)
        .await?
        .ok_or_else(|| ServerError::not_found("email", "User not found"))?;

    if !app_state
        .auth_service
        .verify_password(&login.password, &credentials.password_hash)?
    {
        tracing::warn!(user_id = %credentials.user.id, "Login rejected: wrong password");
        return Err(ServerError::validation("password", "Password incorrect"));
    }

    let user = credentials.user;
    let token = app_state
        .auth_service
        .create_access_token(&user.id, &user.name, &user.avatar)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        token: format!("Bearer {}", token),
    }))
}

/// GET /api/auth/current
pub async fn current(auth: AuthenticatedUser) -> Json<User> {
    Json(auth.0)
}
