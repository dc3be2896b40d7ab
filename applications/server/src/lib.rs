//! DevHub Server Library
//!
//! Developer profiles and a post feed over a JSON HTTP API, with
//! JWT authentication and a SQLite document store.
//!
//! This library exposes the router and its components so the binary and
//! the integration tests build the same application.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::auth::AuthService;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router
pub fn create_router(app_state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/profile/all", get(api::profile::list))
        .route("/profile/handle/:handle", get(api::profile::by_handle))
        .route("/profile/user/:user_id", get(api::profile::by_user));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/current", get(api::auth::current))
        // Profile
        .route(
            "/profile",
            get(api::profile::current)
                .post(api::profile::save)
                .delete(api::profile::delete_account),
        )
        .route("/profile/experience", post(api::profile::add_experience))
        .route(
            "/profile/experience/:exp_id",
            delete(api::profile::remove_experience),
        )
        .route("/profile/education", post(api::profile::add_education))
        .route(
            "/profile/education/:edu_id",
            delete(api::profile::remove_education),
        )
        // Posts
        .route("/posts", post(api::posts::create))
        .route("/posts/all", get(api::posts::list))
        .route(
            "/posts/post/:id",
            get(api::posts::get).delete(api::posts::delete),
        )
        .route(
            "/posts/like/:id",
            post(api::posts::like).delete(api::posts::unlike),
        )
        .route("/posts/comment/:id", post(api::posts::add_comment))
        .route(
            "/posts/comment/:id/:comment_id",
            delete(api::posts::remove_comment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
