//! Common test utilities and fixtures
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use devhub_server::{create_router, services::AuthService, state::AppState};
use devhub_storage::Database;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Test user credentials
pub mod fixtures {
    pub const TEST_NAME: &str = "Jane Doe";
    pub const TEST_EMAIL: &str = "jane@example.com";
    pub const TEST_PASSWORD: &str = "secret123";

    pub const OTHER_NAME: &str = "John Roe";
    pub const OTHER_EMAIL: &str = "john@example.com";
}

/// Lowest cost bcrypt accepts, to keep tests fast
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn create_test_auth_service() -> AuthService {
    AuthService::new("test-secret-key".to_string(), 1, TEST_BCRYPT_COST)
}

/// Create a test database on a real SQLite file with migrations applied
pub async fn create_test_database() -> (Arc<Database>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let pool = devhub_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    devhub_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    (Arc::new(Database::new(pool)), temp_dir)
}

/// Router over a fresh database
pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let (db, temp_dir) = create_test_database().await;
        let auth_service = Arc::new(create_test_auth_service());
        let router = create_router(AppState::new(Arc::clone(&db), Arc::clone(&auth_service)));

        Self {
            router,
            db,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Send one request and decode the JSON answer (`Value::Null` for an
    /// empty or non-JSON body)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        (status, json)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
                "password2": password,
            })),
        )
        .await
    }

    /// Write counter of the profile owned by `user_id`, read from its row
    pub async fn profile_version(&self, user_id: &str) -> i64 {
        sqlx::query_scalar("SELECT version FROM profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to read profile version")
    }

    /// Register and log in; returns the `Bearer …` token and the user id
    pub async fn signed_in(&self, name: &str, email: &str) -> (String, String) {
        let (status, user) = self.register(name, email, fixtures::TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", user);

        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": fixtures::TEST_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        (
            body["token"].as_str().unwrap().to_string(),
            user["_id"].as_str().unwrap().to_string(),
        )
    }
}
