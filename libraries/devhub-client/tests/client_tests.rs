//! Tests for the DevHub client, store and actions.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real server connection.

use devhub_client::{
    Actions, ClientConfig, ClientError, DevHubClient, RequestStatus, Store,
};
use devhub_core::types::{ItemId, PostId, ProfileInput, RegisterInput, UserId};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn post_json(id: &str, likes: serde_json::Value) -> serde_json::Value {
    json!({
        "_id": id,
        "user": "u1",
        "text": "A post long enough to pass validation",
        "name": "Jane",
        "avatar": "//www.gravatar.com/avatar/abc",
        "likes": likes,
        "comments": [],
        "date": "2024-01-01T00:00:00Z"
    })
}

fn profile_json(handle: &str) -> serde_json::Value {
    json!({
        "_id": "prof1",
        "user": { "_id": "u1", "name": "Jane", "avatar": "" },
        "handle": handle,
        "status": "Developer",
        "skills": ["Rust", "SQL"],
        "experience": [],
        "education": [],
        "social": {},
        "date": "2024-01-01T00:00:00Z"
    })
}

fn user_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "name": "Jane",
        "email": "jane@example.com",
        "avatar": "",
        "date": "2024-01-01T00:00:00Z"
    })
}

async fn authed_client(server: &MockServer) -> DevHubClient {
    DevHubClient::new(ClientConfig::with_token(server.uri(), "tok")).unwrap()
}

fn actions_for(client: DevHubClient) -> Actions {
    Actions::new(Arc::new(client), Store::default())
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        match DevHubClient::new(ClientConfig::new("")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        match DevHubClient::new(ClientConfig::new("example.com")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("http://")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_multiple_trailing_slashes_removed() {
        let client = DevHubClient::new(ClientConfig::new("https://example.com///")).unwrap();

        let rt = tokio::runtime::Runtime::new().unwrap();
        assert_eq!(rt.block_on(client.url()), "https://example.com");
    }
}

// =============================================================================
// Authentication Tests
// =============================================================================

mod authentication {
    use super::*;

    #[tokio::test]
    async fn test_login_stores_bare_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "email": "jane@example.com", "password": "secret1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "token": "Bearer jwt.value"
            })))
            .mount(&mock_server)
            .await;

        let client = DevHubClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        assert!(!client.is_authenticated().await);

        let response = client.login("jane@example.com", "secret1").await.unwrap();

        assert!(response.success);
        assert_eq!(client.token().await.as_deref(), Some("jwt.value"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_field_error_and_no_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "password": "Password incorrect" })),
            )
            .mount(&mock_server)
            .await;

        let client = DevHubClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let err = client.login("jane@example.com", "wrong").await.unwrap_err();

        assert_eq!(
            err.field_errors().get("password"),
            Some("Password incorrect")
        );
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_unknown_email_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "email": "User not found" })),
            )
            .mount(&mock_server)
            .await;

        let client = DevHubClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let err = client.login("nobody@example.com", "secret1").await.unwrap_err();

        assert!(matches!(err, ClientError::NotFound(ref e) if e.get("email") == Some("User not found")));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "email": "Email already exists" })),
            )
            .mount(&mock_server)
            .await;

        let client = DevHubClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let err = client
            .register(&RegisterInput {
                name: Some("Jane".into()),
                email: Some("a@x.com".into()),
                password: Some("secret1".into()),
                password2: Some("secret1".into()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.field_errors().get("email"), Some("Email already exists"));
    }

    #[tokio::test]
    async fn test_posts_require_token() {
        let client = DevHubClient::new(ClientConfig::new("http://localhost:5000")).unwrap();

        assert!(matches!(client.posts().await, Err(ClientError::AuthRequired)));
    }

    #[tokio::test]
    async fn test_own_profile_requires_token_but_lookup_does_not() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/profile/handle/jdoe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("jdoe")))
            .mount(&mock_server)
            .await;

        let client = DevHubClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let profiles = client.profiles().await;

        assert!(matches!(
            profiles.client().current().await,
            Err(ClientError::AuthRequired)
        ));

        let found = profiles.client().by_handle("jdoe").await.unwrap();
        assert_eq!(found.handle, "jdoe");
        assert_eq!(found.user.name, "Jane");
    }

    #[tokio::test]
    async fn test_handle_with_reserved_characters_is_one_segment() {
        let mock_server = MockServer::start().await;

        for (encoded, handle) in [("c%23dev", "c#dev"), ("a%3Fb", "a?b"), ("x%2Fy", "x/y")] {
            Mock::given(method("GET"))
                .and(path(format!("/api/profile/handle/{}", encoded)))
                .respond_with(ResponseTemplate::new(200).set_body_json(profile_json(handle)))
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let client = DevHubClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let profiles = client.profiles().await;

        for handle in ["c#dev", "a?b", "x/y"] {
            let found = profiles.client().by_handle(handle).await.unwrap();
            assert_eq!(found.handle, handle);
        }
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let client =
            DevHubClient::new(ClientConfig::with_token("http://localhost:5000", "tok")).unwrap();
        assert!(client.is_authenticated().await);

        client.logout().await;
        assert!(!client.is_authenticated().await);
    }
}

// =============================================================================
// Posts Tests
// =============================================================================

mod posts {
    use super::*;

    #[tokio::test]
    async fn test_list_sends_bearer_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts/all"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([post_json("p2", json!([])), post_json("p1", json!([]))])),
            )
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let posts = client.posts().await.unwrap().client().list().await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, PostId::new("p2"));
    }

    #[tokio::test]
    async fn test_delete_returns_removed_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/posts/post/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "p1" })))
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let id = client
            .posts()
            .await
            .unwrap()
            .client()
            .delete(&PostId::new("p1"))
            .await
            .unwrap();

        assert_eq!(id, PostId::new("p1"));
    }

    #[tokio::test]
    async fn test_delete_someone_elses_post_is_forbidden() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/posts/post/p1"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "notauthorized": "User not authorized" })),
            )
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let err = client
            .posts()
            .await
            .unwrap()
            .client()
            .delete(&PostId::new("p1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Forbidden(_)));
        assert_eq!(err.field_errors().get("notauthorized"), Some("User not authorized"));
    }

    #[tokio::test]
    async fn test_remove_comment_path() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/posts/comment/p1/c9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json("p1", json!([]))))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let post = client
            .posts()
            .await
            .unwrap()
            .client()
            .remove_comment(&PostId::new("p1"), &ItemId::new("c9"))
            .await
            .unwrap();

        assert!(post.comments.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client =
            DevHubClient::new(ClientConfig::with_token("http://127.0.0.1:1", "tok")).unwrap();

        let err = client.posts().await.unwrap().client().list().await.unwrap_err();
        assert!(err.is_transport(), "got {:?}", err);
    }
}

// =============================================================================
// Actions + Store Tests
// =============================================================================

mod actions {
    use super::*;

    #[tokio::test]
    async fn test_load_all_fills_feed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts/all"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([post_json("a", json!([])), post_json("b", json!([]))])),
            )
            .mount(&mock_server)
            .await;

        let actions = actions_for(authed_client(&mock_server).await);
        actions.posts().load_all().await.unwrap();

        let state = actions.store().snapshot();
        assert_eq!(state.posts.posts.len(), 2);
        assert_eq!(state.posts.status, RequestStatus::Loaded);
    }

    #[tokio::test]
    async fn test_load_all_failure_empties_feed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts/all"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let actions = actions_for(authed_client(&mock_server).await);
        assert!(actions.posts().load_all().await.is_err());

        let state = actions.store().snapshot();
        assert!(state.posts.posts.is_empty());
        assert_eq!(state.posts.status, RequestStatus::Loaded);
        // Reads never touch the error slice
        assert!(state.errors.is_empty());
    }

    #[tokio::test]
    async fn test_load_all_unreachable_marks_failed() {
        let client =
            DevHubClient::new(ClientConfig::with_token("http://127.0.0.1:1", "tok")).unwrap();
        let actions = actions_for(client);

        assert!(actions.posts().load_all().await.is_err());
        assert!(matches!(
            actions.store().snapshot().posts.status,
            RequestStatus::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_create_failure_fills_errors_then_success_clears() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/posts"))
            .and(body_json(json!({ "text": "short" })))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({ "text": "Post must be between 10 and 300 characters" }),
            ))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/posts"))
            .and(body_json(json!({ "text": "A post long enough to pass validation" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json("new", json!([]))))
            .mount(&mock_server)
            .await;

        let actions = actions_for(authed_client(&mock_server).await);

        assert!(actions.posts().create("short").await.is_err());
        let state = actions.store().snapshot();
        assert_eq!(
            state.errors.get("text"),
            Some("Post must be between 10 and 300 characters")
        );
        assert!(state.posts.posts.is_empty());

        actions
            .posts()
            .create("A post long enough to pass validation")
            .await
            .unwrap();
        let state = actions.store().snapshot();
        assert!(state.errors.is_empty());
        assert_eq!(state.posts.posts[0].id, PostId::new("new"));
    }

    #[tokio::test]
    async fn test_like_replaces_post_in_feed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts/all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                post_json("a", json!([])),
                post_json("b", json!([])),
                post_json("c", json!([]))
            ])))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/posts/like/b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(post_json(
                "b",
                json!([{ "_id": "l1", "user": "u1" }]),
            )))
            .mount(&mock_server)
            .await;

        let actions = actions_for(authed_client(&mock_server).await);
        actions.posts().load_all().await.unwrap();
        actions.posts().like(&PostId::new("b")).await.unwrap();

        let posts = actions.store().snapshot().posts.posts;
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(posts[1].likes.len(), 1);
        assert_eq!(posts[1].likes[0].user, UserId::new("u1"));
    }

    #[tokio::test]
    async fn test_missing_profile_leaves_none_without_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/profile"))
            .respond_with(ResponseTemplate::new(404).set_body_json(
                json!({ "noprofile": "There is no profile for this user" }),
            ))
            .mount(&mock_server)
            .await;

        let actions = actions_for(authed_client(&mock_server).await);
        let err = actions.profile().load_current().await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));

        let state = actions.store().snapshot();
        assert!(state.profile.profile.is_none());
        assert_eq!(state.profile.status, RequestStatus::Loaded);
        assert!(state.errors.is_empty());
    }

    #[tokio::test]
    async fn test_save_profile_handle_conflict() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/profile"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({ "handle": "That handle already exists" }),
            ))
            .mount(&mock_server)
            .await;

        let actions = actions_for(authed_client(&mock_server).await);
        let input = ProfileInput {
            handle: Some("jdoe".into()),
            status: Some("Developer".into()),
            skills: Some("Rust".into()),
            ..Default::default()
        };

        assert!(actions.profile().save(&input).await.is_err());
        assert_eq!(
            actions.store().snapshot().errors.get("handle"),
            Some("That handle already exists")
        );
    }

    #[tokio::test]
    async fn test_login_sets_current_user_and_logout_clears() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "token": "Bearer jwt.value"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/current"))
            .and(header("authorization", "Bearer jwt.value"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("jane")))
            .mount(&mock_server)
            .await;

        let client = DevHubClient::new(ClientConfig::new(mock_server.uri())).unwrap();
        let actions = actions_for(client);

        let user = actions.auth().login("jane@example.com", "secret1").await.unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert!(actions.store().snapshot().auth.is_authenticated());

        actions.profile().load_current().await.unwrap();
        assert!(actions.store().snapshot().profile.profile.is_some());

        actions.auth().logout().await;
        let state = actions.store().snapshot();
        assert!(!state.auth.is_authenticated());
        assert!(state.profile.profile.is_none());
    }

    #[tokio::test]
    async fn test_delete_account_logs_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = authed_client(&mock_server).await;
        let actions = Actions::new(Arc::new(client), Store::default());

        actions.auth().delete_account().await.unwrap();
        assert!(!actions.store().snapshot().auth.is_authenticated());
    }
}
