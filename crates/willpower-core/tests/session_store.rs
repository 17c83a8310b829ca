//! Integration tests for the session lifecycle against a stub API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use willpower_core::auth::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
use willpower_core::models::{Credentials, Identity, Registration};
use willpower_core::router::{NavigationDecision, RouteName};
use willpower_core::{ApiClient, AuthError, Router, SessionStore};

fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api/v1", server.uri())).unwrap()
}

fn login_ok(token: &str, user_id: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "message": "Login successful",
        "data": { "token": token, "user_id": user_id }
    }))
}

#[tokio::test]
async fn test_login_success_sets_credential_identity_and_storage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_partial_json(json!({ "username": "alice", "password": "pw" })))
        .respond_with(login_ok("abc", 42))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStore::new());
    let session = SessionStore::new(api_for(&server), Box::new(storage.clone()));

    session.login(&Credentials::new("alice", "pw")).await.unwrap();

    assert!(session.is_authenticated());
    assert_eq!(
        session.identity(),
        Some(Identity {
            id: 42,
            username: "alice".to_string()
        })
    );
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_login_failure_leaves_state_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 40101,
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStore::new());
    let session = SessionStore::new(api_for(&server), Box::new(storage.clone()));

    let err = session
        .login(&Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::RequestFailed { status: Some(401), .. }));
    assert_eq!(err.message(), "Invalid username or password");
    assert!(!session.is_authenticated());
    assert_eq!(session.identity(), None);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryTokenStore::with_entry(TOKEN_KEY, "old-token"));
    let session = SessionStore::new(api_for(&server), Box::new(storage.clone()));

    let err = session.login(&Credentials::new("bob", "pw")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(session.credential(), "old-token");
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("old-token"));
}

#[tokio::test]
async fn test_login_without_data_is_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": 0, "message": "ok" })))
        .mount(&server)
        .await;

    let session = SessionStore::new(api_for(&server), Box::new(MemoryTokenStore::new()));
    let err = session.login(&Credentials::new("alice", "pw")).await.unwrap_err();

    assert_eq!(err.status(), None);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(body_partial_json(json!({ "username": "carol" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "code": 0,
            "message": "User registered successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::new(api_for(&server), Box::new(MemoryTokenStore::new()));
    session
        .register(&Registration::new("carol", "password1"))
        .await
        .unwrap();

    assert!(!session.is_authenticated());
    assert_eq!(session.identity(), None);
}

#[tokio::test]
async fn test_register_conflict_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": 40901,
            "message": "Username already exists"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::new(api_for(&server), Box::new(MemoryTokenStore::new()));
    let err = session
        .register(&Registration::new("carol", "password1"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Username already exists");
}

#[tokio::test]
async fn test_unreachable_server_is_request_failure() {
    // Port 1 is never served; the connection is refused
    let api = ApiClient::new("http://127.0.0.1:1/api/v1").unwrap();
    let session = SessionStore::new(api, Box::new(MemoryTokenStore::new()));

    let err = session.login(&Credentials::new("alice", "pw")).await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_overlapping_logins_apply_in_call_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_partial_json(json!({ "username": "slow" })))
        .respond_with(login_ok("slow-token", 1).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_partial_json(json!({ "username": "fast" })))
        .respond_with(login_ok("fast-token", 2))
        .mount(&server)
        .await;

    let session = SessionStore::new(api_for(&server), Box::new(MemoryTokenStore::new()));
    let slow = Credentials::new("slow", "pw");
    let fast = Credentials::new("fast", "pw");

    let (first, second) = tokio::join!(session.login(&slow), session.login(&fast));
    first.unwrap();
    second.unwrap();

    // Logins run one at a time, so the later call decides the final state
    assert_eq!(session.credential(), "fast-token");
    assert_eq!(session.identity().map(|i| i.username).as_deref(), Some("fast"));
}

#[tokio::test]
async fn test_session_survives_restart_with_file_storage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(login_ok("persisted", 9))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("tokens.json");

    {
        let session = SessionStore::new(api_for(&server), Box::new(FileTokenStore::new(&token_file)));
        session.login(&Credentials::new("dana", "pw")).await.unwrap();
    }

    let restarted = SessionStore::new(api_for(&server), Box::new(FileTokenStore::new(&token_file)));
    assert!(restarted.is_authenticated());
    assert_eq!(restarted.credential(), "persisted");
    assert_eq!(restarted.identity(), None);

    restarted.logout();
    let after_logout = SessionStore::new(api_for(&server), Box::new(FileTokenStore::new(&token_file)));
    assert!(!after_logout.is_authenticated());
}

#[tokio::test]
async fn test_authorized_client_sends_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(login_ok("abc", 42))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/goals"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "message": "Success",
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::new(api_for(&server), Box::new(MemoryTokenStore::new()));
    session.login(&Credentials::new("alice", "pw")).await.unwrap();

    let goals = session.authorized_client().fetch_goals().await.unwrap();
    assert!(goals.is_empty());
}

#[tokio::test]
async fn test_auth_calls_carry_active_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "code": 0,
            "message": "User registered successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(login_ok("tok-456", 7))
        .expect(1)
        .mount(&server)
        .await;

    let storage = MemoryTokenStore::with_entry(TOKEN_KEY, "tok-123");
    let session = SessionStore::new(api_for(&server), Box::new(storage));
    assert!(session.is_authenticated());

    session
        .register(&Registration::new("erin", "password1"))
        .await
        .unwrap();
    session.login(&Credentials::new("erin", "password1")).await.unwrap();

    assert_eq!(session.credential(), "tok-456");
}

#[tokio::test]
async fn test_logged_out_requests_carry_no_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/goals"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": 40100,
            "message": "Missing Authorization header"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionStore::new(api_for(&server), Box::new(MemoryTokenStore::new()));
    let err = session.authorized_client().fetch_goals().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_router_tracks_login_and_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(login_ok("abc", 42))
        .mount(&server)
        .await;

    let session = Arc::new(SessionStore::new(api_for(&server), Box::new(MemoryTokenStore::new())));
    let router = Router::new(Arc::clone(&session));

    let nav = router.navigate("/").unwrap();
    assert_eq!(nav.decision, NavigationDecision::RedirectToLogin);

    session.login(&Credentials::new("alice", "pw")).await.unwrap();
    assert_eq!(router.navigate("/").unwrap().decision, NavigationDecision::Allow);
    let nav = router.navigate("/login").unwrap();
    assert_eq!(nav.decision, NavigationDecision::RedirectToDefault);
    assert_eq!(nav.destination.name, RouteName::Dashboard);

    session.logout();
    assert_eq!(
        router.navigate("/goals/1").unwrap().destination.name,
        RouteName::Login
    );
}
