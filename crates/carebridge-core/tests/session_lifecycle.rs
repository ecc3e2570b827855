//! End-to-end session tests: the real API client and file-backed credential
//! store against a wiremock service.

use std::sync::Arc;
use std::time::Duration;

use carebridge_core::api::ApiClient;
use carebridge_core::auth::{
    CredentialStore, FileCredentialStore, SessionController, SessionState,
};
use carebridge_core::models::Role;
use carebridge_core::nav::{guard, Gate, HistoryNavigator, Route};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    _dir: TempDir,
    store: Arc<FileCredentialStore>,
    nav: Arc<HistoryNavigator>,
    client: ApiClient,
    controller: SessionController,
}

fn harness(server: &MockServer, stored: Option<&str>) -> Harness {
    let dir = TempDir::new().expect("tempdir");
    let store = Arc::new(FileCredentialStore::new(dir.path()));
    if let Some(token) = stored {
        store.write(&token.into());
    }
    let nav = Arc::new(HistoryNavigator::new());
    let client = ApiClient::new(format!("{}/api", server.uri())).expect("client");
    let controller = SessionController::new(store.clone(), Arc::new(client.clone()), nav.clone())
        .with_verify_timeout(Some(Duration::from_secs(2)));
    Harness {
        _dir: dir,
        store,
        nav,
        client,
        controller,
    }
}

fn mentor_json() -> serde_json::Value {
    json!({"user_id": 7, "name": "Mo", "email": "mo@example.com", "role": "mentor"})
}

#[tokio::test]
async fn test_bootstrap_restores_stored_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/is-verify"))
        .and(header("token", "T7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mentor_json()))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("T7"));
    assert_eq!(guard(&h.controller.current_state(), Route::Dashboard), Gate::Placeholder);

    h.controller.bootstrap().await;

    let user = h.controller.current_user().expect("signed in");
    assert_eq!(user.role, Role::Mentor);
    assert_eq!(h.store.read().map(|c| c.as_str().to_string()), Some("T7".to_string()));
    assert_eq!(guard(&h.controller.current_state(), Route::Schedule), Gate::Render);
    // Restoring a session does not navigate
    assert!(h.nav.history().is_empty());
}

#[tokio::test]
async fn test_bootstrap_rejected_credential_clears_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/is-verify"))
        .respond_with(ResponseTemplate::new(403).set_body_string("\"Not Authorize\""))
        .mount(&server)
        .await;

    let h = harness(&server, Some("stale"));
    h.controller.bootstrap().await;

    assert_eq!(h.controller.current_state(), SessionState::Unauthenticated);
    assert!(h.store.read().is_none());
    assert!(!h.store.path().exists());
    assert_eq!(
        guard(&h.controller.current_state(), Route::Dashboard),
        Gate::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_bootstrap_without_credential_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/is-verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mentor_json()))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, None);
    h.controller.bootstrap().await;

    assert_eq!(h.controller.current_state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_bootstrap_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/is-verify"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(mentor_json())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let h = harness(&server, Some("T7"));
    h.controller.bootstrap().await;

    assert_eq!(h.controller.current_state(), SessionState::Unauthenticated);
    assert!(h.store.read().is_none());
}

#[tokio::test]
async fn test_login_then_logout_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "T7",
            "user": mentor_json()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/mentor/my-clients"))
        .and(header("token", "T7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, None);
    h.controller.bootstrap().await;
    assert!(h.controller.access_profile(&h.client).is_none());

    h.controller
        .login("mo@example.com", "secret")
        .await
        .expect("login");

    let on_disk = std::fs::read_to_string(h.store.path()).expect("token file");
    assert_eq!(on_disk.trim(), "T7");
    assert_eq!(h.nav.current(), Some(Route::Dashboard));

    match h.controller.access_profile(&h.client) {
        Some(carebridge_core::AccessProfile::Mentor(api)) => {
            assert!(api.clients().await.expect("clients").is_empty());
        }
        _ => panic!("expected mentor profile"),
    }

    h.controller.logout().await;

    assert_eq!(h.controller.current_state(), SessionState::Unauthenticated);
    assert!(!h.store.path().exists());
    assert_eq!(h.nav.history(), vec![Route::Dashboard, Route::Login]);
}

#[tokio::test]
async fn test_failed_login_leaves_state_alone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("\"Password or Email is incorrect\""),
        )
        .mount(&server)
        .await;

    let h = harness(&server, None);
    h.controller.bootstrap().await;

    let err = h
        .controller
        .login("mo@example.com", "wrong")
        .await
        .expect_err("login should fail");

    assert_eq!(err.message(), "Password or Email is incorrect");
    assert_eq!(h.controller.current_state(), SessionState::Unauthenticated);
    assert!(h.store.read().is_none());
    assert!(h.nav.history().is_empty());
}
