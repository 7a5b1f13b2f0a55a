//! End-to-end tests of session bootstrap, login and logout against a mock backend

use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelter::app::{AppState, Config};
use shelter::constants::SESSION_FILE_NAME;
use shelter::forms::{LoginForm, RegisterForm};
use shelter::notify::QueueNotifier;
use shelter::session::{FileSessionStore, GateState, Session, SessionStore};
use shelter::{Root, Route, ShelterError};

fn app_state(server_uri: &str, dir: &Path) -> (AppState, Arc<QueueNotifier>) {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api", server_uri);

    let notices = Arc::new(QueueNotifier::new());
    let state = AppState::new(config, Arc::new(FileSessionStore::new(dir)), notices.clone())
        .expect("valid config");
    (state, notices)
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/usuarios/autenticar"))
        .and(body_json(json!({ "email": "a@b.com", "contrasena": "secret" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "userId": "42", "token": "abc" })),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/usuarios/42"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "nombre": "Ana",
            "email": "a@b.com",
            "direccion": "Calle 1"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_session_and_mounts_authenticated_root() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = TempDir::new().unwrap();

    let (state, _) = app_state(&server.uri(), dir.path());
    assert_eq!(state.gate.bootstrap().await, GateState::Unauthenticated);
    assert_eq!(state.gate.root(), Root::Auth);

    let route = state
        .auth
        .login(&LoginForm::new("a@b.com", "secret"))
        .await
        .unwrap();

    assert_eq!(route, Route::Dashboard);
    assert_eq!(state.gate.root(), Root::Authenticated);

    let stored = FileSessionStore::new(dir.path()).get().await;
    assert_eq!(stored, Session::new(Some("42".into()), Some("abc".into())));

    let profile = state.gate.cached_profile().await.unwrap();
    assert_eq!(profile.name, "Ana");
}

#[tokio::test]
async fn test_relaunch_with_persisted_session_is_authenticated() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = TempDir::new().unwrap();

    let (first, _) = app_state(&server.uri(), dir.path());
    first.gate.bootstrap().await;
    first
        .auth
        .login(&LoginForm::new("a@b.com", "secret"))
        .await
        .unwrap();
    drop(first);

    let (second, _) = app_state(&server.uri(), dir.path());
    assert_eq!(second.gate.root(), Root::Splash);
    second.gate.bootstrap().await;
    assert_eq!(second.gate.root(), Root::Authenticated);
    assert_eq!(second.session().token().as_deref(), Some("abc"));
}

#[tokio::test]
async fn test_invalid_credentials_leave_store_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/usuarios/autenticar"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Credenciales inválidas" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let (state, _) = app_state(&server.uri(), dir.path());
    state.gate.bootstrap().await;

    let err = state
        .auth
        .login(&LoginForm::new("a@b.com", "wrong"))
        .await
        .unwrap_err();

    match err {
        ShelterError::Unauthorized(message) => assert_eq!(message, "Credenciales inválidas"),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(state.gate.root(), Root::Auth);
    assert!(!dir.path().join(SESSION_FILE_NAME).exists());
}

#[tokio::test]
async fn test_empty_required_field_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let (state, _) = app_state(&server.uri(), dir.path());
    state.gate.bootstrap().await;

    let err = state
        .auth
        .login(&LoginForm::new("", "secret"))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = state
        .auth
        .register(&RegisterForm {
            name: "Ana".into(),
            email: "a@b.com".into(),
            address: String::new(),
            password: "secret".into(),
            confirm_password: "secret".into(),
        })
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_login_response_without_credentials_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/usuarios/autenticar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "userId": null })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let (state, _) = app_state(&server.uri(), dir.path());
    state.gate.bootstrap().await;

    assert!(state
        .auth
        .login(&LoginForm::new("a@b.com", "secret"))
        .await
        .is_err());
    assert_eq!(state.gate.root(), Root::Auth);
}

#[tokio::test]
async fn test_logout_clears_store_and_fresh_gate_mounts_auth() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = TempDir::new().unwrap();

    let (state, _) = app_state(&server.uri(), dir.path());
    state.gate.bootstrap().await;
    state
        .auth
        .login(&LoginForm::new("a@b.com", "secret"))
        .await
        .unwrap();

    let route = state.auth.logout().await.unwrap();
    assert_eq!(route, Route::Login);
    assert_eq!(state.gate.root(), Root::Auth);
    assert!(!FileSessionStore::new(dir.path()).get().await.is_present());

    let (fresh, _) = app_state(&server.uri(), dir.path());
    assert_eq!(fresh.gate.bootstrap().await, GateState::Unauthenticated);
}

#[tokio::test]
async fn test_register_routes_back_to_login_without_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/usuarios/registro"))
        .and(body_json(json!({
            "nombre": "Ana",
            "email": "a@b.com",
            "direccion": "Calle 1",
            "contrasena": "secret"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let (state, _) = app_state(&server.uri(), dir.path());
    state.gate.bootstrap().await;

    let route = state
        .auth
        .register(&RegisterForm {
            name: "Ana".into(),
            email: "a@b.com".into(),
            address: "Calle 1".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
        })
        .await
        .unwrap();

    assert_eq!(route, Route::Login);
    assert_eq!(state.gate.root(), Root::Auth);
}
