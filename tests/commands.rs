//! Subcommands driven end to end: gating, local validation and the requests they make

use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelter::app::{AppState, Config};
use shelter::cli::{handle_command, Cli, CommandOutcome};
use shelter::notify::QueueNotifier;
use shelter::session::{MemorySessionStore, Session};

async fn state_with(
    store: MemorySessionStore,
    server: &MockServer,
) -> (AppState, Arc<QueueNotifier>) {
    let mut config = Config::default();
    config.api.base_url = format!("{}/api", server.uri());

    let notices = Arc::new(QueueNotifier::new());
    let state = AppState::new(config, Arc::new(store), notices.clone()).expect("valid config");
    state.gate.bootstrap().await;
    (state, notices)
}

fn signed_in() -> MemorySessionStore {
    MemorySessionStore::with_session(Session::new(Some("7".into()), Some("tok".into())))
}

async fn run(args: &[&str], state: &AppState) -> CommandOutcome {
    let cli = Cli::try_parse_from(args).unwrap();
    let command = cli.command.expect("a subcommand");
    handle_command(&command, state, cli.output_format).await.unwrap()
}

#[tokio::test]
async fn test_animal_without_name_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (state, notices) = state_with(signed_in(), &server).await;
    let outcome = run(
        &[
            "shelter",
            "animals",
            "add",
            "--species",
            "perro",
            "--age",
            "2",
            "--health-status",
            "sano",
            "--adopter",
            "3",
        ],
        &state,
    )
    .await;

    assert_eq!(outcome, CommandOutcome::Failed);
    assert_eq!(notices.latest().unwrap().message, "name is required");
}

#[tokio::test]
async fn test_valid_animal_is_posted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/animales"))
        .and(body_json(json!({
            "nombre": "Luna",
            "especie": "perro",
            "edad": 2,
            "unidadEdad": "años",
            "estadoSalud": "sano",
            "adoptanteId": "3"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (state, _) = state_with(signed_in(), &server).await;
    let outcome = run(
        &[
            "shelter",
            "animals",
            "add",
            "--name",
            "Luna",
            "--species",
            "perro",
            "--age",
            "2",
            "--health-status",
            "sano",
            "--adopter",
            "3",
        ],
        &state,
    )
    .await;

    assert_eq!(outcome, CommandOutcome::Done);
}

#[tokio::test]
async fn test_signed_out_user_cannot_reach_animals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (state, notices) = state_with(MemorySessionStore::new(), &server).await;
    let outcome = run(&["shelter", "animals", "list"], &state).await;

    assert_eq!(outcome, CommandOutcome::Failed);
    let notice = notices.latest().unwrap();
    assert_eq!(notice.title, "Session");
    assert!(notice.message.contains("shelter login"));
}

#[tokio::test]
async fn test_signed_in_user_cannot_log_in_again() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (state, notices) = state_with(signed_in(), &server).await;
    let outcome = run(
        &["shelter", "login", "--email", "a@b.com", "--password", "secret"],
        &state,
    )
    .await;

    assert_eq!(outcome, CommandOutcome::Failed);
    assert!(notices.latest().unwrap().message.contains("shelter logout"));
}

#[tokio::test]
async fn test_delete_needs_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let (state, _) = state_with(signed_in(), &server).await;
    let outcome = run(&["shelter", "animals", "delete", "5"], &state).await;

    assert_eq!(outcome, CommandOutcome::Failed);
}
