use std::sync::Arc;
use std::sync::Mutex;

use super::refresh_messages;
use super::ChatFlow;
use super::SendOutcome;
use crate::domain::models::Project;
use crate::domain::models::Role;
use crate::domain::models::Theme;
use crate::domain::models::User;
use crate::domain::services::AuthStore;
use crate::domain::services::ProjectStore;
use crate::domain::services::Router;
use crate::infrastructure::api::ApiClient;

fn authed_client(url: &str) -> ApiClient {
    let mut auth = AuthStore::in_memory();
    auth.set_auth(
        User {
            id: "user-1".to_string(),
            email: "dev@example.com".to_string(),
            username: "dev".to_string(),
            theme: Theme::Dark,
            ..User::default()
        },
        "token-abc",
    );

    return ApiClient::new(
        url,
        Arc::new(Mutex::new(auth)),
        Arc::new(Mutex::new(Router::default())),
    );
}

fn store_with_project() -> ProjectStore {
    let mut store = ProjectStore::new();
    store.set_current_project(Project::new("p1", "Obby"));
    return store;
}

#[tokio::test]
async fn it_appends_the_returned_pair_in_order() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat")
        .match_header("Authorization", "Bearer token-abc")
        .with_status(200)
        .with_body(
            r#"{
                "user_message": {"id": "m1", "project_id": "p1", "role": "user", "content": "make a part spin", "created_at": "t1"},
                "ai_message": {"id": "m2", "project_id": "p1", "role": "assistant", "content": "Sure!", "created_at": "t2"}
            }"#,
        )
        .create();

    let api = authed_client(&server.url());
    let mut store = store_with_project();
    let mut flow = ChatFlow::new();
    flow.input = "make a part spin".to_string();

    let outcome = flow.send(&api, &mut store).await;
    mock.assert();

    assert_eq!(outcome, SendOutcome::Sent);
    assert!(flow.input.is_empty());
    assert!(!flow.is_sending());
    assert_eq!(store.messages.len(), 2);
    assert_eq!(store.messages[0].id, "m1");
    assert_eq!(store.messages[0].role, Role::User);
    assert_eq!(store.messages[1].id, "m2");
    assert_eq!(store.messages[1].role, Role::Assistant);
}

#[tokio::test]
async fn it_ignores_sends_while_one_is_in_flight() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/chat").expect(0).create();

    let api = authed_client(&server.url());
    let mut store = store_with_project();
    let mut flow = ChatFlow::new();
    flow.input = "hello".to_string();
    flow.sending = true;

    let outcome = flow.send(&api, &mut store).await;
    mock.assert();

    assert_eq!(outcome, SendOutcome::Ignored);
    assert!(store.messages.is_empty());
    // The queued draft stays put, it was never submitted.
    assert_eq!(flow.input, "hello");
}

#[tokio::test]
async fn it_ignores_empty_input_and_missing_project() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/chat").expect(0).create();
    let api = authed_client(&server.url());

    let mut store = store_with_project();
    let mut flow = ChatFlow::new();
    flow.input = "   ".to_string();
    assert_eq!(flow.send(&api, &mut store).await, SendOutcome::Ignored);

    let mut no_project = ProjectStore::new();
    flow.input = "hello".to_string();
    assert_eq!(flow.send(&api, &mut no_project).await, SendOutcome::Ignored);

    mock.assert();
}

#[tokio::test]
async fn it_surfaces_the_daily_limit_notice_on_429() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(429)
        .with_body(r#"{"detail": "Daily chat limit reached. Upgrade to premium for unlimited chats."}"#)
        .create();

    let api = authed_client(&server.url());
    let mut store = store_with_project();
    let mut flow = ChatFlow::new();
    flow.input = "hello".to_string();

    let outcome = flow.send(&api, &mut store).await;
    mock.assert();

    assert!(store.messages.is_empty());
    assert!(!flow.is_sending());
    assert!(outcome.notice().unwrap().contains("Daily chat limit reached"));
}

#[tokio::test]
async fn it_degrades_to_a_generic_notice_on_server_errors() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body(r#"{"detail": "AI service error"}"#)
        .create();

    let api = authed_client(&server.url());
    let mut store = store_with_project();
    let mut flow = ChatFlow::new();
    flow.input = "hello".to_string();

    let outcome = flow.send(&api, &mut store).await;
    mock.assert();

    assert_eq!(
        outcome,
        SendOutcome::Failed(super::SEND_FAILED_NOTICE.to_string())
    );
    assert!(store.messages.is_empty());
    assert!(!flow.is_sending());
}

#[tokio::test]
async fn it_replaces_messages_on_refresh() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/messages/p1")
        .with_status(200)
        .with_body(
            r#"[
                {"id": "m1", "project_id": "p1", "role": "user", "content": "hi", "created_at": "t1"},
                {"id": "m2", "project_id": "p1", "role": "assistant", "content": "hello", "created_at": "t2"}
            ]"#,
        )
        .create();

    let api = authed_client(&server.url());
    let mut store = store_with_project();
    refresh_messages(&api, &mut store).await;
    mock.assert();

    assert_eq!(store.messages.len(), 2);
    assert!(!store.is_loading);
}

#[tokio::test]
async fn it_keeps_rendered_messages_when_refresh_fails() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/api/messages/p1").with_status(500).create();

    let api = authed_client(&server.url());
    let mut store = store_with_project();
    store.add_message(crate::domain::models::Message::new(Role::User, "p1", "kept"));

    refresh_messages(&api, &mut store).await;
    mock.assert();

    assert_eq!(store.messages.len(), 1);
    assert!(!store.is_loading);
}
