use std::time::Duration;

use kestrel_common::ChatId;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::HttpChatApi;
use crate::{ApiError, ChatApi};

fn api(server: &MockServer) -> HttpChatApi {
    HttpChatApi::new(
        &server.uri(),
        Duration::from_secs(2),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn id(raw: u64) -> ChatId {
    ChatId::new(raw).unwrap()
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let api = HttpChatApi::new(
        "http://localhost:8080/",
        Duration::from_secs(1),
        Duration::from_secs(1),
    )
    .unwrap();
    assert_eq!(api.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn create_user_posts_username() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"username": "ada"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).create_user("ada").await.unwrap();
}

#[tokio::test]
async fn create_chat_posts_owner_and_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats"))
        .and(body_json(json!({"username": "ada", "name": "rust"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).create_chat("ada", "rust").await.unwrap();
}

#[tokio::test]
async fn list_joined_marks_chats_joined() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats/joined"))
        .and(query_param("username", "ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "general"},
            {"id": 4, "name": "rust", "created_by": "bob"}
        ])))
        .mount(&server)
        .await;

    let chats = api(&server).list_joined_chats("ada").await.unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[1].id, id(4));
    assert_eq!(chats[1].name, "rust");
    assert!(chats.iter().all(|c| c.joined));
}

#[tokio::test]
async fn list_available_marks_chats_not_joined() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats/not-joined"))
        .and(query_param("username", "ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 9, "name": "ops"}])))
        .mount(&server)
        .await;

    let chats = api(&server).list_available_chats("ada").await.unwrap();
    assert_eq!(chats.len(), 1);
    assert!(!chats[0].joined);
    assert_eq!(chats[0].to_string(), "ops (#9)");
}

#[tokio::test]
async fn join_chat_posts_to_chat_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats/7/join"))
        .and(body_json(json!({"username": "ada"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).join_chat("ada", id(7)).await.unwrap();
}

#[tokio::test]
async fn list_messages_accepts_string_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats/3/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"sent_by": "ada", "sent_at": 1700000000, "content": "hi"},
            {"sent_by": "bob", "sent_at": "1700000060", "content": "hey"}
        ])))
        .mount(&server)
        .await;

    let messages = api(&server).list_messages(id(3)).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].sent_by, "bob");
    assert_eq!(messages[1].sent_at, 1_700_000_060);
}

#[tokio::test]
async fn send_message_includes_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chats/3/messages"))
        .and(body_partial_json(json!({"username": "ada", "content": "hello"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).send_message(id(3), "ada", "hello").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["sent_at"].as_i64().unwrap() > 1_600_000_000);
}

#[tokio::test]
async fn error_status_is_truncated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(500)))
        .mount(&server)
        .await;

    let err = api(&server).create_user("ada").await.unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body.len(), 200);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn bad_json_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chats/joined"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api(&server).list_joined_chats("ada").await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let api = HttpChatApi::new(
        "http://127.0.0.1:1",
        Duration::from_millis(200),
        Duration::from_millis(500),
    )
    .unwrap();
    let err = api.create_user("ada").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
