use std::time::Duration;

use async_trait::async_trait;
use kestrel_common::{Chat, ChatId, Message};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{ApiError, ChatApi};

/// Longest slice of an error body kept in [`ApiError::Status`].
const ERROR_BODY_LIMIT: usize = 200;

pub struct HttpChatApi {
    base_url: String,
    http: reqwest::Client,
}

/// List entry as returned by the chat listing routes.
#[derive(Deserialize)]
struct ChatEntry {
    id: ChatId,
    name: String,
}

impl ChatEntry {
    fn into_chat(self, joined: bool) -> Chat {
        Chat {
            id: self.id,
            name: self.name,
            joined,
        }
    }
}

impl HttpChatApi {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = text.chars().take(ERROR_BODY_LIMIT).collect::<String>();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        debug!(path = %path, "API GET");
        let response = self.send(self.http.get(self.url(path)).query(query)).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), ApiError> {
        debug!(path = %path, "API POST");
        self.send(self.http.post(self.url(path)).json(&body))
            .await
            .map(|_| ())
    }

    async fn list_chats(&self, path: &str, username: &str, joined: bool) -> Result<Vec<Chat>, ApiError> {
        let entries: Vec<ChatEntry> = self.get_json(path, &[("username", username)]).await?;
        Ok(entries.into_iter().map(|e| e.into_chat(joined)).collect())
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn create_user(&self, username: &str) -> Result<(), ApiError> {
        self.post_json("/users", json!({ "username": username })).await
    }

    async fn create_chat(&self, owner: &str, name: &str) -> Result<(), ApiError> {
        self.post_json("/chats", json!({ "username": owner, "name": name }))
            .await
    }

    async fn list_joined_chats(&self, username: &str) -> Result<Vec<Chat>, ApiError> {
        self.list_chats("/chats/joined", username, true).await
    }

    async fn list_available_chats(&self, username: &str) -> Result<Vec<Chat>, ApiError> {
        self.list_chats("/chats/not-joined", username, false).await
    }

    async fn join_chat(&self, username: &str, chat_id: ChatId) -> Result<(), ApiError> {
        self.post_json(
            &format!("/chats/{chat_id}/join"),
            json!({ "username": username }),
        )
        .await
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, ApiError> {
        self.get_json(&format!("/chats/{chat_id}/messages"), &[]).await
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        username: &str,
        content: &str,
    ) -> Result<(), ApiError> {
        let body = json!({
            "username": username,
            "content": content,
            "sent_at": chrono::Utc::now().timestamp(),
        });
        self.post_json(&format!("/chats/{chat_id}/messages"), body)
            .await
    }
}
