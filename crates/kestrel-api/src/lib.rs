//! Client for the chat backend's REST API.
//!
//! Every call may fail; callers log the [`ApiError`] and carry on.

mod http;

pub use http::HttpChatApi;

use async_trait::async_trait;
use kestrel_common::{Chat, ChatId, Message};

#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn create_user(&self, username: &str) -> Result<(), ApiError>;

    /// Create a chat owned by `owner`. The backend joins the owner to it.
    async fn create_chat(&self, owner: &str, name: &str) -> Result<(), ApiError>;

    async fn list_joined_chats(&self, username: &str) -> Result<Vec<Chat>, ApiError>;

    async fn list_available_chats(&self, username: &str) -> Result<Vec<Chat>, ApiError>;

    async fn join_chat(&self, username: &str, chat_id: ChatId) -> Result<(), ApiError>;

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, ApiError>;

    async fn send_message(
        &self,
        chat_id: ChatId,
        username: &str,
        content: &str,
    ) -> Result<(), ApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ApiError> for kestrel_common::KestrelError {
    fn from(err: ApiError) -> Self {
        kestrel_common::KestrelError::Api(err.to_string())
    }
}
