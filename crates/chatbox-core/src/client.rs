use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::error::ClientError;
use crate::protocol::{ChatRequest, ChatResponse};

/// Something that can answer a chat message.
///
/// The widget only talks to this trait, so tests and alternative transports
/// can stand in for the HTTP endpoint.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatResponse, ClientError>;
}

/// POSTs `{"message": ...}` as JSON to a fixed endpoint.
///
/// No timeout is configured: a request settles whenever the transport does.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, message: &str) -> Result<ChatResponse, ClientError> {
        let request = ChatRequest::new(message);

        debug!(endpoint = %self.endpoint, chars = message.chars().count(), "sending chat request");

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body = response.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        debug!(%status, "chat response received");

        Ok(ChatResponse::from_value(value))
    }
}
