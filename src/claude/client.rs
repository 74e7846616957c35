//! HTTP client for the Claude messages API

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::ClaudeError;
use super::models::{CreateMessageRequest, MessageResponse, StreamEvent};
use super::streaming;

/// Anything that can turn a message request into generated text.
///
/// Generation and the HTTP API are written against this trait so they can run
/// against scripted replies in tests.
pub trait TextModel: Send + Sync + 'static {
    fn complete(
        &self,
        request: CreateMessageRequest,
    ) -> impl Future<Output = Result<String, ClaudeError>> + Send;
}

#[derive(Clone)]
pub struct ClaudeClient {
    client: Client,
    api_key: String,
}

impl ClaudeClient {
    const API_URL: &'static str = "https://api.anthropic.com/v1/messages";
    const API_VERSION: &'static str = "2023-06-01";

    /// Create a client; generation can take minutes so the timeout is long
    pub fn new(api_key: String) -> Result<Self, ClaudeError> {
        let client = Client::builder().timeout(Duration::from_secs(300)).build()?;
        Ok(Self { client, api_key })
    }

    /// Create a client from the configured API key
    pub fn from_env_or_keyring() -> Result<Self, ClaudeError> {
        Self::new(super::ApiKeyManager::get_api_key()?)
    }

    async fn post(&self, request: &CreateMessageRequest) -> Result<Response, ClaudeError> {
        let response = self
            .client
            .post(Self::API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        check_status(response).await
    }

    /// Stream a response through `tx` until done or `cancel_token` fires
    pub async fn send_streaming(
        &self,
        request: CreateMessageRequest,
        tx: mpsc::Sender<StreamEvent>,
        cancel_token: CancellationToken,
    ) -> Result<(), ClaudeError> {
        let response = self.post(&request).await?;
        streaming::process_stream(response, tx, cancel_token).await
    }

    /// Send a request and wait for the complete response
    pub async fn send_message(
        &self,
        request: CreateMessageRequest,
    ) -> Result<MessageResponse, ClaudeError> {
        let response = self.post(&request.without_streaming()).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl TextModel for ClaudeClient {
    async fn complete(&self, request: CreateMessageRequest) -> Result<String, ClaudeError> {
        let response = self.send_message(request).await?;
        if response.truncated() {
            tracing::warn!(id = %response.id, "response hit the max_tokens limit");
        }
        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion finished"
        );
        let text = response.text();
        if text.trim().is_empty() { Err(ClaudeError::EmptyResponse) } else { Ok(text) }
    }
}

/// Map non-success statuses onto `ClaudeError`
async fn check_status(response: Response) -> Result<Response, ClaudeError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return Err(ClaudeError::RateLimited { retry_after_seconds: retry_after });
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(ClaudeError::ApiError { status: 401, message: "Invalid API key".to_string() });
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ClaudeError::ApiError { status: status.as_u16(), message });
    }

    Ok(response)
}
