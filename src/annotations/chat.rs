//! Chat about highlighted text

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::claude::{ClaudeClient, ClaudeError, ClaudeModel, CreateMessageRequest, Message, StreamEvent};
use crate::config::ChatConfig;

pub const MOCK_RESPONSE: &str =
    "This is a mock response. The actual API integration will be added later.";

pub const MOCK_DELAY: Duration = Duration::from_millis(1000);

pub fn chat_system_prompt(context: &str) -> String {
    format!(
        "You are a helpful assistant explaining Python concepts. The user has highlighted the following text: \"{}\". Please provide clear, concise explanations and examples when relevant.",
        context
    )
}

/// Request for one chat reply about `context`
pub fn chat_request(
    model: ClaudeModel,
    settings: &ChatConfig,
    context: &str,
    messages: Vec<Message>,
) -> CreateMessageRequest {
    CreateMessageRequest::new(model, messages)
        .with_system(chat_system_prompt(context))
        .with_max_tokens(settings.max_tokens)
        .with_temperature(settings.temperature)
}

/// Where chat replies come from
#[derive(Clone)]
pub enum ChatBackend {
    Claude(ClaudeClient),
    /// Canned reply after a short delay
    Mock,
}

impl ChatBackend {
    /// Claude when a key is configured and mocking is off
    pub fn select(settings: &ChatConfig) -> Self {
        if settings.mock_responses {
            return ChatBackend::Mock;
        }
        match ClaudeClient::from_env_or_keyring() {
            Ok(client) => ChatBackend::Claude(client),
            Err(err) => {
                tracing::info!("chat falls back to mock replies: {err}");
                ChatBackend::Mock
            }
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, ChatBackend::Mock)
    }

    /// Stream a reply into `tx`; the same events come out for either backend
    pub async fn reply(
        self,
        request: CreateMessageRequest,
        tx: mpsc::Sender<StreamEvent>,
        cancel: CancellationToken,
    ) -> Result<(), ClaudeError> {
        match self {
            ChatBackend::Claude(client) => client.send_streaming(request, tx, cancel).await,
            ChatBackend::Mock => mock_reply(tx, cancel).await,
        }
    }
}

async fn mock_reply(
    tx: mpsc::Sender<StreamEvent>,
    cancel: CancellationToken,
) -> Result<(), ClaudeError> {
    tokio::select! {
        _ = cancel.cancelled() => return Err(ClaudeError::Cancelled),
        _ = tokio::time::sleep(MOCK_DELAY) => {}
    }

    for event in [
        StreamEvent::ContentBlockDelta { text: MOCK_RESPONSE.to_string() },
        StreamEvent::MessageStop,
    ] {
        if tx.send(event).await.is_err() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_quotes_context() {
        let prompt = chat_system_prompt("x = 1");
        assert!(prompt.contains("highlighted the following text: \"x = 1\"."));
        assert!(prompt.starts_with("You are a helpful assistant explaining Python concepts."));
    }

    #[test]
    fn request_uses_chat_settings() {
        let settings = ChatConfig::default();
        let request =
            chat_request(ClaudeModel::Haiku45, &settings, "ctx", vec![Message::user("why?")]);
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, Some(0.7));
        assert!(request.system.unwrap().contains("\"ctx\""));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_replies_after_delay() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = tokio::spawn(ChatBackend::Mock.reply(
            CreateMessageRequest::new(ClaudeModel::Haiku45, vec![]),
            tx,
            CancellationToken::new(),
        ));

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, StreamEvent::ContentBlockDelta { ref text } if text == MOCK_RESPONSE));
        assert!(matches!(rx.recv().await, Some(StreamEvent::MessageStop)));
        assert!(handle.await.unwrap().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn mock_can_be_cancelled() {
        let (tx, _rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = ChatBackend::Mock
            .reply(CreateMessageRequest::new(ClaudeModel::Haiku45, vec![]), tx, cancel)
            .await;
        assert!(matches!(result, Err(ClaudeError::Cancelled)));
    }
}
