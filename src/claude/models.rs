//! Request and response types for the Claude messages API

use serde::{Deserialize, Serialize};

/// Models the generator and chat can run on
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClaudeModel {
    /// Claude Haiku 4.5 - fast, good enough for chat answers
    Haiku45,
    /// Claude Sonnet 4.5 - default for textbook generation
    #[default]
    Sonnet45,
    /// Claude Opus 4.5 - slowest, best long-form writing
    Opus45,
}

impl ClaudeModel {
    /// API model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Haiku45 => "claude-haiku-4-5-20251001",
            Self::Sonnet45 => "claude-sonnet-4-5-20250929",
            Self::Opus45 => "claude-opus-4-5-20251101",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Haiku45 => "Claude Haiku 4.5",
            Self::Sonnet45 => "Claude Sonnet 4.5",
            Self::Opus45 => "Claude Opus 4.5",
        }
    }

    /// Parse a short name ("haiku") or a full model id
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "haiku" | "haiku45" | "haiku4.5" | "claude-haiku-4-5-20251001" => Some(Self::Haiku45),
            "sonnet" | "sonnet45" | "sonnet4.5" | "claude-sonnet-4-5-20250929" => {
                Some(Self::Sonnet45)
            }
            "opus" | "opus45" | "opus4.5" | "claude-opus-4-5-20251101" => Some(Self::Opus45),
            _ => None,
        }
    }

    pub fn all() -> &'static [ClaudeModel] {
        &[Self::Haiku45, Self::Sonnet45, Self::Opus45]
    }
}

impl std::str::FromStr for ClaudeModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown model: {}. Options: haiku, sonnet, opus", s))
    }
}

/// Message role in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Request body for the messages endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CreateMessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

impl CreateMessageRequest {
    /// Create a streaming request with a generous token budget
    pub fn new(model: ClaudeModel, messages: Vec<Message>) -> Self {
        Self {
            model: model.model_id().to_string(),
            max_tokens: 8192,
            messages,
            system: None,
            temperature: None,
            stream: true,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 1.0));
        self
    }

    pub fn without_streaming(mut self) -> Self {
        self.stream = false;
        self
    }
}

/// Events parsed from the streaming (SSE) response
#[derive(Debug, Clone)]
pub enum StreamEvent {
    MessageStart {
        id: String,
    },
    ContentBlockStart,
    /// A chunk of generated text
    ContentBlockDelta {
        text: String,
    },
    ContentBlockStop,
    MessageDelta {
        stop_reason: Option<String>,
    },
    MessageStop,
    Ping,
    Error {
        message: String,
    },
}

/// Non-streaming response
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

impl MessageResponse {
    /// Concatenate every text block of the response
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Whether generation stopped on the token limit
    pub fn truncated(&self) -> bool {
        self.stop_reason.as_deref() == Some("max_tokens")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_parse() {
        assert_eq!(ClaudeModel::parse("haiku"), Some(ClaudeModel::Haiku45));
        assert_eq!(ClaudeModel::parse("SONNET"), Some(ClaudeModel::Sonnet45));
        assert_eq!(ClaudeModel::parse("claude-opus-4-5-20251101"), Some(ClaudeModel::Opus45));
        assert_eq!(ClaudeModel::parse("gpt-4"), None);
    }

    #[test]
    fn request_builder() {
        let request = CreateMessageRequest::new(ClaudeModel::Haiku45, vec![Message::user("Hi")])
            .with_system("You are a tutor")
            .with_max_tokens(500)
            .with_temperature(0.7)
            .without_streaming();

        assert_eq!(request.model, "claude-haiku-4-5-20251001");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, Some(0.7));
        assert!(!request.stream);
    }

    #[test]
    fn temperature_is_clamped() {
        let request = CreateMessageRequest::new(ClaudeModel::Haiku45, vec![]).with_temperature(3.0);
        assert_eq!(request.temperature, Some(1.0));
    }

    #[test]
    fn temperature_omitted_when_unset() {
        let request = CreateMessageRequest::new(ClaudeModel::Haiku45, vec![Message::user("Hi")]);
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("temperature"));
        assert!(!json.contains("system"));
    }

    #[test]
    fn response_text_joins_text_blocks() {
        let body = r#"{
            "id": "msg_1",
            "content": [
                {"type": "text", "text": "Hello, "},
                {"type": "tool_use"},
                {"type": "text", "text": "world"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 3, "output_tokens": 2}
        }"#;
        let response: MessageResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), "Hello, world");
        assert!(!response.truncated());
    }
}
