//! Error types for Claude API calls

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("API key not configured. Set ANTHROPIC_API_KEY or run :key <api-key>")]
    ApiKeyNotFound,

    #[error("Failed to access keyring: {0}")]
    KeyringError(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Stream parsing error: {0}")]
    StreamParseError(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid API key format. Key should start with 'sk-ant-'")]
    InvalidApiKey,

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ClaudeError {
    /// Whether retrying the same request can succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClaudeError::RateLimited { .. }
                | ClaudeError::RequestError(_)
                | ClaudeError::Cancelled
                | ClaudeError::EmptyResponse
        )
    }

    /// Whether the user has to fix their API key first
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            ClaudeError::ApiKeyNotFound
                | ClaudeError::InvalidApiKey
                | ClaudeError::ApiError { status: 401, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_requires_reauth() {
        let err = ClaudeError::ApiError { status: 401, message: "Invalid API key".into() };
        assert!(err.requires_reauth());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn rate_limit_is_recoverable() {
        assert!(ClaudeError::RateLimited { retry_after_seconds: 30 }.is_recoverable());
        assert!(!ClaudeError::RateLimited { retry_after_seconds: 30 }.requires_reauth());
    }
}
