//! Claude API integration
//!
//! API key resolution, HTTP client, streaming decoder and the `TextModel`
//! seam used by generation and the HTTP API.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod streaming;

pub use auth::ApiKeyManager;
pub use client::{ClaudeClient, TextModel};
pub use error::ClaudeError;
pub use models::{ClaudeModel, CreateMessageRequest, Message, Role, StreamEvent};

#[cfg(test)]
pub mod testing;
