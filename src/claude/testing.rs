//! Scripted `TextModel` for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use super::client::TextModel;
use super::error::ClaudeError;
use super::models::CreateMessageRequest;

/// Replies in order and records every request it was sent
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ClaudeError>>>,
    requests: Mutex<Vec<CreateMessageRequest>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::default(),
        }
    }

    pub fn failing(error: ClaudeError) -> Self {
        let model = Self::default();
        model.replies.lock().unwrap().push_back(Err(error));
        model
    }

    pub fn requests(&self) -> Vec<CreateMessageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl TextModel for ScriptedModel {
    async fn complete(&self, request: CreateMessageRequest) -> Result<String, ClaudeError> {
        self.requests.lock().unwrap().push(request);
        self.replies.lock().unwrap().pop_front().unwrap_or(Err(ClaudeError::EmptyResponse))
    }
}
