//! Route handlers

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::ServerState;
use crate::annotations::{MOCK_RESPONSE, chat_request};
use crate::claude::{Message, Role, TextModel};
use crate::generate::html::render_html;
use crate::generate::{GenerateError, TextbookRequest};

const CONTENT_FIELDS: [&str; 4] = ["topic", "chapter_title", "section_title", "subsection_title"];
const CHAT_FAILED: &str = "Failed to process chat request";

/// Error half of the response envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, code, message: message.into() }
    }

    fn missing_data() -> Self {
        Self::bad_request("MISSING_DATA", "Request body is required")
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::InvalidRequest(message) => Self::bad_request("MISSING_FIELDS", message),
            other => {
                tracing::error!(error = %other, "generation failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "GENERATION_ERROR",
                    message: other.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "status": "error", "message": self.message, "code": self.code });
        (self.status, Json(body)).into_response()
    }
}

fn success(data: impl Serialize, message: &str) -> Response {
    let body = json!({ "status": "success", "data": data, "message": message });
    (StatusCode::OK, Json(body)).into_response()
}

/// A non-empty JSON object, or `MISSING_DATA`
fn json_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        _ => Err(ApiError::missing_data()),
    }
}

/// The four content fields, in order
fn content_fields(body: &Bytes) -> Result<[String; 4], ApiError> {
    let data = json_object(body)?;
    let missing: Vec<&str> = CONTENT_FIELDS
        .iter()
        .copied()
        .filter(|field| !matches!(data.get(*field), Some(Value::String(_))))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::bad_request(
            "MISSING_FIELDS",
            format!("Missing required fields: {}", missing.join(", ")),
        ));
    }
    Ok(CONTENT_FIELDS.map(|field| data[field].as_str().unwrap_or_default().to_string()))
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    messages: Vec<Message>,
    #[serde(default)]
    context: String,
}

pub async fn chat<M: TextModel>(State(state): State<Arc<ServerState<M>>>, body: Bytes) -> Response {
    let failed = || {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": CHAT_FAILED }))).into_response()
    };

    let body: ChatBody = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "invalid chat request");
            return failed();
        }
    };

    if state.chat.mock_responses {
        return Json(json!({ "response": MOCK_RESPONSE })).into_response();
    }

    // The client transcript opens with the assistant's greeting
    let messages: Vec<Message> =
        body.messages.into_iter().skip_while(|m| m.role == Role::Assistant).collect();
    let request =
        chat_request(state.chat.model, &state.chat, &body.context, messages).without_streaming();
    match state.generator.model().complete(request).await {
        Ok(response) => Json(json!({ "response": response })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "chat request failed");
            failed()
        }
    }
}

pub async fn generate_textbook<M: TextModel>(
    State(state): State<Arc<ServerState<M>>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let data = json_object(&body)?;
    let request: TextbookRequest = serde_json::from_value(Value::Object(data)).map_err(|_| {
        ApiError::bad_request("MISSING_FIELDS", "Missing required fields: subject, grade_level")
    })?;

    let textbook = state.generator.generate_textbook(&request).await?;
    Ok(success(textbook, "Textbook generated successfully"))
}

pub async fn generate_toc<M: TextModel>(
    State(state): State<Arc<ServerState<M>>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let topic = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("topic").and_then(Value::as_str).map(str::to_string))
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("MISSING_TOPIC", "Topic is required"))?;
    tracing::info!(%topic, "received table of contents request");

    let toc = state.generator.generate_table_of_contents(&topic).await?;
    Ok(success(toc, "Table of contents generated successfully"))
}

pub async fn generate_content<M: TextModel>(
    State(state): State<Arc<ServerState<M>>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let [topic, chapter, section, subsection] = content_fields(&body)?;
    let content = state
        .generator
        .generate_subsection_content(&topic, &chapter, &section, &subsection)
        .await?;
    Ok(success(content, "Content generated successfully"))
}

pub async fn generate_content_html<M: TextModel>(
    State(state): State<Arc<ServerState<M>>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let [topic, chapter, section, subsection] = content_fields(&body)?;
    let content = state
        .generator
        .generate_subsection_content(&topic, &chapter, &section, &subsection)
        .await?;
    let data = json!({ "html": render_html(&content.content), "metadata": content.metadata });
    Ok(success(data, "HTML content generated successfully"))
}
