//! Server-Sent Events decoding for streamed Claude responses

use futures_util::StreamExt;
use reqwest::Response;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::ClaudeError;
use super::models::StreamEvent;

/// Incremental SSE decoder; chunks may split lines anywhere
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    event_type: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        while let Some(newline_pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline_pos).collect();
            let line = line.trim_end();

            if let Some(event_type) = line.strip_prefix("event:") {
                self.event_type = event_type.trim().to_string();
            } else if let Some(data) = line.strip_prefix("data:") {
                if let Some(event) = parse_event(&self.event_type, data.trim_start()) {
                    events.push(event);
                }
            }
            // Blank lines and ":" comments carry nothing we need
        }
        events
    }
}

/// Read the response body as SSE and forward events through `tx`
pub async fn process_stream(
    response: Response,
    tx: mpsc::Sender<StreamEvent>,
    cancel_token: CancellationToken,
) -> Result<(), ClaudeError> {
    let mut stream = response.bytes_stream();
    let mut decoder = SseDecoder::new();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                return Err(ClaudeError::Cancelled);
            }

            chunk = stream.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        for event in decoder.feed(&bytes) {
                            if tx.send(event).await.is_err() {
                                // Receiver dropped: nobody is listening anymore
                                return Ok(());
                            }
                        }
                    }
                    Some(Err(e)) => return Err(ClaudeError::RequestError(e)),
                    None => break,
                }
            }
        }
    }

    Ok(())
}

fn parse_event(event_type: &str, data: &str) -> Option<StreamEvent> {
    match event_type {
        "message_start" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let id = parsed["message"]["id"].as_str()?.to_string();
            Some(StreamEvent::MessageStart { id })
        }
        "content_block_start" => Some(StreamEvent::ContentBlockStart),
        "content_block_delta" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let text = parsed["delta"]["text"].as_str()?.to_string();
            Some(StreamEvent::ContentBlockDelta { text })
        }
        "content_block_stop" => Some(StreamEvent::ContentBlockStop),
        "message_delta" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let stop_reason = parsed["delta"]["stop_reason"].as_str().map(|s| s.to_string());
            Some(StreamEvent::MessageDelta { stop_reason })
        }
        "message_stop" => Some(StreamEvent::MessageStop),
        "ping" => Some(StreamEvent::Ping),
        "error" => {
            let parsed: serde_json::Value = serde_json::from_str(data).ok()?;
            let message =
                parsed["error"]["message"].as_str().unwrap_or("Unknown error").to_string();
            Some(StreamEvent::Error { message })
        }
        _ => {
            tracing::debug!("Unknown SSE event type: {}", event_type);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_content_block_delta() {
        let data = r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hello"}}"#;
        assert!(matches!(
            parse_event("content_block_delta", data),
            Some(StreamEvent::ContentBlockDelta { text }) if text == "Hello"
        ));
    }

    #[test]
    fn parse_error() {
        let data = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert!(matches!(
            parse_event("error", data),
            Some(StreamEvent::Error { message }) if message == "Overloaded"
        ));
    }

    #[test]
    fn decoder_handles_lines_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let first = decoder.feed(b"event: content_block_delta\ndata: {\"delta\":{\"te");
        assert!(first.is_empty());

        let second = decoder.feed(b"xt\":\"Hi\"}}\n\nevent: message_stop\ndata: {}\n");
        assert_eq!(second.len(), 2);
        assert!(matches!(&second[0], StreamEvent::ContentBlockDelta { text } if text == "Hi"));
        assert!(matches!(second[1], StreamEvent::MessageStop));
    }

    #[test]
    fn decoder_ignores_comments_and_unknown_events() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b": keepalive\nevent: mystery\ndata: {}\n\nevent: ping\ndata: {}\n");
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], StreamEvent::Ping));
    }
}
