//! Highlights, notes and chat conversations about selected text

use std::ops::Range;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::claude::{Message, Role};
use crate::textbook::Location;

/// One message of a chat about a selection
pub type ChatTurn = Message;

/// Collapse all whitespace runs to single spaces
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn now_timestamp() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0)
}

/// A conversation shown in the chat panel
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub location: Location,
    pub selected_text: String,
    /// First rendered line of the selection
    pub anchor_line: usize,
    pub line_count: usize,
    pub turns: Vec<ChatTurn>,
    /// Reply text received so far while waiting
    pub pending: Option<String>,
    /// Highlight this conversation was reopened from
    pub highlight_id: Option<u64>,
}

impl Conversation {
    pub fn new(location: Location, selected_text: impl Into<String>, lines: Range<usize>) -> Self {
        let selected_text = selected_text.into();
        Self {
            location,
            turns: vec![Message::assistant(format!("Ask about \"{}\"", selected_text))],
            selected_text,
            anchor_line: lines.start,
            line_count: lines.len().max(1),
            pending: None,
            highlight_id: None,
        }
    }

    /// Reopen the conversation stored on a highlight
    pub fn resume(highlight: &Highlight) -> Self {
        Self {
            location: highlight.location,
            selected_text: highlight.text.clone(),
            anchor_line: highlight.anchor_line,
            line_count: highlight.line_count,
            turns: highlight.messages.clone(),
            pending: None,
            highlight_id: Some(highlight.id),
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Add the user's question and start waiting for the reply
    pub fn ask(&mut self, question: &str) -> bool {
        let question = question.trim();
        if question.is_empty() || self.is_waiting() {
            return false;
        }
        self.turns.push(Message::user(question));
        self.pending = Some(String::new());
        true
    }

    pub fn append_reply(&mut self, text: &str) {
        if let Some(pending) = self.pending.as_mut() {
            pending.push_str(text);
        }
    }

    /// Move the received reply into the turn list
    pub fn finish_reply(&mut self) {
        if let Some(reply) = self.pending.take() {
            if !reply.trim().is_empty() {
                self.turns.push(Message::assistant(reply));
            }
        }
    }

    pub fn fail_reply(&mut self, error: &str) {
        self.pending = None;
        self.turns.push(Message::assistant(format!("Sorry, something went wrong: {}", error)));
    }

    /// Turns to send upstream; the API wants the user to speak first
    pub fn api_messages(&self) -> Vec<Message> {
        self.turns.iter().skip_while(|m| m.role == Role::Assistant).cloned().collect()
    }

    /// Whether the user has asked anything yet
    pub fn has_questions(&self) -> bool {
        self.turns.iter().any(|m| m.role == Role::User)
    }
}

/// A selection the user accepted a chat answer for; lives for the session
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub id: u64,
    pub location: Location,
    pub text: String,
    pub anchor_line: usize,
    pub line_count: usize,
    pub messages: Vec<ChatTurn>,
}

impl Highlight {
    /// Rendered line range currently covered by the highlight
    ///
    /// The original lines win when they still contain the text; after a
    /// rewrap the first run of lines containing it is used instead.
    pub fn locate(&self, lines: &[String]) -> Option<Range<usize>> {
        let needle = normalize(&self.text);
        if needle.is_empty() {
            return None;
        }

        let anchor = self.anchor_line..self.anchor_line + self.line_count.max(1);
        if anchor.end <= lines.len() && normalize(&lines[anchor.clone()].join(" ")).contains(&needle) {
            return Some(anchor);
        }

        // Smallest window ending at the earliest line that completes the text
        for end in 0..lines.len() {
            let mut tail_len = 0;
            for start in (0..=end).rev() {
                if tail_len > needle.len() + lines[end].len() + 1 {
                    break;
                }
                if normalize(&lines[start..=end].join(" ")).contains(&needle) {
                    return Some(start..end + 1);
                }
                tail_len += lines[start].trim().len() + 1;
            }
        }
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    items: Vec<Highlight>,
    next_id: u64,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an accepted conversation, updating it if it came from a highlight
    pub fn accept(&mut self, conversation: &Conversation) -> u64 {
        if let Some(id) = conversation.highlight_id {
            if self.update_messages(id, conversation.turns.clone()) {
                return id;
            }
        }

        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Highlight {
            id,
            location: conversation.location,
            text: conversation.selected_text.clone(),
            anchor_line: conversation.anchor_line,
            line_count: conversation.line_count,
            messages: conversation.turns.clone(),
        });
        id
    }

    pub fn update_messages(&mut self, id: u64, messages: Vec<ChatTurn>) -> bool {
        match self.items.iter_mut().find(|h| h.id == id) {
            Some(highlight) => {
                highlight.messages = messages;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: u64) -> Option<&Highlight> {
        self.items.iter().find(|h| h.id == id)
    }

    pub fn for_location(&self, location: Location) -> impl Iterator<Item = &Highlight> {
        self.items.iter().filter(move |h| h.location == location)
    }

    /// The highlight covering rendered `line` of the page at `location`
    pub fn find_at(&self, location: Location, line: usize, lines: &[String]) -> Option<&Highlight> {
        self.for_location(location)
            .find(|h| h.locate(lines).is_some_and(|range| range.contains(&line)))
    }

    /// Line ranges to paint for a page
    pub fn ranges(&self, location: Location, lines: &[String]) -> Vec<Range<usize>> {
        self.for_location(location).filter_map(|h| h.locate(lines)).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A note attached to a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub location: Location,
    pub selected_text: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    pub fn new(id: u64, location: Location, selected_text: &str, content: &str) -> Self {
        let now = now_timestamp();
        Self {
            id,
            location,
            selected_text: selected_text.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_content(&mut self, content: &str) {
        self.content = content.to_string();
        self.updated_at = now_timestamp();
    }

    /// Whether this note belongs to the given selection
    pub fn matches(&self, selected_text: &str) -> bool {
        normalize(&self.selected_text) == normalize(selected_text)
    }
}
