//! Highlights, notes and chat about selected passages
//!
//! Highlights and their conversations last for the session. Notes are saved
//! to `notes.json` in the data directory.

pub mod chat;
pub mod model;
pub mod storage;

pub use chat::{ChatBackend, MOCK_RESPONSE, chat_request, chat_system_prompt};
pub use model::{ChatTurn, Conversation, Highlight, HighlightSet, Note, normalize};
pub use storage::NotesStore;
