//! Note persistence

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::model::Note;
use crate::config::Config;
use crate::textbook::Location;

/// All notes for the current textbook
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotesStore {
    /// Title of the textbook the notes belong to
    #[serde(default)]
    textbook: Option<String>,
    notes: Vec<Note>,
    next_id: u64,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl NotesStore {
    /// Load `notes.json` from the data directory
    pub fn load() -> Result<Self> {
        Self::load_from(Config::data_dir()?.join("notes.json"))
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read notes from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse notes.json")?
        } else {
            Self::default()
        };
        store.path = Some(path);
        Ok(store)
    }

    /// Write back to the file this store was loaded from
    pub fn save(&self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize notes")?;

        fs::write(path, contents).with_context(|| format!("Failed to write notes to {:?}", path))?;

        Ok(())
    }

    /// The note for a selection on a page
    pub fn get(&self, location: Location, selected_text: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.location == location && n.matches(selected_text))
    }

    /// Create or replace the note for a selection; an empty note deletes it
    pub fn upsert(&mut self, location: Location, selected_text: &str, content: &str) -> Option<u64> {
        let existing = self
            .notes
            .iter()
            .position(|n| n.location == location && n.matches(selected_text));

        if content.trim().is_empty() {
            if let Some(idx) = existing {
                self.notes.remove(idx);
            }
            return None;
        }

        match existing {
            Some(idx) => {
                self.notes[idx].update_content(content);
                Some(self.notes[idx].id)
            }
            None => {
                self.next_id += 1;
                self.notes.push(Note::new(self.next_id, location, selected_text, content));
                Some(self.next_id)
            }
        }
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() < before
    }

    pub fn for_location(&self, location: Location) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.location == location).collect()
    }

    pub fn all(&self) -> &[Note] {
        &self.notes
    }

    /// Bind the store to `title`, dropping the notes of any other textbook.
    /// Returns true when the store changed and should be saved.
    pub fn switch_textbook(&mut self, title: &str) -> bool {
        if self.textbook.as_deref() == Some(title) {
            return false;
        }
        tracing::debug!(from = ?self.textbook, to = title, dropped = self.notes.len(), "notes rebound");
        self.notes.clear();
        self.textbook = Some(title.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn upsert_creates_then_updates() {
        let mut store = NotesStore::default();
        let id = store.upsert(Location::Chapter(0), "range(5)", "yields 0..4").unwrap();
        assert_eq!(store.upsert(Location::Chapter(0), "range(5)", "stops before 5"), Some(id));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(Location::Chapter(0), "range(5)").unwrap().content, "stops before 5");
    }

    #[test]
    fn same_text_on_other_page_is_separate() {
        let mut store = NotesStore::default();
        store.upsert(Location::Chapter(0), "loop", "a");
        store.upsert(Location::Chapter(1), "loop", "b");
        assert_eq!(store.len(), 2);
        assert_eq!(store.for_location(Location::Chapter(1))[0].content, "b");
    }

    #[test]
    fn empty_content_deletes() {
        let mut store = NotesStore::default();
        store.upsert(Location::Chapter(0), "x", "note");
        assert_eq!(store.upsert(Location::Chapter(0), "x", "  "), None);
        assert!(store.is_empty());
    }

    #[test]
    fn delete_by_id() {
        let mut store = NotesStore::default();
        let id = store.upsert(Location::Chapter(0), "x", "note").unwrap();
        assert!(store.delete(id));
        assert!(!store.delete(id));
    }

    #[test]
    fn switching_textbook_drops_old_notes() {
        let mut store = NotesStore::default();
        assert!(store.switch_textbook("Python"));
        store.upsert(Location::Chapter(0), "Introduction", "from python");

        assert!(!store.switch_textbook("Python"));
        assert_eq!(store.len(), 1);

        assert!(store.switch_textbook("Biology"));
        assert!(store.get(Location::Chapter(0), "Introduction").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn textbook_title_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");

        let mut store = NotesStore::load_from(&path).unwrap();
        store.switch_textbook("Python");
        store.upsert(Location::Chapter(0), "x", "kept");
        store.save().unwrap();

        let mut reloaded = NotesStore::load_from(&path).unwrap();
        assert!(!reloaded.switch_textbook("Python"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn persists_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("notes.json");

        let mut store = NotesStore::load_from(&path).unwrap();
        store.upsert(Location::Subsection(0, 1, 2), "def f():", "functions");
        store.save().unwrap();

        let reloaded = NotesStore::load_from(&path).unwrap();
        assert_eq!(reloaded.all(), store.all());
        let mut reloaded = reloaded;
        let id = reloaded.upsert(Location::Chapter(0), "new", "text").unwrap();
        assert_eq!(id, 2);
    }
}
