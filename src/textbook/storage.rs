//! Persistence of the current textbook
//!
//! A single JSON file in the data directory holds whatever the reader shows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::Textbook;
use crate::config::Config;

pub const TEXTBOOK_FILE: &str = "textbook_content.json";

#[derive(Debug, Clone)]
pub struct TextbookStore {
    path: PathBuf,
}

impl TextbookStore {
    /// Store under the platform data directory
    pub fn open() -> Result<Self> {
        Ok(Self::at(Config::data_dir()?.join(TEXTBOOK_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored textbook; `None` when nothing has been saved yet
    pub fn load(&self) -> Result<Option<Textbook>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read textbook from {:?}", self.path))?;
        let textbook = Textbook::from_json(&contents)
            .with_context(|| format!("Stored textbook in {:?} is invalid", self.path))?;
        Ok(Some(textbook))
    }

    pub fn save(&self, textbook: &Textbook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(textbook).context("Failed to serialize textbook")?;

        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write textbook to {:?}", self.path))?;

        tracing::debug!(path = ?self.path, title = %textbook.title, "textbook saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {:?}", self.path))?;
        }
        Ok(())
    }

    /// Read a textbook JSON file from anywhere and make it the current one
    pub fn import(&self, source: &Path) -> Result<Textbook> {
        let contents = fs::read_to_string(source)
            .with_context(|| format!("Failed to read {:?}", source))?;
        let textbook = Textbook::from_llm_response(&contents)
            .with_context(|| format!("{:?} is not a textbook", source))?;
        self.save(&textbook)?;
        Ok(textbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textbook::sample;
    use pretty_assertions::assert_eq;

    fn store(dir: &tempfile::TempDir) -> TextbookStore {
        TextbookStore::at(dir.path().join("nested").join(TEXTBOOK_FILE))
    }

    #[test]
    fn load_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let book = sample::sample();
        store.save(&book).unwrap();
        assert_eq!(store.load().unwrap(), Some(book));
    }

    #[test]
    fn invalid_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{\"title\": 3}").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.save(&sample::sample()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn import_accepts_fenced_json() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("book.md");
        fs::write(&source, "```json\n{\"title\": \"Art\", \"chapters\": [{\"title\": \"Color\", \"content\": \"Hue.\"}]}\n```").unwrap();

        let store = store(&dir);
        let book = store.import(&source).unwrap();
        assert_eq!(book.title, "Art");
        assert_eq!(store.load().unwrap().map(|b| b.title), Some("Art".to_string()));
    }
}
