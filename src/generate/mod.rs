//! Textbook generation with a language model
//!
//! Three kinds of request go out: a whole outline textbook from a subject and
//! grade, an expanded table of contents for a topic, and the markdown body of
//! one subsection. [`Generator::build_course`] chains the last two into a
//! complete course cached on disk.

pub mod html;
pub mod prompts;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claude::{ClaudeError, ClaudeModel, CreateMessageRequest, Message, TextModel};
use crate::textbook::{Location, Section, Subsection, Textbook, TextbookError};

pub use html::{clean_content, render_html};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Model(#[from] ClaudeError),

    #[error("model reply is not a usable textbook: {0}")]
    Parse(#[from] TextbookError),

    #[error("failed to write {path:?}: {source}")]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What the generator form collects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextbookRequest {
    pub subject: String,
    #[serde(alias = "gradeLevel")]
    pub grade_level: String,
    #[serde(default, alias = "additionalInfo")]
    pub additional_info: String,
}

impl TextbookRequest {
    pub fn validate(&self) -> Result<(), GenerateError> {
        let mut missing = Vec::new();
        if self.subject.trim().is_empty() {
            missing.push("subject");
        }
        if self.grade_level.trim().is_empty() {
            missing.push("grade level");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(GenerateError::InvalidRequest(format!("Missing {}", missing.join(" and "))))
        }
    }
}

/// Where a generated subsection sits in the book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub topic: String,
    pub chapter: String,
    pub section: String,
    pub subsection: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionContent {
    pub content: String,
    pub metadata: ContentMetadata,
}

/// Generation entry points over any [`TextModel`]
pub struct Generator<M> {
    model: Arc<M>,
    claude_model: ClaudeModel,
}

impl<M> Clone for Generator<M> {
    fn clone(&self) -> Self {
        Self { model: Arc::clone(&self.model), claude_model: self.claude_model }
    }
}

impl<M: TextModel> Generator<M> {
    pub fn new(model: M, claude_model: ClaudeModel) -> Self {
        Self::from_shared(Arc::new(model), claude_model)
    }

    pub fn from_shared(model: Arc<M>, claude_model: ClaudeModel) -> Self {
        Self { model, claude_model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn request(&self, system: &str, user: String) -> CreateMessageRequest {
        CreateMessageRequest::new(self.claude_model, vec![Message::user(user)]).with_system(system)
    }

    /// Outline textbook `{ title, chapters: [{ title, content }] }`
    pub async fn generate_textbook(
        &self,
        request: &TextbookRequest,
    ) -> Result<Textbook, GenerateError> {
        request.validate()?;
        tracing::info!(subject = %request.subject, grade = %request.grade_level, "generating textbook");

        let prompt = prompts::textbook_user_prompt(
            request.subject.trim(),
            request.grade_level.trim(),
            request.additional_info.trim(),
        );
        let reply =
            self.model.complete(self.request(prompts::TEXTBOOK_SYSTEM_PROMPT, prompt)).await?;
        let textbook = Textbook::from_llm_response(&reply)?;

        tracing::info!(title = %textbook.title, chapters = textbook.chapters.len(), "textbook generated");
        Ok(textbook)
    }

    /// Chapters, sections and subsections without bodies
    pub async fn generate_table_of_contents(&self, topic: &str) -> Result<Textbook, GenerateError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerateError::InvalidRequest("Topic is required".into()));
        }
        tracing::info!(%topic, "generating table of contents");

        let reply = self
            .model
            .complete(self.request(prompts::TOC_SYSTEM_PROMPT, prompts::toc_user_prompt(topic)))
            .await?;
        Ok(Textbook::from_llm_response(&reply)?)
    }

    /// Markdown body for one subsection, always starting with a level 1 heading
    pub async fn generate_subsection_content(
        &self,
        topic: &str,
        chapter: &str,
        section: &str,
        subsection: &str,
    ) -> Result<SubsectionContent, GenerateError> {
        tracing::info!(%subsection, "generating subsection content");

        let prompt = prompts::content_user_prompt(topic, chapter, section, subsection);
        let reply = self.model.complete(self.request(prompts::CONTENT_SYSTEM_PROMPT, prompt)).await?;

        let content = if reply.starts_with("# ") {
            reply
        } else {
            format!("# {subsection}\n\n{reply}")
        };

        Ok(SubsectionContent {
            content,
            metadata: ContentMetadata {
                topic: topic.to_string(),
                chapter: chapter.to_string(),
                section: section.to_string(),
                subsection: subsection.to_string(),
            },
        })
    }

    /// Generate the body of the subsection at `location` inside `textbook`
    pub async fn generate_for_location(
        &self,
        textbook: &Textbook,
        location: Location,
    ) -> Result<SubsectionContent, GenerateError> {
        let Location::Subsection(c, s, ss) = location else {
            return Err(GenerateError::InvalidRequest(
                "Content can only be generated for a subsection".into(),
            ));
        };
        let (Some(chapter), Some(section), Some(sub)) = (
            textbook.chapters.get(c),
            textbook.section(c, s),
            textbook.subsection(c, s, ss),
        ) else {
            return Err(GenerateError::InvalidRequest(format!("No subsection {location}")));
        };

        self.generate_subsection_content(&textbook.title, &chapter.title, &section.title, &sub.title)
            .await
    }

    /// Generate a table of contents and every subsection body, caching each
    /// section as JSON under `cache_dir`
    pub async fn build_course(
        &self,
        topic: &str,
        cache_dir: &Path,
    ) -> Result<Textbook, GenerateError> {
        let mut textbook = self.generate_table_of_contents(topic).await?;
        write_json(&cache_dir.join("toc.json"), &textbook).await?;
        tracing::info!(path = ?cache_dir, "saved table of contents");

        for c in 0..textbook.chapters.len() {
            let chapter = &textbook.chapters[c];
            let chapter_dir =
                cache_dir.join(format!("chapter_{}", number_slug(&textbook, Location::Chapter(c))));
            let chapter_title = chapter.title.clone();

            for s in 0..chapter.sections.len() {
                let Some(section) = textbook.section(c, s).cloned() else { continue };
                let mut entries = Vec::with_capacity(section.subsections.len());

                for (ss, sub) in section.subsections.iter().enumerate() {
                    tracing::info!(
                        chapter = %chapter_title,
                        section = %section.title,
                        subsection = %sub.title,
                        "processing"
                    );
                    let generated = self
                        .generate_subsection_content(topic, &chapter_title, &section.title, &sub.title)
                        .await?;
                    textbook.set_subsection_content(
                        Location::Subsection(c, s, ss),
                        generated.content.clone(),
                    );
                    entries.push(CachedSubsection {
                        subsection_info: sub.clone(),
                        content: generated.content,
                    });
                }

                let number = number_slug(&textbook, Location::Section(c, s));
                let file = chapter_dir.join(section_file_name(&number, &section.title));
                write_json(&file, &CachedSection { section_info: section, subsections: entries })
                    .await?;
                tracing::info!(path = ?file, "saved section");
            }
        }

        Ok(textbook)
    }
}

#[derive(Debug, Serialize)]
struct CachedSection {
    section_info: Section,
    subsections: Vec<CachedSubsection>,
}

#[derive(Debug, Serialize)]
struct CachedSubsection {
    subsection_info: Subsection,
    content: String,
}

/// Runs of characters that cannot appear in a file name slug
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").unwrap());

/// Runs of characters that cannot appear in a dotted number
static NUMBER_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Alphabetic}\p{N}.]+").unwrap());

/// The number of a page, reduced to letters, digits and inner dots.
/// Falls back to the positional label when nothing usable is left.
fn number_slug(textbook: &Textbook, location: Location) -> String {
    let number = textbook.number_of(location);
    let slug = NUMBER_SEPARATORS.replace_all(&number, "_");
    let slug = slug.trim_matches(|c| c == '_' || c == '.');
    if slug.is_empty() || slug.contains("..") {
        location.label()
    } else {
        slug.to_string()
    }
}

/// `1.2_data_types.json` for section 1.2 "Data Types"
pub fn section_file_name(number: &str, title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = SLUG_SEPARATORS.replace_all(&lower, "_");
    format!("{}_{}.json", number, slug.trim_matches('_'))
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GenerateError> {
    let cache_err = |source| GenerateError::Cache { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(cache_err)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await.map_err(cache_err)
}
