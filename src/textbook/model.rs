//! Textbook content model
//!
//! One serde shape covers both generator outputs: the simple outline
//! `{ title, chapters: [{ title, content }] }` and the expanded table of
//! contents where chapters hold sections and sections hold subsections.
//! Unknown fields are ignored and everything but the titles is optional.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextbookError {
    #[error("textbook JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("textbook has no chapters")]
    NoChapters,

    #[error("textbook has an empty title")]
    EmptyTitle,
}

/// A generated or bundled textbook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Textbook {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub chapter_number: Option<u32>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Body text of the simple variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub section_number: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub learning_outcomes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    #[serde(
        default,
        deserialize_with = "lenient_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub subsection_number: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown body, absent until generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Accept `1`, `"1"` or null for numeric fields the model sometimes quotes
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accept `"1.2"` or `1.2` for dotted labels
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A readable page: a chapter, a section or a subsection (0-based indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Chapter(usize),
    Section(usize, usize),
    Subsection(usize, usize, usize),
}

impl Location {
    pub fn chapter(&self) -> usize {
        match *self {
            Location::Chapter(c) | Location::Section(c, _) | Location::Subsection(c, _, _) => c,
        }
    }

    /// Positional number such as `2.1.3`
    pub fn label(&self) -> String {
        match *self {
            Location::Chapter(c) => format!("{}", c + 1),
            Location::Section(c, s) => format!("{}.{}", c + 1, s + 1),
            Location::Subsection(c, s, ss) => format!("{}.{}.{}", c + 1, s + 1, ss + 1),
        }
    }

    /// Parse a 1-based dotted number (`3`, `3.1`, `3.1.2`)
    pub fn parse_number(input: &str) -> Option<Self> {
        let parts: Vec<usize> = input
            .trim()
            .trim_end_matches('.')
            .split('.')
            .map(|p| p.trim().parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1))
            .collect::<Option<Vec<_>>>()?;

        match parts.as_slice() {
            [c] => Some(Location::Chapter(*c)),
            [c, s] => Some(Location::Section(*c, *s)),
            [c, s, ss] => Some(Location::Subsection(*c, *s, *ss)),
            _ => None,
        }
    }

    /// The enclosing location, if any
    pub fn parent(&self) -> Option<Self> {
        match *self {
            Location::Chapter(_) => None,
            Location::Section(c, _) => Some(Location::Chapter(c)),
            Location::Subsection(c, s, _) => Some(Location::Section(c, s)),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Textbook {
    /// Parse and validate a stored or bundled JSON blob
    pub fn from_json(text: &str) -> Result<Self, TextbookError> {
        let textbook: Textbook = serde_json::from_str(text)?;
        textbook.validate()?;
        Ok(textbook)
    }

    /// Parse a model reply that may wrap the JSON in a code fence or prose
    pub fn from_llm_response(text: &str) -> Result<Self, TextbookError> {
        Self::from_json(extract_json_object(text))
    }

    pub fn validate(&self) -> Result<(), TextbookError> {
        if self.title.trim().is_empty() {
            return Err(TextbookError::EmptyTitle);
        }
        if self.chapters.is_empty() {
            return Err(TextbookError::NoChapters);
        }
        Ok(())
    }

    /// Whether any chapter uses the sections/subsections structure
    pub fn is_expanded(&self) -> bool {
        self.chapters.iter().any(|c| !c.sections.is_empty())
    }

    pub fn section(&self, chapter: usize, section: usize) -> Option<&Section> {
        self.chapters.get(chapter)?.sections.get(section)
    }

    pub fn subsection(&self, chapter: usize, section: usize, sub: usize) -> Option<&Subsection> {
        self.section(chapter, section)?.subsections.get(sub)
    }

    pub fn contains(&self, location: Location) -> bool {
        match location {
            Location::Chapter(c) => c < self.chapters.len(),
            Location::Section(c, s) => self.section(c, s).is_some(),
            Location::Subsection(c, s, ss) => self.subsection(c, s, ss).is_some(),
        }
    }

    pub fn title_of(&self, location: Location) -> Option<&str> {
        match location {
            Location::Chapter(c) => self.chapters.get(c).map(|ch| ch.title.as_str()),
            Location::Section(c, s) => self.section(c, s).map(|sec| sec.title.as_str()),
            Location::Subsection(c, s, ss) => self.subsection(c, s, ss).map(|sub| sub.title.as_str()),
        }
    }

    /// Display number, preferring the numbering carried in the JSON
    pub fn number_of(&self, location: Location) -> String {
        let explicit = match location {
            Location::Chapter(c) => {
                self.chapters.get(c).and_then(|ch| ch.chapter_number).map(|n| n.to_string())
            }
            Location::Section(c, s) => self.section(c, s).and_then(|sec| sec.section_number.clone()),
            Location::Subsection(c, s, ss) => {
                self.subsection(c, s, ss).and_then(|sub| sub.subsection_number.clone())
            }
        };
        explicit.unwrap_or_else(|| location.label())
    }

    /// Every page in reading order (chapter, its sections, their subsections)
    pub fn locations(&self) -> Vec<Location> {
        let mut out = Vec::new();
        for (c, chapter) in self.chapters.iter().enumerate() {
            out.push(Location::Chapter(c));
            for (s, section) in chapter.sections.iter().enumerate() {
                out.push(Location::Section(c, s));
                out.extend((0..section.subsections.len()).map(|ss| Location::Subsection(c, s, ss)));
            }
        }
        out
    }

    /// The page after `location` in reading order
    pub fn next_location(&self, location: Location) -> Option<Location> {
        let all = self.locations();
        let idx = all.iter().position(|l| *l == location)?;
        all.get(idx + 1).copied()
    }

    /// The page before `location` in reading order
    pub fn prev_location(&self, location: Location) -> Option<Location> {
        let all = self.locations();
        let idx = all.iter().position(|l| *l == location)?;
        idx.checked_sub(1).and_then(|i| all.get(i).copied())
    }

    /// Store generated markdown for a subsection
    pub fn set_subsection_content(&mut self, location: Location, content: String) -> bool {
        let Location::Subsection(c, s, ss) = location else {
            return false;
        };
        match self
            .chapters
            .get_mut(c)
            .and_then(|ch| ch.sections.get_mut(s))
            .and_then(|sec| sec.subsections.get_mut(ss))
        {
            Some(sub) => {
                sub.content = Some(content);
                true
            }
            None => false,
        }
    }

    pub fn subsection_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .map(|s| s.subsections.len())
            .sum()
    }

    /// Subsections that still have no generated body
    pub fn missing_content(&self) -> Vec<Location> {
        self.locations()
            .into_iter()
            .filter(|l| match *l {
                Location::Subsection(c, s, ss) => self
                    .subsection(c, s, ss)
                    .is_some_and(|sub| sub.content.as_deref().is_none_or(|t| t.trim().is_empty())),
                _ => false,
            })
            .collect()
    }
}

/// Slice out the outermost `{ ... }` of a model reply
pub fn extract_json_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expanded() -> Textbook {
        Textbook::from_json(
            r##"{
                "title": "Python Programming",
                "description": "From zero to scripts",
                "chapters": [
                    {"chapter_number": 1, "title": "Basics", "sections": [
                        {"section_number": "1.1", "title": "Variables", "learning_outcomes": ["Declare a variable"],
                         "subsections": [
                            {"subsection_number": "1.1.1", "title": "Names"},
                            {"subsection_number": "1.1.2", "title": "Types", "content": "# Types"}
                         ]}
                    ]},
                    {"chapter_number": "2", "title": "Control Flow", "sections": []}
                ]
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn parses_simple_variant() {
        let book = Textbook::from_json(
            r#"{"title": "Biology", "chapters": [{"title": "Cells", "content": "All life is cells."}]}"#,
        )
        .unwrap();
        assert_eq!(book.chapters.len(), 1);
        assert_eq!(book.chapters[0].content.as_deref(), Some("All life is cells."));
        assert!(!book.is_expanded());
    }

    #[test]
    fn parses_expanded_variant_with_quoted_numbers() {
        let book = expanded();
        assert!(book.is_expanded());
        assert_eq!(book.chapters[1].chapter_number, Some(2));
        assert_eq!(book.subsection_count(), 2);
    }

    #[test]
    fn rejects_books_without_chapters() {
        let err = Textbook::from_json(r#"{"title": "Empty", "chapters": []}"#).unwrap_err();
        assert!(matches!(err, TextbookError::NoChapters));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(Textbook::from_json("not json"), Err(TextbookError::Json(_))));
    }

    #[test]
    fn llm_reply_with_fence_and_prose() {
        let reply = "Here is your outline:\n```json\n{\"title\": \"Chem\", \"chapters\": [{\"title\": \"Atoms\", \"content\": \"x\"}]}\n```\nEnjoy!";
        let book = Textbook::from_llm_response(reply).unwrap();
        assert_eq!(book.title, "Chem");
    }

    #[test]
    fn locations_in_reading_order() {
        let book = expanded();
        assert_eq!(
            book.locations(),
            vec![
                Location::Chapter(0),
                Location::Section(0, 0),
                Location::Subsection(0, 0, 0),
                Location::Subsection(0, 0, 1),
                Location::Chapter(1),
            ]
        );
        assert_eq!(book.next_location(Location::Subsection(0, 0, 1)), Some(Location::Chapter(1)));
        assert_eq!(book.prev_location(Location::Chapter(0)), None);
    }

    #[test]
    fn parse_number_round_trips_display() {
        assert_eq!(Location::parse_number("2"), Some(Location::Chapter(1)));
        assert_eq!(Location::parse_number("1.3"), Some(Location::Section(0, 2)));
        assert_eq!(Location::parse_number("1.1.2."), Some(Location::Subsection(0, 0, 1)));
        assert_eq!(Location::parse_number("0.1"), None);
        assert_eq!(Location::parse_number("1.2.3.4"), None);
        assert_eq!(Location::parse_number("abc"), None);
        assert_eq!(Location::Subsection(0, 0, 1).to_string(), "1.1.2");
    }

    #[test]
    fn number_prefers_explicit_labels() {
        let mut book = expanded();
        assert_eq!(book.number_of(Location::Section(0, 0)), "1.1");
        book.chapters[0].sections[0].section_number = Some("A".into());
        assert_eq!(book.number_of(Location::Section(0, 0)), "A");
        assert_eq!(book.number_of(Location::Chapter(1)), "2");
    }

    #[test]
    fn set_content_and_missing_content() {
        let mut book = expanded();
        assert_eq!(book.missing_content(), vec![Location::Subsection(0, 0, 0)]);
        assert!(book.set_subsection_content(Location::Subsection(0, 0, 0), "# Names".into()));
        assert!(book.missing_content().is_empty());
        assert!(!book.set_subsection_content(Location::Chapter(0), "x".into()));
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let book = Textbook::from_json(r#"{"title": "T", "chapters": [{"title": "C", "content": "x"}]}"#)
            .unwrap();
        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(json, r#"{"title":"T","chapters":[{"title":"C","content":"x"}]}"#);
    }
}
