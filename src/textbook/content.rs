//! Renderable content blocks
//!
//! Both the markup converter and the markdown parser produce these; the
//! reader, the HTML export and search all work on them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Paragraph(String),
    Code(CodeBlock),
    UnorderedList(Vec<String>),
    OrderedList(Vec<String>),
    Blockquote(String),
    HorizontalRule,
    Table(Table),
}

impl ContentBlock {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        ContentBlock::Heading { level: level.clamp(1, 6), text: text.into() }
    }

    pub fn word_count(&self) -> usize {
        match self {
            ContentBlock::Heading { text, .. }
            | ContentBlock::Paragraph(text)
            | ContentBlock::Blockquote(text) => text.split_whitespace().count(),
            // Code reads slower
            ContentBlock::Code(code) => code.code.split_whitespace().count() / 3,
            ContentBlock::UnorderedList(items) | ContentBlock::OrderedList(items) => {
                items.iter().map(|i| i.split_whitespace().count()).sum()
            }
            ContentBlock::HorizontalRule => 0,
            ContentBlock::Table(table) => table.word_count(),
        }
    }

    /// Plain text used for search and as chat context
    pub fn plain_text(&self) -> Option<String> {
        match self {
            ContentBlock::Heading { text, .. }
            | ContentBlock::Paragraph(text)
            | ContentBlock::Blockquote(text) => Some(text.clone()),
            ContentBlock::Code(code) => Some(code.code.clone()),
            ContentBlock::UnorderedList(items) | ContentBlock::OrderedList(items) => {
                Some(items.join("\n"))
            }
            ContentBlock::HorizontalRule => None,
            ContentBlock::Table(table) => Some(table.plain_text()),
        }
    }
}

/// Plain text of a whole page
pub fn plain_text(blocks: &[ContentBlock]) -> String {
    blocks.iter().filter_map(ContentBlock::plain_text).collect::<Vec<_>>().join("\n\n")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub code: String,
    /// Fence language, used for highlighting
    pub language: Option<String>,
}

impl CodeBlock {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into(), language: None }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.language = if language.trim().is_empty() { None } else { Some(language) };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub alignments: Vec<Alignment>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        let col_count = headers.len();
        Self { headers, rows: Vec::new(), alignments: vec![Alignment::Left; col_count] }
    }

    pub fn word_count(&self) -> usize {
        self.headers
            .iter()
            .chain(self.rows.iter().flatten())
            .map(|cell| cell.split_whitespace().count())
            .sum()
    }

    pub fn plain_text(&self) -> String {
        std::iter::once(self.headers.join(" | "))
            .chain(self.rows.iter().map(|row| row.join(" | ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_discounts_code() {
        let para = ContentBlock::Paragraph("Variables hold values for later use.".into());
        assert_eq!(para.word_count(), 6);

        let code = ContentBlock::Code(CodeBlock::new("x = 1\nprint(x)"));
        assert!(code.word_count() < 2);
    }

    #[test]
    fn empty_language_is_none() {
        assert_eq!(CodeBlock::new("x").with_language("  ").language, None);
        assert_eq!(CodeBlock::new("x").with_language("python").language.as_deref(), Some("python"));
    }

    #[test]
    fn heading_level_is_clamped() {
        assert_eq!(ContentBlock::heading(9, "Deep"), ContentBlock::Heading { level: 6, text: "Deep".into() });
    }

    #[test]
    fn page_plain_text_skips_rules() {
        let blocks = vec![
            ContentBlock::heading(1, "Loops"),
            ContentBlock::HorizontalRule,
            ContentBlock::UnorderedList(vec!["for".into(), "while".into()]),
        ];
        assert_eq!(plain_text(&blocks), "Loops\n\nfor\nwhile");
    }

    #[test]
    fn table_counts() {
        let mut table = Table::new(vec!["Type".into(), "Example".into()]);
        table.rows.push(vec!["int".into(), "42".into()]);
        assert_eq!(table.word_count(), 4);
        assert_eq!(table.plain_text(), "Type | Example\nint | 42");
    }
}
