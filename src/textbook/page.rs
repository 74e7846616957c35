//! Turn a location in the textbook into renderable blocks

use super::content::ContentBlock;
use super::markdown::parse_markdown_content;
use super::markup;
use super::model::{Location, Textbook};

/// Shown on subsections that have no body yet
pub const NOT_GENERATED_HINT: &str =
    "This subsection has not been written yet. Run :gen to generate it.";

impl Textbook {
    /// Blocks for the page at `location`, or `None` when it does not exist
    pub fn page(&self, location: Location) -> Option<Vec<ContentBlock>> {
        match location {
            Location::Chapter(c) => self.chapter_page(c),
            Location::Section(c, s) => self.section_page(c, s),
            Location::Subsection(c, s, ss) => self.subsection_page(c, s, ss),
        }
    }

    fn chapter_page(&self, c: usize) -> Option<Vec<ContentBlock>> {
        let chapter = self.chapters.get(c)?;
        let location = Location::Chapter(c);
        let mut blocks = vec![ContentBlock::heading(
            1,
            format!("Chapter {}: {}", self.number_of(location), chapter.title),
        )];

        if let Some(description) = chapter.description.as_deref().filter(|d| !d.trim().is_empty()) {
            blocks.push(ContentBlock::Paragraph(description.trim().to_string()));
        }
        if let Some(content) = chapter.content.as_deref() {
            blocks.extend(markup::convert(content));
        }

        for (s, section) in chapter.sections.iter().enumerate() {
            blocks.push(ContentBlock::heading(
                2,
                format!("{} {}", self.number_of(Location::Section(c, s)), section.title),
            ));
            if let Some(description) = section.description.as_deref() {
                blocks.push(ContentBlock::Paragraph(description.trim().to_string()));
            }
            if !section.learning_outcomes.is_empty() {
                blocks.push(ContentBlock::UnorderedList(section.learning_outcomes.clone()));
            }
        }

        Some(blocks)
    }

    fn section_page(&self, c: usize, s: usize) -> Option<Vec<ContentBlock>> {
        let section = self.section(c, s)?;
        let mut blocks = vec![ContentBlock::heading(
            1,
            format!("{} {}", self.number_of(Location::Section(c, s)), section.title),
        )];

        if let Some(description) = section.description.as_deref() {
            blocks.push(ContentBlock::Paragraph(description.trim().to_string()));
        }
        if !section.learning_outcomes.is_empty() {
            blocks.push(ContentBlock::heading(2, "Learning Outcomes"));
            blocks.push(ContentBlock::UnorderedList(section.learning_outcomes.clone()));
        }
        if !section.subsections.is_empty() {
            blocks.push(ContentBlock::heading(2, "In This Section"));
            let items = section
                .subsections
                .iter()
                .enumerate()
                .map(|(ss, sub)| {
                    let number = self.number_of(Location::Subsection(c, s, ss));
                    let pending = if sub.content.is_none() { " (not generated)" } else { "" };
                    format!("{} {}{}", number, sub.title, pending)
                })
                .collect();
            blocks.push(ContentBlock::UnorderedList(items));
        }

        Some(blocks)
    }

    fn subsection_page(&self, c: usize, s: usize, ss: usize) -> Option<Vec<ContentBlock>> {
        let sub = self.subsection(c, s, ss)?;

        if let Some(content) = sub.content.as_deref().filter(|t| !t.trim().is_empty()) {
            let mut blocks = parse_markdown_content(content);
            if !matches!(blocks.first(), Some(ContentBlock::Heading { .. })) {
                blocks.insert(0, ContentBlock::heading(1, sub.title.clone()));
            }
            return Some(blocks);
        }

        let number = self.number_of(Location::Subsection(c, s, ss));
        let mut blocks = vec![ContentBlock::heading(1, format!("{} {}", number, sub.title))];
        if let Some(description) = sub.description.as_deref() {
            blocks.push(ContentBlock::Paragraph(description.trim().to_string()));
        }
        blocks.push(ContentBlock::Blockquote(NOT_GENERATED_HINT.to_string()));
        Some(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textbook::content::CodeBlock;
    use pretty_assertions::assert_eq;

    fn simple() -> Textbook {
        Textbook::from_json(
            r#"{"title": "Python", "chapters": [
                {"title": "Getting Started", "content": "Python is friendly.\n```python\nprint(1)\n```"}
            ]}"#,
        )
        .unwrap()
    }

    fn course() -> Textbook {
        Textbook::from_json(
            r##"{"title": "Python", "chapters": [
                {"chapter_number": 1, "title": "Basics", "description": "First steps", "sections": [
                    {"section_number": "1.1", "title": "Values", "description": "What values are",
                     "learning_outcomes": ["Name the core types"],
                     "subsections": [
                        {"subsection_number": "1.1.1", "title": "Numbers", "description": "int and float"},
                        {"subsection_number": "1.1.2", "title": "Strings", "content": "# Strings\n\nText data."}
                     ]}
                ]}
            ]}"##,
        )
        .unwrap()
    }

    #[test]
    fn simple_chapter_runs_through_markup() {
        let blocks = simple().page(Location::Chapter(0)).unwrap();
        assert_eq!(
            blocks,
            vec![
                ContentBlock::heading(1, "Chapter 1: Getting Started"),
                ContentBlock::Paragraph("Python is friendly.".into()),
                ContentBlock::Code(CodeBlock::new("print(1)").with_language("python")),
            ]
        );
    }

    #[test]
    fn expanded_chapter_lists_sections() {
        let blocks = course().page(Location::Chapter(0)).unwrap();
        assert_eq!(blocks[1], ContentBlock::Paragraph("First steps".into()));
        assert_eq!(blocks[2], ContentBlock::heading(2, "1.1 Values"));
        assert_eq!(blocks[4], ContentBlock::UnorderedList(vec!["Name the core types".into()]));
    }

    #[test]
    fn section_marks_missing_subsections() {
        let blocks = course().page(Location::Section(0, 0)).unwrap();
        assert_eq!(
            blocks.last(),
            Some(&ContentBlock::UnorderedList(vec![
                "1.1.1 Numbers (not generated)".into(),
                "1.1.2 Strings".into()
            ]))
        );
    }

    #[test]
    fn generated_subsection_is_markdown() {
        let blocks = course().page(Location::Subsection(0, 0, 1)).unwrap();
        assert_eq!(
            blocks,
            vec![ContentBlock::heading(1, "Strings"), ContentBlock::Paragraph("Text data.".into())]
        );
    }

    #[test]
    fn missing_subsection_shows_hint() {
        let blocks = course().page(Location::Subsection(0, 0, 0)).unwrap();
        assert_eq!(blocks[0], ContentBlock::heading(1, "1.1.1 Numbers"));
        assert_eq!(blocks[2], ContentBlock::Blockquote(NOT_GENERATED_HINT.into()));
    }

    #[test]
    fn out_of_range_is_none() {
        assert!(course().page(Location::Chapter(4)).is_none());
        assert!(course().page(Location::Subsection(0, 0, 9)).is_none());
    }
}
