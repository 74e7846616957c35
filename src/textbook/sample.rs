//! Bundled sample textbooks

use super::model::Textbook;

const SAMPLE_TEXTBOOK: &str = include_str!("../../assets/sample_textbook.json");
const SAMPLE_COURSE: &str = include_str!("../../assets/python_course.json");

/// The outline-style sample shown from the empty reader
pub fn sample() -> Textbook {
    parse_bundled(SAMPLE_TEXTBOOK)
}

/// A chapter/section/subsection course with some subsections written
pub fn sample_course() -> Textbook {
    parse_bundled(SAMPLE_COURSE)
}

fn parse_bundled(json: &str) -> Textbook {
    // Both assets are checked by the tests below
    Textbook::from_json(json).unwrap_or_else(|err| {
        tracing::error!("bundled sample is invalid: {err}");
        Textbook { title: "Sample unavailable".to_string(), ..Textbook::default() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_simple_variant() {
        let book = Textbook::from_json(SAMPLE_TEXTBOOK).unwrap();
        assert!(!book.is_expanded());
        assert!(book.chapters.len() >= 5);
        assert!(book.chapters.iter().all(|c| c.content.is_some()));
    }

    #[test]
    fn sample_course_is_expanded() {
        let book = Textbook::from_json(SAMPLE_COURSE).unwrap();
        assert!(book.is_expanded());
        assert!(book.subsection_count() > book.missing_content().len());
        assert!(!book.missing_content().is_empty());
    }
}
