//! Reading progress for the session
//!
//! Each page remembers where it is currently scrolled, as a percentage.
//! Sections and chapters report the mean of their children.

use std::collections::HashMap;

use super::model::{Location, Textbook};

/// Percentage of a page scrolled past, `min(offset / (total - visible), 1)`
///
/// A page that fits on screen counts as fully read.
pub fn scroll_percent(offset: usize, total_lines: usize, visible_lines: usize) -> u8 {
    if total_lines <= visible_lines {
        return 100;
    }
    let scrollable = total_lines - visible_lines;
    ((offset.min(scrollable) * 100) / scrollable) as u8
}

#[derive(Debug, Clone, Default)]
pub struct ReadingProgress {
    pages: HashMap<Location, u8>,
}

impl ReadingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current scroll position of a page
    pub fn record(&mut self, location: Location, percent: u8) {
        self.pages.insert(location, percent.min(100));
    }

    /// Progress of the page itself
    pub fn page(&self, location: Location) -> u8 {
        self.pages.get(&location).copied().unwrap_or(0)
    }

    /// Progress of a page, or the mean of its children when it has any
    pub fn of(&self, textbook: &Textbook, location: Location) -> u8 {
        let children: Vec<Location> = match location {
            Location::Chapter(c) => textbook
                .chapters
                .get(c)
                .map(|ch| (0..ch.sections.len()).map(|s| Location::Section(c, s)).collect())
                .unwrap_or_default(),
            Location::Section(c, s) => textbook
                .section(c, s)
                .map(|sec| (0..sec.subsections.len()).map(|ss| Location::Subsection(c, s, ss)).collect())
                .unwrap_or_default(),
            Location::Subsection(..) => Vec::new(),
        };

        if children.is_empty() {
            return self.page(location);
        }
        let sum: u32 = children.iter().map(|child| self.of(textbook, *child) as u32).sum();
        (sum / children.len() as u32) as u8
    }

    /// Mean progress over all chapters
    pub fn overall(&self, textbook: &Textbook) -> u8 {
        if textbook.chapters.is_empty() {
            return 0;
        }
        let sum: u32 = (0..textbook.chapters.len())
            .map(|c| self.of(textbook, Location::Chapter(c)) as u32)
            .sum();
        (sum / textbook.chapters.len() as u32) as u8
    }

    pub fn reset(&mut self) {
        self.pages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn course() -> Textbook {
        Textbook::from_json(
            r#"{"title": "T", "chapters": [
                {"title": "A", "sections": [
                    {"title": "A1", "subsections": [{"title": "x"}, {"title": "y"}]},
                    {"title": "A2"}
                ]},
                {"title": "B", "content": "b"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn short_page_is_complete() {
        assert_eq!(scroll_percent(0, 10, 40), 100);
        assert_eq!(scroll_percent(0, 40, 40), 100);
    }

    #[test]
    fn percent_of_scrollable_range() {
        assert_eq!(scroll_percent(0, 140, 40), 0);
        assert_eq!(scroll_percent(50, 140, 40), 50);
        assert_eq!(scroll_percent(100, 140, 40), 100);
        assert_eq!(scroll_percent(500, 140, 40), 100);
    }

    #[test]
    fn record_follows_scroll_back() {
        let mut progress = ReadingProgress::new();
        progress.record(Location::Chapter(0), scroll_percent(100, 140, 40));
        assert_eq!(progress.page(Location::Chapter(0)), 100);
        progress.record(Location::Chapter(0), scroll_percent(0, 140, 40));
        assert_eq!(progress.page(Location::Chapter(0)), 0);
    }

    #[test]
    fn parents_average_children() {
        let book = course();
        let mut progress = ReadingProgress::new();
        progress.record(Location::Subsection(0, 0, 0), 100);
        progress.record(Location::Section(0, 1), 50);

        assert_eq!(progress.of(&book, Location::Section(0, 0)), 50);
        assert_eq!(progress.of(&book, Location::Chapter(0)), 50);
        assert_eq!(progress.of(&book, Location::Chapter(1)), 0);
        assert_eq!(progress.overall(&book), 25);
    }

    proptest! {
        #[test]
        fn percent_is_bounded(offset in 0usize..10_000, total in 0usize..5_000, visible in 1usize..200) {
            prop_assert!(scroll_percent(offset, total, visible) <= 100);
        }

        #[test]
        fn percent_grows_with_offset(a in 0usize..1_000, b in 0usize..1_000, total in 0usize..2_000, visible in 1usize..100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(scroll_percent(lo, total, visible) <= scroll_percent(hi, total, visible));
        }

        #[test]
        fn recorded_progress_is_latest_value(values in proptest::collection::vec(0u8..=255, 1..20)) {
            let mut progress = ReadingProgress::new();
            for v in values {
                progress.record(Location::Chapter(0), v);
                prop_assert_eq!(progress.page(Location::Chapter(0)), v.min(100));
            }
        }
    }
}
