//! Table of contents tree with reading progress

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::{AppState, TocItem};
use crate::textbook::{ReadingProgress, Textbook};
use crate::theme::Theme;

const GAUGE_WIDTH: usize = 5;

/// Draw the table of contents
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, focused: bool) {
    let border_color = if focused { theme.border_focused } else { theme.border };

    let Some(book) = state.textbook.as_ref() else {
        return;
    };

    let block = Block::default()
        .title(format!(" Contents {}% ", state.progress.overall(book)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    state.toc.visible_height = inner.height as usize;

    let items = state.toc.visible_items(book);
    let width = inner.width as usize;
    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .skip(state.toc.scroll_offset)
        .take(inner.height as usize)
        .map(|(idx, item)| {
            let row = Row {
                selected: focused && idx == state.toc.selected_index,
                current: state.location == Some(item.location),
            };
            item_line(book, &state.progress, item, &row, width, theme)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

struct Row {
    selected: bool,
    current: bool,
}

fn item_line(
    book: &Textbook,
    progress: &ReadingProgress,
    item: &TocItem,
    row: &Row,
    width: usize,
    theme: &Theme,
) -> Line<'static> {
    let icon = match (item.expandable, item.expanded) {
        (true, true) => "▼ ",
        (true, false) => "▶ ",
        _ => "  ",
    };
    let title = book.title_of(item.location).unwrap_or_default();
    let label = format!(
        "{}{}{} {}",
        "  ".repeat(item.depth),
        icon,
        book.number_of(item.location),
        title
    );

    let percent = progress.of(book, item.location);
    let gauge = gauge(percent);
    let label_width = width.saturating_sub(GAUGE_WIDTH + 1);
    let label = fit(&label, label_width);

    let label_style = if row.selected {
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else if row.current {
        Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD)
    } else if item.depth == 0 {
        Style::default().fg(theme.fg_primary)
    } else {
        Style::default().fg(theme.fg_secondary)
    };
    let gauge_color = if percent >= 100 { theme.success } else { theme.fg_muted };

    Line::from(vec![
        Span::styled(label, label_style),
        Span::raw(" "),
        Span::styled(gauge, Style::default().fg(gauge_color)),
    ])
}

/// Five-cell bar for a percentage
fn gauge(percent: u8) -> String {
    let filled = (percent.min(100) as usize * GAUGE_WIDTH + 50) / 100;
    format!("{}{}", "▰".repeat(filled), "▱".repeat(GAUGE_WIDTH - filled))
}

/// Pad or cut `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text:width$}")
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textbook::{Location, sample_course};
    use pretty_assertions::assert_eq;

    #[test]
    fn gauge_rounds_to_cells() {
        assert_eq!(gauge(0), "▱▱▱▱▱");
        assert_eq!(gauge(50), "▰▰▰▱▱");
        assert_eq!(gauge(100), "▰▰▰▰▰");
    }

    #[test]
    fn fit_pads_and_cuts() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
    }

    #[test]
    fn section_line_shows_number_and_progress() {
        let book = sample_course();
        let mut progress = ReadingProgress::new();
        progress.record(Location::Subsection(0, 0, 0), 100);
        progress.record(Location::Subsection(0, 0, 1), 100);

        let item = TocItem { location: Location::Section(0, 0), depth: 1, expandable: true, expanded: false };
        let row = Row { selected: false, current: false };
        let line = item_line(&book, &progress, &item, &row, 40, &crate::theme::Theme::default());

        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text.chars().count(), 40);
        assert!(text.starts_with(&format!("  ▶ {}", book.number_of(Location::Section(0, 0)))));
        assert!(text.ends_with("▰▰▰▰▰"));
    }
}
