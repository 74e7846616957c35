//! Key and command reference

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::layout::centered_fixed;
use crate::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Reading",
        &[
            ("j / k", "move cursor"),
            ("d / u, Ctrl-f / Ctrl-b", "page down / up"),
            ("Ctrl-d / Ctrl-u", "half page down / up"),
            ("g / G", "top / bottom"),
            ("> / <, Ctrl-n / Ctrl-p", "next / previous page"),
            ("Tab, h / l", "switch between contents and page"),
            ("[", "toggle contents"),
            ("/ then n / N", "search, next / previous match"),
        ],
    ),
    (
        "Selecting",
        &[
            ("v", "start or stop a selection"),
            ("Enter", "selection menu, or reopen a highlight"),
            ("y", "copy the selection"),
            ("Esc", "clear selection or search"),
        ],
    ),
    (
        "Ask AI",
        &[
            ("Enter", "send question"),
            ("Ctrl-a", "accept as highlight"),
            ("Esc", "close and discard"),
        ],
    ),
    (
        "Commands",
        &[
            (":gen [n]", "generate content for a page"),
            (":goto n", "jump to chapter or section number"),
            (":ask question", "ask about the selection or page"),
            (":home, :sample [course]", "generator form, sample textbook"),
            (":load file, :export file", "open JSON, write .md or .html"),
            (":model name, :key api-key", "switch model, store API key"),
            (":clear, :q", "forget saved textbook, quit"),
        ],
    ),
];

const KEY_WIDTH: usize = 26;

pub fn draw(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let lines = help_lines(theme);
    let height = lines.len() as u16 + 2;
    let popup: Rect = centered_fixed(72, height, area);

    let block = Block::default()
        .title(" Help ")
        .title_bottom(Line::from(" Esc close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn help_lines(theme: &Theme) -> Vec<Line<'static>> {
    let heading = Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(theme.accent_secondary);
    let desc = Style::default().fg(theme.fg_primary);

    let mut lines = Vec::new();
    for (idx, (title, entries)) in SECTIONS.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(*title, heading)));
        for (keys, what) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:KEY_WIDTH$}"), key),
                Span::styled(*what, desc),
            ]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_has_a_heading() {
        let lines = help_lines(&Theme::default());
        let entries: usize = SECTIONS.iter().map(|(_, e)| e.len()).sum();
        assert_eq!(lines.len(), entries + SECTIONS.len() * 2 - 1);
        assert_eq!(lines[0].spans[0].content, "Reading");
    }
}
