//! Command line at the bottom of the reader

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::{CommandLineState, CommandMode};
use crate::theme::Theme;

const HINT: &str = "Press : for commands, / for search, ? for help";

/// Draw the command line
pub fn draw(frame: &mut Frame, area: Rect, state: &CommandLineState, theme: &Theme) {
    let (text, style) = match state.mode {
        CommandMode::Normal => match &state.message {
            Some(msg) => {
                let color = if state.is_error { theme.error } else { theme.fg_muted };
                (msg.clone(), Style::default().fg(color))
            }
            None => (HINT.to_string(), Style::default().fg(theme.fg_muted)),
        },
        CommandMode::Command => {
            (format!(":{}", state.input.value), Style::default().fg(theme.accent_primary))
        }
        CommandMode::Search => (format!("/{}", state.input.value), Style::default().fg(theme.info)),
    };

    let line = if state.is_input_mode() {
        // +1 for the mode prefix
        build_line_with_cursor(&text, state.input.cursor + 1, style, theme)
    } else {
        Line::from(Span::styled(text, style))
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg_secondary)), area);
}

/// Build a line with a visible block cursor at `cursor_pos` (in characters)
pub fn build_line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    theme: &Theme,
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    if cursor_pos > 0 {
        let before: String = chars.iter().take(cursor_pos).collect();
        spans.push(Span::styled(before, base_style));
    }

    let cursor_char = chars.get(cursor_pos).copied().unwrap_or(' ');
    let cursor_style =
        Style::default().fg(theme.bg_primary).bg(theme.fg_primary).add_modifier(Modifier::BOLD);
    spans.push(Span::styled(cursor_char.to_string(), cursor_style));

    if cursor_pos + 1 < chars.len() {
        let after: String = chars.iter().skip(cursor_pos + 1).collect();
        spans.push(Span::styled(after, base_style));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn cursor_at_start() {
        let line = build_line_with_cursor(":goto", 0, Style::default(), &Theme::default());
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, ":");
    }

    #[test]
    fn cursor_past_end_adds_space() {
        let line = build_line_with_cursor(":goto", 5, Style::default(), &Theme::default());
        assert_eq!(line.spans.len(), 2);
        assert_eq!(text(&line), ":goto ");
    }

    #[test]
    fn cursor_in_middle_splits_three_ways() {
        let line = build_line_with_cursor("/héllo", 2, Style::default(), &Theme::default());
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "é");
        assert_eq!(text(&line), "/héllo");
    }
}
