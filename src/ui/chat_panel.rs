//! Ask AI conversation overlay

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::{centered_rect, draw_scroll_indicator, input_lines, wrap_plain};
use crate::app::state::ChatPanel;
use crate::claude::Role;
use crate::theme::Theme;

const THINKING: &str = "Thinking...";

/// Draw the chat overlay centered over `area`
pub fn draw(frame: &mut Frame, area: Rect, chat: &mut ChatPanel, label: &str, theme: &Theme) {
    let overlay = centered_rect(80, 80, area);
    frame.render_widget(Clear, overlay);

    let hint = if chat.conversation.highlight_id.is_some() {
        " Enter send · Ctrl-a save · Esc close "
    } else {
        " Enter send · Ctrl-a accept · Esc close "
    };
    let block = Block::default()
        .title(format!(" Ask AI · {label} "))
        .title_bottom(Line::from(hint).centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let input_height = (chat.input.value.split('\n').count() as u16).clamp(1, 4);
    let [quote_area, body_area, input_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(input_height + 1),
    ])
    .areas(inner);

    let width = inner.width.saturating_sub(2) as usize;
    let quote = first_line(&chat.conversation.selected_text, width.saturating_sub(2));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("“{quote}”"),
            Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
        ))),
        quote_area,
    );

    let lines = transcript(chat, width, theme);
    let visible = body_area.height as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    chat.scroll_from_bottom = chat.scroll_from_bottom.min(max_scroll);
    let scroll = max_scroll - chat.scroll_from_bottom;
    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), body_area);
    draw_scroll_indicator(frame, body_area, scroll, max_scroll, theme);

    let [_, input_area] = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(input_area);
    let style = if chat.conversation.is_waiting() {
        Style::default().fg(theme.fg_muted)
    } else {
        Style::default().fg(theme.fg_primary)
    };
    frame.render_widget(Paragraph::new(input_lines(&chat.input, "> ", style, theme)), input_area);
}

/// Wrapped conversation, newest at the bottom
fn transcript(chat: &ChatPanel, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for turn in &chat.conversation.turns {
        push_turn(&mut lines, turn.role, &turn.content, width, theme);
    }
    if let Some(pending) = &chat.conversation.pending {
        if pending.is_empty() {
            lines.push(Line::from(Span::styled(
                THINKING,
                Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
            )));
        } else {
            push_turn(&mut lines, Role::Assistant, pending, width, theme);
        }
    }
    lines
}

fn push_turn(lines: &mut Vec<Line<'static>>, role: Role, text: &str, width: usize, theme: &Theme) {
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    let (label, color) = match role {
        Role::User => ("You", theme.accent_secondary),
        Role::Assistant => ("AI", theme.accent_primary),
    };
    lines.push(Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    lines.extend(wrap_plain(text, width).into_iter().map(|l| style_line(l, theme)));
}

/// Inline `code` gets the code colors
fn style_line(text: String, theme: &Theme) -> Line<'static> {
    if !text.contains('`') {
        return Line::from(Span::styled(text, Style::default().fg(theme.fg_primary)));
    }
    let spans = text
        .split('`')
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(idx, part)| {
            let style = if idx % 2 == 1 {
                Style::default().fg(theme.syntax_string).bg(theme.bg_tertiary)
            } else {
                Style::default().fg(theme.fg_primary)
            };
            Span::styled(part.to_string(), style)
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn first_line(text: &str, width: usize) -> String {
    let flat = crate::annotations::normalize(text);
    if flat.chars().count() <= width {
        flat
    } else {
        let cut: String = flat.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Conversation;
    use crate::app::state::TextInput;
    use crate::textbook::Location;
    use pretty_assertions::assert_eq;

    fn panel() -> ChatPanel {
        ChatPanel {
            conversation: Conversation::new(Location::Chapter(0), "for loops", 0..1),
            input: TextInput::default(),
            scroll_from_bottom: 0,
        }
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect()).collect()
    }

    #[test]
    fn waiting_shows_thinking() {
        let mut chat = panel();
        assert!(chat.conversation.ask("What is a loop?"));
        let lines = texts(&transcript(&chat, 40, &Theme::default()));
        assert_eq!(lines.last().map(String::as_str), Some(THINKING));
        assert!(lines.contains(&"What is a loop?".to_string()));
    }

    #[test]
    fn streamed_text_replaces_thinking() {
        let mut chat = panel();
        chat.conversation.ask("Why?");
        chat.conversation.append_reply("Because");
        let lines = texts(&transcript(&chat, 40, &Theme::default()));
        assert_eq!(lines.last().map(String::as_str), Some("Because"));
        assert!(!lines.iter().any(|l| l == THINKING));
    }

    #[test]
    fn inline_code_is_split_out() {
        let line = style_line("use `range` here".to_string(), &Theme::default());
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "range");
    }

    #[test]
    fn quote_is_flattened_and_cut() {
        assert_eq!(first_line("a\n  b", 10), "a b");
        assert_eq!(first_line("abcdefgh", 5), "abcd…");
    }
}
