//! Notes dialog for the selected passage

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::layout::{centered_rect, input_lines};
use crate::app::state::NotesDialog;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, dialog: &NotesDialog, theme: &Theme) {
    let overlay = centered_rect(70, 70, area);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(" Add Notes ")
        .title_bottom(Line::from(" Ctrl-s save · Esc cancel ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let [selected_area, notes_area] =
        Layout::vertical([Constraint::Percentage(35), Constraint::Min(3)]).areas(inner);

    let label = Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD);
    let selected = Paragraph::new(vec![
        Line::from(Span::styled("Selected Text:", label)),
        Line::from(Span::styled(
            dialog.selected_text.clone(),
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::ITALIC),
        )),
    ])
    .wrap(Wrap { trim: false });
    frame.render_widget(selected, selected_area);

    let mut lines = vec![Line::from(Span::styled("Your Notes:", label))];
    lines.extend(input_lines(&dialog.input, "", Style::default().fg(theme.fg_primary), theme));
    // Keep the cursor line in view
    let visible = notes_area.height as usize;
    let cursor_line = 1 + dialog.input.value.chars().take(dialog.input.cursor).filter(|&c| c == '\n').count();
    let scroll = (cursor_line + 1).saturating_sub(visible);
    frame.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), notes_area);
}
