//! Reader screen: contents tree, page and command line

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{chat_panel, command_line, content, layout::centered_fixed, notes_dialog, selection_menu, toc};
use crate::app::state::{AppState, Overlay, Panel};
use crate::theme::Theme;

/// Minimum width for the contents panel
const TOC_MIN_WIDTH: u16 = 24;

const EMPTY_CHOICES: [&str; 2] = ["Go to Generator", "Load Sample Textbook"];

pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [main_area, command_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    if state.textbook.is_none() {
        draw_empty_state(frame, main_area, state.empty_state_choice, theme);
        command_line::draw(frame, command_area, &state.command_line, theme);
        return;
    }

    let chunks = create_layout(main_area, state);
    let mut index = 0;
    if state.show_toc {
        let focused = state.focused_panel == Panel::Toc;
        toc::draw(frame, chunks[index], state, theme, focused);
        index += 1;
    }
    let focused = state.focused_panel == Panel::Content || !state.show_toc;
    content::draw(frame, chunks[index], state, theme, focused);

    draw_overlay(frame, main_area, state, theme);
    command_line::draw(frame, command_area, &state.command_line, theme);
}

/// Split the main area into the visible panels
fn create_layout(area: Rect, state: &AppState) -> Vec<Rect> {
    let mut constraints = Vec::new();
    if state.show_toc {
        constraints.push(Constraint::Length((area.width / 4).max(TOC_MIN_WIDTH)));
    }
    constraints.push(Constraint::Min(30));

    Layout::default().direction(Direction::Horizontal).constraints(constraints).split(area).to_vec()
}

fn draw_overlay(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let label = match (&state.overlay, &state.textbook) {
        (Overlay::Chat(chat), Some(book)) => book.number_of(chat.conversation.location),
        _ => String::new(),
    };
    match &mut state.overlay {
        Overlay::None => {}
        Overlay::SelectionMenu(menu) => selection_menu::draw(frame, area, menu, theme),
        Overlay::Chat(chat) => chat_panel::draw(frame, area, chat, &label, theme),
        Overlay::Notes(dialog) => notes_dialog::draw(frame, area, dialog, theme),
    }
}

fn draw_empty_state(frame: &mut Frame, area: Rect, choice: usize, theme: &Theme) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let card = centered_fixed(44, 9, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));

    let mut lines = vec![
        Line::from(Span::styled(
            "No textbook loaded",
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Generate one or start with the sample.",
            Style::default().fg(theme.fg_muted),
        )),
        Line::default(),
    ];
    for (idx, label) in EMPTY_CHOICES.iter().enumerate() {
        let style = if idx == choice.min(1) {
            Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.accent_primary)
        };
        lines.push(Line::from(Span::styled(format!(" {label} "), style)));
    }

    frame.render_widget(Paragraph::new(lines).block(block).centered(), card);
}
