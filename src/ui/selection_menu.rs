//! Popup offered after a visual selection

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::centered_fixed;
use crate::app::state::{MENU_ITEMS, SelectionMenu};
use crate::theme::Theme;

const MENU_WIDTH: u16 = 24;

pub fn draw(frame: &mut Frame, area: Rect, menu: &SelectionMenu, theme: &Theme) {
    let popup = centered_fixed(MENU_WIDTH, MENU_ITEMS.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Selection ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let lines: Vec<Line> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            if idx == menu.selected {
                Line::from(Span::styled(
                    format!("› {item}"),
                    Style::default()
                        .fg(theme.bg_primary)
                        .bg(theme.accent_primary)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(format!("  {item}"), Style::default().fg(theme.fg_primary)))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
