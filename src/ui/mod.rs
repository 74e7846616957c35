//! UI rendering components

pub mod chat_panel;
pub mod command_line;
pub mod content;
pub mod generator;
pub mod help;
pub mod layout;
pub mod main_screen;
pub mod notes_dialog;
pub mod selection_menu;
pub mod toc;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::app::state::{AppState, Screen};
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    match state.screen {
        Screen::Generator => {
            let [form, command] =
                Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
            generator::draw(frame, form, &state.generator, theme);
            command_line::draw(frame, command, &state.command_line, theme);
        }
        Screen::Reader => main_screen::draw(frame, state, theme),
        Screen::Help => {
            help::draw(frame, theme);
            let [_, command] =
                Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
            command_line::draw(frame, command, &state.command_line, theme);
        }
    }
}
