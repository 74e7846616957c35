//! Color themes
//!
//! Themes are plain color tables. [`Theme::named`] looks one up by the
//! name stored in the config; a full custom table can also be given there.

mod midnight;
mod paper;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Page, panels, code and popups
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    pub accent_primary: Color,
    pub accent_secondary: Color,

    pub success: Color,
    pub error: Color,
    pub info: Color,

    // Code blocks
    pub syntax_keyword: Color,
    pub syntax_string: Color,
    pub syntax_number: Color,
    pub syntax_comment: Color,
    pub syntax_function: Color,
    pub syntax_operator: Color,

    pub border: Color,
    pub border_focused: Color,
    /// Background of the visual selection
    pub selection: Color,
    /// Background of text with an accepted chat answer
    pub highlight: Color,
}

impl Theme {
    /// Built-in theme by case-insensitive name
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "midnight" => Some(Self::midnight()),
            "paper" => Some(Self::paper()),
            _ => None,
        }
    }

    pub fn names() -> &'static [&'static str] {
        &["Midnight", "Paper"]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::midnight()
    }
}
