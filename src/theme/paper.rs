//! Paper theme: light page for bright terminals

use ratatui::style::Color;

use super::Theme;

const PAPER: Theme = Theme {
    name: String::new(),

    bg_primary: Color::Rgb(250, 248, 242),
    bg_secondary: Color::Rgb(240, 236, 226),
    bg_tertiary: Color::Rgb(228, 223, 210),

    fg_primary: Color::Rgb(33, 37, 41),
    fg_secondary: Color::Rgb(73, 80, 87),
    fg_muted: Color::Rgb(134, 142, 150),

    accent_primary: Color::Rgb(29, 78, 216),
    accent_secondary: Color::Rgb(146, 64, 14),

    success: Color::Rgb(21, 128, 61),
    error: Color::Rgb(185, 28, 28),
    info: Color::Rgb(3, 105, 161),

    syntax_keyword: Color::Rgb(126, 34, 206),
    syntax_string: Color::Rgb(21, 128, 61),
    syntax_number: Color::Rgb(194, 65, 12),
    syntax_comment: Color::Rgb(120, 113, 108),
    syntax_function: Color::Rgb(29, 78, 216),
    syntax_operator: Color::Rgb(87, 83, 78),

    border: Color::Rgb(214, 207, 190),
    border_focused: Color::Rgb(29, 78, 216),
    selection: Color::Rgb(191, 219, 254),
    highlight: Color::Rgb(254, 240, 138),
};

impl Theme {
    pub fn paper() -> Self {
        Theme { name: "Paper".to_string(), ..PAPER }
    }
}
