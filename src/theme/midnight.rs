//! Midnight theme: black page, gray panels, blue accents

use ratatui::style::Color;

use super::Theme;

const MIDNIGHT: Theme = Theme {
    name: String::new(),

    bg_primary: Color::Rgb(0, 0, 0),
    bg_secondary: Color::Rgb(17, 24, 39), // gray-900
    bg_tertiary: Color::Rgb(31, 41, 55),  // gray-800

    fg_primary: Color::Rgb(229, 231, 235),   // gray-200
    fg_secondary: Color::Rgb(209, 213, 219), // gray-300
    fg_muted: Color::Rgb(156, 163, 175),     // gray-400

    accent_primary: Color::Rgb(37, 99, 235),    // blue-600
    accent_secondary: Color::Rgb(96, 165, 250), // blue-400

    success: Color::Rgb(74, 222, 128),
    error: Color::Rgb(248, 113, 113),
    info: Color::Rgb(56, 189, 248),

    syntax_keyword: Color::Rgb(192, 132, 252),
    syntax_string: Color::Rgb(134, 239, 172),
    syntax_number: Color::Rgb(253, 186, 116),
    syntax_comment: Color::Rgb(107, 114, 128),
    syntax_function: Color::Rgb(96, 165, 250),
    syntax_operator: Color::Rgb(125, 211, 252),

    border: Color::Rgb(31, 41, 55),            // gray-800
    border_focused: Color::Rgb(37, 99, 235),   // blue-600
    selection: Color::Rgb(55, 65, 81),         // gray-700
    highlight: Color::Rgb(66, 56, 10),         // dimmed yellow
};

impl Theme {
    pub fn midnight() -> Self {
        Theme { name: "Midnight".to_string(), ..MIDNIGHT }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midnight_has_name() {
        assert_eq!(Theme::midnight().name, "Midnight");
    }

    #[test]
    fn highlight_differs_from_selection() {
        let theme = Theme::midnight();
        assert_ne!(theme.highlight, theme.selection);
        assert_ne!(theme.highlight, theme.bg_primary);
    }
}
