//! Layout helpers shared by the screens and overlays

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::TextInput;
use crate::theme::Theme;

use super::command_line::build_line_with_cursor;

/// A rectangle covering the given percentages of `area`, centered
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center).areas(area);
    let [area] =
        Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center).areas(area);
    area
}

/// A fixed-size rectangle centered in `area`, shrunk to fit
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Word-wrap plain text, keeping blank lines
pub fn wrap_plain(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width).into_iter().map(|l| l.into_owned()).collect()
            }
        })
        .collect()
}

/// Lines of an editable input, the cursor drawn on the line that holds it
pub fn input_lines(
    input: &TextInput,
    prefix: &str,
    style: Style,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let prefix_len = prefix.chars().count();
    let mut start = 0;
    let mut lines = Vec::new();
    for (idx, raw) in input.value.split('\n').enumerate() {
        let len = raw.chars().count();
        let lead = if idx == 0 { prefix.to_string() } else { " ".repeat(prefix_len) };
        let text = format!("{lead}{raw}");
        if (start..=start + len).contains(&input.cursor) {
            let pos = prefix_len + input.cursor - start;
            lines.push(build_line_with_cursor(&text, pos, style, theme));
        } else {
            lines.push(Line::from(Span::styled(text, style)));
        }
        start += len + 1;
    }
    lines
}

/// One-cell scroll thumb on the right edge of `area`
pub fn draw_scroll_indicator(
    frame: &mut Frame,
    area: Rect,
    scroll: usize,
    max_scroll: usize,
    theme: &Theme,
) {
    if area.height < 3 || max_scroll == 0 {
        return;
    }
    let track = area.height.saturating_sub(1) as usize;
    let thumb_y = area.y + ((scroll.min(max_scroll) * track) / max_scroll) as u16;
    let thumb = Paragraph::new("█").style(Style::default().fg(theme.fg_muted));
    frame.render_widget(thumb, Rect::new(area.x + area.width - 1, thumb_y, 1, 1));
}
