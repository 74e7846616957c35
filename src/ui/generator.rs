//! Textbook generator form

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::command_line::build_line_with_cursor;
use super::layout::centered_fixed;
use crate::app::state::{FormField, GeneratorForm, TextInput};
use crate::theme::Theme;

const FORM_WIDTH: u16 = 64;
const FORM_HEIGHT: u16 = 20;

pub fn draw(frame: &mut Frame, area: Rect, form: &GeneratorForm, theme: &Theme) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let card = centered_fixed(FORM_WIDTH, FORM_HEIGHT, area);
    let block = Block::default()
        .title(" Textbook Generator ")
        .title_bottom(Line::from(" Tab next field · Enter generate · ? help ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let [subject, grade, info, _, buttons, _, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(inner);

    draw_field(frame, subject, "Subject *", &form.subject, form.focus == FormField::Subject, theme);
    draw_field(
        frame,
        grade,
        "Grade Level *",
        &form.grade_level,
        form.focus == FormField::GradeLevel,
        theme,
    );
    draw_field(
        frame,
        info,
        "Additional Information",
        &form.additional_info,
        form.focus == FormField::AdditionalInfo,
        theme,
    );

    let generate_label = if form.loading { "Generating..." } else { "Generate" };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            button(generate_label, form.focus == FormField::Generate, theme),
            Span::raw("   "),
            button("View Sample", form.focus == FormField::ViewSample, theme),
        ]))
        .centered(),
        buttons,
    );

    let status_line = match (&form.error, form.loading) {
        (Some(error), _) => Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))),
        (None, true) => Line::from(Span::styled(
            "Writing the table of contents. This can take a minute.",
            Style::default().fg(theme.info),
        )),
        (None, false) => Line::default(),
    };
    frame.render_widget(Paragraph::new(status_line).wrap(Wrap { trim: true }).centered(), status);
}

fn draw_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &TextInput,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused { theme.border_focused } else { theme.border };
    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let style = Style::default().fg(theme.fg_primary);
    let width = inner.width as usize;
    // Scroll horizontally so the cursor stays visible
    let skip = (input.cursor + 1).saturating_sub(width);
    let shown: String = input.value.chars().skip(skip).collect();
    let line = if focused {
        build_line_with_cursor(&shown, input.cursor.saturating_sub(skip), style, theme)
    } else {
        Line::from(Span::styled(shown, style))
    };
    frame.render_widget(Paragraph::new(line), inner);
}

fn button(label: &str, focused: bool, theme: &Theme) -> Span<'static> {
    let style = if focused {
        Style::default().fg(theme.bg_primary).bg(theme.accent_primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.accent_primary)
    };
    Span::styled(format!("[ {label} ]"), style)
}
