//! Content block renderer

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::AppState;
use crate::syntax;
use crate::textbook::{Alignment, CodeBlock, ContentBlock, Table};
use crate::theme::Theme;

/// Styled lines of a page plus the plain text of each line
///
/// The plain text leaves out decoration (code gutters, quote bars) so that
/// selections copy and quote the words the reader sees.
#[derive(Debug, Default)]
pub struct RenderedPage {
    pub lines: Vec<Line<'static>>,
    pub text: Vec<String>,
}

impl RenderedPage {
    fn push(&mut self, line: Line<'static>) {
        let text = line_text(&line);
        self.lines.push(line);
        self.text.push(text);
    }

    /// Push `body` behind a prefix that is not part of the text
    fn push_decorated(&mut self, prefix: Span<'static>, body: Line<'static>) {
        let text = line_text(&body);
        let mut spans = vec![prefix];
        spans.extend(body.spans);
        self.lines.push(Line::from(spans));
        self.text.push(text);
    }

    fn blank(&mut self) {
        self.push(Line::from(""));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// Draw the content panel with the current page
pub fn draw(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, focused: bool) {
    let border_color = if focused { theme.border_focused } else { theme.border };

    let (Some(book), Some(location)) = (state.textbook.as_ref(), state.location) else {
        return;
    };

    let mut title = format!(" {} {} ", book.number_of(location), book.title_of(location).unwrap_or(""));
    if state.generating == Some(location) {
        title.push_str("· generating… ");
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let blocks = book.page(location).unwrap_or_default();

    // 1 column gutter for the cursor, 1 for the scrollbar
    let content_width = inner.width.saturating_sub(3) as usize;
    let content_area =
        Rect { x: inner.x, y: inner.y, width: inner.width.saturating_sub(1), height: inner.height };
    let scrollbar_x = inner.x + inner.width.saturating_sub(1);

    let page = render_content_blocks(&blocks, theme, content_width);
    let total_lines = page.len();
    let visible_height = inner.height as usize;

    let highlights = state.highlights.ranges(location, &page.text);
    let selection = state.selection.map(|s| s.range());

    state.content.total_lines = total_lines;
    state.content.visible_height = visible_height;
    state.content.rendered_text = page.text;
    state.content.clamp();
    if state.content.search_query.is_some() {
        state.content.refresh_search();
    }

    let content = &state.content;
    let scroll_offset = content.scroll_offset;
    let visible_lines: Vec<Line> = page
        .lines
        .into_iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_height)
        .map(|(i, line)| {
            let decorations = LineDecorations {
                cursor: focused && i == content.cursor,
                selected: selection.as_ref().is_some_and(|r| r.contains(&i)),
                highlighted: highlights.iter().any(|r| r.contains(&i)),
                matched: content.search_matches.contains(&i),
            };
            decorate_line(line, &decorations, theme)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines), content_area);

    draw_scrollbar(frame, scrollbar_x, inner.y, inner.height, scroll_offset, total_lines, theme);
}

struct LineDecorations {
    cursor: bool,
    selected: bool,
    highlighted: bool,
    matched: bool,
}

fn decorate_line(line: Line<'static>, decorations: &LineDecorations, theme: &Theme) -> Line<'static> {
    let gutter = if decorations.cursor {
        Span::styled("▌", Style::default().fg(theme.accent_primary))
    } else {
        Span::raw(" ")
    };

    let background: Option<Color> = if decorations.selected {
        Some(theme.selection)
    } else if decorations.highlighted {
        Some(theme.highlight)
    } else {
        None
    };

    let mut spans = vec![gutter];
    spans.extend(line.spans.into_iter().map(|mut span| {
        if let Some(bg) = background {
            span.style = span.style.bg(bg);
        }
        if decorations.matched {
            span.style = span.style.add_modifier(Modifier::UNDERLINED);
        }
        span
    }));
    Line::from(spans)
}

/// Draw a scrollbar indicator
fn draw_scrollbar(
    frame: &mut Frame,
    x: u16,
    y: u16,
    height: u16,
    scroll_offset: usize,
    total_lines: usize,
    theme: &Theme,
) {
    if total_lines == 0 || height == 0 {
        return;
    }

    let height = height as usize;

    let visible_ratio = (height as f64 / total_lines as f64).min(1.0);
    let thumb_height = ((height as f64 * visible_ratio).ceil() as usize).max(1);

    let max_scroll = total_lines.saturating_sub(height);
    let scroll_ratio =
        if max_scroll == 0 { 0.0 } else { (scroll_offset as f64 / max_scroll as f64).min(1.0) };
    let thumb_top = ((height - thumb_height) as f64 * scroll_ratio).round() as usize;

    for i in 0..height {
        let in_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let (ch, style) = if in_thumb {
            ("█", Style::default().fg(theme.accent_secondary))
        } else {
            ("░", Style::default().fg(theme.bg_tertiary))
        };

        frame.render_widget(
            Paragraph::new(ch).style(style),
            Rect { x, y: y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}

/// Render content blocks to styled lines
pub fn render_content_blocks(blocks: &[ContentBlock], theme: &Theme, width: usize) -> RenderedPage {
    let mut page = RenderedPage::default();

    for block in blocks {
        match block {
            ContentBlock::Heading { level, text } => render_heading(&mut page, *level, text, theme, width),
            ContentBlock::Paragraph(text) => render_paragraph(&mut page, text, theme, width),
            ContentBlock::Code(code) => render_code_block(&mut page, code, theme),
            ContentBlock::UnorderedList(items) => render_unordered_list(&mut page, items, theme, width),
            ContentBlock::OrderedList(items) => render_ordered_list(&mut page, items, theme, width),
            ContentBlock::Blockquote(text) => render_blockquote(&mut page, text, theme, width),
            ContentBlock::HorizontalRule => render_horizontal_rule(&mut page, theme, width),
            ContentBlock::Table(table) => render_table(&mut page, table, theme, width),
        }
    }

    page
}

fn render_heading(page: &mut RenderedPage, level: u8, text: &str, theme: &Theme, width: usize) {
    let (base_style, code_color) = match level {
        1 => (
            Style::default()
                .fg(theme.accent_primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            theme.syntax_keyword,
        ),
        2 => (
            Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
            theme.syntax_function,
        ),
        3 => (Style::default().fg(theme.info).add_modifier(Modifier::BOLD), theme.syntax_keyword),
        4 => (
            Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
            theme.syntax_keyword,
        ),
        _ => (Style::default().fg(theme.fg_muted), theme.syntax_keyword),
    };

    // Code parts of a heading keep the heading weight in a code color
    let mut spans: Vec<Span<'static>> = Vec::new();
    for (i, part) in text.split('`').enumerate() {
        if part.is_empty() {
            continue;
        }
        let style = if i % 2 == 1 {
            Style::default().fg(code_color).add_modifier(Modifier::BOLD)
        } else {
            base_style
        };
        spans.push(Span::styled(part.to_string(), style));
    }

    if !page.is_empty() {
        page.blank();
    }
    for line in wrap_spans(spans, width) {
        page.push(line);
    }
    if level <= 2 {
        page.blank();
    }
}

fn render_paragraph(page: &mut RenderedPage, text: &str, theme: &Theme, width: usize) {
    let spans = parse_inline_formatting(text, theme);
    for line in wrap_spans(spans, width.saturating_sub(2)) {
        page.push(line);
    }
    page.blank();
}

/// Parse inline markdown formatting into styled spans
fn parse_inline_formatting(text: &str, theme: &Theme) -> Vec<Span<'static>> {
    let plain = Style::default().fg(theme.fg_primary);
    let mut spans = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current = String::new();

    while let Some(c) = chars.next() {
        match c {
            '`' => {
                if !current.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut current), plain));
                }
                let mut code = String::new();
                for next in chars.by_ref() {
                    if next == '`' {
                        break;
                    }
                    code.push(next);
                }
                spans.push(Span::styled(
                    code,
                    Style::default().fg(theme.syntax_string).bg(theme.bg_secondary),
                ));
            }
            // Underscores are left alone; identifiers like snake_case use them
            '*' => {
                let is_double = chars.peek() == Some(&'*');
                if is_double {
                    chars.next();
                }

                let mut content = String::new();
                let mut found_end = false;
                while let Some(next) = chars.next() {
                    if next == '*' {
                        if !is_double {
                            found_end = true;
                            break;
                        }
                        if chars.peek() == Some(&'*') {
                            chars.next();
                            found_end = true;
                            break;
                        }
                    }
                    content.push(next);
                }

                if found_end && !content.is_empty() {
                    if !current.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut current), plain));
                    }
                    let modifier = if is_double { Modifier::BOLD } else { Modifier::ITALIC };
                    spans.push(Span::styled(content, plain.add_modifier(modifier)));
                } else {
                    // Not a valid marker, treat as literal
                    current.push('*');
                    if is_double {
                        current.push('*');
                    }
                    current.push_str(&content);
                    if found_end {
                        current.push_str(if is_double { "**" } else { "*" });
                    }
                }
            }
            '[' => {
                let mut link_text = String::new();
                let mut found_bracket = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        found_bracket = true;
                        break;
                    }
                    link_text.push(next);
                }

                if found_bracket && chars.peek() == Some(&'(') {
                    chars.next();
                    for next in chars.by_ref() {
                        if next == ')' {
                            break;
                        }
                    }
                    if !current.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut current), plain));
                    }
                    spans.push(Span::styled(
                        link_text,
                        Style::default()
                            .fg(theme.accent_secondary)
                            .add_modifier(Modifier::UNDERLINED),
                    ));
                } else {
                    current.push('[');
                    current.push_str(&link_text);
                    if found_bracket {
                        current.push(']');
                    }
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        spans.push(Span::styled(current, plain));
    }

    if spans.is_empty() {
        spans.push(Span::raw(""));
    }

    spans
}

/// Wrap styled spans into lines while preserving formatting
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }

    let mut lines = Vec::new();
    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    for span in spans {
        let style = span.style;

        for word in span.content.split_inclusive(char::is_whitespace) {
            let word_len = word.chars().count();

            if current_width + word_len > width && current_width > 0 {
                lines.push(Line::from(std::mem::take(&mut current_line)));
                current_width = 0;
            }

            current_line.push(Span::styled(word.to_string(), style));
            current_width += word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(Line::from(current_line));
    }

    if lines.is_empty() {
        lines.push(Line::from(""));
    }

    lines
}

fn render_code_block(page: &mut RenderedPage, code: &CodeBlock, theme: &Theme) {
    let border = Style::default().fg(theme.border);
    let lang_label = code.language.as_deref().unwrap_or("code");
    page.push_decorated(
        Span::styled("┌─ ", border),
        Line::from(vec![
            Span::styled(lang_label.to_string(), Style::default().fg(theme.info)),
            Span::styled(" ─", border),
        ]),
    );

    for line in syntax::highlight_code(code.code.trim_end_matches('\n'), code.language.as_deref(), theme) {
        page.push_decorated(Span::styled("│ ", border), line);
    }

    page.push_decorated(Span::styled("└──────", border), Line::from(""));
    page.blank();
}

fn render_list_item(
    page: &mut RenderedPage,
    marker: Span<'static>,
    item: &str,
    theme: &Theme,
    width: usize,
) {
    let indent = " ".repeat(marker.content.chars().count());
    let content_width = width.saturating_sub(indent.len());
    let wrapped = wrap_spans(parse_inline_formatting(item, theme), content_width);

    for (i, line) in wrapped.into_iter().enumerate() {
        let prefix = if i == 0 { marker.clone() } else { Span::raw(indent.clone()) };
        page.push_decorated(prefix, line);
    }
}

fn render_unordered_list(page: &mut RenderedPage, items: &[String], theme: &Theme, width: usize) {
    for item in items {
        let bullet = Span::styled("  • ", Style::default().fg(theme.accent_secondary));
        render_list_item(page, bullet, item, theme, width);
    }
    page.blank();
}

fn render_ordered_list(page: &mut RenderedPage, items: &[String], theme: &Theme, width: usize) {
    let digits = items.len().to_string().len();
    for (i, item) in items.iter().enumerate() {
        let number = Span::styled(
            format!("  {:>digits$}. ", i + 1),
            Style::default().fg(theme.accent_secondary),
        );
        render_list_item(page, number, item, theme, width);
    }
    page.blank();
}

fn render_blockquote(page: &mut RenderedPage, text: &str, theme: &Theme, width: usize) {
    let content_width = width.saturating_sub(4);

    let muted_spans: Vec<Span<'static>> = parse_inline_formatting(text, theme)
        .into_iter()
        .map(|s| Span::styled(s.content.to_string(), s.style.fg(theme.fg_muted)))
        .collect();

    for line in wrap_spans(muted_spans, content_width) {
        page.push_decorated(Span::styled("  │ ", Style::default().fg(theme.accent_primary)), line);
    }
    page.blank();
}

fn render_horizontal_rule(page: &mut RenderedPage, theme: &Theme, width: usize) {
    let rule_width = width.saturating_sub(4).min(32);
    page.push_decorated(
        Span::styled("─".repeat(rule_width), Style::default().fg(theme.border)),
        Line::from(""),
    );
    page.blank();
}

/// Column widths that fit `width`, shrinking the widest columns first
fn column_widths(table: &Table, width: usize) -> Vec<usize> {
    let num_cols = table.headers.len().max(table.rows.iter().map(|r| r.len()).max().unwrap_or(0));
    let mut widths = vec![3usize; num_cols];
    for row in std::iter::once(&table.headers).chain(table.rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.replace('`', "").chars().count());
        }
    }

    let available = width.saturating_sub(2 * num_cols);
    while widths.iter().sum::<usize>() > available {
        let Some(widest) = widths.iter_mut().max() else { break };
        if *widest <= 3 {
            break;
        }
        *widest -= 1;
    }
    widths
}

fn align_cell(text: &str, width: usize, alignment: Alignment) -> String {
    let padded = pad_or_truncate(text, width);
    let content_len = text.chars().count().min(width);
    let spare = width - content_len;
    match alignment {
        Alignment::Left => padded,
        Alignment::Right => format!("{}{}", " ".repeat(spare), padded.trim_end()),
        Alignment::Center => {
            let left = spare / 2;
            format!("{}{}{}", " ".repeat(left), padded.trim_end(), " ".repeat(spare - left))
        }
    }
}

fn render_table(page: &mut RenderedPage, table: &Table, theme: &Theme, width: usize) {
    let col_widths = column_widths(table, width);
    if col_widths.is_empty() {
        return;
    }
    let alignment = |i: usize| table.alignments.get(i).copied().unwrap_or(Alignment::Left);

    if !table.headers.is_empty() {
        let header_bg = theme.accent_secondary;
        let mut header_spans: Vec<Span<'static>> = Vec::new();

        for (i, width) in col_widths.iter().enumerate() {
            let header = table.headers.get(i).map(|h| h.replace('`', "")).unwrap_or_default();
            if i > 0 {
                header_spans.push(Span::styled("  ", Style::default().bg(header_bg)));
            }
            header_spans.push(Span::styled(
                align_cell(&header, *width, alignment(i)),
                Style::default().fg(theme.bg_primary).bg(header_bg).add_modifier(Modifier::BOLD),
            ));
        }
        page.push(Line::from(header_spans));
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_bg = if row_idx % 2 == 0 { theme.bg_secondary } else { theme.bg_primary };

        let wrapped_cells: Vec<Vec<String>> = col_widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = row.get(i).map(|c| c.replace('`', "")).unwrap_or_default();
                wrap_cell_text(&cell, *width)
            })
            .collect();
        let max_lines = wrapped_cells.iter().map(Vec::len).max().unwrap_or(1);

        for line_idx in 0..max_lines {
            let mut row_spans: Vec<Span<'static>> = Vec::new();

            for (col_idx, wrapped) in wrapped_cells.iter().enumerate() {
                let cell_line = wrapped.get(line_idx).map(|s| s.as_str()).unwrap_or("");
                if col_idx > 0 {
                    row_spans.push(Span::styled("  ", Style::default().bg(row_bg)));
                }
                let fg = if col_idx == 0 { theme.syntax_keyword } else { theme.fg_primary };
                row_spans.push(Span::styled(
                    align_cell(cell_line, col_widths[col_idx], alignment(col_idx)),
                    Style::default().fg(fg).bg(row_bg),
                ));
            }
            page.push(Line::from(row_spans));
        }
    }

    page.blank();
}

/// Pad string to width or truncate with ellipsis
fn pad_or_truncate(s: &str, width: usize) -> String {
    let char_count = s.chars().count();
    if char_count > width {
        let truncated: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    } else {
        format!("{:width$}", s, width = width)
    }
}

/// Wrap text to fit within a given width
fn wrap_cell_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut result = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current_line.chars().count();

        if current_line.is_empty() {
            current_line = word.chars().take(width).collect();
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            result.push(std::mem::take(&mut current_line));
            current_line = word.chars().take(width).collect();
        }
    }

    if !current_line.is_empty() {
        result.push(current_line);
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;

    fn texts(blocks: &[ContentBlock], width: usize) -> Vec<String> {
        render_content_blocks(blocks, &Theme::default(), width).text
    }

    #[test]
    fn pad_or_truncate_short() {
        assert_eq!(pad_or_truncate("hi", 5), "hi   ");
    }

    #[test]
    fn pad_or_truncate_exact() {
        assert_eq!(pad_or_truncate("hello", 5), "hello");
    }

    #[test]
    fn pad_or_truncate_long() {
        assert_eq!(pad_or_truncate("hello world", 5), "hell…");
    }

    #[test]
    fn wrap_cell_text_long() {
        let result = wrap_cell_text("this is a very long text", 10);
        assert_eq!(result, vec!["this is a", "very long", "text"]);
    }

    #[test]
    fn wrap_cell_text_empty() {
        assert_eq!(wrap_cell_text("", 10), vec![""]);
    }

    #[test]
    fn parse_inline_code() {
        let theme = Theme::default();
        let spans = parse_inline_formatting("hello `code` world", &theme);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].content, "hello ");
        assert_eq!(spans[1].content, "code");
        assert_eq!(spans[2].content, " world");
    }

    #[test]
    fn parse_inline_bold_and_italic() {
        let theme = Theme::default();
        let spans = parse_inline_formatting("a **bold** and *soft* word", &theme);
        let bold = spans.iter().find(|s| s.content == "bold").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        let soft = spans.iter().find(|s| s.content == "soft").unwrap();
        assert!(soft.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn underscores_and_lone_stars_stay_literal() {
        let theme = Theme::default();
        let spans = parse_inline_formatting("my_var = a * b", &theme);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "my_var = a * b");
    }

    #[test]
    fn parse_inline_link_shows_text_only() {
        let theme = Theme::default();
        let spans = parse_inline_formatting("see [docs](http://example.com) now", &theme);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "see docs now");
    }

    #[test]
    fn empty_page_has_no_lines() {
        assert!(render_content_blocks(&[], &Theme::default(), 80).is_empty());
    }

    #[test]
    fn lines_and_text_stay_aligned() {
        let blocks = vec![
            ContentBlock::heading(1, "Loops"),
            ContentBlock::Paragraph("A loop repeats work until a condition stops it.".into()),
            ContentBlock::Code(CodeBlock::new("for i in range(3):\n    print(i)").with_language("python")),
            ContentBlock::UnorderedList(vec!["for".into(), "while".into()]),
            ContentBlock::Blockquote("Careful with infinite loops".into()),
        ];
        let page = render_content_blocks(&blocks, &Theme::default(), 20);
        assert_eq!(page.lines.len(), page.text.len());
    }

    #[test]
    fn first_heading_has_no_leading_blank() {
        let text = texts(&[ContentBlock::heading(1, "Title"), ContentBlock::Paragraph("Body".into())], 40);
        assert_eq!(text, vec!["Title", "", "Body", ""]);
    }

    #[test]
    fn code_text_excludes_gutter() {
        let block = ContentBlock::Code(CodeBlock::new("x = 1\ny = 2").with_language("python"));
        let text = texts(&[block], 40);
        assert_eq!(text[1], "x = 1");
        assert_eq!(text[2], "y = 2");
    }

    #[test]
    fn paragraphs_wrap_to_width() {
        let text = texts(&[ContentBlock::Paragraph("one two three four five six".into())], 12);
        assert!(text.len() > 2);
        assert!(text.iter().all(|l| l.chars().count() <= 12));
    }

    #[test]
    fn list_continuation_lines_are_indented() {
        let theme = Theme::default();
        let page = render_content_blocks(
            &[ContentBlock::OrderedList(vec!["alpha beta gamma delta".into()])],
            &theme,
            16,
        );
        assert_eq!(page.lines[0].spans[0].content, "  1. ");
        assert_eq!(page.lines[1].spans[0].content, "     ");
        assert_eq!(page.text[0], "alpha beta ");
    }

    #[test]
    fn table_fits_width_and_aligns() {
        let table = Table {
            headers: vec!["Op".into(), "Meaning".into()],
            rows: vec![vec!["+".into(), "addition of two numbers".into()]],
            alignments: vec![Alignment::Center, Alignment::Left],
        };
        let widths = column_widths(&table, 20);
        assert!(widths.iter().sum::<usize>() + 4 <= 20);

        let text = texts(&[ContentBlock::Table(table)], 20);
        assert!(text[0].starts_with("Op "));
        assert!(text.len() > 3, "long cell wraps");
    }

    #[test]
    fn align_cell_variants() {
        assert_eq!(align_cell("ab", 6, Alignment::Left), "ab    ");
        assert_eq!(align_cell("ab", 6, Alignment::Right), "    ab");
        assert_eq!(align_cell("ab", 6, Alignment::Center), "  ab  ");
    }

    #[test]
    fn decorations_paint_background() {
        let theme = Theme::default();
        let line = Line::from(vec![Span::raw("a"), Span::raw("b")]);
        let decorated = decorate_line(
            line,
            &LineDecorations { cursor: true, selected: true, highlighted: true, matched: false },
            &theme,
        );
        assert_eq!(decorated.spans[0].content, "▌");
        assert!(decorated.spans[1..].iter().all(|s| s.style.bg == Some(theme.selection)));
    }
}
