//! CommonMark parsing for generated subsection bodies
//!
//! Walks pulldown-cmark events and folds them into [`ContentBlock`]s. Inline
//! emphasis and code keep their markers so the reader can style them.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::content::{Alignment, CodeBlock, ContentBlock, Table};

/// Where inline text currently lands
#[derive(Debug, Default)]
struct Builder {
    blocks: Vec<ContentBlock>,
    text: String,
    heading: Option<u8>,

    code: Option<CodeBlock>,

    lists: Vec<(bool, Vec<String>)>,
    item: String,

    quote_depth: usize,
    quote: String,

    table: Option<Table>,
    row: Vec<String>,
    cell: String,
    in_table_head: bool,

    in_html_comment: bool,
}

impl Builder {
    fn sink(&mut self) -> &mut String {
        if self.table.is_some() {
            &mut self.cell
        } else if !self.lists.is_empty() {
            &mut self.item
        } else if self.quote_depth > 0 {
            &mut self.quote
        } else {
            &mut self.text
        }
    }

    fn flush_paragraph(&mut self) {
        let text = std::mem::take(&mut self.text);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.blocks.push(ContentBlock::Paragraph(trimmed.to_string()));
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_paragraph();
                self.heading = Some(heading_level(level));
            }
            Tag::CodeBlock(kind) => {
                self.flush_paragraph();
                let block = CodeBlock::new(String::new());
                self.code = Some(match kind {
                    CodeBlockKind::Fenced(lang) => {
                        // "python title=x" style info strings keep only the language
                        let lang = lang.split_whitespace().next().unwrap_or_default().to_string();
                        block.with_language(lang)
                    }
                    CodeBlockKind::Indented => block,
                });
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.flush_paragraph();
                } else {
                    // Nested lists are flattened into the outer item
                    self.item.push(' ');
                }
                self.lists.push((first.is_some(), Vec::new()));
            }
            Tag::Item => {
                if self.lists.len() <= 1 {
                    self.item.clear();
                } else {
                    self.item.push(' ');
                }
            }
            Tag::BlockQuote(_) => {
                self.flush_paragraph();
                self.quote_depth += 1;
            }
            Tag::Table(alignments) => {
                self.flush_paragraph();
                let mut table = Table::new(Vec::new());
                table.alignments = alignments.into_iter().map(alignment).collect();
                self.table = Some(table);
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.row.clear();
            }
            Tag::TableRow => self.row.clear(),
            Tag::TableCell => self.cell.clear(),
            Tag::Emphasis => self.sink().push('*'),
            Tag::Strong => self.sink().push_str("**"),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                if let Some(level) = self.heading.take() {
                    let text = std::mem::take(&mut self.text);
                    if !text.trim().is_empty() {
                        self.blocks.push(ContentBlock::heading(level, text.trim()));
                    }
                }
            }
            TagEnd::Paragraph => {
                if !self.lists.is_empty() || self.table.is_some() {
                    // paragraphs inside items and cells are just text
                    self.sink().push(' ');
                } else if self.quote_depth > 0 {
                    self.quote.push('\n');
                } else {
                    self.flush_paragraph();
                }
            }
            TagEnd::CodeBlock => {
                if let Some(mut block) = self.code.take() {
                    block.code = block.code.trim_end().to_string();
                    self.blocks.push(ContentBlock::Code(block));
                }
            }
            TagEnd::Item => {
                if self.lists.len() == 1 {
                    let item = std::mem::take(&mut self.item);
                    let item = item.split_whitespace().collect::<Vec<_>>().join(" ");
                    if let Some((_, items)) = self.lists.last_mut() {
                        if !item.is_empty() {
                            items.push(item);
                        }
                    }
                }
            }
            TagEnd::List(_) => {
                if let Some((ordered, items)) = self.lists.pop() {
                    if self.lists.is_empty() && !items.is_empty() {
                        self.blocks.push(if ordered {
                            ContentBlock::OrderedList(items)
                        } else {
                            ContentBlock::UnorderedList(items)
                        });
                    }
                }
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    let quote = std::mem::take(&mut self.quote);
                    if !quote.trim().is_empty() {
                        self.blocks.push(ContentBlock::Blockquote(quote.trim().to_string()));
                    }
                }
            }
            TagEnd::TableCell => {
                let cell = std::mem::take(&mut self.cell);
                self.row.push(cell.trim().to_string());
            }
            // pulldown-cmark puts header cells directly under TableHead
            TagEnd::TableHead => {
                self.in_table_head = false;
                if let Some(table) = self.table.as_mut() {
                    table.headers = std::mem::take(&mut self.row);
                }
            }
            TagEnd::TableRow => {
                if !self.in_table_head && !self.row.is_empty() {
                    if let Some(table) = self.table.as_mut() {
                        table.rows.push(std::mem::take(&mut self.row));
                    }
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.blocks.push(ContentBlock::Table(table));
                }
            }
            TagEnd::Emphasis => self.sink().push('*'),
            TagEnd::Strong => self.sink().push_str("**"),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        match self.code.as_mut() {
            Some(block) => block.code.push_str(text),
            None => self.sink().push_str(text),
        }
    }

    fn inline_code(&mut self, code: &str) {
        let sink = self.sink();
        sink.push('`');
        sink.push_str(code);
        sink.push('`');
    }

    fn line_break(&mut self) {
        if self.code.is_some() {
            self.text("\n");
        } else if self.quote_depth > 0 && self.lists.is_empty() && self.table.is_none() {
            self.quote.push('\n');
        } else {
            self.sink().push(' ');
        }
    }

    fn html(&mut self, html: &str) {
        if html.contains("<!--") {
            self.in_html_comment = true;
        }
        if self.in_html_comment {
            if html.contains("-->") {
                self.in_html_comment = false;
            }
            return;
        }
        let visible = strip_tags(html);
        if !visible.trim().is_empty() {
            self.sink().push_str(visible.trim());
        }
    }

    fn finish(mut self) -> Vec<ContentBlock> {
        self.flush_paragraph();
        self.blocks
    }
}

/// Parse markdown into content blocks
pub fn parse_markdown_content(markdown: &str) -> Vec<ContentBlock> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;

    let mut builder = Builder::default();
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(tag) => builder.end(tag),
            Event::Text(text) => builder.text(&text),
            Event::Code(code) => builder.inline_code(&code),
            Event::SoftBreak | Event::HardBreak => builder.line_break(),
            Event::Rule => {
                builder.flush_paragraph();
                builder.blocks.push(ContentBlock::HorizontalRule);
            }
            Event::Html(html) | Event::InlineHtml(html) => builder.html(&html),
            Event::TaskListMarker(done) => builder.text(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }
    builder.finish()
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<").replace("&gt;", ">").replace("&quot;", "\"").replace("&amp;", "&")
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alignment(align: pulldown_cmark::Alignment) -> Alignment {
    match align {
        pulldown_cmark::Alignment::None | pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}
