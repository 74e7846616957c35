//! Code block highlighting with syntect
//!
//! Blocks are highlighted as a whole so multi-line strings and docstrings
//! keep their colors. Unknown languages get a small keyword highlighter.

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::theme::Theme;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const SYNTECT_THEME: &str = "base16-ocean.dark";

/// Map fence names to syntect syntax names
fn normalize_language(lang: &str) -> &str {
    let base = lang.split(',').next().unwrap_or(lang).trim();

    match base.to_lowercase().as_str() {
        "py" | "python" | "python3" | "py3" | "pycon" => "Python",
        "rs" | "rust" => "Rust",
        "js" | "javascript" | "jsx" => "JavaScript",
        "ts" | "typescript" => "TypeScript",
        "c" => "C",
        "cpp" | "c++" => "C++",
        "java" => "Java",
        "go" | "golang" => "Go",
        "rb" | "ruby" => "Ruby",
        "html" => "HTML",
        "css" => "CSS",
        "json" => "JSON",
        "yaml" | "yml" => "YAML",
        "sql" => "SQL",
        "md" | "markdown" => "Markdown",
        "sh" | "bash" | "shell" | "zsh" | "console" => "Bourne Again Shell (bash)",
        _ => base,
    }
}

fn find_syntax(language: Option<&str>) -> Option<&'static SyntaxReference> {
    let lang = language?;
    let normalized = normalize_language(lang);

    SYNTAX_SET
        .find_syntax_by_name(normalized)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(&normalized.to_lowercase()))
        .or_else(|| SYNTAX_SET.find_syntax_by_token(lang))
}

fn to_style(style: syntect::highlighting::Style, theme: &Theme) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)).bg(theme.bg_secondary);
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

/// Highlight a code block, one styled line per source line
pub fn highlight_code(code: &str, language: Option<&str>, theme: &Theme) -> Vec<Line<'static>> {
    let syntect_theme = THEME_SET.themes.get(SYNTECT_THEME);

    if let (Some(syntax), Some(syntect_theme)) = (find_syntax(language), syntect_theme) {
        let mut highlighter = HighlightLines::new(syntax, syntect_theme);
        let mut lines = Vec::new();

        for line in code.split('\n') {
            // newline-aware syntaxes need the terminator to close line comments
            let with_newline = format!("{line}\n");
            match highlighter.highlight_line(&with_newline, &SYNTAX_SET) {
                Ok(ranges) => lines.push(Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, text)| {
                            Span::styled(text.trim_end_matches('\n').to_string(), to_style(style, theme))
                        })
                        .filter(|span| !span.content.is_empty())
                        .collect::<Vec<_>>(),
                )),
                Err(err) => {
                    tracing::debug!("syntect failed on {:?}: {err}", language);
                    lines.push(highlight_basic(line, theme));
                }
            }
        }
        return lines;
    }

    code.split('\n').map(|line| highlight_basic(line, theme)).collect()
}

const KEYWORDS: &[&str] = &[
    "def", "class", "if", "elif", "else", "for", "while", "try", "except", "finally", "with",
    "as", "import", "from", "return", "yield", "raise", "pass", "break", "continue", "lambda",
    "and", "or", "not", "in", "is", "None", "True", "False", "async", "await", "fn", "let",
    "const", "var", "function", "struct", "impl", "match", "null", "true", "false",
];

/// Keyword, string, number and comment coloring for unknown languages
fn highlight_basic(line: &str, theme: &Theme) -> Line<'static> {
    let base = Style::default().fg(theme.fg_primary).bg(theme.bg_secondary);
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut word = String::new();
    let mut chars = line.char_indices().peekable();

    let flush = |word: &mut String, spans: &mut Vec<Span<'static>>| {
        if word.is_empty() {
            return;
        }
        let style = if KEYWORDS.contains(&word.as_str()) {
            base.fg(theme.syntax_keyword).add_modifier(Modifier::BOLD)
        } else if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '_') {
            base.fg(theme.syntax_number)
        } else {
            base
        };
        spans.push(Span::styled(std::mem::take(word), style));
    };

    while let Some((idx, c)) = chars.next() {
        match c {
            '#' => {
                flush(&mut word, &mut spans);
                spans.push(Span::styled(line[idx..].to_string(), base.fg(theme.syntax_comment)));
                break;
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                flush(&mut word, &mut spans);
                spans.push(Span::styled(line[idx..].to_string(), base.fg(theme.syntax_comment)));
                break;
            }
            '"' | '\'' => {
                flush(&mut word, &mut spans);
                let mut literal = String::from(c);
                let mut escaped = false;
                for (_, ch) in chars.by_ref() {
                    literal.push(ch);
                    match ch {
                        _ if escaped => escaped = false,
                        '\\' => escaped = true,
                        ch if ch == c => break,
                        _ => {}
                    }
                }
                spans.push(Span::styled(literal, base.fg(theme.syntax_string)));
            }
            c if c.is_alphanumeric() || c == '_' => word.push(c),
            c => {
                flush(&mut word, &mut spans);
                let style = if "+-*/%=<>!&|^~:".contains(c) { base.fg(theme.syntax_operator) } else { base };
                spans.push(Span::styled(c.to_string(), style));
            }
        }
    }
    flush(&mut word, &mut spans);

    Line::from(spans)
}

pub fn is_language_supported(language: &str) -> bool {
    find_syntax(Some(language)).is_some()
}
