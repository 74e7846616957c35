//! Markdown to standalone HTML pages

use pulldown_cmark::{Options, Parser, html};

/// Collapse runs of blank lines and of spaces outside fenced code blocks
///
/// Fence markers and everything between them pass through untouched so code
/// keeps its indentation.
pub fn clean_content(content: &str) -> String {
    let mut cleaned: Vec<String> = Vec::new();
    let mut prev_empty = false;
    let mut in_fence = false;

    for line in content.split('\n') {
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
            prev_empty = false;
            cleaned.push(line.to_string());
            continue;
        }
        if in_fence {
            cleaned.push(line.to_string());
            continue;
        }

        if line.trim().is_empty() {
            if !prev_empty {
                cleaned.push(line.to_string());
                prev_empty = true;
            }
            continue;
        }
        prev_empty = false;
        cleaned.push(line.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    cleaned.join("\n")
}

/// Convert markdown to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES;
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

const STYLE: &str = r#"        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, 'Open Sans', 'Helvetica Neue', sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        pre {
            background-color: #f6f8fa;
            border-radius: 6px;
            padding: 16px;
            overflow: auto;
            margin: 16px 0;
        }
        code {
            font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, Courier, monospace;
            font-size: 14px;
            padding: 0.2em 0.4em;
            background-color: rgba(27,31,35,0.05);
            border-radius: 3px;
        }
        pre code { padding: 0; background-color: transparent; }
        blockquote { border-left: 4px solid #ddd; margin: 16px 0; padding: 0 16px; color: #666; }
        table { border-collapse: collapse; width: 100%; margin: 16px 0; }
        th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
        th { background-color: #f6f8fa; }
        h1, h2, h3, h4, h5, h6 { margin-top: 24px; margin-bottom: 16px; font-weight: 600; line-height: 1.25; }
        h1 { font-size: 2em; border-bottom: 1px solid #eee; padding-bottom: 0.3em; }
        h2 { font-size: 1.5em; border-bottom: 1px solid #eee; padding-bottom: 0.3em; }
        h3 { font-size: 1.25em; }
        p { margin: 16px 0; }
        ul, ol { margin: 16px 0; padding-left: 32px; }
        li { margin: 8px 0; }
        hr { height: 1px; background-color: #ddd; border: none; margin: 24px 0; }
"#;

fn escape_title(title: &str) -> String {
    title.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Wrap an HTML fragment in a page with highlight.js and reading styles
pub fn html_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github.min.css">
    <script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js"></script>
    <script>hljs.highlightAll();</script>
    <style>
{STYLE}    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_title(title),
    )
}

/// Clean markdown and render it as a standalone page
pub fn render_html(markdown: &str) -> String {
    html_page("Generated Content", &markdown_to_html(&clean_content(markdown)))
}
