//! Line-oriented converter for outline chapter bodies
//!
//! Outline chapters are plain prose with ```` ```python ```` fences, not full
//! markdown. Text is cut at every fence marker: even segments are prose, odd
//! segments are code. Prose is read one line at a time.

use super::content::{CodeBlock, ContentBlock};

/// Language assumed for fences that do not name one
pub const DEFAULT_CODE_LANGUAGE: &str = "python";

/// Split `content` at fence markers into (is_code, language, body) segments
fn segments(content: &str) -> Vec<(bool, Option<&str>, &str)> {
    let mut out = Vec::new();
    let mut rest = content;
    let mut in_code = false;
    let mut language = None;

    while let Some(pos) = rest.find("```") {
        out.push((in_code, language.take(), &rest[..pos]));
        rest = &rest[pos + 3..];

        if !in_code {
            // The opening marker's info string runs to the end of its line
            let info_end = rest.find('\n').unwrap_or(rest.len());
            let info = rest[..info_end].trim();
            if !info.is_empty() && !info.contains(char::is_whitespace) {
                language = Some(info);
                rest = &rest[info_end..];
            }
        }
        in_code = !in_code;
    }
    out.push((in_code, language, rest));
    out
}

fn prose_line(line: &str) -> Option<ContentBlock> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
        return Some(ContentBlock::heading(3, line[2..line.len() - 2].trim()));
    }

    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) && line[hashes..].starts_with(' ') {
        return Some(ContentBlock::heading(hashes as u8, line[hashes..].trim()));
    }

    Some(ContentBlock::Paragraph(line.to_string()))
}

fn bullet(line: &str) -> Option<&str> {
    let line = line.trim_start();
    line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")).map(str::trim)
}

/// Convert an outline body into content blocks
pub fn convert(content: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    for (is_code, language, body) in segments(content) {
        if is_code {
            let code = body.trim_matches('\n').trim_end();
            let code = code.trim_start_matches(|c: char| c == '\r');
            if code.trim().is_empty() {
                continue;
            }
            let language = language.unwrap_or(DEFAULT_CODE_LANGUAGE);
            blocks.push(ContentBlock::Code(CodeBlock::new(code).with_language(language)));
            continue;
        }

        let mut items: Vec<String> = Vec::new();
        for line in body.lines() {
            if let Some(item) = bullet(line) {
                items.push(item.to_string());
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            if !items.is_empty() {
                blocks.push(ContentBlock::UnorderedList(std::mem::take(&mut items)));
            }
            blocks.extend(prose_line(line));
        }
        if !items.is_empty() {
            blocks.push(ContentBlock::UnorderedList(items));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prose_and_python_fence() {
        let content = "Python is a language.\n\n**Hello World**\n```python\nprint(\"hi\")\n```\nThat prints hi.";
        assert_eq!(
            convert(content),
            vec![
                ContentBlock::Paragraph("Python is a language.".into()),
                ContentBlock::heading(3, "Hello World"),
                ContentBlock::Code(CodeBlock::new("print(\"hi\")").with_language("python")),
                ContentBlock::Paragraph("That prints hi.".into()),
            ]
        );
    }

    #[test]
    fn bare_fence_defaults_to_python() {
        let blocks = convert("```\nx = 1\n```");
        assert_eq!(blocks, vec![ContentBlock::Code(CodeBlock::new("x = 1").with_language("python"))]);
    }

    #[test]
    fn other_languages_are_kept() {
        let blocks = convert("```bash\npip install requests\n```");
        assert_eq!(
            blocks,
            vec![ContentBlock::Code(CodeBlock::new("pip install requests").with_language("bash"))]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let blocks = convert("Intro\n```python\nfor i in range(3):\n    print(i)\n");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Paragraph("Intro".into()),
                ContentBlock::Code(
                    CodeBlock::new("for i in range(3):\n    print(i)").with_language("python")
                ),
            ]
        );
    }

    #[test]
    fn headings_and_bullets() {
        let blocks = convert("## Lists\n- append\n- pop\nDone.");
        assert_eq!(
            blocks,
            vec![
                ContentBlock::heading(2, "Lists"),
                ContentBlock::UnorderedList(vec!["append".into(), "pop".into()]),
                ContentBlock::Paragraph("Done.".into()),
            ]
        );
    }

    #[test]
    fn lone_stars_are_not_a_heading() {
        assert_eq!(convert("****"), vec![ContentBlock::Paragraph("****".into())]);
        assert_eq!(convert("#hashtag"), vec![ContentBlock::Paragraph("#hashtag".into())]);
    }

    #[test]
    fn empty_lines_are_dropped() {
        assert!(convert("\n\n   \n").is_empty());
    }

    #[test]
    fn indentation_inside_code_is_preserved() {
        let blocks = convert("```python\ndef f():\n    return 1\n```");
        let [ContentBlock::Code(code)] = blocks.as_slice() else {
            panic!("expected code, got {blocks:?}");
        };
        assert_eq!(code.code, "def f():\n    return 1");
    }
}
