//! Export a textbook as one markdown or HTML document

use crate::generate::html::{html_page, markdown_to_html};
use crate::textbook::{Location, Textbook};

/// Body without a leading `# ` heading; the export writes its own numbered one
fn strip_title_heading(body: &str) -> &str {
    let trimmed = body.trim_start();
    if trimmed.starts_with("# ") {
        trimmed.split_once('\n').map(|(_, rest)| rest.trim_start()).unwrap_or("")
    } else {
        trimmed
    }
}

fn push_block(out: &mut String, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        out.push_str(text);
        out.push_str("\n\n");
    }
}

pub fn to_markdown(textbook: &Textbook) -> String {
    let mut out = format!("# {}\n\n", textbook.title);
    if let Some(description) = &textbook.description {
        push_block(&mut out, description);
    }
    if let Some(audience) = &textbook.target_audience {
        push_block(&mut out, &format!("*Audience: {audience}*"));
    }
    if !textbook.prerequisites.is_empty() {
        out.push_str("**Prerequisites**\n\n");
        for p in &textbook.prerequisites {
            out.push_str(&format!("- {p}\n"));
        }
        out.push('\n');
    }

    for (c, chapter) in textbook.chapters.iter().enumerate() {
        let number = textbook.number_of(Location::Chapter(c));
        out.push_str(&format!("## Chapter {number}: {}\n\n", chapter.title));
        if let Some(description) = &chapter.description {
            push_block(&mut out, description);
        }
        if let Some(content) = &chapter.content {
            push_block(&mut out, content);
        }

        for (s, section) in chapter.sections.iter().enumerate() {
            let number = textbook.number_of(Location::Section(c, s));
            out.push_str(&format!("### {number} {}\n\n", section.title));
            if let Some(description) = &section.description {
                push_block(&mut out, description);
            }

            for (ss, sub) in section.subsections.iter().enumerate() {
                let number = textbook.number_of(Location::Subsection(c, s, ss));
                out.push_str(&format!("#### {number} {}\n\n", sub.title));
                match &sub.content {
                    Some(content) => push_block(&mut out, strip_title_heading(content)),
                    None => push_block(&mut out, sub.description.as_deref().unwrap_or("")),
                }
            }
        }
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

pub fn to_html(textbook: &Textbook) -> String {
    html_page(&textbook.title, &markdown_to_html(&to_markdown(textbook)))
}
