//! Prompt text sent to the model

use serde_json::json;

pub const TEXTBOOK_SYSTEM_PROMPT: &str = "You are an expert textbook author and educator. \
Create a detailed and engaging textbook outline suitable for the specified grade level. \
Include Python code examples where appropriate to illustrate concepts. \
Format the response as JSON with the following structure: \
{ title: string, chapters: [{ title: string, content: string }] }. \
For Python code examples, wrap the code in ```python and ``` tags within the content string.";

pub fn textbook_user_prompt(subject: &str, grade_level: &str, additional_info: &str) -> String {
    format!(
        "Generate a detailed outline for a {grade_level} grade textbook on {subject}. \
Include a table of contents with at least 5 chapters, and for each chapter, provide a brief summary of its content. \
Include Python code examples where appropriate to illustrate concepts. \
Additional requirements: {additional_info}"
    )
}

pub const TOC_SYSTEM_PROMPT: &str = "You are a textbook content creator. Create a detailed table of contents following these rules:
1. Always return valid JSON matching the exact structure provided
2. Each section must have 2-3 subsections
3. Each chapter must have 2-3 sections
4. Include 3-4 chapters
5. Ensure all numbering is correct and sequential
6. Learning outcomes must be specific and measurable
7. Do not deviate from the provided JSON structure";

/// The shape the table of contents must follow, embedded in the prompt
pub fn toc_example_structure() -> serde_json::Value {
    json!({
        "title": "Example Book Title",
        "description": "A brief overview of what this book covers",
        "target_audience": "Who this book is for",
        "prerequisites": ["prerequisite 1", "prerequisite 2"],
        "chapters": [{
            "chapter_number": 1,
            "title": "Chapter Title",
            "description": "Brief chapter overview",
            "sections": [{
                "section_number": "1.1",
                "title": "Section Title",
                "description": "Brief section overview",
                "learning_outcomes": [
                    "After completing this section, you will be able to...",
                    "Another specific learning outcome"
                ],
                "subsections": [{
                    "subsection_number": "1.1.1",
                    "title": "Subsection Title",
                    "description": "What this subsection covers"
                }]
            }]
        }]
    })
}

pub fn toc_user_prompt(topic: &str) -> String {
    let structure =
        serde_json::to_string_pretty(&toc_example_structure()).unwrap_or_else(|_| "{}".into());
    format!(
        "Create a detailed table of contents for a comprehensive textbook about {topic}.
The response must exactly match this JSON structure: {structure}

Requirements:
1. Make the content comprehensive and well-structured
2. Ensure the book title is descriptive and engaging
3. All descriptions should be clear and concise
4. Learning outcomes should be specific and measurable
5. Maintain consistent numbering throughout
6. Target audience and prerequisites should be relevant to {topic}

Return only valid JSON matching the structure shown."
    )
}

pub const CONTENT_SYSTEM_PROMPT: &str = r#"You are a textbook content creator specializing in creating detailed, educational content.
You MUST follow this exact markdown structure:

1. Start with a level 1 heading for the subsection title
2. Follow with a brief introduction paragraph
3. Use level 2 headings for main points
4. Use level 3 headings for sub-points
5. Code blocks MUST use triple backticks with language specification
6. Use proper markdown for:
   - Bold: **bold text**
   - Italic: *italic text*
   - Lists: Use proper indentation
   - Code: `inline code` or code blocks
   - Tables: Use proper markdown table syntax
   - Blockquotes: Use > for important notes

Example Format:
# Subsection Title

Brief introduction to the topic and what will be covered.

## Main Concept 1

Explanation of the first main concept.

### Sub-topic 1.1

Detailed explanation with examples.

```python
# Code example
def example():
    return "This is a code example"
```

## Practice Exercises

1. First exercise
2. Second exercise

## Key Takeaways

* First key point
* Second key point"#;

pub fn content_user_prompt(topic: &str, chapter: &str, section: &str, subsection: &str) -> String {
    format!(
        "Create detailed educational content for:
Topic: {topic}
Chapter: {chapter}
Section: {section}
Subsection: {subsection}

Structure the content EXACTLY as follows:
1. # {subsection} (as main heading)
2. Introduction paragraph
3. ## Concepts and Theory
4. ## Examples and Implementation
5. ## Practice Exercises
6. ## Key Takeaways

Requirements:
- Use proper markdown syntax for all formatting
- Include code examples with language specification
- Use tables where appropriate
- Include at least 3 practice exercises
- List 4-5 key takeaways
- Use blockquotes (>) for important notes or tips
- Use bold (**) for important terms
- Use proper heading hierarchy (# ## ###)"
    )
}
