//! Markdown rendering for extracted documents.

use crate::error::Result;
use crate::model::{Document, FileLink, Section};

use super::MarkdownOptions;

/// Sections without a level render at this depth.
const SECTION_HEADING_DEPTH: u8 = 2;

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &MarkdownOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: MarkdownOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();

        if self.options.include_frontmatter {
            output.push_str(&frontmatter(doc));
        }

        for section in doc.sections() {
            self.render_section(&mut output, section);
        }

        if self.options.include_file_links {
            if let Some(links) = doc.file_links().filter(|links| !links.is_empty()) {
                self.render_links(&mut output, links);
            }
        }

        Ok(output.trim().to_string() + "\n")
    }

    fn render_section(&self, output: &mut String, section: &Section) {
        let depth = self.heading_depth(section.level);
        output.push_str(&"#".repeat(depth as usize));
        output.push(' ');
        output.push_str(&self.text(&section.title));
        output.push_str("\n\n");

        if self.options.include_page_numbers {
            output.push_str(&format!("*Page {}*\n\n", section.page_number));
        }

        if !section.is_empty() {
            output.push_str(&self.text(section.text()));
            output.push_str("\n\n");
        }

        if let Some(ref path) = section.section_path {
            output.push_str(&format!("Source: `{}`\n\n", path));
        }
    }

    fn render_links(&self, output: &mut String, links: &[FileLink]) {
        output.push_str("---\n\n");
        for link in links {
            output.push_str(&format!("- [{}]({})\n", self.text(&link.name), link.url));
        }
    }

    /// Level 1 lines up with unleveled sections; deeper levels nest below.
    fn heading_depth(&self, level: Option<u8>) -> u8 {
        let depth = match level {
            Some(level) => level.saturating_add(SECTION_HEADING_DEPTH - 1),
            None => SECTION_HEADING_DEPTH,
        };
        depth.clamp(1, self.options.max_heading_level.max(1))
    }

    fn text(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }
}

fn frontmatter(doc: &Document) -> String {
    let lines = [
        "---".to_string(),
        format!("file_name: \"{}\"", escape_yaml(doc.file_name())),
        format!("pages: {}", doc.page_count()),
        format!("sections: {}", doc.sections().len()),
        "---".to_string(),
        String::new(),
        String::new(),
    ];
    lines.join("\n")
}

fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape special Markdown characters.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
