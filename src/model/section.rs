//! Section-level types.

use serde::{Deserialize, Serialize};

/// Title given to content that appears before the first heading.
pub const DEFAULT_SECTION_TITLE: &str = "Introduction";

/// A titled span of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Heading text (or "Introduction" for leading content)
    pub title: String,

    /// Body text; `None` when the section came from a table of contents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Page where the heading appeared (1-indexed)
    pub page_number: u32,

    /// Server-side path of the section's extracted file
    #[serde(
        default,
        rename = "section_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub section_path: Option<String>,

    /// Heading level (1 = outermost), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

impl Section {
    /// Create a section with body text.
    pub fn new(title: impl Into<String>, content: impl Into<String>, page_number: u32) -> Self {
        Self {
            title: title.into(),
            content: Some(content.into()),
            page_number,
            section_path: None,
            level: None,
        }
    }

    /// Create a table-of-contents entry (no inline body text).
    pub fn toc_entry(title: impl Into<String>, page_number: u32) -> Self {
        Self {
            title: title.into(),
            content: None,
            page_number,
            section_path: None,
            level: None,
        }
    }

    /// Set the heading level.
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the server-side section path.
    pub fn with_section_path(mut self, path: impl Into<String>) -> Self {
        self.section_path = Some(path.into());
        self
    }

    /// Body text, or "" when there is none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Whether the section has no body text.
    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Number of whitespace-separated words in the body.
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }
}

/// A downloadable file produced by server-side extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    /// Display name
    pub name: String,
    /// Absolute URL
    pub url: String,
}

impl FileLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
