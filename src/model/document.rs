//! Document-level types.

use super::{FileLink, Section};
use serde::{Deserialize, Serialize};

/// The structured result of extracting one uploaded document.
///
/// Built once and never mutated; the fields are only reachable through
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    file_name: String,
    page_count: u32,
    sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_links: Option<Vec<FileLink>>,
}

impl Document {
    /// Package an ordered section list with file metadata.
    pub fn from_sections(
        file_name: impl Into<String>,
        page_count: u32,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            page_count,
            sections,
            file_links: None,
        }
    }

    /// Attach downloadable files (server-side extraction only).
    pub fn with_file_links(mut self, links: Vec<FileLink>) -> Self {
        self.file_links = Some(links);
        self
    }

    /// Original file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Number of pages in the source document.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Sections in document order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Linked files, if the document came from the extraction service.
    pub fn file_links(&self) -> Option<&[FileLink]> {
        self.file_links.as_deref()
    }

    /// Whether any structure was found.
    ///
    /// `false` means no extractable text (e.g. a scanned document).
    pub fn has_structure(&self) -> bool {
        !self.sections.is_empty()
    }

    /// Section titles in order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.title.as_str())
    }

    /// Consume the document, returning its sections.
    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}
