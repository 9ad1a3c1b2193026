//! Document assembly.

use crate::model::{Document, Section};

/// Package segmented sections with the document's file metadata.
pub fn assemble(file_name: &str, page_count: u32, sections: Vec<Section>) -> Document {
    log::debug!(
        "Assembled {} sections for {} ({} pages)",
        sections.len(),
        file_name,
        page_count
    );
    Document::from_sections(file_name, page_count, sections)
}
