//! # pdfsections
//!
//! Section structure extraction for PDF prospectuses.
//!
//! Text is pulled from each page together with its rendered glyph height.
//! The most common height is taken to be body text, and every fragment
//! noticeably taller than that opens a new section.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfsections::{extract_file, render};
//!
//! fn main() -> pdfsections::Result<()> {
//!     let doc = extract_file("prospectus.pdf")?;
//!
//!     for section in doc.sections() {
//!         println!("p.{:>4}  {}", section.page_number, section.title);
//!     }
//!
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     std::fs::write("prospectus.json", json)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`parser::FragmentCollector`] decodes pages into text fragments
//! 2. [`structure::TypographyProfile`] finds the body text height
//! 3. [`structure::SectionSegmenter`] splits fragments at headings
//! 4. [`structure::assemble`] packages the sections as a [`Document`]
//!
//! The same [`Document`] can also come from the extraction service; see
//! [`extract::ExtractionStrategy`].

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;
pub mod structure;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, PdfFormat};
pub use error::{Error, Result};
pub use extract::{
    ExtractOptions, Extraction, ExtractionStrategy, LocalExtractor, StructureExtractor,
};
#[cfg(feature = "remote")]
pub use extract::RemoteExtractor;
pub use model::{Document, FileLink, Section, TextFragment};
pub use parser::{CollectOptions, ErrorMode, PageSelection};
pub use render::{JsonFormat, MarkdownOptions};
pub use structure::{SegmentOptions, TypographyProfile};

use std::path::Path;

/// Extract the sections of a PDF held in memory.
///
/// # Arguments
///
/// * `data` - PDF file content as bytes
/// * `file_name` - Name recorded in the returned document
///
/// # Example
///
/// ```no_run
/// use pdfsections::extract_bytes;
///
/// let data = std::fs::read("prospectus.pdf").unwrap();
/// let doc = extract_bytes(&data, "prospectus.pdf").unwrap();
/// println!("{} sections", doc.sections().len());
/// ```
pub fn extract_bytes(data: &[u8], file_name: &str) -> Result<Document> {
    extract_bytes_with_options(data, file_name, ExtractOptions::default())
}

/// Extract the sections of a PDF held in memory with custom options.
pub fn extract_bytes_with_options(
    data: &[u8],
    file_name: &str,
    options: ExtractOptions,
) -> Result<Document> {
    Ok(LocalExtractor::new(options).analyze(data, file_name)?.document)
}

/// Extract the sections of a PDF file.
///
/// The document's file name is the last component of `path`.
///
/// # Example
///
/// ```no_run
/// use pdfsections::extract_file;
///
/// let doc = extract_file("prospectus.pdf").unwrap();
/// if !doc.has_structure() {
///     eprintln!("no extractable text (scanned document?)");
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    extract_file_with_options(path, ExtractOptions::default())
}

/// Extract the sections of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfsections::{extract_file_with_options, ExtractOptions, PageSelection};
///
/// let options = ExtractOptions::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=20))
///     .with_levels();
/// let doc = extract_file_with_options("prospectus.pdf", options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<Document> {
    Ok(LocalExtractor::new(options).analyze_file(path)?.document)
}
