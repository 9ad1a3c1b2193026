//! Document model types.
//!
//! Fragments are the transient output of page decoding; sections and
//! documents are what callers receive.

mod document;
mod fragment;
mod section;

pub use document::Document;
pub use fragment::TextFragment;
pub use section::{FileLink, Section, DEFAULT_SECTION_TITLE};
