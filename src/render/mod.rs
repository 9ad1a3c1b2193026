//! Rendering module for converting documents to output formats.

mod json;
mod markdown;
mod options;

pub use json::{to_json, write_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::MarkdownOptions;
