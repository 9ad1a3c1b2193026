//! PDF parsing module.
//!
//! Decodes page content streams into [`TextFragment`](crate::model::TextFragment)s.

mod backend;
mod collector;
mod content;
mod options;

pub use backend::{fallback_decode, LopdfBackend, Operand, Operation, PageRef, PdfBackend};
pub use collector::FragmentCollector;
pub use content::{extract_runs, RawRun};
pub use options::{CollectOptions, ErrorMode, PageSelection};
