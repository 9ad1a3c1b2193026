//! Extraction strategies.
//!
//! A [`StructureExtractor`] turns uploaded PDF bytes into a [`Document`].
//! Two implementations exist: [`LocalExtractor`] infers sections from glyph
//! heights on this machine, and `RemoteExtractor` (feature `remote`) asks
//! the extraction service for the table of contents.
//!
//! # Example
//!
//! ```no_run
//! use pdfsections::extract::{ExtractOptions, ExtractionStrategy};
//!
//! fn main() -> pdfsections::Result<()> {
//!     let extractor = ExtractionStrategy::Local(ExtractOptions::default()).build()?;
//!     let data = std::fs::read("prospectus.pdf")?;
//!     let doc = extractor.extract(&data, "prospectus.pdf")?;
//!     for title in doc.titles() {
//!         println!("{}", title);
//!     }
//!     Ok(())
//! }
//! ```

mod local;
#[cfg(feature = "remote")]
mod remote;

pub use local::{Extraction, LocalExtractor};
#[cfg(feature = "remote")]
pub use remote::{RemoteExtractor, API_URL_ENV, DEFAULT_API_URL};

use crate::detect::DEFAULT_MAX_FILE_SIZE;
use crate::error::Result;
use crate::model::Document;
use crate::parser::{CollectOptions, PageSelection};
use crate::structure::SegmentOptions;

/// Anything that can turn PDF bytes into a [`Document`].
pub trait StructureExtractor: Send + Sync {
    /// Short name for logs and diagnostics.
    fn name(&self) -> &str;

    /// Extract the section structure of one document.
    fn extract(&self, data: &[u8], file_name: &str) -> Result<Document>;
}

/// Options for local extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Page decoding options
    pub collect: CollectOptions,

    /// Heading detection options
    pub segment: SegmentOptions,

    /// Reject inputs larger than this many bytes (`None` = no limit)
    pub max_file_size: Option<u64>,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page decoding options.
    pub fn with_collect_options(mut self, collect: CollectOptions) -> Self {
        self.collect = collect;
        self
    }

    /// Set heading detection options.
    pub fn with_segment_options(mut self, segment: SegmentOptions) -> Self {
        self.segment = segment;
        self
    }

    /// Set the size ceiling.
    pub fn with_max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// Skip pages that fail to decode.
    pub fn lenient(mut self) -> Self {
        self.collect = self.collect.lenient();
        self
    }

    /// Decode pages on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.collect = self.collect.sequential();
        self
    }

    /// Restrict extraction to some pages.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.collect = self.collect.with_pages(pages);
        self
    }

    /// Set the heading threshold ratio.
    pub fn with_header_ratio(mut self, ratio: f64) -> Self {
        self.segment = self.segment.with_header_ratio(ratio);
        self
    }

    /// Assign heading levels with the default bands.
    pub fn with_levels(mut self) -> Self {
        self.segment = self.segment.with_default_levels();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            collect: CollectOptions::default(),
            segment: SegmentOptions::default(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
        }
    }
}

/// Which extractor to use.
#[derive(Debug, Clone)]
pub enum ExtractionStrategy {
    /// Infer sections locally
    Local(ExtractOptions),
    /// Ask the extraction service at `base_url`
    #[cfg(feature = "remote")]
    Remote { base_url: String },
}

impl ExtractionStrategy {
    /// Remote strategy using `PDFSECTIONS_API_URL` or the default address.
    #[cfg(feature = "remote")]
    pub fn remote_from_env() -> Self {
        ExtractionStrategy::Remote {
            base_url: remote::api_url_from_env(),
        }
    }

    /// Build the configured extractor.
    pub fn build(self) -> Result<Box<dyn StructureExtractor>> {
        Ok(match self {
            ExtractionStrategy::Local(options) => Box::new(LocalExtractor::new(options)),
            #[cfg(feature = "remote")]
            ExtractionStrategy::Remote { base_url } => Box::new(RemoteExtractor::new(&base_url)?),
        })
    }
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        ExtractionStrategy::Local(ExtractOptions::default())
    }
}
