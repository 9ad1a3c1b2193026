//! Local height-heuristic extraction.

use std::path::Path;

use crate::detect::{check_size, detect_format_from_bytes, detect_format_from_path};
use crate::error::Result;
use crate::model::Document;
use crate::parser::{FragmentCollector, PdfBackend};
use crate::structure::{assemble, SectionSegmenter, TypographyProfile};

use super::{ExtractOptions, StructureExtractor};

/// The extracted document together with the statistics behind it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub profile: TypographyProfile,
    pub document: Document,
}

/// Extracts sections by comparing glyph heights against the body size.
#[derive(Debug, Clone, Default)]
pub struct LocalExtractor {
    options: ExtractOptions,
}

impl LocalExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run the pipeline over in-memory bytes.
    pub fn analyze(&self, data: &[u8], file_name: &str) -> Result<Extraction> {
        check_size(data.len() as u64, self.options.max_file_size)?;
        detect_format_from_bytes(data)?;
        let collector = FragmentCollector::from_bytes(data, self.options.collect.clone())?;
        self.analyze_with(&collector, file_name)
    }

    /// Run the pipeline over a file on disk.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction> {
        let path = path.as_ref();
        check_size(std::fs::metadata(path)?.len(), self.options.max_file_size)?;
        detect_format_from_path(path)?;
        let collector = FragmentCollector::from_file(path, self.options.collect.clone())?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.analyze_with(&collector, &file_name)
    }

    /// Run the pipeline with an already loaded collector.
    pub fn analyze_with<B: PdfBackend>(
        &self,
        collector: &FragmentCollector<B>,
        file_name: &str,
    ) -> Result<Extraction> {
        let page_count = collector.page_count();
        let fragments = collector.collect()?;
        let profile = TypographyProfile::from_fragments(&fragments);

        if profile.is_empty() {
            log::debug!("{}: no extractable text", file_name);
            return Ok(Extraction {
                profile,
                document: assemble(file_name, page_count, Vec::new()),
            });
        }

        let classifier = self.options.segment.classifier(&profile);
        log::debug!(
            "{}: mode height {}, classifier {:?}",
            file_name,
            profile.mode_height(),
            classifier
        );

        let sections = SectionSegmenter::new(classifier).segment(&fragments);
        Ok(Extraction {
            profile,
            document: assemble(file_name, page_count, sections),
        })
    }
}

impl StructureExtractor for LocalExtractor {
    fn name(&self) -> &str {
        "local"
    }

    fn extract(&self, data: &[u8], file_name: &str) -> Result<Document> {
        Ok(self.analyze(data, file_name)?.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_rejects_non_pdf() {
        let result = LocalExtractor::default().extract(b"PK\x03\x04 zip data", "a.zip");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_rejects_oversized_input() {
        let extractor = LocalExtractor::new(ExtractOptions::new().with_max_file_size(Some(8)));
        let result = extractor.extract(b"%PDF-1.4 and more bytes", "big.pdf");
        assert!(matches!(
            result,
            Err(Error::FileTooLarge { size: 23, limit: 8 })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = LocalExtractor::default().analyze_file("/nonexistent/prospectus.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
