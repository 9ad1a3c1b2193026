//! Fragment collection across pages.

use std::path::Path;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::TextFragment;

use super::backend::{LopdfBackend, PageRef, PdfBackend};
use super::content::extract_runs;
use super::options::{CollectOptions, ErrorMode};

/// Turns a PDF into an ordered list of [`TextFragment`]s.
///
/// The backend is fixed at construction and shared read-only by every page
/// task.
pub struct FragmentCollector<B: PdfBackend> {
    backend: B,
    options: CollectOptions,
}

impl FragmentCollector<LopdfBackend> {
    /// Load a PDF from memory with the lopdf backend.
    pub fn from_bytes(data: &[u8], options: CollectOptions) -> Result<Self> {
        Ok(Self::new(LopdfBackend::load_bytes(data)?, options))
    }

    /// Load a PDF file with the lopdf backend.
    pub fn from_file<P: AsRef<Path>>(path: P, options: CollectOptions) -> Result<Self> {
        Ok(Self::new(LopdfBackend::load_file(path)?, options))
    }
}

impl<B: PdfBackend> FragmentCollector<B> {
    pub fn new(backend: B, options: CollectOptions) -> Self {
        Self { backend, options }
    }

    /// Total number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.page_refs().len() as u32
    }

    /// Collect fragments from the selected pages in page order.
    pub fn collect(&self) -> Result<Vec<TextFragment>> {
        let pages = self.backend.page_refs();
        let total = pages.len() as u32;

        if let Some(last) = self.options.pages.last_page() {
            if last > total {
                return Err(Error::PageOutOfRange(last, total));
            }
        }

        let selected: Vec<(u32, PageRef)> = pages
            .into_iter()
            .filter(|(num, _)| self.options.pages.includes(*num))
            .collect();

        let per_page: Vec<Result<Vec<TextFragment>>> = if self.options.parallel {
            selected
                .par_iter()
                .map(|&(num, id)| self.collect_page(num, id))
                .collect()
        } else {
            selected
                .iter()
                .map(|&(num, id)| self.collect_page(num, id))
                .collect()
        };

        let mut fragments = Vec::new();
        for ((page_num, _), result) in selected.iter().zip(per_page) {
            match result {
                Ok(page_fragments) => fragments.extend(page_fragments),
                Err(e) => match self.options.error_mode {
                    ErrorMode::Strict => return Err(e),
                    ErrorMode::Lenient => {
                        log::warn!("Skipping page {}: {}", page_num, e);
                    }
                },
            }
        }

        log::debug!(
            "Collected {} fragments from {} of {} pages",
            fragments.len(),
            selected.len(),
            total
        );
        Ok(fragments)
    }

    /// Fragments for one page, all or nothing.
    fn collect_page(&self, page_num: u32, page_id: PageRef) -> Result<Vec<TextFragment>> {
        let data = self
            .backend
            .content_bytes(page_id)
            .map_err(|e| page_error(page_num, e))?;
        let ops = self
            .backend
            .operations(&data)
            .map_err(|e| page_error(page_num, e))?;

        let decode = |font: &[u8], bytes: &[u8]| self.backend.decode_string(page_id, font, bytes);
        Ok(extract_runs(&ops, &decode)
            .into_iter()
            .filter_map(|run| TextFragment::new(run.text, run.height, page_num))
            .collect())
    }
}

fn page_error(page_num: u32, err: Error) -> Error {
    match err {
        Error::Decode(msg) => Error::Decode(format!("Page {}: {}", page_num, msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::backend::{fallback_decode, Operand, Operation};
    use crate::parser::options::PageSelection;

    /// In-memory backend: page N shows "p{N}" lines at the given sizes.
    struct MockBackend {
        pages: Vec<Vec<(String, f32)>>,
        broken: Vec<u32>,
    }

    impl MockBackend {
        fn new(pages: Vec<Vec<(&str, f32)>>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|p| p.into_iter().map(|(t, h)| (t.to_string(), h)).collect())
                    .collect(),
                broken: Vec::new(),
            }
        }

        fn with_broken(mut self, page: u32) -> Self {
            self.broken.push(page);
            self
        }
    }

    impl PdfBackend for MockBackend {
        fn page_refs(&self) -> BTreeMap<u32, PageRef> {
            (1..=self.pages.len() as u32).map(|n| (n, (n, 0))).collect()
        }

        fn content_bytes(&self, page: PageRef) -> Result<Vec<u8>> {
            if self.broken.contains(&page.0) {
                return Err(Error::Decode("corrupt stream".to_string()));
            }
            Ok(page.0.to_be_bytes().to_vec())
        }

        fn operations(&self, data: &[u8]) -> Result<Vec<Operation>> {
            let num = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
            let mut ops = vec![Operation::new("BT", vec![])];
            for (text, size) in &self.pages[num as usize - 1] {
                ops.push(Operation::new(
                    "Tf",
                    vec![Operand::Name(b"F1".to_vec()), Operand::Real(*size)],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Operand::Text(text.as_bytes().to_vec())],
                ));
            }
            ops.push(Operation::new("ET", vec![]));
            Ok(ops)
        }

        fn decode_string(&self, _page: PageRef, _font: &[u8], bytes: &[u8]) -> String {
            fallback_decode(bytes)
        }
    }

    fn three_pages() -> MockBackend {
        MockBackend::new(vec![
            vec![("Summary", 16.0), ("The offer", 10.0)],
            vec![("   ", 10.0), ("Risk", 16.0)],
            vec![("Markets", 10.0)],
        ])
    }

    fn texts(fragments: &[TextFragment]) -> Vec<(&str, u32)> {
        fragments.iter().map(|f| (f.text.as_str(), f.page)).collect()
    }

    #[test]
    fn test_collect_in_page_order() {
        let collector = FragmentCollector::new(three_pages(), CollectOptions::default());
        let fragments = collector.collect().unwrap();
        assert_eq!(
            texts(&fragments),
            vec![("Summary", 1), ("The offer", 1), ("Risk", 2), ("Markets", 3)]
        );
        assert_eq!(fragments[0].height, 16.0);
        assert_eq!(collector.page_count(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let pages: Vec<Vec<(&str, f32)>> = (0..40).map(|_| vec![("line", 10.0)]).collect();
        let parallel = FragmentCollector::new(MockBackend::new(pages.clone()), CollectOptions::new())
            .collect()
            .unwrap();
        let sequential =
            FragmentCollector::new(MockBackend::new(pages), CollectOptions::new().sequential())
                .collect()
                .unwrap();
        assert_eq!(parallel, sequential);
        let order: Vec<u32> = parallel.iter().map(|f| f.page).collect();
        assert_eq!(order, (1..=40).collect::<Vec<_>>());
    }

    #[test]
    fn test_strict_aborts_on_bad_page() {
        let collector =
            FragmentCollector::new(three_pages().with_broken(2), CollectOptions::default());
        match collector.collect() {
            Err(Error::Decode(msg)) => assert!(msg.contains("Page 2")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_lenient_skips_bad_page() {
        let collector =
            FragmentCollector::new(three_pages().with_broken(2), CollectOptions::new().lenient());
        let fragments = collector.collect().unwrap();
        assert_eq!(
            texts(&fragments),
            vec![("Summary", 1), ("The offer", 1), ("Markets", 3)]
        );
    }

    #[test]
    fn test_page_selection() {
        let options = CollectOptions::new().with_pages(PageSelection::pages([1, 3]));
        let fragments = FragmentCollector::new(three_pages(), options)
            .collect()
            .unwrap();
        assert_eq!(
            texts(&fragments),
            vec![("Summary", 1), ("The offer", 1), ("Markets", 3)]
        );
    }

    #[test]
    fn test_selection_past_end_is_rejected() {
        let options = CollectOptions::new().with_pages(PageSelection::Range(2..=9));
        let result = FragmentCollector::new(three_pages(), options).collect();
        assert!(matches!(result, Err(Error::PageOutOfRange(9, 3))));
    }

    #[test]
    fn test_empty_document() {
        let collector = FragmentCollector::new(MockBackend::new(vec![]), CollectOptions::default());
        assert!(collector.collect().unwrap().is_empty());
        assert_eq!(collector.page_count(), 0);
    }
}
