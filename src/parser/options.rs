//! Knobs for fragment collection.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{Error, Result};

/// How [`FragmentCollector`](super::FragmentCollector) walks a document.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// What a page decode failure does to the whole run
    pub error_mode: ErrorMode,
    /// Decode pages on the rayon pool
    pub parallel: bool,
    /// Pages that contribute fragments
    pub pages: PageSelection,
}

impl CollectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Skip undecodable pages instead of failing.
    pub fn lenient(self) -> Self {
        self.with_error_mode(ErrorMode::Lenient)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Decode pages one after another on the calling thread.
    pub fn sequential(self) -> Self {
        self.with_parallel(false)
    }

    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::default(),
            parallel: true,
            pages: PageSelection::default(),
        }
    }
}

/// Reaction to a page whose content cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// The first bad page fails the document
    #[default]
    Strict,
    /// Bad pages are logged and contribute nothing
    Lenient,
}

/// 1-based pages to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    #[default]
    All,
    Range(RangeInclusive<u32>),
    /// Disjoint spans in ascending order, as built by [`PageSelection::pages`]
    /// and [`PageSelection::parse`]
    Pages(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Selection of individual pages, in any order, duplicates allowed.
    pub fn pages<I: IntoIterator<Item = u32>>(pages: I) -> Self {
        Self::Pages(merge_spans(pages.into_iter().map(|p| p..=p).collect()))
    }

    pub fn includes(&self, page: u32) -> bool {
        match self {
            Self::All => true,
            Self::Range(range) => range.contains(&page),
            Self::Pages(spans) => spans.iter().any(|span| span.contains(&page)),
        }
    }

    /// Largest page the selection refers to; `None` for [`PageSelection::All`].
    pub fn last_page(&self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Range(range) => Some(*range.end()),
            Self::Pages(spans) => spans.iter().map(|span| *span.end()).max(),
        }
    }

    /// Read a selection such as `"4-12"` or `"1,3,8-9"`.
    ///
    /// An empty string or `"all"` selects every page. A single span stays a
    /// [`PageSelection::Range`]; anything with commas becomes merged spans,
    /// so the cost does not depend on how many pages a span covers.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let spans = input
            .split(',')
            .map(|part| parse_span(part.trim()))
            .collect::<Result<Vec<_>>>()?;

        if let [span] = spans.as_slice() {
            return Ok(Self::Range(span.clone()));
        }

        Ok(Self::Pages(merge_spans(spans)))
    }
}

/// Sort spans and join the ones that overlap or touch.
fn merge_spans(mut spans: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    spans.sort_unstable_by_key(|span| *span.start());
    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if *span.start() <= last.end().saturating_add(1) => {
                if span.end() > last.end() {
                    *last = *last.start()..=*span.end();
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}

impl FromStr for PageSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// `"7"` or `"3-9"` as an inclusive span.
fn parse_span(part: &str) -> Result<RangeInclusive<u32>> {
    let (first, last) = match part.split_once('-') {
        Some((first, last)) => (page_number(first)?, page_number(last)?),
        None => {
            let page = page_number(part)?;
            (page, page)
        }
    };
    if first > last {
        return Err(Error::InvalidPageRange(format!("{} runs backwards", part)));
    }
    Ok(first..=last)
}

fn page_number(text: &str) -> Result<u32> {
    match text.trim().parse::<u32>() {
        Ok(0) => Err(Error::InvalidPageRange("pages are numbered from 1".to_string())),
        Ok(page) => Ok(page),
        Err(_) => Err(Error::InvalidPageRange(format!("not a page number: {:?}", text))),
    }
}
