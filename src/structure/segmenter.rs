//! Section segmentation.
//!
//! Replays fragments in reading order. Every heading-sized fragment opens a
//! new section; everything else is appended to the open one.

use crate::model::{Section, TextFragment, DEFAULT_SECTION_TITLE};

/// How a fragment was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Body text
    Body,
    /// A heading, with its level when the classifier assigns levels
    Heading(Option<u8>),
}

/// Decides which fragments are headings.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadingClassifier {
    /// Heading when `height >= threshold`
    Threshold(f64),
    /// Heading when the height falls in any band; the band gives the level
    Bands(HeightBands),
}

impl HeadingClassifier {
    /// Classify a raw (unrounded) glyph height.
    pub fn classify(&self, height: f32) -> FragmentKind {
        let height = f64::from(height);
        match self {
            HeadingClassifier::Threshold(threshold) => {
                if height >= *threshold {
                    FragmentKind::Heading(None)
                } else {
                    FragmentKind::Body
                }
            }
            HeadingClassifier::Bands(bands) => match bands.level_for(height) {
                Some(level) => FragmentKind::Heading(Some(level)),
                None => FragmentKind::Body,
            },
        }
    }
}

/// Height thresholds for heading levels, tallest first.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightBands {
    /// (minimum height, level)
    bands: Vec<(f64, u8)>,
}

impl HeightBands {
    /// Bands at `mode × ratio` for each ratio.
    ///
    /// The largest ratio becomes level 1. Non-positive and non-finite
    /// ratios are ignored.
    pub fn from_ratios(mode_height: i32, ratios: &[f64]) -> Self {
        let mut ratios: Vec<f64> = ratios
            .iter()
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .collect();
        ratios.sort_by(|a, b| b.total_cmp(a));
        ratios.dedup();

        let mode = f64::from(mode_height);
        let bands = ratios
            .into_iter()
            .zip(1..=u8::MAX)
            .map(|(ratio, level)| (mode * ratio, level))
            .collect();
        Self { bands }
    }

    /// Level of the tallest band the height reaches.
    pub fn level_for(&self, height: f64) -> Option<u8> {
        self.bands
            .iter()
            .find(|(min, _)| height >= *min)
            .map(|(_, level)| *level)
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

/// Splits an ordered fragment list into sections.
#[derive(Debug, Clone)]
pub struct SectionSegmenter {
    classifier: HeadingClassifier,
}

/// The section being filled.
struct OpenSection {
    title: String,
    content: String,
    page: u32,
    level: Option<u8>,
    /// Whether `page` is settled; the leading section takes the page of
    /// its first body fragment.
    page_fixed: bool,
}

impl OpenSection {
    fn leading() -> Self {
        Self {
            title: DEFAULT_SECTION_TITLE.to_string(),
            content: String::new(),
            page: 1,
            level: None,
            page_fixed: false,
        }
    }

    fn heading(fragment: &TextFragment, level: Option<u8>) -> Self {
        Self {
            title: fragment.text.clone(),
            content: String::new(),
            page: fragment.page,
            level,
            page_fixed: true,
        }
    }

    fn append(&mut self, fragment: &TextFragment) {
        if !self.page_fixed {
            self.page = fragment.page;
            self.page_fixed = true;
        }
        if !self.content.is_empty() {
            self.content.push(' ');
        }
        self.content.push_str(fragment.text.trim());
    }

    fn to_section(&self) -> Section {
        let section = Section::new(self.title.clone(), self.content.clone(), self.page);
        match self.level {
            Some(level) => section.with_level(level),
            None => section,
        }
    }
}

impl SectionSegmenter {
    pub fn new(classifier: HeadingClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &HeadingClassifier {
        &self.classifier
    }

    /// Segment fragments into sections in document order.
    ///
    /// A heading followed directly by another heading produces no section.
    /// The last open section is kept if it has content or is not the
    /// leading "Introduction" section.
    pub fn segment(&self, fragments: &[TextFragment]) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current = OpenSection::leading();

        for fragment in fragments {
            match self.classifier.classify(fragment.height) {
                FragmentKind::Heading(level) => {
                    if !current.content.is_empty() {
                        sections.push(current.to_section());
                    }
                    current = OpenSection::heading(fragment, level);
                }
                FragmentKind::Body => current.append(fragment),
            }
        }

        if !current.content.is_empty() || current.title != DEFAULT_SECTION_TITLE {
            sections.push(current.to_section());
        }
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, height: f32, page: u32) -> TextFragment {
        TextFragment::new(text, height, page).unwrap()
    }

    fn threshold() -> SectionSegmenter {
        SectionSegmenter::new(HeadingClassifier::Threshold(12.0))
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let classifier = HeadingClassifier::Threshold(12.0);
        assert_eq!(classifier.classify(12.0), FragmentKind::Heading(None));
        assert_eq!(classifier.classify(11.9), FragmentKind::Body);
    }

    #[test]
    fn test_content_joining() {
        let sections = threshold().segment(&[
            frag("Revenue", 10.0, 1),
            frag("grew", 10.0, 1),
            frag("20%", 10.0, 1),
        ]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].content.as_deref(), Some("Revenue grew 20%"));
    }

    #[test]
    fn test_no_double_space_after_trailing_space() {
        let sections = threshold().segment(&[frag("Revenue ", 10.0, 1), frag("grew", 10.0, 1)]);
        assert_eq!(sections[0].text(), "Revenue grew");
    }

    #[test]
    fn test_content_edges_are_trimmed() {
        let sections = threshold().segment(&[
            frag(" Revenue", 10.0, 1),
            frag(" grew ", 10.0, 1),
            frag("Summary", 18.0, 1),
            frag("\tThe  offer ", 10.0, 1),
        ]);
        assert_eq!(sections[0].text(), "Revenue grew");
        assert_eq!(sections[1].text(), "The  offer");
    }

    #[test]
    fn test_headings_open_sections_in_order() {
        let sections = threshold().segment(&[
            frag("Preface text", 10.0, 1),
            frag("Summary", 18.0, 2),
            frag("The offer", 10.0, 2),
            frag("Risk Factors", 18.0, 3),
            frag("Markets", 10.0, 4),
        ]);
        let summary: Vec<_> = sections
            .iter()
            .map(|s| (s.title.as_str(), s.text(), s.page_number))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Introduction", "Preface text", 1),
                ("Summary", "The offer", 2),
                ("Risk Factors", "Markets", 3),
            ]
        );
    }

    #[test]
    fn test_introduction_takes_first_content_page() {
        let sections = threshold().segment(&[frag("cover note", 10.0, 3)]);
        assert_eq!(sections[0].page_number, 3);
    }

    #[test]
    fn test_no_introduction_without_leading_text() {
        let sections = threshold().segment(&[frag("Summary", 18.0, 1), frag("body", 10.0, 1)]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Summary");
    }

    #[test]
    fn test_trailing_heading_is_kept() {
        let sections = threshold().segment(&[
            frag("A", 20.0, 1),
            frag("body text", 10.0, 1),
            frag("B", 20.0, 2),
        ]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "A");
        assert_eq!(sections[0].text(), "body text");
        assert_eq!(sections[1].title, "B");
        assert_eq!(sections[1].content.as_deref(), Some(""));
        assert_eq!(sections[1].page_number, 2);
    }

    #[test]
    fn test_consecutive_headings_keep_only_last() {
        let sections = threshold().segment(&[
            frag("Part I", 20.0, 1),
            frag("Part II", 20.0, 1),
            frag("Part III", 20.0, 2),
        ]);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Part III");
        assert!(sections[0].is_empty());
    }

    #[test]
    fn test_no_fragments_no_sections() {
        assert!(threshold().segment(&[]).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let fragments = vec![
            frag("Summary", 18.0, 1),
            frag("a", 10.0, 1),
            frag("b", 10.0, 2),
        ];
        let segmenter = threshold();
        assert_eq!(segmenter.segment(&fragments), segmenter.segment(&fragments));
    }

    #[test]
    fn test_bands_assign_levels() {
        let bands = HeightBands::from_ratios(10, &[1.2, 2.0, 1.5]);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands.level_for(24.0), Some(1));
        assert_eq!(bands.level_for(20.0), Some(1));
        assert_eq!(bands.level_for(16.0), Some(2));
        assert_eq!(bands.level_for(12.0), Some(3));
        assert_eq!(bands.level_for(11.0), None);

        let segmenter = SectionSegmenter::new(HeadingClassifier::Bands(bands));
        let sections = segmenter.segment(&[
            frag("Part I", 22.0, 1),
            frag("intro", 10.0, 1),
            frag("Chapter 1", 15.0, 1),
            frag("text", 10.0, 1),
        ]);
        assert_eq!(sections[0].level, Some(1));
        assert_eq!(sections[1].level, Some(2));
    }

    #[test]
    fn test_bands_ignore_bad_ratios() {
        let bands = HeightBands::from_ratios(10, &[f64::NAN, -1.0, 0.0, 1.5, 1.5]);
        assert_eq!(bands.len(), 1);
        assert!(!bands.is_empty());
    }

    #[test]
    fn test_threshold_sections_have_no_level() {
        let sections = threshold().segment(&[frag("Summary", 18.0, 1), frag("x", 10.0, 1)]);
        assert_eq!(sections[0].level, None);
    }
}
