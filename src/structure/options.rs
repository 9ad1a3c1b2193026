//! Segmentation options.

use super::profiler::TypographyProfile;
use super::segmenter::{HeadingClassifier, HeightBands};

/// A fragment at least this many times the mode height is a heading.
pub const DEFAULT_HEADER_RATIO: f64 = 1.2;

/// Band ratios used when heading levels are requested without explicit ratios.
pub const DEFAULT_LEVEL_RATIOS: [f64; 3] = [2.0, 1.5, DEFAULT_HEADER_RATIO];

/// Options for splitting fragments into sections.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOptions {
    /// Multiplier applied to the mode height to get the heading threshold
    pub header_ratio: f64,

    /// Ratios for banded classification; `None` keeps a single threshold
    pub levels: Option<Vec<f64>>,
}

impl SegmentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading threshold ratio.
    pub fn with_header_ratio(mut self, ratio: f64) -> Self {
        self.header_ratio = ratio;
        self
    }

    /// Classify headings into levels using the given ratios.
    pub fn with_levels(mut self, ratios: Vec<f64>) -> Self {
        self.levels = Some(ratios);
        self
    }

    /// Classify headings into levels using [`DEFAULT_LEVEL_RATIOS`].
    pub fn with_default_levels(self) -> Self {
        self.with_levels(DEFAULT_LEVEL_RATIOS.to_vec())
    }

    /// Build the classifier for a document with this profile.
    pub fn classifier(&self, profile: &TypographyProfile) -> HeadingClassifier {
        match &self.levels {
            Some(ratios) if !ratios.is_empty() => {
                HeadingClassifier::Bands(HeightBands::from_ratios(profile.mode_height(), ratios))
            }
            _ => HeadingClassifier::Threshold(profile.threshold_for(self.header_ratio)),
        }
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            header_ratio: DEFAULT_HEADER_RATIO,
            levels: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextFragment;

    fn profile_with_mode(mode: f32) -> TypographyProfile {
        let fragments: Vec<_> = (0..3)
            .filter_map(|_| TextFragment::new("body", mode, 1))
            .collect();
        TypographyProfile::from_fragments(&fragments)
    }

    #[test]
    fn test_default_classifier_is_threshold() {
        let classifier = SegmentOptions::default().classifier(&profile_with_mode(10.0));
        assert_eq!(classifier, HeadingClassifier::Threshold(12.0));
    }

    #[test]
    fn test_custom_ratio() {
        let classifier = SegmentOptions::new()
            .with_header_ratio(1.5)
            .classifier(&profile_with_mode(10.0));
        assert_eq!(classifier, HeadingClassifier::Threshold(15.0));
    }

    #[test]
    fn test_levels_build_bands() {
        let classifier = SegmentOptions::new()
            .with_default_levels()
            .classifier(&profile_with_mode(10.0));
        assert!(matches!(classifier, HeadingClassifier::Bands(_)));
    }

    #[test]
    fn test_empty_levels_fall_back_to_threshold() {
        let classifier = SegmentOptions::new()
            .with_levels(Vec::new())
            .classifier(&profile_with_mode(10.0));
        assert_eq!(classifier, HeadingClassifier::Threshold(12.0));
    }
}
