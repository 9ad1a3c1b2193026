//! Typography profiling.
//!
//! The most common rounded glyph height is taken to be body text; anything
//! sufficiently taller is a heading candidate.

use std::collections::HashMap;

use crate::model::TextFragment;

use super::options::DEFAULT_HEADER_RATIO;

/// Height statistics for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypographyProfile {
    /// (rounded height, count) in first-seen order
    histogram: Vec<(i32, usize)>,
    mode_height: i32,
    fragment_count: usize,
}

impl TypographyProfile {
    /// Profile the fragments of a document.
    ///
    /// Ties for the most frequent height go to the height seen first.
    pub fn from_fragments(fragments: &[TextFragment]) -> Self {
        let mut histogram: Vec<(i32, usize)> = Vec::new();
        let mut index: HashMap<i32, usize> = HashMap::new();

        for fragment in fragments {
            let height = fragment.rounded_height();
            match index.get(&height) {
                Some(&i) => histogram[i].1 += 1,
                None => {
                    index.insert(height, histogram.len());
                    histogram.push((height, 1));
                }
            }
        }

        let mut mode_height = 0;
        let mut best = 0;
        for &(height, count) in &histogram {
            if count > best {
                best = count;
                mode_height = height;
            }
        }

        Self {
            histogram,
            mode_height,
            fragment_count: fragments.len(),
        }
    }

    /// The most frequent rounded height, or 0 for an empty document.
    pub fn mode_height(&self) -> i32 {
        self.mode_height
    }

    /// Heading threshold at the default ratio.
    pub fn header_threshold(&self) -> f64 {
        self.threshold_for(DEFAULT_HEADER_RATIO)
    }

    /// Heading threshold at `ratio` times the mode height.
    pub fn threshold_for(&self, ratio: f64) -> f64 {
        f64::from(self.mode_height) * ratio
    }

    /// Number of fragments profiled.
    pub fn fragment_count(&self) -> usize {
        self.fragment_count
    }

    /// Rounded heights and their counts, in first-seen order.
    pub fn histogram(&self) -> &[(i32, usize)] {
        &self.histogram
    }

    /// Whether no fragments were profiled.
    pub fn is_empty(&self) -> bool {
        self.fragment_count == 0
    }
}
