//! Positioned text fragments.

use serde::{Deserialize, Serialize};

/// One run of text shown on a page, with its glyph height.
///
/// Fragments are produced by the collector in reading order and never
/// carry whitespace-only text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The decoded text of the run
    pub text: String,

    /// Glyph height in user-space units
    pub height: f32,

    /// Page number (1-indexed)
    pub page: u32,
}

impl TextFragment {
    /// Create a fragment, or `None` if the text is whitespace-only.
    pub fn new(text: impl Into<String>, height: f32, page: u32) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self { text, height, page })
    }

    /// Height rounded to the nearest integer, used to group sizes.
    pub fn rounded_height(&self) -> i32 {
        self.height.round() as i32
    }
}
