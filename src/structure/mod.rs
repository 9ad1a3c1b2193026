//! Structure inference.
//!
//! Profiles glyph heights, splits fragments into sections at heading-sized
//! text and packages the result as a [`Document`](crate::model::Document).

mod assembler;
mod options;
mod profiler;
mod segmenter;

pub use assembler::assemble;
pub use options::{SegmentOptions, DEFAULT_HEADER_RATIO, DEFAULT_LEVEL_RATIOS};
pub use profiler::TypographyProfile;
pub use segmenter::{FragmentKind, HeadingClassifier, HeightBands, SectionSegmenter};
