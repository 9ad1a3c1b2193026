//! Document serialization as JSON.

use std::io::Write;

use crate::error::{Error, Result};
use crate::model::Document;

/// Layout of the emitted JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Two-space indentation, one field per line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Serialize `doc` with the camelCase field names of the data model.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let mut buf = Vec::new();
    write_json(&mut buf, doc, format)?;
    String::from_utf8(buf).map_err(|e| Error::Render(e.to_string()))
}

/// Stream `doc` into `writer`.
pub fn write_json<W: Write>(writer: W, doc: &Document, format: JsonFormat) -> Result<()> {
    let written = match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(writer, doc),
        JsonFormat::Compact => serde_json::to_writer(writer, doc),
    };
    written.map_err(|e| Error::Render(format!("cannot serialize {}: {}", doc.file_name(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;

    fn two_sections() -> Document {
        Document::from_sections(
            "prospectus.pdf",
            2,
            vec![
                Section::new("Introduction", "Cover", 1),
                Section::new("Summary", "The offer", 2),
            ],
        )
    }

    #[test]
    fn test_pretty_uses_camel_case() {
        let json = to_json(&two_sections(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"fileName\": \"prospectus.pdf\""));
        assert!(json.contains("\"pageNumber\": 2"));
        assert!(json.lines().count() > 1);
    }

    #[test]
    fn test_compact_reads_back() {
        let json = to_json(&two_sections(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, two_sections());
    }

    #[test]
    fn test_write_json_matches_to_json() {
        let mut out = Vec::new();
        write_json(&mut out, &two_sections(), JsonFormat::Compact).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            to_json(&two_sections(), JsonFormat::Compact).unwrap()
        );
    }
}
