//! Upload validation: PDF header sniffing and the size ceiling.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Default upload ceiling (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// What the header sniff found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// Header version such as `1.4`
    pub version: String,
    /// Byte offset of the `%PDF-` marker
    pub header_offset: usize,
}

impl fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDF {} (header at byte {})", self.version, self.header_offset)
    }
}

const HEADER_MARKER: &[u8] = b"%PDF-";
/// `major.minor`
const VERSION_LEN: usize = 3;

/// Readers tolerate leading junk before the header, up to this many bytes.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Sniff the header of the file at `path`, reading at most 1 KiB.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<PdfFormat> {
    let file = File::open(path)?;
    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    file.take(HEADER_SEARCH_WINDOW as u64)
        .read_to_end(&mut head)?;
    detect_format_from_bytes(&head)
}

/// Find a `%PDF-x.y` header within the first 1024 bytes of `data`.
///
/// Fails with [`Error::UnknownFormat`] when there is no marker and with
/// [`Error::UnsupportedVersion`] when the version is malformed.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let offset = window
        .windows(HEADER_MARKER.len())
        .position(|w| w == HEADER_MARKER)
        .ok_or(Error::UnknownFormat)?;

    let version_start = offset + HEADER_MARKER.len();
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    if !looks_like_version(version_bytes) {
        return Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(version_bytes).into_owned(),
        ));
    }

    Ok(PdfFormat {
        version: String::from_utf8_lossy(version_bytes).into_owned(),
        header_offset: offset,
    })
}

/// Reject inputs over `limit` bytes. `None` disables the check.
pub fn check_size(size: u64, limit: Option<u64>) -> Result<()> {
    match limit {
        Some(limit) if size > limit => Err(Error::FileTooLarge { size, limit }),
        _ => Ok(()),
    }
}

fn looks_like_version(bytes: &[u8]) -> bool {
    matches!(bytes, [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit())
}

/// Cheap yes/no form of [`detect_format_from_bytes`].
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_at_start() {
        let format = detect_format_from_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.to_string(), "PDF 1.7 (header at byte 0)");
        assert_eq!(format.header_offset, 0);
    }

    #[test]
    fn test_detect_with_leading_junk() {
        let mut data = b"\r\n\x00garbage".to_vec();
        data.extend_from_slice(b"%PDF-1.4\n");
        let format = detect_format_from_bytes(&data).unwrap();
        assert_eq!(format.version, "1.4");
        assert_eq!(format.header_offset, 10);
    }

    #[test]
    fn test_detect_header_outside_window() {
        let mut data = vec![b' '; HEADER_SEARCH_WINDOW];
        data.extend_from_slice(b"%PDF-1.4\n");
        assert!(matches!(
            detect_format_from_bytes(&data),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_html_is_not_pdf() {
        assert!(matches!(
            detect_format_from_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_truncated_version() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-1"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_detect_bad_version() {
        assert!(matches!(
            detect_format_from_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(10, Some(10)).is_ok());
        assert!(check_size(u64::MAX, None).is_ok());
        assert!(matches!(
            check_size(11, Some(10)),
            Err(Error::FileTooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn test_is_pdf_bytes() {
        assert!(is_pdf_bytes(b"%PDF-2.0\n"));
        assert!(!is_pdf_bytes(b"prospectus.docx"));
        assert!(!is_pdf_bytes(b""));
    }
}
