//! Error types for pdfsections.

use std::io;
use thiserror::Error;

/// Result type alias for pdfsections operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a document from yielding sections.
///
/// A document without any extractable text is not an error: it produces a
/// [`Document`](crate::model::Document) with zero sections.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    /// No `%PDF-` header near the start of the input.
    #[error("Not a PDF: no %PDF- header found")]
    UnknownFormat,

    /// A header was found but its version is not `digit.digit`.
    #[error("Unrecognized PDF header version: {0}")]
    UnsupportedVersion(String),

    /// The file or one of its pages could not be decoded.
    #[error("Cannot decode PDF: {0}")]
    Decode(String),

    #[error("Encrypted PDFs are not supported")]
    Encrypted,

    /// The input exceeds the configured size ceiling.
    #[error("File is {size} bytes, larger than the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// A page selection reaches past the last page: (requested, total).
    #[error("Page selection reaches page {0}, but the document has {1} pages")]
    PageOutOfRange(u32, u32),

    #[error("Bad page selection: {0}")]
    InvalidPageRange(String),

    /// The remote extraction service failed or could not be reached.
    #[error("{message}")]
    Upstream {
        /// HTTP status, when the service answered at all.
        status: Option<u16>,
        /// Best available human-readable message.
        message: String,
    },

    #[error("Cannot render output: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error came from the remote extraction service.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Decode(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("invalid JSON: {}", err))
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_connect() {
            match err.url() {
                Some(url) => format!("Cannot reach extraction service at {}", url),
                None => "Cannot reach extraction service".to_string(),
            }
        } else if err.is_timeout() {
            "Extraction service timed out".to_string()
        } else {
            err.to_string()
        };
        Error::Upstream {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}
