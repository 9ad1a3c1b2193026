//! Page decoding backends.
//!
//! The collector only needs four things from a PDF library: the page list,
//! each page's content bytes, those bytes split into operations, and string
//! operands turned into text. [`PdfBackend`] names exactly that, and
//! [`LopdfBackend`] provides it with lopdf.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};

/// Object id of a page dictionary.
pub type PageRef = (u32, u16);

/// One operand of a content stream operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Int(i64),
    Real(f32),
    Name(Vec<u8>),
    /// Raw string bytes, still in the font's encoding
    Text(Vec<u8>),
    List(Vec<Operand>),
    Other,
}

impl Operand {
    /// Numeric value, for integer and real operands.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Operand::Int(i) => Some(*i as f32),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<&Object> for Operand {
    fn from(obj: &Object) -> Self {
        match obj {
            Object::Integer(i) => Operand::Int(*i),
            Object::Real(r) => Operand::Real(*r),
            Object::Name(name) => Operand::Name(name.clone()),
            Object::String(bytes, _) => Operand::Text(bytes.clone()),
            Object::Array(items) => Operand::List(items.iter().map(Operand::from).collect()),
            _ => Operand::Other,
        }
    }
}

/// An operator with its operands, in stream order.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub op: String,
    pub args: Vec<Operand>,
}

impl Operation {
    pub fn new(op: impl Into<String>, args: Vec<Operand>) -> Self {
        Self { op: op.into(), args }
    }

    /// Argument `idx` as a number.
    pub fn num(&self, idx: usize) -> Option<f32> {
        self.args.get(idx).and_then(Operand::as_f32)
    }
}

/// Read access to a loaded PDF, shared across page tasks.
pub trait PdfBackend: Send + Sync {
    /// Pages keyed by 1-based page number.
    fn page_refs(&self) -> BTreeMap<u32, PageRef>;

    /// Concatenated, decompressed content of one page.
    ///
    /// A page without content yields an empty buffer.
    fn content_bytes(&self, page: PageRef) -> Result<Vec<u8>>;

    /// Split content bytes into operations.
    fn operations(&self, content: &[u8]) -> Result<Vec<Operation>>;

    /// Turn string operand bytes into text using the named font on `page`.
    fn decode_string(&self, page: PageRef, font: &[u8], bytes: &[u8]) -> String;
}

/// Decode string bytes without font information.
///
/// Tries UTF-16BE (when the bytes carry a BOM), then UTF-8, then Latin-1.
pub fn fallback_decode(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// [`PdfBackend`] over an in-memory `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_document(LopdfDocument::load(path)?)
    }

    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Self::from_document(LopdfDocument::load_mem(data)?)
    }

    /// Encrypted documents are refused; there is no decryption support.
    fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Version from the file header, e.g. "1.7".
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn stream(&self, id: ObjectId) -> Option<&Stream> {
        match self.doc.get_object(id) {
            Ok(Object::Stream(stream)) => Some(stream),
            _ => None,
        }
    }

    /// Content arrays are joined with newlines so operators never fuse.
    fn join_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut joined = Vec::new();
        for id in refs.iter().filter_map(|obj| obj.as_reference().ok()) {
            if let Some(stream) = self.stream(id) {
                joined.extend(stream_payload(stream));
                joined.push(b'\n');
            }
        }
        joined
    }
}

impl PdfBackend for LopdfBackend {
    fn page_refs(&self) -> BTreeMap<u32, PageRef> {
        self.doc.get_pages()
    }

    fn content_bytes(&self, page: PageRef) -> Result<Vec<u8>> {
        let dict = self
            .doc
            .get_dictionary(page)
            .map_err(|e| Error::Decode(e.to_string()))?;

        let Ok(contents) = dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match contents {
            Object::Reference(id) => match self.doc.get_object(*id) {
                Ok(Object::Stream(stream)) => Ok(stream_payload(stream)),
                Ok(Object::Array(refs)) => Ok(self.join_streams(refs)),
                _ => Err(Error::Decode("page /Contents is not a stream".to_string())),
            },
            Object::Array(refs) => Ok(self.join_streams(refs)),
            _ => Err(Error::Decode("page /Contents is not a stream".to_string())),
        }
    }

    fn operations(&self, content: &[u8]) -> Result<Vec<Operation>> {
        let decoded = Content::decode(content).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(decoded
            .operations
            .iter()
            .map(|op| {
                let args = op.operands.iter().map(Operand::from).collect();
                Operation::new(op.operator.clone(), args)
            })
            .collect())
    }

    fn decode_string(&self, page: PageRef, font: &[u8], bytes: &[u8]) -> String {
        let decoded = self
            .doc
            .get_page_fonts(page)
            .ok()
            .and_then(|fonts| {
                let dict = fonts.get(font)?;
                let encoding = dict.get_font_encoding(&self.doc).ok()?;
                LopdfDocument::decode_text(&encoding, bytes).ok()
            });
        decoded.unwrap_or_else(|| fallback_decode(bytes))
    }
}

/// Stream bytes, decompressed when the stream has a filter.
fn stream_payload(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}
