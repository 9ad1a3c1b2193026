//! Builds small PDFs in memory for integration tests.

#![allow(dead_code)]

use lopdf::dictionary;
use lopdf::{Document, Object, ObjectId, Stream};

/// One page's worth of content.
pub enum PageSpec {
    /// Lines of (text, font size), shown top to bottom with `Tf`/`Td`/`Tj`
    Lines(Vec<(String, f32)>),
    /// A raw content stream
    Raw(String),
    /// A page with no /Contents entry
    Blank,
    /// /Contents that is not a stream
    Broken,
}

/// Collects pages and writes them as a PDF.
#[derive(Default)]
pub struct PdfBuilder {
    pages: Vec<PageSpec>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, lines: &[(&str, f32)]) -> Self {
        self.pages.push(PageSpec::Lines(
            lines.iter().map(|(t, s)| (t.to_string(), *s)).collect(),
        ));
        self
    }

    pub fn raw_page(mut self, content: &str) -> Self {
        self.pages.push(PageSpec::Raw(content.to_string()));
        self
    }

    pub fn blank_page(mut self) -> Self {
        self.pages.push(PageSpec::Blank);
        self
    }

    pub fn broken_page(mut self) -> Self {
        self.pages.push(PageSpec::Broken);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for spec in &self.pages {
            let page_id = add_page(&mut doc, spec, font_id, pages_id);
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}

fn add_page(doc: &mut Document, spec: &PageSpec, font_id: ObjectId, pages_id: ObjectId) -> ObjectId {
    let mut page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Resources" => dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        },
    };

    let content = match spec {
        PageSpec::Lines(lines) => Some(lines_content(lines)),
        PageSpec::Raw(raw) => Some(raw.clone()),
        PageSpec::Blank => None,
        PageSpec::Broken => {
            page.set("Contents", Object::Integer(7));
            None
        }
    };

    if let Some(content) = content {
        let stream = Stream::new(dictionary! {}, content.into_bytes());
        let content_id = doc.add_object(stream);
        page.set("Contents", content_id);
    }

    doc.add_object(page)
}

fn lines_content(lines: &[(String, f32)]) -> String {
    let mut content = String::from("BT\n72 760 Td\n");
    for (text, size) in lines {
        content.push_str(&format!(
            "/F1 {} Tf\n0 -{} Td\n({}) Tj\n",
            size,
            size * 1.4,
            escape(text)
        ));
    }
    content.push_str("ET\n");
    content
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// A two-heading prospectus excerpt with a cover note.
pub fn prospectus() -> Vec<u8> {
    PdfBuilder::new()
        .page(&[
            ("Global Offering", 10.0),
            ("Summary", 18.0),
            ("The Company is offering", 10.0),
            ("100,000,000 shares", 10.0),
        ])
        .page(&[
            ("Risk Factors", 18.0),
            ("Investing involves", 10.0),
            ("a high degree of risk", 10.0),
        ])
        .build()
}
