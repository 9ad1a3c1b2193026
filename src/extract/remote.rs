//! Client for the server-side table-of-contents service.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{Document, FileLink, Section};

use super::StructureExtractor;

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "PDFSECTIONS_API_URL";

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const UPLOAD_PATH: &str = "/api/v1/upload-pdf";

/// Server-side extraction can take minutes on a long prospectus.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn api_url_from_env() -> String {
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Uploads documents to the extraction service and maps its TOC.
pub struct RemoteExtractor {
    base_url: String,
    client: Client,
}

impl RemoteExtractor {
    /// Fails when the HTTP client cannot be set up (e.g. no TLS backend).
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Upstream {
                status: None,
                message: format!("Cannot create HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Service at `PDFSECTIONS_API_URL`, or `http://localhost:8000`.
    pub fn from_env() -> Result<Self> {
        Self::new(&api_url_from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Download a linked section file as text.
    pub fn fetch_preview(&self, link: &FileLink) -> Result<String> {
        let response = self.client.get(&link.url).send()?;
        let response = check_status(response)?;
        Ok(response.text()?)
    }

    fn upload(&self, data: &[u8], file_name: &str) -> Result<TocResponse> {
        let url = format!("{}{}", self.base_url, UPLOAD_PATH);
        let part = Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        log::debug!("Uploading {} ({} bytes) to {}", file_name, data.len(), url);
        let response = self.client.post(&url).multipart(form).send()?;
        let response = check_status(response)?;

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| Error::Upstream {
            status: None,
            message: format!("Unexpected response from extraction service: {}", e),
        })
    }
}

impl StructureExtractor for RemoteExtractor {
    fn name(&self) -> &str {
        "remote"
    }

    fn extract(&self, data: &[u8], file_name: &str) -> Result<Document> {
        let toc = self.upload(data, file_name)?;
        log::debug!(
            "Service returned document {:?} with {} TOC entries",
            toc.document_id,
            toc.toc.len()
        );
        Ok(toc.into_document(file_name, &self.base_url))
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());
    let body = response.text().unwrap_or_default();
    Err(Error::Upstream {
        status: Some(status.as_u16()),
        message: error_message(&reason, &body),
    })
}

/// Message for a failed request: the service's `detail` when it sends a
/// meaningful one, otherwise the status reason plus any non-JSON body.
fn error_message(reason: &str, body: &str) -> String {
    let fallback = format!("Failed to upload PDF: {}", reason);
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json.get("detail").and_then(detail_text).unwrap_or(fallback),
        Err(_) if !body.is_empty() => format!("{} - {}", fallback, body),
        Err(_) => fallback,
    }
}

/// `detail` as text; empty strings, zero, `false` and `null` carry nothing.
fn detail_text(detail: &Value) -> Option<String> {
    match detail {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct TocResponse {
    #[serde(default)]
    document_id: Option<String>,
    #[serde(default)]
    toc: Vec<TocEntry>,
    #[serde(default)]
    files: Vec<FileEntry>,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TocEntry {
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    title: Value,
    #[serde(default)]
    page: u32,
    #[serde(default)]
    section_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    name: String,
    url: String,
}

impl TocResponse {
    fn into_document(self, file_name: &str, base_url: &str) -> Document {
        let page_count = self
            .metadata
            .as_ref()
            .and_then(|m| m.get("page_count"))
            .and_then(Value::as_u64)
            .map(|n| n as u32)
            .unwrap_or(0);

        let sections = self.toc.into_iter().map(TocEntry::into_section).collect();
        let links = self
            .files
            .into_iter()
            .map(|f| FileLink::new(f.name, format!("{}{}", base_url, f.url)))
            .collect();

        Document::from_sections(file_name, page_count, sections).with_file_links(links)
    }
}

impl TocEntry {
    fn into_section(self) -> Section {
        // The service sends numeric titles for numbered headings.
        let title = match self.title {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        let mut section = Section::toc_entry(title, self.page);
        if let Some(level) = self.level {
            section = section.with_level(level);
        }
        if let Some(path) = self.section_path {
            section = section.with_section_path(path);
        }
        section
    }
}
