//! Loading uploads from disk and sanity-checking PDFs with lopdf.

use std::path::Path;

use lopdf::Document as PdfDocument;
use tracing::debug;

use super::{Document, DocumentKind, Result};
use crate::error::DocumentError;

/// What lopdf could tell about an uploaded PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfSummary {
    /// Number of pages.
    pub pages: usize,
    /// Whether the file is encrypted.
    pub encrypted: bool,
}

/// Parse a PDF just far enough to know it is readable and has pages.
pub fn inspect_pdf(bytes: &[u8]) -> Result<PdfSummary> {
    let doc = PdfDocument::load_mem(bytes).map_err(|e| DocumentError::Pdf(e.to_string()))?;

    let pages = doc.get_pages().len();
    if pages == 0 {
        return Err(DocumentError::NoPages);
    }

    let summary = PdfSummary {
        pages,
        encrypted: doc.is_encrypted(),
    };
    debug!("PDF has {} pages (encrypted: {})", summary.pages, summary.encrypted);
    Ok(summary)
}

/// Read an upload from disk, resolving its kind from the extension.
pub fn load_document(path: &Path) -> crate::Result<Document> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let kind = DocumentKind::from_extension(extension)
        .ok_or_else(|| DocumentError::Unsupported(format!(".{extension}")))?;

    let bytes = std::fs::read(path)?;
    let document = Document::new(bytes, kind)?;

    if kind == DocumentKind::Pdf {
        inspect_pdf(document.bytes())?;
    }

    debug!(
        "Loaded {} ({}, {} bytes)",
        path.display(),
        kind,
        document.bytes().len()
    );
    Ok(document)
}
