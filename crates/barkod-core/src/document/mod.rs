//! Uploaded document handling.
//!
//! A document is sent to the model as raw bytes plus a MIME type, so the only
//! work done here is deciding which of the accepted kinds a file is and
//! rejecting files the API would choke on.

mod loader;

pub use loader::{inspect_pdf, load_document, PdfSummary};

use crate::error::DocumentError;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Accepted upload types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// PDF document.
    Pdf,
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
}

impl DocumentKind {
    /// MIME type sent to the API.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Resolve a kind from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Resolve a kind from a declared MIME type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Detect a kind from the leading bytes of a file.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            return Some(Self::Pdf);
        }
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Png) => Some(Self::Png),
            Ok(image::ImageFormat::Jpeg) => Some(Self::Jpeg),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// An uploaded document: raw bytes plus their type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    bytes: Vec<u8>,
    kind: DocumentKind,
}

impl Document {
    /// Build a document from bytes and a declared kind.
    ///
    /// The declared kind must agree with the file signature.
    pub fn new(bytes: Vec<u8>, kind: DocumentKind) -> Result<Self> {
        if bytes.is_empty() {
            return Err(DocumentError::Empty);
        }

        match DocumentKind::sniff(&bytes) {
            Some(detected) if detected == kind => Ok(Self { bytes, kind }),
            Some(detected) => Err(DocumentError::Mismatch {
                declared: kind.mime_type().to_string(),
                detected: detected.mime_type().to_string(),
            }),
            None => Err(DocumentError::Mismatch {
                declared: kind.mime_type().to_string(),
                detected: "unknown".to_string(),
            }),
        }
    }

    /// Build a document from bytes and a declared MIME type.
    pub fn from_mime(bytes: Vec<u8>, mime: &str) -> Result<Self> {
        let kind = DocumentKind::from_mime(mime)
            .ok_or_else(|| DocumentError::Unsupported(mime.to_string()))?;
        Self::new(bytes, kind)
    }

    /// Raw file contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Document kind.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// MIME type sent to the API.
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_SIGNATURE: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_extension("jpg"), Some(DocumentKind::Jpeg));
        assert_eq!(DocumentKind::from_extension("jpeg"), Some(DocumentKind::Jpeg));
        assert_eq!(DocumentKind::from_extension("tiff"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(DocumentKind::sniff(b"%PDF-1.7\n"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::sniff(PNG_SIGNATURE), Some(DocumentKind::Png));
        assert_eq!(DocumentKind::sniff(JPEG_SIGNATURE), Some(DocumentKind::Jpeg));
        assert_eq!(DocumentKind::sniff(b"hello"), None);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            Document::new(Vec::new(), DocumentKind::Png),
            Err(DocumentError::Empty)
        ));
    }

    #[test]
    fn test_new_rejects_mismatch() {
        let err = Document::new(PNG_SIGNATURE.to_vec(), DocumentKind::Pdf).unwrap_err();
        assert!(matches!(err, DocumentError::Mismatch { .. }));
    }

    #[test]
    fn test_from_mime() {
        let doc = Document::from_mime(JPEG_SIGNATURE.to_vec(), "image/jpeg").unwrap();
        assert_eq!(doc.kind(), DocumentKind::Jpeg);
        assert_eq!(doc.mime_type(), "image/jpeg");

        assert!(matches!(
            Document::from_mime(JPEG_SIGNATURE.to_vec(), "text/plain"),
            Err(DocumentError::Unsupported(_))
        ));
    }
}
