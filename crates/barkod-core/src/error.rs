//! Error types for the barkod-core library.

use thiserror::Error;

/// Main error type for the barkod library.
#[derive(Error, Debug)]
pub enum BarkodError {
    /// Uploaded document could not be accepted.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Missing or unusable API credential.
    #[error("credential error: {0}")]
    Credentials(String),

    /// Failure talking to the hosted model API.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Barcode encoding or rasterization error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Archive assembly error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to loading an uploaded document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file is empty.
    #[error("document is empty")]
    Empty,

    /// File type is not one of PDF, PNG or JPEG.
    #[error("unsupported document type: {0}")]
    Unsupported(String),

    /// The declared type does not match the file contents.
    #[error("declared type {declared} does not match contents ({detected})")]
    Mismatch { declared: String, detected: String },

    /// The PDF could not be parsed.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors returned by a single content-generation call.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The API answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response carried no text.
    #[error("response contained no text")]
    EmptyResponse,

    /// The response body could not be decoded.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ServiceError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None if err.is_decode() => ServiceError::Decode(err.to_string()),
            None => ServiceError::Transport(err.to_string()),
        }
    }
}

/// Errors raised when a model answer does not contain a usable group list.
#[derive(Error, Debug)]
pub enum ResponseParseError {
    /// No `[` ... `]` span in the answer.
    #[error("response contained no JSON array")]
    NoJsonArray,

    /// The span was not a list of `{name, codes}` records.
    #[error("invalid group list: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors raised while turning a code into an image.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The symbology encoder rejected the payload.
    #[error("encoder rejected {code:?}: {reason}")]
    Encode { code: String, reason: String },

    /// The encoder produced an empty symbol.
    #[error("encoder produced an empty symbol")]
    EmptySymbol,

    /// PNG serialization failed.
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
}

/// Errors raised while assembling the download archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Writing a ZIP entry failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while writing entry data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the barkod library.
pub type Result<T> = std::result::Result<T, BarkodError>;
