//! Core library for AI-assisted shipping-label barcodes.
//!
//! This crate provides:
//! - Upload handling for PDF, PNG and JPEG documents
//! - Code extraction through hosted Gemini models with ordered fallback
//! - PDF417 rendering into padded square PNG images
//! - Session state and ZIP packaging of rendered codes

pub mod barcode;
pub mod document;
pub mod error;
pub mod extraction;
pub mod models;
pub mod session;

pub use barcode::{BarcodeRenderer, Pdf417, RenderedCode, Symbology};
pub use document::{load_document, Document, DocumentKind};
pub use error::{BarkodError, Result};
pub use extraction::{ContentGenerator, GeminiClient, ModelFallbackExtractor};
pub use models::bundle::{AttemptFailure, ExtractionGroup, ExtractionOutcome, FailureKind};
pub use models::config::BarkodConfig;
pub use session::{build_archive, Archive, Session};
