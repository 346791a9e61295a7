//! Barcode rendering.
//!
//! Encoding is delegated to rxing's PDF417 writer; this module only turns the
//! resulting modules into a padded square PNG.

mod encoder;
mod renderer;

pub use encoder::{ModuleGrid, Pdf417, Symbology};
pub use renderer::{BarcodeRenderer, RenderedCode};

use crate::error::RenderError;

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
