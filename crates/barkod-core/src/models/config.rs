//! Configuration structures for extraction, rendering and output.

use serde::{Deserialize, Serialize};

/// Candidate models tried in order when none are configured.
pub const DEFAULT_MODELS: [&str; 5] = [
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-3.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-flash-latest",
];

/// Default Gemini REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Default file name of the bulk download.
pub const DEFAULT_ARCHIVE_NAME: &str = "barkodlar_v3.zip";

/// Main configuration for barkod.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BarkodConfig {
    /// Model fallback configuration.
    pub extraction: ExtractionConfig,

    /// Barcode symbology and raster geometry.
    pub barcode: BarcodeConfig,

    /// Output naming and preview settings.
    pub output: OutputConfig,
}

/// Extraction (hosted model) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Candidate model identifiers, highest priority first.
    pub models: Vec<String>,

    /// Base URL of the generative language API.
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 120,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// PDF417 encoding and raster settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeConfig {
    /// Number of data columns.
    pub columns: u32,

    /// Error-correction (security) level, 0-8.
    pub security_level: u32,

    /// Module width in pixels.
    pub scale: u32,

    /// Row height as a multiple of the module width.
    pub ratio: u32,

    /// Quiet zone drawn around the symbol, in pixels.
    pub quiet_zone: u32,

    /// Extra white border added before squaring, in pixels.
    pub border: u32,
}

impl Default for BarcodeConfig {
    fn default() -> Self {
        Self {
            columns: 8,
            security_level: 5,
            scale: 8,
            ratio: 3,
            quiet_zone: 20,
            border: 50,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name used for the bulk download.
    pub archive_name: String,

    /// Width previews are scaled to, in pixels.
    pub preview_width: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            preview_width: 350,
        }
    }
}

impl BarkodConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values that would make every request or render fail.
    pub fn validate(&self) -> crate::Result<()> {
        if self.extraction.models.iter().any(|m| m.trim().is_empty()) {
            return Err(crate::BarkodError::Config(
                "extraction.models contains an empty identifier".to_string(),
            ));
        }
        if self.barcode.columns == 0 || self.barcode.columns > 30 {
            return Err(crate::BarkodError::Config(format!(
                "barcode.columns must be between 1 and 30, got {}",
                self.barcode.columns
            )));
        }
        if self.barcode.security_level > 8 {
            return Err(crate::BarkodError::Config(format!(
                "barcode.security_level must be between 0 and 8, got {}",
                self.barcode.security_level
            )));
        }
        if self.barcode.scale == 0 || self.barcode.ratio == 0 {
            return Err(crate::BarkodError::Config(
                "barcode.scale and barcode.ratio must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
