//! Symbology encoding: code string to a grid of modules.

use std::collections::HashMap;

use rxing::common::BitMatrix;
use rxing::pdf417::encoder::Dimensions;
use rxing::pdf417::PDF417Writer;
use rxing::{BarcodeFormat, EncodeHintType, EncodeHintValue, EncodingHintDictionary, Writer};

use super::Result;
use crate::error::RenderError;

/// PDF417 row limits.
const MIN_ROWS: usize = 3;
const MAX_ROWS: usize = 90;

/// Width of one codeword in modules.
const CODEWORD_MODULES: u32 = 17;

/// A barcode as logical rows of modules, `true` for a bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    width: usize,
    rows: Vec<Vec<bool>>,
}

impl ModuleGrid {
    /// Build a grid from rows of equal length.
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return Err(RenderError::EmptySymbol);
        }
        Ok(Self { width, rows })
    }

    /// Modules per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of logical rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Whether the module at `(x, y)` is a bar.
    pub fn is_bar(&self, x: usize, y: usize) -> bool {
        self.rows[y][x]
    }
}

/// A barcode symbology.
pub trait Symbology {
    /// Encode a payload into a module grid.
    fn encode(&self, code: &str) -> Result<ModuleGrid>;
}

/// PDF417 with a fixed column count and error-correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pdf417 {
    columns: u32,
    security_level: u32,
}

impl Pdf417 {
    /// Create an encoder with `columns` data columns and the given
    /// error-correction level (0-8).
    pub fn new(columns: u32, security_level: u32) -> Self {
        Self {
            columns,
            security_level,
        }
    }

    /// Width of a symbol in modules: start, left indicator, data columns,
    /// right indicator and the 18-module stop pattern.
    fn symbol_width(&self) -> u32 {
        (self.columns + 4) * CODEWORD_MODULES + 1
    }

    fn hints(&self) -> EncodingHintDictionary {
        let columns = self.columns as usize;
        let mut hints: EncodingHintDictionary = HashMap::new();
        hints.insert(
            EncodeHintType::ERROR_CORRECTION,
            EncodeHintValue::ErrorCorrection(self.security_level.to_string()),
        );
        hints.insert(
            EncodeHintType::PDF417_DIMENSIONS,
            EncodeHintValue::Pdf417Dimensions(Dimensions::new(columns, columns, MIN_ROWS, MAX_ROWS)),
        );
        // Byte compaction over UTF-8 so non-Latin-1 codes still encode
        hints.insert(
            EncodeHintType::CHARACTER_SET,
            EncodeHintValue::CharacterSet("UTF-8".to_string()),
        );
        hints.insert(
            EncodeHintType::MARGIN,
            EncodeHintValue::Margin("0".to_string()),
        );
        hints
    }

    /// Recover logical rows from the writer's output.
    ///
    /// The writer stretches every row vertically and turns the symbol on its
    /// side when it is taller than wide; rows are read back along the
    /// symbol's own axis and vertical repeats collapsed.
    fn grid_from_matrix(&self, matrix: &BitMatrix) -> Result<ModuleGrid> {
        let (width, height) = (matrix.width(), matrix.height());
        let expected = self.symbol_width();
        let rotated = width != expected && height == expected;

        let mut rows: Vec<Vec<bool>> = if rotated {
            (0..width)
                .map(|x| (0..height).rev().map(|y| matrix.get(x, y)).collect())
                .collect()
        } else {
            (0..height)
                .map(|y| (0..width).map(|x| matrix.get(x, y)).collect())
                .collect()
        };
        // Adjacent logical rows always differ in their row indicators.
        rows.dedup();

        ModuleGrid::new(rows)
    }
}

impl Default for Pdf417 {
    fn default() -> Self {
        Self::new(8, 5)
    }
}

impl Symbology for Pdf417 {
    fn encode(&self, code: &str) -> Result<ModuleGrid> {
        if code.is_empty() {
            return Err(RenderError::Encode {
                code: code.to_string(),
                reason: "empty payload".to_string(),
            });
        }

        let matrix = PDF417Writer
            .encode_with_hints(code, &BarcodeFormat::PDF_417, 1, 1, &self.hints())
            .map_err(|e| RenderError::Encode {
                code: code.to_string(),
                reason: e.to_string(),
            })?;

        self.grid_from_matrix(&matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rejects_ragged_rows() {
        assert!(ModuleGrid::new(vec![vec![true, false], vec![true]]).is_err());
        assert!(ModuleGrid::new(Vec::new()).is_err());
    }

    #[test]
    fn test_pdf417_width_follows_columns() {
        let grid = Pdf417::new(8, 5).encode("DT123").unwrap();
        assert_eq!(grid.width(), 205);
        assert!(grid.height() >= MIN_ROWS);
        assert!(grid.height() <= MAX_ROWS);
    }

    #[test]
    fn test_pdf417_starts_with_start_pattern() {
        // Start pattern 81111113: eight bars of 8 modules.
        let grid = Pdf417::default().encode("EA555").unwrap();
        let first: Vec<bool> = (0..9).map(|x| grid.is_bar(x, 0)).collect();
        assert_eq!(
            first,
            vec![true, true, true, true, true, true, true, true, false]
        );
    }

    #[test]
    fn test_pdf417_is_deterministic() {
        let encoder = Pdf417::default();
        assert_eq!(encoder.encode("CY900").unwrap(), encoder.encode("CY900").unwrap());
    }

    #[test]
    fn test_pdf417_rejects_oversized_payload() {
        let payload = "A".repeat(5000);
        assert!(matches!(
            Pdf417::default().encode(&payload),
            Err(RenderError::Encode { .. })
        ));
    }

    #[test]
    fn test_pdf417_accepts_turkish_characters() {
        let grid = Pdf417::default().encode("ÇĞİÖŞÜ").unwrap();
        assert_eq!(grid.width(), 205);
    }

    #[test]
    fn test_pdf417_rejects_empty_payload() {
        assert!(Pdf417::default().encode("").is_err());
    }
}
