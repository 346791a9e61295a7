//! Rasterization of module grids into padded, square PNG images.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tracing::debug;

use super::encoder::{ModuleGrid, Pdf417, Symbology};
use super::Result;
use crate::error::RenderError;
use crate::models::config::BarcodeConfig;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A rendered barcode: square PNG plus the geometry it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCode {
    code: String,
    side: u32,
    padded_size: (u32, u32),
    png: Vec<u8>,
}

impl RenderedCode {
    /// The payload this image encodes.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Side length of the square image.
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Size of the bordered symbol before it was squared.
    pub fn padded_size(&self) -> (u32, u32) {
        self.padded_size
    }

    /// PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Consume into the PNG bytes.
    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// Reader positioned at the start of the PNG data.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.png.as_slice())
    }

    /// PNG scaled down to `width` pixels for display.
    pub fn preview_png(&self, width: u32) -> Result<Vec<u8>> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)?;
        if width == 0 || width >= image.width() {
            return Ok(self.png.clone());
        }
        // Square image, so the preview is square too.
        let preview = image.resize_exact(width, width, FilterType::Triangle);
        encode_png(&preview)
    }
}

/// Renders codes with a symbology and fixed raster geometry.
#[derive(Debug, Clone)]
pub struct BarcodeRenderer<S = Pdf417> {
    symbology: S,
    config: BarcodeConfig,
}

impl BarcodeRenderer<Pdf417> {
    /// PDF417 renderer configured from `config`.
    pub fn new(config: BarcodeConfig) -> Self {
        Self {
            symbology: Pdf417::new(config.columns, config.security_level),
            config,
        }
    }
}

impl Default for BarcodeRenderer<Pdf417> {
    fn default() -> Self {
        Self::new(BarcodeConfig::default())
    }
}

impl<S: Symbology> BarcodeRenderer<S> {
    /// Renderer over an arbitrary symbology.
    pub fn with_symbology(symbology: S, config: BarcodeConfig) -> Self {
        Self { symbology, config }
    }

    /// Raster geometry in use.
    pub fn config(&self) -> &BarcodeConfig {
        &self.config
    }

    /// Render a code, or `None` if it cannot be encoded.
    pub fn render(&self, code: &str) -> Option<RenderedCode> {
        match self.try_render(code) {
            Ok(rendered) => Some(rendered),
            Err(e) => {
                debug!("No image for {:?}: {}", code, e);
                None
            }
        }
    }

    /// Render a code, reporting why it failed.
    pub fn try_render(&self, code: &str) -> Result<RenderedCode> {
        let grid = self.symbology.encode(code)?;
        let symbol = self.rasterize(&grid);

        let border = self.config.border;
        let padded_size = (symbol.width() + 2 * border, symbol.height() + 2 * border);
        let padded = place_on_white(&symbol, padded_size.0, padded_size.1, border, border);

        let side = padded_size.0.max(padded_size.1);
        let squared = place_on_white(
            &padded,
            side,
            side,
            (side - padded_size.0) / 2,
            (side - padded_size.1) / 2,
        );

        let png = encode_png(&DynamicImage::ImageRgb8(squared))?;

        Ok(RenderedCode {
            code: code.to_string(),
            side,
            padded_size,
            png,
        })
    }

    /// Draw the symbol: each module `scale` wide and `scale * ratio` tall,
    /// inside the quiet zone.
    fn rasterize(&self, grid: &ModuleGrid) -> RgbImage {
        let module_w = self.config.scale;
        let module_h = self.config.scale * self.config.ratio;
        let quiet = self.config.quiet_zone;

        let width = grid.width() as u32 * module_w + 2 * quiet;
        let height = grid.height() as u32 * module_h + 2 * quiet;

        RgbImage::from_fn(width, height, |x, y| {
            if x < quiet || y < quiet || x >= width - quiet || y >= height - quiet {
                return WHITE;
            }
            let column = ((x - quiet) / module_w) as usize;
            let row = ((y - quiet) / module_h) as usize;
            if grid.is_bar(column, row) { BLACK } else { WHITE }
        })
    }
}

/// Copy `image` onto a white canvas of the given size at `(x, y)`.
fn place_on_white(image: &RgbImage, width: u32, height: u32, x: u32, y: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, WHITE);
    imageops::replace(&mut canvas, image, i64::from(x), i64::from(y));
    canvas
}

fn encode_png(image: &DynamicImage) -> std::result::Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}
