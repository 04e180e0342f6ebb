//! Colour handling for finished cards
//!
//! The print conversion is a single fixed one: flatten onto opaque white,
//! drop alpha, then map each RGB channel to its complementary ink.

use super::{CardRaster, CmykImage};
use crate::constants::mm_to_px;
use crate::types::{CardSheetError, ColourMode, Result};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Pixel size and colour model every card raster is finished to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterTarget {
    pub width_px: u32,
    pub height_px: u32,
    pub colour: ColourMode,
}

impl RasterTarget {
    /// Target matching a physical card size at `dpi`
    pub fn for_card(width_mm: f32, height_mm: f32, dpi: u32, colour: ColourMode) -> Self {
        Self {
            width_px: (mm_to_px(width_mm, dpi) as u32).max(1),
            height_px: (mm_to_px(height_mm, dpi) as u32).max(1),
            colour,
        }
    }
}

/// Resample a composed card to the target size and convert its colour model.
///
/// Must run after all drawing: CMYK output is flattened before resampling so
/// soft edges blend against white rather than against transparent black.
pub fn finish_card(img: RgbaImage, target: &RasterTarget) -> CardRaster {
    let size = (target.width_px, target.height_px);
    match target.colour {
        ColourMode::Native => {
            let img = if img.dimensions() == size {
                img
            } else {
                imageops::resize(&img, size.0, size.1, FilterType::Lanczos3)
            };
            CardRaster::Rgba(img)
        }
        ColourMode::Cmyk => {
            let flat = flatten_on_white(&img);
            let flat = if flat.dimensions() == size {
                flat
            } else {
                imageops::resize(&flat, size.0, size.1, FilterType::Lanczos3)
            };
            CardRaster::Cmyk(rgb_to_cmyk(&flat))
        }
    }
}

/// Composite over opaque white and discard the alpha channel
pub fn flatten_on_white(img: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        let blend = |c: u8| -> u8 {
            let c = c as u32;
            let a = a as u32;
            ((c * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Complementary-ink conversion without black generation
pub fn rgb_to_cmyk(img: &RgbImage) -> CmykImage {
    let mut data = Vec::with_capacity((img.width() * img.height() * 4) as usize);
    for Rgb([r, g, b]) in img.pixels() {
        data.extend_from_slice(&[255 - r, 255 - g, 255 - b, 0]);
    }
    CmykImage {
        width: img.width(),
        height: img.height(),
        data,
    }
}

/// Parse `#rrggbb` (leading `#` optional) into an opaque colour
pub fn parse_hex_colour(value: &str) -> Result<Rgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    let invalid = || CardSheetError::Config(format!("Invalid colour '{}': expected #rrggbb", value));

    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}
