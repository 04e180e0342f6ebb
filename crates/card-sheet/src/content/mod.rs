//! Card content production
//!
//! Everything that turns inputs into finished card rasters:
//! - QR symbol encoding and identifier derivation
//! - Composition of symbol, identifier and counter onto the base artwork
//! - Optional CMYK conversion and resampling to the output resolution
//! - Optional on-disk staging of symbols for large batches

mod colour;
mod compose;
mod identifier;
mod producer;
mod staging;
mod symbol;

pub use colour::*;
pub use compose::*;
pub use identifier::derive_identifier;
pub use producer::*;
pub use staging::*;
pub use symbol::{Symbol, encode_symbol};

use image::RgbaImage;
use std::path::PathBuf;
use std::rc::Rc;

/// Pixels of a card converted for print: C, M, Y, K interleaved, 8 bits each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmykImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl CmykImage {
    /// C, M, Y, K at `(x, y)`; `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize * self.width as usize) + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// A finished card raster in its output colour model
#[derive(Debug, Clone, PartialEq)]
pub enum CardRaster {
    Rgba(RgbaImage),
    Cmyk(CmykImage),
}

impl CardRaster {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            CardRaster::Rgba(img) => img.dimensions(),
            CardRaster::Cmyk(img) => (img.width, img.height),
        }
    }
}

/// One unit of content for the renderer
#[derive(Debug, Clone)]
pub enum CardItem {
    /// Finished raster; clones of the same `Rc` share one embedded image
    Raster(Rc<CardRaster>),
    /// Image file decoded and finished at draw time
    File(PathBuf),
    /// Content that could not be produced; drawn as a placeholder
    Failed { label: String, reason: String },
}

impl CardItem {
    pub fn raster(raster: CardRaster) -> Self {
        CardItem::Raster(Rc::new(raster))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CardItem::Failed { .. })
    }
}
