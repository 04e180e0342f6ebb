//! Card personalization
//!
//! Pastes a QR symbol onto the base artwork and draws the identifier and the
//! sequence counter as text.

use super::parse_hex_colour;
use crate::constants::DEFAULT_FONT;
use crate::options::{CounterPlacement, PersonalizeOptions, SymbolAnchor};
use crate::types::{CardSheetError, Result};
use image::imageops;
use image::{DynamicImage, RgbImage, Rgba, RgbaImage};
use log::{debug, info};
use rusttype::{Font, Scale, point};

const IDENTIFIER_COLOUR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Composes personalized cards from one set of options
pub struct Composer {
    options: PersonalizeOptions,
    font: Font<'static>,
    counter_colour: Rgba<u8>,
    card_width_mm: f32,
}

impl Composer {
    /// Build a composer, loading the configured font or the bundled one.
    ///
    /// `card_width_mm` is the physical width the base artwork prints at; it
    /// fixes the artwork's pixels per millimetre for mm offsets.
    pub fn new(options: &PersonalizeOptions, card_width_mm: f32) -> Result<Self> {
        let counter_colour = parse_hex_colour(&options.counter_colour)?;
        if !(card_width_mm.is_finite() && card_width_mm > 0.0) {
            return Err(CardSheetError::Config(format!(
                "Card width must be positive, got {}mm",
                card_width_mm
            )));
        }

        let font = match &options.font {
            Some(path) => {
                if !path.exists() {
                    return Err(CardSheetError::MissingFile {
                        stage: "font",
                        path: path.clone(),
                    });
                }
                let bytes = std::fs::read(path)?;
                let font = Font::try_from_vec(bytes).ok_or_else(|| {
                    CardSheetError::Font(format!("'{}' is not a usable font", path.display()))
                })?;
                info!("Loaded font from: {}", path.display());
                font
            }
            None => {
                debug!("Using bundled DejaVu Sans");
                Font::try_from_bytes(DEFAULT_FONT)
                    .ok_or_else(|| CardSheetError::Font("bundled font is unusable".to_string()))?
            }
        };

        Ok(Self {
            options: options.clone(),
            font,
            counter_colour,
            card_width_mm,
        })
    }

    /// Compose one card. The base artwork is copied, never modified.
    pub fn compose(
        &self,
        base: &RgbaImage,
        symbol: &RgbImage,
        identifier: &str,
        counter: usize,
    ) -> RgbaImage {
        let mut card = base.clone();
        let (sym_w, sym_h) = symbol.dimensions();
        let (qr_x, qr_y) = self.symbol_origin(card.dimensions(), (sym_w, sym_h));

        let symbol = DynamicImage::ImageRgb8(symbol.clone()).to_rgba8();
        imageops::replace(&mut card, &symbol, qr_x, qr_y);

        let font = &self.font;
        let opts = &self.options;
        let symbol_bottom = qr_y + sym_h as i64;

        // Identifier: ink centred under the symbol, top of ink `gap` below it
        let ident = text_extent(font, opts.identifier_font_px, identifier);
        let ident_left = qr_x + (sym_w as i64 - ident.width) / 2;
        let ident_top = symbol_bottom + opts.identifier_gap_px as i64;
        draw_text(
            &mut card,
            font,
            opts.identifier_font_px,
            (ident_left - ident.left, ident_top - ident.top),
            IDENTIFIER_COLOUR,
            identifier,
        );

        let counter_text = counter.to_string();
        let count = text_extent(font, opts.counter_font_px, &counter_text);
        let (count_left, count_top) = match opts.counter {
            CounterPlacement::BelowSymbol { gap_px } => (
                qr_x + (sym_w as i64 - count.width) / 2,
                symbol_bottom + gap_px as i64,
            ),
            CounterPlacement::BottomEdge { offset_mm } => {
                let px_per_mm = card.width() as f32 / self.card_width_mm;
                let bottom = card.height() as f32 - offset_mm * px_per_mm;
                (
                    (card.width() as i64 - count.width) / 2,
                    bottom.round() as i64 - count.height,
                )
            }
        };
        draw_text(
            &mut card,
            font,
            opts.counter_font_px,
            (count_left - count.left, count_top - count.top),
            self.counter_colour,
            &counter_text,
        );

        card
    }

    /// Top-left pixel of the pasted symbol
    fn symbol_origin(&self, card: (u32, u32), symbol: (u32, u32)) -> (i64, i64) {
        let (dx, dy) = self.options.symbol_offset_px;
        match self.options.anchor {
            SymbolAnchor::TopLeft => (dx as i64, dy as i64),
            SymbolAnchor::Centered => (
                (card.0 as i64 - symbol.0 as i64) / 2 + dx as i64,
                (card.1 as i64 - symbol.1 as i64) / 2 + dy as i64,
            ),
        }
    }
}

// =============================================================================
// Text Rendering
// =============================================================================

/// Inked area of a string, relative to the origin `draw_text` is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct TextExtent {
    left: i64,
    top: i64,
    width: i64,
    height: i64,
}

fn text_extent(font: &Font<'static>, px: f32, text: &str) -> TextExtent {
    let scale = Scale::uniform(px);
    let ascent = font.v_metrics(scale).ascent;

    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for glyph in font.layout(text, scale, point(0.0, ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            bounds = Some(match bounds {
                None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                Some((x0, y0, x1, y1)) => (
                    x0.min(bb.min.x),
                    y0.min(bb.min.y),
                    x1.max(bb.max.x),
                    y1.max(bb.max.y),
                ),
            });
        }
    }

    match bounds {
        Some((x0, y0, x1, y1)) => TextExtent {
            left: x0 as i64,
            top: y0 as i64,
            width: (x1 - x0) as i64,
            height: (y1 - y0) as i64,
        },
        None => TextExtent::default(),
    }
}

/// Draw `text` with its ascent line at `origin.1`, blending glyph coverage
/// over whatever is already on the card.
fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'static>,
    px: f32,
    origin: (i64, i64),
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let ascent = font.v_metrics(scale).ascent;
    let start = point(origin.0 as f32, origin.1 as f32 + ascent);

    for glyph in font.layout(text, scale, start) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = bb.min.x as i64 + gx as i64;
            let y = bb.min.y as i64 + gy as i64;
            if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
                return;
            }
            let alpha = coverage * color.0[3] as f32 / 255.0;
            if alpha <= 0.0 {
                return;
            }
            let dst = img.get_pixel_mut(x as u32, y as u32);
            *dst = blend_over(*dst, color, alpha);
        });
    }
}

/// Straight-alpha "source over destination"
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>, src_alpha: f32) -> Rgba<u8> {
    let sa = src_alpha.clamp(0.0, 1.0);
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (src.0[i] as f32 * sa + dst.0[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}
