//! Shared constants for card sheet generation
//!
//! This module centralizes unit conversions and the defaults every pipeline
//! variant starts from.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

/// Convert a physical length to a pixel count at the given resolution
#[inline]
pub fn mm_to_px(mm: f32, dpi: u32) -> f32 {
    mm / MM_PER_INCH * dpi as f32
}

// =============================================================================
// Grid Fitting
// =============================================================================

/// Slack added before flooring the fit count, so that a card pitch which
/// divides the usable length exactly is not lost to float rounding.
pub const FIT_EPSILON: f32 = 1e-4;

// =============================================================================
// Card Defaults
// =============================================================================

/// Default card width (mm)
pub const DEFAULT_CARD_WIDTH_MM: f32 = 46.0;

/// Default card height (mm)
pub const DEFAULT_CARD_HEIGHT_MM: f32 = 56.0;

/// Default output resolution for card rasters
pub const DEFAULT_DPI: u32 = 300;

// =============================================================================
// Personalization Defaults
// =============================================================================

/// Default QR symbol edge length (pixels)
pub const DEFAULT_SYMBOL_SIZE_PX: u32 = 294;

/// Quiet zone around the QR symbol (modules)
pub const QUIET_ZONE_MODULES: u32 = 4;

/// Pixels per module before the symbol is resized to its final size
pub const MODULE_BOX_PX: u32 = 10;

/// Number of trailing alphanumerics kept in the printed identifier
pub const IDENTIFIER_LEN: usize = 6;

/// Default identifier font size (pixels)
pub const DEFAULT_IDENTIFIER_FONT_PX: f32 = 20.0;

/// Default counter font size (pixels)
pub const DEFAULT_COUNTER_FONT_PX: f32 = 20.0;

/// Font used for identifier and counter when none is configured
pub const DEFAULT_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Default counter colour
pub const DEFAULT_COUNTER_COLOUR: &str = "#ccc8e4";

// =============================================================================
// Outlines
// =============================================================================

/// Line width for placeholder boxes (points)
pub const PLACEHOLDER_LINE_WIDTH: f32 = 1.0;

/// Line width for cut guide rectangles (points)
pub const CUT_GUIDE_LINE_WIDTH: f32 = 0.5;
