use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardSheetError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("{stage}: required file '{}' was not found", .path.display())]
    MissingFile { stage: &'static str, path: PathBuf },
    #[error("{stage}: image '{}' could not be processed: {source}", .path.display())]
    Asset {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{stage}: failed to write '{}': {source}", .path.display())]
    Write {
        stage: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error(
        "Nothing fits: a {cell_width_mm}x{cell_height_mm}mm card on a {page_width_mm}x{page_height_mm}mm page \
         (margin {margin_mm}mm, spacing {spacing_mm}mm) gives {columns} columns x {rows} rows"
    )]
    DegenerateLayout {
        page_width_mm: f32,
        page_height_mm: f32,
        cell_width_mm: f32,
        cell_height_mm: f32,
        spacing_mm: f32,
        margin_mm: f32,
        columns: usize,
        rows: usize,
    },
    #[error("QR encode error: {0}")]
    Symbol(#[from] qrcode::types::QrError),
    #[error("Font error: {0}")]
    Font(String),
    #[error("No cards to render")]
    NoCards,
}

pub type Result<T> = std::result::Result<T, CardSheetError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Colour model of the finished card rasters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColourMode {
    /// Keep the artwork's own RGB(A) pixels
    #[default]
    Native,
    /// Flatten onto white and convert to CMYK for commercial print
    Cmyk,
}

/// QR error-correction tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCorrection {
    /// ~7% recovery
    #[default]
    Low,
    /// ~15% recovery
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
    High,
}

impl ErrorCorrection {
    pub fn ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

/// Axis reversal applied when mapping an index to a grid slot.
///
/// Mirroring columns lines a back sheet up with its front sheet when the
/// back is flipped along its vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mirror {
    pub rows: bool,
    pub columns: bool,
}

impl Mirror {
    pub const NONE: Mirror = Mirror {
        rows: false,
        columns: false,
    };

    pub const COLUMNS: Mirror = Mirror {
        rows: false,
        columns: true,
    };
}
