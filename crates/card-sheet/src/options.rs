use crate::constants::*;
use crate::layout::{CellSpec, PageSpec};
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What goes into the grid slots
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CardContent {
    /// One artwork repeated, e.g. the back of every card.
    /// `copies` defaults to exactly one full page.
    Static {
        artwork: PathBuf,
        copies: Option<usize>,
    },
    /// Base artwork personalized with a QR symbol, identifier and counter,
    /// one card per line of the payload list
    Personalized { artwork: PathBuf, payloads: PathBuf },
    /// Already finished card images, one card per file
    Images { files: Vec<PathBuf> },
    /// Outlined rectangles only, one full page
    CutGuide,
}

/// Where the QR symbol is pasted on the base artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SymbolAnchor {
    /// `symbol_offset_px` is the symbol's top-left corner
    #[default]
    TopLeft,
    /// Symbol centred on the card, then shifted by `symbol_offset_px`
    Centered,
}

/// Where the sequence counter is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CounterPlacement {
    /// Centred under the symbol, `gap_px` below its bottom edge
    BelowSymbol { gap_px: u32 },
    /// Centred across the card, `offset_mm` above the bottom edge
    BottomEdge { offset_mm: f32 },
}

impl Default for CounterPlacement {
    fn default() -> Self {
        CounterPlacement::BottomEdge { offset_mm: 5.0 }
    }
}

/// Personalization settings (pixel values refer to the base artwork)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PersonalizeOptions {
    pub anchor: SymbolAnchor,
    pub symbol_offset_px: (i32, i32),
    pub symbol_size_px: u32,
    pub error_correction: ErrorCorrection,
    pub identifier_font_px: f32,
    /// Gap between the symbol's bottom edge and the identifier
    pub identifier_gap_px: u32,
    pub counter_font_px: f32,
    pub counter: CounterPlacement,
    /// `#rrggbb`
    pub counter_colour: String,
    /// TrueType/OpenType font for identifier and counter; the bundled
    /// DejaVu Sans when unset
    pub font: Option<PathBuf>,
    /// Write symbols to this directory and read them back before composing
    pub staging_dir: Option<PathBuf>,
}

impl Default for PersonalizeOptions {
    fn default() -> Self {
        Self {
            anchor: SymbolAnchor::TopLeft,
            symbol_offset_px: (10, 10),
            symbol_size_px: DEFAULT_SYMBOL_SIZE_PX,
            error_correction: ErrorCorrection::Low,
            identifier_font_px: DEFAULT_IDENTIFIER_FONT_PX,
            identifier_gap_px: 45,
            counter_font_px: DEFAULT_COUNTER_FONT_PX,
            counter: CounterPlacement::default(),
            counter_colour: DEFAULT_COUNTER_COLOUR.to_string(),
            font: None,
            staging_dir: None,
        }
    }
}

/// Complete configuration for one sheet run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetOptions {
    // Input
    pub content: CardContent,

    // Output
    pub output_file: PathBuf,
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Grid
    pub card_width_mm: f32,
    pub card_height_mm: f32,
    pub spacing_mm: f32,
    pub margin_mm: f32,
    pub mirror: Mirror,

    // Raster output
    pub colour_mode: ColourMode,
    pub dpi: u32,

    // Personalization
    pub personalize: PersonalizeOptions,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            content: CardContent::CutGuide,
            output_file: PathBuf::from("cards.pdf"),
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            card_width_mm: DEFAULT_CARD_WIDTH_MM,
            card_height_mm: DEFAULT_CARD_HEIGHT_MM,
            spacing_mm: 0.0,
            margin_mm: 0.0,
            mirror: Mirror::NONE,
            colour_mode: ColourMode::Native,
            dpi: DEFAULT_DPI,
            personalize: PersonalizeOptions::default(),
        }
    }
}

impl SheetOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CardSheetError::MissingFile {
                stage: "config",
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| CardSheetError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CardSheetError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Page dimensions with orientation applied (mm)
    pub fn page_spec(&self) -> PageSpec {
        let (w, h) = self.paper_size.dimensions_with_orientation(self.orientation);
        PageSpec::new(w, h)
    }

    /// Card slot geometry (mm)
    pub fn cell_spec(&self) -> CellSpec {
        CellSpec::new(
            self.card_width_mm,
            self.card_height_mm,
            self.spacing_mm,
            self.margin_mm,
        )
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (page_w, page_h) = self.paper_size.dimensions_mm();
        if !(positive(page_w) && positive(page_h)) {
            return Err(CardSheetError::Config(format!(
                "Page size must be positive, got {}x{}mm",
                page_w, page_h
            )));
        }

        if !(positive(self.card_width_mm) && positive(self.card_height_mm)) {
            return Err(CardSheetError::Config(format!(
                "Card size must be positive, got {}x{}mm",
                self.card_width_mm, self.card_height_mm
            )));
        }

        if !(non_negative(self.spacing_mm) && non_negative(self.margin_mm)) {
            return Err(CardSheetError::Config(format!(
                "Spacing and margin must not be negative, got {}mm and {}mm",
                self.spacing_mm, self.margin_mm
            )));
        }

        if self.dpi == 0 {
            return Err(CardSheetError::Config("DPI must be at least 1".to_string()));
        }

        match &self.content {
            CardContent::Static {
                copies: Some(0), ..
            } => {
                return Err(CardSheetError::Config(
                    "Static artwork needs at least one copy".to_string(),
                ));
            }
            CardContent::Images { files } if files.is_empty() => {
                return Err(CardSheetError::Config("No input images specified".to_string()));
            }
            CardContent::Personalized { .. } => self.validate_personalize()?,
            _ => {}
        }

        Ok(())
    }

    fn validate_personalize(&self) -> Result<()> {
        let p = &self.personalize;
        if p.symbol_size_px == 0 {
            return Err(CardSheetError::Config(
                "Symbol size must be at least 1 pixel".to_string(),
            ));
        }
        if !(positive(p.identifier_font_px) && positive(p.counter_font_px)) {
            return Err(CardSheetError::Config(
                "Font sizes must be positive".to_string(),
            ));
        }
        if let CounterPlacement::BottomEdge { offset_mm } = p.counter {
            if !non_negative(offset_mm) {
                return Err(CardSheetError::Config(
                    "Counter offset must not be negative".to_string(),
                ));
            }
        }
        crate::content::parse_hex_colour(&p.counter_colour)?;
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}
