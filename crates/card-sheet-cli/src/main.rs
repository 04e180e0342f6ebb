use anyhow::Result;
use card_sheet::{
    CardContent, ColourMode, CounterPlacement, ErrorCorrection, Mirror, Orientation, PaperSize,
    SheetOptions, SymbolAnchor,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cardsheet", about = "Print-ready card sheet generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tile one artwork over a page, e.g. the backs of a card run
    Back {
        /// Card artwork
        #[arg(short, long)]
        artwork: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of copies (default: one full page)
        #[arg(long)]
        copies: Option<usize>,

        /// Keep column order instead of mirroring it for double-sided print
        #[arg(long)]
        no_mirror: bool,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Personalize artwork with a QR code per payload and lay out the cards
    Mint {
        /// Base artwork (PNG with alpha)
        #[arg(short, long)]
        artwork: PathBuf,

        /// Payload list, one per line
        #[arg(short, long)]
        payloads: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        personalize: PersonalizeArgs,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Lay out finished card images, one card per file
    Layout {
        /// Card images
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// One page of outlined card slots for cutting
    CutGuide {
        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Run a saved JSON configuration
    Run {
        /// Configuration file written by --save-config
        #[arg(short, long)]
        config: PathBuf,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },
}

/// Grid and output settings shared by every layout command.
/// Unset values keep the command's defaults.
#[derive(Args)]
struct LayoutArgs {
    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Card width in mm
    #[arg(long)]
    card_width: Option<f32>,

    /// Card height in mm
    #[arg(long)]
    card_height: Option<f32>,

    /// Gap between cards in mm
    #[arg(long)]
    spacing: Option<f32>,

    /// Minimum distance from the page edge in mm
    #[arg(long)]
    margin: Option<f32>,

    /// Reverse column order
    #[arg(long)]
    mirror_columns: bool,

    /// Reverse row order
    #[arg(long)]
    mirror_rows: bool,

    /// Colour model of the embedded card images
    #[arg(long, value_enum)]
    colour: Option<ColourArg>,

    /// Resolution of the embedded card images
    #[arg(long)]
    dpi: Option<u32>,
}

#[derive(Args)]
struct PersonalizeArgs {
    /// QR error correction level
    #[arg(long, default_value = "low", value_enum)]
    ec: EcArg,

    /// QR symbol edge length in pixels
    #[arg(long)]
    symbol_size: Option<u32>,

    /// Where the QR symbol is anchored
    #[arg(long, default_value = "top-left", value_enum)]
    anchor: AnchorArg,

    /// Symbol offset in pixels from the anchor (x)
    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<i32>,

    /// Symbol offset in pixels from the anchor (y)
    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<i32>,

    /// TrueType/OpenType font for the identifier and counter (default: bundled DejaVu Sans)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Identifier font size in pixels
    #[arg(long)]
    identifier_size: Option<f32>,

    /// Counter font size in pixels
    #[arg(long)]
    counter_size: Option<f32>,

    /// Draw the counter this many pixels below the symbol instead of at the card's bottom edge
    #[arg(long)]
    counter_below: Option<u32>,

    /// Counter distance from the card's bottom edge in mm
    #[arg(long)]
    counter_offset: Option<f32>,

    /// Counter colour (#rrggbb)
    #[arg(long)]
    counter_colour: Option<String>,

    /// Stage QR symbols in this directory before composing
    #[arg(long)]
    staging_dir: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    /// Show statistics only, don't generate PDF
    #[arg(long)]
    stats_only: bool,

    /// Write the effective configuration to this JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColourArg {
    Native,
    Cmyk,
}

#[derive(Clone, Copy, ValueEnum)]
enum EcArg {
    Low,
    Medium,
    Quartile,
    High,
}

#[derive(Clone, Copy, ValueEnum)]
enum AnchorArg {
    TopLeft,
    Centered,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<ColourArg> for ColourMode {
    fn from(arg: ColourArg) -> Self {
        match arg {
            ColourArg::Native => Self::Native,
            ColourArg::Cmyk => Self::Cmyk,
        }
    }
}

impl From<EcArg> for ErrorCorrection {
    fn from(arg: EcArg) -> Self {
        match arg {
            EcArg::Low => Self::Low,
            EcArg::Medium => Self::Medium,
            EcArg::Quartile => Self::Quartile,
            EcArg::High => Self::High,
        }
    }
}

impl From<AnchorArg> for SymbolAnchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::TopLeft => Self::TopLeft,
            AnchorArg::Centered => Self::Centered,
        }
    }
}

impl LayoutArgs {
    fn apply(self, options: &mut SheetOptions) {
        if let Some(paper) = self.paper {
            options.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.orientation = orientation.into();
        }
        if let Some(width) = self.card_width {
            options.card_width_mm = width;
        }
        if let Some(height) = self.card_height {
            options.card_height_mm = height;
        }
        if let Some(spacing) = self.spacing {
            options.spacing_mm = spacing;
        }
        if let Some(margin) = self.margin {
            options.margin_mm = margin;
        }
        options.mirror.columns |= self.mirror_columns;
        options.mirror.rows |= self.mirror_rows;
        if let Some(colour) = self.colour {
            options.colour_mode = colour.into();
        }
        if let Some(dpi) = self.dpi {
            options.dpi = dpi;
        }
    }
}

impl PersonalizeArgs {
    fn apply(self, options: &mut SheetOptions) {
        let p = &mut options.personalize;
        p.error_correction = self.ec.into();
        p.anchor = self.anchor.into();
        if let Some(size) = self.symbol_size {
            p.symbol_size_px = size;
        }
        if let Some(x) = self.offset_x {
            p.symbol_offset_px.0 = x;
        }
        if let Some(y) = self.offset_y {
            p.symbol_offset_px.1 = y;
        }
        if let Some(size) = self.identifier_size {
            p.identifier_font_px = size;
        }
        if let Some(size) = self.counter_size {
            p.counter_font_px = size;
        }
        if let Some(gap_px) = self.counter_below {
            p.counter = CounterPlacement::BelowSymbol { gap_px };
        } else if let Some(offset_mm) = self.counter_offset {
            p.counter = CounterPlacement::BottomEdge { offset_mm };
        }
        if let Some(colour) = self.counter_colour {
            p.counter_colour = colour;
        }
        p.font = self.font;
        p.staging_dir = self.staging_dir;
    }
}

/// Cut guides default to 40x50mm slots with 6mm gaps inside a 10mm margin
fn cut_guide_defaults() -> SheetOptions {
    SheetOptions {
        content: CardContent::CutGuide,
        card_width_mm: 40.0,
        card_height_mm: 50.0,
        spacing_mm: 6.0,
        margin_mm: 10.0,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Back {
            artwork,
            output,
            copies,
            no_mirror,
            layout,
            run,
        } => {
            let mut options = SheetOptions {
                content: CardContent::Static { artwork, copies },
                output_file: output,
                mirror: if no_mirror { Mirror::NONE } else { Mirror::COLUMNS },
                ..Default::default()
            };
            layout.apply(&mut options);
            execute(&options, run)
        }

        Commands::Mint {
            artwork,
            payloads,
            output,
            personalize,
            layout,
            run,
        } => {
            let mut options = SheetOptions {
                content: CardContent::Personalized { artwork, payloads },
                output_file: output,
                ..Default::default()
            };
            personalize.apply(&mut options);
            layout.apply(&mut options);
            execute(&options, run)
        }

        Commands::Layout {
            input,
            output,
            layout,
            run,
        } => {
            let mut options = SheetOptions {
                content: CardContent::Images { files: input },
                output_file: output,
                ..Default::default()
            };
            layout.apply(&mut options);
            execute(&options, run)
        }

        Commands::CutGuide {
            output,
            layout,
            run,
        } => {
            let mut options = SheetOptions {
                output_file: output,
                ..cut_guide_defaults()
            };
            layout.apply(&mut options);
            execute(&options, run)
        }

        Commands::Run { config, stats_only } => {
            let options = SheetOptions::load(&config)?;
            info!("Loaded configuration from {}", config.display());
            execute(
                &options,
                RunArgs {
                    stats_only,
                    save_config: None,
                },
            )
        }
    }
}

fn execute(options: &SheetOptions, run: RunArgs) -> Result<()> {
    if let Some(path) = &run.save_config {
        options.save(path)?;
        println!("Saved configuration → {}", path.display());
    }

    if run.stats_only {
        let stats = card_sheet::calculate_statistics(options)?;
        println!("Layout Statistics:");
        println!("  Grid: {} columns x {} rows", stats.columns, stats.rows);
        println!("  Cards per page: {}", stats.cells_per_page);
        println!("  Cards: {}", stats.cards);
        println!("  Pages: {}", stats.pages);
        return Ok(());
    }

    let stats = card_sheet::run(options)?;
    println!("{}", stats);
    println!("Generated {} cards → {}", stats.cards, options.output_file.display());
    Ok(())
}
