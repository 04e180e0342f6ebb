//! Sheet generation pipeline
//!
//! validate -> grid -> inputs -> produce -> render -> save. Everything that
//! can make the run fail outright is checked before any card is produced.

use crate::content::{
    CardItem, CardProducer, ImageFiles, PersonalizedArtwork, RasterTarget, StaticArtwork,
    load_artwork,
};
use crate::input::load_payloads;
use crate::layout::{GridPlan, compute_grid};
use crate::options::{CardContent, SheetOptions};
use crate::render::{render, render_cut_guide, save_document};
use crate::stats::SheetStatistics;
use crate::types::*;
use log::info;
use lopdf::Document;

/// Generate the sheet described by `options` and write it to
/// `options.output_file`
pub fn run(options: &SheetOptions) -> Result<SheetStatistics> {
    let (doc, stats) = build(options)?;
    save_document(doc, &options.output_file)?;
    Ok(stats)
}

/// Generate the sheet in memory
pub fn build(options: &SheetOptions) -> Result<(Document, SheetStatistics)> {
    options.validate()?;

    let plan = compute_grid(options.page_spec(), options.cell_spec());
    info!(
        "Calculated layout: {} columns x {} rows = {} total cards.",
        plan.columns, plan.rows, plan.cells_per_page
    );
    plan.ensure_fits()?;

    if let CardContent::CutGuide = options.content {
        let doc = render_cut_guide(&plan)?;
        return Ok((doc, SheetStatistics::new(&plan, plan.cells_per_page, 0)));
    }

    let target = RasterTarget::for_card(
        options.card_width_mm,
        options.card_height_mm,
        options.dpi,
        options.colour_mode,
    );
    let producer = producer_for(options, &plan, target)?;
    let items: Vec<CardItem> = producer.produce()?;
    info!("Produced {} cards", items.len());

    render(&items, &plan, options.mirror, &target)
}

/// Load the inputs for the configured content and wrap them in a producer
fn producer_for(
    options: &SheetOptions,
    plan: &GridPlan,
    target: RasterTarget,
) -> Result<Box<dyn CardProducer>> {
    Ok(match &options.content {
        CardContent::Static { artwork, copies } => {
            let artwork = load_artwork(artwork, "artwork")?;
            let copies = copies.unwrap_or(plan.cells_per_page);
            Box::new(StaticArtwork::new(artwork, copies, target))
        }
        CardContent::Personalized { artwork, payloads } => {
            let payloads = load_payloads(payloads)?;
            let base = load_artwork(artwork, "base artwork")?;
            Box::new(PersonalizedArtwork::new(
                base,
                payloads,
                &options.personalize,
                target,
                options.card_width_mm,
            )?)
        }
        CardContent::Images { files } => Box::new(ImageFiles::new(files.clone())),
        CardContent::CutGuide => {
            return Err(CardSheetError::Config(
                "Cut guides have no card content".to_string(),
            ));
        }
    })
}
