use crate::input::load_payloads;
use crate::layout::{GridPlan, compute_grid};
use crate::options::{CardContent, SheetOptions};
use crate::types::*;
use std::fmt;

/// Layout summary for one sheet run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetStatistics {
    pub columns: usize,
    pub rows: usize,
    pub cells_per_page: usize,
    pub cards: usize,
    pub pages: usize,
    /// Slots drawn as outlines because their content failed
    pub placeholders: usize,
}

impl SheetStatistics {
    pub fn new(plan: &GridPlan, cards: usize, placeholders: usize) -> Self {
        Self {
            columns: plan.columns,
            rows: plan.rows,
            cells_per_page: plan.cells_per_page,
            cards,
            pages: plan.pages_needed(cards),
            placeholders,
        }
    }
}

impl fmt::Display for SheetStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} columns x {} rows = {} cards per page; {} cards on {} pages",
            self.columns, self.rows, self.cells_per_page, self.cards, self.pages
        )?;
        if self.placeholders > 0 {
            write!(f, " ({} placeholders)", self.placeholders)?;
        }
        Ok(())
    }
}

/// Calculate the layout a run would produce, without rendering anything
pub fn calculate_statistics(options: &SheetOptions) -> Result<SheetStatistics> {
    options.validate()?;
    let plan = compute_grid(options.page_spec(), options.cell_spec());
    plan.ensure_fits()?;

    let cards = card_count(&options.content, &plan)?;
    Ok(SheetStatistics::new(&plan, cards, 0))
}

/// Number of cards the configured content will produce
pub(crate) fn card_count(content: &CardContent, plan: &GridPlan) -> Result<usize> {
    Ok(match content {
        CardContent::Static { copies, .. } => copies.unwrap_or(plan.cells_per_page),
        CardContent::Personalized { payloads, .. } => load_payloads(payloads)?.len(),
        CardContent::Images { files } => files.len(),
        CardContent::CutGuide => plan.cells_per_page,
    })
}
