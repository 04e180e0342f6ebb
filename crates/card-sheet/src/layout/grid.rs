//! Grid fitting
//!
//! Packs as many whole cells as fit inside the page margins, then centres the
//! resulting grid on the page.

use crate::constants::FIT_EPSILON;
use crate::types::{CardSheetError, Result};

use super::{CellSpec, GridPlan, PageSpec};

// =============================================================================
// Grid Creation
// =============================================================================

/// Compute the grid plan for a page/cell combination.
///
/// The fit count along each axis is `floor((usable + spacing) / (size + spacing))`:
/// N cells need only N-1 internal gaps. The margin limits how many cells fit
/// but the grid itself is always centred on the page.
///
/// Never fails. When nothing fits the plan reports zero columns or rows; use
/// [`GridPlan::ensure_fits`] to turn that into an error.
pub fn compute_grid(page: PageSpec, cell: CellSpec) -> GridPlan {
    let usable_width = page.width - 2.0 * cell.margin;
    let usable_height = page.height - 2.0 * cell.margin;

    let columns = fit_count(usable_width, cell.width, cell.spacing);
    let rows = fit_count(usable_height, cell.height, cell.spacing);
    let cells_per_page = columns * rows;

    let grid_width = span(columns, cell.width, cell.spacing);
    let grid_height = span(rows, cell.height, cell.spacing);

    GridPlan {
        page,
        cell,
        columns,
        rows,
        cells_per_page,
        grid_width,
        grid_height,
        origin_x: page.width / 2.0 - grid_width / 2.0,
        origin_y: page.height / 2.0 - grid_height / 2.0,
    }
}

/// Number of `size` items separated by `spacing` that fit in `usable`.
fn fit_count(usable: f32, size: f32, spacing: f32) -> usize {
    let pitch = size + spacing;
    if !usable.is_finite() || !pitch.is_finite() || size <= 0.0 || pitch <= 0.0 {
        return 0;
    }

    let count = ((usable + spacing) / pitch + FIT_EPSILON).floor();
    if count < 1.0 { 0 } else { count as usize }
}

/// Extent of `count` items with gaps between them; zero for an empty axis.
fn span(count: usize, size: f32, spacing: f32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    count as f32 * size + (count - 1) as f32 * spacing
}

// =============================================================================
// Plan Queries
// =============================================================================

impl GridPlan {
    /// True when not a single cell fits on the page
    pub fn is_degenerate(&self) -> bool {
        self.cells_per_page == 0
    }

    /// Reject a plan that cannot hold any card.
    pub fn ensure_fits(&self) -> Result<()> {
        if self.is_degenerate() {
            return Err(CardSheetError::DegenerateLayout {
                page_width_mm: self.page.width,
                page_height_mm: self.page.height,
                cell_width_mm: self.cell.width,
                cell_height_mm: self.cell.height,
                spacing_mm: self.cell.spacing,
                margin_mm: self.cell.margin,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }

    /// Pages needed for `items` cards (`ceil(items / cells_per_page)`)
    pub fn pages_needed(&self, items: usize) -> usize {
        if self.is_degenerate() {
            return 0;
        }
        items.div_ceil(self.cells_per_page)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const A4: PageSpec = PageSpec {
        width: 210.0,
        height: 297.0,
    };

    #[test]
    fn test_minting_card_grid() {
        let plan = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 0.0));

        assert_eq!(plan.columns, 4);
        assert_eq!(plan.rows, 5);
        assert_eq!(plan.cells_per_page, 20);
        assert_eq!(plan.grid_width, 184.0);
        assert_eq!(plan.grid_height, 280.0);
        assert_eq!(plan.origin_x, 13.0);
        assert_eq!(plan.origin_y, 8.5);
    }

    #[test]
    fn test_cut_guide_grid() {
        // 40x50 with 6mm gaps inside a 10mm margin
        let plan = compute_grid(A4, CellSpec::new(40.0, 50.0, 6.0, 10.0));

        assert_eq!(plan.columns, 4);
        assert_eq!(plan.rows, 5);
        assert_eq!(plan.grid_width, 4.0 * 40.0 + 3.0 * 6.0);
        assert_eq!(plan.grid_height, 5.0 * 50.0 + 4.0 * 6.0);
    }

    #[test]
    fn test_exact_division_is_not_lost() {
        let plan = compute_grid(A4, CellSpec::new(42.0, 29.7, 0.0, 0.0));

        assert_eq!(plan.columns, 5);
        assert_eq!(plan.rows, 10);
    }

    #[test]
    fn test_cell_wider_than_page() {
        let plan = compute_grid(
            PageSpec::new(100.0, 100.0),
            CellSpec::new(200.0, 50.0, 0.0, 0.0),
        );

        assert_eq!(plan.columns, 0);
        assert_eq!(plan.rows, 2);
        assert_eq!(plan.cells_per_page, 0);
        assert_eq!(plan.grid_width, 0.0);
        assert!(plan.is_degenerate());
        assert!(matches!(
            plan.ensure_fits(),
            Err(CardSheetError::DegenerateLayout { columns: 0, .. })
        ));
    }

    #[test]
    fn test_margin_swallows_page() {
        let plan = compute_grid(A4, CellSpec::new(10.0, 10.0, 0.0, 120.0));

        assert_eq!(plan.columns, 0);
        assert_eq!(plan.rows, 5);
        assert!(plan.is_degenerate());
        assert_eq!(plan.pages_needed(5), 0);
    }

    #[test]
    fn test_non_positive_cell() {
        let plan = compute_grid(A4, CellSpec::new(0.0, 56.0, 0.0, 0.0));
        assert_eq!(plan.columns, 0);

        let plan = compute_grid(A4, CellSpec::new(f32::NAN, 56.0, 0.0, 0.0));
        assert_eq!(plan.columns, 0);
    }

    #[test]
    fn test_pages_needed() {
        let plan = compute_grid(A4, CellSpec::new(46.0, 56.0, 0.0, 0.0));

        assert_eq!(plan.pages_needed(0), 0);
        assert_eq!(plan.pages_needed(1), 1);
        assert_eq!(plan.pages_needed(20), 1);
        assert_eq!(plan.pages_needed(21), 2);
        assert_eq!(plan.pages_needed(60), 3);
    }
}
