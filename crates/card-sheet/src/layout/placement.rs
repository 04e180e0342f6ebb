//! Card placement
//!
//! Maps a card's sequence index onto a page, a grid slot and page
//! coordinates.

use crate::types::Mirror;

use super::{GridPlan, GridPosition, Placement, Rect};

/// Place the card with global sequence number `index`.
///
/// Row 0 is the top row of the page, so the row is always inverted when
/// converting to y (page coordinates grow upward from the bottom edge). The
/// mirror flags apply before that inversion and only reverse the order along
/// their axis.
///
/// Total over every index. On a degenerate plan every card maps to page 0 at
/// the grid origin; callers reject such plans before placing anything.
pub fn placement_of(index: usize, plan: &GridPlan, mirror: Mirror) -> Placement {
    let cell_rect = |x: f32, y: f32| Rect::new(x, y, plan.cell.width, plan.cell.height);

    if plan.is_degenerate() {
        let origin = GridPosition::new(0, 0);
        return Placement {
            index,
            page: 0,
            position: origin,
            slot: origin,
            rect: cell_rect(plan.origin_x, plan.origin_y),
        };
    }

    let page = index / plan.cells_per_page;
    let local = index % plan.cells_per_page;
    let position = GridPosition::new(local / plan.columns, local % plan.columns);
    let slot = mirrored_slot(position, plan, mirror);

    let effective_row = plan.rows - 1 - slot.row;
    let x = plan.origin_x + slot.col as f32 * plan.cell.pitch_x();
    let y = plan.origin_y + effective_row as f32 * plan.cell.pitch_y();

    Placement {
        index,
        page,
        position,
        slot,
        rect: cell_rect(x, y),
    }
}

/// Apply the mirror flags to a logical grid position.
fn mirrored_slot(pos: GridPosition, plan: &GridPlan, mirror: Mirror) -> GridPosition {
    let row = if mirror.rows {
        plan.rows - 1 - pos.row
    } else {
        pos.row
    };
    let col = if mirror.columns {
        plan.columns - 1 - pos.col
    } else {
        pos.col
    };
    GridPosition::new(row, col)
}

/// Placements for `count` cards, in sequence order.
pub fn placements(count: usize, plan: &GridPlan, mirror: Mirror) -> Vec<Placement> {
    (0..count).map(|i| placement_of(i, plan, mirror)).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{CellSpec, PageSpec, compute_grid};

    fn quad_plan() -> GridPlan {
        // 2x2 grid of 40x40 cells with 10 spacing on a 100x100 page
        compute_grid(
            PageSpec::new(100.0, 100.0),
            CellSpec::new(40.0, 40.0, 10.0, 0.0),
        )
    }

    #[test]
    fn test_first_card_is_top_left() {
        let plan = quad_plan();
        assert_eq!((plan.columns, plan.rows), (2, 2));

        let p = placement_of(0, &plan, Mirror::NONE);
        assert_eq!(p.page, 0);
        assert_eq!(p.position, GridPosition::new(0, 0));
        assert_eq!(p.x(), 5.0);
        assert_eq!(p.y(), 55.0);
    }

    #[test]
    fn test_row_major_order() {
        let plan = quad_plan();

        let p = placement_of(1, &plan, Mirror::NONE);
        assert_eq!((p.x(), p.y()), (55.0, 55.0));

        let p = placement_of(2, &plan, Mirror::NONE);
        assert_eq!((p.x(), p.y()), (5.0, 5.0));

        let p = placement_of(3, &plan, Mirror::NONE);
        assert_eq!((p.x(), p.y()), (55.0, 5.0));
    }

    #[test]
    fn test_second_page_restarts_grid() {
        let plan = quad_plan();

        let p = placement_of(5, &plan, Mirror::NONE);
        assert_eq!(p.page, 1);
        assert_eq!(p.position, GridPosition::new(0, 1));
        assert_eq!((p.x(), p.y()), (55.0, 55.0));
    }

    #[test]
    fn test_mirror_columns() {
        let plan = quad_plan();

        let p = placement_of(0, &plan, Mirror::COLUMNS);
        assert_eq!(p.slot, GridPosition::new(0, 1));
        assert_eq!((p.x(), p.y()), (55.0, 55.0));

        let p = placement_of(3, &plan, Mirror::COLUMNS);
        assert_eq!((p.x(), p.y()), (5.0, 5.0));
    }

    #[test]
    fn test_mirror_rows() {
        let plan = quad_plan();
        let mirror = Mirror {
            rows: true,
            columns: false,
        };

        let p = placement_of(0, &plan, mirror);
        assert_eq!(p.slot, GridPosition::new(1, 0));
        assert_eq!((p.x(), p.y()), (5.0, 5.0));
    }

    #[test]
    fn test_degenerate_plan_is_total() {
        let plan = compute_grid(
            PageSpec::new(100.0, 100.0),
            CellSpec::new(200.0, 50.0, 0.0, 0.0),
        );

        let p = placement_of(7, &plan, Mirror::COLUMNS);
        assert_eq!(p.page, 0);
        assert_eq!(p.index, 7);
    }
}
