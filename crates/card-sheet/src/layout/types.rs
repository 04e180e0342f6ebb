//! Layout data types for card sheets
//!
//! These types carry the geometry between the grid computation and the PDF
//! renderer. All lengths share one unit; the pipeline uses millimetres and
//! converts to points only when drawing.

use crate::constants::mm_to_pt;

/// Physical page size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpec {
    pub width: f32,
    pub height: f32,
}

impl PageSpec {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One card slot plus the spacing between slots and the margin to the page edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSpec {
    pub width: f32,
    pub height: f32,
    /// Gap between adjacent cells, both axes
    pub spacing: f32,
    /// Minimum distance from every page edge
    pub margin: f32,
}

impl CellSpec {
    pub fn new(width: f32, height: f32, spacing: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            spacing,
            margin,
        }
    }

    /// Horizontal distance between the left edges of neighbouring cells
    pub fn pitch_x(&self) -> f32 {
        self.width + self.spacing
    }

    /// Vertical distance between the bottom edges of neighbouring cells
    pub fn pitch_y(&self) -> f32 {
        self.height + self.spacing
    }
}

/// Precomputed grid geometry for one page/cell combination.
///
/// Built by [`compute_grid`](super::compute_grid) and never mutated. A plan
/// with zero cells per page is degenerate: nothing fits on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPlan {
    pub page: PageSpec,
    pub cell: CellSpec,
    pub columns: usize,
    pub rows: usize,
    pub cells_per_page: usize,
    /// Width of the whole grid including internal gaps
    pub grid_width: f32,
    /// Height of the whole grid including internal gaps
    pub grid_height: f32,
    /// Bottom-left corner of the grid in page coordinates (y grows upward)
    pub origin_x: f32,
    pub origin_y: f32,
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular area
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Same rectangle with millimetre coordinates converted to points
    pub fn to_points(&self) -> Rect {
        Rect::new(
            mm_to_pt(self.x),
            mm_to_pt(self.y),
            mm_to_pt(self.width),
            mm_to_pt(self.height),
        )
    }
}

/// Where one card lands on the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Global sequence index of the card
    pub index: usize,
    /// Zero-based output page
    pub page: usize,
    /// Logical position before mirroring
    pub position: GridPosition,
    /// Grid slot actually occupied after mirroring (row 0 = top)
    pub slot: GridPosition,
    /// Cell bounds, bottom-left anchored
    pub rect: Rect,
}

impl Placement {
    pub fn x(&self) -> f32 {
        self.rect.x
    }

    pub fn y(&self) -> f32 {
        self.rect.y
    }
}
