//! Layout calculation modules for card sheets
//!
//! This module handles all the geometric calculations for a sheet:
//! - Grid fitting (how many whole cards fit, and where the grid sits)
//! - Card placement (index to page, slot and coordinates, with mirroring)

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;
