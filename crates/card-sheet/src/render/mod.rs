//! PDF rendering for card sheets
//!
//! This module handles all PDF-specific operations:
//! - Embedding card rasters as image XObjects
//! - Building paginated output pages from grid placements
//! - Outlining placeholders and cut guides
//! - Writing the finished document

mod io;
mod sheet;
mod xobject;

pub use io::save_document;
pub use sheet::*;
pub use xobject::create_image_xobject;
