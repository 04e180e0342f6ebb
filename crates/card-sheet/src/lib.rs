pub mod constants;
pub mod content;
mod input;
pub mod layout;
mod options;
pub mod pipeline;
pub mod render;
mod stats;
mod types;

pub use input::{load_payloads, parse_payloads};
pub use options::*;
pub use pipeline::{build, run};
pub use stats::{SheetStatistics, calculate_statistics};
pub use types::*;
