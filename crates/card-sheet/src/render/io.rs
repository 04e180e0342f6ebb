//! Document output

use crate::types::{CardSheetError, Result};
use log::info;
use lopdf::Document;
use std::path::Path;

/// Serialize `doc` and write it to `path`
pub fn save_document(mut doc: Document, path: &Path) -> Result<()> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    std::fs::write(path, &bytes).map_err(|source| CardSheetError::Write {
        stage: "output",
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
