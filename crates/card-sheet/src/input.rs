use crate::types::{CardSheetError, Result};
use log::info;
use std::path::Path;

/// Read the payload list, one payload per line
pub fn load_payloads(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(CardSheetError::MissingFile {
            stage: "payload list",
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    let payloads = parse_payloads(&text);
    info!("Read {} payloads from {}", payloads.len(), path.display());
    Ok(payloads)
}

/// Trim every line and drop the blank ones
pub fn parse_payloads(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
