//! On-disk staging of encoded symbols
//!
//! Large batches can write every symbol to a directory first and read them
//! back before composition. File names carry the sequence tag and the
//! identifier (`QR_<seq>_<identifier>.png`); read-back order comes from the
//! parsed tag, never from directory listing order.

use super::Symbol;
use crate::types::{CardSheetError, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

const STAGED_PREFIX: &str = "QR_";
const STAGED_EXTENSION: &str = ".png";

/// A staged symbol found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub sequence: usize,
    pub identifier: String,
    pub path: PathBuf,
}

pub fn staged_file_name(sequence: usize, identifier: &str) -> String {
    format!("{STAGED_PREFIX}{sequence}_{identifier}{STAGED_EXTENSION}")
}

/// Recover `(sequence, identifier)` from a staged file name
pub fn parse_staged_name(name: &str) -> Option<(usize, String)> {
    let stem = name
        .strip_prefix(STAGED_PREFIX)?
        .strip_suffix(STAGED_EXTENSION)?;
    let (sequence, identifier) = stem.split_once('_')?;
    let sequence = sequence.parse().ok()?;
    Some((sequence, identifier.to_string()))
}

/// Write one symbol into `dir`, returning the file written
pub fn stage_symbol(dir: &Path, symbol: &Symbol) -> Result<PathBuf> {
    let path = dir.join(staged_file_name(symbol.sequence, &symbol.identifier));
    symbol
        .image
        .save(&path)
        .map_err(|source| CardSheetError::Asset {
            stage: "staging",
            path: path.clone(),
            source,
        })?;
    debug!("Staged symbol {} -> {}", symbol.sequence, path.display());
    Ok(path)
}

/// List staged symbols in `dir`, sorted by sequence tag.
///
/// Files that do not follow the staging name pattern are skipped.
pub fn read_staged(dir: &Path) -> Result<Vec<StagedFile>> {
    let mut staged = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match parse_staged_name(name) {
            Some((sequence, identifier)) => staged.push(StagedFile {
                sequence,
                identifier,
                path,
            }),
            None => warn!("Ignoring untagged file in staging directory: {}", name),
        }
    }

    staged.sort_by_key(|f| f.sequence);
    Ok(staged)
}

/// Decode a staged symbol back into a `Symbol`
pub fn load_staged(file: &StagedFile) -> Result<Symbol> {
    let image = image::open(&file.path)
        .map_err(|source| CardSheetError::Asset {
            stage: "staging",
            path: file.path.clone(),
            source,
        })?
        .to_rgb8();
    Ok(Symbol {
        sequence: file.sequence,
        identifier: file.identifier.clone(),
        image,
    })
}

/// Best-effort cleanup of staged files
pub fn remove_staged(files: &[StagedFile]) {
    remove_staged_paths(files.iter().map(|f| f.path.as_path()));
}

/// Best-effort cleanup by path, for files that were written but never listed
pub fn remove_staged_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("Could not remove staged file {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn symbol(sequence: usize, identifier: &str) -> Symbol {
        Symbol {
            sequence,
            identifier: identifier.to_string(),
            image: RgbImage::from_pixel(8, 8, Rgb([sequence as u8, 0, 0])),
        }
    }

    #[test]
    fn test_name_round_trip() {
        assert_eq!(staged_file_name(12, "abc123"), "QR_12_abc123.png");
        assert_eq!(
            parse_staged_name("QR_12_abc123.png"),
            Some((12, "abc123".to_string()))
        );
        assert_eq!(parse_staged_name("QR_3_.png"), Some((3, String::new())));
    }

    #[test]
    fn test_rejects_foreign_names() {
        assert_eq!(parse_staged_name("notes.txt"), None);
        assert_eq!(parse_staged_name("QR_x_abc.png"), None);
        assert_eq!(parse_staged_name("QR_4_abc.jpg"), None);
    }

    #[test]
    fn test_read_back_sorted_by_tag() {
        let dir = tempfile::tempdir().unwrap();
        for (seq, id) in [(3, "ccc"), (1, "aaa"), (10, "jjj"), (2, "bbb")] {
            stage_symbol(dir.path(), &symbol(seq, id)).unwrap();
        }
        fs::write(dir.path().join("README"), "stray").unwrap();

        let staged = read_staged(dir.path()).unwrap();
        let order: Vec<usize> = staged.iter().map(|f| f.sequence).collect();
        assert_eq!(order, vec![1, 2, 3, 10]);

        let loaded = load_staged(&staged[2]).unwrap();
        assert_eq!(loaded.identifier, "ccc");
        assert_eq!(loaded.image.get_pixel(0, 0).0, [3, 0, 0]);
    }

    #[test]
    fn test_remove_staged() {
        let dir = tempfile::tempdir().unwrap();
        stage_symbol(dir.path(), &symbol(1, "aaa")).unwrap();
        let staged = read_staged(dir.path()).unwrap();

        remove_staged(&staged);
        assert!(read_staged(dir.path()).unwrap().is_empty());

        // Already gone: only a warning
        remove_staged(&staged);
    }
}
