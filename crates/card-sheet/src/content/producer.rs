//! Card producers
//!
//! A producer turns the configured inputs into the ordered list of
//! `CardItem`s the renderer places. Item `i` of the returned list always
//! lands in grid slot `i`.

use super::{
    CardItem, Composer, RasterTarget, Symbol, derive_identifier, encode_symbol, finish_card,
    load_staged, read_staged, remove_staged, remove_staged_paths, stage_symbol,
};
use crate::options::PersonalizeOptions;
use crate::types::{CardSheetError, Result};
use image::RgbaImage;
use log::{debug, error, info};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Source of the cards for one sheet run
pub trait CardProducer {
    fn produce(&self) -> Result<Vec<CardItem>>;
}

/// Open a raster asset, naming the stage it was needed for on failure
pub fn load_artwork(path: &Path, stage: &'static str) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(CardSheetError::MissingFile {
            stage,
            path: path.to_path_buf(),
        });
    }
    let img = image::open(path).map_err(|source| CardSheetError::Asset {
        stage,
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgba8())
}

// =============================================================================
// Static artwork
// =============================================================================

/// One artwork repeated `copies` times; every copy shares a single raster
pub struct StaticArtwork {
    artwork: RgbaImage,
    copies: usize,
    target: RasterTarget,
}

impl StaticArtwork {
    pub fn new(artwork: RgbaImage, copies: usize, target: RasterTarget) -> Self {
        Self {
            artwork,
            copies,
            target,
        }
    }
}

impl CardProducer for StaticArtwork {
    fn produce(&self) -> Result<Vec<CardItem>> {
        let raster = Rc::new(finish_card(self.artwork.clone(), &self.target));
        Ok(vec![CardItem::Raster(raster); self.copies])
    }
}

// =============================================================================
// Personalized artwork
// =============================================================================

/// Base artwork personalized once per payload.
///
/// Payloads are numbered from 1 in input order; that number is both the
/// card's counter and its slot order. A payload that cannot be encoded keeps
/// its slot as a failed item.
pub struct PersonalizedArtwork {
    base: RgbaImage,
    payloads: Vec<String>,
    options: PersonalizeOptions,
    composer: Composer,
    target: RasterTarget,
}

impl PersonalizedArtwork {
    /// Fails if the configured font cannot be loaded.
    ///
    /// `card_width_mm` is the printed width of `base`.
    pub fn new(
        base: RgbaImage,
        payloads: Vec<String>,
        options: &PersonalizeOptions,
        target: RasterTarget,
        card_width_mm: f32,
    ) -> Result<Self> {
        let composer = Composer::new(options, card_width_mm)?;
        Ok(Self {
            base,
            payloads,
            options: options.clone(),
            composer,
            target,
        })
    }

    fn encode(&self, sequence: usize, payload: &str) -> std::result::Result<Symbol, CardItem> {
        let identifier = derive_identifier(payload);
        match encode_symbol(
            payload,
            self.options.error_correction,
            self.options.symbol_size_px,
        ) {
            Ok(image) => Ok(Symbol {
                sequence,
                identifier,
                image,
            }),
            Err(e) => {
                error!("Card {}: could not encode payload: {}", sequence, e);
                Err(CardItem::Failed {
                    label: format!("#{sequence}"),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn finish(&self, symbol: &Symbol) -> CardItem {
        let card = self.composer.compose(
            &self.base,
            &symbol.image,
            &symbol.identifier,
            symbol.sequence,
        );
        CardItem::raster(finish_card(card, &self.target))
    }

    /// Encode and compose in memory
    fn produce_in_memory(&self) -> Vec<CardItem> {
        self.payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| match self.encode(i + 1, payload) {
                Ok(symbol) => self.finish(&symbol),
                Err(failed) => failed,
            })
            .collect()
    }

    /// Encode everything to `dir`, then read back in tag order and compose
    fn produce_staged(&self, dir: &Path) -> Result<Vec<CardItem>> {
        std::fs::create_dir_all(dir)?;
        info!("Staging {} symbols in {}", self.payloads.len(), dir.display());

        let mut slots: BTreeMap<usize, CardItem> = BTreeMap::new();
        let mut written: HashSet<PathBuf> = HashSet::new();

        for (i, payload) in self.payloads.iter().enumerate() {
            let sequence = i + 1;
            match self.encode(sequence, payload) {
                Ok(symbol) => match stage_symbol(dir, &symbol) {
                    Ok(path) => {
                        written.insert(path);
                    }
                    Err(e) => {
                        remove_staged_paths(written.iter().map(PathBuf::as_path));
                        return Err(e);
                    }
                },
                Err(failed) => {
                    slots.insert(sequence, failed);
                }
            }
        }

        // Files left behind by earlier runs are not ours to place
        let staged: Vec<_> = read_staged(dir)?
            .into_iter()
            .filter(|f| written.contains(&f.path))
            .collect();

        for file in &staged {
            let item = match load_staged(file) {
                Ok(symbol) => self.finish(&symbol),
                Err(e) => {
                    error!("Card {}: staged symbol unreadable: {}", file.sequence, e);
                    CardItem::Failed {
                        label: format!("#{}", file.sequence),
                        reason: e.to_string(),
                    }
                }
            };
            slots.insert(file.sequence, item);
        }

        remove_staged(&staged);
        debug!("Removed {} staged symbols", staged.len());

        Ok(slots.into_values().collect())
    }
}

impl CardProducer for PersonalizedArtwork {
    fn produce(&self) -> Result<Vec<CardItem>> {
        match &self.options.staging_dir {
            Some(dir) => self.produce_staged(dir),
            None => Ok(self.produce_in_memory()),
        }
    }
}

// =============================================================================
// Image list
// =============================================================================

/// Already finished card images, decoded by the renderer at draw time
pub struct ImageFiles {
    files: Vec<PathBuf>,
}

impl ImageFiles {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl CardProducer for ImageFiles {
    fn produce(&self) -> Result<Vec<CardItem>> {
        Ok(self.files.iter().cloned().map(CardItem::File).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CardRaster;
    use crate::types::ColourMode;
    use image::Rgba;

    fn target() -> RasterTarget {
        RasterTarget {
            width_px: 60,
            height_px: 80,
            colour: ColourMode::Native,
        }
    }

    fn base() -> RgbaImage {
        RgbaImage::from_pixel(120, 160, Rgba([200, 200, 255, 255]))
    }

    fn small_symbols() -> PersonalizeOptions {
        PersonalizeOptions {
            symbol_size_px: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_static_copies_share_one_raster() {
        let producer = StaticArtwork::new(base(), 3, target());
        let items = producer.produce().unwrap();
        assert_eq!(items.len(), 3);

        match (&items[0], &items[2]) {
            (CardItem::Raster(a), CardItem::Raster(b)) => {
                assert!(Rc::ptr_eq(a, b));
                assert_eq!(a.dimensions(), (60, 80));
            }
            _ => panic!("expected rasters"),
        }
    }

    #[test]
    fn test_personalized_keeps_input_order() {
        let payloads = vec!["https://a.example/1".to_string(), "https://a.example/2".to_string()];
        let producer =
            PersonalizedArtwork::new(base(), payloads, &small_symbols(), target(), 46.0).unwrap();

        let items = producer.produce().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| matches!(i, CardItem::Raster(_))));
    }

    #[test]
    fn test_unencodable_payload_keeps_its_slot() {
        let payloads = vec!["ok".to_string(), "9".repeat(8000), "also ok".to_string()];
        let producer =
            PersonalizedArtwork::new(base(), payloads, &small_symbols(), target(), 46.0).unwrap();

        let items = producer.produce().unwrap();
        assert_eq!(items.len(), 3);
        assert!(!items[0].is_failed());
        assert!(items[1].is_failed());
        assert!(!items[2].is_failed());
    }

    #[test]
    fn test_staged_run_cleans_up_and_ignores_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("QR_1_stale0.png");
        image::RgbImage::new(4, 4).save(&stale).unwrap();

        let options = PersonalizeOptions {
            staging_dir: Some(dir.path().to_path_buf()),
            ..small_symbols()
        };
        let payloads = vec!["p-000001".to_string(), "p-000002".to_string()];
        let producer = PersonalizedArtwork::new(base(), payloads, &options, target(), 46.0).unwrap();

        let items = producer.produce().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| matches!(i, CardItem::Raster(_))));

        // Only the stale file remains
        let left: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(left.len(), 1);
        assert!(stale.exists());
    }

    #[test]
    fn test_failed_staging_removes_files_already_written() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the second symbol's file should go
        std::fs::create_dir(dir.path().join("QR_2_000002.png")).unwrap();

        let options = PersonalizeOptions {
            staging_dir: Some(dir.path().to_path_buf()),
            ..small_symbols()
        };
        let payloads = vec![
            "p-000001".to_string(),
            "p-000002".to_string(),
            "p-000003".to_string(),
        ];
        let producer = PersonalizedArtwork::new(base(), payloads, &options, target(), 46.0).unwrap();

        let err = producer.produce().unwrap_err();
        assert!(matches!(err, CardSheetError::Asset { stage: "staging", .. }));
        assert!(!dir.path().join("QR_1_000001.png").exists());
        assert!(!dir.path().join("QR_3_000003.png").exists());
    }

    #[test]
    fn test_image_files_are_deferred() {
        let producer = ImageFiles::new(vec![PathBuf::from("a.png"), PathBuf::from("b.png")]);
        let items = producer.produce().unwrap();
        assert!(matches!(&items[1], CardItem::File(p) if p == Path::new("b.png")));
    }

    #[test]
    fn test_load_artwork_missing() {
        let err = load_artwork(Path::new("/nonexistent/base.png"), "base artwork").unwrap_err();
        assert!(matches!(
            err,
            CardSheetError::MissingFile {
                stage: "base artwork",
                ..
            }
        ));
    }

    #[test]
    fn test_cmyk_target_produces_cmyk() {
        let target = RasterTarget {
            colour: ColourMode::Cmyk,
            ..target()
        };
        let items = StaticArtwork::new(base(), 1, target).produce().unwrap();
        assert!(matches!(&items[0], CardItem::Raster(r) if matches!(**r, CardRaster::Cmyk(_))));
    }
}
