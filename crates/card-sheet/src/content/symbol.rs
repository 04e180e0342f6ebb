//! QR symbol encoding

use crate::constants::{MODULE_BOX_PX, QUIET_ZONE_MODULES};
use crate::types::{ErrorCorrection, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use qrcode::{Color, QrCode};

/// An encoded symbol tagged with its place in the run
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// 1-based position of the payload in the input list
    pub sequence: usize,
    pub identifier: String,
    pub image: RgbImage,
}

/// Encode `payload` as a QR symbol of exactly `size_px` x `size_px` pixels.
///
/// The smallest QR version that holds the payload at the requested tier is
/// used. Modules are painted as solid boxes inside a quiet zone, then the
/// whole symbol is resampled to the final size, so identical payloads always
/// give identical pixels.
pub fn encode_symbol(payload: &str, tier: ErrorCorrection, size_px: u32) -> Result<RgbImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), tier.ec_level())?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let edge = (modules + 2 * QUIET_ZONE_MODULES) * MODULE_BOX_PX;
    let mut img = GrayImage::from_pixel(edge, edge, Luma([255u8]));

    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = (i as u32) % modules + QUIET_ZONE_MODULES;
        let my = (i as u32) / modules + QUIET_ZONE_MODULES;
        for dy in 0..MODULE_BOX_PX {
            for dx in 0..MODULE_BOX_PX {
                img.put_pixel(mx * MODULE_BOX_PX + dx, my * MODULE_BOX_PX + dy, Luma([0u8]));
            }
        }
    }

    let resized = imageops::resize(&img, size_px, size_px, FilterType::Lanczos3);
    Ok(DynamicImage::ImageLuma8(resized).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_size() {
        let img = encode_symbol("https://example.com/card/1", ErrorCorrection::Low, 294).unwrap();
        assert_eq!(img.dimensions(), (294, 294));

        let img = encode_symbol("x", ErrorCorrection::High, 37).unwrap();
        assert_eq!(img.dimensions(), (37, 37));
    }

    #[test]
    fn test_deterministic() {
        let a = encode_symbol("https://example.com/abc", ErrorCorrection::Medium, 210).unwrap();
        let b = encode_symbol("https://example.com/abc", ErrorCorrection::Medium, 210).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_quiet_zone_is_white() {
        let img = encode_symbol("quiet", ErrorCorrection::Low, 290).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(289, 289).0, [255, 255, 255]);
    }

    #[test]
    fn test_payload_too_long() {
        let payload = "9".repeat(8000);
        assert!(encode_symbol(&payload, ErrorCorrection::High, 100).is_err());
    }
}
