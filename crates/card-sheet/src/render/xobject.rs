//! Image XObject creation
//!
//! Card rasters are embedded as Flate-compressed image XObjects. RGBA
//! rasters with any transparency get a DeviceGray soft mask; CMYK rasters
//! are embedded as DeviceCMYK without a mask.

use crate::content::{CardRaster, CmykImage};
use crate::types::Result;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

// =============================================================================
// XObject Creation
// =============================================================================

/// Add `raster` to `output` as an image XObject
pub fn create_image_xobject(output: &mut Document, raster: &CardRaster) -> Result<ObjectId> {
    match raster {
        CardRaster::Rgba(img) => create_rgba_xobject(output, img),
        CardRaster::Cmyk(img) => create_cmyk_xobject(output, img),
    }
}

fn create_rgba_xobject(output: &mut Document, img: &RgbaImage) -> Result<ObjectId> {
    let (width, height) = img.dimensions();
    let pixels = (width * height) as usize;

    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for p in img.pixels() {
        rgb.extend_from_slice(&p.0[..3]);
        alpha.push(p.0[3]);
    }

    let mut dict = image_dict(width, height, b"DeviceRGB");
    if alpha.iter().any(|&a| a != u8::MAX) {
        let mask_dict = image_dict(width, height, b"DeviceGray");
        let mask_id = output.add_object(Stream::new(mask_dict, deflate(&alpha)?));
        dict.set("SMask", Object::Reference(mask_id));
    }

    Ok(output.add_object(Stream::new(dict, deflate(&rgb)?)))
}

fn create_cmyk_xobject(output: &mut Document, img: &CmykImage) -> Result<ObjectId> {
    let dict = image_dict(img.width, img.height, b"DeviceCMYK");
    Ok(output.add_object(Stream::new(dict, deflate(&img.data)?)))
}

fn image_dict(width: u32, height: u32, colour_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(colour_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
    dict
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn name(dict: &Dictionary, key: &[u8]) -> Vec<u8> {
        dict.get(key).unwrap().as_name().unwrap().to_vec()
    }

    #[test]
    fn test_opaque_rgba_has_no_mask() {
        let mut doc = Document::with_version("1.7");
        let raster = CardRaster::Rgba(RgbaImage::from_pixel(4, 3, Rgba([1, 2, 3, 255])));
        let id = create_image_xobject(&mut doc, &raster).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(name(&stream.dict, b"ColorSpace"), b"DeviceRGB");
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 4);
        assert_eq!(stream.dict.get(b"Height").unwrap().as_i64().unwrap(), 3);
        assert!(stream.dict.get(b"SMask").is_err());
        assert_eq!(stream.decompressed_content().unwrap().len(), 4 * 3 * 3);
    }

    #[test]
    fn test_transparent_rgba_gets_soft_mask() {
        let mut doc = Document::with_version("1.7");
        let raster = CardRaster::Rgba(RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 0])));
        let id = create_image_xobject(&mut doc, &raster).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        let mask_id = stream.dict.get(b"SMask").unwrap().as_reference().unwrap();
        let mask = doc.get_object(mask_id).unwrap().as_stream().unwrap();
        assert_eq!(name(&mask.dict, b"ColorSpace"), b"DeviceGray");
        assert_eq!(mask.decompressed_content().unwrap(), vec![0u8; 4]);
    }

    #[test]
    fn test_cmyk_raster() {
        let mut doc = Document::with_version("1.7");
        let raster = CardRaster::Cmyk(CmykImage {
            width: 1,
            height: 2,
            data: vec![0, 10, 20, 0, 255, 255, 255, 0],
        });
        let id = create_image_xobject(&mut doc, &raster).unwrap();

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(name(&stream.dict, b"ColorSpace"), b"DeviceCMYK");
        assert_eq!(
            stream.decompressed_content().unwrap(),
            vec![0, 10, 20, 0, 255, 255, 255, 0]
        );
    }
}
