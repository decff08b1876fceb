use crate::models::Region;
use crate::utils::CardError;
use image::{imageops, DynamicImage, ImageOutputFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Owned RGBA pixel buffer of the captured card.
///
/// The pipeline only reads it; every stage works on crops it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct CardImage {
    pixels: RgbaImage,
}

impl CardImage {
    /// Wrap an already decoded buffer. Returns an error for empty images.
    pub fn new(pixels: RgbaImage) -> Result<Self, CardError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(CardError::ImageDecode("Image has no pixels".to_string()));
        }
        Ok(CardImage { pixels })
    }

    pub fn from_dynamic(img: DynamicImage) -> Result<Self, CardError> {
        Self::new(img.to_rgba8())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CardError> {
        if bytes.is_empty() {
            return Err(CardError::ImageDecode("Image data is empty".to_string()));
        }
        let img = image::load_from_memory(bytes)
            .map_err(|e| CardError::ImageDecode(format!("Failed to load image: {}", e)))?;
        Self::from_dynamic(img)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CardError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CardError::Io(format!("Image file not found: {:?}", path)));
        }
        let img = image::open(path)
            .map_err(|e| CardError::ImageDecode(format!("Failed to open image: {}", e)))?;
        Self::from_dynamic(img)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// Copy a region's pixels into a new buffer.
    pub fn crop(&self, region: &Region) -> RgbaImage {
        imageops::crop_imm(&self.pixels, region.x, region.y, region.width, region.height).to_image()
    }
}

/// Encode a buffer as PNG bytes.
pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, CardError> {
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(pixels.clone())
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .map_err(|e| CardError::Serialization(format!("Failed to encode PNG: {}", e)))?;
    Ok(bytes.into_inner())
}

pub fn save_png<P: AsRef<Path>>(pixels: &RgbaImage, path: P) -> Result<(), CardError> {
    let bytes = encode_png(pixels)?;
    std::fs::write(path.as_ref(), bytes)
        .map_err(|e| CardError::Io(format!("Failed to write {:?}: {}", path.as_ref(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;
    use image::Rgba;

    #[test]
    fn test_decode_roundtrip_png() {
        let pixels = RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255]));
        let bytes = encode_png(&pixels).unwrap();
        let card = CardImage::from_bytes(&bytes).unwrap();
        assert_eq!((card.width(), card.height()), (8, 4));
        assert_eq!(card.pixels().get_pixel(3, 2), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = CardImage::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(CardError::ImageDecode(_))));
        assert!(matches!(CardImage::from_bytes(&[]), Err(CardError::ImageDecode(_))));
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(CardImage::open("/nonexistent/card.jpg"), Err(CardError::Io(_))));
    }

    #[test]
    fn test_crop_copies_region() {
        let mut pixels = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        pixels.put_pixel(4, 5, Rgba([0, 0, 0, 255]));
        let card = CardImage::new(pixels).unwrap();

        let region = Region { x: 3, y: 4, width: 3, height: 3, field: FieldType::Id };
        let crop = card.crop(&region);
        assert_eq!(crop.dimensions(), (3, 3));
        assert_eq!(crop.get_pixel(1, 1), &Rgba([0, 0, 0, 255]));
    }
}
