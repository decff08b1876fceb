use crate::models::FieldType;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::contrast::threshold;

/// Threshold for light text on the name band.
pub const NAME_THRESHOLD: u8 = 170;
/// Threshold used when the name is printed dark.
pub const DARK_TEXT_THRESHOLD: u8 = 100;
pub const DIGITS_THRESHOLD: u8 = 150;
pub const DIGITS_CONTRAST: f32 = 1.6;
pub const BARCODE_THRESHOLD: u8 = 130;
pub const PHOTO_BOOST: f32 = 1.1;
pub const PHOTO_CONTRAST_STEP: u8 = 10;

/// Image transform applied to a region before recognition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Profile {
    /// Gentle colour boost, no binarization.
    Photo,
    Name { dark_text: bool },
    /// Contrast stretch then binarize, for the ID and year bands.
    Digits,
    /// Low threshold plus horizontal gap fill between bars.
    Barcode,
    /// Second barcode attempt when the first yields too few digits.
    BarcodeAlternate,
}

impl Profile {
    pub fn for_field(field: FieldType, dark_text: bool) -> Profile {
        match field {
            FieldType::Photo => Profile::Photo,
            FieldType::Name => Profile::Name { dark_text },
            FieldType::Id | FieldType::Year => Profile::Digits,
            FieldType::Barcode => Profile::Barcode,
        }
    }

    pub fn is_binarizing(&self) -> bool {
        !matches!(self, Profile::Photo)
    }
}

/// Apply a profile. Output always has the input's dimensions.
pub fn preprocess(region: RgbaImage, profile: Profile) -> RgbaImage {
    match profile {
        Profile::Photo => enhance_photo(region),
        Profile::Name { dark_text } => {
            let t = if dark_text { DARK_TEXT_THRESHOLD } else { NAME_THRESHOLD };
            to_rgba(&threshold(&luminance(&region), t))
        }
        Profile::Digits => {
            let gray = stretch_contrast(luminance(&region), DIGITS_CONTRAST);
            to_rgba(&threshold(&gray, DIGITS_THRESHOLD))
        }
        Profile::Barcode => {
            let binary = threshold(&luminance(&region), BARCODE_THRESHOLD);
            to_rgba(&fill_bar_gaps(&binary))
        }
        Profile::BarcodeAlternate => preprocess(region, Profile::Name { dark_text: true }),
    }
}

/// Weighted luminance 0.299R + 0.587G + 0.114B.
pub fn luminance(img: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let gray = 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32;
        Luma([gray.round().clamp(0.0, 255.0) as u8])
    })
}

fn stretch_contrast(mut img: GrayImage, factor: f32) -> GrayImage {
    for pixel in img.pixels_mut() {
        let value = (pixel[0] as f32 - 128.0) * factor + 128.0;
        pixel[0] = value.round().clamp(0.0, 255.0) as u8;
    }
    img
}

/// Darken any light pixel that sits between two dark pixels on the same row.
///
/// Neighbours are read from the unfilled input so a single pass is stable.
fn fill_bar_gaps(binary: &GrayImage) -> GrayImage {
    let mut out = binary.clone();
    let (width, height) = binary.dimensions();
    if width < 3 {
        return out;
    }
    for y in 0..height {
        for x in 1..width - 1 {
            let left = binary.get_pixel(x - 1, y)[0];
            let here = binary.get_pixel(x, y)[0];
            let right = binary.get_pixel(x + 1, y)[0];
            if left == 0 && here == 255 && right == 0 {
                out.put_pixel(x, y, Luma([0]));
            }
        }
    }
    out
}

fn enhance_photo(mut img: RgbaImage) -> RgbaImage {
    for pixel in img.pixels_mut() {
        for c in 0..3 {
            let boosted = (pixel[c] as f32 * PHOTO_BOOST).min(255.0) as u8;
            pixel[c] = if boosted < 128 {
                boosted.saturating_sub(PHOTO_CONTRAST_STEP)
            } else {
                boosted.saturating_add(PHOTO_CONTRAST_STEP)
            };
        }
    }
    img
}

fn to_rgba(gray: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgba([v, v, v, 255])
    })
}
