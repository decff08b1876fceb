use crate::models::{CardLayout, FieldType, Region};
use crate::processing::CardImage;
use image::Rgba;
use log::debug;
use std::collections::BTreeMap;

/// Colour rules used to find the card inside a photo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardColors {
    pub blue_min_b: u8,
    pub blue_max_r: u8,
    pub blue_max_g: u8,
    pub orange_min_r: u8,
    pub orange_min_g: u8,
    pub orange_max_b: u8,
    /// Samples of each colour required before the crop is trusted.
    pub min_points: usize,
    pub padding: u32,
}

impl Default for CardColors {
    fn default() -> Self {
        CardColors {
            blue_min_b: 150,
            blue_max_r: 100,
            blue_max_g: 130,
            orange_min_r: 200,
            orange_min_g: 150,
            orange_max_b: 100,
            min_points: 10,
            padding: 5,
        }
    }
}

impl CardColors {
    fn is_blue(&self, p: &Rgba<u8>) -> bool {
        p[2] > self.blue_min_b && p[0] < self.blue_max_r && p[1] < self.blue_max_g
    }

    fn is_orange(&self, p: &Rgba<u8>) -> bool {
        p[0] > self.orange_min_r && p[1] > self.orange_min_g && p[2] < self.orange_max_b
    }
}

#[derive(Debug, Default)]
struct Extent {
    count: usize,
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl Extent {
    fn add(&mut self, x: u32, y: u32) {
        if self.count == 0 {
            self.min_x = x;
            self.max_x = x;
            self.min_y = y;
            self.max_y = y;
        } else {
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
        }
        self.count += 1;
    }
}

/// Find the card by its blue header and orange sidebar.
///
/// Returns the full frame unless both colours are seen on more than
/// `min_points` grid samples.
pub fn locate_card(image: &CardImage, colors: &CardColors) -> Region {
    let (width, height) = (image.width(), image.height());
    let full = Region { x: 0, y: 0, width, height, field: FieldType::Photo };
    let step = (width / 50).max(1) as usize;

    let mut blue = Extent::default();
    let mut orange = Extent::default();
    for x in (0..width).step_by(step) {
        for y in (0..height).step_by(step) {
            let p = image.pixels().get_pixel(x, y);
            if colors.is_blue(p) {
                blue.add(x, y);
            }
            if colors.is_orange(p) {
                orange.add(x, y);
            }
        }
    }

    debug!("Card colour samples: blue={} orange={}", blue.count, orange.count);
    if blue.count <= colors.min_points || orange.count <= colors.min_points {
        return full;
    }

    let left = blue.min_x.min(orange.min_x).saturating_sub(colors.padding);
    let top = blue.min_y.min(orange.min_y).saturating_sub(colors.padding);
    let right = (blue.max_x.max(orange.max_x) + colors.padding).min(width);
    let bottom = (blue.max_y.max(orange.max_y) + colors.padding).min(height);

    if right <= left || bottom <= top {
        return full;
    }
    Region { x: left, y: top, width: right - left, height: bottom - top, field: FieldType::Photo }
}

/// Crop the photo to the located card. Falls back to the whole frame.
pub fn crop_to_card(image: &CardImage, colors: &CardColors) -> (CardImage, Region) {
    let bounds = locate_card(image, colors);
    if bounds.x == 0 && bounds.y == 0 && bounds.width == image.width() && bounds.height == image.height() {
        return (image.clone(), bounds);
    }
    match CardImage::new(image.crop(&bounds)) {
        Ok(card) => (card, bounds),
        Err(_) => (image.clone(), Region { x: 0, y: 0, width: image.width(), height: image.height(), field: FieldType::Photo }),
    }
}

fn axis(total: u32, offset: f32, extent: f32) -> (u32, u32) {
    let start = (total as f32 * offset).floor() as u32;
    let len = (total as f32 * extent).floor() as u32;
    // Tiny images floor to zero; keep one pixel and stay inside the frame.
    let len = len.clamp(1, total);
    let start = start.min(total - len);
    (start, len)
}

/// Split the card into the five field regions of `layout`.
pub fn partition(image: &CardImage, layout: &CardLayout) -> BTreeMap<FieldType, Region> {
    let (width, height) = (image.width(), image.height());
    FieldType::ALL
        .iter()
        .map(|&field| {
            let f = layout.fraction(field);
            let (x, w) = axis(width, f.fx, f.fw);
            let (y, h) = axis(height, f.fy, f.fh);
            (field, Region { x, y, width: w, height: h, field })
        })
        .collect()
}
