use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

pub const CANVAS_WIDTH: u32 = 320;
pub const CANVAS_HEIGHT: u32 = 120;
const ROWS: u32 = 8;
const ROW_HEIGHT: u32 = 8;
const TOP: i32 = 15;
const START_X: i32 = 40;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Draw a stacked bar pattern that resembles a PDF417 code.
///
/// This is decoration for display only. It is not a readable symbology; the
/// pattern is a deterministic function of the digits in `value`.
pub fn render_barcode(value: &str) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, WHITE);
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();

    for row in 0..ROWS {
        let y = TOP + (row * ROW_HEIGHT) as i32;
        let mut x = START_X;

        bar(&mut canvas, x, y, 2);
        x += 4;

        for &digit in &digits {
            for j in 0..4 {
                let seed = digit + j + row;
                let width = seed % 4 + 1;
                if seed % 3 != 1 {
                    bar(&mut canvas, x, y, width);
                }
                x += width as i32 + 1;
            }
        }

        bar(&mut canvas, x, y, 2);
    }

    canvas
}

fn bar(canvas: &mut RgbaImage, x: i32, y: i32, width: u32) {
    if x >= CANVAS_WIDTH as i32 {
        return;
    }
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, ROW_HEIGHT - 1), BLACK);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_pixels(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p[0] == 0).count()
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render_barcode("402177"), render_barcode("402177"));
        assert_ne!(render_barcode("402177"), render_barcode("402178"));
    }

    #[test]
    fn test_canvas_size() {
        let img = render_barcode("12345");
        assert_eq!(img.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[test]
    fn test_empty_value_draws_guard_bars() {
        let img = render_barcode("");
        // start and end bars of 2x7 on each of the 8 rows
        assert_eq!(dark_pixels(&img), 8 * 2 * 2 * 7);
        assert_eq!(img.get_pixel(40, 15), &BLACK);
        assert_eq!(img.get_pixel(44, 15), &BLACK);
        assert_eq!(img.get_pixel(42, 15), &WHITE);
    }

    #[test]
    fn test_long_values_are_clipped() {
        let img = render_barcode(&"9".repeat(64));
        assert_eq!(img.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert!(dark_pixels(&img) > 0);
    }
}
