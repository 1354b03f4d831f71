//! Diagnostic edge markers.
//!
//! Markers are drawn onto a copy of the source taken *after* detection, so
//! turning debugging on or off never moves the bounding box or the margins.
//!
//! | Marker | Color |
//! |---|---|
//! | bottom edge line | orange |
//! | top edge line | pink |
//! | left edge line | green |
//! | right edge line | blue |
//! | content pixels on the bottom row | solid blue |

use super::color::ColorThreshold;
use super::edges::BoundingBox;
use image::{DynamicImage, Rgba, RgbaImage};

const ORANGE: Rgba<u8> = Rgba([255, 200, 0, 255]);
const PINK: Rgba<u8> = Rgba([255, 175, 175, 255]);
const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Multiply-blend `tint` into `pixel`, keeping the pixel's alpha.
fn tint(pixel: &mut Rgba<u8>, tint: Rgba<u8>) {
    for c in 0..3 {
        pixel.0[c] = ((pixel.0[c] as u16 * tint.0[c] as u16) / 255) as u8;
    }
}

fn draw_row(image: &mut RgbaImage, y: u32, color: Rgba<u8>) {
    for x in 0..image.width() {
        tint(image.get_pixel_mut(x, y), color);
    }
}

fn draw_column(image: &mut RgbaImage, x: u32, color: Rgba<u8>) {
    for y in 0..image.height() {
        tint(image.get_pixel_mut(x, y), color);
    }
}

/// Copy `source` and draw the edge markers for `bbox` onto the copy.
pub fn with_edge_markers(
    source: &DynamicImage,
    bbox: &BoundingBox,
    threshold: &ColorThreshold,
) -> DynamicImage {
    let mut marked = source.to_rgba8();

    for x in 0..marked.width() {
        let pixel = marked.get_pixel_mut(x, bbox.bottom);
        if threshold.is_content(*pixel) {
            *pixel = Rgba([BLUE.0[0], BLUE.0[1], BLUE.0[2], pixel.0[3]]);
        }
    }

    draw_row(&mut marked, bbox.bottom, ORANGE);
    draw_row(&mut marked, bbox.top, PINK);
    draw_column(&mut marked, bbox.left, GREEN);
    draw_column(&mut marked, bbox.right, BLUE);

    DynamicImage::ImageRgba8(marked)
}
