//! Shared test utilities: synthetic product shots and encoded fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! // 400×600 black product on a white 1000×1000 frame
//! let img = canvas_with_rect(1000, 1000, (300, 200, 699, 799), Rgba([0, 0, 0, 255]));
//! let bytes = png_bytes(&DynamicImage::ImageRgba8(img));
//! ```

use image::{DynamicImage, ImageEncoder, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Synthetic images
// =========================================================================

/// Opaque white canvas.
pub fn white_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
}

/// White canvas with a filled rectangle.
///
/// `rect` is `(left, top, right, bottom)`, all inclusive.
pub fn canvas_with_rect(
    width: u32,
    height: u32,
    rect: (u32, u32, u32, u32),
    color: Rgba<u8>,
) -> RgbaImage {
    let (left, top, right, bottom) = rect;
    assert!(right < width && bottom < height, "rect {rect:?} outside {width}x{height}");
    let mut img = white_canvas(width, height);
    for y in top..=bottom {
        for x in left..=right {
            img.put_pixel(x, y, color);
        }
    }
    img
}

// =========================================================================
// Encoded fixtures
// =========================================================================

/// A small valid JPEG with a gradient pattern.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Lossless PNG encoding of `image`, so pixel-exact fixtures survive decode.
pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    image.write_to(&mut cursor, ImageFormat::Png).unwrap();
    cursor.into_inner()
}
