//! Trim and pad an image around its detected content.
//!
//! Margins from the calculator are relative to the trimmed content box. They
//! are first translated into margins relative to the original image edges;
//! negative values then become crops and positive values become solid-color
//! padding.

use super::calculations::Margin;
use super::color::is_translucent;
use super::edges::BoundingBox;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage, imageops};

/// Translate content-relative margins into margins relative to the image edges.
pub fn relative_margin(bbox: &BoundingBox, margin: &Margin, width: u32, height: u32) -> Margin {
    Margin {
        top: margin.top - bbox.top as i64,
        left: margin.left - bbox.left as i64,
        right: margin.right - (width as i64 - (bbox.right as i64 + 1)),
        bottom: margin.bottom - (height as i64 - (bbox.bottom as i64 + 1)),
    }
}

/// Pixels removed from each side of one axis.
///
/// A crop that would leave nothing removes nothing on that axis instead.
fn axis_crop(size: u32, start: i64, end: i64) -> (u32, u32) {
    let start = (-start).max(0);
    let end = (-end).max(0);
    if start + end >= size as i64 {
        (0, 0)
    } else {
        (start as u32, end as u32)
    }
}

/// Crop the sides of `image` where `relative` is negative.
pub fn trim(image: &DynamicImage, relative: &Margin) -> DynamicImage {
    let (width, height) = image.dimensions();
    let (left, right) = axis_crop(width, relative.left, relative.right);
    let (top, bottom) = axis_crop(height, relative.top, relative.bottom);
    if left + right + top + bottom == 0 {
        return image.clone();
    }
    image.crop_imm(left, top, width - left - right, height - top - bottom)
}

/// Extend `image` where `relative` is positive, filling with `fill`.
///
/// The output keeps an alpha channel when either the source or the fill is
/// translucent; otherwise it is plain RGB.
pub fn pad(image: &DynamicImage, relative: &Margin, fill: Rgba<u8>) -> DynamicImage {
    let grow = |v: i64| v.max(0) as u32;
    let (top, bottom) = (grow(relative.top), grow(relative.bottom));
    let (left, right) = (grow(relative.left), grow(relative.right));

    let (width, height) = image.dimensions();
    let new_width = width + left + right;
    let new_height = height + top + bottom;

    if image.color().has_alpha() || is_translucent(fill) {
        let mut canvas = RgbaImage::from_pixel(new_width, new_height, fill);
        imageops::overlay(&mut canvas, &image.to_rgba8(), left as i64, top as i64);
        DynamicImage::ImageRgba8(canvas)
    } else {
        let [r, g, b, _] = fill.0;
        let mut canvas = RgbImage::from_pixel(new_width, new_height, Rgb([r, g, b]));
        imageops::replace(&mut canvas, &image.to_rgb8(), left as i64, top as i64);
        DynamicImage::ImageRgb8(canvas)
    }
}

/// Apply content-relative `margin` to `image`: trim first, then pad.
pub fn apply(image: &DynamicImage, bbox: &BoundingBox, margin: &Margin, fill: Rgba<u8>) -> DynamicImage {
    let (width, height) = image.dimensions();
    let relative = relative_margin(bbox, margin, width, height);
    let trimmed = trim(image, &relative);
    pad(&trimmed, &relative, fill)
}
