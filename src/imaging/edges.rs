//! Bounding-box detection of non-background content.
//!
//! Left, right and top edges come from plain threshold sweeps: the first
//! column (or row) holding any pixel further than the tolerance from the
//! background wins.
//!
//! The bottom edge is different. Product shots usually carry a soft shadow or
//! reflection under the subject that fades into the background; a plain sweep
//! would count it as content. Instead the sweep walks upward looking for a
//! sharp drop in the vertical gradient of background distance:
//!
//! ```text
//! gradient(x, y) = avg(d(y), d(y+1)) - avg(d(y-1), d(y-2))
//! ```
//!
//! A strongly negative gradient (magnitude above `3 × tolerance`) marks row
//! `y - 1` as the last row of genuine content. Rows outside the image count
//! as pure background. When no row triggers, the plain threshold rule applies.

use super::color::ColorThreshold;
use image::{GenericImageView, Rgba};

/// Smallest box enclosing all content pixels. Inclusive, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    /// `right - left`: the span the margin math works with.
    pub fn trimmed_width(&self) -> u32 {
        self.right - self.left
    }

    /// `bottom - top`.
    pub fn trimmed_height(&self) -> u32 {
        self.bottom - self.top
    }

    /// True when the content already touches an edge of a `width × height`
    /// canvas. Such images are returned unaligned.
    pub fn touches_edge(&self, width: u32, height: u32) -> bool {
        self.left == 0
            || self.top == 0
            || self.right + 1 == width
            || self.bottom + 1 == height
    }
}

/// Multiplier on the tolerance a gradient drop must exceed to count as the
/// content/shadow transition.
const SHADOW_GRADIENT_FACTOR: f64 = 3.0;

/// Locate the bounding box of content in `image`.
pub fn detect<I>(image: &I, threshold: &ColorThreshold) -> BoundingBox
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (width, height) = image.dimensions();

    let left = (0..width)
        .find(|&x| column_has_content(image, x, threshold))
        .unwrap_or(0);

    let right = (left..width)
        .rev()
        .find(|&x| column_has_content(image, x, threshold))
        .unwrap_or(width - 1);

    let top = (0..height)
        .find(|&y| row_has_content(image, y, threshold))
        .unwrap_or(0);

    let bottom = find_bottom(image, top, threshold);

    BoundingBox {
        left,
        top,
        right,
        bottom,
    }
}

fn column_has_content<I>(image: &I, x: u32, threshold: &ColorThreshold) -> bool
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    (0..image.height()).any(|y| threshold.is_content(image.get_pixel(x, y)))
}

fn row_has_content<I>(image: &I, y: u32, threshold: &ColorThreshold) -> bool
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    (0..image.width()).any(|x| threshold.is_content(image.get_pixel(x, y)))
}

/// Background distances of every pixel in row `y`; zeros outside the image.
fn row_distances<I>(image: &I, y: i64, threshold: &ColorThreshold) -> Vec<u32>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (width, height) = image.dimensions();
    if y < 0 || y >= height as i64 {
        return vec![0; width as usize];
    }
    (0..width)
        .map(|x| threshold.distance(image.get_pixel(x, y as u32)))
        .collect()
}

/// Bottom sweep, from the last row up to `top`.
///
/// Keeps a sliding window of four rows of distances (`y+1`, `y`, `y-1`,
/// `y-2`) so every pixel's distance is computed once.
fn find_bottom<I>(image: &I, top: u32, threshold: &ColorThreshold) -> u32
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let height = image.height();
    let trigger = SHADOW_GRADIENT_FACTOR * threshold.tolerance as f64;
    let last = height as i64 - 1;

    let mut below = row_distances(image, last + 1, threshold);
    let mut current = row_distances(image, last, threshold);
    let mut above = row_distances(image, last - 1, threshold);
    let mut above2 = row_distances(image, last - 2, threshold);

    let mut fallback: Option<u32> = None;

    for y in (top..height).rev() {
        for x in 0..current.len() {
            let lower = (current[x] as f64 + below[x] as f64) / 2.0;
            let upper = (above[x] as f64 + above2[x] as f64) / 2.0;
            let gradient = lower - upper;
            if gradient < 0.0 && gradient.abs() > trigger {
                // Rows above the image are background, so row 0 never triggers.
                return y.saturating_sub(1).max(top);
            }
            if fallback.is_none() && current[x] > threshold.tolerance {
                fallback = Some(y);
            }
        }

        below = std::mem::replace(&mut current, std::mem::take(&mut above));
        above = std::mem::replace(
            &mut above2,
            row_distances(image, y as i64 - 3, threshold),
        );
    }

    fallback.unwrap_or(height - 1)
}
