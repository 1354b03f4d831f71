//! Color distance and background thresholds.
//!
//! Distances are squared Euclidean over the red, green and blue channels.
//! Alpha never participates: a transparent white pixel is as much
//! "background" as an opaque one.

use image::Rgba;

/// Pure white, the stock background reference.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Fill used instead of the configured one while debugging.
pub const LIGHT_GRAY: Rgba<u8> = Rgba([192, 192, 192, 255]);

/// Default squared-distance tolerance between background and content.
pub const DEFAULT_TOLERANCE: u32 = 300;

/// Squared RGB distance between two colors.
///
/// ```
/// # use product_align::imaging::color::{color_distance, WHITE};
/// # use image::Rgba;
/// assert_eq!(color_distance(WHITE, WHITE), 0);
/// assert_eq!(color_distance(Rgba([0, 0, 0, 255]), WHITE), 3 * 255 * 255);
/// ```
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> u32 {
    let channel = |i: usize| {
        let d = a.0[i] as i32 - b.0[i] as i32;
        (d * d) as u32
    };
    channel(0) + channel(1) + channel(2)
}

/// Reference background color plus the tolerance separating it from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorThreshold {
    pub background: Rgba<u8>,
    pub tolerance: u32,
}

impl ColorThreshold {
    pub fn new(background: Rgba<u8>, tolerance: u32) -> Self {
        Self {
            background,
            tolerance,
        }
    }

    /// Distance of `pixel` to the background reference.
    pub fn distance(&self, pixel: Rgba<u8>) -> u32 {
        color_distance(pixel, self.background)
    }

    /// Whether `pixel` counts as content.
    pub fn is_content(&self, pixel: Rgba<u8>) -> bool {
        self.distance(pixel) > self.tolerance
    }
}

impl Default for ColorThreshold {
    fn default() -> Self {
        Self::new(WHITE, DEFAULT_TOLERANCE)
    }
}

/// Whether a color carries any transparency.
pub fn is_translucent(color: Rgba<u8>) -> bool {
    color.0[3] != u8::MAX
}

/// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional).
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { byte(6)? } else { u8::MAX };
    Some(Rgba([byte(0)?, byte(2)?, byte(4)?, alpha]))
}
