//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to produce) and the [`backend`](super::backend)
//! (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`Quality`] — JPEG encoding quality (1–100, default 100). Clamped on construction.
//! - [`CanvasSpec`] — Fixed target canvas in pixels; its aspect ratio drives alignment.
//! - [`Preset`] — Layout lines (top line, base line, side margin) plus [`VerticalAlign`].
//! - [`ResizeParams`] — Exact output dimensions for the resampler.
//! - [`EncodeParams`] — Quality and progressive flag for the encoder.

use super::align::AlignError;
use super::calculations::MarginPercents;
use serde::{Deserialize, Serialize};

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// From the `0.0..=1.0` scale common to imaging toolkits.
    pub fn from_fraction(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() { 1.0 } else { fraction };
        Self::new((fraction.clamp(0.0, 1.0) * 100.0).round() as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// Target canvas in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

impl CanvasSpec {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::new(1108, 1528)
    }
}

/// How vertical slack is distributed around the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Content rests on the base line; extra height goes above it.
    #[default]
    Bottom,
    /// Content is centered; top and bottom get equal treatment.
    Middle,
}

/// Layout preset, in percent of the final canvas.
///
/// - `top_line`: minimal free space above the content
/// - `base_line`: where the content's bottom edge sits, measured from the top
/// - `left_right_margin`: minimal combined free space left + right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    pub name: String,
    pub top_line: f64,
    pub base_line: f64,
    pub left_right_margin: f64,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        top_line: f64,
        base_line: f64,
        left_right_margin: f64,
        vertical_align: VerticalAlign,
    ) -> Self {
        Self {
            name: name.into(),
            top_line,
            base_line,
            left_right_margin,
            vertical_align,
        }
    }

    /// The stock presets: top line 0 or 10, base line 70, 80 or 90, side margin 9,
    /// bottom-aligned; plus the `lister` and `detail` shop profiles.
    pub fn stock() -> Vec<Preset> {
        let mut presets = Vec::new();
        for base_line in [70.0, 80.0, 90.0] {
            for top_line in [0.0, 10.0] {
                presets.push(Preset::new(
                    format!("top{top_line}-base{base_line}"),
                    top_line,
                    base_line,
                    9.0,
                    VerticalAlign::Bottom,
                ));
            }
        }
        presets.push(Preset::new("lister", 15.0, 85.0, 9.0, VerticalAlign::Bottom));
        presets.push(Preset::new("detail", 5.0, 95.0, 9.0, VerticalAlign::Middle));
        presets
    }

    /// Check the line invariants: `0 ≤ top_line ≤ base_line ≤ 100`,
    /// `0 ≤ left_right_margin < 100`.
    pub fn validate(&self) -> Result<(), AlignError> {
        let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
        if !in_range(self.top_line) || !in_range(self.base_line) {
            return Err(AlignError::InvalidConfiguration(format!(
                "preset '{}': top line and base line must be within 0-100",
                self.name
            )));
        }
        if self.base_line < self.top_line {
            return Err(AlignError::InvalidConfiguration(format!(
                "preset '{}': base line ({}) is above top line ({})",
                self.name, self.base_line, self.top_line
            )));
        }
        if !in_range(self.left_right_margin) || self.left_right_margin >= 100.0 {
            return Err(AlignError::InvalidConfiguration(format!(
                "preset '{}': left/right margin must be within 0-100 (exclusive)",
                self.name
            )));
        }
        Ok(())
    }

    /// Percentages the margin calculator works with.
    pub fn margin_percents(&self) -> MarginPercents {
        MarginPercents {
            bottom: 100.0 - self.base_line,
            min_top: self.top_line,
            min_left_right: self.left_right_margin,
            vertical_align: self.vertical_align,
        }
    }
}

/// Parameters for the final resample to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
}

impl From<CanvasSpec> for ResizeParams {
    fn from(canvas: CanvasSpec) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
        }
    }
}

/// Parameters for JPEG encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeParams {
    pub quality: Quality,
    pub progressive: bool,
}
