//! Pure margin math for placing trimmed content on a target canvas.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! The calculator first measures the content as if it were padded by the
//! minimal preset percentages, then compares that aspect ratio to the canvas:
//!
//! - **Branch A** (`canvas ≥ content`): height constrains. Top and bottom
//!   margins follow the percentages; left and right absorb the slack.
//! - **Branch B** (`canvas < content`): width constrains. Left and right follow
//!   the minimal side margin; the vertical slack goes to top/bottom according
//!   to the alignment mode.
//!
//! Real-to-integer conversions and integer divisions truncate toward zero so
//! output is pixel-identical across platforms.

use super::align::AlignError;
use super::params::VerticalAlign;

/// Signed pixel offsets around the trimmed content. Positive pads, negative crops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margin {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

/// Which dimension constrained the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Branch A: canvas is at least as wide (relatively) as the padded content.
    Height,
    /// Branch B: padded content is wider than the canvas.
    Width,
}

/// Percent configuration of a margin computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginPercents {
    pub bottom: f64,
    pub min_top: f64,
    pub min_left_right: f64,
    pub vertical_align: VerticalAlign,
}

impl MarginPercents {
    /// Combined top + bottom share used to size the padded content.
    ///
    /// Middle alignment forces symmetric treatment by doubling the larger side.
    pub fn top_plus_bottom(&self) -> f64 {
        match self.vertical_align {
            VerticalAlign::Middle => 2.0 * self.bottom.max(self.min_top),
            VerticalAlign::Bottom => self.min_top + self.bottom,
        }
    }

    /// Reject percentages that make the padded content size undefined.
    pub fn validate(&self) -> Result<(), AlignError> {
        for (name, value) in [
            ("bottom", self.bottom),
            ("min_top", self.min_top),
            ("min_left_right", self.min_left_right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AlignError::InvalidConfiguration(format!(
                    "{name} percentage must be a non-negative number, got {value}"
                )));
            }
        }
        if self.min_left_right >= 100.0 {
            return Err(AlignError::InvalidConfiguration(format!(
                "left/right margin must be below 100%, got {}",
                self.min_left_right
            )));
        }
        if self.min_top + self.bottom >= 100.0 {
            return Err(AlignError::InvalidConfiguration(format!(
                "top ({}%) and bottom ({}%) margins leave no room for content",
                self.min_top, self.bottom
            )));
        }
        if self.top_plus_bottom() >= 100.0 {
            return Err(AlignError::InvalidConfiguration(format!(
                "vertical margins add up to {}% in {:?} mode",
                self.top_plus_bottom(),
                self.vertical_align
            )));
        }
        Ok(())
    }
}

/// Truncate toward zero, like an integer cast.
fn trunc(value: f64) -> i64 {
    value.trunc() as i64
}

/// Pick the constraining dimension for content of `trimmed_width × trimmed_height`.
pub fn select_constraint(
    canvas_aspect_ratio: f64,
    trimmed_width: u32,
    trimmed_height: u32,
    percents: &MarginPercents,
) -> Constraint {
    let total_width = trimmed_width as f64 * 100.0 / (100.0 - percents.min_left_right);
    let total_height = trimmed_height as f64 * 100.0 / (100.0 - percents.top_plus_bottom());
    let content_aspect = total_width / total_height;

    // NaN (0 / 0) compares false and falls through to the width branch.
    if canvas_aspect_ratio >= content_aspect {
        Constraint::Height
    } else {
        Constraint::Width
    }
}

/// Compute margins relative to trimmed content.
///
/// # Examples
/// ```
/// # use product_align::imaging::calculations::{compute_margin, MarginPercents};
/// # use product_align::imaging::VerticalAlign;
/// let percents = MarginPercents {
///     bottom: 10.0,
///     min_top: 10.0,
///     min_left_right: 9.0,
///     vertical_align: VerticalAlign::Bottom,
/// };
/// let m = compute_margin(1108.0 / 1528.0, 399, 600, &percents).unwrap();
/// assert_eq!((m.top, m.bottom, m.left, m.right), (75, 75, 72, 72));
/// ```
pub fn compute_margin(
    canvas_aspect_ratio: f64,
    trimmed_width: u32,
    trimmed_height: u32,
    percents: &MarginPercents,
) -> Result<Margin, AlignError> {
    if !canvas_aspect_ratio.is_finite() || canvas_aspect_ratio <= 0.0 {
        return Err(AlignError::InvalidConfiguration(format!(
            "canvas aspect ratio must be positive, got {canvas_aspect_ratio}"
        )));
    }
    percents.validate()?;

    let w = trimmed_width as i64;
    let h = trimmed_height as i64;

    let margin = match select_constraint(canvas_aspect_ratio, trimmed_width, trimmed_height, percents) {
        Constraint::Height => {
            let image_height_percent = 100.0 - (percents.bottom + percents.min_top);
            let bottom = trunc(h as f64 * percents.bottom / image_height_percent);
            let canvas_height = trunc(h as f64 * 100.0 / image_height_percent);
            let top = canvas_height - h - bottom;

            let canvas_width = trunc(canvas_aspect_ratio * canvas_height as f64);
            let (left, right) = split(canvas_width - w);

            Margin {
                top,
                bottom,
                left,
                right,
            }
        }
        Constraint::Width => {
            let canvas_width = trunc(w as f64 * 100.0 / (100.0 - percents.min_left_right));
            let (left, right) = split(canvas_width - w);
            let canvas_height = trunc(canvas_width as f64 / canvas_aspect_ratio);

            let (top, bottom) = match percents.vertical_align {
                VerticalAlign::Middle => split(canvas_height - h),
                VerticalAlign::Bottom => {
                    let bottom = trunc(percents.bottom * canvas_height as f64 / 100.0);
                    (canvas_height - h - bottom, bottom)
                }
            };

            Margin {
                top,
                bottom,
                left,
                right,
            }
        }
    };

    Ok(margin)
}

/// Split `total` into two halves; the second takes the remainder.
fn split(total: i64) -> (i64, i64) {
    let first = total / 2;
    (first, total - first)
}
