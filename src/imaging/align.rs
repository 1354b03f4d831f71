//! Content-aware alignment: detect → guard → margins → composite.
//!
//! [`plan`] makes every numeric decision without touching pixels;
//! [`align`] carries the plan out. Images whose content already touches an
//! edge of the frame ("full-bleed") come back exactly as they went in.

use super::calculations::{Margin, compute_margin, select_constraint};
use super::color::{ColorThreshold, LIGHT_GRAY, WHITE};
use super::compositor;
use super::edges::{BoundingBox, detect};
use super::overlay;
use super::params::Preset;
use image::{DynamicImage, GenericImageView, Rgba};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlignError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Settings shared by every image of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignOptions {
    pub threshold: ColorThreshold,
    pub fill: Rgba<u8>,
    /// Draw edge markers and pad with light gray. Geometry is unaffected.
    pub debug: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            threshold: ColorThreshold::default(),
            fill: WHITE,
            debug: false,
        }
    }
}

impl AlignOptions {
    fn effective_fill(&self) -> Rgba<u8> {
        if self.debug { LIGHT_GRAY } else { self.fill }
    }
}

/// The numeric outcome of alignment for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentPlan {
    /// Content touches a frame edge; the image is left alone.
    FullBleed(BoundingBox),
    /// Trim/pad the image by `margin` around `bbox`.
    Aligned { bbox: BoundingBox, margin: Margin },
}

impl AlignmentPlan {
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            AlignmentPlan::FullBleed(bbox) => *bbox,
            AlignmentPlan::Aligned { bbox, .. } => *bbox,
        }
    }
}

/// Decide how `image` should be aligned for `preset` on a canvas of
/// `canvas_aspect_ratio` (width / height).
pub fn plan<I>(
    image: &I,
    preset: &Preset,
    canvas_aspect_ratio: f64,
    threshold: &ColorThreshold,
) -> Result<AlignmentPlan, AlignError>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    preset.validate()?;
    let percents = preset.margin_percents();
    percents.validate()?;

    let (width, height) = image.dimensions();
    let bbox = detect(image, threshold);
    debug!(
        left = bbox.left,
        top = bbox.top,
        right = bbox.right,
        bottom = bbox.bottom,
        width,
        height,
        "detected content"
    );

    if bbox.touches_edge(width, height) {
        debug!("content touches the frame, skipping alignment");
        return Ok(AlignmentPlan::FullBleed(bbox));
    }

    let margin = compute_margin(
        canvas_aspect_ratio,
        bbox.trimmed_width(),
        bbox.trimmed_height(),
        &percents,
    )?;
    let constraint = select_constraint(
        canvas_aspect_ratio,
        bbox.trimmed_width(),
        bbox.trimmed_height(),
        &percents,
    );
    debug!(?margin, ?constraint, preset = %preset.name, "computed margins");

    Ok(AlignmentPlan::Aligned { bbox, margin })
}

/// Align `image` for `preset`. Full-bleed images are returned unchanged.
pub fn align(
    image: DynamicImage,
    preset: &Preset,
    canvas_aspect_ratio: f64,
    options: &AlignOptions,
) -> Result<DynamicImage, AlignError> {
    let plan = plan(&image, preset, canvas_aspect_ratio, &options.threshold)?;
    Ok(apply_plan(image, &plan, options))
}

/// Carry out a plan produced by [`plan`] for the same image.
pub fn apply_plan(image: DynamicImage, plan: &AlignmentPlan, options: &AlignOptions) -> DynamicImage {
    match plan {
        AlignmentPlan::FullBleed(_) => image,
        AlignmentPlan::Aligned { bbox, margin } => {
            let source = if options.debug {
                overlay::with_edge_markers(&image, bbox, &options.threshold)
            } else {
                image
            };
            compositor::apply(&source, bbox, margin, options.effective_fill())
        }
    }
}
