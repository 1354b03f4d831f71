//! High-level image operations.
//!
//! These functions combine the alignment pipeline with backend execution:
//! decode → align → resize to canvas → encode.

use super::align::{AlignError, AlignOptions, AlignmentPlan, apply_plan, plan};
use super::backend::{BackendError, ImageBackend};
use super::params::{CanvasSpec, EncodeParams, Preset, ResizeParams};
use image::{DynamicImage, GenericImageView};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Align(#[from] AlignError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Everything needed to turn one source image into one canvas-sized JPEG.
#[derive(Debug, Clone)]
pub struct ProcessJob {
    pub preset: Preset,
    pub canvas: CanvasSpec,
    /// `None` skips alignment; the image is only resized and encoded.
    pub align: Option<AlignOptions>,
    pub encode: EncodeParams,
}

/// What alignment did to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStatus {
    Aligned,
    /// Content touched the frame; the image was only resized.
    FullBleed,
    Disabled,
}

#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub alignment: AlignmentStatus,
    pub source_dimensions: (u32, u32),
}

/// Align `image` for the job, reporting what happened.
pub fn align_for_job(image: DynamicImage, job: &ProcessJob) -> Result<(DynamicImage, AlignmentStatus)> {
    let Some(options) = &job.align else {
        return Ok((image, AlignmentStatus::Disabled));
    };
    let plan = plan(&image, &job.preset, job.canvas.aspect_ratio(), &options.threshold)?;
    let status = match plan {
        AlignmentPlan::FullBleed(_) => AlignmentStatus::FullBleed,
        AlignmentPlan::Aligned { .. } => AlignmentStatus::Aligned,
    };
    Ok((apply_plan(image, &plan, options), status))
}

/// Run the full single-image pipeline on encoded `bytes`.
pub fn process_image(
    backend: &impl ImageBackend,
    bytes: &[u8],
    job: &ProcessJob,
) -> Result<ProcessedImage> {
    let image = backend.decode(bytes)?;
    let source_dimensions = image.dimensions();

    let (aligned, alignment) = align_for_job(image, job)?;
    debug!(
        ?alignment,
        from = ?source_dimensions,
        to = ?aligned.dimensions(),
        "aligned image"
    );

    let resized = backend.resize(&aligned, &ResizeParams::from(job.canvas))?;
    let bytes = backend.encode(&resized, &job.encode)?;

    Ok(ProcessedImage {
        bytes,
        alignment,
        source_dimensions,
    })
}
