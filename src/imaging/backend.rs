//! Image codec backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the pipeline needs
//! from the outside world: decode, resize, and encode. Alignment itself is
//! pure pixel math and never goes through the backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the recording
//! [`MockBackend`](tests::MockBackend).

use super::params::{EncodeParams, ResizeParams};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported image format")]
    UnsupportedFormat,
    #[error("Decode failed: {0}")]
    DecodeFailed(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image codec backends.
///
/// Implementations must be `Sync`: the batch driver shares one backend across
/// its worker threads.
pub trait ImageBackend: Sync {
    /// Decode an encoded image. The format is sniffed from the bytes.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Resample to exactly `params.width × params.height`.
    fn resize(&self, image: &DynamicImage, params: &ResizeParams) -> Result<DynamicImage, BackendError>;

    /// Encode as JPEG.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError>;
}
