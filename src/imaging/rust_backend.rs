//! Pure Rust codec backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP, GIF, TIFF) | `image::ImageReader` with format sniffing |
//! | Resize | `image::DynamicImage::resize_to_fill` with `Lanczos3` |
//! | Encode → JPEG | `jpeg_encoder::Encoder` (baseline or progressive) |

use super::backend::{BackendError, ImageBackend};
use super::params::{EncodeParams, ResizeParams};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError, ImageFormat, ImageReader};
use jpeg_encoder::{ColorType, Encoder};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has a supported extension (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Pure Rust backend using the `image` and `jpeg-encoder` crates.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        if reader.format().is_none() {
            return Err(BackendError::UnsupportedFormat);
        }
        reader.decode().map_err(|e| match e {
            ImageError::Unsupported(_) => BackendError::UnsupportedFormat,
            ImageError::IoError(io) => BackendError::Io(io),
            other => BackendError::DecodeFailed(other.to_string()),
        })
    }

    fn resize(&self, image: &DynamicImage, params: &ResizeParams) -> Result<DynamicImage, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Cannot resize to {}x{}",
                params.width, params.height
            )));
        }
        if image.dimensions() == (params.width, params.height) {
            return Ok(image.clone());
        }
        // Fill-resize then center-crop to exact dimensions
        Ok(image.resize_to_fill(params.width, params.height, FilterType::Lanczos3))
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
        let (width, height) = image.dimensions();
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(BackendError::EncodeFailed(format!(
                "{width}x{height} exceeds the JPEG size limit"
            )));
        };

        // JPEG has no alpha channel; it is dropped here.
        let rgb = image.to_rgb8();
        let mut buf = Vec::new();
        let mut encoder = Encoder::new(&mut buf, params.quality.value() as u8);
        encoder.set_progressive(params.progressive);
        encoder
            .encode(rgb.as_raw(), w, h, ColorType::Rgb)
            .map_err(|e| BackendError::EncodeFailed(e.to_string()))?;
        Ok(buf)
    }
}
