//! Image processing: content detection, margin math, compositing and codecs.
//!
//! | Operation | Module / crate |
//! |---|---|
//! | **Detect** content bounding box | [`edges`] (threshold scan + shadow heuristic) |
//! | **Margins** for a preset on a canvas | [`calculations`] (pure integer math) |
//! | **Trim / pad** | [`compositor`] (`image::imageops`) |
//! | **Debug markers** | [`overlay`] |
//! | **Decode / resize / encode** | [`RustBackend`]: `image` + `jpeg-encoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for margin math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Alignment**: [`align()`] and [`plan()`], the numeric pipeline plus pixel work
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining alignment + backend

pub mod align;
pub mod backend;
pub mod calculations;
pub mod color;
pub mod compositor;
pub mod edges;
pub mod operations;
pub mod overlay;
pub mod params;
pub mod rust_backend;

pub use align::{AlignError, AlignOptions, AlignmentPlan, align, plan};
pub use backend::{BackendError, ImageBackend};
pub use calculations::Margin;
pub use color::ColorThreshold;
pub use edges::BoundingBox;
pub use operations::{AlignmentStatus, ProcessJob, ProcessedImage, process_image};
pub use params::{CanvasSpec, EncodeParams, Preset, Quality, VerticalAlign};
pub use rust_backend::RustBackend;
