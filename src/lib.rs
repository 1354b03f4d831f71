//! # product-align
//!
//! Content-aware alignment of product photographs. Shop photos arrive with the
//! product anywhere in the frame; this crate finds the product on its plain
//! background and re-frames it so that every photo in a catalogue shares the
//! same layout: the product rests on a common base line, keeps a minimum
//! distance from the top, and has equal free space left and right.
//!
//! # Pipeline
//!
//! ```text
//! decode → detect bounding box → full-bleed guard → margins → trim/pad → resize → encode
//! ```
//!
//! Detection, margin math and compositing are pure functions of one image plus
//! a [`Preset`](imaging::Preset) and the canvas aspect ratio; only decoding,
//! resampling and encoding go through the [`ImageBackend`](imaging::ImageBackend)
//! trait. Photos whose content already touches the frame are passed through
//! untouched before the final resize.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Edge detection, margin calculation, compositing, debug overlay, codecs |
//! | [`process`] | Batch driver: directory listing, worker pool, progress events, cancellation |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for batch progress and preset listings |
//!
//! # Presets
//!
//! A preset is three percentages of the final canvas:
//!
//! - `top_line`: minimal free space above the product
//! - `base_line`: where the product's bottom edge sits, measured from the top
//! - `left_right_margin`: minimal combined free space left and right
//!
//! plus a vertical alignment (`bottom` rests the product on the base line,
//! `middle` centers it). The stock set covers top lines 0 and 10 with base
//! lines 70, 80 and 90.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
