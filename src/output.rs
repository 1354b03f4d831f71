//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Batch run
//!
//! ```text
//! Aligning 3 photos
//! 001 bag.JPG → bag.jpg
//!     Alignment: aligned
//! 002 broken.png FAILED
//!     Error: Image processing failed: Decode failed: ...
//! 003 shoe.front.png → shoe.jpg
//!     Alignment: full-bleed, resized only
//! Done: 2 aligned, 1 failed, 0 cancelled
//! ```
//!
//! ## Presets
//!
//! ```text
//! Presets (canvas 1108x1528, * = default)
//!   top0-base70   top   0%  base  70%  sides   9%  bottom
//! * top10-base90  top  10%  base  90%  sides   9%  bottom
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::imaging::{AlignmentStatus, CanvasSpec, Preset, VerticalAlign};
use crate::process::{BatchSummary, ProcessEvent};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn alignment_label(status: AlignmentStatus) -> &'static str {
    match status {
        AlignmentStatus::Aligned => "aligned",
        AlignmentStatus::FullBleed => "full-bleed, resized only",
        AlignmentStatus::Disabled => "off, resized only",
    }
}

// ============================================================================
// Batch run
// ============================================================================

/// Format a single batch progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { total } => {
            vec![format!("Aligning {} photos", total)]
        }
        ProcessEvent::FileDone {
            source,
            output,
            alignment,
            completed,
            ..
        } => vec![
            format!(
                "{} {} \u{2192} {}",
                format_index(*completed),
                file_name(source),
                file_name(output)
            ),
            format!("{}Alignment: {}", indent(1), alignment_label(*alignment)),
        ],
        ProcessEvent::FileFailed {
            source,
            error,
            completed,
            ..
        } => vec![
            format!("{} {} FAILED", format_index(*completed), file_name(source)),
            format!("{}Error: {}", indent(1), error),
        ],
        ProcessEvent::FileSkipped { source } => {
            vec![format!("--- {} skipped (cancelled)", file_name(source))]
        }
        ProcessEvent::Finished { summary } => vec![format_summary(summary)],
    }
}

/// One-line outcome of a batch.
pub fn format_summary(summary: &BatchSummary) -> String {
    if summary.all_succeeded() {
        format!("Done: {} photos aligned", summary.succeeded)
    } else {
        format!(
            "Done: {} aligned, {} failed, {} cancelled",
            summary.succeeded, summary.failed, summary.cancelled
        )
    }
}

/// Outcome of a single-file `align` run.
pub fn format_single_result(source: &Path, output: &Path, status: AlignmentStatus) -> Vec<String> {
    vec![
        format!("{} \u{2192} {}", source.display(), output.display()),
        format!("{}Alignment: {}", indent(1), alignment_label(status)),
    ]
}

// ============================================================================
// Presets
// ============================================================================

/// List presets, marking the default one with `*`.
pub fn format_presets(presets: &[Preset], default: &str, canvas: &CanvasSpec) -> Vec<String> {
    let width = presets.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut lines = vec![format!(
        "Presets (canvas {}x{}, * = default)",
        canvas.width, canvas.height
    )];
    for preset in presets {
        let marker = if preset.name == default { '*' } else { ' ' };
        let align = match preset.vertical_align {
            VerticalAlign::Bottom => "bottom",
            VerticalAlign::Middle => "middle",
        };
        lines.push(format!(
            "{} {:<width$}  top {:>3}%  base {:>3}%  sides {:>3}%  {}",
            marker,
            preset.name,
            preset.top_line,
            preset.base_line,
            preset.left_right_margin,
            align,
        ));
    }
    lines
}

pub fn print_presets(presets: &[Preset], default: &str, canvas: &CanvasSpec) {
    for line in format_presets(presets, default, canvas) {
        println!("{}", line);
    }
}
