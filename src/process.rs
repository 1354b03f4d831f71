//! Batch alignment of a directory of product photos.
//!
//! Every supported image directly inside the source directory becomes one
//! JPEG in the output directory:
//!
//! ```text
//! photos/                      aligned/
//! ├── shoe.front.png     →     ├── shoe.jpg
//! ├── bag.JPG            →     ├── bag.jpg
//! ├── notes.txt                │
//! └── old/               (not descended into)
//! ```
//!
//! The output name is the source file name up to its first `.`, plus `.jpg`.
//!
//! ## Parallel Processing
//!
//! Files are processed on a dedicated [rayon](https://docs.rs/rayon) pool.
//! A failing file is reported and skipped; the rest of the batch carries on.
//! Progress is reported as [`ProcessEvent`]s over an optional channel so the
//! caller decides how to display it.

use crate::imaging::operations::OperationError;
use crate::imaging::rust_backend::is_supported_image;
use crate::imaging::{AlignError, AlignmentStatus, BackendError, ImageBackend, ProcessJob, process_image};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Alignment failed: {0}")]
    Align(#[from] AlignError),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("No supported images in {0}")]
    NoImages(PathBuf),
    #[error("Output name {name} is already used by {}", first.display())]
    OutputCollision { name: String, first: PathBuf },
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl From<OperationError> for ProcessError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::Backend(e) => ProcessError::Imaging(e),
            OperationError::Align(e) => ProcessError::Align(e),
        }
    }
}

/// What to process and how.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub job: ProcessJob,
    /// Worker count for the batch pool.
    pub threads: usize,
}

/// Shared flag to stop a running batch. Checked before each file starts.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.cancelled
    }

    /// True when every file produced an output.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Started {
        total: usize,
    },
    FileDone {
        source: PathBuf,
        output: PathBuf,
        alignment: AlignmentStatus,
        completed: usize,
        total: usize,
    },
    FileFailed {
        source: PathBuf,
        error: String,
        completed: usize,
        total: usize,
    },
    FileSkipped {
        source: PathBuf,
    },
    Finished {
        summary: BatchSummary,
    },
}

fn emit(events: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // Receiver gone means nobody is listening; processing continues.
        tx.send(event).ok();
    }
}

/// Supported images directly inside `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    if !dir.is_dir() {
        return Err(ProcessError::SourceNotFound(dir.to_path_buf()));
    }
    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Dangling links and unreadable entries are skipped, not fatal
            Err(e) if e.depth() > 0 => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
            Err(e) => return Err(std::io::Error::from(e).into()),
        };
        let path = entry.path();
        if entry.file_type().is_file() && is_supported_image(path) && output_name(path).is_some() {
            images.push(path.to_path_buf());
        }
    }
    Ok(images)
}

/// Output file name for `source`: its name up to the first `.`, plus `.jpg`.
///
/// Returns `None` for names with nothing before the first dot.
pub fn output_name(source: &Path) -> Option<String> {
    let name = source.file_name()?.to_str()?;
    let stem = name.split('.').next().filter(|s| !s.is_empty())?;
    Some(format!("{stem}.jpg"))
}

/// Pair every source with its output path in `output_dir`.
///
/// A source whose output name was already claimed by an earlier source gets
/// an [`ProcessError::OutputCollision`] instead, so two sources never write
/// (or clean up) the same file. Names are compared case-insensitively since
/// `Shoe.jpg` and `shoe.jpg` are one file on some filesystems.
pub fn assign_outputs(
    files: &[PathBuf],
    output_dir: &Path,
) -> Vec<(PathBuf, Result<PathBuf, ProcessError>)> {
    let mut claimed: HashMap<String, &Path> = HashMap::new();
    files
        .iter()
        .filter_map(|source| {
            let name = output_name(source)?;
            let target = match claimed.get(&name.to_lowercase()) {
                Some(first) => Err(ProcessError::OutputCollision {
                    name,
                    first: first.to_path_buf(),
                }),
                None => {
                    claimed.insert(name.to_lowercase(), source);
                    Ok(output_dir.join(name))
                }
            };
            Some((source.clone(), target))
        })
        .collect()
}

/// Align a single file from `source` into `output`.
///
/// The output file is created before processing starts and removed again if
/// anything fails, so a failed run never leaves a partial JPEG behind.
pub fn process_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    job: &ProcessJob,
) -> Result<AlignmentStatus, ProcessError> {
    let bytes = fs::read(source)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output)?;
    let result = process_image(backend, &bytes, job)
        .map_err(ProcessError::from)
        .and_then(|processed| {
            file.write_all(&processed.bytes)?;
            file.flush()?;
            Ok(processed.alignment)
        });
    drop(file);

    if result.is_err() {
        if let Err(e) = fs::remove_file(output) {
            warn!(output = %output.display(), error = %e, "could not remove partial output");
        }
    }
    result
}

/// Process every image in `request.source_dir`.
///
/// Per-file failures are counted in the summary, not returned as errors.
/// Errors are reserved for problems with the batch itself: a missing source
/// directory, no images, or an output directory that cannot be created.
pub fn run(
    backend: &impl ImageBackend,
    request: &BatchRequest,
    events: Option<Sender<ProcessEvent>>,
    cancel: &CancelToken,
) -> Result<BatchSummary, ProcessError> {
    let files = list_images(&request.source_dir)?;
    if files.is_empty() {
        return Err(ProcessError::NoImages(request.source_dir.clone()));
    }
    fs::create_dir_all(&request.output_dir)?;

    let targets = assign_outputs(&files, &request.output_dir);
    let total = targets.len();
    let events = events.as_ref();
    info!(
        total,
        threads = request.threads,
        preset = %request.job.preset.name,
        source = %request.source_dir.display(),
        "starting batch"
    );
    emit(events, ProcessEvent::Started { total });

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(request.threads.max(1))
        .build()?;

    let completed = AtomicUsize::new(0);
    let succeeded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let cancelled = AtomicUsize::new(0);

    pool.install(|| {
        targets.par_iter().for_each(|(source, target)| {
            if cancel.is_cancelled() {
                cancelled.fetch_add(1, Ordering::SeqCst);
                emit(
                    events,
                    ProcessEvent::FileSkipped {
                        source: source.clone(),
                    },
                );
                return;
            }

            let result = match target {
                Ok(output) => process_file(backend, source, output, &request.job)
                    .map(|alignment| (output.clone(), alignment))
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match result {
                Ok((output, alignment)) => {
                    succeeded.fetch_add(1, Ordering::SeqCst);
                    let completed = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    emit(
                        events,
                        ProcessEvent::FileDone {
                            source: source.clone(),
                            output,
                            alignment,
                            completed,
                            total,
                        },
                    );
                }
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "image failed");
                    failed.fetch_add(1, Ordering::SeqCst);
                    let completed = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    emit(
                        events,
                        ProcessEvent::FileFailed {
                            source: source.clone(),
                            error: e,
                            completed,
                            total,
                        },
                    );
                }
            }
        });
    });

    let summary = BatchSummary {
        succeeded: succeeded.into_inner(),
        failed: failed.into_inner(),
        cancelled: cancelled.into_inner(),
    };
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        cancelled = summary.cancelled,
        "batch finished"
    );
    emit(events, ProcessEvent::Finished { summary });
    Ok(summary)
}
