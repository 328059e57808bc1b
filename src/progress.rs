//! Progress reporting.
//!
//! [`ProgressCallback`] receives a [`ProgressInfo`] snapshot after every
//! frame file written by unpack and every still image read by pack.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gifbundle::{ProgressCallback, ProgressInfo, UnpackOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let options = UnpackOptions::new().with_progress(Arc::new(PrintProgress));
//! gifbundle::unpack("input.gif", &options)?;
//! # Ok::<(), gifbundle::GifBundleError>(())
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

/// The kind of operation currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Writing frames of a container to still images.
    Unpack,
    /// Reading still images to build a container.
    Pack,
}

/// A snapshot of pipeline progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many files have been processed so far.
    pub current: u64,
    /// Total files expected.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// The file that was just processed.
    pub current_path: Option<PathBuf>,
}

/// Trait for receiving progress updates.
///
/// Progress callbacks are **infallible**: they observe but cannot halt the
/// operation.
pub trait ProgressCallback: Send + Sync {
    /// Called once per processed file, and once more when the operation ends.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Internal helper that tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, operation: OperationType) -> Self {
        Self {
            callback,
            operation,
            total: None,
            current: 0,
            start_time: Instant::now(),
        }
    }

    /// A tracker that reports nowhere.
    pub(crate) fn silent(operation: OperationType) -> Self {
        Self::new(Arc::new(NoOpProgress), operation)
    }

    pub(crate) fn set_total(&mut self, total: usize) {
        self.total = Some(total as u64);
    }

    /// Record one processed file.
    pub(crate) fn advance(&mut self, path: &Path) {
        self.current += 1;
        self.report(Some(path.to_path_buf()));
    }

    /// Unconditionally emit a final progress report.
    pub(crate) fn finish(&mut self) {
        self.report(None);
    }

    fn report(&self, current_path: Option<PathBuf>) {
        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
            current_path,
        };

        self.callback.on_progress(&info);
    }
}
