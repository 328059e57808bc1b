//! Pipeline configuration.
//!
//! [`UnpackOptions`] and [`PackOptions`] carry everything the two entry
//! points need besides their paths: output directory overrides, failure
//! policy, frame ordering, and a progress callback.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use gifbundle::{FrameOrder, PackOptions, UnpackOptions, WritePolicy};
//!
//! let unpack = UnpackOptions::new()
//!     .with_output_directory("frames")
//!     .with_write_policy(WritePolicy::SkipFailedFrames)
//!     .with_remote_timeout(Duration::from_secs(5));
//!
//! let pack = PackOptions::new()
//!     .with_order(FrameOrder::Lexicographic)
//!     .with_overwrite(true);
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use crate::{
    container::Repeat,
    progress::{NoOpProgress, ProgressCallback},
    source::DEFAULT_REMOTE_TIMEOUT,
};

/// What unpack does when one frame cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Abort on the first create or encode failure. Files written before the
    /// failing frame stay on disk. This is the default.
    #[default]
    FailFast,
    /// Log a PNG encode failure, remove the partial file, and continue with
    /// the next frame. A file that cannot be created still aborts.
    SkipFailedFrames,
}

/// How pack orders the files it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameOrder {
    /// By file name, comparing digit runs numerically (`a_2` before `a_10`).
    /// This is the default and matches the names unpack writes.
    #[default]
    Natural,
    /// By file name, byte-wise.
    Lexicographic,
    /// As returned by the directory listing. Filesystem dependent.
    Enumeration,
}

/// Options for [`unpack`](crate::unpack).
#[derive(Clone)]
pub struct UnpackOptions {
    pub(crate) output_directory: Option<PathBuf>,
    pub(crate) write_policy: WritePolicy,
    pub(crate) remote_timeout: Duration,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for UnpackOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("UnpackOptions")
            .field("output_directory", &self.output_directory)
            .field("write_policy", &self.write_policy)
            .field("remote_timeout", &self.remote_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            output_directory: None,
            write_policy: WritePolicy::default(),
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            progress: Arc::new(NoOpProgress),
        }
    }
}

impl UnpackOptions {
    /// Default options: derived output directory, fail-fast, 10 s timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write frames into `directory` instead of the derived default.
    #[must_use]
    pub fn with_output_directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.output_directory = Some(directory.as_ref().to_path_buf());
        self
    }

    /// Choose how per-frame write failures are handled.
    #[must_use]
    pub fn with_write_policy(mut self, policy: WritePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    /// Bound remote retrievals by `timeout`.
    #[must_use]
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Receive a callback after every frame file.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The explicit output directory, if one was set.
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }
}

/// Options for [`pack`](crate::pack).
#[derive(Clone)]
pub struct PackOptions {
    pub(crate) order: FrameOrder,
    pub(crate) overwrite: bool,
    pub(crate) repeat: Repeat,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for PackOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PackOptions")
            .field("order", &self.order)
            .field("overwrite", &self.overwrite)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            order: FrameOrder::default(),
            overwrite: false,
            repeat: Repeat::Infinite,
            progress: Arc::new(NoOpProgress),
        }
    }
}

impl PackOptions {
    /// Default options: natural order, no overwrite, loop forever.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how discovered files are ordered into frames.
    #[must_use]
    pub fn with_order(mut self, order: FrameOrder) -> Self {
        self.order = order;
        self
    }

    /// Allow replacing an existing output file.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Set the loop count of the packed animation.
    #[must_use]
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Receive a callback after every still image read.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::{path::Path, time::Duration};

    use super::*;

    #[test]
    fn unpack_defaults() {
        let options = UnpackOptions::new();
        assert_eq!(options.output_directory(), None);
        assert_eq!(options.write_policy, WritePolicy::FailFast);
        assert_eq!(options.remote_timeout, Duration::from_secs(10));
    }

    #[test]
    fn unpack_builder_chain() {
        let options = UnpackOptions::new()
            .with_output_directory("frames")
            .with_write_policy(WritePolicy::SkipFailedFrames)
            .with_remote_timeout(Duration::from_secs(3));
        assert_eq!(options.output_directory(), Some(Path::new("frames")));
        assert_eq!(options.write_policy, WritePolicy::SkipFailedFrames);
        assert_eq!(options.remote_timeout, Duration::from_secs(3));
    }

    #[test]
    fn pack_defaults() {
        let options = PackOptions::new();
        assert_eq!(options.order, FrameOrder::Natural);
        assert!(!options.overwrite);
        assert_eq!(options.repeat, Repeat::Infinite);
    }
}
