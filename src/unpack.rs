//! Unpacking: container → frame files.
//!
//! [`unpack`] opens a source, decodes the whole container, and writes one
//! palette-indexed PNG per frame.
//!
//! # Example
//!
//! ```no_run
//! use gifbundle::UnpackOptions;
//!
//! let report = gifbundle::unpack("animations/cat.gif", &UnpackOptions::new())?;
//! // animations/cat_0.png, animations/cat_1.png, ...
//! println!("{} files in {}", report.written.len(), report.output_directory.display());
//! # Ok::<(), gifbundle::GifBundleError>(())
//! ```

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use crate::{
    configuration::UnpackOptions,
    container::Container,
    error::{GifBundleError, OpenErrorKind},
    frames::{
        SkippedFrame, frame_base_name, prepare_output_directory, resolve_output_directory,
        write_frames_tracked,
    },
    progress::{OperationType, ProgressTracker},
    source::{Origin, SourceHandle},
};

/// Outcome of a successful [`unpack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackReport {
    /// Where the source was read from.
    pub origin: Origin,
    /// Directory the frames were written into.
    pub output_directory: PathBuf,
    /// Logical screen width of the container.
    pub width: u16,
    /// Logical screen height of the container.
    pub height: u16,
    /// Number of frames in the container.
    pub frame_count: usize,
    /// Files written, in frame order.
    pub written: Vec<PathBuf>,
    /// Frames left out under [`WritePolicy::SkipFailedFrames`](crate::WritePolicy).
    pub skipped: Vec<SkippedFrame>,
}

/// Open `source` and decode it completely.
///
/// The source handle is released before this returns, on success and on
/// failure alike. A remote transfer that stalls past `remote_timeout` while
/// the body is being decoded is reported as an
/// [`OpenErrorKind::Timeout`] open error, not as a decode error.
pub fn load_container(
    source: &str,
    remote_timeout: Duration,
) -> Result<(Container, Origin), GifBundleError> {
    let mut handle = SourceHandle::open_with_timeout(source, remote_timeout)?;
    let origin = handle.origin();

    log::debug!("Decoding '{source}'");
    let start = Instant::now();
    let container = match Container::decode(&mut handle, source) {
        Ok(container) => container,
        Err(GifBundleError::ContainerDecode { reason, .. }) if handle.timed_out() => {
            return Err(GifBundleError::SourceOpen {
                identifier: source.to_string(),
                kind: OpenErrorKind::Timeout,
                reason,
            });
        }
        Err(error) => return Err(error),
    };
    log::info!(
        "Decoded '{source}' in {}ms: {}x{}, {} frame(s)",
        start.elapsed().as_millis(),
        container.width,
        container.height,
        container.frames.len()
    );

    Ok((container, origin))
}

/// Unpack the container at `source` into one PNG file per frame.
///
/// `source` is a local path or an `http(s)` URL. Frames are written as
/// `{output_directory}/{base}_{index}.png` where `base` is the source's file
/// name without extension. Without an explicit output directory, local
/// sources unpack next to themselves and remote sources into `output`.
///
/// Nothing is written to disk unless the whole container decodes.
///
/// # Errors
///
/// Returns the first open, decode, or write error. Under
/// [`WritePolicy::FailFast`](crate::WritePolicy::FailFast), frames written
/// before a failing frame remain on disk.
pub fn unpack(source: &str, options: &UnpackOptions) -> Result<UnpackReport, GifBundleError> {
    let (container, origin) = load_container(source, options.remote_timeout)?;

    let output_directory =
        resolve_output_directory(source, origin, options.output_directory.as_deref());
    prepare_output_directory(&output_directory)?;

    let base_name = frame_base_name(source, origin);
    let mut tracker = ProgressTracker::new(options.progress.clone(), OperationType::Unpack);
    let summary = write_frames_tracked(
        &container.frames,
        &output_directory,
        &base_name,
        options.write_policy,
        &mut tracker,
    )?;

    Ok(UnpackReport {
        origin,
        output_directory,
        width: container.width,
        height: container.height,
        frame_count: container.frames.len(),
        written: summary.written,
        skipped: summary.skipped,
    })
}
