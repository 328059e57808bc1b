//! Packing: frame files → container.
//!
//! [`pack`] reads every still image in a directory, checks that each one is
//! palette-indexed, and writes them as the frames of one GIF.
//!
//! # Example
//!
//! ```no_run
//! use gifbundle::{FrameOrder, PackOptions};
//!
//! let options = PackOptions::new().with_order(FrameOrder::Natural);
//! let report = gifbundle::pack("animations/frames", "animations/cat.gif", &options)?;
//! println!("Packed {} frames", report.frame_count);
//! # Ok::<(), gifbundle::GifBundleError>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use crate::{
    configuration::PackOptions,
    container::Container,
    error::GifBundleError,
    frames::read_frames_tracked,
    progress::{OperationType, ProgressTracker},
};

/// Outcome of a successful [`pack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// The GIF that was written.
    pub output_path: PathBuf,
    /// Logical screen width, taken from the first frame.
    pub width: u16,
    /// Logical screen height, taken from the first frame.
    pub height: u16,
    /// Number of frames packed.
    pub frame_count: usize,
    /// Size of the written file.
    pub bytes_written: usize,
}

/// Pack the still images in `input_directory` into the GIF `output_file`.
///
/// Every non-directory entry must be a palette-indexed PNG, apart from
/// `output_file` itself when it lives inside `input_directory`. Frames get a
/// delay of zero and are ordered per [`PackOptions::with_order`]. The GIF is
/// encoded in memory first, so the output file is only created once all
/// frames were accepted.
///
/// # Errors
///
/// - [`GifBundleError::OutputExists`] when the output exists and overwriting
///   was not allowed.
/// - [`GifBundleError::DirectoryRead`] when the input is not a readable
///   directory.
/// - [`GifBundleError::StillDecode`] when an entry is not a PNG.
/// - [`GifBundleError::NotPaletted`] when a PNG is not palette-indexed.
/// - [`GifBundleError::NoFrames`] when the directory holds no files.
pub fn pack<P: AsRef<Path>, Q: AsRef<Path>>(
    input_directory: P,
    output_file: Q,
    options: &PackOptions,
) -> Result<PackReport, GifBundleError> {
    let input_directory = input_directory.as_ref();
    let output_file = output_file.as_ref();

    if output_file.exists() {
        if !options.overwrite {
            return Err(GifBundleError::OutputExists(output_file.to_path_buf()));
        }
        log::warn!("Overwriting '{}'", output_file.display());
    }

    log::debug!("Reading directory '{}'", input_directory.display());
    let mut tracker = ProgressTracker::new(options.progress.clone(), OperationType::Pack);
    let stills = read_frames_tracked(
        input_directory,
        options.order,
        Some(output_file),
        &mut tracker,
    )?;

    let start = Instant::now();
    let mut container = Container::from_stills(stills)?;
    container.repeat = options.repeat;
    let bytes = container.encode_to_vec()?;
    log::info!(
        "Packed {} frame(s) in {}ms",
        container.frames.len(),
        start.elapsed().as_millis()
    );

    fs::write(output_file, &bytes).map_err(|error| GifBundleError::OutputWrite {
        path: output_file.to_path_buf(),
        reason: error.to_string(),
    })?;
    log::info!("Created '{}'", output_file.display());

    Ok(PackReport {
        output_path: output_file.to_path_buf(),
        width: container.width,
        height: container.height,
        frame_count: container.frames.len(),
        bytes_written: bytes.len(),
    })
}
