//! Frame files on disk.
//!
//! Unpack side: deriving the output directory and `{base}_{index}.png` names,
//! and writing frames under a [`WritePolicy`]. Pack side: enumerating an input
//! directory and reading every entry as a [`StillImage`], in [`FrameOrder`].

use std::{
    cmp::Ordering,
    fs,
    io::ErrorKind as IoErrorKind,
    iter::Peekable,
    path::{Path, PathBuf},
    str::Chars,
    time::Instant,
};

use crate::{
    configuration::{FrameOrder, WritePolicy},
    container::Frame,
    error::GifBundleError,
    progress::{OperationType, ProgressTracker},
    source::Origin,
    still::{self, FRAME_EXTENSION, StillImage, StillWriteError},
};

/// Directory remote sources are unpacked into when none is given.
pub const REMOTE_OUTPUT_DIRECTORY: &str = "output";

const FALLBACK_BASE_NAME: &str = "frame";

/// A frame that [`WritePolicy::SkipFailedFrames`] left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFrame {
    /// Zero-based frame index.
    pub index: usize,
    /// The file that would have been written.
    pub path: PathBuf,
    /// Why encoding failed.
    pub reason: String,
}

/// Outcome of [`write_frames`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameWriteSummary {
    /// Files written, in frame order.
    pub written: Vec<PathBuf>,
    /// Frames skipped under [`WritePolicy::SkipFailedFrames`].
    pub skipped: Vec<SkippedFrame>,
}

/// The file name of frame `index`: `{base_name}_{index}.png`.
pub fn frame_file_name(base_name: &str, index: usize) -> String {
    format!("{base_name}_{index}.{FRAME_EXTENSION}")
}

/// The base name frame files are derived from.
///
/// The last path segment of `identifier` without its extension. For remote
/// URLs the query string and fragment are dropped first. Falls back to
/// `frame` when nothing is left.
pub fn frame_base_name(identifier: &str, origin: Origin) -> String {
    let trimmed = match origin {
        Origin::RemoteUrl => identifier
            .split(['?', '#'])
            .next()
            .unwrap_or(identifier)
            .rsplit('/')
            .next()
            .unwrap_or_default(),
        Origin::LocalFile => identifier,
    };

    Path::new(trimmed)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string())
}

/// Where unpack writes frames.
///
/// An explicit directory always wins. Otherwise local sources unpack next to
/// themselves and remote sources into [`REMOTE_OUTPUT_DIRECTORY`].
pub fn resolve_output_directory(
    identifier: &str,
    origin: Origin,
    explicit: Option<&Path>,
) -> PathBuf {
    if let Some(directory) = explicit {
        log::debug!("Using configured output directory '{}'", directory.display());
        return directory.to_path_buf();
    }

    let directory = match origin {
        Origin::LocalFile => Path::new(identifier)
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        Origin::RemoteUrl => PathBuf::from(REMOTE_OUTPUT_DIRECTORY),
    };
    log::debug!("Defaulting output directory to '{}'", directory.display());
    directory
}

/// Make sure `directory` exists, creating it and its parents if needed.
///
/// # Errors
///
/// Returns [`GifBundleError::OutputDirectory`] if something other than a
/// directory already exists at that path, or it cannot be created.
pub fn prepare_output_directory(directory: &Path) -> Result<(), GifBundleError> {
    let directory_error = |reason: String| GifBundleError::OutputDirectory {
        path: directory.to_path_buf(),
        reason,
    };

    match fs::metadata(directory) {
        Ok(metadata) if metadata.is_dir() => {
            log::debug!("Output directory exists");
            Ok(())
        }
        Ok(_) => Err(directory_error("exists and is not a directory".to_string())),
        Err(error) if error.kind() == IoErrorKind::NotFound => {
            log::info!("Creating output directory '{}'", directory.display());
            fs::create_dir_all(directory).map_err(|error| directory_error(error.to_string()))
        }
        Err(error) => Err(directory_error(error.to_string())),
    }
}

/// Write every frame as `{output_directory}/{base_name}_{index}.png`.
///
/// Existing files with the same names are overwritten without asking, unlike
/// [`pack`](crate::pack) which refuses an existing output unless
/// [`PackOptions::with_overwrite`](crate::PackOptions::with_overwrite) is set.
///
/// Writing is not atomic: when a frame fails, the files written before it
/// remain. See [`WritePolicy`] for which failures abort.
///
/// # Errors
///
/// Returns [`GifBundleError::FrameWrite`] for the first failure that aborts.
pub fn write_frames(
    frames: &[Frame],
    output_directory: &Path,
    base_name: &str,
    policy: WritePolicy,
) -> Result<FrameWriteSummary, GifBundleError> {
    let mut tracker = ProgressTracker::silent(OperationType::Unpack);
    write_frames_tracked(frames, output_directory, base_name, policy, &mut tracker)
}

pub(crate) fn write_frames_tracked(
    frames: &[Frame],
    output_directory: &Path,
    base_name: &str,
    policy: WritePolicy,
    tracker: &mut ProgressTracker,
) -> Result<FrameWriteSummary, GifBundleError> {
    let start = Instant::now();
    let mut summary = FrameWriteSummary::default();
    tracker.set_total(frames.len());

    for (index, frame) in frames.iter().enumerate() {
        let path = output_directory.join(frame_file_name(base_name, index));
        log::debug!("Creating file for frame {index}: '{}'", path.display());

        match still::write_frame(frame, &path) {
            Ok(()) => {
                tracker.advance(&path);
                summary.written.push(path);
            }
            Err(StillWriteError::Create(error)) => {
                return Err(GifBundleError::FrameWrite {
                    index,
                    path,
                    reason: error.to_string(),
                });
            }
            Err(StillWriteError::Encode(reason)) => match policy {
                WritePolicy::FailFast => {
                    return Err(GifBundleError::FrameWrite {
                        index,
                        path,
                        reason,
                    });
                }
                WritePolicy::SkipFailedFrames => {
                    log::warn!(
                        "Failed writing frame {index} to '{}': {reason}",
                        path.display()
                    );
                    if let Err(error) = fs::remove_file(&path) {
                        log::warn!(
                            "Could not remove partial file '{}': {error}",
                            path.display()
                        );
                    }
                    tracker.advance(&path);
                    summary.skipped.push(SkippedFrame {
                        index,
                        path,
                        reason,
                    });
                }
            },
        }
    }

    tracker.finish();
    log::info!(
        "Wrote {} frame(s) in {}ms",
        summary.written.len(),
        start.elapsed().as_millis()
    );
    Ok(summary)
}

/// Read every file in `input_directory` as a still image.
///
/// Nested directories are skipped. Every other entry must be a PNG file;
/// there is no filtering by extension.
///
/// # Errors
///
/// - [`GifBundleError::DirectoryRead`] if the directory is missing, is not a
///   directory, or cannot be listed.
/// - [`GifBundleError::StillDecode`] for the first entry that is not a PNG.
pub fn read_frames(
    input_directory: &Path,
    order: FrameOrder,
) -> Result<Vec<(StillImage, PathBuf)>, GifBundleError> {
    let mut tracker = ProgressTracker::silent(OperationType::Pack);
    read_frames_tracked(input_directory, order, None, &mut tracker)
}

/// `excluded` is left out of discovery, so pack never reads its own output.
pub(crate) fn read_frames_tracked(
    input_directory: &Path,
    order: FrameOrder,
    excluded: Option<&Path>,
    tracker: &mut ProgressTracker,
) -> Result<Vec<(StillImage, PathBuf)>, GifBundleError> {
    let paths = discover_files_excluding(input_directory, order, excluded)?;
    tracker.set_total(paths.len());

    let start = Instant::now();
    let mut stills = Vec::with_capacity(paths.len());
    for path in paths {
        let still = StillImage::read(&path)?;
        tracker.advance(&path);
        stills.push((still, path));
    }

    tracker.finish();
    log::info!(
        "Read {} still image(s) in {}ms",
        stills.len(),
        start.elapsed().as_millis()
    );
    Ok(stills)
}

/// List the non-directory entries of `input_directory`, in `order`.
pub fn discover_files(
    input_directory: &Path,
    order: FrameOrder,
) -> Result<Vec<PathBuf>, GifBundleError> {
    discover_files_excluding(input_directory, order, None)
}

fn discover_files_excluding(
    input_directory: &Path,
    order: FrameOrder,
    excluded: Option<&Path>,
) -> Result<Vec<PathBuf>, GifBundleError> {
    let excluded = excluded.and_then(|path| fs::canonicalize(path).ok());
    let read_error = |reason: String| GifBundleError::DirectoryRead {
        path: input_directory.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(input_directory).map_err(|error| read_error(error.to_string()))?;
    if !metadata.is_dir() {
        return Err(read_error("not a directory".to_string()));
    }

    let start = Instant::now();
    let mut paths = Vec::new();
    for entry in fs::read_dir(input_directory).map_err(|error| read_error(error.to_string()))? {
        let entry = entry.map_err(|error| read_error(error.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            log::debug!("Skipping directory '{}'", path.display());
            continue;
        }
        if excluded.is_some() && fs::canonicalize(&path).ok() == excluded {
            log::debug!("Skipping output file '{}'", path.display());
            continue;
        }
        log::debug!("Discovered file '{}'", path.display());
        paths.push(path);
    }

    match order {
        FrameOrder::Natural => {
            paths.sort_by(|left, right| natural_cmp(&name_of(left), &name_of(right)));
        }
        FrameOrder::Lexicographic => {
            paths.sort_by(|left, right| left.file_name().cmp(&right.file_name()));
        }
        FrameOrder::Enumeration => {}
    }

    log::info!(
        "Discovered {} file(s) in {}ms",
        paths.len(),
        start.elapsed().as_millis()
    );
    Ok(paths)
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compare two names, treating runs of ASCII digits as numbers.
pub(crate) fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut left = left.chars().peekable();
    let mut right = right.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ordering =
                    compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        run.push(digit);
    }
    run
}

fn compare_digit_runs(left: &str, right: &str) -> Ordering {
    let left_value = left.trim_start_matches('0');
    let right_value = right.trim_start_matches('0');
    left_value
        .len()
        .cmp(&right_value.len())
        .then_with(|| left_value.cmp(right_value))
        .then_with(|| left.len().cmp(&right.len()))
}
