//! Error types for the `gifbundle` crate.
//!
//! This module defines [`GifBundleError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry the path or identifier
//! they relate to, so a caller can report them without further lookup.
//!
//! Every variant belongs to one [`ErrorCategory`], which mirrors the five
//! stages of the pipeline (open, decode, encode, write, read).

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io::{Error as IoError, ErrorKind as IoErrorKind},
    path::PathBuf,
};

use thiserror::Error;

/// Why a source could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OpenErrorKind {
    /// The local file does not exist.
    NotFound,
    /// The local file exists but may not be read.
    PermissionDenied,
    /// The remote retrieval did not complete within the configured timeout.
    Timeout,
    /// The remote retrieval failed (DNS, connection, TLS, HTTP status).
    Network,
    /// Any other failure reported by the operating system.
    Other,
}

impl OpenErrorKind {
    /// Classify an I/O error from a local open call.
    pub(crate) fn from_io(error: &IoError) -> Self {
        match error.kind() {
            IoErrorKind::NotFound => OpenErrorKind::NotFound,
            IoErrorKind::PermissionDenied => OpenErrorKind::PermissionDenied,
            IoErrorKind::TimedOut | IoErrorKind::WouldBlock => OpenErrorKind::Timeout,
            _ => OpenErrorKind::Other,
        }
    }
}

impl Display for OpenErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let label = match self {
            OpenErrorKind::NotFound => "not found",
            OpenErrorKind::PermissionDenied => "permission denied",
            OpenErrorKind::Timeout => "timed out",
            OpenErrorKind::Network => "network error",
            OpenErrorKind::Other => "open failed",
        };
        f.write_str(label)
    }
}

/// The pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Source acquisition (local file or remote URL).
    Open,
    /// Malformed container or still image.
    Decode,
    /// Frames that cannot be assembled into a container.
    Encode,
    /// Filesystem output.
    Write,
    /// Filesystem input.
    Read,
}

/// The unified error type for all `gifbundle` operations.
///
/// Every public function that can fail returns `Result<T, GifBundleError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GifBundleError {
    /// The source identifier could not be opened.
    #[error("Failed to open source {identifier} ({kind}): {reason}")]
    SourceOpen {
        /// Path or URL passed to [`SourceHandle::open`](crate::SourceHandle::open).
        identifier: String,
        /// Classified failure.
        kind: OpenErrorKind,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The container byte stream is not a well-formed GIF.
    #[error("Failed to decode GIF from {source_name}: {reason}")]
    ContainerDecode {
        /// Identifier of the stream being decoded.
        source_name: String,
        /// What was wrong with the stream.
        reason: String,
    },

    /// A still-image file could not be decoded as PNG.
    #[error("Failed to decode still image {path}: {reason}")]
    StillDecode {
        /// File that failed to decode.
        path: PathBuf,
        /// Upstream decoder message.
        reason: String,
    },

    /// A still image is not palette-indexed and cannot become a GIF frame.
    #[error("Still image {path} is not palette-indexed (color type {color_type})")]
    NotPaletted {
        /// Offending file.
        path: PathBuf,
        /// The PNG color type that was found instead.
        color_type: String,
    },

    /// A frame does not fit inside the logical screen of the container.
    #[error(
        "Frame {index} ({frame_width}x{frame_height} at {left},{top}) exceeds the {width}x{height} screen"
    )]
    FrameOutOfBounds {
        /// Zero-based frame index.
        index: usize,
        /// Frame width.
        frame_width: u16,
        /// Frame height.
        frame_height: u16,
        /// Horizontal offset.
        left: u16,
        /// Vertical offset.
        top: u16,
        /// Logical screen width.
        width: u16,
        /// Logical screen height.
        height: u16,
    },

    /// There were no frames to pack.
    #[error("No frames to pack")]
    NoFrames,

    /// GIF encoding failed.
    #[error("GIF encoding error: {0}")]
    ContainerEncode(String),

    /// A frame could not be written to disk.
    #[error("Failed to write frame {index} to {path}: {reason}")]
    FrameWrite {
        /// Zero-based frame index.
        index: usize,
        /// Destination file.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The output directory could not be prepared.
    #[error("Output directory {path} is unusable: {reason}")]
    OutputDirectory {
        /// Directory that was requested or derived.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The output file already exists and overwriting was not allowed.
    #[error("Output already exists: {0} (enable overwrite to replace)")]
    OutputExists(PathBuf),

    /// The pack input directory could not be read.
    #[error("Failed to read directory {path}: {reason}")]
    DirectoryRead {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The packed container could not be written to its output file.
    #[error("Failed to write {path}: {reason}")]
    OutputWrite {
        /// Destination file.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },
}

impl GifBundleError {
    /// The pipeline stage this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GifBundleError::SourceOpen { .. } => ErrorCategory::Open,
            GifBundleError::ContainerDecode { .. } | GifBundleError::StillDecode { .. } => {
                ErrorCategory::Decode
            }
            GifBundleError::NotPaletted { .. }
            | GifBundleError::FrameOutOfBounds { .. }
            | GifBundleError::NoFrames
            | GifBundleError::ContainerEncode(_) => ErrorCategory::Encode,
            GifBundleError::FrameWrite { .. }
            | GifBundleError::OutputDirectory { .. }
            | GifBundleError::OutputExists(_)
            | GifBundleError::OutputWrite { .. } => ErrorCategory::Write,
            GifBundleError::DirectoryRead { .. } => ErrorCategory::Read,
        }
    }

    /// The open failure kind, if this is an open error.
    pub fn open_kind(&self) -> Option<OpenErrorKind> {
        match self {
            GifBundleError::SourceOpen { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<gif::EncodingError> for GifBundleError {
    fn from(error: gif::EncodingError) -> Self {
        GifBundleError::ContainerEncode(error.to_string())
    }
}
