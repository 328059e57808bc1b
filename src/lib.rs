//! # gifbundle
//!
//! Unpack animated GIFs into one palette-indexed PNG per frame, and pack a
//! directory of such PNGs back into a GIF.
//!
//! ## Quick Start
//!
//! ### Unpack a GIF
//!
//! ```no_run
//! use gifbundle::UnpackOptions;
//!
//! // Writes animations/cat_0.png, animations/cat_1.png, ...
//! let report = gifbundle::unpack("animations/cat.gif", &UnpackOptions::new())?;
//! println!("{} frames", report.frame_count);
//! # Ok::<(), gifbundle::GifBundleError>(())
//! ```
//!
//! ### Unpack from a URL
//!
//! ```no_run
//! use gifbundle::UnpackOptions;
//!
//! // Identifiers starting with "http" are downloaded (10 s timeout) and
//! // unpacked into ./output unless a directory is given.
//! gifbundle::unpack("https://example.com/cat.gif", &UnpackOptions::new())?;
//! # Ok::<(), gifbundle::GifBundleError>(())
//! ```
//!
//! ### Pack frames into a GIF
//!
//! ```no_run
//! use gifbundle::PackOptions;
//!
//! gifbundle::pack("animations/frames", "cat.gif", &PackOptions::new())?;
//! # Ok::<(), gifbundle::GifBundleError>(())
//! ```
//!
//! ## Pipeline
//!
//! - **Source acquisition**: [`SourceHandle`] opens a local file or a remote
//!   URL behind one [`Read`](std::io::Read) implementation.
//! - **Container codec**: [`Container`] decodes and encodes whole GIFs as
//!   palette-indexed [`Frame`]s.
//! - **Frame I/O**: [`frames`] derives file names and directories, writes
//!   frames as PNG and reads them back as [`StillImage`]s.
//!
//! Pack only accepts palette-indexed PNGs. An RGB or grayscale PNG is
//! rejected with [`GifBundleError::NotPaletted`]; nothing is quantised.
//!
//! Pack orders files by name with numbers compared numerically
//! ([`FrameOrder::Natural`]), so the files written by unpack come back in
//! frame order. [`FrameOrder::Enumeration`] keeps the raw directory order.

pub mod configuration;
pub mod container;
pub mod error;
pub mod frames;
pub mod metadata;
pub mod pack;
pub mod progress;
pub mod source;
pub mod still;
pub mod unpack;
pub mod validation;

pub use configuration::{FrameOrder, PackOptions, UnpackOptions, WritePolicy};
pub use container::{Container, Frame, Repeat};
pub use error::{ErrorCategory, GifBundleError, OpenErrorKind};
pub use frames::{FrameWriteSummary, SkippedFrame};
pub use metadata::{ContainerMetadata, inspect};
pub use pack::{PackReport, pack};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use source::{DEFAULT_REMOTE_TIMEOUT, Origin, SourceHandle};
pub use still::StillImage;
pub use unpack::{UnpackReport, load_container, unpack};
pub use validation::ValidationReport;
