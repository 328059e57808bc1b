//! Container metadata.
//!
//! [`ContainerMetadata`] is the summary printed by `gifbundle info`: screen
//! size, frame count, loop count, and total playback time.
//!
//! # Example
//!
//! ```no_run
//! use gifbundle::DEFAULT_REMOTE_TIMEOUT;
//!
//! let metadata = gifbundle::inspect("input.gif", DEFAULT_REMOTE_TIMEOUT)?;
//! println!("{}x{}, {} frames", metadata.width, metadata.height, metadata.frame_count);
//! # Ok::<(), gifbundle::GifBundleError>(())
//! ```

use std::time::Duration;

use crate::{
    container::{Container, Repeat},
    error::GifBundleError,
    source::Origin,
    unpack::load_container,
};

/// Summary of a decoded container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ContainerMetadata {
    /// Where the container was read from.
    pub origin: Origin,
    /// Logical screen width in pixels.
    pub width: u16,
    /// Logical screen height in pixels.
    pub height: u16,
    /// Number of frames.
    pub frame_count: usize,
    /// Loop count.
    pub repeat: Repeat,
    /// Sum of all frame delays.
    pub duration: Duration,
    /// Largest palette used by any frame, in entries.
    pub max_palette_len: usize,
}

impl ContainerMetadata {
    /// Summarise an already decoded container.
    pub fn from_container(container: &Container, origin: Origin) -> Self {
        let centiseconds: u64 = container
            .frames
            .iter()
            .map(|frame| u64::from(frame.delay))
            .sum();

        Self {
            origin,
            width: container.width,
            height: container.height,
            frame_count: container.frames.len(),
            repeat: container.repeat,
            duration: Duration::from_millis(centiseconds * 10),
            max_palette_len: container
                .frames
                .iter()
                .map(|frame| frame.palette_len())
                .max()
                .unwrap_or(0),
        }
    }
}

/// Open and decode `source`, returning its summary.
///
/// # Errors
///
/// Returns the open or decode error of the source.
pub fn inspect(
    source: &str,
    remote_timeout: Duration,
) -> Result<ContainerMetadata, GifBundleError> {
    let (container, origin) = load_container(source, remote_timeout)?;
    Ok(ContainerMetadata::from_container(&container, origin))
}
