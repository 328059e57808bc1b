//! GIF container decoding and encoding.
//!
//! A [`Container`] is the fully decoded form of an animated GIF: the logical
//! screen size, the loop count, and every [`Frame`] as a palette-indexed
//! raster. Decoding is all-or-nothing; encoding writes frames in exactly the
//! order they are stored.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//!
//! use gifbundle::{Container, GifBundleError};
//!
//! let container = Container::decode(File::open("input.gif")?, "input.gif")?;
//! println!("{}x{}, {} frames", container.width, container.height, container.frames.len());
//!
//! let bytes = container.encode_to_vec()?;
//! std::fs::write("copy.gif", bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    borrow::Cow,
    io::{Read, Write},
    path::PathBuf,
};

use gif::{ColorOutput, DecodeOptions, Encoder};

pub use gif::Repeat;

use crate::{error::GifBundleError, still::StillImage};

/// Largest number of entries a GIF color table can hold.
pub const MAX_PALETTE_ENTRIES: usize = 256;

/// One palette-indexed frame of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u16,
    /// Frame height in pixels.
    pub height: u16,
    /// Horizontal offset inside the logical screen.
    pub left: u16,
    /// Vertical offset inside the logical screen.
    pub top: u16,
    /// One palette index per pixel, row-major, `width * height` entries.
    pub indices: Vec<u8>,
    /// RGB triplets, one per palette entry.
    pub palette: Vec<u8>,
    /// Palette index rendered as transparent, if any.
    pub transparent: Option<u8>,
    /// Display delay in hundredths of a second.
    pub delay: u16,
}

impl Frame {
    /// Create a frame at the screen origin with no delay and no transparency.
    pub fn new(width: u16, height: u16, indices: Vec<u8>, palette: Vec<u8>) -> Self {
        Self {
            width,
            height,
            left: 0,
            top: 0,
            indices,
            palette,
            transparent: None,
            delay: 0,
        }
    }

    /// Number of entries in the palette.
    pub fn palette_len(&self) -> usize {
        self.palette.len() / 3
    }

    /// The RGB colour of the pixel at `(x, y)`, relative to the frame.
    pub fn color_at(&self, x: u16, y: u16) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::from(y) * usize::from(self.width) + usize::from(x);
        let entry = usize::from(*self.indices.get(index)?) * 3;
        let rgb = self.palette.get(entry..entry + 3)?;
        Some([rgb[0], rgb[1], rgb[2]])
    }

    /// Whether the frame covers the whole `width` x `height` screen.
    pub fn covers(&self, width: u16, height: u16) -> bool {
        self.left == 0 && self.top == 0 && self.width == width && self.height == height
    }

    /// Check the buffer and palette invariants.
    ///
    /// Returns a description of the first violation found.
    pub(crate) fn check(&self) -> Result<(), String> {
        let expected = usize::from(self.width) * usize::from(self.height);
        if self.indices.len() != expected {
            return Err(format!(
                "pixel buffer holds {} indices, expected {expected}",
                self.indices.len()
            ));
        }
        if self.palette.is_empty() || self.palette.len() % 3 != 0 {
            return Err(format!("palette of {} bytes is malformed", self.palette.len()));
        }
        let entries = self.palette_len();
        if entries > MAX_PALETTE_ENTRIES {
            return Err(format!("palette has {entries} entries, at most 256 allowed"));
        }
        if let Some(index) = self.indices.iter().find(|&&index| usize::from(index) >= entries) {
            return Err(format!(
                "palette overflow: index {index} used with a {entries}-entry palette"
            ));
        }
        Ok(())
    }

    fn fits(&self, width: u16, height: u16) -> bool {
        u32::from(self.left) + u32::from(self.width) <= u32::from(width)
            && u32::from(self.top) + u32::from(self.height) <= u32::from(height)
    }

    /// Convert a decoded still image into a frame.
    ///
    /// The still image must already be palette-indexed; anything else is an
    /// encode failure, never a silent conversion.
    fn from_still(still: StillImage, path: PathBuf) -> Result<Self, GifBundleError> {
        if !still.is_paletted() {
            return Err(GifBundleError::NotPaletted {
                path,
                color_type: format!("{:?}", still.color_type),
            });
        }

        let (Ok(width), Ok(height)) = (u16::try_from(still.width), u16::try_from(still.height))
        else {
            return Err(GifBundleError::ContainerEncode(format!(
                "{} is {}x{}, larger than a GIF frame can be",
                path.display(),
                still.width,
                still.height
            )));
        };

        let indices = still.indices();
        let transparent = still.transparent_index();
        let Some(palette) = still.palette else {
            return Err(GifBundleError::StillDecode {
                path,
                reason: "indexed image has no palette".to_string(),
            });
        };

        let frame = Self {
            transparent,
            ..Self::new(width, height, indices, palette)
        };
        frame
            .check()
            .map_err(|reason| GifBundleError::StillDecode { path, reason })?;
        Ok(frame)
    }
}

/// A fully decoded animated GIF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Logical screen width.
    pub width: u16,
    /// Logical screen height.
    pub height: u16,
    /// Loop count carried by the NETSCAPE application extension.
    pub repeat: Repeat,
    /// Frames in display order.
    pub frames: Vec<Frame>,
}

impl Container {
    /// Create an empty container with the given screen size, looping forever.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            repeat: Repeat::Infinite,
            frames: Vec::new(),
        }
    }

    /// Decode every frame of a GIF stream.
    ///
    /// `source_name` is only used to give errors context.
    ///
    /// # Errors
    ///
    /// Returns [`GifBundleError::ContainerDecode`] for a truncated header, an
    /// invalid frame block, a frame without any color table, a frame outside
    /// the logical screen, or a pixel index beyond its palette. No partially
    /// decoded container is ever returned.
    pub fn decode<R: Read>(reader: R, source_name: &str) -> Result<Self, GifBundleError> {
        let decode_error = |reason: String| GifBundleError::ContainerDecode {
            source_name: source_name.to_string(),
            reason,
        };

        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::Indexed);
        options.check_frame_consistency(true);

        let mut decoder = options
            .read_info(reader)
            .map_err(|error| decode_error(error.to_string()))?;

        let width = decoder.width();
        let height = decoder.height();
        let global_palette = decoder.global_palette().map(<[u8]>::to_vec);

        let mut frames = Vec::new();
        while let Some(gif_frame) = decoder
            .read_next_frame()
            .map_err(|error| decode_error(error.to_string()))?
        {
            let index = frames.len();
            let mut palette = match (&gif_frame.palette, &global_palette) {
                (Some(local), _) => local.clone(),
                (None, Some(global)) => global.clone(),
                (None, None) => {
                    return Err(decode_error(format!("frame {index} has no color table")));
                }
            };

            // A transparent index past the table still needs an entry.
            if let Some(transparent) = gif_frame.transparent {
                let needed = (usize::from(transparent) + 1) * 3;
                if palette.len() < needed {
                    palette.resize(needed, 0);
                }
            }

            let frame = Frame {
                width: gif_frame.width,
                height: gif_frame.height,
                left: gif_frame.left,
                top: gif_frame.top,
                indices: gif_frame.buffer.to_vec(),
                palette,
                transparent: gif_frame.transparent,
                delay: gif_frame.delay,
            };

            if !frame.fits(width, height) {
                return Err(decode_error(format!(
                    "frame {index} lies outside the {width}x{height} screen"
                )));
            }
            frame
                .check()
                .map_err(|reason| decode_error(format!("frame {index}: {reason}")))?;

            frames.push(frame);
        }

        let repeat = decoder.repeat();

        Ok(Self {
            width,
            height,
            repeat,
            frames,
        })
    }

    /// Assemble a container from decoded still images, in the given order.
    ///
    /// The first image sets the logical screen size. Every frame gets a delay
    /// of zero and sits at the screen origin.
    ///
    /// # Errors
    ///
    /// - [`GifBundleError::NoFrames`] when `stills` is empty.
    /// - [`GifBundleError::NotPaletted`] when an image is not palette-indexed.
    /// - [`GifBundleError::FrameOutOfBounds`] when a later image is larger
    ///   than the first.
    pub fn from_stills(stills: Vec<(StillImage, PathBuf)>) -> Result<Self, GifBundleError> {
        let mut container: Option<Container> = None;

        for (index, (still, path)) in stills.into_iter().enumerate() {
            let frame = Frame::from_still(still, path)?;
            let container =
                container.get_or_insert_with(|| Container::new(frame.width, frame.height));

            if !frame.fits(container.width, container.height) {
                return Err(GifBundleError::FrameOutOfBounds {
                    index,
                    frame_width: frame.width,
                    frame_height: frame.height,
                    left: frame.left,
                    top: frame.top,
                    width: container.width,
                    height: container.height,
                });
            }
            container.frames.push(frame);
        }

        container.ok_or(GifBundleError::NoFrames)
    }

    /// Encode the container as a GIF stream into `writer`.
    ///
    /// Each frame carries its own local color table. The loop extension is
    /// only written for animations with more than one frame. A container
    /// without frames encodes to a valid, empty GIF.
    ///
    /// # Errors
    ///
    /// Returns [`GifBundleError::FrameOutOfBounds`] or
    /// [`GifBundleError::ContainerEncode`] when a frame breaks the container
    /// invariants or the writer fails.
    pub fn encode<W: Write>(&self, writer: W) -> Result<W, GifBundleError> {
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.fits(self.width, self.height) {
                return Err(GifBundleError::FrameOutOfBounds {
                    index,
                    frame_width: frame.width,
                    frame_height: frame.height,
                    left: frame.left,
                    top: frame.top,
                    width: self.width,
                    height: self.height,
                });
            }
            frame.check().map_err(|reason| {
                GifBundleError::ContainerEncode(format!("frame {index}: {reason}"))
            })?;
        }

        let mut encoder = Encoder::new(writer, self.width, self.height, &[])?;
        if self.frames.len() > 1 {
            encoder.set_repeat(self.repeat)?;
        }

        for frame in &self.frames {
            let gif_frame = gif::Frame {
                width: frame.width,
                height: frame.height,
                left: frame.left,
                top: frame.top,
                delay: frame.delay,
                transparent: frame.transparent,
                palette: Some(frame.palette.clone()),
                buffer: Cow::Borrowed(&frame.indices),
                ..gif::Frame::default()
            };
            encoder.write_frame(&gif_frame)?;
        }

        encoder
            .into_inner()
            .map_err(|error| GifBundleError::ContainerEncode(error.to_string()))
    }

    /// Encode the container into memory.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, GifBundleError> {
        self.encode(Vec::new())
    }
}
