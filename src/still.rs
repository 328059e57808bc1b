//! Still-image (PNG) reading and writing.
//!
//! Frames leave the pipeline as 8-bit palette-indexed PNG files and come back
//! in as [`StillImage`] values. A [`StillImage`] is kept exactly as the file
//! stored it (no palette expansion), so the palette precondition can be
//! checked when it is turned back into a frame.

use std::{
    fs::{self, File},
    io::{BufWriter, Cursor, Error as IoError, Write},
    path::Path,
};

use image::ImageFormat;
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};

use crate::{container::Frame, error::GifBundleError};

/// File extension of every frame written by unpack.
pub const FRAME_EXTENSION: &str = "png";

/// The undecoded-pixel contents of one PNG file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StillImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color type as stored in the file.
    pub color_type: ColorType,
    /// Bits per sample as stored in the file.
    pub bit_depth: BitDepth,
    /// Bytes per row in `samples`.
    pub line_size: usize,
    /// Raw samples, `line_size * height` bytes.
    pub samples: Vec<u8>,
    /// PLTE chunk (RGB triplets), if present.
    pub palette: Option<Vec<u8>>,
    /// tRNS chunk, if present.
    pub trns: Option<Vec<u8>>,
}

impl StillImage {
    /// Read and decode a PNG file.
    ///
    /// # Errors
    ///
    /// Returns [`GifBundleError::DirectoryRead`] when the file cannot be read
    /// and [`GifBundleError::StillDecode`] when it is not a valid PNG.
    pub fn read(path: &Path) -> Result<Self, GifBundleError> {
        let bytes = fs::read(path).map_err(|error| GifBundleError::DirectoryRead {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;
        Self::decode(&bytes, path)
    }

    /// Decode PNG bytes. `path` is only used for error context.
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Self, GifBundleError> {
        let decode_error = |reason: String| GifBundleError::StillDecode {
            path: path.to_path_buf(),
            reason,
        };

        if let Ok(format) = image::guess_format(bytes) {
            if format != ImageFormat::Png {
                return Err(decode_error(format!("expected PNG, found {format:?}")));
            }
        }

        let mut decoder = Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(Transformations::IDENTITY);
        let mut reader = decoder
            .read_info()
            .map_err(|error| decode_error(error.to_string()))?;

        let mut samples = vec![0; reader.output_buffer_size()];
        let output = reader
            .next_frame(&mut samples)
            .map_err(|error| decode_error(error.to_string()))?;
        samples.truncate(output.buffer_size());

        let info = reader.info();
        Ok(Self {
            width: output.width,
            height: output.height,
            color_type: output.color_type,
            bit_depth: output.bit_depth,
            line_size: output.line_size,
            samples,
            palette: info.palette.as_ref().map(|palette| palette.to_vec()),
            trns: info.trns.as_ref().map(|trns| trns.to_vec()),
        })
    }

    /// Whether the image stores palette indices.
    pub fn is_paletted(&self) -> bool {
        self.color_type == ColorType::Indexed
    }

    /// One byte per pixel, unpacking sub-byte bit depths.
    ///
    /// Only meaningful for palette-indexed images.
    pub(crate) fn indices(&self) -> Vec<u8> {
        let width = self.width as usize;
        let depth = self.bit_depth as usize;
        if self.line_size == 0 || depth == 0 || depth > 8 {
            return Vec::new();
        }

        let per_byte = 8 / depth;
        let mask = ((1u16 << depth) - 1) as u8;
        let mut indices = Vec::with_capacity(width * self.height as usize);

        for row in self.samples.chunks(self.line_size) {
            if depth == 8 {
                indices.extend_from_slice(&row[..width.min(row.len())]);
                continue;
            }
            for x in 0..width {
                let Some(&byte) = row.get(x / per_byte) else {
                    break;
                };
                let shift = 8 - depth * (x % per_byte + 1);
                indices.push((byte >> shift) & mask);
            }
        }
        indices
    }

    /// The first palette entry whose tRNS alpha is zero.
    pub(crate) fn transparent_index(&self) -> Option<u8> {
        self.trns
            .as_ref()?
            .iter()
            .position(|&alpha| alpha == 0)
            .and_then(|index| u8::try_from(index).ok())
    }
}

/// Why a frame file could not be produced.
#[derive(Debug)]
pub(crate) enum StillWriteError {
    /// The file could not be created.
    Create(IoError),
    /// The PNG encoder rejected the frame or the write failed midway.
    Encode(String),
}

/// Write a frame as an 8-bit palette-indexed PNG file.
pub(crate) fn write_frame(frame: &Frame, path: &Path) -> Result<(), StillWriteError> {
    let file = File::create(path).map_err(StillWriteError::Create)?;
    let mut writer = BufWriter::new(file);
    encode_frame(frame, &mut writer).map_err(|error| StillWriteError::Encode(error.to_string()))
}

/// Encode a frame as an 8-bit palette-indexed PNG stream.
///
/// The frame's offsets are not recorded; the PNG has the frame's own size.
pub fn encode_frame<W: Write>(frame: &Frame, mut writer: W) -> Result<(), png::EncodingError> {
    {
        let mut encoder = Encoder::new(
            &mut writer,
            u32::from(frame.width),
            u32::from(frame.height),
        );
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_palette(frame.palette.clone());
        if let Some(index) = frame.transparent {
            encoder.set_trns(transparency_table(index));
        }

        let mut png_writer = encoder.write_header()?;
        png_writer.write_image_data(&frame.indices)?;
        png_writer.finish()?;
    }
    writer.flush()?;
    Ok(())
}

fn transparency_table(index: u8) -> Vec<u8> {
    let mut table = vec![u8::MAX; usize::from(index) + 1];
    table[usize::from(index)] = 0;
    table
}
