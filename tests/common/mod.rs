//! Shared fixtures: synthetic containers and frame files.

#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use gifbundle::{Container, Frame};

/// Black, red, green, blue.
pub fn palette() -> Vec<u8> {
    vec![0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]
}

/// A frame whose pixels cycle through the palette, shifted by `seed`.
pub fn frame(width: u16, height: u16, seed: u8) -> Frame {
    let indices = (0..usize::from(width) * usize::from(height))
        .map(|pixel| ((pixel + usize::from(seed)) % 4) as u8)
        .collect();
    let mut frame = Frame::new(width, height, indices, palette());
    frame.delay = 5 + u16::from(seed);
    frame
}

/// A 4x3 container holding `count` distinct frames with non-zero delays.
pub fn container(count: usize) -> Container {
    let mut container = Container::new(4, 3);
    for seed in 0..count {
        container.frames.push(frame(4, 3, seed as u8));
    }
    container
}

/// Encode `container` to `directory/name` and return the path.
pub fn write_gif(directory: &Path, name: &str, container: &Container) -> PathBuf {
    let path = directory.join(name);
    let bytes = container.encode_to_vec().expect("Failed to encode container");
    fs::write(&path, bytes).expect("Failed to write gif");
    path
}

/// Write `frame` as an indexed PNG at `directory/name`.
pub fn write_png(directory: &Path, name: &str, frame: &Frame) -> PathBuf {
    let path = directory.join(name);
    let file = File::create(&path).expect("Failed to create png");
    gifbundle::still::encode_frame(frame, BufWriter::new(file)).expect("Failed to encode png");
    path
}

/// Decode the GIF at `path`.
pub fn read_gif(path: &Path) -> Container {
    let file = File::open(path).expect("Failed to open gif");
    Container::decode(file, &path.display().to_string()).expect("Failed to decode gif")
}

/// Sorted file names in `directory`.
pub fn file_names(directory: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(directory)
        .expect("Failed to list directory")
        .map(|entry| {
            entry
                .expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

/// Per-pixel colours of a frame, independent of palette layout.
pub fn colors(frame: &Frame) -> Vec<[u8; 3]> {
    let mut colors = Vec::new();
    for y in 0..frame.height {
        for x in 0..frame.width {
            colors.push(frame.color_at(x, y).expect("pixel outside palette"));
        }
    }
    colors
}
