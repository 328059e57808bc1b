//! Unpack followed by pack.
//!
//! What survives the round trip: frame order, per-pixel colours, and
//! transparency. What does not: delays (packed frames have none).

mod common;

use gifbundle::{PackOptions, UnpackOptions};

#[test]
fn twelve_frames_survive_round_trip() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let mut original = common::container(12);
    original.frames[4].transparent = Some(3);
    original.frames[11].transparent = Some(0);
    let source = common::write_gif(temporary_directory.path(), "clip.gif", &original);

    let frames_directory = temporary_directory.path().join("frames");
    let options = UnpackOptions::new().with_output_directory(&frames_directory);
    let unpacked = gifbundle::unpack(&source.display().to_string(), &options)
        .expect("Failed to unpack");
    assert_eq!(unpacked.written.len(), 12);

    let packed_path = temporary_directory.path().join("packed.gif");
    let packed = gifbundle::pack(&frames_directory, &packed_path, &PackOptions::new())
        .expect("Failed to pack");
    assert_eq!(packed.frame_count, 12);

    let repacked = common::read_gif(&packed_path);
    assert_eq!((repacked.width, repacked.height), (original.width, original.height));
    assert_eq!(repacked.frames.len(), original.frames.len());

    for (index, (before, after)) in original.frames.iter().zip(&repacked.frames).enumerate() {
        assert_eq!(
            common::colors(before),
            common::colors(after),
            "Colours of frame {index} should be unchanged"
        );
        assert_eq!(
            before.transparent, after.transparent,
            "Transparency of frame {index} should be unchanged"
        );
        assert_eq!(after.delay, 0, "Packed frames carry no delay");
    }
}

#[test]
fn repacked_gif_unpacks_to_identical_files() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let source = common::write_gif(temporary_directory.path(), "a.gif", &common::container(3));

    let first = temporary_directory.path().join("first");
    gifbundle::unpack(
        &source.display().to_string(),
        &UnpackOptions::new().with_output_directory(&first),
    )
    .expect("Failed to unpack original");

    let packed = temporary_directory.path().join("b.gif");
    gifbundle::pack(&first, &packed, &PackOptions::new()).expect("Failed to pack");

    let second = temporary_directory.path().join("second");
    gifbundle::unpack(
        &packed.display().to_string(),
        &UnpackOptions::new().with_output_directory(&second),
    )
    .expect("Failed to unpack repacked");

    for index in 0..3 {
        let before = std::fs::read(first.join(format!("a_{index}.png")))
            .expect("Failed to read first frame file");
        let after = std::fs::read(second.join(format!("b_{index}.png")))
            .expect("Failed to read second frame file");
        assert_eq!(before, after, "Frame file {index} should be byte-identical");
    }
}
