//! Pack integration tests.

mod common;

use gifbundle::{ErrorCategory, FrameOrder, GifBundleError, PackOptions, Repeat};

#[test]
fn packs_frames_in_natural_order() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir(&input).expect("Failed to create input dir");
    // Written out of order on purpose.
    for seed in [3u8, 0, 10, 1] {
        common::write_png(&input, &format!("f_{seed}.png"), &common::frame(4, 3, seed));
    }
    let output = temporary_directory.path().join("out.gif");

    let report = gifbundle::pack(&input, &output, &PackOptions::new()).expect("Failed to pack");
    assert_eq!(report.frame_count, 4);
    assert_eq!((report.width, report.height), (4, 3));
    assert_eq!(
        report.bytes_written as u64,
        std::fs::metadata(&output).expect("Failed to stat output").len()
    );

    let container = common::read_gif(&output);
    let expected: Vec<Vec<u8>> = [0u8, 1, 3, 10]
        .iter()
        .map(|&seed| common::frame(4, 3, seed).indices)
        .collect();
    let actual: Vec<Vec<u8>> = container.frames.iter().map(|f| f.indices.clone()).collect();
    assert_eq!(actual, expected);
    assert!(container.frames.iter().all(|frame| frame.delay == 0));
}

#[test]
fn lexicographic_order_sorts_by_bytes() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir(&input).expect("Failed to create input dir");
    for seed in [1u8, 3, 10] {
        common::write_png(&input, &format!("f_{seed}.png"), &common::frame(4, 3, seed));
    }
    let output = temporary_directory.path().join("out.gif");

    let options = PackOptions::new().with_order(FrameOrder::Lexicographic);
    gifbundle::pack(&input, &output, &options).expect("Failed to pack");

    let container = common::read_gif(&output);
    let actual: Vec<Vec<u8>> = container.frames.iter().map(|f| f.indices.clone()).collect();
    assert_eq!(
        actual,
        vec![
            common::frame(4, 3, 1).indices,
            common::frame(4, 3, 10).indices,
            common::frame(4, 3, 3).indices,
        ]
    );
}

#[test]
fn loop_count_is_written() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    for seed in 0..2 {
        common::write_png(
            temporary_directory.path(),
            &format!("f_{seed}.png"),
            &common::frame(4, 3, seed),
        );
    }
    let output_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = output_directory.path().join("out.gif");

    let options = PackOptions::new().with_repeat(Repeat::Finite(2));
    gifbundle::pack(temporary_directory.path(), &output, &options).expect("Failed to pack");

    assert_eq!(common::read_gif(&output).repeat, Repeat::Finite(2));
}

#[test]
fn empty_directory_is_rejected() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir(&input).expect("Failed to create input dir");
    let output = temporary_directory.path().join("out.gif");

    let error = gifbundle::pack(&input, &output, &PackOptions::new()).unwrap_err();
    assert!(matches!(error, GifBundleError::NoFrames));
    assert!(!output.exists(), "No GIF should be written without frames");
}

#[test]
fn missing_directory_is_a_read_error() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("missing");
    let output = temporary_directory.path().join("out.gif");

    let error = gifbundle::pack(&input, &output, &PackOptions::new()).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Read);
}

#[test]
fn non_png_entry_aborts_without_output() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir(&input).expect("Failed to create input dir");
    common::write_png(&input, "f_0.png", &common::frame(4, 3, 0));
    std::fs::write(input.join("notes.txt"), b"not an image").expect("Failed to write notes");
    let output = temporary_directory.path().join("out.gif");

    let error = gifbundle::pack(&input, &output, &PackOptions::new()).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Decode);
    let message = error.to_string();
    assert!(message.contains("notes.txt"), "{message}");
    assert!(!output.exists(), "A failed pack must not leave an output file");
}

#[test]
fn rgb_png_is_not_quantised() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir(&input).expect("Failed to create input dir");
    image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]))
        .save(input.join("rgb.png"))
        .expect("Failed to save rgb png");
    let output = temporary_directory.path().join("out.gif");

    let error = gifbundle::pack(&input, &output, &PackOptions::new()).unwrap_err();
    assert!(matches!(error, GifBundleError::NotPaletted { .. }));
    assert_eq!(error.category(), ErrorCategory::Encode);
    assert!(!output.exists());
}

#[test]
fn nested_directories_are_skipped() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir_all(input.join("nested")).expect("Failed to create nested dir");
    common::write_png(&input, "f_0.png", &common::frame(4, 3, 0));
    let output = temporary_directory.path().join("out.gif");

    let report = gifbundle::pack(&input, &output, &PackOptions::new()).expect("Failed to pack");
    assert_eq!(report.frame_count, 1);
}

#[test]
fn larger_later_frame_is_out_of_bounds() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir(&input).expect("Failed to create input dir");
    common::write_png(&input, "f_0.png", &common::frame(4, 3, 0));
    common::write_png(&input, "f_1.png", &common::frame(5, 3, 1));
    let output = temporary_directory.path().join("out.gif");

    let error = gifbundle::pack(&input, &output, &PackOptions::new()).unwrap_err();
    assert!(matches!(
        error,
        GifBundleError::FrameOutOfBounds { index: 1, .. }
    ));
    assert!(!output.exists());
}

#[test]
fn smaller_later_frame_is_accepted() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    common::write_png(temporary_directory.path(), "f_0.png", &common::frame(4, 3, 0));
    common::write_png(temporary_directory.path(), "f_1.png", &common::frame(2, 2, 1));
    let output_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let output = output_directory.path().join("out.gif");

    gifbundle::pack(temporary_directory.path(), &output, &PackOptions::new())
        .expect("Failed to pack");

    let container = common::read_gif(&output);
    assert_eq!((container.width, container.height), (4, 3));
    assert_eq!((container.frames[1].width, container.frames[1].height), (2, 2));
}

#[test]
fn existing_output_requires_overwrite() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("frames");
    std::fs::create_dir(&input).expect("Failed to create input dir");
    common::write_png(&input, "f_0.png", &common::frame(4, 3, 0));
    let output = temporary_directory.path().join("out.gif");
    std::fs::write(&output, b"keep me").expect("Failed to write existing output");

    let error = gifbundle::pack(&input, &output, &PackOptions::new()).unwrap_err();
    assert!(matches!(error, GifBundleError::OutputExists(_)));
    assert_eq!(
        std::fs::read(&output).expect("Failed to read output"),
        b"keep me"
    );

    let options = PackOptions::new().with_overwrite(true);
    gifbundle::pack(&input, &output, &options).expect("Failed to pack with overwrite");
    assert_eq!(common::read_gif(&output).frames.len(), 1);
}

#[test]
fn output_inside_input_directory_is_not_a_frame() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    for seed in 0..2 {
        common::write_png(
            temporary_directory.path(),
            &format!("f_{seed}.png"),
            &common::frame(4, 3, seed),
        );
    }
    let output = temporary_directory.path().join("out.gif");
    let options = PackOptions::new().with_overwrite(true);

    gifbundle::pack(temporary_directory.path(), &output, &options).expect("Failed to pack");
    let report = gifbundle::pack(temporary_directory.path(), &output, &options)
        .expect("Repacking over the previous output should succeed");

    assert_eq!(report.frame_count, 2);
    assert_eq!(common::read_gif(&output).frames.len(), 2);
}
