//! Container codec integration tests.

mod common;

use std::borrow::Cow;

use gifbundle::{Container, ErrorCategory, Frame, GifBundleError, Repeat};

#[test]
fn decode_keeps_frames_in_order() {
    let original = common::container(3);
    let bytes = original.encode_to_vec().expect("Failed to encode");

    let decoded = Container::decode(bytes.as_slice(), "memory").expect("Failed to decode");
    assert_eq!(decoded.width, 4);
    assert_eq!(decoded.height, 3);
    assert_eq!(decoded.frames.len(), 3);
    for (decoded, original) in decoded.frames.iter().zip(&original.frames) {
        assert_eq!(decoded.indices, original.indices);
        assert_eq!(decoded.delay, original.delay);
        assert_eq!(common::colors(decoded), common::colors(original));
    }
}

#[test]
fn empty_container_round_trips() {
    let bytes = Container::new(4, 4).encode_to_vec().expect("Failed to encode");
    let decoded = Container::decode(bytes.as_slice(), "memory").expect("Failed to decode");
    assert_eq!((decoded.width, decoded.height), (4, 4));
    assert!(decoded.frames.is_empty());
}

#[test]
fn loop_count_is_carried() {
    let mut container = common::container(2);
    container.repeat = Repeat::Finite(3);
    let bytes = container.encode_to_vec().expect("Failed to encode");

    let decoded = Container::decode(bytes.as_slice(), "memory").expect("Failed to decode");
    assert_eq!(decoded.repeat, Repeat::Finite(3));
}

#[test]
fn global_palette_is_used_without_local_table() {
    let palette = common::palette();
    let mut bytes = Vec::new();
    {
        let mut encoder =
            gif::Encoder::new(&mut bytes, 2, 2, &palette).expect("Failed to create encoder");
        let frame = gif::Frame {
            width: 2,
            height: 2,
            buffer: Cow::Owned(vec![0, 1, 2, 3]),
            ..gif::Frame::default()
        };
        encoder.write_frame(&frame).expect("Failed to write frame");
    }

    let decoded = Container::decode(bytes.as_slice(), "memory").expect("Failed to decode");
    assert_eq!(decoded.frames.len(), 1);
    assert_eq!(decoded.frames[0].palette, palette);
    assert_eq!(decoded.frames[0].color_at(1, 1), Some([0, 0, 255]));
}

#[test]
fn transparency_is_carried() {
    let mut container = common::container(1);
    container.frames[0].transparent = Some(2);
    let bytes = container.encode_to_vec().expect("Failed to encode");

    let decoded = Container::decode(bytes.as_slice(), "memory").expect("Failed to decode");
    assert_eq!(decoded.frames[0].transparent, Some(2));
}

#[test]
fn sub_rectangle_frames_keep_offsets() {
    let mut container = common::container(1);
    let mut patch = common::frame(2, 1, 1);
    patch.left = 2;
    patch.top = 2;
    container.frames.push(patch);

    let bytes = container.encode_to_vec().expect("Failed to encode");
    let decoded = Container::decode(bytes.as_slice(), "memory").expect("Failed to decode");
    let patch = &decoded.frames[1];
    assert_eq!((patch.left, patch.top, patch.width, patch.height), (2, 2, 2, 1));
}

#[test]
fn encode_rejects_frame_outside_screen() {
    let mut container = Container::new(2, 2);
    container.frames.push(common::frame(3, 2, 0));

    let error = container.encode_to_vec().unwrap_err();
    assert!(matches!(error, GifBundleError::FrameOutOfBounds { index: 0, .. }));
    assert_eq!(error.category(), ErrorCategory::Encode);
}

#[test]
fn encode_rejects_palette_overflow() {
    let mut container = Container::new(1, 1);
    container
        .frames
        .push(Frame::new(1, 1, vec![9], common::palette()));

    let error = container.encode_to_vec().unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Encode);
    assert!(error.to_string().contains("palette overflow"), "{error}");
}

#[test]
fn truncated_header_is_a_decode_error() {
    let bytes = common::container(1).encode_to_vec().expect("Failed to encode");

    let error = Container::decode(&bytes[..10], "truncated.gif").unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Decode);
    assert!(error.to_string().contains("truncated.gif"), "{error}");
}

#[test]
fn truncated_frame_data_is_a_decode_error() {
    let mut container = Container::new(16, 16);
    for seed in 0..2 {
        container.frames.push(common::frame(16, 16, seed));
    }
    let bytes = container.encode_to_vec().expect("Failed to encode");

    let result = Container::decode(&bytes[..bytes.len() / 2], "half.gif");
    assert!(result.is_err(), "a truncated stream must not decode");
    assert_eq!(result.unwrap_err().category(), ErrorCategory::Decode);
}

#[test]
fn garbage_is_a_decode_error() {
    let result = Container::decode(&b"this is not a gif"[..], "garbage");
    assert!(matches!(
        result,
        Err(GifBundleError::ContainerDecode { .. })
    ));
}
