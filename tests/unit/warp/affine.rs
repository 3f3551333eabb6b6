use super::*;
use crate::foundation::core::{FrameBuffer, OutputOrigin};
use crate::warp::Strategy;

fn patterned_frame(width: u32, height: u32, channels: u32) -> FrameBuffer<u8> {
    let mut frame = FrameBuffer::<u8>::new(width, height, channels, 0).expect("valid buffer");
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                frame.view_mut().pixel_mut(x, y)[c as usize] =
                    (x.wrapping_mul(7) + y.wrapping_mul(13) + c.wrapping_mul(29)) as u8;
            }
        }
    }
    frame
}

fn warp(
    input: &FrameBuffer<u8>,
    width: u32,
    height: u32,
    transform: Affine,
    options: &WarpOptions<'_, u8>,
) -> FrameBuffer<u8> {
    let mut output =
        FrameBuffer::<u8>::new(width, height, input.channels(), 0).expect("valid buffer");
    affine(&input.view(), &mut output.view_mut(), &transform, options, None)
        .expect("affine succeeds");
    output
}

#[test]
fn identity_reproduces_input_for_all_channel_counts() {
    for channels in 1..=4u32 {
        let input = patterned_frame(9, 7, channels);
        let output = warp(
            &input,
            9,
            7,
            Affine::IDENTITY,
            &WarpOptions::default(),
        );
        assert_eq!(output.data(), input.data(), "channels = {channels}");
    }
}

#[test]
fn translation_shifts_and_border_fills() {
    let data = vec![10u8, 11, 12, 13];
    let input = FrameBuffer::from_vec(4, 1, 1, 0, data).expect("valid buffer");

    let border = [77u8];
    let options = WarpOptions {
        border: Some(&border),
        ..Default::default()
    };
    // input position = output position + (2, 0)
    let output = warp(&input, 4, 1, Affine::translate((2.0, 0.0)), &options);

    assert_eq!(output.view().row(0), &[12, 13, 77, 77]);
}

#[test]
fn missing_border_color_zero_fills() {
    let input = patterned_frame(4, 4, 2);
    // Everything lands far outside the input.
    let output = warp(
        &input,
        4,
        4,
        Affine::translate((100.0, 100.0)),
        &WarpOptions::default(),
    );
    assert!(output.data().iter().all(|&v| v == 0));
}

#[test]
fn rounding_is_half_away_from_zero() {
    let data = vec![1u8, 2, 3, 4];
    let input = FrameBuffer::from_vec(4, 1, 1, 0, data).expect("valid buffer");

    // input x = output x + 0.5: ties round up.
    let output = warp(
        &input,
        4,
        1,
        Affine::translate((0.5, 0.0)),
        &WarpOptions {
            border: Some(&[9u8]),
            ..Default::default()
        },
    );
    assert_eq!(output.view().row(0), &[2, 3, 4, 9]);
}

#[test]
fn blocked_kernel_matches_scalar_reference() {
    let input = patterned_frame(13, 11, 3);
    let transform = Affine::rotate(0.35) * Affine::translate((-2.0, 1.5));
    let border = [5u8, 6, 7];

    // Odd output width exercises the tail realignment.
    for (width, height) in [(7, 9), (13, 11), (4, 4)] {
        let scalar = warp(
            &input,
            width,
            height,
            transform,
            &WarpOptions {
                border: Some(&border),
                strategy: Strategy::Scalar,
                ..Default::default()
            },
        );
        let blocked = warp(
            &input,
            width,
            height,
            transform,
            &WarpOptions {
                border: Some(&border),
                strategy: Strategy::Blocked,
                ..Default::default()
            },
        );
        assert_eq!(scalar.data(), blocked.data(), "size {width}x{height}");
    }
}

#[test]
fn fixed_point_matches_scalar_on_representable_coefficients() {
    let input = patterned_frame(16, 16, 1);
    // Every coefficient is an exact multiple of 2^-15.
    let transform = Affine::new([0.5, 0.25, -0.25, 0.5, 1.25, -0.5]);

    let scalar = warp(
        &input,
        12,
        12,
        transform,
        &WarpOptions {
            strategy: Strategy::Scalar,
            ..Default::default()
        },
    );
    let fixed = warp(
        &input,
        12,
        12,
        transform,
        &WarpOptions {
            strategy: Strategy::FixedPoint,
            ..Default::default()
        },
    );
    assert_eq!(scalar.data(), fixed.data());
}

#[test]
fn fixed_point_falls_back_when_output_is_narrow() {
    let input = patterned_frame(8, 8, 1);
    let scalar = warp(
        &input,
        3,
        8,
        Affine::IDENTITY,
        &WarpOptions {
            strategy: Strategy::Scalar,
            ..Default::default()
        },
    );
    let fixed = warp(
        &input,
        3,
        8,
        Affine::IDENTITY,
        &WarpOptions {
            strategy: Strategy::FixedPoint,
            ..Default::default()
        },
    );
    assert_eq!(scalar.data(), fixed.data());
}

#[test]
fn output_origin_offsets_the_sampling_grid() {
    let input = patterned_frame(8, 8, 1);

    let with_origin = warp(
        &input,
        4,
        4,
        Affine::IDENTITY,
        &WarpOptions {
            origin: OutputOrigin::new(2, 3),
            ..Default::default()
        },
    );
    let with_translation = warp(
        &input,
        4,
        4,
        Affine::translate((2.0, 3.0)),
        &WarpOptions::default(),
    );
    assert_eq!(with_origin.data(), with_translation.data());
}

#[test]
fn mismatched_border_length_is_rejected() {
    let input = patterned_frame(4, 4, 3);
    let mut output = FrameBuffer::<u8>::new(4, 4, 3, 0).expect("valid buffer");
    let border = [0u8; 2];

    let err = affine(
        &input.view(),
        &mut output.view_mut(),
        &Affine::IDENTITY,
        &WarpOptions {
            border: Some(&border),
            ..Default::default()
        },
        None,
    )
    .unwrap_err();
    assert!(matches!(err, WarpError::Layout(_)));
}
