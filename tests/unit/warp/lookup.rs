use super::*;
use crate::foundation::core::{FrameBuffer, Vec2};

fn patterned_frame(width: u32, height: u32, channels: u32) -> FrameBuffer<u8> {
    let mut frame = FrameBuffer::<u8>::new(width, height, channels, 0).expect("valid buffer");
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                frame.view_mut().pixel_mut(x, y)[c as usize] =
                    ((x * 3 + y * 17 + c * 41) % 251) as u8;
            }
        }
    }
    frame
}

#[test]
fn zero_offset_field_reproduces_input() {
    let input = patterned_frame(12, 10, 3);
    let field = VectorField::new(12, 10, 3, 2).expect("valid field");
    let mut output = FrameBuffer::<u8>::new(12, 10, 3, 0).expect("valid buffer");

    lookup(
        &input.view(),
        &mut output.view_mut(),
        &field,
        FieldMode::Offset,
        None,
        None,
    )
    .expect("lookup succeeds");
    assert_eq!(output.data(), input.data());
}

#[test]
fn absolute_and_offset_fields_are_equivalent() {
    let input = patterned_frame(16, 12, 2);

    // Some non-trivial smooth mapping.
    let position = |x: f64, y: f64| Vec2::new(0.75 * x + 0.1 * y + 1.0, 0.8 * y - 0.05 * x);

    let absolute = VectorField::from_fn(16, 12, 4, 3, |x, y| position(x, y))
        .expect("valid field");
    let offset = VectorField::from_fn(16, 12, 4, 3, |x, y| position(x, y) - Vec2::new(x, y))
        .expect("valid field");

    let border = [7u8, 7];
    let mut out_absolute = FrameBuffer::<u8>::new(16, 12, 2, 0).expect("valid buffer");
    lookup(
        &input.view(),
        &mut out_absolute.view_mut(),
        &absolute,
        FieldMode::Absolute,
        Some(&border),
        None,
    )
    .expect("lookup succeeds");

    let mut out_offset = FrameBuffer::<u8>::new(16, 12, 2, 0).expect("valid buffer");
    lookup(
        &input.view(),
        &mut out_offset.view_mut(),
        &offset,
        FieldMode::Offset,
        Some(&border),
        None,
    )
    .expect("lookup succeeds");

    assert_eq!(out_absolute.data(), out_offset.data());
}

#[test]
fn out_of_range_vectors_fill_border() {
    let input = patterned_frame(8, 8, 1);
    let field = VectorField::from_fn(8, 8, 2, 2, |_, _| Vec2::new(50.0, 50.0))
        .expect("valid field");
    let border = [99u8];

    let mut output = FrameBuffer::<u8>::new(8, 8, 1, 0).expect("valid buffer");
    lookup(
        &input.view(),
        &mut output.view_mut(),
        &field,
        FieldMode::Absolute,
        Some(&border),
        None,
    )
    .expect("lookup succeeds");
    assert!(output.data().iter().all(|&v| v == 99));
}

#[test]
fn masked_lookup_partitions_and_preserves_output() {
    let input = patterned_frame(8, 8, 1);
    // Push the right half of the domain outside the input.
    let field = VectorField::from_fn(8, 8, 8, 1, |x, _| Vec2::new(x * 2.0, 0.0))
        .expect("valid field");
    let mask_value = 0xC0u8;

    let mut output = FrameBuffer::from_vec(8, 8, 1, 0, vec![111u8; 64]).expect("valid buffer");
    let mut mask = FrameBuffer::<u8>::new(8, 8, 1, 0).expect("valid buffer");
    lookup_mask(
        &input.view(),
        &mut output.view_mut(),
        &mut mask.view_mut(),
        &field,
        FieldMode::Absolute,
        mask_value,
        None,
    )
    .expect("lookup_mask succeeds");

    let mut saw_in = false;
    let mut saw_out = false;
    for y in 0..8u32 {
        for x in 0..8u32 {
            match mask.view().pixel(x, y)[0] {
                m if m == mask_value => saw_in = true,
                m => {
                    assert_eq!(m, 0xFF - mask_value);
                    assert_eq!(output.view().pixel(x, y)[0], 111);
                    saw_out = true;
                }
            }
        }
    }
    assert!(saw_in && saw_out);
}

#[test]
fn output_must_match_field_domain() {
    let input = patterned_frame(8, 8, 1);
    let field = VectorField::new(8, 8, 2, 2).expect("valid field");
    let mut output = FrameBuffer::<u8>::new(6, 8, 1, 0).expect("valid buffer");

    let err = lookup(
        &input.view(),
        &mut output.view_mut(),
        &field,
        FieldMode::Offset,
        None,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, WarpError::Layout(_)));
}
