use super::*;

fn u8_frame(data: &[u8], width: u32, height: u32, channels: u32) -> Frame<'_> {
    Frame::new(
        FrameData::U8(data),
        width,
        height,
        channels,
        0,
        PixelOrigin::UpperLeft,
    )
    .expect("valid frame")
}

fn u8_frame_mut(data: &mut [u8], width: u32, height: u32, channels: u32) -> FrameMut<'_> {
    FrameMut::new(
        FrameDataMut::U8(data),
        width,
        height,
        channels,
        0,
        PixelOrigin::UpperLeft,
    )
    .expect("valid frame")
}

#[test]
fn dynamic_resize_matches_typed_resize() {
    let data: Vec<u8> = (0..100).collect();
    let source = u8_frame(&data, 10, 10, 1);
    let mut dynamic_out = vec![0u8; 25];
    let mut target = u8_frame_mut(&mut dynamic_out, 5, 5, 1);
    resize_frames(&source, &mut target, None).expect("resize succeeds");

    let typed_src = FrameView::new(&data, 10, 10, 1, 0).expect("valid view");
    let mut typed_out = vec![0u8; 25];
    let mut typed_dst = FrameViewMut::new(&mut typed_out, 5, 5, 1, 0).expect("valid view");
    resize(&typed_src, &mut typed_dst, None).expect("resize succeeds");

    assert_eq!(dynamic_out, typed_out);
}

#[test]
fn mismatched_element_types_are_rejected() {
    let src_data = vec![0u8; 16];
    let source = u8_frame(&src_data, 4, 4, 1);
    let mut dst_data = vec![0f32; 16];
    let mut target = FrameMut::new(
        FrameDataMut::F32(&mut dst_data),
        4,
        4,
        1,
        0,
        PixelOrigin::UpperLeft,
    )
    .expect("valid frame");

    let err = resize_frames(&source, &mut target, None).unwrap_err();
    assert!(matches!(err, WarpError::Layout(_)));
}

#[test]
fn mismatched_pixel_origins_are_rejected() {
    let src_data = vec![0u8; 16];
    let source = u8_frame(&src_data, 4, 4, 1);
    let mut dst_data = vec![0u8; 16];
    let mut target = FrameMut::new(
        FrameDataMut::U8(&mut dst_data),
        4,
        4,
        1,
        0,
        PixelOrigin::LowerLeft,
    )
    .expect("valid frame");

    let err = resize_frames(&source, &mut target, None).unwrap_err();
    assert!(matches!(err, WarpError::Layout(_)));
}

#[test]
fn unsupported_channel_counts_are_rejected() {
    let src_data = vec![0u8; 4 * 4 * 5];
    let source = u8_frame(&src_data, 4, 4, 5);
    let mut dst_data = vec![0u8; 4 * 4 * 5];
    let mut target = u8_frame_mut(&mut dst_data, 4, 4, 5);

    let err = resize_frames(&source, &mut target, None).unwrap_err();
    assert!(matches!(err, WarpError::Unsupported(_)));
}

#[test]
fn border_element_type_must_match() {
    let src_data = vec![1u8; 16];
    let source = u8_frame(&src_data, 4, 4, 1);
    let mut dst_data = vec![0u8; 16];
    let mut target = u8_frame_mut(&mut dst_data, 4, 4, 1);

    let options = FrameWarpOptions {
        border: Some(BorderColor::F32(&[0.5])),
        ..Default::default()
    };
    let err = affine_frames(&source, &mut target, &Affine::IDENTITY, &options, None)
        .unwrap_err();
    assert!(matches!(err, WarpError::Layout(_)));
}

#[test]
fn dynamic_homography_handles_i32_frames() {
    let src_data: Vec<i32> = (0..16).map(|v| v * 100 - 800).collect();
    let source = Frame::new(
        FrameData::I32(&src_data),
        4,
        4,
        1,
        0,
        PixelOrigin::UpperLeft,
    )
    .expect("valid frame");
    let mut dst_data = vec![0i32; 16];
    let mut target = FrameMut::new(
        FrameDataMut::I32(&mut dst_data),
        4,
        4,
        1,
        0,
        PixelOrigin::UpperLeft,
    )
    .expect("valid frame");

    homography_frames(
        &source,
        &mut target,
        &Homography::IDENTITY,
        &FrameWarpOptions::default(),
        None,
    )
    .expect("homography succeeds");
    assert_eq!(dst_data, src_data);
}

#[test]
fn dynamic_masked_homography_requires_an_8_bit_mask() {
    let src_data = vec![1u8; 16];
    let source = u8_frame(&src_data, 4, 4, 1);
    let mut dst_data = vec![0u8; 16];
    let mut target = u8_frame_mut(&mut dst_data, 4, 4, 1);

    let mut bad_mask_data = vec![0i32; 16];
    let mut bad_mask = FrameMut::new(
        FrameDataMut::I32(&mut bad_mask_data),
        4,
        4,
        1,
        0,
        PixelOrigin::UpperLeft,
    )
    .expect("valid frame");
    let err = homography_mask_frames(
        &source,
        &mut target,
        &mut bad_mask,
        &Homography::IDENTITY,
        0xFF,
        &FrameWarpOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, WarpError::Layout(_)));

    let mut mask_data = vec![0u8; 16];
    let mut mask = u8_frame_mut(&mut mask_data, 4, 4, 1);
    homography_mask_frames(
        &source,
        &mut target,
        &mut mask,
        &Homography::IDENTITY,
        0xFF,
        &FrameWarpOptions::default(),
        None,
    )
    .expect("masked homography succeeds");
    assert!(mask_data.iter().all(|&v| v == 0xFF));
}

#[test]
fn dynamic_lookup_round_trips_with_a_zero_offset_field() {
    let src_data: Vec<u8> = (0..48).collect();
    let source = u8_frame(&src_data, 4, 4, 3);
    let mut dst_data = vec![0u8; 48];
    let mut target = u8_frame_mut(&mut dst_data, 4, 4, 3);

    let field = VectorField::new(4, 4, 2, 2).expect("valid field");
    lookup_frames(
        &source,
        &mut target,
        &field,
        FieldMode::Offset,
        None,
        None,
    )
    .expect("lookup succeeds");
    assert_eq!(dst_data, src_data);
}
