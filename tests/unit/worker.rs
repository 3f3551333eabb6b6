use super::*;
use crate::foundation::core::FrameBuffer;

#[test]
fn zero_threads_is_rejected() {
    assert!(matches!(
        Worker::with_threads(0),
        Err(WarpError::Layout(_))
    ));
}

#[test]
fn band_heights_cover_rows_exactly() {
    for (rows, min_rows, max_bands) in [(100, 20, 8), (7, 20, 8), (64, 20, 4), (41, 20, 16)] {
        let heights = band_heights(rows, min_rows, max_bands);
        assert_eq!(heights.iter().sum::<u32>(), rows);
        assert!(heights.len() <= max_bands);
        if heights.len() > 1 {
            for &h in &heights {
                assert!(h >= min_rows, "band of {h} rows below the minimum");
            }
        }
    }
}

#[test]
fn small_row_counts_stay_single_banded() {
    assert_eq!(band_heights(10, 20, 8), vec![10]);
    assert_eq!(band_heights(39, 20, 8).len(), 1);
}

#[test]
fn run_bands_assigns_disjoint_contiguous_rows() {
    let worker = Worker::with_threads(4).expect("worker builds");
    let mut frame = FrameBuffer::<u8>::new(4, 100, 1, 0).expect("valid buffer");

    run_bands(Some(&worker), frame.view_mut(), |first_row, mut band| {
        for local_y in 0..band.height() {
            let y = first_row + local_y;
            for v in band.row_mut(local_y) {
                *v = y as u8;
            }
        }
    });

    for y in 0..100u32 {
        assert!(frame.view().row(y).iter().all(|&v| v == y as u8), "row {y}");
    }
}

#[test]
fn run_bands_without_worker_runs_inline() {
    let mut frame = FrameBuffer::<u8>::new(2, 5, 1, 0).expect("valid buffer");
    run_bands(None, frame.view_mut(), |first_row, mut band| {
        assert_eq!(first_row, 0);
        assert_eq!(band.height(), 5);
        band.row_mut(0)[0] = 1;
    });
    assert_eq!(frame.view().row(0)[0], 1);
}

#[test]
fn run_bands_masked_splits_both_outputs_consistently() {
    let worker = Worker::with_threads(3).expect("worker builds");
    let mut frame = FrameBuffer::<u8>::new(3, 80, 2, 1).expect("valid buffer");
    let mut mask = FrameBuffer::<u8>::new(3, 80, 1, 0).expect("valid buffer");

    run_bands_masked(
        Some(&worker),
        frame.view_mut(),
        mask.view_mut(),
        |first_row, mut band, mut mask_band| {
            assert_eq!(band.height(), mask_band.height());
            for local_y in 0..band.height() {
                let y = first_row + local_y;
                for v in band.row_mut(local_y) {
                    *v = y as u8;
                }
                mask_band.row_mut(local_y)[0] = (y * 2) as u8;
            }
        },
    );

    for y in 0..80u32 {
        assert!(frame.view().row(y).iter().all(|&v| v == y as u8));
        assert_eq!(mask.view().row(y)[0], (y * 2) as u8);
    }
}

#[test]
fn band_splitting_respects_row_padding() {
    let worker = Worker::with_threads(2).expect("worker builds");
    // Padded rows: the split must land on stride boundaries.
    let mut frame = FrameBuffer::<u8>::new(5, 64, 1, 3).expect("valid buffer");

    run_bands(Some(&worker), frame.view_mut(), |first_row, mut band| {
        for local_y in 0..band.height() {
            let y = first_row + local_y;
            band.row_mut(local_y).fill(y as u8);
        }
    });

    for y in 0..64u32 {
        assert!(frame.view().row(y).iter().all(|&v| v == y as u8), "row {y}");
    }
}
