use crate::foundation::core::{FrameView, FrameViewMut, OutputOrigin, PixelElement};
use crate::foundation::error::{WarpError, WarpResult};
use crate::foundation::math::{approx_recip, round_coord};
use crate::transform::homography::Homography;
use crate::warp::{
    Division, Kernel, WarpOptions, border_array, check_border, check_mask, check_same_channels,
    resolve_strategy, write_sample,
};
use crate::worker::{Worker, run_bands, run_bands_masked};

/// Warp `input` into `output` through a projective transform, nearest-pixel.
///
/// Per output pixel the full homogeneous product is evaluated and divided by
/// its third component (`options.division` selects the divide
/// implementation), then rounded half away from zero. Out-of-range samples
/// write `options.border` (zero when absent). Returns
/// [`WarpError::Transform`] for a singular matrix.
pub fn homography<T: PixelElement>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    transform: &Homography,
    options: &WarpOptions<'_, T>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_same_channels(input, output)?;
    check_border(options.border, input.channels())?;
    if !transform.is_invertible() {
        return Err(WarpError::transform("homography must be invertible"));
    }

    let adjusted = transform.with_output_origin(options.origin);
    let kernel = resolve_strategy(options.strategy, output.width(), 0, false);

    match input.channels() {
        1 => homography_channels::<T, 1>(input, output, &adjusted, options, kernel, worker),
        2 => homography_channels::<T, 2>(input, output, &adjusted, options, kernel, worker),
        3 => homography_channels::<T, 3>(input, output, &adjusted, options, kernel, worker),
        4 => homography_channels::<T, 4>(input, output, &adjusted, options, kernel, worker),
        n => {
            return Err(WarpError::unsupported(format!(
                "channel count {n} (supported: 1-4)"
            )));
        }
    }
    Ok(())
}

/// Masked variant of [`homography`]: writes `mask_value` to `mask` for every
/// in-range sample and `0xFF - mask_value` for out-of-range ones. Output
/// pixels whose sample falls out of range are left untouched, so callers
/// wanting a defined value there must pre-initialize the output.
/// `options.border` is not used.
pub fn homography_mask<T: PixelElement>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    mask: &mut FrameViewMut<'_, u8>,
    transform: &Homography,
    mask_value: u8,
    options: &WarpOptions<'_, T>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_same_channels(input, output)?;
    check_mask(output, mask)?;
    if !transform.is_invertible() {
        return Err(WarpError::transform("homography must be invertible"));
    }

    let adjusted = transform.with_output_origin(options.origin);

    match input.channels() {
        1 => homography_mask_channels::<T, 1>(
            input, output, mask, &adjusted, mask_value, options, worker,
        ),
        2 => homography_mask_channels::<T, 2>(
            input, output, mask, &adjusted, mask_value, options, worker,
        ),
        3 => homography_mask_channels::<T, 3>(
            input, output, mask, &adjusted, mask_value, options, worker,
        ),
        4 => homography_mask_channels::<T, 4>(
            input, output, mask, &adjusted, mask_value, options, worker,
        ),
        n => {
            return Err(WarpError::unsupported(format!(
                "channel count {n} (supported: 1-4)"
            )));
        }
    }
    Ok(())
}

/// Whether every pixel of a `output_width × output_height` rectangle (offset
/// by `origin`) projects inside the input bounds under `transform`.
///
/// Projects the four rectangle corners; requires the homogeneous `z` to be
/// finite, non-zero and of one sign across all corners (the rectangle must
/// not straddle the horizon line), and every rounded corner position to be a
/// valid input pixel. Convexity and rounding monotonicity then cover every
/// interior pixel, so a `true` result guarantees the plain transform never
/// touches its border color.
pub fn covers_input_frame(
    transform: &Homography,
    input_width: u32,
    input_height: u32,
    output_width: u32,
    output_height: u32,
    origin: OutputOrigin,
) -> bool {
    if input_width == 0 || input_height == 0 || output_width == 0 || output_height == 0 {
        return false;
    }

    let adjusted = transform.with_output_origin(origin);
    let right = f64::from(output_width - 1);
    let bottom = f64::from(output_height - 1);
    let corners = [(0.0, 0.0), (right, 0.0), (0.0, bottom), (right, bottom)];

    let mut sign = 0.0f64;
    for (x, y) in corners {
        let (xx, yy, zz) = adjusted.apply_homogeneous(x, y);
        if zz == 0.0 || !zz.is_finite() {
            return false;
        }
        if sign == 0.0 {
            sign = zz.signum();
        } else if zz.signum() != sign {
            return false;
        }

        let ix = round_coord(xx / zz);
        let iy = round_coord(yy / zz);
        if ix < 0
            || iy < 0
            || ix >= i64::from(input_width)
            || iy >= i64::from(input_height)
        {
            return false;
        }
    }
    true
}

/// Row constants of the homogeneous product for output row `y`.
fn row_constants(m: &[[f64; 3]; 3], y: f64) -> (f64, f64, f64) {
    (
        m[0][1] * y + m[0][2],
        m[1][1] * y + m[1][2],
        m[2][1] * y + m[2][2],
    )
}

#[inline]
fn project(
    m: &[[f64; 3]; 3],
    x: f64,
    cx: f64,
    cy: f64,
    cz: f64,
    division: Division,
) -> (i64, i64) {
    let xx = m[0][0] * x + cx;
    let yy = m[1][0] * x + cy;
    let zz = m[2][0] * x + cz;
    match division {
        Division::Exact => (round_coord(xx / zz), round_coord(yy / zz)),
        Division::Reciprocal => {
            let r = f64::from(approx_recip(zz as f32));
            (round_coord(xx * r), round_coord(yy * r))
        }
    }
}

fn homography_channels<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    adjusted: &Homography,
    options: &WarpOptions<'_, T>,
    kernel: Kernel,
    worker: Option<&Worker>,
) {
    let border = border_array::<T, C>(options.border);
    let division = options.division;
    let m = adjusted.rows();

    run_bands(worker, output.reborrow(), |first_row, mut band| {
        for local_y in 0..band.height() {
            let (cx, cy, cz) = row_constants(&m, f64::from(first_row + local_y));
            let row = band.row_mut(local_y);
            match kernel {
                Kernel::Blocked => {
                    blocked_row::<T, C>(input, row, &m, cx, cy, cz, division, &border);
                }
                _ => scalar_row::<T, C>(input, row, &m, cx, cy, cz, division, &border),
            }
        }
    });
}

fn scalar_row<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    row: &mut [T],
    m: &[[f64; 3]; 3],
    cx: f64,
    cy: f64,
    cz: f64,
    division: Division,
    border: &[T; C],
) {
    for (x, dst) in row.chunks_exact_mut(C).enumerate() {
        let (ix, iy) = project(m, x as f64, cx, cy, cz, division);
        write_sample::<T, C>(input, dst, ix, iy, border);
    }
}

/// 4-pixel groups with tail realignment, as in the affine kernel. A group
/// whose four samples are all out of range broadcasts the border color
/// without per-lane gathers.
fn blocked_row<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    row: &mut [T],
    m: &[[f64; 3]; 3],
    cx: f64,
    cy: f64,
    cz: f64,
    division: Division,
    border: &[T; C],
) {
    let width = row.len() / C;
    debug_assert!(width >= 4);
    let iw = i64::from(input.width());
    let ih = i64::from(input.height());

    let mut x = 0usize;
    while x < width {
        let gx = if x + 4 > width { width - 4 } else { x };

        let mut coords = [(0i64, 0i64); 4];
        let mut any_in_range = false;
        for (lane, c) in coords.iter_mut().enumerate() {
            *c = project(m, (gx + lane) as f64, cx, cy, cz, division);
            any_in_range |= c.0 >= 0 && c.1 >= 0 && c.0 < iw && c.1 < ih;
        }

        if any_in_range {
            for (lane, &(ix, iy)) in coords.iter().enumerate() {
                let px = gx + lane;
                let dst = &mut row[px * C..(px + 1) * C];
                write_sample::<T, C>(input, dst, ix, iy, border);
            }
        } else {
            for px in gx..gx + 4 {
                row[px * C..(px + 1) * C].copy_from_slice(border);
            }
        }
        x = gx + 4;
    }
}

fn homography_mask_channels<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    mask: &mut FrameViewMut<'_, u8>,
    adjusted: &Homography,
    mask_value: u8,
    options: &WarpOptions<'_, T>,
    worker: Option<&Worker>,
) {
    let division = options.division;
    let m = adjusted.rows();
    let iw = i64::from(input.width());
    let ih = i64::from(input.height());

    run_bands_masked(
        worker,
        output.reborrow(),
        mask.reborrow(),
        |first_row, mut band, mut mask_band| {
            for local_y in 0..band.height() {
                let (cx, cy, cz) = row_constants(&m, f64::from(first_row + local_y));
                let row = band.row_mut(local_y);
                let mask_row = mask_band.row_mut(local_y);
                for (x, dst) in row.chunks_exact_mut(C).enumerate() {
                    let (ix, iy) = project(&m, x as f64, cx, cy, cz, division);
                    if ix >= 0 && iy >= 0 && ix < iw && iy < ih {
                        dst.copy_from_slice(input.pixel(ix as u32, iy as u32));
                        mask_row[x] = mask_value;
                    } else {
                        mask_row[x] = 0xFF - mask_value;
                    }
                }
            }
        },
    );
}

#[cfg(test)]
#[path = "../../tests/unit/warp/homography.rs"]
mod tests;
