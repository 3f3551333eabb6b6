use crate::foundation::core::{Affine, FrameView, FrameViewMut, PixelElement};
use crate::foundation::error::{WarpError, WarpResult};
use crate::foundation::math::{fixed_round, round_coord, to_fixed};
use crate::warp::{
    Kernel, WarpOptions, border_array, check_border, check_same_channels, resolve_strategy,
    write_sample,
};
use crate::worker::{Worker, run_bands};

/// Columns processed between fixed-point re-derivations.
const FIXED_BLOCK: usize = 64;

/// Warp `input` into `output` through a 2D affine transform, nearest-pixel.
///
/// The transform maps output-pixel coordinates to input-pixel coordinates.
/// `options.origin` is folded into the transform before sampling. Sampled
/// coordinates are rounded half away from zero; out-of-range samples write
/// `options.border` (zero when absent).
pub fn affine<T: PixelElement>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    transform: &Affine,
    options: &WarpOptions<'_, T>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_same_channels(input, output)?;
    check_border(options.border, input.channels())?;

    let adjusted = *transform * options.origin.to_translation();
    let max_edge = input
        .width()
        .max(input.height())
        .max(output.width())
        .max(output.height());
    let kernel = resolve_strategy(options.strategy, output.width(), max_edge, true);

    match input.channels() {
        1 => affine_channels::<T, 1>(input, output, adjusted, options.border, kernel, worker),
        2 => affine_channels::<T, 2>(input, output, adjusted, options.border, kernel, worker),
        3 => affine_channels::<T, 3>(input, output, adjusted, options.border, kernel, worker),
        4 => affine_channels::<T, 4>(input, output, adjusted, options.border, kernel, worker),
        n => {
            return Err(WarpError::unsupported(format!(
                "channel count {n} (supported: 1-4)"
            )));
        }
    }
    Ok(())
}

fn affine_channels<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    adjusted: Affine,
    border: Option<&[T]>,
    kernel: Kernel,
    worker: Option<&Worker>,
) {
    let border = border_array::<T, C>(border);
    // kurbo coefficient order: x' = a*x + c*y + e, y' = b*x + d*y + f.
    let [a, b, c, d, e, f] = adjusted.as_coeffs();

    run_bands(worker, output.reborrow(), |first_row, mut band| {
        for local_y in 0..band.height() {
            let y = f64::from(first_row + local_y);
            let cx = c * y + e;
            let cy = d * y + f;
            let row = band.row_mut(local_y);
            match kernel {
                Kernel::Scalar => scalar_row::<T, C>(input, row, a, b, cx, cy, &border),
                Kernel::Blocked => blocked_row::<T, C>(input, row, a, b, cx, cy, &border),
                Kernel::FixedPoint => fixed_row::<T, C>(input, row, a, b, cx, cy, &border),
            }
        }
    });
}

fn scalar_row<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    row: &mut [T],
    a: f64,
    b: f64,
    cx: f64,
    cy: f64,
    border: &[T; C],
) {
    for (x, dst) in row.chunks_exact_mut(C).enumerate() {
        let fx = a * x as f64 + cx;
        let fy = b * x as f64 + cy;
        write_sample::<T, C>(input, dst, round_coord(fx), round_coord(fy), border);
    }
}

/// Same arithmetic as [`scalar_row`], organized in 4-pixel groups. The last
/// partial group realigns to `width - 4`, recomputing up to 3 already
/// written pixels; the recomputation resolves to the same source lookup.
fn blocked_row<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    row: &mut [T],
    a: f64,
    b: f64,
    cx: f64,
    cy: f64,
    border: &[T; C],
) {
    let width = row.len() / C;
    debug_assert!(width >= 4);

    let mut x = 0usize;
    while x < width {
        let gx = if x + 4 > width { width - 4 } else { x };
        for px in gx..gx + 4 {
            let fx = a * px as f64 + cx;
            let fy = b * px as f64 + cy;
            let dst = &mut row[px * C..(px + 1) * C];
            write_sample::<T, C>(input, dst, round_coord(fx), round_coord(fy), border);
        }
        x = gx + 4;
    }
}

/// Integer fixed-point variant: coordinates carry 15 fractional bits and
/// advance by a constant per-pixel step, re-derived from floating point at
/// every block start to bound accumulated rounding error.
fn fixed_row<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    row: &mut [T],
    a: f64,
    b: f64,
    cx: f64,
    cy: f64,
    border: &[T; C],
) {
    let width = row.len() / C;
    let step_x = to_fixed(a);
    let step_y = to_fixed(b);

    let mut block = 0usize;
    while block < width {
        let len = FIXED_BLOCK.min(width - block);
        let mut fx = to_fixed(a * block as f64 + cx);
        let mut fy = to_fixed(b * block as f64 + cy);
        for px in block..block + len {
            let dst = &mut row[px * C..(px + 1) * C];
            write_sample::<T, C>(input, dst, fixed_round(fx), fixed_round(fy), border);
            fx = fx.saturating_add(step_x);
            fy = fy.saturating_add(step_y);
        }
        block += len;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/warp/affine.rs"]
mod tests;
