use crate::foundation::core::{FrameView, FrameViewMut, PixelElement};
use crate::foundation::error::{WarpError, WarpResult};
use crate::foundation::math::round_coord;
use crate::transform::lookup::{FieldMode, VectorField};
use crate::warp::{border_array, check_border, check_mask, check_same_channels, write_sample};
use crate::worker::{Worker, run_bands, run_bands_masked};

fn check_field_dims<T>(output: &FrameViewMut<'_, T>, field: &VectorField) -> WarpResult<()> {
    if output.width() != field.size_x() || output.height() != field.size_y() {
        return Err(WarpError::layout(format!(
            "output is {}x{} but the field domain is {}x{}",
            output.width(),
            output.height(),
            field.size_x(),
            field.size_y()
        )));
    }
    Ok(())
}

/// Warp `input` into `output` through a lookup field, nearest-pixel.
///
/// Each output pixel samples the input at the field vector interpolated at
/// its own position (`mode` selects absolute positions or per-pixel
/// offsets). The output dimensions must equal the field domain exactly.
/// Out-of-range samples write `border` (zero when absent).
pub fn lookup<T: PixelElement>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    field: &VectorField,
    mode: FieldMode,
    border: Option<&[T]>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_same_channels(input, output)?;
    check_border(border, input.channels())?;
    check_field_dims(output, field)?;

    match input.channels() {
        1 => lookup_channels::<T, 1>(input, output, field, mode, border, worker),
        2 => lookup_channels::<T, 2>(input, output, field, mode, border, worker),
        3 => lookup_channels::<T, 3>(input, output, field, mode, border, worker),
        4 => lookup_channels::<T, 4>(input, output, field, mode, border, worker),
        n => {
            return Err(WarpError::unsupported(format!(
                "channel count {n} (supported: 1-4)"
            )));
        }
    }
    Ok(())
}

/// Masked variant of [`lookup`]: writes `mask_value` for in-range samples
/// and `0xFF - mask_value` for out-of-range ones, leaving out-of-range
/// output pixels untouched.
pub fn lookup_mask<T: PixelElement>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    mask: &mut FrameViewMut<'_, u8>,
    field: &VectorField,
    mode: FieldMode,
    mask_value: u8,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_same_channels(input, output)?;
    check_mask(output, mask)?;
    check_field_dims(output, field)?;

    match input.channels() {
        1 => lookup_mask_channels::<T, 1>(input, output, mask, field, mode, mask_value, worker),
        2 => lookup_mask_channels::<T, 2>(input, output, mask, field, mode, mask_value, worker),
        3 => lookup_mask_channels::<T, 3>(input, output, mask, field, mode, mask_value, worker),
        4 => lookup_mask_channels::<T, 4>(input, output, mask, field, mode, mask_value, worker),
        n => {
            return Err(WarpError::unsupported(format!(
                "channel count {n} (supported: 1-4)"
            )));
        }
    }
    Ok(())
}

#[inline]
fn field_position(field: &VectorField, mode: FieldMode, x: u32, y: u32) -> (f64, f64) {
    let v = field.bilinear_value(f64::from(x), f64::from(y));
    match mode {
        FieldMode::Absolute => (v.x, v.y),
        FieldMode::Offset => (v.x + f64::from(x), v.y + f64::from(y)),
    }
}

fn lookup_channels<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    field: &VectorField,
    mode: FieldMode,
    border: Option<&[T]>,
    worker: Option<&Worker>,
) {
    let border = border_array::<T, C>(border);

    run_bands(worker, output.reborrow(), |first_row, mut band| {
        for local_y in 0..band.height() {
            let y = first_row + local_y;
            let row = band.row_mut(local_y);
            for (x, dst) in row.chunks_exact_mut(C).enumerate() {
                let (fx, fy) = field_position(field, mode, x as u32, y);
                write_sample::<T, C>(input, dst, round_coord(fx), round_coord(fy), &border);
            }
        }
    });
}

fn lookup_mask_channels<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    output: &mut FrameViewMut<'_, T>,
    mask: &mut FrameViewMut<'_, u8>,
    field: &VectorField,
    mode: FieldMode,
    mask_value: u8,
    worker: Option<&Worker>,
) {
    let iw = i64::from(input.width());
    let ih = i64::from(input.height());

    run_bands_masked(
        worker,
        output.reborrow(),
        mask.reborrow(),
        |first_row, mut band, mut mask_band| {
            for local_y in 0..band.height() {
                let y = first_row + local_y;
                let row = band.row_mut(local_y);
                let mask_row = mask_band.row_mut(local_y);
                for (x, dst) in row.chunks_exact_mut(C).enumerate() {
                    let (fx, fy) = field_position(field, mode, x as u32, y);
                    let ix = round_coord(fx);
                    let iy = round_coord(fy);
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
#[path = "../../tests/unit/warp/lookup.rs"]
mod tests;
