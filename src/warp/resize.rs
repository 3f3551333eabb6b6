use crate::foundation::core::{FrameBuffer, FrameView, FrameViewMut, PixelElement};
use crate::foundation::error::{WarpError, WarpResult};
use crate::warp::{check_same_channels, check_supported_channels};
use crate::worker::{Worker, run_bands};

/// Nearest-neighbor resize between two explicitly sized frames.
///
/// Every target pixel `(tx, ty)` copies source pixel
/// `(tx * src_w / dst_w, ty * src_h / dst_h)` (truncating integer division),
/// all channels verbatim. The target must already be allocated at the
/// desired size; no border handling is involved since every source index is
/// in range by construction.
pub fn resize<T: PixelElement>(
    source: &FrameView<'_, T>,
    target: &mut FrameViewMut<'_, T>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_same_channels(source, target)?;
    check_supported_channels(source.channels())?;

    let sw = u64::from(source.width());
    let sh = u64::from(source.height());
    let tw = u64::from(target.width());
    let th = u64::from(target.height());
    let channels = source.channels() as usize;

    // Horizontal mapping is row-independent; compute it once.
    let source_x: Vec<usize> = (0..tw).map(|tx| (tx * sw / tw) as usize).collect();

    run_bands(worker, target.reborrow(), |first_row, mut band| {
        for local_y in 0..band.height() {
            let ty = u64::from(first_row + local_y);
            let sy = (ty * sh / th) as u32;
            let src_row = source.row(sy);
            let dst_row = band.row_mut(local_y);
            for (tx, &sx) in source_x.iter().enumerate() {
                let src_px = &src_row[sx * channels..(sx + 1) * channels];
                dst_row[tx * channels..(tx + 1) * channels].copy_from_slice(src_px);
            }
        }
    });

    Ok(())
}

/// Resize an owned buffer in place: allocates a buffer of the new size,
/// resizes into it, and swaps it in.
pub fn resize_in_place<T: PixelElement>(
    frame: &mut FrameBuffer<T>,
    width: u32,
    height: u32,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    if width == 0 || height == 0 {
        return Err(WarpError::layout("resize target dimensions must be non-zero"));
    }
    if width == frame.width() && height == frame.height() {
        return Ok(());
    }

    let mut resized = FrameBuffer::new(width, height, frame.channels(), frame.padding())?;
    resize(&frame.view(), &mut resized.view_mut(), worker)?;
    *frame = resized;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/warp/resize.rs"]
mod tests;
