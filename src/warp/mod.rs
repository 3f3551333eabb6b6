//! Nearest-pixel warp kernels and their dispatch layer.

use crate::foundation::core::{FrameView, FrameViewMut, PixelElement};
use crate::foundation::error::{WarpError, WarpResult};
use crate::foundation::math::FIXED_MAX_EDGE;

mod affine;
pub mod frames;
mod homography;
mod lookup;
mod resize;

pub use affine::affine;
pub use homography::{covers_input_frame, homography, homography_mask};
pub use lookup::{lookup, lookup_mask};
pub use resize::{resize, resize_in_place};

/// Kernel selection for the matrix transforms.
///
/// `Scalar` is the reference implementation; the other kernels exist for
/// throughput and are validated against it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub enum Strategy {
    /// `Blocked` when the output is at least 4 pixels wide, `Scalar`
    /// otherwise.
    #[default]
    Auto,
    /// Per-pixel reference kernel.
    Scalar,
    /// 4-pixel groups with tail realignment; bit-identical to `Scalar`.
    Blocked,
    /// Integer fixed-point affine kernel (15 fractional bits, per-block
    /// re-derivation). Falls back to `Blocked` when the geometry does not
    /// permit it. Rounding can differ from `Scalar` in the last bit.
    FixedPoint,
}

/// Divide implementation for the homography kernels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub enum Division {
    /// Exact f64 division.
    #[default]
    Exact,
    /// f32 reciprocal approximation with one Newton-Raphson refinement step.
    /// Faster on hardware with reciprocal estimates; rounding can differ
    /// from `Exact` near image borders.
    Reciprocal,
}

/// Per-call options shared by the matrix transforms.
#[derive(Clone, Copy, Debug)]
pub struct WarpOptions<'a, T> {
    /// Border fill, one element per channel; `None` zero-fills.
    pub border: Option<&'a [T]>,
    /// Where the output's local (0, 0) sits in transform space.
    pub origin: crate::foundation::core::OutputOrigin,
    /// Kernel selection.
    pub strategy: Strategy,
    /// Divide implementation (homography only).
    pub division: Division,
}

impl<T> Default for WarpOptions<'_, T> {
    fn default() -> Self {
        Self {
            border: None,
            origin: crate::foundation::core::OutputOrigin::default(),
            strategy: Strategy::default(),
            division: Division::default(),
        }
    }
}

/// Resolved kernel choice after geometry checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kernel {
    Scalar,
    Blocked,
    FixedPoint,
}

pub(crate) fn resolve_strategy(
    strategy: Strategy,
    output_width: u32,
    max_edge: u32,
    allow_fixed: bool,
) -> Kernel {
    let blocked_or_scalar = if output_width >= 4 {
        Kernel::Blocked
    } else {
        Kernel::Scalar
    };
    match strategy {
        Strategy::Scalar => Kernel::Scalar,
        Strategy::Auto | Strategy::Blocked => blocked_or_scalar,
        Strategy::FixedPoint => {
            if allow_fixed && output_width >= 4 && max_edge <= FIXED_MAX_EDGE {
                Kernel::FixedPoint
            } else {
                blocked_or_scalar
            }
        }
    }
}

pub(crate) fn check_same_channels<T>(
    input: &FrameView<'_, T>,
    output: &FrameViewMut<'_, T>,
) -> WarpResult<()> {
    if input.channels() != output.channels() {
        return Err(WarpError::layout(format!(
            "channel counts differ: input {}, output {}",
            input.channels(),
            output.channels()
        )));
    }
    Ok(())
}

pub(crate) fn check_supported_channels(channels: u32) -> WarpResult<()> {
    if !(1..=4).contains(&channels) {
        return Err(WarpError::unsupported(format!(
            "channel count {channels} (supported: 1-4)"
        )));
    }
    Ok(())
}

pub(crate) fn check_border<T>(border: Option<&[T]>, channels: u32) -> WarpResult<()> {
    if let Some(b) = border
        && b.len() != channels as usize
    {
        return Err(WarpError::layout(format!(
            "border color has {} elements for {channels} channels",
            b.len()
        )));
    }
    Ok(())
}

pub(crate) fn border_array<T: PixelElement, const C: usize>(border: Option<&[T]>) -> [T; C] {
    let mut out = [T::default(); C];
    if let Some(b) = border {
        out.copy_from_slice(&b[..C]);
    }
    out
}

pub(crate) fn check_mask<T>(
    output: &FrameViewMut<'_, T>,
    mask: &FrameViewMut<'_, u8>,
) -> WarpResult<()> {
    if mask.channels() != 1 {
        return Err(WarpError::layout("output mask must be single-channel"));
    }
    if mask.width() != output.width() || mask.height() != output.height() {
        return Err(WarpError::layout(format!(
            "mask is {}x{} for a {}x{} output",
            mask.width(),
            mask.height(),
            output.width(),
            output.height()
        )));
    }
    Ok(())
}

/// Copy the nearest input pixel or the border color into one output pixel.
#[inline]
pub(crate) fn write_sample<T: PixelElement, const C: usize>(
    input: &FrameView<'_, T>,
    dst: &mut [T],
    ix: i64,
    iy: i64,
    border: &[T; C],
) {
    let in_range =
        ix >= 0 && iy >= 0 && ix < i64::from(input.width()) && iy < i64::from(input.height());
    if in_range {
        dst.copy_from_slice(input.pixel(ix as u32, iy as u32));
    } else {
        dst.copy_from_slice(border);
    }
}
