//! Dispatch layer over runtime-described frames.
//!
//! The typed entry points in [`crate::warp`] require the caller to know the
//! element type at compile time. Media pipelines usually don't; this module
//! wraps the pixel storage in runtime-tagged enums, validates that source
//! and target layouts match, and routes each call into the matching
//! monomorphized kernel.

use crate::foundation::core::{
    Affine, DataType, FrameView, FrameViewMut, OutputOrigin, PixelLayout, PixelOrigin,
    check_geometry,
};
use crate::foundation::error::{WarpError, WarpResult};
use crate::transform::homography::Homography;
use crate::transform::lookup::{FieldMode, VectorField};
use crate::warp::{
    Division, Strategy, WarpOptions, check_supported_channels, homography, homography_mask,
    lookup, lookup_mask, resize,
};
use crate::worker::Worker;

/// Runtime-tagged immutable pixel storage.
#[derive(Clone, Copy, Debug)]
pub enum FrameData<'a> {
    /// 8-bit unsigned elements.
    U8(&'a [u8]),
    /// 8-bit signed elements.
    I8(&'a [i8]),
    /// 32-bit unsigned elements.
    U32(&'a [u32]),
    /// 32-bit signed elements.
    I32(&'a [i32]),
    /// 32-bit float elements.
    F32(&'a [f32]),
}

impl FrameData<'_> {
    /// Runtime tag of the element type.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::U8(_) => DataType::U8,
            Self::I8(_) => DataType::I8,
            Self::U32(_) => DataType::U32,
            Self::I32(_) => DataType::I32,
            Self::F32(_) => DataType::F32,
        }
    }
}

/// Runtime-tagged mutable pixel storage.
#[derive(Debug)]
pub enum FrameDataMut<'a> {
    /// 8-bit unsigned elements.
    U8(&'a mut [u8]),
    /// 8-bit signed elements.
    I8(&'a mut [i8]),
    /// 32-bit unsigned elements.
    U32(&'a mut [u32]),
    /// 32-bit signed elements.
    I32(&'a mut [i32]),
    /// 32-bit float elements.
    F32(&'a mut [f32]),
}

impl FrameDataMut<'_> {
    /// Runtime tag of the element type.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::U8(_) => DataType::U8,
            Self::I8(_) => DataType::I8,
            Self::U32(_) => DataType::U32,
            Self::I32(_) => DataType::I32,
            Self::F32(_) => DataType::F32,
        }
    }
}

/// Border color with the same element tagging as the frame data.
#[derive(Clone, Copy, Debug)]
pub enum BorderColor<'a> {
    /// 8-bit unsigned elements.
    U8(&'a [u8]),
    /// 8-bit signed elements.
    I8(&'a [i8]),
    /// 32-bit unsigned elements.
    U32(&'a [u32]),
    /// 32-bit signed elements.
    I32(&'a [i32]),
    /// 32-bit float elements.
    F32(&'a [f32]),
}

/// Immutable frame with a runtime-described layout.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    data: FrameData<'a>,
    width: u32,
    height: u32,
    channels: u32,
    padding: u32,
    origin: PixelOrigin,
}

impl<'a> Frame<'a> {
    /// Wrap runtime-tagged storage, validating buffer geometry.
    pub fn new(
        data: FrameData<'a>,
        width: u32,
        height: u32,
        channels: u32,
        padding: u32,
        origin: PixelOrigin,
    ) -> WarpResult<Self> {
        match &data {
            FrameData::U8(d) => check_geometry(d, width, height, channels, padding)?,
            FrameData::I8(d) => check_geometry(d, width, height, channels, padding)?,
            FrameData::U32(d) => check_geometry(d, width, height, channels, padding)?,
            FrameData::I32(d) => check_geometry(d, width, height, channels, padding)?,
            FrameData::F32(d) => check_geometry(d, width, height, channels, padding)?,
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            padding,
            origin,
        })
    }

    /// Logical width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The frame's pixel layout.
    pub fn layout(&self) -> PixelLayout {
        PixelLayout {
            channels: self.channels,
            data_type: self.data.data_type(),
            origin: self.origin,
        }
    }
}

/// Mutable frame with a runtime-described layout.
#[derive(Debug)]
pub struct FrameMut<'a> {
    data: FrameDataMut<'a>,
    width: u32,
    height: u32,
    channels: u32,
    padding: u32,
    origin: PixelOrigin,
}

impl<'a> FrameMut<'a> {
    /// Wrap runtime-tagged mutable storage, validating buffer geometry.
    pub fn new(
        data: FrameDataMut<'a>,
        width: u32,
        height: u32,
        channels: u32,
        padding: u32,
        origin: PixelOrigin,
    ) -> WarpResult<Self> {
        match &data {
            FrameDataMut::U8(d) => check_geometry(d, width, height, channels, padding)?,
            FrameDataMut::I8(d) => check_geometry(d, width, height, channels, padding)?,
            FrameDataMut::U32(d) => check_geometry(d, width, height, channels, padding)?,
            FrameDataMut::I32(d) => check_geometry(d, width, height, channels, padding)?,
            FrameDataMut::F32(d) => check_geometry(d, width, height, channels, padding)?,
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            padding,
            origin,
        })
    }

    /// Logical width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The frame's pixel layout.
    pub fn layout(&self) -> PixelLayout {
        PixelLayout {
            channels: self.channels,
            data_type: self.data.data_type(),
            origin: self.origin,
        }
    }
}

/// Options for the dispatch-layer transforms.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameWarpOptions<'a> {
    /// Border fill, one element per channel; `None` zero-fills. Its element
    /// type must match the frames.
    pub border: Option<BorderColor<'a>>,
    /// Where the output's local (0, 0) sits in transform space.
    pub origin: OutputOrigin,
    /// Kernel selection.
    pub strategy: Strategy,
    /// Divide implementation (homography only).
    pub division: Division,
}

fn check_layouts(source: &Frame<'_>, target: &FrameMut<'_>) -> WarpResult<()> {
    if !source.layout().matches(&target.layout()) {
        return Err(WarpError::layout(format!(
            "pixel layouts differ: source {:?}, target {:?}",
            source.layout(),
            target.layout()
        )));
    }
    check_supported_channels(source.channels)
}

trait BorderElement: Sized {
    fn from_border<'a>(border: &BorderColor<'a>) -> Option<&'a [Self]>;
}

macro_rules! impl_border_element {
    ($ty:ty, $variant:ident) => {
        impl BorderElement for $ty {
            fn from_border<'a>(border: &BorderColor<'a>) -> Option<&'a [Self]> {
                match border {
                    BorderColor::$variant(b) => Some(b),
                    _ => None,
                }
            }
        }
    };
}

impl_border_element!(u8, U8);
impl_border_element!(i8, I8);
impl_border_element!(u32, U32);
impl_border_element!(i32, I32);
impl_border_element!(f32, F32);

fn typed_border<'a, T: BorderElement>(
    border: Option<&BorderColor<'a>>,
) -> WarpResult<Option<&'a [T]>> {
    match border {
        None => Ok(None),
        Some(b) => T::from_border(b)
            .map(Some)
            .ok_or_else(|| WarpError::layout("border color element type must match the frames")),
    }
}

/// Expand `$body` once per matching element-type pair; mismatches (already
/// rejected by the layout check) fall through to a layout error.
macro_rules! dispatch_pair {
    ($source:expr, $target:expr, |$s:ident, $d:ident| $body:expr) => {
        match (&$source.data, &mut $target.data) {
            (FrameData::U8($s), FrameDataMut::U8($d)) => $body,
            (FrameData::I8($s), FrameDataMut::I8($d)) => $body,
            (FrameData::U32($s), FrameDataMut::U32($d)) => $body,
            (FrameData::I32($s), FrameDataMut::I32($d)) => $body,
            (FrameData::F32($s), FrameDataMut::F32($d)) => $body,
            _ => Err(WarpError::layout("source and target element types differ")),
        }
    };
}

fn mask_view<'m>(mask: &'m mut FrameMut<'_>) -> WarpResult<FrameViewMut<'m, u8>> {
    if mask.channels != 1 {
        return Err(WarpError::layout("output mask must be single-channel"));
    }
    match &mut mask.data {
        FrameDataMut::U8(d) => FrameViewMut::new(&mut **d, mask.width, mask.height, 1, mask.padding),
        _ => Err(WarpError::layout("output mask must be 8-bit")),
    }
}

/// Nearest-neighbor resize between two runtime-described frames.
#[tracing::instrument(skip_all)]
pub fn resize_frames(
    source: &Frame<'_>,
    target: &mut FrameMut<'_>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_layouts(source, target)?;
    let (sw, sh, sc, sp) = (source.width, source.height, source.channels, source.padding);
    let (tw, th, tc, tp) = (target.width, target.height, target.channels, target.padding);
    dispatch_pair!(source, target, |s, d| {
        let src = FrameView::new(*s, sw, sh, sc, sp)?;
        let mut dst = FrameViewMut::new(&mut **d, tw, th, tc, tp)?;
        resize(&src, &mut dst, worker)
    })
}

/// Affine warp between two runtime-described frames.
#[tracing::instrument(skip(source, target, worker))]
pub fn affine_frames(
    source: &Frame<'_>,
    target: &mut FrameMut<'_>,
    transform: &Affine,
    options: &FrameWarpOptions<'_>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_layouts(source, target)?;
    let (sw, sh, sc, sp) = (source.width, source.height, source.channels, source.padding);
    let (tw, th, tc, tp) = (target.width, target.height, target.channels, target.padding);
    dispatch_pair!(source, target, |s, d| {
        let src = FrameView::new(*s, sw, sh, sc, sp)?;
        let mut dst = FrameViewMut::new(&mut **d, tw, th, tc, tp)?;
        let opts = WarpOptions {
            border: typed_border(options.border.as_ref())?,
            origin: options.origin,
            strategy: options.strategy,
            division: options.division,
        };
        crate::warp::affine(&src, &mut dst, transform, &opts, worker)
    })
}

/// Projective warp between two runtime-described frames.
#[tracing::instrument(skip(source, target, worker))]
pub fn homography_frames(
    source: &Frame<'_>,
    target: &mut FrameMut<'_>,
    transform: &Homography,
    options: &FrameWarpOptions<'_>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_layouts(source, target)?;
    let (sw, sh, sc, sp) = (source.width, source.height, source.channels, source.padding);
    let (tw, th, tc, tp) = (target.width, target.height, target.channels, target.padding);
    dispatch_pair!(source, target, |s, d| {
        let src = FrameView::new(*s, sw, sh, sc, sp)?;
        let mut dst = FrameViewMut::new(&mut **d, tw, th, tc, tp)?;
        let opts = WarpOptions {
            border: typed_border(options.border.as_ref())?,
            origin: options.origin,
            strategy: options.strategy,
            division: options.division,
        };
        homography(&src, &mut dst, transform, &opts, worker)
    })
}

/// Masked projective warp between two runtime-described frames. `mask` must
/// be a single-channel 8-bit frame with the target's dimensions.
#[tracing::instrument(skip(source, target, mask, worker))]
pub fn homography_mask_frames(
    source: &Frame<'_>,
    target: &mut FrameMut<'_>,
    mask: &mut FrameMut<'_>,
    transform: &Homography,
    mask_value: u8,
    options: &FrameWarpOptions<'_>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_layouts(source, target)?;
    let (sw, sh, sc, sp) = (source.width, source.height, source.channels, source.padding);
    let (tw, th, tc, tp) = (target.width, target.height, target.channels, target.padding);
    let mut mask = mask_view(mask)?;
    dispatch_pair!(source, target, |s, d| {
        let src = FrameView::new(*s, sw, sh, sc, sp)?;
        let mut dst = FrameViewMut::new(&mut **d, tw, th, tc, tp)?;
        let opts = WarpOptions {
            border: None,
            origin: options.origin,
            strategy: options.strategy,
            division: options.division,
        };
        homography_mask(&src, &mut dst, &mut mask, transform, mask_value, &opts, worker)
    })
}

/// Lookup-field warp between two runtime-described frames.
#[tracing::instrument(skip(source, target, field, worker))]
pub fn lookup_frames(
    source: &Frame<'_>,
    target: &mut FrameMut<'_>,
    field: &VectorField,
    mode: FieldMode,
    border: Option<BorderColor<'_>>,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_layouts(source, target)?;
    let (sw, sh, sc, sp) = (source.width, source.height, source.channels, source.padding);
    let (tw, th, tc, tp) = (target.width, target.height, target.channels, target.padding);
    dispatch_pair!(source, target, |s, d| {
        let src = FrameView::new(*s, sw, sh, sc, sp)?;
        let mut dst = FrameViewMut::new(&mut **d, tw, th, tc, tp)?;
        lookup(&src, &mut dst, field, mode, typed_border(border.as_ref())?, worker)
    })
}

/// Masked lookup-field warp between two runtime-described frames.
#[tracing::instrument(skip(source, target, mask, field, worker))]
pub fn lookup_mask_frames(
    source: &Frame<'_>,
    target: &mut FrameMut<'_>,
    mask: &mut FrameMut<'_>,
    field: &VectorField,
    mode: FieldMode,
    mask_value: u8,
    worker: Option<&Worker>,
) -> WarpResult<()> {
    check_layouts(source, target)?;
    let (sw, sh, sc, sp) = (source.width, source.height, source.channels, source.padding);
    let (tw, th, tc, tp) = (target.width, target.height, target.channels, target.padding);
    let mut mask = mask_view(mask)?;
    dispatch_pair!(source, target, |s, d| {
        let src = FrameView::new(*s, sw, sh, sc, sp)?;
        let mut dst = FrameViewMut::new(&mut **d, tw, th, tc, tp)?;
        lookup_mask(&src, &mut dst, &mut mask, field, mode, mask_value, worker)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/warp/frames.rs"]
mod tests;
