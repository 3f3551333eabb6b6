use crate::foundation::error::{WarpError, WarpResult};

pub use kurbo::{Affine, Point, Vec2};

/// Runtime tag for the numeric type of one pixel channel element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum DataType {
    /// 8-bit unsigned integer channels.
    U8,
    /// 8-bit signed integer channels.
    I8,
    /// 32-bit unsigned integer channels.
    U32,
    /// 32-bit signed integer channels.
    I32,
    /// 32-bit float channels.
    F32,
}

/// Corner convention for the pixel grid's (0, 0).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum PixelOrigin {
    /// Row 0 is the top image row.
    #[default]
    UpperLeft,
    /// Row 0 is the bottom image row.
    LowerLeft,
}

/// Runtime description of a frame's pixel layout.
///
/// Two frames can be warped into each other only when their layouts match;
/// the dispatch layer checks this before touching any pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelLayout {
    /// Channel elements per pixel (the engine dispatches for 1 through 4).
    pub channels: u32,
    /// Element type shared by all channels.
    pub data_type: DataType,
    /// Pixel-origin convention.
    pub origin: PixelOrigin,
}

impl PixelLayout {
    /// Whether `other` describes the same channel count, element type and
    /// origin convention.
    pub fn matches(&self, other: &PixelLayout) -> bool {
        self == other
    }
}

/// Channel element types the engine samples.
///
/// Implemented for `u8`, `i8`, `u32`, `i32` and `f32`; the set mirrors the
/// [`DataType`] tags the dynamic layer dispatches on.
pub trait PixelElement: Copy + Default + Send + Sync + 'static {
    /// Runtime tag of this element type.
    const DATA_TYPE: DataType;
}

impl PixelElement for u8 {
    const DATA_TYPE: DataType = DataType::U8;
}
impl PixelElement for i8 {
    const DATA_TYPE: DataType = DataType::I8;
}
impl PixelElement for u32 {
    const DATA_TYPE: DataType = DataType::U32;
}
impl PixelElement for i32 {
    const DATA_TYPE: DataType = DataType::I32;
}
impl PixelElement for f32 {
    const DATA_TYPE: DataType = DataType::F32;
}

/// Integer offset of the output buffer's local (0, 0) in the coordinate
/// frame the transform was expressed in.
///
/// Folded into the transform before sampling, so kernels always iterate the
/// output from (0, 0).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub struct OutputOrigin {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

impl OutputOrigin {
    /// Build an origin offset.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_translation(self) -> Affine {
        Affine::translate((f64::from(self.x), f64::from(self.y)))
    }
}

/// Immutable borrowed view over a row-major pixel buffer.
///
/// `stride = width * channels + padding` elements separate adjacent row
/// starts; the trailing `padding` elements of each row are not part of the
/// logical image. The last row may omit its padding.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a, T> {
    data: &'a [T],
    width: u32,
    height: u32,
    channels: u32,
    padding: u32,
}

fn min_required_len(width: u32, height: u32, channels: u32, padding: u32) -> usize {
    let stride = (width as usize) * (channels as usize) + padding as usize;
    (height as usize - 1) * stride + (width as usize) * (channels as usize)
}

pub(crate) fn check_geometry<T>(
    data: &[T],
    width: u32,
    height: u32,
    channels: u32,
    padding: u32,
) -> WarpResult<()> {
    if width == 0 || height == 0 {
        return Err(WarpError::layout("frame dimensions must be non-zero"));
    }
    if channels == 0 {
        return Err(WarpError::layout("frame must have at least one channel"));
    }
    let required = min_required_len(width, height, channels, padding);
    if data.len() < required {
        return Err(WarpError::layout(format!(
            "frame buffer too small: need at least {required} elements, got {}",
            data.len()
        )));
    }
    Ok(())
}

impl<'a, T> FrameView<'a, T> {
    /// Build a view over `data`, validating buffer geometry.
    pub fn new(
        data: &'a [T],
        width: u32,
        height: u32,
        channels: u32,
        padding: u32,
    ) -> WarpResult<Self> {
        check_geometry(data, width, height, channels, padding)?;
        Ok(Self {
            data,
            width,
            height,
            channels,
            padding,
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

    /// Channel elements per pixel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Trailing padding elements per row.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Elements between adjacent row starts.
    pub fn stride(&self) -> usize {
        (self.width as usize) * (self.channels as usize) + self.padding as usize
    }

    /// The logical elements of row `y`, padding excluded.
    pub fn row(&self, y: u32) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y as usize * self.stride();
        &self.data[start..start + self.width as usize * self.channels as usize]
    }

    /// The channel elements of pixel (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> &'a [T] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let c = self.channels as usize;
        let start = y as usize * self.stride() + x as usize * c;
        &self.data[start..start + c]
    }
}

/// Mutable borrowed view over a row-major pixel buffer.
///
/// Same geometry rules as [`FrameView`].
#[derive(Debug)]
pub struct FrameViewMut<'a, T> {
    data: &'a mut [T],
    width: u32,
    height: u32,
    channels: u32,
    padding: u32,
}

impl<'a, T> FrameViewMut<'a, T> {
    /// Build a mutable view over `data`, validating buffer geometry.
    pub fn new(
        data: &'a mut [T],
        width: u32,
        height: u32,
        channels: u32,
        padding: u32,
    ) -> WarpResult<Self> {
        check_geometry(data, width, height, channels, padding)?;
        Ok(Self {
            data,
            width,
            height,
            channels,
            padding,
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

    /// Channel elements per pixel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Trailing padding elements per row.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Elements between adjacent row starts.
    pub fn stride(&self) -> usize {
        (self.width as usize) * (self.channels as usize) + self.padding as usize
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> FrameView<'_, T> {
        FrameView {
            data: self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            padding: self.padding,
        }
    }

    /// The logical elements of row `y`, padding excluded.
    pub fn row(&self, y: u32) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y as usize * self.stride();
        &self.data[start..start + self.width as usize * self.channels as usize]
    }

    /// Mutable logical elements of row `y`, padding excluded.
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        assert!(y < self.height, "row index out of bounds");
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + self.width as usize * self.channels as usize]
    }

    /// Mutable channel elements of pixel (`x`, `y`).
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [T] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let c = self.channels as usize;
        let start = y as usize * self.stride() + x as usize * c;
        &mut self.data[start..start + c]
    }

    /// Reborrow with a shorter lifetime, leaving `self` usable afterwards.
    pub(crate) fn reborrow(&mut self) -> FrameViewMut<'_, T> {
        FrameViewMut {
            data: self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            padding: self.padding,
        }
    }

    /// Split into two stacked views at `row` (rows `[0, row)` and
    /// `[row, height)`). Band workers rely on this to own disjoint output
    /// ranges without locking.
    pub(crate) fn split_at_row(self, row: u32) -> (Self, Self) {
        assert!(0 < row && row < self.height, "split row out of range");
        let stride = self.stride();
        let (top, bottom) = self.data.split_at_mut(row as usize * stride);
        (
            Self {
                data: top,
                width: self.width,
                height: row,
                channels: self.channels,
                padding: self.padding,
            },
            Self {
                data: bottom,
                width: self.width,
                height: self.height - row,
                channels: self.channels,
                padding: self.padding,
            },
        )
    }
}

/// Owned, zero-initialized pixel buffer with the same geometry rules as the
/// borrowed views.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer<T> {
    width: u32,
    height: u32,
    channels: u32,
    padding: u32,
    data: Vec<T>,
}

impl<T: PixelElement> FrameBuffer<T> {
    /// Allocate a zero-filled buffer, padding included on every row.
    pub fn new(width: u32, height: u32, channels: u32, padding: u32) -> WarpResult<Self> {
        if width == 0 || height == 0 {
            return Err(WarpError::layout("frame dimensions must be non-zero"));
        }
        if channels == 0 {
            return Err(WarpError::layout("frame must have at least one channel"));
        }
        let stride = (width as usize) * (channels as usize) + padding as usize;
        Ok(Self {
            width,
            height,
            channels,
            padding,
            data: vec![T::default(); height as usize * stride],
        })
    }

    /// Take ownership of an existing buffer, validating its geometry.
    pub fn from_vec(
        width: u32,
        height: u32,
        channels: u32,
        padding: u32,
        data: Vec<T>,
    ) -> WarpResult<Self> {
        check_geometry(&data, width, height, channels, padding)?;
        Ok(Self {
            width,
            height,
            channels,
            padding,
            data,
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

    /// Channel elements per pixel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Trailing padding elements per row.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// The raw element storage, padding included.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Borrow as an immutable view.
    pub fn view(&self) -> FrameView<'_, T> {
        FrameView {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            padding: self.padding,
        }
    }

    /// Borrow as a mutable view.
    pub fn view_mut(&mut self) -> FrameViewMut<'_, T> {
        FrameViewMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            padding: self.padding,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
