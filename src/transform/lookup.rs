use crate::foundation::core::Vec2;
use crate::foundation::error::{WarpError, WarpResult};

/// Interpretation of the vectors stored in a [`VectorField`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
pub enum FieldMode {
    /// Vectors are absolute input-space positions.
    #[default]
    Absolute,
    /// Vectors are offsets added to the output pixel position.
    Offset,
}

/// Coarse 2D grid of vectors, bilinearly interpolable over a
/// `size_x × size_y` pixel domain.
///
/// Grid vectors sit at bin centers `((b + 0.5) · size / bins)`; queries
/// beyond the outermost centers extend linearly from the edge bin pair, so
/// a field sampled from a linear mapping reproduces that mapping exactly
/// over the whole domain. The domain size defines the output dimensions of
/// the lookup transforms exactly.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorField {
    size_x: u32,
    size_y: u32,
    bins_x: u32,
    bins_y: u32,
    values: Vec<Vec2>,
}

impl VectorField {
    /// Allocate a zero-vector field.
    pub fn new(size_x: u32, size_y: u32, bins_x: u32, bins_y: u32) -> WarpResult<Self> {
        if size_x == 0 || size_y == 0 {
            return Err(WarpError::transform("field domain must be non-empty"));
        }
        if bins_x == 0 || bins_y == 0 {
            return Err(WarpError::transform("field must have at least one bin per axis"));
        }
        Ok(Self {
            size_x,
            size_y,
            bins_x,
            bins_y,
            values: vec![Vec2::ZERO; bins_x as usize * bins_y as usize],
        })
    }

    /// Build a field by evaluating `f` at every bin center (domain
    /// coordinates).
    pub fn from_fn(
        size_x: u32,
        size_y: u32,
        bins_x: u32,
        bins_y: u32,
        mut f: impl FnMut(f64, f64) -> Vec2,
    ) -> WarpResult<Self> {
        let mut field = Self::new(size_x, size_y, bins_x, bins_y)?;
        for by in 0..bins_y {
            for bx in 0..bins_x {
                let (cx, cy) = field.bin_center(bx, by);
                let v = f(cx, cy);
                field.set_bin_value(bx, by, v);
            }
        }
        Ok(field)
    }

    /// Horizontal domain extent in pixels.
    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Vertical domain extent in pixels.
    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Horizontal bin count.
    pub fn bins_x(&self) -> u32 {
        self.bins_x
    }

    /// Vertical bin count.
    pub fn bins_y(&self) -> u32 {
        self.bins_y
    }

    /// Domain position of the center of bin (`bx`, `by`).
    pub fn bin_center(&self, bx: u32, by: u32) -> (f64, f64) {
        assert!(bx < self.bins_x && by < self.bins_y, "bin out of range");
        (
            (f64::from(bx) + 0.5) * f64::from(self.size_x) / f64::from(self.bins_x),
            (f64::from(by) + 0.5) * f64::from(self.size_y) / f64::from(self.bins_y),
        )
    }

    /// The vector stored at bin (`bx`, `by`).
    pub fn bin_value(&self, bx: u32, by: u32) -> Vec2 {
        assert!(bx < self.bins_x && by < self.bins_y, "bin out of range");
        self.values[by as usize * self.bins_x as usize + bx as usize]
    }

    /// Store a vector at bin (`bx`, `by`).
    pub fn set_bin_value(&mut self, bx: u32, by: u32, value: Vec2) {
        assert!(bx < self.bins_x && by < self.bins_y, "bin out of range");
        self.values[by as usize * self.bins_x as usize + bx as usize] = value;
    }

    /// Bilinearly interpolated vector at domain position (`x`, `y`); beyond
    /// the outermost bin centers the edge bin pair extends linearly.
    pub fn bilinear_value(&self, x: f64, y: f64) -> Vec2 {
        let (x0, x1, fx) = self.bin_span(x, self.size_x, self.bins_x);
        let (y0, y1, fy) = self.bin_span(y, self.size_y, self.bins_y);

        let stride = self.bins_x as usize;
        let v00 = self.values[y0 * stride + x0];
        let v10 = self.values[y0 * stride + x1];
        let v01 = self.values[y1 * stride + x0];
        let v11 = self.values[y1 * stride + x1];

        let top = v00 * (1.0 - fx) + v10 * fx;
        let bottom = v01 * (1.0 - fx) + v11 * fx;
        top * (1.0 - fy) + bottom * fy
    }

    /// Neighboring bin indices and interpolation weight along one axis, in
    /// continuous bin coordinates (bin `b` centered at `b + 0.5` bins). The
    /// index pair clamps to the grid while the weight may leave `[0, 1]`,
    /// which yields the linear edge extension.
    fn bin_span(&self, v: f64, size: u32, bins: u32) -> (usize, usize, f64) {
        if bins == 1 {
            return (0, 0, 0.0);
        }
        let t = v * f64::from(bins) / f64::from(size) - 0.5;
        let lo = t.floor().clamp(0.0, f64::from(bins - 2));
        (lo as usize, lo as usize + 1, t - lo)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/lookup.rs"]
mod tests;
