use std::ops::Mul;

use crate::foundation::core::{Affine, OutputOrigin, Point};

/// General 3×3 projective transform mapping output-pixel coordinates to
/// input-pixel coordinates: `input = (H · [x, y, 1]) / z`.
///
/// Stored row-major. The engine entry points reject singular matrices; see
/// [`Homography::is_invertible`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Homography {
    rows: [[f64; 3]; 3],
}

impl Homography {
    /// The identity mapping.
    pub const IDENTITY: Homography = Homography {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Build from row-major coefficients.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Embed an affine transform (bottom row `[0, 0, 1]`).
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        Self {
            rows: [[a, c, e], [b, d, f], [0.0, 0.0, 1.0]],
        }
    }

    /// Row-major coefficients.
    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.rows
    }

    /// Matrix determinant.
    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Whether the matrix is usable as a projective transform. The engine
    /// treats a determinant magnitude below `1e-12` as singular.
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > 1e-12
    }

    /// Fold an output-origin offset into the matrix, so sampling can iterate
    /// the output from its local (0, 0).
    pub fn with_output_origin(&self, origin: OutputOrigin) -> Self {
        let translation = Homography {
            rows: [
                [1.0, 0.0, f64::from(origin.x)],
                [0.0, 1.0, f64::from(origin.y)],
                [0.0, 0.0, 1.0],
            ],
        };
        *self * translation
    }

    /// Map a point, performing the homogeneous divide. A point on the line
    /// `z = 0` yields non-finite coordinates.
    pub fn apply(&self, p: Point) -> Point {
        let (xx, yy, zz) = self.apply_homogeneous(p.x, p.y);
        Point::new(xx / zz, yy / zz)
    }

    pub(crate) fn apply_homogeneous(&self, x: f64, y: f64) -> (f64, f64, f64) {
        let m = &self.rows;
        (
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
            m[2][0] * x + m[2][1] * y + m[2][2],
        )
    }
}

impl Mul for Homography {
    type Output = Homography;

    /// Composition: `(a * b)` applies `b` first, then `a`.
    fn mul(self, rhs: Homography) -> Homography {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Homography { rows }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/homography.rs"]
mod tests;
