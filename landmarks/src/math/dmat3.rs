//! Row-major 3x3 matrix of f64 values.

use glam::DVec3;
use std::ops::{Index, IndexMut, Mul};

/// Row-major 3x3 matrix of f64 values.
///
/// Memory layout:
/// ```text
/// | m[0] m[1] m[2] |
/// | m[3] m[4] m[5] |
/// | m[6] m[7] m[8] |
/// ```
///
/// Row-major storage matches the order in which rotation entries are
/// written to transform files (`r00 r01 r02 r10 ...`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DMat3 {
    data: [f64; 9],
}

impl DMat3 {
    /// Create from a raw array in row-major order.
    #[inline]
    pub const fn from_array(data: [f64; 9]) -> Self {
        Self { data }
    }

    /// Create the 3x3 identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            data: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Create from three row arrays.
    #[inline]
    pub const fn from_rows(row0: [f64; 3], row1: [f64; 3], row2: [f64; 3]) -> Self {
        Self {
            data: [
                row0[0], row0[1], row0[2], row1[0], row1[1], row1[2], row2[0], row2[1], row2[2],
            ],
        }
    }

    /// Diagonal matrix `diag(d.x, d.y, d.z)`.
    #[inline]
    pub const fn from_diagonal(d: DVec3) -> Self {
        Self {
            data: [d.x, 0.0, 0.0, 0.0, d.y, 0.0, 0.0, 0.0, d.z],
        }
    }

    /// Reference to the underlying row-major array.
    #[inline]
    pub const fn as_array(&self) -> &[f64; 9] {
        &self.data
    }

    /// Consume and return the underlying array.
    #[inline]
    pub const fn to_array(self) -> [f64; 9] {
        self.data
    }

    /// Entry at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * 3 + col]
    }

    #[inline]
    pub fn row(&self, row: usize) -> DVec3 {
        let i = row * 3;
        DVec3::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    #[inline]
    pub fn transpose(&self) -> DMat3 {
        let d = &self.data;
        DMat3 {
            data: [d[0], d[3], d[6], d[1], d[4], d[7], d[2], d[5], d[8]],
        }
    }

    /// Matrix multiplication: `self * rhs`.
    #[inline]
    pub fn mul_mat(&self, rhs: &DMat3) -> DMat3 {
        let a = &self.data;
        let b = &rhs.data;
        DMat3 {
            data: [
                a[0] * b[0] + a[1] * b[3] + a[2] * b[6],
                a[0] * b[1] + a[1] * b[4] + a[2] * b[7],
                a[0] * b[2] + a[1] * b[5] + a[2] * b[8],
                a[3] * b[0] + a[4] * b[3] + a[5] * b[6],
                a[3] * b[1] + a[4] * b[4] + a[5] * b[7],
                a[3] * b[2] + a[4] * b[5] + a[5] * b[8],
                a[6] * b[0] + a[7] * b[3] + a[8] * b[6],
                a[6] * b[1] + a[7] * b[4] + a[8] * b[7],
                a[6] * b[2] + a[7] * b[5] + a[8] * b[8],
            ],
        }
    }

    /// Matrix-vector product `self * v`.
    #[inline]
    pub fn mul_vec3(&self, v: DVec3) -> DVec3 {
        let d = &self.data;
        DVec3::new(
            d[0] * v.x + d[1] * v.y + d[2] * v.z,
            d[3] * v.x + d[4] * v.y + d[5] * v.z,
            d[6] * v.x + d[7] * v.y + d[8] * v.z,
        )
    }

    /// Compute the determinant.
    #[inline]
    pub fn determinant(&self) -> f64 {
        let d = &self.data;
        d[0] * (d[4] * d[8] - d[5] * d[7]) - d[1] * (d[3] * d[8] - d[5] * d[6])
            + d[2] * (d[3] * d[7] - d[4] * d[6])
    }

    /// Frobenius norm of the difference from the identity matrix.
    pub fn deviation_from_identity(&self) -> f64 {
        self.data
            .iter()
            .zip(Self::identity().data.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Largest absolute entry-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &DMat3) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

impl Default for DMat3 {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f64; 9]> for DMat3 {
    #[inline]
    fn from(data: [f64; 9]) -> Self {
        Self { data }
    }
}

impl From<DMat3> for [f64; 9] {
    #[inline]
    fn from(m: DMat3) -> Self {
        m.data
    }
}

impl Index<usize> for DMat3 {
    type Output = f64;
    #[inline]
    fn index(&self, idx: usize) -> &f64 {
        &self.data[idx]
    }
}

impl IndexMut<usize> for DMat3 {
    #[inline]
    fn index_mut(&mut self, idx: usize) -> &mut f64 {
        &mut self.data[idx]
    }
}

impl Mul for DMat3 {
    type Output = DMat3;
    #[inline]
    fn mul(self, rhs: DMat3) -> DMat3 {
        self.mul_mat(&rhs)
    }
}

impl Mul<DVec3> for DMat3 {
    type Output = DVec3;
    #[inline]
    fn mul(self, rhs: DVec3) -> DVec3 {
        self.mul_vec3(rhs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
