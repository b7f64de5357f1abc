//! 4x4 transformation matrix using column-vector convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! # Example
//! ```ignore
//! let ray_matrix = view * projection * bias_inverse * viewport;
//! let direction = (ray_matrix * Vec4::point(x, y, 0.0)).to_vec3();
//! ```

use std::ops::Mul;

use approx::{AbsDiffEq, RelativeEq};

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix whose columns are the given basis vectors.
    ///
    /// Maps the local axes (1,0,0), (0,1,0), (0,0,1) onto `x`, `y`, `z`.
    pub fn from_basis(x: Vec3, y: Vec3, z: Vec3) -> Self {
        Mat4::new([
            [x.x, y.x, z.x, 0.0],
            [x.y, y.y, z.y, 0.0],
            [x.z, y.z, z.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Maps the `[0, 1]` cube onto `[-1, 1]`.
    pub fn bias_inverse() -> Self {
        Mat4::translation(-1.0, -1.0, -1.0) * Mat4::scaling(2.0, 2.0, 2.0)
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: [f32; 4]| r[0] * v.x + r[1] * v.y + r[2] * v.z + r[3] * v.w;
        Vec4::new(
            row(self.data[0]),
            row(self.data[1]),
            row(self.data[2]),
            row(self.data[3]),
        )
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bias_inverse_maps_unit_range_to_signed_range() {
        let lo = Mat4::bias_inverse() * Vec4::point(0.0, 0.0, 0.0);
        let hi = Mat4::bias_inverse() * Vec4::point(1.0, 1.0, 1.0);
        assert_eq!(lo, Vec4::point(-1.0, -1.0, -1.0));
        assert_eq!(hi, Vec4::point(1.0, 1.0, 1.0));
    }

    #[test]
    fn composition_applies_rightmost_first() {
        // Scale then translate differs from translate then scale.
        let t = Mat4::translation(1.0, 0.0, 0.0);
        let s = Mat4::scaling(2.0, 2.0, 2.0);
        let p = Vec4::point(1.0, 1.0, 1.0);

        assert_eq!((t * s) * p, Vec4::point(3.0, 2.0, 2.0));
        assert_eq!((s * t) * p, Vec4::point(4.0, 2.0, 2.0));
    }

    #[test]
    fn from_basis_maps_axes_to_columns() {
        let x = Vec3::new(0.0, 0.0, -1.0);
        let y = Vec3::UP;
        let z = Vec3::X;
        let m = Mat4::from_basis(x, y, z);

        assert_eq!((m * Vec4::new(1.0, 0.0, 0.0, 0.0)).to_vec3(), x);
        assert_eq!((m * Vec4::new(0.0, 1.0, 0.0, 0.0)).to_vec3(), y);
        assert_eq!((m * Vec4::new(0.0, 0.0, 1.0, 0.0)).to_vec3(), z);
    }

    #[test]
    fn orthonormal_basis_preserves_length() {
        let z = Vec3::new(1.0, 0.5, 2.0).normalize();
        let x = Vec3::UP.cross(z).normalize();
        let y = z.cross(x);
        let m = Mat4::from_basis(x, y, z);

        let v = Vec3::new(3.0, -4.0, 12.0);
        let rotated = (m * Vec4::new(v.x, v.y, v.z, 0.0)).to_vec3();
        assert_relative_eq!(rotated.magnitude(), 13.0, epsilon = 1e-5);
    }

    #[test]
    fn set_addresses_row_then_column() {
        let mut m = Mat4::identity();
        m.set(2, 3, -1.0);
        // Row 2, column 3 feeds w into z.
        assert_eq!(m * Vec4::point(0.0, 0.0, 0.0), Vec4::point(0.0, 0.0, -1.0));
    }
}
