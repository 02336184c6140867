//! Miscellaneous numeric utilities shared by the constraint solver.

use crate::math::{Real, Vector};
use na::Vector2;
use num::Zero;
use std::ops::{Add, AddAssign, Mul};

const INV_EPSILON: Real = 1.0e-20;

/// Computes `1.0 / val`, returning `0.0` if `val` is within an epsilon
/// window around zero.
///
/// This is how every effective-mass inversion tolerates joints attached to
/// bodies with zero inverse mass/inertia on one or both sides.
pub(crate) fn inv(val: Real) -> Real {
    if (-INV_EPSILON..=INV_EPSILON).contains(&val) {
        0.0
    } else {
        1.0 / val
    }
}

/// Trait for computing generalized cross products in 2D.
pub trait CrossProduct<Rhs>: Sized {
    /// The result type of the cross product.
    type Result;
    /// Computes the generalized cross product of `self` with `rhs`.
    fn gcross(&self, rhs: Rhs) -> Self::Result;
}

impl CrossProduct<Vector2<Real>> for Vector2<Real> {
    type Result = Real;

    #[inline]
    fn gcross(&self, rhs: Vector2<Real>) -> Real {
        self.x * rhs.y - self.y * rhs.x
    }
}

impl CrossProduct<Vector2<Real>> for Real {
    type Result = Vector2<Real>;

    #[inline]
    fn gcross(&self, rhs: Vector2<Real>) -> Vector2<Real> {
        Vector2::new(-rhs.y * *self, rhs.x * *self)
    }
}

/// A symmetric positive (semi-)definite 2x2 matrix.
///
/// This is the shape of every two-dimensional effective-mass matrix built
/// by the joint constraints.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SdpMatrix2 {
    /// The component at the first row and first column of this matrix.
    pub m11: Real,
    /// The component at the first row and second column of this matrix.
    pub m12: Real,
    /// The component at the second row and second column of this matrix.
    pub m22: Real,
}

impl SdpMatrix2 {
    /// A new SDP 2x2 matrix with the given components.
    ///
    /// Because the matrix is symmetric, only the lower off-diagonal
    /// component is required.
    pub fn new(m11: Real, m12: Real, m22: Real) -> Self {
        Self { m11, m12, m22 }
    }

    /// Computes the inverse of this matrix.
    ///
    /// A near-singular matrix inverts to zero, so that a degenerate
    /// effective mass yields a zero corrective impulse instead of a fault.
    pub fn inverse(&self) -> Self {
        let determinant = self.m11 * self.m22 - self.m12 * self.m12;
        let inv_det = inv(determinant);

        Self {
            m11: self.m22 * inv_det,
            m12: -self.m12 * inv_det,
            m22: self.m11 * inv_det,
        }
    }
}

impl Add<SdpMatrix2> for SdpMatrix2 {
    type Output = SdpMatrix2;

    fn add(self, rhs: SdpMatrix2) -> Self {
        SdpMatrix2::new(self.m11 + rhs.m11, self.m12 + rhs.m12, self.m22 + rhs.m22)
    }
}

impl AddAssign<SdpMatrix2> for SdpMatrix2 {
    fn add_assign(&mut self, rhs: SdpMatrix2) {
        *self = *self + rhs;
    }
}

impl Mul<Vector<Real>> for SdpMatrix2 {
    type Output = Vector<Real>;

    fn mul(self, rhs: Vector<Real>) -> Vector<Real> {
        Vector::new(
            self.m11 * rhs.x + self.m12 * rhs.y,
            self.m12 * rhs.x + self.m22 * rhs.y,
        )
    }
}

impl Zero for SdpMatrix2 {
    fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

#[cfg(test)]
mod test {
    use super::{inv, CrossProduct, SdpMatrix2};
    use crate::math::Vector;
    use approx::assert_relative_eq;

    #[test]
    fn guarded_inverse_of_zero_is_zero() {
        assert_eq!(inv(0.0), 0.0);
        assert_eq!(inv(1.0e-30), 0.0);
        assert_relative_eq!(inv(4.0), 0.25);
    }

    #[test]
    fn sdp_matrix2_inverse() {
        let m = SdpMatrix2::new(4.0, 1.0, 2.0);
        let id = m.inverse() * (m * Vector::new(3.0, -2.0));
        assert_relative_eq!(id.x, 3.0, epsilon = 1.0e-5);
        assert_relative_eq!(id.y, -2.0, epsilon = 1.0e-5);
    }

    #[test]
    fn sdp_matrix2_singular_inverse_is_zero() {
        let m = SdpMatrix2::new(0.0, 0.0, 0.0);
        let inv = m.inverse();
        assert_eq!(inv * Vector::new(1.0, 1.0), Vector::zeros());
    }

    #[test]
    fn scalar_cross_is_perpendicular() {
        let r = Vector::new(2.0, 1.0);
        let w: f32 = 3.0;
        let v = w.gcross(r);
        assert_relative_eq!(v.dot(&r), 0.0);
        assert_relative_eq!(r.gcross(v), w * r.norm_squared());
    }
}
