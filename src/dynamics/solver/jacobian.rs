use crate::math::{Real, Vector};

/// One row of a two-body velocity constraint: a (linear, angular)
/// coefficient pair per attached body.
///
/// The constraint velocity is the plain dot product
/// `linear1 · v1 + angular1 · w1 + linear2 · v2 + angular2 · w2`,
/// so the second body's coefficients carry their own sign. An impulse `λ`
/// changes each body's velocities by `im · λ · linear` and
/// `ii · λ · angular` with that body's coefficients.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Jacobian {
    /// The linear part of the row applied to the first body.
    pub linear1: Vector<Real>,
    /// The angular part of the row applied to the first body.
    pub angular1: Real,
    /// The linear part of the row applied to the second body.
    pub linear2: Vector<Real>,
    /// The angular part of the row applied to the second body.
    pub angular2: Real,
}

impl Jacobian {
    /// The zero row: every velocity maps to zero.
    pub fn zero() -> Self {
        Self {
            linear1: na::zero(),
            angular1: 0.0,
            linear2: na::zero(),
            angular2: 0.0,
        }
    }

    /// Sets all four parts of this row.
    pub fn set(
        &mut self,
        linear1: Vector<Real>,
        angular1: Real,
        linear2: Vector<Real>,
        angular2: Real,
    ) {
        self.linear1 = linear1;
        self.angular1 = angular1;
        self.linear2 = linear2;
        self.angular2 = angular2;
    }

    /// The constraint velocity of this row for the given body velocities.
    pub fn compute(&self, v1: Vector<Real>, w1: Real, v2: Vector<Real>, w2: Real) -> Real {
        self.linear1.dot(&v1) + self.angular1 * w1 + self.linear2.dot(&v2) + self.angular2 * w2
    }
}

#[cfg(test)]
mod test {
    use super::Jacobian;
    use crate::math::Vector;
    use approx::assert_relative_eq;

    #[test]
    fn compute_is_the_full_dot_product() {
        let mut jac = Jacobian::zero();
        assert_eq!(jac.compute(Vector::new(1.0, 2.0), 3.0, Vector::new(4.0, 5.0), 6.0), 0.0);

        jac.set(Vector::new(1.0, 0.0), 2.0, Vector::new(-1.0, 0.0), -0.5);
        let value = jac.compute(Vector::new(3.0, 9.0), 1.0, Vector::new(1.0, 9.0), 2.0);
        assert_relative_eq!(value, 3.0 + 2.0 - 1.0 - 1.0);
    }
}
