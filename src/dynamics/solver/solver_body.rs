use crate::math::{Isometry, Point, Real, Rotation, Translation, Vector};

/// The velocity of one island body inside the solver's scratch buffer,
/// indexed by the body's solver offset.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SolverVel {
    /// The linear velocity of the body.
    pub linear: Vector<Real>,
    /// The angular velocity of the body.
    pub angular: Real,
}

impl SolverVel {
    pub fn zero() -> Self {
        Self {
            linear: na::zero(),
            angular: 0.0,
        }
    }
}

/// The trial position of one island body during the position-correction
/// phase, expressed as a center of mass and an orientation.
///
/// Position corrections translate the center of mass and rotate the body
/// about it, which is why the solver does not manipulate the body-origin
/// isometry directly.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SolverPosition {
    /// The world-space center of mass of the body.
    pub com: Point<Real>,
    /// The world-space orientation of the body.
    pub rot: Rotation<Real>,
}

impl SolverPosition {
    /// Extracts the solver position from a body-origin isometry.
    pub fn from_isometry(pos: &Isometry<Real>, local_com: &Point<Real>) -> Self {
        Self {
            com: pos * local_com,
            rot: pos.rotation,
        }
    }

    /// Reconstructs the body-origin isometry.
    pub fn isometry(&self, local_com: &Point<Real>) -> Isometry<Real> {
        let shift = self.rot * local_com.coords;
        Isometry::from_parts(Translation::from(self.com.coords - shift), self.rot)
    }

    /// The world-space lever arm of a body-local point, relative to the
    /// center of mass.
    pub fn lever_arm(&self, local_point: &Point<Real>, local_com: &Point<Real>) -> Vector<Real> {
        self.rot * (local_point - local_com)
    }
}
