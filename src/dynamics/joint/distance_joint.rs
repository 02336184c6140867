use crate::math::{Isometry, Point, Real, Vector};

/// A joint that keeps two points, one on each body, at a fixed distance.
///
/// With a nonzero `frequency` the constraint behaves like a damped spring
/// instead of a rigid rod; a soft distance joint never applies position
/// corrections.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DistanceJoint {
    /// Where the joint is attached on the first body, expressed in the
    /// first body's local frame.
    pub local_anchor1: Point<Real>,
    /// Where the joint is attached on the second body, expressed in the
    /// second body's local frame.
    pub local_anchor2: Point<Real>,
    /// The rest length of this joint.
    pub rest_length: Real,
    /// The oscillation frequency of the joint, in Hertz. Zero makes the
    /// joint rigid.
    pub frequency: Real,
    /// The damping ratio of the joint. Only meaningful if `frequency` is
    /// nonzero.
    pub damping_ratio: Real,
    /// The accumulated impulse applied by this joint, along its axis.
    pub impulse: Real,
    /// The world-space constraint axis (from anchor 1 towards anchor 2)
    /// computed by the last solver step. Used for reaction-force queries.
    pub(crate) u: Vector<Real>,
}

impl DistanceJoint {
    /// Creates a new distance joint from the local anchors and a rest length.
    pub fn new(local_anchor1: Point<Real>, local_anchor2: Point<Real>, rest_length: Real) -> Self {
        Self {
            local_anchor1,
            local_anchor2,
            rest_length,
            frequency: 0.0,
            damping_ratio: 0.0,
            impulse: 0.0,
            u: na::zero(),
        }
    }

    /// Creates a new distance joint from two world-space anchors.
    ///
    /// The rest length is the current distance between the two anchors.
    pub fn from_world_anchors(
        pos1: &Isometry<Real>,
        pos2: &Isometry<Real>,
        world_anchor1: Point<Real>,
        world_anchor2: Point<Real>,
    ) -> Self {
        Self::new(
            pos1.inverse_transform_point(&world_anchor1),
            pos2.inverse_transform_point(&world_anchor2),
            (world_anchor2 - world_anchor1).norm(),
        )
    }

    /// Makes this joint behave like a damped spring with the given
    /// frequency (Hz) and damping ratio.
    pub fn with_softness(mut self, frequency: Real, damping_ratio: Real) -> Self {
        self.frequency = frequency;
        self.damping_ratio = damping_ratio;
        self
    }
}
