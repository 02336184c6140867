use crate::math::{Point, Real, Vector};

/// The minimum allowed pulley ratio, guarding the `1 / ratio` appearing in
/// the constraint mass.
pub(crate) const MIN_PULLEY_RATIO: Real = 1.0e-5;

/// An idealized pulley: two bodies hanging from two fixed world-space
/// ground anchors, coupled so that `length1 + ratio * length2` stays
/// constant.
///
/// A ratio other than `1.0` turns the pulley into a block-and-tackle;
/// one side then moves faster than the other.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PulleyJoint {
    /// The first ground anchor, in world space.
    pub ground_anchor1: Point<Real>,
    /// The second ground anchor, in world space.
    pub ground_anchor2: Point<Real>,
    /// Where the rope is attached on the first body, expressed in the
    /// first body's local frame.
    pub local_anchor1: Point<Real>,
    /// Where the rope is attached on the second body, expressed in the
    /// second body's local frame.
    pub local_anchor2: Point<Real>,
    /// The reference length of the segment attached to the first body.
    pub length1: Real,
    /// The reference length of the segment attached to the second body.
    pub length2: Real,
    /// The pulley ratio.
    pub ratio: Real,
    /// The accumulated impulse applied by this joint.
    pub impulse: Real,
    /// The world-space direction from the first ground anchor to the
    /// first body anchor, computed by the last solver step.
    pub(crate) u1: Vector<Real>,
    /// The world-space direction from the second ground anchor to the
    /// second body anchor, computed by the last solver step.
    pub(crate) u2: Vector<Real>,
}

impl PulleyJoint {
    /// Creates a new pulley joint.
    ///
    /// `length1` and `length2` are the rope lengths on each side when the
    /// joint is at rest. Panics if `ratio` is not strictly positive.
    pub fn new(
        ground_anchor1: Point<Real>,
        ground_anchor2: Point<Real>,
        local_anchor1: Point<Real>,
        local_anchor2: Point<Real>,
        length1: Real,
        length2: Real,
        ratio: Real,
    ) -> Self {
        assert!(
            ratio > MIN_PULLEY_RATIO,
            "The pulley ratio must be strictly positive."
        );
        Self {
            ground_anchor1,
            ground_anchor2,
            local_anchor1,
            local_anchor2,
            length1,
            length2,
            ratio,
            impulse: 0.0,
            u1: na::zero(),
            u2: na::zero(),
        }
    }

    /// The total constrained length `length1 + ratio * length2`.
    pub fn constant(&self) -> Real {
        self.length1 + self.ratio * self.length2
    }
}
