use crate::math::{Isometry, Point, Real, Vector};

/// A soft joint dragging a point of one body towards a world-space target.
///
/// This is typically used to let a user grab and move a body with a
/// pointer device. Only the second body is affected; the first body is the
/// reference (usually a static ground body). The constraint is always
/// soft, and its accumulated impulse magnitude is clamped by `max_force`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MouseJoint {
    /// The world-space point the anchor on body 2 is dragged towards.
    pub target: Point<Real>,
    /// Where the joint is attached on the second body, expressed in the
    /// second body's local frame.
    pub local_anchor2: Point<Real>,
    /// The maximum force the joint may apply, typically expressed as a
    /// multiple of the dragged body's weight.
    pub max_force: Real,
    /// The response frequency of the joint, in Hertz.
    pub frequency: Real,
    /// The damping ratio of the joint.
    pub damping_ratio: Real,
    /// The accumulated impulse applied by this joint.
    pub impulse: Vector<Real>,
}

impl MouseJoint {
    /// Creates a new mouse joint grabbing body 2 at the given world-space
    /// point, which also becomes the initial target.
    pub fn new(pos2: &Isometry<Real>, grab_point: Point<Real>, max_force: Real) -> Self {
        Self {
            target: grab_point,
            local_anchor2: pos2.inverse_transform_point(&grab_point),
            max_force,
            frequency: 5.0,
            damping_ratio: 0.7,
            impulse: na::zero(),
        }
    }

    /// Overrides the default softness of this joint.
    pub fn with_softness(mut self, frequency: Real, damping_ratio: Real) -> Self {
        self.frequency = frequency;
        self.damping_ratio = damping_ratio;
        self
    }

    /// Moves the world-space target point of this joint.
    pub fn set_target(&mut self, target: Point<Real>) {
        self.target = target;
    }
}
