use crate::math::{Point, Real, Vector};

/// A joint that removes all relative linear motion between a pair of
/// points on two bodies, leaving only relative rotation.
///
/// The rotation can optionally be driven by a motor (with a maximum
/// torque) and restricted to an angular interval.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RevoluteJoint {
    /// Where the joint is attached on the first body, expressed in the
    /// first body's local frame.
    pub local_anchor1: Point<Real>,
    /// Where the joint is attached on the second body, expressed in the
    /// second body's local frame.
    pub local_anchor2: Point<Real>,
    /// The rotation of body 2 relative to body 1 at which the joint angle
    /// is considered zero.
    pub reference_angle: Real,
    /// Are the angular limits enabled?
    pub limits_enabled: bool,
    /// The lower angular limit, in radians.
    pub lower_limit: Real,
    /// The upper angular limit, in radians.
    pub upper_limit: Real,
    /// Is the angular motor enabled?
    pub motor_enabled: bool,
    /// The target relative angular velocity of the motor.
    pub motor_speed: Real,
    /// The maximum torque the motor may deliver.
    pub max_motor_torque: Real,
    /// The accumulated linear impulse applied by the point constraint.
    pub impulse: Vector<Real>,
    /// The accumulated impulse applied by the motor.
    pub motor_impulse: Real,
    /// The accumulated impulse applied by the lower angular limit.
    pub lower_impulse: Real,
    /// The accumulated impulse applied by the upper angular limit.
    pub upper_impulse: Real,
}

impl RevoluteJoint {
    /// Creates a new revolute joint from the two local anchor points.
    pub fn new(local_anchor1: Point<Real>, local_anchor2: Point<Real>) -> Self {
        Self {
            local_anchor1,
            local_anchor2,
            reference_angle: 0.0,
            limits_enabled: false,
            lower_limit: 0.0,
            upper_limit: 0.0,
            motor_enabled: false,
            motor_speed: 0.0,
            max_motor_torque: 0.0,
            impulse: na::zero(),
            motor_impulse: 0.0,
            lower_impulse: 0.0,
            upper_impulse: 0.0,
        }
    }

    /// Enables the angular limits with the given bounds, in radians.
    pub fn with_limits(mut self, lower: Real, upper: Real) -> Self {
        assert!(
            lower <= upper,
            "The lower angular limit must not exceed the upper limit."
        );
        self.limits_enabled = true;
        self.lower_limit = lower;
        self.upper_limit = upper;
        self
    }

    /// Enables the angular motor with the given target speed and maximum
    /// torque.
    pub fn with_motor(mut self, motor_speed: Real, max_motor_torque: Real) -> Self {
        self.motor_enabled = true;
        self.motor_speed = motor_speed;
        self.max_motor_torque = max_motor_torque;
        self
    }

    /// Sets the reference angle of this joint.
    pub fn with_reference_angle(mut self, reference_angle: Real) -> Self {
        self.reference_angle = reference_angle;
        self
    }
}
