use crate::math::{Point, Real, Vector};

/// A joint that removes all relative motion between two bodies except the
/// translation along one axis fixed to the first body.
///
/// The translation can optionally be driven by a linear motor (with a
/// maximum force) and restricted to an interval.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PrismaticJoint {
    /// Where the joint is attached on the first body, expressed in the
    /// first body's local frame.
    pub local_anchor1: Point<Real>,
    /// Where the joint is attached on the second body, expressed in the
    /// second body's local frame.
    pub local_anchor2: Point<Real>,
    /// The sliding axis, expressed in the first body's local frame. Must
    /// be a unit vector.
    pub local_axis1: Vector<Real>,
    /// The rotation of body 2 relative to body 1, locked by the joint.
    pub reference_angle: Real,
    /// Are the translation limits enabled?
    pub limits_enabled: bool,
    /// The lower translation limit.
    pub lower_limit: Real,
    /// The upper translation limit.
    pub upper_limit: Real,
    /// Is the linear motor enabled?
    pub motor_enabled: bool,
    /// The target relative linear velocity of the motor, along the axis.
    pub motor_speed: Real,
    /// The maximum force the motor may deliver.
    pub max_motor_force: Real,
    /// The accumulated impulses of the (perpendicular, angular)
    /// constraint pair.
    pub impulse: Vector<Real>,
    /// The accumulated impulse applied by the motor.
    pub motor_impulse: Real,
    /// The accumulated impulse applied by the lower translation limit.
    pub lower_impulse: Real,
    /// The accumulated impulse applied by the upper translation limit.
    pub upper_impulse: Real,
    /// The world-space axis computed by the last solver step.
    pub(crate) axis: Vector<Real>,
    /// The world-space perpendicular axis computed by the last solver step.
    pub(crate) perp: Vector<Real>,
}

impl PrismaticJoint {
    /// Creates a new prismatic joint from the two local anchor points and
    /// the local sliding axis on the first body.
    ///
    /// Panics if `local_axis1` is not a unit vector.
    pub fn new(
        local_anchor1: Point<Real>,
        local_anchor2: Point<Real>,
        local_axis1: Vector<Real>,
    ) -> Self {
        assert!(
            (local_axis1.norm_squared() - 1.0).abs() < 1.0e-4,
            "The prismatic joint axis must be a unit vector."
        );
        Self {
            local_anchor1,
            local_anchor2,
            local_axis1,
            reference_angle: 0.0,
            limits_enabled: false,
            lower_limit: 0.0,
            upper_limit: 0.0,
            motor_enabled: false,
            motor_speed: 0.0,
            max_motor_force: 0.0,
            impulse: na::zero(),
            motor_impulse: 0.0,
            lower_impulse: 0.0,
            upper_impulse: 0.0,
            axis: local_axis1,
            perp: Vector::new(-local_axis1.y, local_axis1.x),
        }
    }

    /// Enables the translation limits with the given bounds.
    pub fn with_limits(mut self, lower: Real, upper: Real) -> Self {
        assert!(
            lower <= upper,
            "The lower translation limit must not exceed the upper limit."
        );
        self.limits_enabled = true;
        self.lower_limit = lower;
        self.upper_limit = upper;
        self
    }

    /// Enables the linear motor with the given target speed and maximum
    /// force.
    pub fn with_motor(mut self, motor_speed: Real, max_motor_force: Real) -> Self {
        self.motor_enabled = true;
        self.motor_speed = motor_speed;
        self.max_motor_force = max_motor_force;
        self
    }

    /// Sets the reference angle locked by this joint.
    pub fn with_reference_angle(mut self, reference_angle: Real) -> Self {
        self.reference_angle = reference_angle;
        self
    }

    /// The local axis perpendicular to the sliding axis.
    pub(crate) fn local_perp1(&self) -> Vector<Real> {
        Vector::new(-self.local_axis1.y, self.local_axis1.x)
    }
}
