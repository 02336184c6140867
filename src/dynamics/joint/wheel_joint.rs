use crate::math::{Point, Real, Vector};

/// A wheel/suspension joint: body 2 may translate along an axis fixed to
/// body 1 through a damped spring, and rotate freely.
///
/// The rotation can optionally be driven by a motor, which is what makes
/// a vehicle wheel spin.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct WheelJoint {
    /// Where the joint is attached on the first body, expressed in the
    /// first body's local frame.
    pub local_anchor1: Point<Real>,
    /// Where the joint is attached on the second body, expressed in the
    /// second body's local frame.
    pub local_anchor2: Point<Real>,
    /// The suspension axis, expressed in the first body's local frame.
    /// Must be a unit vector.
    pub local_axis1: Vector<Real>,
    /// The suspension frequency, in Hertz. Zero disables the spring,
    /// leaving the axial translation entirely free.
    pub frequency: Real,
    /// The suspension damping ratio.
    pub damping_ratio: Real,
    /// Is the angular motor enabled?
    pub motor_enabled: bool,
    /// The target relative angular velocity of the motor.
    pub motor_speed: Real,
    /// The maximum torque the motor may deliver.
    pub max_motor_torque: Real,
    /// The accumulated impulse of the rigid perpendicular constraint.
    pub impulse: Real,
    /// The accumulated impulse of the suspension spring.
    pub spring_impulse: Real,
    /// The accumulated impulse applied by the motor.
    pub motor_impulse: Real,
    /// The world-space suspension axis computed by the last solver step.
    pub(crate) ax: Vector<Real>,
    /// The world-space perpendicular axis computed by the last solver step.
    pub(crate) ay: Vector<Real>,
}

impl WheelJoint {
    /// Creates a new wheel joint from the two local anchors and the local
    /// suspension axis on the first body.
    ///
    /// Panics if `local_axis1` is not a unit vector.
    pub fn new(
        local_anchor1: Point<Real>,
        local_anchor2: Point<Real>,
        local_axis1: Vector<Real>,
    ) -> Self {
        assert!(
            (local_axis1.norm_squared() - 1.0).abs() < 1.0e-4,
            "The wheel joint axis must be a unit vector."
        );
        Self {
            local_anchor1,
            local_anchor2,
            local_axis1,
            frequency: 2.0,
            damping_ratio: 0.7,
            motor_enabled: false,
            motor_speed: 0.0,
            max_motor_torque: 0.0,
            impulse: 0.0,
            spring_impulse: 0.0,
            motor_impulse: 0.0,
            ax: local_axis1,
            ay: Vector::new(-local_axis1.y, local_axis1.x),
        }
    }

    /// Overrides the default suspension response.
    pub fn with_suspension(mut self, frequency: Real, damping_ratio: Real) -> Self {
        self.frequency = frequency;
        self.damping_ratio = damping_ratio;
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

    /// The local axis perpendicular to the suspension axis.
    pub(crate) fn local_perp1(&self) -> Vector<Real> {
        Vector::new(-self.local_axis1.y, self.local_axis1.x)
    }
}
