use crate::dynamics::{
    DistanceJoint, GearAxis, GearJoint, JointHandle, MouseJoint, PrismaticJoint, PulleyJoint,
    RevoluteJoint, RigidBodyHandle, RigidBodySet, WheelJoint,
};
use crate::math::{Point, Real, Vector};

/// The tag identifying each type of joint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum JointType {
    /// Reserved tag for joints of undetermined type. Never carried by a
    /// constructed joint.
    Unknown,
    /// A revolute joint.
    Revolute,
    /// A prismatic joint.
    Prismatic,
    /// A distance joint.
    Distance,
    /// A pulley joint.
    Pulley,
    /// A mouse joint.
    Mouse,
    /// A gear joint.
    Gear,
    /// A wheel joint.
    Wheel,
    /// Reserved legacy tag for the line joint, superseded by
    /// `JointType::Wheel`. Never carried by a constructed joint.
    Line,
}

/// An enum grouping all possible types of joints.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum JointParams {
    /// A joint keeping two anchor points at a fixed distance.
    Distance(DistanceJoint),
    /// A soft joint dragging an anchor point towards a world-space target.
    Mouse(MouseJoint),
    /// A joint allowing only relative rotation about a pair of anchors.
    Revolute(RevoluteJoint),
    /// A joint allowing only relative translation along one axis.
    Prismatic(PrismaticJoint),
    /// A joint coupling two bodies hanging from fixed ground anchors.
    Pulley(PulleyJoint),
    /// A joint coupling the coordinates of two other joints.
    Gear(GearJoint),
    /// A suspension joint: translation along a sprung axis, free rotation.
    Wheel(WheelJoint),
}

impl JointParams {
    /// The type tag of this joint.
    pub fn joint_type(&self) -> JointType {
        match self {
            JointParams::Distance(_) => JointType::Distance,
            JointParams::Mouse(_) => JointType::Mouse,
            JointParams::Revolute(_) => JointType::Revolute,
            JointParams::Prismatic(_) => JointType::Prismatic,
            JointParams::Pulley(_) => JointType::Pulley,
            JointParams::Gear(_) => JointType::Gear,
            JointParams::Wheel(_) => JointType::Wheel,
        }
    }

    /// Gets a reference to the underlying distance joint, if `self` is one.
    pub fn as_distance(&self) -> Option<&DistanceJoint> {
        if let JointParams::Distance(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a mutable reference to the underlying distance joint, if
    /// `self` is one.
    pub fn as_distance_mut(&mut self) -> Option<&mut DistanceJoint> {
        if let JointParams::Distance(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a reference to the underlying mouse joint, if `self` is one.
    pub fn as_mouse(&self) -> Option<&MouseJoint> {
        if let JointParams::Mouse(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a mutable reference to the underlying mouse joint, if `self`
    /// is one.
    pub fn as_mouse_mut(&mut self) -> Option<&mut MouseJoint> {
        if let JointParams::Mouse(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a reference to the underlying revolute joint, if `self` is one.
    pub fn as_revolute(&self) -> Option<&RevoluteJoint> {
        if let JointParams::Revolute(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a mutable reference to the underlying revolute joint, if
    /// `self` is one.
    pub fn as_revolute_mut(&mut self) -> Option<&mut RevoluteJoint> {
        if let JointParams::Revolute(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a reference to the underlying prismatic joint, if `self` is one.
    pub fn as_prismatic(&self) -> Option<&PrismaticJoint> {
        if let JointParams::Prismatic(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a mutable reference to the underlying prismatic joint, if
    /// `self` is one.
    pub fn as_prismatic_mut(&mut self) -> Option<&mut PrismaticJoint> {
        if let JointParams::Prismatic(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a reference to the underlying pulley joint, if `self` is one.
    pub fn as_pulley(&self) -> Option<&PulleyJoint> {
        if let JointParams::Pulley(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a mutable reference to the underlying pulley joint, if `self`
    /// is one.
    pub fn as_pulley_mut(&mut self) -> Option<&mut PulleyJoint> {
        if let JointParams::Pulley(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a reference to the underlying gear joint, if `self` is one.
    pub fn as_gear(&self) -> Option<&GearJoint> {
        if let JointParams::Gear(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a mutable reference to the underlying gear joint, if `self`
    /// is one.
    pub fn as_gear_mut(&mut self) -> Option<&mut GearJoint> {
        if let JointParams::Gear(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a reference to the underlying wheel joint, if `self` is one.
    pub fn as_wheel(&self) -> Option<&WheelJoint> {
        if let JointParams::Wheel(j) = self {
            Some(j)
        } else {
            None
        }
    }

    /// Gets a mutable reference to the underlying wheel joint, if `self`
    /// is one.
    pub fn as_wheel_mut(&mut self) -> Option<&mut WheelJoint> {
        if let JointParams::Wheel(j) = self {
            Some(j)
        } else {
            None
        }
    }
}

impl From<DistanceJoint> for JointParams {
    fn from(j: DistanceJoint) -> Self {
        JointParams::Distance(j)
    }
}

impl From<MouseJoint> for JointParams {
    fn from(j: MouseJoint) -> Self {
        JointParams::Mouse(j)
    }
}

impl From<RevoluteJoint> for JointParams {
    fn from(j: RevoluteJoint) -> Self {
        JointParams::Revolute(j)
    }
}

impl From<PrismaticJoint> for JointParams {
    fn from(j: PrismaticJoint) -> Self {
        JointParams::Prismatic(j)
    }
}

impl From<PulleyJoint> for JointParams {
    fn from(j: PulleyJoint) -> Self {
        JointParams::Pulley(j)
    }
}

impl From<GearJoint> for JointParams {
    fn from(j: GearJoint) -> Self {
        JointParams::Gear(j)
    }
}

impl From<WheelJoint> for JointParams {
    fn from(j: WheelJoint) -> Self {
        JointParams::Wheel(j)
    }
}

/// The definition of a joint: the only way of constructing one.
///
/// A definition must carry two valid, distinct body handles; inserting a
/// definition that violates this is a caller error and panics.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct JointDef {
    /// The first body attached to the joint.
    pub body1: RigidBodyHandle,
    /// The second body attached to the joint.
    pub body2: RigidBodyHandle,
    /// If `true`, collision between the two attached bodies is not
    /// suppressed by this joint.
    pub collide_connected: bool,
    /// User-defined data associated with the joint.
    pub user_data: u128,
    /// The joint's type-specific parameters.
    pub params: JointParams,
}

impl JointDef {
    /// Creates a new joint definition with the given parameters.
    ///
    /// Collision between the connected bodies is suppressed by default.
    pub fn new<J: Into<JointParams>>(
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        params: J,
    ) -> Self {
        Self {
            body1,
            body2,
            collide_connected: false,
            user_data: 0,
            params: params.into(),
        }
    }

    /// Sets whether the attached bodies may still collide with each other.
    pub fn collide_connected(mut self, collide_connected: bool) -> Self {
        self.collide_connected = collide_connected;
        self
    }

    /// Sets the user data of the joint to be created.
    pub fn user_data(mut self, data: u128) -> Self {
        self.user_data = data;
        self
    }
}

/// A joint attached to two bodies.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Joint {
    /// Handle of the first body attached to this joint.
    pub(crate) body1: RigidBodyHandle,
    /// Handle of the second body attached to this joint.
    pub(crate) body2: RigidBodyHandle,
    /// If `true`, collision between the two attached bodies is not
    /// suppressed by this joint.
    pub collide_connected: bool,
    /// User-defined data associated with this joint.
    pub user_data: u128,
    // A joint needs to know its own handle to simplify its removal.
    pub(crate) handle: JointHandle,
    /// Transient marker set while the island containing this joint is
    /// being solved.
    pub(crate) is_in_island: bool,
    /// The joint's type-specific parameters and accumulated impulses.
    pub params: JointParams,
}

impl Joint {
    /// The type tag of this joint.
    pub fn joint_type(&self) -> JointType {
        self.params.joint_type()
    }

    /// The handle of the first body attached to this joint.
    pub fn body1(&self) -> RigidBodyHandle {
        self.body1
    }

    /// The handle of the second body attached to this joint.
    pub fn body2(&self) -> RigidBodyHandle {
        self.body2
    }

    /// The handle of this joint in the `JointSet` that owns it.
    pub fn handle(&self) -> JointHandle {
        self.handle
    }

    /// Is this joint part of the island currently being solved?
    pub fn is_in_island(&self) -> bool {
        self.is_in_island
    }

    /// The working anchor of this joint on the first body, in world space.
    ///
    /// For a mouse joint this is the drag target.
    pub fn anchor1(&self, bodies: &RigidBodySet) -> Point<Real> {
        let pos1 = bodies[self.body1].position();
        match &self.params {
            JointParams::Distance(j) => pos1 * j.local_anchor1,
            JointParams::Mouse(j) => j.target,
            JointParams::Revolute(j) => pos1 * j.local_anchor1,
            JointParams::Prismatic(j) => pos1 * j.local_anchor1,
            JointParams::Pulley(j) => pos1 * j.local_anchor1,
            JointParams::Gear(j) => match &j.axis1 {
                GearAxis::Revolute {
                    local_anchor_body, ..
                }
                | GearAxis::Prismatic {
                    local_anchor_body, ..
                } => pos1 * local_anchor_body,
            },
            JointParams::Wheel(j) => pos1 * j.local_anchor1,
        }
    }

    /// The working anchor of this joint on the second body, in world space.
    pub fn anchor2(&self, bodies: &RigidBodySet) -> Point<Real> {
        let pos2 = bodies[self.body2].position();
        match &self.params {
            JointParams::Distance(j) => pos2 * j.local_anchor2,
            JointParams::Mouse(j) => pos2 * j.local_anchor2,
            JointParams::Revolute(j) => pos2 * j.local_anchor2,
            JointParams::Prismatic(j) => pos2 * j.local_anchor2,
            JointParams::Pulley(j) => pos2 * j.local_anchor2,
            JointParams::Gear(j) => match &j.axis2 {
                GearAxis::Revolute {
                    local_anchor_body, ..
                }
                | GearAxis::Prismatic {
                    local_anchor_body, ..
                } => pos2 * local_anchor_body,
            },
            JointParams::Wheel(j) => pos2 * j.local_anchor2,
        }
    }

    /// The force this joint exerted on the second body during the last
    /// solved step, given the inverse timestep length.
    pub fn reaction_force(&self, inv_dt: Real) -> Vector<Real> {
        match &self.params {
            JointParams::Distance(j) => j.u * (j.impulse * inv_dt),
            JointParams::Mouse(j) => j.impulse * inv_dt,
            JointParams::Revolute(j) => j.impulse * inv_dt,
            JointParams::Prismatic(j) => {
                (j.perp * j.impulse.x
                    + j.axis * (j.motor_impulse + j.lower_impulse - j.upper_impulse))
                    * inv_dt
            }
            JointParams::Pulley(j) => j.u2 * (j.impulse * inv_dt),
            JointParams::Gear(j) => j.jac_bd.linear1 * (j.impulse * inv_dt),
            JointParams::Wheel(j) => (j.ay * j.impulse + j.ax * j.spring_impulse) * inv_dt,
        }
    }

    /// The torque this joint exerted on the second body during the last
    /// solved step, given the inverse timestep length.
    pub fn reaction_torque(&self, inv_dt: Real) -> Real {
        match &self.params {
            JointParams::Distance(_) => 0.0,
            JointParams::Mouse(_) => 0.0,
            JointParams::Revolute(j) => {
                (j.motor_impulse + j.lower_impulse - j.upper_impulse) * inv_dt
            }
            JointParams::Prismatic(j) => j.impulse.y * inv_dt,
            JointParams::Pulley(_) => 0.0,
            JointParams::Gear(j) => j.jac_bd.angular1 * j.impulse * inv_dt,
            JointParams::Wheel(j) => j.motor_impulse * inv_dt,
        }
    }
}
