use crate::dynamics::solver::Jacobian;
use crate::dynamics::{JointHandle, JointParams, JointSet, RigidBodyHandle, RigidBodySet};
use crate::math::{Isometry, Point, Real, Vector};

/// The degree of freedom of one of the two joints coupled by a gear
/// joint, with the local data needed to measure its coordinate.
///
/// The "ground" body is the first body of the referenced joint; the
/// driven body is its second body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum GearAxis {
    /// The referenced joint is a revolute joint: the coordinate is its
    /// joint angle.
    Revolute {
        /// The joint anchor on the driven body, in its local frame.
        local_anchor_body: Point<Real>,
        /// The rotation of the driven body relative to the ground body at
        /// which the coordinate is zero.
        reference_angle: Real,
    },
    /// The referenced joint is a prismatic joint: the coordinate is its
    /// translation along the sliding axis.
    Prismatic {
        /// The joint anchor on the ground body, in its local frame.
        local_anchor_ground: Point<Real>,
        /// The joint anchor on the driven body, in its local frame.
        local_anchor_body: Point<Real>,
        /// The sliding axis, in the ground body's local frame.
        local_axis: Vector<Real>,
    },
}

impl GearAxis {
    /// The current value of this degree of freedom, measured from the
    /// given ground and driven body positions.
    pub(crate) fn coordinate(
        &self,
        pos_ground: &Isometry<Real>,
        pos_body: &Isometry<Real>,
    ) -> Real {
        match self {
            GearAxis::Revolute {
                reference_angle, ..
            } => pos_ground.rotation.angle_to(&pos_body.rotation) - reference_angle,
            GearAxis::Prismatic {
                local_anchor_ground,
                local_anchor_body,
                local_axis,
            } => {
                let anchor_in_ground =
                    pos_ground.inverse_transform_point(&(pos_body * local_anchor_body));
                (anchor_in_ground - local_anchor_ground).dot(local_axis)
            }
        }
    }
}

/// A joint coupling the degrees of freedom of two revolute or prismatic
/// joints so that `coordinate1 + ratio * coordinate2` stays constant.
///
/// The gear involves four bodies: the two driven bodies (which are the
/// bodies this joint is attached to) and the two ground bodies of the
/// referenced joints. A negative ratio reverses the coupling direction,
/// like two meshing spur gears.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GearJoint {
    /// The first coupled joint.
    pub joint1: JointHandle,
    /// The second coupled joint.
    pub joint2: JointHandle,
    /// The ground body of the first coupled joint.
    pub(crate) body_c: RigidBodyHandle,
    /// The ground body of the second coupled joint.
    pub(crate) body_d: RigidBodyHandle,
    /// The degree of freedom of the first coupled joint.
    pub(crate) axis1: GearAxis,
    /// The degree of freedom of the second coupled joint.
    pub(crate) axis2: GearAxis,
    /// The gear ratio.
    pub ratio: Real,
    /// The value of `coordinate1 + ratio * coordinate2` enforced by this
    /// joint, captured at creation time.
    pub constant: Real,
    /// The accumulated impulse applied by this joint.
    pub impulse: Real,
    /// The constraint Jacobian for the (driven 1, ground 1) pair,
    /// computed by the last solver step.
    pub(crate) jac_ac: Jacobian,
    /// The constraint Jacobian for the (driven 2, ground 2) pair,
    /// computed by the last solver step.
    pub(crate) jac_bd: Jacobian,
}

impl GearJoint {
    /// Resolves a gear joint definition against the existing joints.
    ///
    /// Returns the gear joint along with the two driven bodies it must be
    /// attached to. Panics if either referenced joint does not exist or
    /// is not a revolute or prismatic joint.
    pub(crate) fn from_joints(
        bodies: &RigidBodySet,
        joints: &JointSet,
        joint1: JointHandle,
        joint2: JointHandle,
        ratio: Real,
    ) -> (Self, RigidBodyHandle, RigidBodyHandle) {
        assert!(
            ratio.abs() > 1.0e-5,
            "The gear ratio must be nonzero."
        );

        let j1 = joints
            .get(joint1)
            .expect("Attempt to create a gear joint over a non-existing joint.");
        let j2 = joints
            .get(joint2)
            .expect("Attempt to create a gear joint over a non-existing joint.");

        let axis1 = Self::axis_of(&j1.params);
        let axis2 = Self::axis_of(&j2.params);
        let (body_c, body_a) = (j1.body1(), j1.body2());
        let (body_d, body_b) = (j2.body1(), j2.body2());

        let coord1 = axis1.coordinate(bodies[body_c].position(), bodies[body_a].position());
        let coord2 = axis2.coordinate(bodies[body_d].position(), bodies[body_b].position());

        let gear = Self {
            joint1,
            joint2,
            body_c,
            body_d,
            axis1,
            axis2,
            ratio,
            constant: coord1 + ratio * coord2,
            impulse: 0.0,
            jac_ac: Jacobian::zero(),
            jac_bd: Jacobian::zero(),
        };

        (gear, body_a, body_b)
    }

    fn axis_of(params: &JointParams) -> GearAxis {
        match params {
            JointParams::Revolute(j) => GearAxis::Revolute {
                local_anchor_body: j.local_anchor2,
                reference_angle: j.reference_angle,
            },
            JointParams::Prismatic(j) => GearAxis::Prismatic {
                local_anchor_ground: j.local_anchor1,
                local_anchor_body: j.local_anchor2,
                local_axis: j.local_axis1,
            },
            _ => panic!("A gear joint can only couple revolute or prismatic joints."),
        }
    }
}
