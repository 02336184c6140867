//! Structures related to dynamics: bodies, joints, and the constraint solver.

pub use self::integration_parameters::IntegrationParameters;
pub use self::joint::{
    DistanceJoint, GearAxis, GearJoint, Joint, JointDef, JointHandle, JointParams, JointSet,
    JointType, MouseJoint, PrismaticJoint, PulleyJoint, RevoluteJoint, WheelJoint,
};
pub use self::rigid_body::{
    RigidBody, RigidBodyBuilder, RigidBodyMassProps, RigidBodyPosition, RigidBodyType,
    RigidBodyVelocity,
};
pub use self::rigid_body_set::{RigidBodyHandle, RigidBodySet};
pub use self::solver::{IslandSolver, Jacobian};

mod integration_parameters;
mod joint;
mod rigid_body;
mod rigid_body_set;
mod solver;
