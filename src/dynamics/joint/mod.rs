//! Joints: pairwise constraints restricting the relative motion of two bodies.

pub use self::distance_joint::DistanceJoint;
pub use self::gear_joint::{GearAxis, GearJoint};
pub use self::joint::{Joint, JointDef, JointParams, JointType};
pub use self::joint_set::{JointHandle, JointSet};
pub use self::mouse_joint::MouseJoint;
pub use self::prismatic_joint::PrismaticJoint;
pub use self::pulley_joint::PulleyJoint;
pub use self::revolute_joint::RevoluteJoint;
pub use self::wheel_joint::WheelJoint;

mod distance_joint;
mod gear_joint;
mod joint;
mod joint_set;
mod mouse_joint;
mod prismatic_joint;
mod pulley_joint;
mod revolute_joint;
mod wheel_joint;
