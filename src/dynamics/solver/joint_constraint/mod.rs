pub(crate) use self::any_joint_constraint::{
    AnyJointPositionConstraint, AnyJointVelocityConstraint,
};

mod any_joint_constraint;
mod distance_constraint;
mod gear_constraint;
mod mouse_constraint;
mod prismatic_constraint;
mod pulley_constraint;
mod revolute_constraint;
mod wheel_constraint;
