use super::distance_constraint::{DistancePositionConstraint, DistanceVelocityConstraint};
use super::gear_constraint::{GearPositionConstraint, GearVelocityConstraint};
use super::mouse_constraint::MouseVelocityConstraint;
use super::prismatic_constraint::{PrismaticPositionConstraint, PrismaticVelocityConstraint};
use super::pulley_constraint::{PulleyPositionConstraint, PulleyVelocityConstraint};
use super::revolute_constraint::{RevolutePositionConstraint, RevoluteVelocityConstraint};
use super::wheel_constraint::{WheelPositionConstraint, WheelVelocityConstraint};
use crate::dynamics::solver::{SolverPosition, SolverVel};
use crate::dynamics::{IntegrationParameters, Joint, JointParams, JointSet, RigidBodySet};

/// The velocity constraint of any joint type, dispatched statically.
#[derive(Debug)]
pub(crate) enum AnyJointVelocityConstraint {
    Distance(DistanceVelocityConstraint),
    Mouse(MouseVelocityConstraint),
    Revolute(RevoluteVelocityConstraint),
    Prismatic(PrismaticVelocityConstraint),
    Pulley(PulleyVelocityConstraint),
    Gear(GearVelocityConstraint),
    Wheel(WheelVelocityConstraint),
}

impl AnyJointVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint: &Joint,
        bodies: &RigidBodySet,
    ) -> Self {
        let rb1 = &bodies[joint.body1()];
        let rb2 = &bodies[joint.body2()];
        let handle = joint.handle();

        match &joint.params {
            JointParams::Distance(j) => Self::Distance(DistanceVelocityConstraint::from_joint(
                params, handle, j, rb1, rb2,
            )),
            JointParams::Mouse(j) => {
                Self::Mouse(MouseVelocityConstraint::from_joint(params, handle, j, rb2))
            }
            JointParams::Revolute(j) => Self::Revolute(RevoluteVelocityConstraint::from_joint(
                params, handle, j, rb1, rb2,
            )),
            JointParams::Prismatic(j) => Self::Prismatic(PrismaticVelocityConstraint::from_joint(
                params, handle, j, rb1, rb2,
            )),
            JointParams::Pulley(j) => Self::Pulley(PulleyVelocityConstraint::from_joint(
                params, handle, j, rb1, rb2,
            )),
            JointParams::Gear(j) => {
                let rb_c = &bodies[j.body_c];
                let rb_d = &bodies[j.body_d];
                Self::Gear(GearVelocityConstraint::from_joint(
                    params, handle, j, rb1, rb2, rb_c, rb_d,
                ))
            }
            JointParams::Wheel(j) => Self::Wheel(WheelVelocityConstraint::from_joint(
                params, handle, j, rb1, rb2,
            )),
        }
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        match self {
            Self::Distance(c) => c.warmstart(solver_vels),
            Self::Mouse(c) => c.warmstart(solver_vels),
            Self::Revolute(c) => c.warmstart(solver_vels),
            Self::Prismatic(c) => c.warmstart(solver_vels),
            Self::Pulley(c) => c.warmstart(solver_vels),
            Self::Gear(c) => c.warmstart(solver_vels),
            Self::Wheel(c) => c.warmstart(solver_vels),
        }
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        match self {
            Self::Distance(c) => c.solve(solver_vels),
            Self::Mouse(c) => c.solve(solver_vels),
            Self::Revolute(c) => c.solve(solver_vels),
            Self::Prismatic(c) => c.solve(solver_vels),
            Self::Pulley(c) => c.solve(solver_vels),
            Self::Gear(c) => c.solve(solver_vels),
            Self::Wheel(c) => c.solve(solver_vels),
        }
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        match self {
            Self::Distance(c) => c.writeback_impulses(joints),
            Self::Mouse(c) => c.writeback_impulses(joints),
            Self::Revolute(c) => c.writeback_impulses(joints),
            Self::Prismatic(c) => c.writeback_impulses(joints),
            Self::Pulley(c) => c.writeback_impulses(joints),
            Self::Gear(c) => c.writeback_impulses(joints),
            Self::Wheel(c) => c.writeback_impulses(joints),
        }
    }
}

/// The position (NGS) constraint of any joint type, dispatched statically.
///
/// Joints whose positional error is entirely handled by a soft velocity
/// constraint report convergence without doing any work.
#[derive(Debug)]
pub(crate) enum AnyJointPositionConstraint {
    Distance(DistancePositionConstraint),
    Revolute(RevolutePositionConstraint),
    Prismatic(PrismaticPositionConstraint),
    Pulley(PulleyPositionConstraint),
    Gear(GearPositionConstraint),
    Wheel(WheelPositionConstraint),
    Converged,
}

impl AnyJointPositionConstraint {
    pub fn from_joint(joint: &Joint, bodies: &RigidBodySet) -> Self {
        let rb1 = &bodies[joint.body1()];
        let rb2 = &bodies[joint.body2()];

        match &joint.params {
            JointParams::Distance(j) => {
                Self::Distance(DistancePositionConstraint::from_joint(j, rb1, rb2))
            }
            JointParams::Mouse(_) => Self::Converged,
            JointParams::Revolute(j) => {
                Self::Revolute(RevolutePositionConstraint::from_joint(j, rb1, rb2))
            }
            JointParams::Prismatic(j) => {
                Self::Prismatic(PrismaticPositionConstraint::from_joint(j, rb1, rb2))
            }
            JointParams::Pulley(j) => {
                Self::Pulley(PulleyPositionConstraint::from_joint(j, rb1, rb2))
            }
            JointParams::Gear(j) => {
                let rb_c = &bodies[j.body_c];
                let rb_d = &bodies[j.body_d];
                Self::Gear(GearPositionConstraint::from_joint(j, rb1, rb2, rb_c, rb_d))
            }
            JointParams::Wheel(j) => {
                Self::Wheel(WheelPositionConstraint::from_joint(j, rb1, rb2))
            }
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [SolverPosition]) -> bool {
        match self {
            Self::Distance(c) => c.solve(params, positions),
            Self::Revolute(c) => c.solve(params, positions),
            Self::Prismatic(c) => c.solve(params, positions),
            Self::Pulley(c) => c.solve(params, positions),
            Self::Gear(c) => c.solve(params, positions),
            Self::Wheel(c) => c.solve(params, positions),
            Self::Converged => true,
        }
    }
}
