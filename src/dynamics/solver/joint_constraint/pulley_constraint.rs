use crate::dynamics::solver::{SolverPosition, SolverVel};
use crate::dynamics::{IntegrationParameters, JointHandle, JointSet, PulleyJoint, RigidBody};
use crate::math::{Point, Real, Rotation, Vector};
use crate::utils::{self, CrossProduct};

// Directions collapse to zero when a body anchor gets this close to its
// ground anchor.
fn pulley_axis(anchor: Point<Real>, ground_anchor: Point<Real>, slop: Real) -> (Vector<Real>, Real) {
    let u = anchor - ground_anchor;
    let length = u.norm();
    if length > 10.0 * slop {
        (u / length, length)
    } else {
        (na::zero(), length)
    }
}

#[derive(Debug)]
pub(crate) struct PulleyVelocityConstraint {
    joint_id: JointHandle,
    solver_vel1: usize,
    solver_vel2: usize,
    im1: Real,
    ii1: Real,
    im2: Real,
    ii2: Real,
    r1: Vector<Real>,
    r2: Vector<Real>,
    u1: Vector<Real>,
    u2: Vector<Real>,
    ratio: Real,
    mass: Real,
    impulse: Real,
}

impl PulleyVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointHandle,
        joint: &PulleyJoint,
        rb1: &RigidBody,
        rb2: &RigidBody,
    ) -> Self {
        let im1 = rb1.effective_inv_mass();
        let ii1 = rb1.effective_inv_principal_inertia();
        let im2 = rb2.effective_inv_mass();
        let ii2 = rb2.effective_inv_principal_inertia();

        let r1 = rb1.position().rotation * (joint.local_anchor1 - rb1.mprops.local_com);
        let r2 = rb2.position().rotation * (joint.local_anchor2 - rb2.mprops.local_com);

        let slop = params.allowed_linear_error;
        let (u1, _) = pulley_axis(rb1.world_com() + r1, joint.ground_anchor1, slop);
        let (u2, _) = pulley_axis(rb2.world_com() + r2, joint.ground_anchor2, slop);

        let ru1 = r1.gcross(u1);
        let ru2 = r2.gcross(u2);
        let m1 = im1 + ii1 * ru1 * ru1;
        let m2 = im2 + ii2 * ru2 * ru2;

        Self {
            joint_id,
            solver_vel1: rb1.active_set_offset,
            solver_vel2: rb2.active_set_offset,
            im1,
            ii1,
            im2,
            ii2,
            r1,
            r2,
            u1,
            u2,
            ratio: joint.ratio,
            mass: utils::inv(m1 + joint.ratio * joint.ratio * m2),
            impulse: joint.impulse * params.warmstart_coeff,
        }
    }

    fn apply_impulse(&self, impulse: Real, solver_vels: &mut [SolverVel]) {
        let p1 = self.u1 * -impulse;
        let p2 = self.u2 * (-self.ratio * impulse);
        solver_vels[self.solver_vel1].linear += p1 * self.im1;
        solver_vels[self.solver_vel1].angular += self.ii1 * self.r1.gcross(p1);
        solver_vels[self.solver_vel2].linear += p2 * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * self.r2.gcross(p2);
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        self.apply_impulse(self.impulse, solver_vels);
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        let vel1 = solver_vels[self.solver_vel1];
        let vel2 = solver_vels[self.solver_vel2];

        let vp1 = vel1.linear + vel1.angular.gcross(self.r1);
        let vp2 = vel2.linear + vel2.angular.gcross(self.r2);
        let cdot = -self.u1.dot(&vp1) - self.ratio * self.u2.dot(&vp2);

        let impulse = -self.mass * cdot;
        self.impulse += impulse;
        self.apply_impulse(impulse, solver_vels);
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        if let Some(joint) = joints
            .get_mut(self.joint_id)
            .and_then(|j| j.params.as_pulley_mut())
        {
            joint.impulse = self.impulse;
            joint.u1 = self.u1;
            joint.u2 = self.u2;
        }
    }
}

#[derive(Debug)]
pub(crate) struct PulleyPositionConstraint {
    position1: usize,
    position2: usize,
    im1: Real,
    ii1: Real,
    im2: Real,
    ii2: Real,
    local_com1: Point<Real>,
    local_com2: Point<Real>,
    local_anchor1: Point<Real>,
    local_anchor2: Point<Real>,
    ground_anchor1: Point<Real>,
    ground_anchor2: Point<Real>,
    ratio: Real,
    constant: Real,
}

impl PulleyPositionConstraint {
    pub fn from_joint(joint: &PulleyJoint, rb1: &RigidBody, rb2: &RigidBody) -> Self {
        Self {
            position1: rb1.active_set_offset,
            position2: rb2.active_set_offset,
            im1: rb1.effective_inv_mass(),
            ii1: rb1.effective_inv_principal_inertia(),
            im2: rb2.effective_inv_mass(),
            ii2: rb2.effective_inv_principal_inertia(),
            local_com1: rb1.mprops.local_com,
            local_com2: rb2.mprops.local_com,
            local_anchor1: joint.local_anchor1,
            local_anchor2: joint.local_anchor2,
            ground_anchor1: joint.ground_anchor1,
            ground_anchor2: joint.ground_anchor2,
            ratio: joint.ratio,
            constant: joint.constant(),
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [SolverPosition]) -> bool {
        let mut pos1 = positions[self.position1];
        let mut pos2 = positions[self.position2];

        let r1 = pos1.lever_arm(&self.local_anchor1, &self.local_com1);
        let r2 = pos2.lever_arm(&self.local_anchor2, &self.local_com2);

        let slop = params.allowed_linear_error;
        let (u1, length1) = pulley_axis(pos1.com + r1, self.ground_anchor1, slop);
        let (u2, length2) = pulley_axis(pos2.com + r2, self.ground_anchor2, slop);

        let ru1 = r1.gcross(u1);
        let ru2 = r2.gcross(u2);
        let m1 = self.im1 + self.ii1 * ru1 * ru1;
        let m2 = self.im2 + self.ii2 * ru2 * ru2;
        let mass = utils::inv(m1 + self.ratio * self.ratio * m2);

        let c = self.constant - length1 - self.ratio * length2;
        let impulse = -mass * c;

        let p1 = u1 * -impulse;
        let p2 = u2 * (-self.ratio * impulse);

        pos1.com += p1 * self.im1;
        pos1.rot = Rotation::new(self.ii1 * r1.gcross(p1)) * pos1.rot;
        pos2.com += p2 * self.im2;
        pos2.rot = Rotation::new(self.ii2 * r2.gcross(p2)) * pos2.rot;

        positions[self.position1] = pos1;
        positions[self.position2] = pos2;

        c.abs() < params.allowed_linear_error
    }
}
