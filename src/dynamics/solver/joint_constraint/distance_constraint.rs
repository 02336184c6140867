use crate::dynamics::solver::{SolverPosition, SolverVel};
use crate::dynamics::{DistanceJoint, IntegrationParameters, JointHandle, JointSet, RigidBody};
use crate::math::{Point, Real, Rotation, Vector};
use crate::utils::{self, CrossProduct};

#[derive(Debug)]
pub(crate) struct DistanceVelocityConstraint {
    joint_id: JointHandle,
    solver_vel1: usize,
    solver_vel2: usize,
    im1: Real,
    ii1: Real,
    im2: Real,
    ii2: Real,
    r1: Vector<Real>,
    r2: Vector<Real>,
    u: Vector<Real>,
    mass: Real,
    gamma: Real,
    bias: Real,
    impulse: Real,
}

impl DistanceVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointHandle,
        joint: &DistanceJoint,
        rb1: &RigidBody,
        rb2: &RigidBody,
    ) -> Self {
        let im1 = rb1.effective_inv_mass();
        let ii1 = rb1.effective_inv_principal_inertia();
        let im2 = rb2.effective_inv_mass();
        let ii2 = rb2.effective_inv_principal_inertia();

        let r1 = rb1.position().rotation * (joint.local_anchor1 - rb1.mprops.local_com);
        let r2 = rb2.position().rotation * (joint.local_anchor2 - rb2.mprops.local_com);
        let mut u = (rb2.world_com() + r2) - (rb1.world_com() + r1);

        // A degenerate axis yields a disabled constraint rather than NaN.
        let length = u.norm();
        if length > params.allowed_linear_error {
            u /= length;
        } else {
            u = na::zero();
        }

        let cr1u = r1.gcross(u);
        let cr2u = r2.gcross(u);
        let mut inv_mass = im1 + ii1 * cr1u * cr1u + im2 + ii2 * cr2u * cr2u;
        let mut mass = utils::inv(inv_mass);

        let mut gamma = 0.0;
        let mut bias = 0.0;

        if joint.frequency > 0.0 {
            let c = length - joint.rest_length;
            let omega = 2.0 * std::f32::consts::PI * joint.frequency;
            let d = 2.0 * mass * joint.damping_ratio * omega;
            let k = mass * omega * omega;
            let h = params.dt;

            gamma = utils::inv(h * (d + h * k));
            bias = c * h * k * gamma;

            inv_mass += gamma;
            mass = utils::inv(inv_mass);
        }

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
            u,
            mass,
            gamma,
            bias,
            impulse: joint.impulse * params.warmstart_coeff,
        }
    }

    fn apply_impulse(&self, impulse: Real, solver_vels: &mut [SolverVel]) {
        let p = self.u * impulse;
        solver_vels[self.solver_vel1].linear -= p * self.im1;
        solver_vels[self.solver_vel1].angular -= self.ii1 * self.r1.gcross(p);
        solver_vels[self.solver_vel2].linear += p * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * self.r2.gcross(p);
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        self.apply_impulse(self.impulse, solver_vels);
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        let vel1 = solver_vels[self.solver_vel1];
        let vel2 = solver_vels[self.solver_vel2];

        let vp1 = vel1.linear + vel1.angular.gcross(self.r1);
        let vp2 = vel2.linear + vel2.angular.gcross(self.r2);
        let cdot = self.u.dot(&(vp2 - vp1));

        let impulse = -self.mass * (cdot + self.bias + self.gamma * self.impulse);
        self.impulse += impulse;
        self.apply_impulse(impulse, solver_vels);
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        if let Some(joint) = joints
            .get_mut(self.joint_id)
            .and_then(|j| j.params.as_distance_mut())
        {
            joint.impulse = self.impulse;
            joint.u = self.u;
        }
    }
}

#[derive(Debug)]
pub(crate) struct DistancePositionConstraint {
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
    rest_length: Real,
    mass: Real,
    rigid: bool,
}

impl DistancePositionConstraint {
    pub fn from_joint(joint: &DistanceJoint, rb1: &RigidBody, rb2: &RigidBody) -> Self {
        let im1 = rb1.effective_inv_mass();
        let ii1 = rb1.effective_inv_principal_inertia();
        let im2 = rb2.effective_inv_mass();
        let ii2 = rb2.effective_inv_principal_inertia();

        let r1 = rb1.position().rotation * (joint.local_anchor1 - rb1.mprops.local_com);
        let r2 = rb2.position().rotation * (joint.local_anchor2 - rb2.mprops.local_com);
        let u = (rb2.world_com() + r2) - (rb1.world_com() + r1);
        let length = u.norm();
        let u = if length > 1.0e-6 { u / length } else { na::zero() };
        let cr1u = r1.gcross(u);
        let cr2u = r2.gcross(u);
        let mass = utils::inv(im1 + ii1 * cr1u * cr1u + im2 + ii2 * cr2u * cr2u);

        Self {
            position1: rb1.active_set_offset,
            position2: rb2.active_set_offset,
            im1,
            ii1,
            im2,
            ii2,
            local_com1: rb1.mprops.local_com,
            local_com2: rb2.mprops.local_com,
            local_anchor1: joint.local_anchor1,
            local_anchor2: joint.local_anchor2,
            rest_length: joint.rest_length,
            mass,
            rigid: joint.frequency == 0.0,
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [SolverPosition]) -> bool {
        // A soft distance joint lets the spring absorb the positional
        // error instead of the position solver.
        if !self.rigid {
            return true;
        }

        let mut pos1 = positions[self.position1];
        let mut pos2 = positions[self.position2];

        let r1 = pos1.lever_arm(&self.local_anchor1, &self.local_com1);
        let r2 = pos2.lever_arm(&self.local_anchor2, &self.local_com2);
        let mut u = (pos2.com + r2) - (pos1.com + r1);

        let length = u.norm();
        if length > 1.0e-6 {
            u /= length;
        } else {
            u = na::zero();
        }

        let c = (length - self.rest_length)
            .clamp(-params.max_linear_correction, params.max_linear_correction);
        let impulse = -self.mass * c;
        let p = u * impulse;

        pos1.com -= p * self.im1;
        pos1.rot = Rotation::new(-self.ii1 * r1.gcross(p)) * pos1.rot;
        pos2.com += p * self.im2;
        pos2.rot = Rotation::new(self.ii2 * r2.gcross(p)) * pos2.rot;

        positions[self.position1] = pos1;
        positions[self.position2] = pos2;

        c.abs() < params.allowed_linear_error
    }
}

#[cfg(test)]
mod test {
    use super::DistanceVelocityConstraint;
    use crate::dynamics::{DistanceJoint, IntegrationParameters, JointHandle, RigidBodyBuilder};
    use crate::math::{Isometry, Point, Vector};

    #[test]
    fn constraint_is_a_snapshot_of_the_bodies() {
        let params = IntegrationParameters::default();
        let rb1 = RigidBodyBuilder::dynamic().build();
        let mut rb2 = RigidBodyBuilder::dynamic()
            .translation(Vector::new(2.0, 0.0))
            .build();
        let joint = DistanceJoint::new(Point::origin(), Point::origin(), 1.0);

        let constraint = DistanceVelocityConstraint::from_joint(
            &params,
            JointHandle::invalid(),
            &joint,
            &rb1,
            &rb2,
        );

        // Mutating the body afterwards must not affect the constraint.
        rb2.set_position(Isometry::translation(0.0, 5.0));
        let moved = DistanceVelocityConstraint::from_joint(
            &params,
            JointHandle::invalid(),
            &joint,
            &rb1,
            &rb2,
        );

        assert_eq!(constraint.u, Vector::new(1.0, 0.0));
        assert_eq!(moved.u, Vector::new(0.0, 1.0));
        assert_eq!(constraint.mass, moved.mass);
    }
}
