use crate::dynamics::solver::SolverVel;
use crate::dynamics::{IntegrationParameters, JointHandle, JointSet, MouseJoint, RigidBody};
use crate::math::{Real, Vector};
use crate::utils::{self, CrossProduct, SdpMatrix2};

/// The velocity constraint of a mouse joint.
///
/// Only the second body is constrained. The first body is the reference
/// frame and is never touched, so the constraint does not even record its
/// solver index.
#[derive(Debug)]
pub(crate) struct MouseVelocityConstraint {
    joint_id: JointHandle,
    solver_vel2: usize,
    im2: Real,
    ii2: Real,
    r2: Vector<Real>,
    mass: SdpMatrix2,
    gamma: Real,
    bias: Vector<Real>,
    max_impulse: Real,
    impulse: Vector<Real>,
}

impl MouseVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointHandle,
        joint: &MouseJoint,
        rb2: &RigidBody,
    ) -> Self {
        let im2 = rb2.effective_inv_mass();
        let ii2 = rb2.effective_inv_principal_inertia();
        let r2 = rb2.position().rotation * (joint.local_anchor2 - rb2.mprops.local_com);

        let mass2 = utils::inv(im2);
        let omega = 2.0 * std::f32::consts::PI * joint.frequency;
        let d = 2.0 * mass2 * joint.damping_ratio * omega;
        let k = mass2 * omega * omega;
        let h = params.dt;

        let gamma = utils::inv(h * (d + h * k));
        let beta = h * k * gamma;

        let k_matrix = SdpMatrix2::new(
            im2 + ii2 * r2.y * r2.y + gamma,
            -ii2 * r2.x * r2.y,
            im2 + ii2 * r2.x * r2.x + gamma,
        );

        let c = (rb2.world_com() + r2) - joint.target;

        Self {
            joint_id,
            solver_vel2: rb2.active_set_offset,
            im2,
            ii2,
            r2,
            mass: k_matrix.inverse(),
            gamma,
            bias: c * beta,
            max_impulse: joint.max_force * params.dt,
            impulse: joint.impulse * params.warmstart_coeff,
        }
    }

    fn apply_impulse(&self, impulse: Vector<Real>, solver_vels: &mut [SolverVel]) {
        solver_vels[self.solver_vel2].linear += impulse * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * self.r2.gcross(impulse);
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        self.apply_impulse(self.impulse, solver_vels);
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        let vel2 = solver_vels[self.solver_vel2];
        let cdot = vel2.linear + vel2.angular.gcross(self.r2);

        let impulse = self.mass * -(cdot + self.bias + self.impulse * self.gamma);
        let old_impulse = self.impulse;
        self.impulse += impulse;

        // The accumulated impulse may never exceed the force budget.
        if self.impulse.norm_squared() > self.max_impulse * self.max_impulse {
            self.impulse *= self.max_impulse / self.impulse.norm();
        }

        self.apply_impulse(self.impulse - old_impulse, solver_vels);
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        if let Some(joint) = joints
            .get_mut(self.joint_id)
            .and_then(|j| j.params.as_mouse_mut())
        {
            joint.impulse = self.impulse;
        }
    }
}
