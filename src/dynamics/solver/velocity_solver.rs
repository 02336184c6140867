use crate::dynamics::solver::{AnyJointVelocityConstraint, SolverVel};
use crate::dynamics::{
    IntegrationParameters, JointHandle, JointSet, RigidBodyHandle, RigidBodySet,
    RigidBodyVelocity,
};

/// Warm-started Gauss-Seidel resolution of the velocity constraints of one
/// island.
pub(crate) struct VelocitySolver {
    solver_vels: Vec<SolverVel>,
    constraints: Vec<AnyJointVelocityConstraint>,
}

impl VelocitySolver {
    pub fn new() -> Self {
        Self {
            solver_vels: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Snapshots every island joint into a fresh velocity constraint.
    pub fn init_constraints(
        &mut self,
        params: &IntegrationParameters,
        bodies: &RigidBodySet,
        joints: &JointSet,
        island_joints: &[JointHandle],
    ) {
        self.constraints.clear();
        for handle in island_joints {
            self.constraints.push(AnyJointVelocityConstraint::from_joint(
                params,
                &joints[*handle],
                bodies,
            ));
        }
    }

    /// Runs the warm-start pass and the velocity iterations, then writes
    /// the corrected velocities back into the dynamic bodies.
    pub fn solve(
        &mut self,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        island_bodies: &[RigidBodyHandle],
    ) {
        self.solver_vels.clear();
        self.solver_vels.extend(island_bodies.iter().map(|handle| {
            let rb = &bodies[*handle];
            SolverVel {
                linear: rb.linvel(),
                angular: rb.angvel(),
            }
        }));

        for constraint in &self.constraints {
            constraint.warmstart(&mut self.solver_vels);
        }

        for _ in 0..params.max_velocity_iterations {
            for constraint in &mut self.constraints {
                constraint.solve(&mut self.solver_vels);
            }
        }

        for (handle, vel) in island_bodies.iter().zip(self.solver_vels.iter()) {
            let rb = &mut bodies[*handle];
            if rb.is_dynamic() {
                rb.vels = RigidBodyVelocity::new(vel.linear, vel.angular);
            }
        }
    }

    /// Stores the accumulated impulses back into the joints for
    /// warm-starting the next step and reaction-force queries.
    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        for constraint in &self.constraints {
            constraint.writeback_impulses(joints);
        }
    }
}
