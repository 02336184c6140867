use crate::dynamics::solver::{AnyJointPositionConstraint, SolverPosition};
use crate::dynamics::{IntegrationParameters, JointHandle, JointSet, RigidBodyHandle, RigidBodySet};

/// Non-linear Gauss-Seidel correction of the trial positions of one island.
pub(crate) struct PositionSolver {
    positions: Vec<SolverPosition>,
    constraints: Vec<AnyJointPositionConstraint>,
}

impl PositionSolver {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn init_constraints(
        &mut self,
        bodies: &RigidBodySet,
        joints: &JointSet,
        island_joints: &[JointHandle],
    ) {
        self.constraints.clear();
        for handle in island_joints {
            self.constraints
                .push(AnyJointPositionConstraint::from_joint(&joints[*handle], bodies));
        }
    }

    /// Corrects the trial positions of the island bodies, returning `true`
    /// if every constraint reported convergence.
    ///
    /// The loop exits as soon as one full pass converges; a pass that does
    /// not converge within the iteration budget leaves the partially
    /// corrected positions in place.
    pub fn solve(
        &mut self,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        island_bodies: &[RigidBodyHandle],
    ) -> bool {
        self.positions.clear();
        self.positions.extend(island_bodies.iter().map(|handle| {
            let rb = &bodies[*handle];
            SolverPosition::from_isometry(&rb.pos.next_position, &rb.mprops.local_com)
        }));

        let mut converged = self.constraints.is_empty();
        for _ in 0..params.max_position_iterations {
            converged = true;
            for constraint in &self.constraints {
                let ok = constraint.solve(params, &mut self.positions);
                converged = converged && ok;
            }

            if converged {
                break;
            }
        }

        for (handle, pos) in island_bodies.iter().zip(self.positions.iter()) {
            let rb = &mut bodies[*handle];
            if rb.is_dynamic() {
                rb.pos.next_position = pos.isometry(&rb.mprops.local_com);
            }
        }

        converged
    }
}
