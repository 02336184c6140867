use crate::dynamics::solver::{PositionSolver, VelocitySolver};
use crate::dynamics::{
    IntegrationParameters, Joint, JointHandle, JointSet, RigidBodyHandle, RigidBodySet,
};

fn involved_bodies(joint: &Joint) -> [Option<RigidBodyHandle>; 4] {
    let mut out = [Some(joint.body1()), Some(joint.body2()), None, None];

    // A gear joint also exerts impulses on the ground bodies of the two
    // joints it couples.
    if let Some(gear) = joint.params.as_gear() {
        out[2] = Some(gear.body_c);
        out[3] = Some(gear.body_d);
    }

    out
}

/// The two-phase constraint solver of one joint island.
///
/// An island is a set of joints whose dynamic bodies are shared with no
/// other island. The solver owns all its scratch buffers, so a warm
/// `IslandSolver` solves step after step without allocating.
pub struct IslandSolver {
    velocity_solver: VelocitySolver,
    position_solver: PositionSolver,
    island_bodies: Vec<RigidBodyHandle>,
    island_id: usize,
}

impl Default for IslandSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IslandSolver {
    /// Creates a new solver with empty scratch buffers.
    pub fn new() -> Self {
        Self {
            velocity_solver: VelocitySolver::new(),
            position_solver: PositionSolver::new(),
            island_bodies: Vec::new(),
            island_id: 0,
        }
    }

    /// Solves every island of one timestep sequentially.
    ///
    /// Returns `true` if the position solve of every island converged.
    /// In debug builds this checks that no dynamic body is claimed by two
    /// islands; sharing a dynamic body would make the step order-dependent
    /// in a way the island decomposition is supposed to rule out.
    pub fn solve_islands(
        &mut self,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        joints: &mut JointSet,
        islands: &[Vec<JointHandle>],
    ) -> bool {
        if cfg!(debug_assertions) {
            let mut claimed = std::collections::HashSet::new();
            for island in islands {
                let mut local = std::collections::HashSet::new();
                for handle in island {
                    if let Some(joint) = joints.get(*handle) {
                        for body in involved_bodies(joint).into_iter().flatten() {
                            if bodies.get(body).map(|rb| rb.is_dynamic()).unwrap_or(false) {
                                local.insert(body);
                            }
                        }
                    }
                }

                for body in local {
                    debug_assert!(
                        claimed.insert(body),
                        "A dynamic body is shared by two islands."
                    );
                }
            }
        }

        let mut converged = true;
        for island in islands {
            let ok = self.solve_island(params, bodies, joints, island);
            converged = converged && ok;
        }

        converged
    }

    /// Solves one island for one timestep.
    ///
    /// This applies the joint impulses to the island's velocities,
    /// integrates the positions, corrects them, and promotes the corrected
    /// positions to the bodies' actual positions. Returns `true` if the
    /// position solve converged.
    ///
    /// Panics if a joint handle is invalid or one of its bodies is missing.
    pub fn solve_island(
        &mut self,
        params: &IntegrationParameters,
        bodies: &mut RigidBodySet,
        joints: &mut JointSet,
        island_joints: &[JointHandle],
    ) -> bool {
        self.island_id += 1;
        let island_id = self.island_id;
        self.island_bodies.clear();

        for handle in island_joints {
            let joint = joints
                .get_mut(*handle)
                .expect("Attempt to solve a non-existing joint.");
            joint.is_in_island = true;

            for body in involved_bodies(joint).into_iter().flatten() {
                let rb = bodies
                    .get_mut(body)
                    .expect("Attempt to solve a joint attached to a non-existing body.");
                if rb.active_island_id != island_id {
                    rb.active_island_id = island_id;
                    rb.active_set_offset = self.island_bodies.len();
                    self.island_bodies.push(body);
                }
            }
        }

        self.velocity_solver
            .init_constraints(params, bodies, joints, island_joints);
        self.position_solver
            .init_constraints(bodies, joints, island_joints);

        self.velocity_solver
            .solve(params, bodies, &self.island_bodies);

        for handle in &self.island_bodies {
            let rb = &mut bodies[*handle];
            rb.pos.next_position = if rb.is_dynamic() {
                rb.vels
                    .integrate(params.dt, &rb.pos.position, &rb.mprops.local_com)
            } else {
                rb.pos.position
            };
        }

        let converged = self
            .position_solver
            .solve(params, bodies, &self.island_bodies);
        if !converged {
            log::debug!(
                "Joint position solver stopped after {} iterations without converging.",
                params.max_position_iterations
            );
        }

        for handle in &self.island_bodies {
            let rb = &mut bodies[*handle];
            rb.pos.position = rb.pos.next_position;
            rb.active_island_id = crate::INVALID_U32 as usize;
        }

        self.velocity_solver.writeback_impulses(joints);

        for handle in island_joints {
            if let Some(joint) = joints.get_mut(*handle) {
                joint.is_in_island = false;
            }
        }

        converged
    }
}

#[cfg(test)]
mod test {
    use crate::dynamics::{
        DistanceJoint, IntegrationParameters, IslandSolver, JointDef, JointHandle, JointSet,
        MouseJoint, PrismaticJoint, PulleyJoint, RevoluteJoint, RigidBodyBuilder, RigidBodySet,
        WheelJoint,
    };
    use crate::math::{Point, Real, Vector};
    use approx::assert_relative_eq;

    const GRAVITY: Vector<Real> = Vector::new(0.0, -10.0);

    fn apply_gravity(bodies: &mut RigidBodySet, dt: Real) {
        for (_, rb) in bodies.iter_mut() {
            if rb.is_dynamic() {
                rb.set_linvel(rb.linvel() + GRAVITY * dt);
            }
        }
    }

    fn all_joints(joints: &JointSet) -> Vec<JointHandle> {
        joints.iter().map(|(h, _)| h).collect()
    }

    #[test]
    fn distance_joint_converges_to_rest_length() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let b1 = bodies.insert(RigidBodyBuilder::dynamic().build());
        let b2 = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(1.5, 0.0))
                .build(),
        );
        joints.insert(
            &mut bodies,
            JointDef::new(b1, b2, DistanceJoint::new(Point::origin(), Point::origin(), 1.0)),
        );
        let island = all_joints(&joints);

        for _ in 0..10 {
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        let gap = (bodies[b2].translation() - bodies[b1].translation()).norm();
        assert_relative_eq!(gap, 1.0, epsilon = 1.0e-2);
    }

    #[test]
    fn static_body_never_moves() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let ball = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, -1.0))
                .build(),
        );
        joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                ball,
                DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
            ),
        );
        let island = all_joints(&joints);

        for _ in 0..30 {
            apply_gravity(&mut bodies, params.dt);
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        assert_eq!(bodies[ground].translation(), Vector::zeros());
        assert_eq!(bodies[ground].linvel(), Vector::zeros());
        assert!(bodies[ball].vels.is_finite());
        assert_relative_eq!(bodies[ball].translation().norm(), 1.0, epsilon = 1.0e-2);
    }

    #[test]
    fn fresh_solver_reuses_bodies_solved_by_another_solver() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let ball = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, -1.0))
                .build(),
        );
        joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                ball,
                DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
            ),
        );
        let island = all_joints(&joints);

        let mut solver1 = IslandSolver::new();
        apply_gravity(&mut bodies, params.dt);
        solver1.solve_island(&params, &mut bodies, &mut joints, &island);

        // A brand new solver restarts its island numbering; it must still
        // gather every body touched by an earlier solver.
        let mut solver2 = IslandSolver::new();
        apply_gravity(&mut bodies, params.dt);
        solver2.solve_island(&params, &mut bodies, &mut joints, &island);

        assert!(bodies[ball].vels.is_finite());
        assert_relative_eq!(bodies[ball].translation().norm(), 1.0, epsilon = 1.0e-2);
    }

    #[test]
    fn hanging_mass_reaction_force_balances_gravity() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let ball = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, -1.0))
                .build(),
        );
        let joint = joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                ball,
                DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
            ),
        );
        let island = all_joints(&joints);

        for _ in 0..20 {
            apply_gravity(&mut bodies, params.dt);
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        // The rope holds a unit mass against gravity.
        let force = joints[joint].reaction_force(params.inv_dt());
        assert_relative_eq!(force.y, 10.0, epsilon = 0.1);
        assert_relative_eq!(force.x, 0.0, epsilon = 0.1);
        assert_relative_eq!(joints[joint].reaction_torque(params.inv_dt()), 0.0);
    }

    #[test]
    fn warmstart_keeps_error_smaller_with_one_iteration() {
        let mut params = IntegrationParameters::default();
        params.max_velocity_iterations = 1;

        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let b1 = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, -1.0))
                .build(),
        );
        let b2 = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, -2.0))
                .build(),
        );
        let j1 = joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                b1,
                DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
            ),
        );
        let j2 = joints.insert(
            &mut bodies,
            JointDef::new(
                b1,
                b2,
                DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
            ),
        );
        let island = all_joints(&joints);

        for _ in 0..60 {
            apply_gravity(&mut bodies, params.dt);
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        let mut cold_bodies = bodies.clone();
        let mut cold_joints = joints.clone();
        for handle in [j1, j2] {
            let joint = cold_joints[handle].params.as_distance_mut().unwrap();
            joint.impulse = 0.0;
        }

        let chain_error = |bodies: &RigidBodySet| -> Real {
            bodies[b1].linvel().y.abs() + (bodies[b2].linvel().y - bodies[b1].linvel().y).abs()
        };

        apply_gravity(&mut bodies, params.dt);
        solver.solve_island(&params, &mut bodies, &mut joints, &island);

        apply_gravity(&mut cold_bodies, params.dt);
        let mut cold_solver = IslandSolver::new();
        cold_solver.solve_island(&params, &mut cold_bodies, &mut cold_joints, &island);

        assert!(chain_error(&bodies) <= chain_error(&cold_bodies) + 1.0e-5);
    }

    #[test]
    fn revolute_motor_reaches_target_speed() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let wheel = bodies.insert(RigidBodyBuilder::dynamic().build());
        joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                wheel,
                RevoluteJoint::new(Point::origin(), Point::origin()).with_motor(2.0, 100.0),
            ),
        );
        let island = all_joints(&joints);

        for _ in 0..10 {
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        assert_relative_eq!(bodies[wheel].angvel(), 2.0, epsilon = 1.0e-3);
    }

    #[test]
    fn revolute_limit_stops_the_spin() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let arm = bodies.insert(RigidBodyBuilder::dynamic().angvel(5.0).build());
        joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                arm,
                RevoluteJoint::new(Point::origin(), Point::origin()).with_limits(-0.5, 0.1),
            ),
        );
        let island = all_joints(&joints);

        for _ in 0..60 {
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        let angle = bodies[arm].rotation().angle();
        assert!(
            angle <= 0.1 + params.allowed_angular_error,
            "angle {} exceeded the upper limit",
            angle
        );
    }

    #[test]
    fn prismatic_joint_constrains_off_axis_motion() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let slider = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(2.0, 0.0))
                .linvel(Vector::new(0.5, 3.0))
                .build(),
        );
        joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                slider,
                PrismaticJoint::new(Point::origin(), Point::origin(), Vector::x()),
            ),
        );
        let island = all_joints(&joints);

        solver.solve_island(&params, &mut bodies, &mut joints, &island);

        let vel = bodies[slider].linvel();
        assert_relative_eq!(vel.y, 0.0, epsilon = 1.0e-4);
        assert_relative_eq!(vel.x, 0.5, epsilon = 1.0e-4);
        assert_relative_eq!(bodies[slider].angvel(), 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn pulley_couples_the_two_rope_sides() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let b1 = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(0.0, 8.0))
                .linvel(Vector::new(0.0, -1.0))
                .build(),
        );
        let b2 = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(4.0, 8.0))
                .build(),
        );
        joints.insert(
            &mut bodies,
            JointDef::new(
                b1,
                b2,
                PulleyJoint::new(
                    Point::new(0.0, 10.0),
                    Point::new(4.0, 10.0),
                    Point::origin(),
                    Point::origin(),
                    2.0,
                    2.0,
                    1.0,
                ),
            ),
        );
        let island = all_joints(&joints);

        solver.solve_island(&params, &mut bodies, &mut joints, &island);

        // Total rope length must be conserved: one side pays out what the
        // other takes up.
        let v1 = bodies[b1].linvel();
        let v2 = bodies[b2].linvel();
        assert_relative_eq!(v1.y + v2.y, 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn gear_couples_angular_velocities_by_the_ratio() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground1 = bodies.insert(RigidBodyBuilder::fixed().build());
        let ground2 = bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(Vector::new(3.0, 0.0))
                .build(),
        );
        let wheel1 = bodies.insert(RigidBodyBuilder::dynamic().angvel(3.0).build());
        let wheel2 = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(3.0, 0.0))
                .build(),
        );
        let rev1 = joints.insert(
            &mut bodies,
            JointDef::new(
                ground1,
                wheel1,
                RevoluteJoint::new(Point::origin(), Point::origin()),
            ),
        );
        let rev2 = joints.insert(
            &mut bodies,
            JointDef::new(
                ground2,
                wheel2,
                RevoluteJoint::new(Point::origin(), Point::origin()),
            ),
        );
        joints.insert_gear(&mut bodies, rev1, rev2, 2.0);
        let island = all_joints(&joints);

        solver.solve_island(&params, &mut bodies, &mut joints, &island);

        let w1 = bodies[wheel1].angvel();
        let w2 = bodies[wheel2].angvel();
        assert_relative_eq!(w1 + 2.0 * w2, 0.0, epsilon = 1.0e-3);
        assert!(w1 > 0.0 && w2 < 0.0);
    }

    #[test]
    fn wheel_joint_corrects_perpendicular_drift() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let wheel = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(3.0, 0.1))
                .build(),
        );
        joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                wheel,
                WheelJoint::new(Point::origin(), Point::origin(), Vector::x())
                    .with_suspension(0.0, 0.0),
            ),
        );
        let island = all_joints(&joints);

        for _ in 0..5 {
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        assert_relative_eq!(bodies[wheel].translation().y, 0.0, epsilon = 1.0e-2);
    }

    #[test]
    fn mouse_joint_drags_the_body_towards_the_target() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let box_body = bodies.insert(RigidBodyBuilder::dynamic().build());
        let mut mouse = MouseJoint::new(bodies[box_body].position(), Point::origin(), 1000.0);
        mouse.set_target(Point::new(1.0, 0.0));
        joints.insert(&mut bodies, JointDef::new(ground, box_body, mouse));
        let island = all_joints(&joints);

        for _ in 0..60 {
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        let pos = bodies[box_body].translation();
        assert!(pos.x > 0.5, "body only reached x = {}", pos.x);
        assert!(bodies[box_body].vels.is_finite());
    }

    #[test]
    fn position_solver_reports_non_convergence() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        // Way out of reach: each NGS iteration may only correct
        // `max_linear_correction`, so the iteration budget cannot absorb
        // the error in one step.
        let ball = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(11.0, 0.0))
                .build(),
        );
        joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                ball,
                DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
            ),
        );
        let island = all_joints(&joints);

        let converged = solver.solve_island(&params, &mut bodies, &mut joints, &island);
        assert!(!converged);

        // The step still made bounded progress towards the joint.
        let x = bodies[ball].translation().x;
        let max_progress =
            params.max_linear_correction * params.max_position_iterations as Real + 1.0e-4;
        assert!(x < 11.0 && x > 11.0 - max_progress);
    }

    #[test]
    fn solving_does_not_touch_joint_configuration() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let ground = bodies.insert(RigidBodyBuilder::fixed().build());
        let slider = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(2.0, 0.3))
                .linvel(Vector::new(0.0, 1.0))
                .build(),
        );
        let joint = joints.insert(
            &mut bodies,
            JointDef::new(
                ground,
                slider,
                PrismaticJoint::new(Point::origin(), Point::origin(), Vector::x())
                    .with_limits(-4.0, 4.0)
                    .with_motor(0.5, 10.0),
            ),
        );
        let island = all_joints(&joints);
        let before = *joints[joint].params.as_prismatic().unwrap();

        for _ in 0..5 {
            apply_gravity(&mut bodies, params.dt);
            solver.solve_island(&params, &mut bodies, &mut joints, &island);
        }

        let after = joints[joint].params.as_prismatic().unwrap();
        assert_eq!(before.local_anchor1, after.local_anchor1);
        assert_eq!(before.local_anchor2, after.local_anchor2);
        assert_eq!(before.local_axis1, after.local_axis1);
        assert_eq!(before.lower_limit, after.lower_limit);
        assert_eq!(before.upper_limit, after.upper_limit);
        assert_eq!(before.motor_speed, after.motor_speed);
        assert_eq!(before.max_motor_force, after.max_motor_force);
        // The warm-start state did change: the perpendicular row now
        // carries the weight of the slider.
        assert_ne!(before.impulse, after.impulse);
    }

    #[test]
    fn solve_islands_runs_every_island() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();

        let mut islands = Vec::new();
        for i in 0..3 {
            let offset = Vector::new(0.0, 10.0 * i as Real);
            let ground = bodies.insert(RigidBodyBuilder::fixed().translation(offset).build());
            let ball = bodies.insert(
                RigidBodyBuilder::dynamic()
                    .translation(offset + Vector::new(0.0, -1.0))
                    .build(),
            );
            let joint = joints.insert(
                &mut bodies,
                JointDef::new(
                    ground,
                    ball,
                    DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
                ),
            );
            islands.push(vec![joint]);
        }

        for _ in 0..10 {
            apply_gravity(&mut bodies, params.dt);
            let converged = solver.solve_islands(&params, &mut bodies, &mut joints, &islands);
            assert!(converged);
        }

        for (_, rb) in bodies.iter() {
            assert!(rb.vels.is_finite());
        }
    }

    #[test]
    fn every_joint_type_solves_to_finite_state() {
        let params = IntegrationParameters::default();
        let mut bodies = RigidBodySet::new();
        let mut joints = JointSet::new();
        let mut solver = IslandSolver::new();
        let mut islands: Vec<Vec<JointHandle>> = Vec::new();

        let pair = |bodies: &mut RigidBodySet, x: Real| {
            let a = bodies.insert(
                RigidBodyBuilder::fixed()
                    .translation(Vector::new(x, 0.0))
                    .build(),
            );
            let b = bodies.insert(
                RigidBodyBuilder::dynamic()
                    .translation(Vector::new(x, -1.0))
                    .build(),
            );
            (a, b)
        };

        let (a, b) = pair(&mut bodies, 0.0);
        islands.push(vec![joints.insert(
            &mut bodies,
            JointDef::new(a, b, DistanceJoint::new(Point::origin(), Point::origin(), 1.0)),
        )]);

        let (a, b) = pair(&mut bodies, 10.0);
        let pos2 = *bodies[b].position();
        islands.push(vec![joints.insert(
            &mut bodies,
            JointDef::new(a, b, MouseJoint::new(&pos2, Point::new(10.0, -1.0), 50.0)),
        )]);

        let (a, b) = pair(&mut bodies, 20.0);
        islands.push(vec![joints.insert(
            &mut bodies,
            JointDef::new(a, b, RevoluteJoint::new(Point::origin(), Point::new(0.0, 1.0))),
        )]);

        let (a, b) = pair(&mut bodies, 30.0);
        islands.push(vec![joints.insert(
            &mut bodies,
            JointDef::new(
                a,
                b,
                PrismaticJoint::new(Point::origin(), Point::origin(), Vector::y()),
            ),
        )]);

        let (_, b) = pair(&mut bodies, 40.0);
        let (_, b2) = pair(&mut bodies, 44.0);
        islands.push(vec![joints.insert(
            &mut bodies,
            JointDef::new(
                b,
                b2,
                PulleyJoint::new(
                    Point::new(40.0, 2.0),
                    Point::new(44.0, 2.0),
                    Point::origin(),
                    Point::origin(),
                    3.0,
                    3.0,
                    1.0,
                ),
            ),
        )]);

        let (a, b) = pair(&mut bodies, 50.0);
        islands.push(vec![joints.insert(
            &mut bodies,
            JointDef::new(
                a,
                b,
                WheelJoint::new(Point::origin(), Point::origin(), Vector::y()),
            ),
        )]);

        let (g1, w1) = pair(&mut bodies, 60.0);
        let (g2, w2) = pair(&mut bodies, 64.0);
        let rev1 = joints.insert(
            &mut bodies,
            JointDef::new(g1, w1, RevoluteJoint::new(Point::new(0.0, -1.0), Point::origin())),
        );
        let rev2 = joints.insert(
            &mut bodies,
            JointDef::new(g2, w2, RevoluteJoint::new(Point::new(0.0, -1.0), Point::origin())),
        );
        let gear = joints.insert_gear(&mut bodies, rev1, rev2, -1.5);
        islands.push(vec![rev1, rev2, gear]);

        for _ in 0..10 {
            apply_gravity(&mut bodies, params.dt);
            solver.solve_islands(&params, &mut bodies, &mut joints, &islands);
        }

        for (_, rb) in bodies.iter() {
            assert!(rb.vels.is_finite());
            assert!(rb.translation().x.is_finite() && rb.translation().y.is_finite());
        }
        for (handle, joint) in joints.iter() {
            let force = joint.reaction_force(params.inv_dt());
            assert!(force.x.is_finite() && force.y.is_finite(), "{:?}", handle);
            assert!(joint.reaction_torque(params.inv_dt()).is_finite());
        }
    }
}
