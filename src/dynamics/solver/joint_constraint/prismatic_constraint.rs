use crate::dynamics::solver::{SolverPosition, SolverVel};
use crate::dynamics::{IntegrationParameters, JointHandle, JointSet, PrismaticJoint, RigidBody};
use crate::math::{Point, Real, Rotation, Vector};
use crate::utils::{self, CrossProduct, SdpMatrix2};
use na::{Matrix3, Vector3};

#[derive(Debug)]
pub(crate) struct PrismaticVelocityConstraint {
    joint_id: JointHandle,
    solver_vel1: usize,
    solver_vel2: usize,
    im1: Real,
    ii1: Real,
    im2: Real,
    ii2: Real,
    axis: Vector<Real>,
    perp: Vector<Real>,
    // Angular lever arms of the axis row.
    a1: Real,
    a2: Real,
    // Angular lever arms of the perpendicular row.
    s1: Real,
    s2: Real,
    // Effective mass of the (perpendicular, angular) rows.
    linear_mass: SdpMatrix2,
    axial_mass: Real,
    motor_enabled: bool,
    motor_speed: Real,
    max_motor_impulse: Real,
    limits_enabled: bool,
    lower_limit: Real,
    upper_limit: Real,
    translation: Real,
    inv_dt: Real,
    impulse: Vector<Real>,
    motor_impulse: Real,
    lower_impulse: Real,
    upper_impulse: Real,
}

impl PrismaticVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointHandle,
        joint: &PrismaticJoint,
        rb1: &RigidBody,
        rb2: &RigidBody,
    ) -> Self {
        let im1 = rb1.effective_inv_mass();
        let ii1 = rb1.effective_inv_principal_inertia();
        let im2 = rb2.effective_inv_mass();
        let ii2 = rb2.effective_inv_principal_inertia();

        let rot1 = rb1.position().rotation;
        let r1 = rot1 * (joint.local_anchor1 - rb1.mprops.local_com);
        let r2 = rb2.position().rotation * (joint.local_anchor2 - rb2.mprops.local_com);
        let d = (rb2.world_com() + r2) - (rb1.world_com() + r1);

        let axis = rot1 * joint.local_axis1;
        let a1 = (d + r1).gcross(axis);
        let a2 = r2.gcross(axis);
        let axial_mass = utils::inv(im1 + im2 + ii1 * a1 * a1 + ii2 * a2 * a2);

        let perp = rot1 * joint.local_perp1();
        let s1 = (d + r1).gcross(perp);
        let s2 = r2.gcross(perp);

        let k11 = im1 + im2 + ii1 * s1 * s1 + ii2 * s2 * s2;
        let k12 = ii1 * s1 + ii2 * s2;
        let mut k22 = ii1 + ii2;
        if k22 == 0.0 {
            // Both bodies have fixed rotation: the angular row is inert.
            k22 = 1.0;
        }

        Self {
            joint_id,
            solver_vel1: rb1.active_set_offset,
            solver_vel2: rb2.active_set_offset,
            im1,
            ii1,
            im2,
            ii2,
            axis,
            perp,
            a1,
            a2,
            s1,
            s2,
            linear_mass: SdpMatrix2::new(k11, k12, k22).inverse(),
            axial_mass,
            motor_enabled: joint.motor_enabled,
            motor_speed: joint.motor_speed,
            max_motor_impulse: joint.max_motor_force * params.dt,
            limits_enabled: joint.limits_enabled,
            lower_limit: joint.lower_limit,
            upper_limit: joint.upper_limit,
            translation: d.dot(&axis),
            inv_dt: params.inv_dt(),
            impulse: joint.impulse * params.warmstart_coeff,
            motor_impulse: joint.motor_impulse * params.warmstart_coeff,
            lower_impulse: joint.lower_impulse * params.warmstart_coeff,
            upper_impulse: joint.upper_impulse * params.warmstart_coeff,
        }
    }

    fn apply_axial_impulse(&self, impulse: Real, solver_vels: &mut [SolverVel]) {
        let p = self.axis * impulse;
        solver_vels[self.solver_vel1].linear -= p * self.im1;
        solver_vels[self.solver_vel1].angular -= self.ii1 * impulse * self.a1;
        solver_vels[self.solver_vel2].linear += p * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * impulse * self.a2;
    }

    fn axial_velocity(&self, solver_vels: &[SolverVel]) -> Real {
        let vel1 = solver_vels[self.solver_vel1];
        let vel2 = solver_vels[self.solver_vel2];
        self.axis.dot(&(vel2.linear - vel1.linear)) + self.a2 * vel2.angular
            - self.a1 * vel1.angular
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        let axial = self.motor_impulse + self.lower_impulse - self.upper_impulse;
        let p = self.perp * self.impulse.x + self.axis * axial;
        let l1 = self.impulse.x * self.s1 + self.impulse.y + axial * self.a1;
        let l2 = self.impulse.x * self.s2 + self.impulse.y + axial * self.a2;

        solver_vels[self.solver_vel1].linear -= p * self.im1;
        solver_vels[self.solver_vel1].angular -= self.ii1 * l1;
        solver_vels[self.solver_vel2].linear += p * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * l2;
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        if self.motor_enabled {
            let cdot = self.axial_velocity(solver_vels);
            let impulse = self.axial_mass * (self.motor_speed - cdot);
            let old_impulse = self.motor_impulse;
            self.motor_impulse = (old_impulse + impulse)
                .clamp(-self.max_motor_impulse, self.max_motor_impulse);
            self.apply_axial_impulse(self.motor_impulse - old_impulse, solver_vels);
        }

        if self.limits_enabled {
            // Lower limit.
            {
                let c = self.translation - self.lower_limit;
                let cdot = self.axial_velocity(solver_vels);
                let impulse = -self.axial_mass * (cdot + c.max(0.0) * self.inv_dt);
                let old_impulse = self.lower_impulse;
                self.lower_impulse = (old_impulse + impulse).max(0.0);
                self.apply_axial_impulse(self.lower_impulse - old_impulse, solver_vels);
            }

            // Upper limit, with the sign of the constraint flipped.
            {
                let c = self.upper_limit - self.translation;
                let cdot = -self.axial_velocity(solver_vels);
                let impulse = -self.axial_mass * (cdot + c.max(0.0) * self.inv_dt);
                let old_impulse = self.upper_impulse;
                self.upper_impulse = (old_impulse + impulse).max(0.0);
                self.apply_axial_impulse(-(self.upper_impulse - old_impulse), solver_vels);
            }
        }

        // (perpendicular, angular) rows.
        let vel1 = solver_vels[self.solver_vel1];
        let vel2 = solver_vels[self.solver_vel2];
        let cdot = Vector::new(
            self.perp.dot(&(vel2.linear - vel1.linear)) + self.s2 * vel2.angular
                - self.s1 * vel1.angular,
            vel2.angular - vel1.angular,
        );

        let impulse = self.linear_mass * -cdot;
        self.impulse += impulse;

        let p = self.perp * impulse.x;
        let l1 = impulse.x * self.s1 + impulse.y;
        let l2 = impulse.x * self.s2 + impulse.y;

        solver_vels[self.solver_vel1].linear -= p * self.im1;
        solver_vels[self.solver_vel1].angular -= self.ii1 * l1;
        solver_vels[self.solver_vel2].linear += p * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * l2;
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        if let Some(joint) = joints
            .get_mut(self.joint_id)
            .and_then(|j| j.params.as_prismatic_mut())
        {
            joint.impulse = self.impulse;
            joint.motor_impulse = self.motor_impulse;
            joint.lower_impulse = self.lower_impulse;
            joint.upper_impulse = self.upper_impulse;
            joint.axis = self.axis;
            joint.perp = self.perp;
        }
    }
}

#[derive(Debug)]
pub(crate) struct PrismaticPositionConstraint {
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
    local_axis1: Vector<Real>,
    local_perp1: Vector<Real>,
    reference_angle: Real,
    limits_enabled: bool,
    lower_limit: Real,
    upper_limit: Real,
}

impl PrismaticPositionConstraint {
    pub fn from_joint(joint: &PrismaticJoint, rb1: &RigidBody, rb2: &RigidBody) -> Self {
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
            local_axis1: joint.local_axis1,
            local_perp1: joint.local_perp1(),
            reference_angle: joint.reference_angle,
            limits_enabled: joint.limits_enabled,
            lower_limit: joint.lower_limit,
            upper_limit: joint.upper_limit,
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [SolverPosition]) -> bool {
        let mut pos1 = positions[self.position1];
        let mut pos2 = positions[self.position2];

        let r1 = pos1.lever_arm(&self.local_anchor1, &self.local_com1);
        let r2 = pos2.lever_arm(&self.local_anchor2, &self.local_com2);
        let d = (pos2.com + r2) - (pos1.com + r1);

        let axis = pos1.rot * self.local_axis1;
        let a1 = (d + r1).gcross(axis);
        let a2 = r2.gcross(axis);
        let perp = pos1.rot * self.local_perp1;
        let s1 = (d + r1).gcross(perp);
        let s2 = r2.gcross(perp);

        let c1 = Vector::new(
            perp.dot(&d),
            pos1.rot.angle_to(&pos2.rot) - self.reference_angle,
        );
        let mut linear_error = c1.x.abs();
        let angular_error = c1.y.abs();

        let mut active = false;
        let mut c2 = 0.0;
        if self.limits_enabled {
            let translation = axis.dot(&d);
            if (self.upper_limit - self.lower_limit).abs() < 2.0 * params.allowed_linear_error {
                c2 = translation
                    .clamp(-params.max_linear_correction, params.max_linear_correction);
                linear_error = linear_error.max(translation.abs());
                active = true;
            } else if translation <= self.lower_limit {
                c2 = (translation - self.lower_limit + params.allowed_linear_error)
                    .clamp(-params.max_linear_correction, 0.0);
                linear_error = linear_error.max(self.lower_limit - translation);
                active = true;
            } else if translation >= self.upper_limit {
                c2 = (translation - self.upper_limit - params.allowed_linear_error)
                    .clamp(0.0, params.max_linear_correction);
                linear_error = linear_error.max(translation - self.upper_limit);
                active = true;
            }
        }

        let impulse = if active {
            let k11 = self.im1 + self.im2 + self.ii1 * s1 * s1 + self.ii2 * s2 * s2;
            let k12 = self.ii1 * s1 + self.ii2 * s2;
            let k13 = self.ii1 * s1 * a1 + self.ii2 * s2 * a2;
            let mut k22 = self.ii1 + self.ii2;
            if k22 == 0.0 {
                k22 = 1.0;
            }
            let k23 = self.ii1 * a1 + self.ii2 * a2;
            let k33 = self.im1 + self.im2 + self.ii1 * a1 * a1 + self.ii2 * a2 * a2;

            let k = Matrix3::new(k11, k12, k13, k12, k22, k23, k13, k23, k33);
            let c = Vector3::new(c1.x, c1.y, c2);
            k.lu().solve(&-c).unwrap_or_else(Vector3::zeros)
        } else {
            let k11 = self.im1 + self.im2 + self.ii1 * s1 * s1 + self.ii2 * s2 * s2;
            let k12 = self.ii1 * s1 + self.ii2 * s2;
            let mut k22 = self.ii1 + self.ii2;
            if k22 == 0.0 {
                k22 = 1.0;
            }
            let sol = SdpMatrix2::new(k11, k12, k22).inverse() * -c1;
            Vector3::new(sol.x, sol.y, 0.0)
        };

        let p = perp * impulse.x + axis * impulse.z;
        let l1 = impulse.x * s1 + impulse.y + impulse.z * a1;
        let l2 = impulse.x * s2 + impulse.y + impulse.z * a2;

        pos1.com -= p * self.im1;
        pos1.rot = Rotation::new(-self.ii1 * l1) * pos1.rot;
        pos2.com += p * self.im2;
        pos2.rot = Rotation::new(self.ii2 * l2) * pos2.rot;

        positions[self.position1] = pos1;
        positions[self.position2] = pos2;

        linear_error <= params.allowed_linear_error
            && angular_error <= params.allowed_angular_error
    }
}
