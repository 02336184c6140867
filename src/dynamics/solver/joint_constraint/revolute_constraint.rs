use crate::dynamics::solver::{SolverPosition, SolverVel};
use crate::dynamics::{IntegrationParameters, JointHandle, JointSet, RevoluteJoint, RigidBody};
use crate::math::{Point, Real, Rotation, Vector};
use crate::utils::{self, CrossProduct, SdpMatrix2};

#[derive(Debug)]
pub(crate) struct RevoluteVelocityConstraint {
    joint_id: JointHandle,
    solver_vel1: usize,
    solver_vel2: usize,
    im1: Real,
    ii1: Real,
    im2: Real,
    ii2: Real,
    r1: Vector<Real>,
    r2: Vector<Real>,
    linear_mass: SdpMatrix2,
    axial_mass: Real,
    motor_enabled: bool,
    motor_speed: Real,
    max_motor_impulse: Real,
    limits_enabled: bool,
    lower_limit: Real,
    upper_limit: Real,
    // The joint angle, sampled once at the beginning of the step.
    angle: Real,
    inv_dt: Real,
    impulse: Vector<Real>,
    motor_impulse: Real,
    lower_impulse: Real,
    upper_impulse: Real,
}

impl RevoluteVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointHandle,
        joint: &RevoluteJoint,
        rb1: &RigidBody,
        rb2: &RigidBody,
    ) -> Self {
        let im1 = rb1.effective_inv_mass();
        let ii1 = rb1.effective_inv_principal_inertia();
        let im2 = rb2.effective_inv_mass();
        let ii2 = rb2.effective_inv_principal_inertia();

        let r1 = rb1.position().rotation * (joint.local_anchor1 - rb1.mprops.local_com);
        let r2 = rb2.position().rotation * (joint.local_anchor2 - rb2.mprops.local_com);

        let k = SdpMatrix2::new(
            im1 + im2 + ii1 * r1.y * r1.y + ii2 * r2.y * r2.y,
            -ii1 * r1.x * r1.y - ii2 * r2.x * r2.y,
            im1 + im2 + ii1 * r1.x * r1.x + ii2 * r2.x * r2.x,
        );

        let angle = rb1
            .position()
            .rotation
            .angle_to(&rb2.position().rotation)
            - joint.reference_angle;

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
            linear_mass: k.inverse(),
            axial_mass: utils::inv(ii1 + ii2),
            motor_enabled: joint.motor_enabled,
            motor_speed: joint.motor_speed,
            max_motor_impulse: joint.max_motor_torque * params.dt,
            limits_enabled: joint.limits_enabled,
            lower_limit: joint.lower_limit,
            upper_limit: joint.upper_limit,
            angle,
            inv_dt: params.inv_dt(),
            impulse: joint.impulse * params.warmstart_coeff,
            motor_impulse: joint.motor_impulse * params.warmstart_coeff,
            lower_impulse: joint.lower_impulse * params.warmstart_coeff,
            upper_impulse: joint.upper_impulse * params.warmstart_coeff,
        }
    }

    fn apply_axial_impulse(&self, impulse: Real, solver_vels: &mut [SolverVel]) {
        solver_vels[self.solver_vel1].angular -= self.ii1 * impulse;
        solver_vels[self.solver_vel2].angular += self.ii2 * impulse;
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        let axial = self.motor_impulse + self.lower_impulse - self.upper_impulse;
        solver_vels[self.solver_vel1].linear -= self.impulse * self.im1;
        solver_vels[self.solver_vel1].angular -= self.ii1 * (self.r1.gcross(self.impulse) + axial);
        solver_vels[self.solver_vel2].linear += self.impulse * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * (self.r2.gcross(self.impulse) + axial);
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        if self.motor_enabled {
            let w1 = solver_vels[self.solver_vel1].angular;
            let w2 = solver_vels[self.solver_vel2].angular;
            let cdot = w2 - w1 - self.motor_speed;
            let impulse = -self.axial_mass * cdot;
            let old_impulse = self.motor_impulse;
            self.motor_impulse = (old_impulse + impulse)
                .clamp(-self.max_motor_impulse, self.max_motor_impulse);
            self.apply_axial_impulse(self.motor_impulse - old_impulse, solver_vels);
        }

        if self.limits_enabled {
            // Lower limit.
            {
                let c = self.angle - self.lower_limit;
                let w1 = solver_vels[self.solver_vel1].angular;
                let w2 = solver_vels[self.solver_vel2].angular;
                let cdot = w2 - w1;
                let impulse = -self.axial_mass * (cdot + c.max(0.0) * self.inv_dt);
                let old_impulse = self.lower_impulse;
                self.lower_impulse = (old_impulse + impulse).max(0.0);
                self.apply_axial_impulse(self.lower_impulse - old_impulse, solver_vels);
            }

            // Upper limit, with the sign of the constraint flipped.
            {
                let c = self.upper_limit - self.angle;
                let w1 = solver_vels[self.solver_vel1].angular;
                let w2 = solver_vels[self.solver_vel2].angular;
                let cdot = w1 - w2;
                let impulse = -self.axial_mass * (cdot + c.max(0.0) * self.inv_dt);
                let old_impulse = self.upper_impulse;
                self.upper_impulse = (old_impulse + impulse).max(0.0);
                self.apply_axial_impulse(-(self.upper_impulse - old_impulse), solver_vels);
            }
        }

        // Point-to-point constraint.
        let vel1 = solver_vels[self.solver_vel1];
        let vel2 = solver_vels[self.solver_vel2];
        let cdot =
            vel2.linear + vel2.angular.gcross(self.r2) - vel1.linear - vel1.angular.gcross(self.r1);
        let impulse = self.linear_mass * -cdot;
        self.impulse += impulse;

        solver_vels[self.solver_vel1].linear -= impulse * self.im1;
        solver_vels[self.solver_vel1].angular -= self.ii1 * self.r1.gcross(impulse);
        solver_vels[self.solver_vel2].linear += impulse * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * self.r2.gcross(impulse);
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        if let Some(joint) = joints
            .get_mut(self.joint_id)
            .and_then(|j| j.params.as_revolute_mut())
        {
            joint.impulse = self.impulse;
            joint.motor_impulse = self.motor_impulse;
            joint.lower_impulse = self.lower_impulse;
            joint.upper_impulse = self.upper_impulse;
        }
    }
}

#[derive(Debug)]
pub(crate) struct RevolutePositionConstraint {
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
    reference_angle: Real,
    limits_enabled: bool,
    lower_limit: Real,
    upper_limit: Real,
    axial_mass: Real,
}

impl RevolutePositionConstraint {
    pub fn from_joint(joint: &RevoluteJoint, rb1: &RigidBody, rb2: &RigidBody) -> Self {
        let ii1 = rb1.effective_inv_principal_inertia();
        let ii2 = rb2.effective_inv_principal_inertia();

        Self {
            position1: rb1.active_set_offset,
            position2: rb2.active_set_offset,
            im1: rb1.effective_inv_mass(),
            ii1,
            im2: rb2.effective_inv_mass(),
            ii2,
            local_com1: rb1.mprops.local_com,
            local_com2: rb2.mprops.local_com,
            local_anchor1: joint.local_anchor1,
            local_anchor2: joint.local_anchor2,
            reference_angle: joint.reference_angle,
            limits_enabled: joint.limits_enabled,
            lower_limit: joint.lower_limit,
            upper_limit: joint.upper_limit,
            axial_mass: utils::inv(ii1 + ii2),
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [SolverPosition]) -> bool {
        let mut pos1 = positions[self.position1];
        let mut pos2 = positions[self.position2];
        let mut angular_error = 0.0;

        if self.limits_enabled {
            let angle = pos1.rot.angle_to(&pos2.rot) - self.reference_angle;
            let mut c = 0.0;

            if (self.upper_limit - self.lower_limit).abs() < 2.0 * params.allowed_angular_error {
                c = (angle - self.lower_limit)
                    .clamp(-params.max_angular_correction, params.max_angular_correction);
            } else if angle <= self.lower_limit {
                c = (angle - self.lower_limit + params.allowed_angular_error)
                    .clamp(-params.max_angular_correction, 0.0);
            } else if angle >= self.upper_limit {
                c = (angle - self.upper_limit - params.allowed_angular_error)
                    .clamp(0.0, params.max_angular_correction);
            }

            let impulse = -self.axial_mass * c;
            pos1.rot = Rotation::new(-self.ii1 * impulse) * pos1.rot;
            pos2.rot = Rotation::new(self.ii2 * impulse) * pos2.rot;
            angular_error = c.abs();
        }

        // Point-to-point correction.
        let r1 = pos1.lever_arm(&self.local_anchor1, &self.local_com1);
        let r2 = pos2.lever_arm(&self.local_anchor2, &self.local_com2);
        let c = (pos2.com + r2) - (pos1.com + r1);
        let position_error = c.norm();

        let k = SdpMatrix2::new(
            self.im1 + self.im2 + self.ii1 * r1.y * r1.y + self.ii2 * r2.y * r2.y,
            -self.ii1 * r1.x * r1.y - self.ii2 * r2.x * r2.y,
            self.im1 + self.im2 + self.ii1 * r1.x * r1.x + self.ii2 * r2.x * r2.x,
        );
        let impulse = -(k.inverse() * c);

        pos1.com -= impulse * self.im1;
        pos1.rot = Rotation::new(-self.ii1 * r1.gcross(impulse)) * pos1.rot;
        pos2.com += impulse * self.im2;
        pos2.rot = Rotation::new(self.ii2 * r2.gcross(impulse)) * pos2.rot;

        positions[self.position1] = pos1;
        positions[self.position2] = pos2;

        position_error <= params.allowed_linear_error
            && angular_error <= params.allowed_angular_error
    }
}
