use crate::dynamics::solver::{SolverPosition, SolverVel};
use crate::dynamics::{IntegrationParameters, JointHandle, JointSet, RigidBody, WheelJoint};
use crate::math::{Point, Real, Rotation, Vector};
use crate::utils::{self, CrossProduct};

#[derive(Debug)]
pub(crate) struct WheelVelocityConstraint {
    joint_id: JointHandle,
    solver_vel1: usize,
    solver_vel2: usize,
    im1: Real,
    ii1: Real,
    im2: Real,
    ii2: Real,
    ax: Vector<Real>,
    ay: Vector<Real>,
    sax: Real,
    sbx: Real,
    say: Real,
    sby: Real,
    mass: Real,
    spring_mass: Real,
    motor_mass: Real,
    gamma: Real,
    bias: Real,
    motor_enabled: bool,
    motor_speed: Real,
    max_motor_impulse: Real,
    impulse: Real,
    spring_impulse: Real,
    motor_impulse: Real,
}

impl WheelVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointHandle,
        joint: &WheelJoint,
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

        // Rigid row, perpendicular to the suspension axis.
        let ay = rot1 * joint.local_perp1();
        let say = (d + r1).gcross(ay);
        let sby = r2.gcross(ay);
        let mass = utils::inv(im1 + im2 + ii1 * say * say + ii2 * sby * sby);

        // Soft row, along the suspension axis.
        let ax = rot1 * joint.local_axis1;
        let sax = (d + r1).gcross(ax);
        let sbx = r2.gcross(ax);

        let mut spring_mass = 0.0;
        let mut gamma = 0.0;
        let mut bias = 0.0;
        let mut spring_impulse = 0.0;

        if joint.frequency > 0.0 {
            let inv_spring_mass = im1 + im2 + ii1 * sax * sax + ii2 * sbx * sbx;
            let m = utils::inv(inv_spring_mass);
            let c = d.dot(&ax);
            let omega = 2.0 * std::f32::consts::PI * joint.frequency;
            let damp = 2.0 * m * joint.damping_ratio * omega;
            let k = m * omega * omega;
            let h = params.dt;

            gamma = utils::inv(h * (damp + h * k));
            bias = c * h * k * gamma;
            spring_mass = utils::inv(inv_spring_mass + gamma);
            spring_impulse = joint.spring_impulse * params.warmstart_coeff;
        }

        let motor_impulse = if joint.motor_enabled {
            joint.motor_impulse * params.warmstart_coeff
        } else {
            0.0
        };

        Self {
            joint_id,
            solver_vel1: rb1.active_set_offset,
            solver_vel2: rb2.active_set_offset,
            im1,
            ii1,
            im2,
            ii2,
            ax,
            ay,
            sax,
            sbx,
            say,
            sby,
            mass,
            spring_mass,
            motor_mass: utils::inv(ii1 + ii2),
            gamma,
            bias,
            motor_enabled: joint.motor_enabled,
            motor_speed: joint.motor_speed,
            max_motor_impulse: joint.max_motor_torque * params.dt,
            impulse: joint.impulse * params.warmstart_coeff,
            spring_impulse,
            motor_impulse,
        }
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        let p = self.ay * self.impulse + self.ax * self.spring_impulse;
        let l1 = self.impulse * self.say + self.spring_impulse * self.sax + self.motor_impulse;
        let l2 = self.impulse * self.sby + self.spring_impulse * self.sbx + self.motor_impulse;

        solver_vels[self.solver_vel1].linear -= p * self.im1;
        solver_vels[self.solver_vel1].angular -= self.ii1 * l1;
        solver_vels[self.solver_vel2].linear += p * self.im2;
        solver_vels[self.solver_vel2].angular += self.ii2 * l2;
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        // Suspension spring.
        {
            let vel1 = solver_vels[self.solver_vel1];
            let vel2 = solver_vels[self.solver_vel2];
            let cdot = self.ax.dot(&(vel2.linear - vel1.linear)) + self.sbx * vel2.angular
                - self.sax * vel1.angular;
            let impulse =
                -self.spring_mass * (cdot + self.bias + self.gamma * self.spring_impulse);
            self.spring_impulse += impulse;

            let p = self.ax * impulse;
            solver_vels[self.solver_vel1].linear -= p * self.im1;
            solver_vels[self.solver_vel1].angular -= self.ii1 * impulse * self.sax;
            solver_vels[self.solver_vel2].linear += p * self.im2;
            solver_vels[self.solver_vel2].angular += self.ii2 * impulse * self.sbx;
        }

        // Rotation motor.
        if self.motor_enabled {
            let w1 = solver_vels[self.solver_vel1].angular;
            let w2 = solver_vels[self.solver_vel2].angular;
            let cdot = w2 - w1 - self.motor_speed;
            let impulse = -self.motor_mass * cdot;
            let old_impulse = self.motor_impulse;
            self.motor_impulse = (old_impulse + impulse)
                .clamp(-self.max_motor_impulse, self.max_motor_impulse);
            let impulse = self.motor_impulse - old_impulse;

            solver_vels[self.solver_vel1].angular -= self.ii1 * impulse;
            solver_vels[self.solver_vel2].angular += self.ii2 * impulse;
        }

        // Rigid perpendicular row.
        {
            let vel1 = solver_vels[self.solver_vel1];
            let vel2 = solver_vels[self.solver_vel2];
            let cdot = self.ay.dot(&(vel2.linear - vel1.linear)) + self.sby * vel2.angular
                - self.say * vel1.angular;
            let impulse = -self.mass * cdot;
            self.impulse += impulse;

            let p = self.ay * impulse;
            solver_vels[self.solver_vel1].linear -= p * self.im1;
            solver_vels[self.solver_vel1].angular -= self.ii1 * impulse * self.say;
            solver_vels[self.solver_vel2].linear += p * self.im2;
            solver_vels[self.solver_vel2].angular += self.ii2 * impulse * self.sby;
        }
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        if let Some(joint) = joints
            .get_mut(self.joint_id)
            .and_then(|j| j.params.as_wheel_mut())
        {
            joint.impulse = self.impulse;
            joint.spring_impulse = self.spring_impulse;
            joint.motor_impulse = self.motor_impulse;
            joint.ax = self.ax;
            joint.ay = self.ay;
        }
    }
}

#[derive(Debug)]
pub(crate) struct WheelPositionConstraint {
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
    local_perp1: Vector<Real>,
}

impl WheelPositionConstraint {
    pub fn from_joint(joint: &WheelJoint, rb1: &RigidBody, rb2: &RigidBody) -> Self {
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
            local_perp1: joint.local_perp1(),
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [SolverPosition]) -> bool {
        let mut pos1 = positions[self.position1];
        let mut pos2 = positions[self.position2];

        let r1 = pos1.lever_arm(&self.local_anchor1, &self.local_com1);
        let r2 = pos2.lever_arm(&self.local_anchor2, &self.local_com2);
        let d = (pos2.com + r2) - (pos1.com + r1);

        let ay = pos1.rot * self.local_perp1;
        let say = (d + r1).gcross(ay);
        let sby = r2.gcross(ay);

        let c = d.dot(&ay);
        let k = self.im1 + self.im2 + self.ii1 * say * say + self.ii2 * sby * sby;
        let impulse = -utils::inv(k) * c;

        let p = ay * impulse;
        pos1.com -= p * self.im1;
        pos1.rot = Rotation::new(-self.ii1 * impulse * say) * pos1.rot;
        pos2.com += p * self.im2;
        pos2.rot = Rotation::new(self.ii2 * impulse * sby) * pos2.rot;

        positions[self.position1] = pos1;
        positions[self.position2] = pos2;

        c.abs() <= params.allowed_linear_error
    }
}
