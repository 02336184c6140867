use crate::dynamics::solver::{Jacobian, SolverPosition, SolverVel};
use crate::dynamics::{GearAxis, GearJoint, IntegrationParameters, JointHandle, JointSet, RigidBody};
use crate::math::{Point, Real, Rotation};
use crate::utils::{self, CrossProduct};

/// The snapshot of one body taken by the gear constraint.
#[derive(Copy, Clone, Debug)]
struct GearBody {
    solver_id: usize,
    im: Real,
    ii: Real,
}

impl GearBody {
    fn from_body(rb: &RigidBody) -> Self {
        Self {
            solver_id: rb.active_set_offset,
            im: rb.effective_inv_mass(),
            ii: rb.effective_inv_principal_inertia(),
        }
    }
}

/// Builds the Jacobian row of one coupled degree of freedom.
///
/// `pos_body` and `pos_ground` are the (com, rotation) pairs of the driven
/// and ground bodies. Returns the row scaled by `scale` along with its
/// contribution to the constraint's inverse effective mass.
fn gear_jacobian(
    axis: &GearAxis,
    scale: Real,
    pos_body: &SolverPosition,
    local_com_body: &Point<Real>,
    pos_ground: &SolverPosition,
    local_com_ground: &Point<Real>,
    body: &GearBody,
    ground: &GearBody,
) -> (Jacobian, Real) {
    let mut jac = Jacobian::zero();

    match axis {
        GearAxis::Revolute { .. } => {
            jac.set(na::zero(), scale, na::zero(), -scale);
            (jac, scale * scale * (body.ii + ground.ii))
        }
        GearAxis::Prismatic {
            local_anchor_ground,
            local_anchor_body,
            local_axis,
        } => {
            let u = pos_ground.rot * local_axis;
            let r_ground = pos_ground.lever_arm(local_anchor_ground, local_com_ground);
            let r_body = pos_body.lever_arm(local_anchor_body, local_com_body);
            let jw_ground = r_ground.gcross(u);
            let jw_body = r_body.gcross(u);

            jac.set(u * scale, scale * jw_body, -u * scale, -scale * jw_ground);
            (
                jac,
                scale * scale * (body.im + ground.im)
                    + body.ii * (scale * jw_body) * (scale * jw_body)
                    + ground.ii * (scale * jw_ground) * (scale * jw_ground),
            )
        }
    }
}

#[derive(Debug)]
pub(crate) struct GearVelocityConstraint {
    joint_id: JointHandle,
    body_a: GearBody,
    body_b: GearBody,
    body_c: GearBody,
    body_d: GearBody,
    jac_ac: Jacobian,
    jac_bd: Jacobian,
    mass: Real,
    impulse: Real,
}

impl GearVelocityConstraint {
    pub fn from_joint(
        params: &IntegrationParameters,
        joint_id: JointHandle,
        joint: &GearJoint,
        rb_a: &RigidBody,
        rb_b: &RigidBody,
        rb_c: &RigidBody,
        rb_d: &RigidBody,
    ) -> Self {
        let body_a = GearBody::from_body(rb_a);
        let body_b = GearBody::from_body(rb_b);
        let body_c = GearBody::from_body(rb_c);
        let body_d = GearBody::from_body(rb_d);

        let pos_a = SolverPosition::from_isometry(rb_a.position(), &rb_a.mprops.local_com);
        let pos_b = SolverPosition::from_isometry(rb_b.position(), &rb_b.mprops.local_com);
        let pos_c = SolverPosition::from_isometry(rb_c.position(), &rb_c.mprops.local_com);
        let pos_d = SolverPosition::from_isometry(rb_d.position(), &rb_d.mprops.local_com);

        let (jac_ac, mass_ac) = gear_jacobian(
            &joint.axis1,
            1.0,
            &pos_a,
            &rb_a.mprops.local_com,
            &pos_c,
            &rb_c.mprops.local_com,
            &body_a,
            &body_c,
        );
        let (jac_bd, mass_bd) = gear_jacobian(
            &joint.axis2,
            joint.ratio,
            &pos_b,
            &rb_b.mprops.local_com,
            &pos_d,
            &rb_d.mprops.local_com,
            &body_b,
            &body_d,
        );

        Self {
            joint_id,
            body_a,
            body_b,
            body_c,
            body_d,
            jac_ac,
            jac_bd,
            mass: utils::inv(mass_ac + mass_bd),
            impulse: joint.impulse * params.warmstart_coeff,
        }
    }

    fn apply_impulse(&self, impulse: Real, solver_vels: &mut [SolverVel]) {
        solver_vels[self.body_a.solver_id].linear += self.jac_ac.linear1 * (self.body_a.im * impulse);
        solver_vels[self.body_a.solver_id].angular += self.body_a.ii * impulse * self.jac_ac.angular1;
        solver_vels[self.body_b.solver_id].linear += self.jac_bd.linear1 * (self.body_b.im * impulse);
        solver_vels[self.body_b.solver_id].angular += self.body_b.ii * impulse * self.jac_bd.angular1;
        solver_vels[self.body_c.solver_id].linear += self.jac_ac.linear2 * (self.body_c.im * impulse);
        solver_vels[self.body_c.solver_id].angular += self.body_c.ii * impulse * self.jac_ac.angular2;
        solver_vels[self.body_d.solver_id].linear += self.jac_bd.linear2 * (self.body_d.im * impulse);
        solver_vels[self.body_d.solver_id].angular += self.body_d.ii * impulse * self.jac_bd.angular2;
    }

    pub fn warmstart(&self, solver_vels: &mut [SolverVel]) {
        self.apply_impulse(self.impulse, solver_vels);
    }

    pub fn solve(&mut self, solver_vels: &mut [SolverVel]) {
        let vel_a = solver_vels[self.body_a.solver_id];
        let vel_b = solver_vels[self.body_b.solver_id];
        let vel_c = solver_vels[self.body_c.solver_id];
        let vel_d = solver_vels[self.body_d.solver_id];

        let cdot = self
            .jac_ac
            .compute(vel_a.linear, vel_a.angular, vel_c.linear, vel_c.angular)
            + self
                .jac_bd
                .compute(vel_b.linear, vel_b.angular, vel_d.linear, vel_d.angular);

        let impulse = -self.mass * cdot;
        self.impulse += impulse;
        self.apply_impulse(impulse, solver_vels);
    }

    pub fn writeback_impulses(&self, joints: &mut JointSet) {
        if let Some(joint) = joints
            .get_mut(self.joint_id)
            .and_then(|j| j.params.as_gear_mut())
        {
            joint.impulse = self.impulse;
            joint.jac_ac = self.jac_ac;
            joint.jac_bd = self.jac_bd;
        }
    }
}

#[derive(Debug)]
pub(crate) struct GearPositionConstraint {
    body_a: GearBody,
    body_b: GearBody,
    body_c: GearBody,
    body_d: GearBody,
    local_com_a: Point<Real>,
    local_com_b: Point<Real>,
    local_com_c: Point<Real>,
    local_com_d: Point<Real>,
    axis1: GearAxis,
    axis2: GearAxis,
    ratio: Real,
    constant: Real,
}

impl GearPositionConstraint {
    pub fn from_joint(
        joint: &GearJoint,
        rb_a: &RigidBody,
        rb_b: &RigidBody,
        rb_c: &RigidBody,
        rb_d: &RigidBody,
    ) -> Self {
        Self {
            body_a: GearBody::from_body(rb_a),
            body_b: GearBody::from_body(rb_b),
            body_c: GearBody::from_body(rb_c),
            body_d: GearBody::from_body(rb_d),
            local_com_a: rb_a.mprops.local_com,
            local_com_b: rb_b.mprops.local_com,
            local_com_c: rb_c.mprops.local_com,
            local_com_d: rb_d.mprops.local_com,
            axis1: joint.axis1,
            axis2: joint.axis2,
            ratio: joint.ratio,
            constant: joint.constant,
        }
    }

    pub fn solve(&self, params: &IntegrationParameters, positions: &mut [SolverPosition]) -> bool {
        let pos_a = positions[self.body_a.solver_id];
        let pos_b = positions[self.body_b.solver_id];
        let pos_c = positions[self.body_c.solver_id];
        let pos_d = positions[self.body_d.solver_id];

        let (jac_ac, mass_ac) = gear_jacobian(
            &self.axis1,
            1.0,
            &pos_a,
            &self.local_com_a,
            &pos_c,
            &self.local_com_c,
            &self.body_a,
            &self.body_c,
        );
        let (jac_bd, mass_bd) = gear_jacobian(
            &self.axis2,
            self.ratio,
            &pos_b,
            &self.local_com_b,
            &pos_d,
            &self.local_com_d,
            &self.body_b,
            &self.body_d,
        );

        let coord1 = self.axis1.coordinate(
            &pos_c.isometry(&self.local_com_c),
            &pos_a.isometry(&self.local_com_a),
        );
        let coord2 = self.axis2.coordinate(
            &pos_d.isometry(&self.local_com_d),
            &pos_b.isometry(&self.local_com_b),
        );

        let c = (coord1 + self.ratio * coord2) - self.constant;
        let impulse = -utils::inv(mass_ac + mass_bd) * c;

        let mut pos_a = pos_a;
        let mut pos_b = pos_b;
        let mut pos_c = pos_c;
        let mut pos_d = pos_d;

        pos_a.com += jac_ac.linear1 * (self.body_a.im * impulse);
        pos_a.rot = Rotation::new(self.body_a.ii * impulse * jac_ac.angular1) * pos_a.rot;
        pos_b.com += jac_bd.linear1 * (self.body_b.im * impulse);
        pos_b.rot = Rotation::new(self.body_b.ii * impulse * jac_bd.angular1) * pos_b.rot;
        pos_c.com += jac_ac.linear2 * (self.body_c.im * impulse);
        pos_c.rot = Rotation::new(self.body_c.ii * impulse * jac_ac.angular2) * pos_c.rot;
        pos_d.com += jac_bd.linear2 * (self.body_d.im * impulse);
        pos_d.rot = Rotation::new(self.body_d.ii * impulse * jac_bd.angular2) * pos_d.rot;

        positions[self.body_a.solver_id] = pos_a;
        positions[self.body_b.solver_id] = pos_b;
        positions[self.body_c.solver_id] = pos_c;
        positions[self.body_d.solver_id] = pos_d;

        c.abs() < params.allowed_linear_error
    }
}
