use crate::dynamics::JointHandle;
use crate::math::{Isometry, Point, Real, Rotation, Translation, Vector};
use crate::utils::CrossProduct;

/// The status of a body, governing the way it is affected by external forces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum RigidBodyType {
    /// A `RigidBodyType::Dynamic` body can be affected by all external forces.
    Dynamic,
    /// A `RigidBodyType::Static` body cannot be affected by external forces.
    ///
    /// Joint math treats a static body as having zero inverse mass and
    /// inverse inertia: no constraint may ever alter its velocity or
    /// position.
    Static,
}

/// The position of this rigid body as well as its trial position at the
/// end of the step being solved.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyPosition {
    /// The world-space position of the rigid body.
    pub position: Isometry<Real>,
    /// The next position of the rigid body.
    ///
    /// At the beginning of the timestep, and outside of a timestep, this
    /// is equal to `position`. During the position-solve phase it holds
    /// the trial position being corrected.
    pub next_position: Isometry<Real>,
}

impl Default for RigidBodyPosition {
    fn default() -> Self {
        Self::from(Isometry::identity())
    }
}

impl From<Isometry<Real>> for RigidBodyPosition {
    fn from(position: Isometry<Real>) -> Self {
        Self {
            position,
            next_position: position,
        }
    }
}

/// The velocities of this rigid body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyVelocity {
    /// The linear velocity of the rigid body.
    pub linvel: Vector<Real>,
    /// The angular velocity of the rigid body.
    pub angvel: Real,
}

impl Default for RigidBodyVelocity {
    fn default() -> Self {
        Self::zero()
    }
}

impl RigidBodyVelocity {
    /// Velocities set to zero.
    pub fn zero() -> Self {
        Self {
            linvel: na::zero(),
            angvel: 0.0,
        }
    }

    /// Creates a new set of velocities.
    pub fn new(linvel: Vector<Real>, angvel: Real) -> Self {
        Self { linvel, angvel }
    }

    /// The velocity of the given world-space point on a body with these
    /// velocities, rotating about the world-space center of mass `com`.
    pub fn velocity_at_point(&self, point: &Point<Real>, com: &Point<Real>) -> Vector<Real> {
        self.linvel + self.angvel.gcross(point - com)
    }

    /// Integrates these velocities for a duration `dt`, starting at
    /// `init_pos`, rotating the body about its center of mass.
    #[must_use]
    pub fn integrate(
        &self,
        dt: Real,
        init_pos: &Isometry<Real>,
        local_com: &Point<Real>,
    ) -> Isometry<Real> {
        let com = init_pos * local_com;
        let shift = Translation::from(com.coords);
        Translation::from(self.linvel * dt)
            * shift
            * Rotation::new(self.angvel * dt)
            * shift.inverse()
            * init_pos
    }

    /// Are all the components of these velocities finite?
    pub fn is_finite(&self) -> bool {
        self.linvel.x.is_finite() && self.linvel.y.is_finite() && self.angvel.is_finite()
    }
}

/// The mass properties of this rigid body.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyMassProps {
    /// The center of mass of the rigid body, expressed in its local frame.
    pub local_com: Point<Real>,
    /// The inverse of the mass of the rigid body.
    pub inv_mass: Real,
    /// The inverse of the angular inertia of the rigid body.
    pub inv_principal_inertia: Real,
}

impl Default for RigidBodyMassProps {
    fn default() -> Self {
        Self {
            local_com: Point::origin(),
            inv_mass: 1.0,
            inv_principal_inertia: 1.0,
        }
    }
}

/// A rigid body.
///
/// To create a new rigid body, use the `RigidBodyBuilder` structure.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBody {
    /// The position (and trial position) of this rigid body.
    pub pos: RigidBodyPosition,
    /// The velocities of this rigid body.
    pub vels: RigidBodyVelocity,
    /// The mass properties of this rigid body.
    pub mprops: RigidBodyMassProps,
    /// The status of this rigid body.
    body_type: RigidBodyType,
    /// Handles of all the joints attached to this body.
    pub(crate) attached_joints: Vec<JointHandle>,
    /// The index of this body inside the island currently being solved.
    pub(crate) active_set_offset: usize,
    /// The id of the island this body was last assigned to by the solver.
    pub(crate) active_island_id: usize,
    /// User-defined data associated with this rigid body.
    pub user_data: u128,
}

impl RigidBody {
    fn new(body_type: RigidBodyType) -> Self {
        Self {
            pos: RigidBodyPosition::default(),
            vels: RigidBodyVelocity::zero(),
            mprops: RigidBodyMassProps::default(),
            body_type,
            attached_joints: Vec::new(),
            active_set_offset: crate::INVALID_U32 as usize,
            active_island_id: crate::INVALID_U32 as usize,
            user_data: 0,
        }
    }

    /// The status of this rigid body.
    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Is this rigid body dynamic?
    pub fn is_dynamic(&self) -> bool {
        self.body_type == RigidBodyType::Dynamic
    }

    /// Is this rigid body static?
    pub fn is_static(&self) -> bool {
        self.body_type == RigidBodyType::Static
    }

    /// The world-space position of this rigid body.
    pub fn position(&self) -> &Isometry<Real> {
        &self.pos.position
    }

    /// Sets the world-space position of this rigid body, resetting its
    /// trial position as well.
    pub fn set_position(&mut self, position: Isometry<Real>) {
        self.pos = RigidBodyPosition::from(position);
    }

    /// The world-space translation of this rigid body.
    pub fn translation(&self) -> Vector<Real> {
        self.pos.position.translation.vector
    }

    /// The world-space orientation of this rigid body.
    pub fn rotation(&self) -> &Rotation<Real> {
        &self.pos.position.rotation
    }

    /// The linear velocity of this rigid body.
    pub fn linvel(&self) -> Vector<Real> {
        self.vels.linvel
    }

    /// The angular velocity of this rigid body.
    pub fn angvel(&self) -> Real {
        self.vels.angvel
    }

    /// Sets the linear velocity of this rigid body.
    pub fn set_linvel(&mut self, linvel: Vector<Real>) {
        self.vels.linvel = linvel;
    }

    /// Sets the angular velocity of this rigid body.
    pub fn set_angvel(&mut self, angvel: Real) {
        self.vels.angvel = angvel;
    }

    /// The world-space center of mass of this rigid body.
    pub fn world_com(&self) -> Point<Real> {
        self.pos.position * self.mprops.local_com
    }

    /// The inverse mass actually seen by the constraint solver.
    ///
    /// This is zero for any non-dynamic body, whatever its mass properties.
    pub fn effective_inv_mass(&self) -> Real {
        if self.is_dynamic() {
            self.mprops.inv_mass
        } else {
            0.0
        }
    }

    /// The inverse angular inertia actually seen by the constraint solver.
    ///
    /// This is zero for any non-dynamic body, whatever its mass properties.
    pub fn effective_inv_principal_inertia(&self) -> Real {
        if self.is_dynamic() {
            self.mprops.inv_principal_inertia
        } else {
            0.0
        }
    }

    /// The handles of all the joints attached to this body, in attachment
    /// order.
    pub fn attached_joints(&self) -> &[JointHandle] {
        &self.attached_joints
    }
}

/// A builder for rigid bodies.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodyBuilder {
    position: Isometry<Real>,
    linvel: Vector<Real>,
    angvel: Real,
    local_com: Point<Real>,
    inv_mass: Real,
    inv_principal_inertia: Real,
    body_type: RigidBodyType,
    user_data: u128,
}

impl RigidBodyBuilder {
    /// Initializes the builder of a new rigid body with the given status.
    pub fn new(body_type: RigidBodyType) -> Self {
        Self {
            position: Isometry::identity(),
            linvel: na::zero(),
            angvel: 0.0,
            local_com: Point::origin(),
            inv_mass: 1.0,
            inv_principal_inertia: 1.0,
            body_type,
            user_data: 0,
        }
    }

    /// Initializes the builder of a new dynamic rigid body.
    pub fn dynamic() -> Self {
        Self::new(RigidBodyType::Dynamic)
    }

    /// Initializes the builder of a new static rigid body.
    pub fn fixed() -> Self {
        Self::new(RigidBodyType::Static)
    }

    /// Sets the initial translation of the rigid body to be created.
    pub fn translation(mut self, translation: Vector<Real>) -> Self {
        self.position.translation.vector = translation;
        self
    }

    /// Sets the initial orientation of the rigid body to be created.
    pub fn rotation(mut self, angle: Real) -> Self {
        self.position.rotation = Rotation::new(angle);
        self
    }

    /// Sets the initial position of the rigid body to be created.
    pub fn position(mut self, position: Isometry<Real>) -> Self {
        self.position = position;
        self
    }

    /// Sets the initial linear velocity of the rigid body to be created.
    pub fn linvel(mut self, linvel: Vector<Real>) -> Self {
        self.linvel = linvel;
        self
    }

    /// Sets the initial angular velocity of the rigid body to be created.
    pub fn angvel(mut self, angvel: Real) -> Self {
        self.angvel = angvel;
        self
    }

    /// Sets the mass of the rigid body to be created.
    ///
    /// A zero mass is interpreted as infinite (zero inverse mass).
    pub fn mass(mut self, mass: Real) -> Self {
        self.inv_mass = crate::utils::inv(mass);
        self
    }

    /// Sets the angular inertia of the rigid body to be created.
    ///
    /// A zero inertia is interpreted as infinite (zero inverse inertia).
    pub fn principal_inertia(mut self, inertia: Real) -> Self {
        self.inv_principal_inertia = crate::utils::inv(inertia);
        self
    }

    /// Sets the local center of mass of the rigid body to be created.
    pub fn local_com(mut self, local_com: Point<Real>) -> Self {
        self.local_com = local_com;
        self
    }

    /// Sets the user data of the rigid body to be created.
    pub fn user_data(mut self, data: u128) -> Self {
        self.user_data = data;
        self
    }

    /// Builds the rigid body.
    pub fn build(&self) -> RigidBody {
        let mut rb = RigidBody::new(self.body_type);
        rb.set_position(self.position);
        rb.vels = RigidBodyVelocity::new(self.linvel, self.angvel);
        rb.mprops = RigidBodyMassProps {
            local_com: self.local_com,
            inv_mass: self.inv_mass,
            inv_principal_inertia: self.inv_principal_inertia,
        };
        rb.user_data = self.user_data;
        rb
    }
}

#[cfg(test)]
mod test {
    use super::{RigidBodyBuilder, RigidBodyVelocity};
    use crate::math::{Point, Vector};
    use approx::assert_relative_eq;

    #[test]
    fn static_body_has_zero_effective_mass() {
        let rb = RigidBodyBuilder::fixed().mass(10.0).principal_inertia(5.0).build();
        assert_eq!(rb.effective_inv_mass(), 0.0);
        assert_eq!(rb.effective_inv_principal_inertia(), 0.0);
    }

    #[test]
    fn integration_rotates_about_center_of_mass() {
        let rb = RigidBodyBuilder::dynamic()
            .local_com(Point::new(1.0, 0.0))
            .angvel(std::f32::consts::PI)
            .build();
        let new_pos = rb.vels.integrate(1.0, rb.position(), &rb.mprops.local_com);
        // A half-turn about the com at (1, 0) moves the body origin to (2, 0).
        assert_relative_eq!(new_pos.translation.vector, Vector::new(2.0, 0.0), epsilon = 1.0e-5);
        // The com itself does not move under pure rotation.
        let new_com = new_pos * Point::new(1.0, 0.0);
        assert_relative_eq!(new_com, Point::new(1.0, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn velocity_at_point() {
        let vels = RigidBodyVelocity::new(Vector::new(1.0, 0.0), 2.0);
        let v = vels.velocity_at_point(&Point::new(0.0, 1.0), &Point::origin());
        assert_relative_eq!(v, Vector::new(-1.0, 0.0), epsilon = 1.0e-6);
    }
}
