use crate::data::arena::Arena;
use crate::dynamics::{JointSet, RigidBody};
use std::ops;

/// The unique handle of a rigid body added to a `RigidBodySet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct RigidBodyHandle(pub(crate) crate::data::arena::Index);

impl RigidBodyHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs a handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(crate::data::arena::Index::from_raw_parts(id, generation))
    }

    /// An always-invalid rigid-body handle.
    pub fn invalid() -> Self {
        Self(crate::data::arena::Index::from_raw_parts(
            crate::INVALID_U32,
            crate::INVALID_U32,
        ))
    }
}

/// A set of rigid bodies that can be handled by a constraint solver.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RigidBodySet {
    pub(crate) bodies: Arena<RigidBody>,
}

impl RigidBodySet {
    /// Creates a new empty set of rigid bodies.
    pub fn new() -> Self {
        Self {
            bodies: Arena::new(),
        }
    }

    /// The number of rigid bodies in this set.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Is the given body handle valid?
    pub fn contains(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Inserts a rigid body into this set and retrieves its handle.
    pub fn insert(&mut self, rb: RigidBody) -> RigidBodyHandle {
        RigidBodyHandle(self.bodies.insert(rb))
    }

    /// Removes a rigid body from this set.
    ///
    /// Every joint attached to the removed body is removed as well: a
    /// joint is never allowed to outlive either of its attached bodies.
    pub fn remove(&mut self, handle: RigidBodyHandle, joints: &mut JointSet) -> Option<RigidBody> {
        if !self.bodies.contains(handle.0) {
            return None;
        }

        joints.remove_attached_joints(self, handle);
        self.bodies.remove(handle.0)
    }

    /// Gets the rigid body with the given handle.
    pub fn get(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle.0)
    }

    /// Gets a mutable reference to the rigid body with the given handle.
    pub fn get_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle.0)
    }

    /// Iterates through all the rigid bodies of this set.
    pub fn iter(&self) -> impl Iterator<Item = (RigidBodyHandle, &RigidBody)> {
        self.bodies.iter().map(|(h, rb)| (RigidBodyHandle(h), rb))
    }

    /// Iterates mutably through all the rigid bodies of this set.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RigidBodyHandle, &mut RigidBody)> {
        self.bodies
            .iter_mut()
            .map(|(h, rb)| (RigidBodyHandle(h), rb))
    }
}

impl ops::Index<RigidBodyHandle> for RigidBodySet {
    type Output = RigidBody;

    fn index(&self, index: RigidBodyHandle) -> &RigidBody {
        &self.bodies[index.0]
    }
}

impl ops::IndexMut<RigidBodyHandle> for RigidBodySet {
    fn index_mut(&mut self, index: RigidBodyHandle) -> &mut RigidBody {
        &mut self.bodies[index.0]
    }
}
