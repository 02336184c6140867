use crate::data::arena::Arena;
use crate::dynamics::{GearJoint, Joint, JointDef, RigidBodyHandle, RigidBodySet};
use std::ops;

/// The unique handle of a joint added to a `JointSet`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(transparent)]
pub struct JointHandle(pub(crate) crate::data::arena::Index);

impl JointHandle {
    /// Converts this handle into its (index, generation) components.
    pub fn into_raw_parts(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }

    /// Reconstructs a handle from its (index, generation) components.
    pub fn from_raw_parts(id: u32, generation: u32) -> Self {
        Self(crate::data::arena::Index::from_raw_parts(id, generation))
    }

    /// An always-invalid joint handle.
    pub fn invalid() -> Self {
        Self(crate::data::arena::Index::from_raw_parts(
            crate::INVALID_U32,
            crate::INVALID_U32,
        ))
    }
}

/// A set of joints that can be handled by a constraint solver.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct JointSet {
    joints: Arena<Joint>,
}

impl JointSet {
    /// Creates a new empty set of joints.
    pub fn new() -> Self {
        Self {
            joints: Arena::new(),
        }
    }

    /// The number of joints in this set.
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// Is this set empty?
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Is the given joint handle valid?
    pub fn contains(&self, handle: JointHandle) -> bool {
        self.joints.contains(handle.0)
    }

    /// Gets the joint with the given handle.
    pub fn get(&self, handle: JointHandle) -> Option<&Joint> {
        self.joints.get(handle.0)
    }

    /// Gets a mutable reference to the joint with the given handle.
    pub fn get_mut(&mut self, handle: JointHandle) -> Option<&mut Joint> {
        self.joints.get_mut(handle.0)
    }

    /// Iterates through all the joints of this set.
    pub fn iter(&self) -> impl Iterator<Item = (JointHandle, &Joint)> {
        self.joints.iter().map(|(h, j)| (JointHandle(h), j))
    }

    /// Iterates mutably through all the joints of this set.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (JointHandle, &mut Joint)> {
        self.joints.iter_mut().map(|(h, j)| (JointHandle(h), j))
    }

    /// Inserts the joint described by `def` into this set and retrieves
    /// its handle.
    ///
    /// Panics if either body handle of the definition is invalid, or if
    /// both refer to the same body.
    pub fn insert(&mut self, bodies: &mut RigidBodySet, def: JointDef) -> JointHandle {
        assert!(
            def.body1 != def.body2,
            "Attempt to attach both ends of a joint to the same body."
        );
        // Both handles are validated up front so a panic cannot leave a
        // half-linked joint behind.
        assert!(
            bodies.contains(def.body1) && bodies.contains(def.body2),
            "Attempt to attach a joint to a non-existing body."
        );

        let joint = Joint {
            body1: def.body1,
            body2: def.body2,
            collide_connected: def.collide_connected,
            user_data: def.user_data,
            handle: JointHandle::invalid(),
            is_in_island: false,
            params: def.params,
        };

        let handle = JointHandle(self.joints.insert(joint));
        self.joints[handle.0].handle = handle;
        bodies[def.body1].attached_joints.push(handle);
        bodies[def.body2].attached_joints.push(handle);

        handle
    }

    /// Inserts a gear joint coupling the degrees of freedom of two
    /// existing revolute or prismatic joints, and retrieves its handle.
    ///
    /// The gear is attached to the second body of each coupled joint. A
    /// negative ratio reverses the coupling direction. Panics if either
    /// coupled joint does not exist, is not a revolute or prismatic
    /// joint, or if the ratio is zero.
    pub fn insert_gear(
        &mut self,
        bodies: &mut RigidBodySet,
        joint1: JointHandle,
        joint2: JointHandle,
        ratio: crate::math::Real,
    ) -> JointHandle {
        let (gear, body1, body2) = GearJoint::from_joints(bodies, self, joint1, joint2, ratio);
        self.insert(bodies, JointDef::new(body1, body2, gear))
    }

    /// Removes a joint from this set, unlinking it from both attached
    /// bodies.
    pub fn remove(&mut self, handle: JointHandle, bodies: &mut RigidBodySet) -> Option<Joint> {
        let joint = self.joints.remove(handle.0)?;

        for body in [joint.body1, joint.body2] {
            if let Some(rb) = bodies.get_mut(body) {
                rb.attached_joints.retain(|j| *j != handle);
            }
        }

        // A gear joint holds on to the joints it couples. Removing one of
        // them silently invalidates the gear, which is worth a trace.
        for (_, other) in self.joints.iter() {
            if let Some(gear) = other.params.as_gear() {
                if gear.joint1 == handle || gear.joint2 == handle {
                    log::warn!(
                        "Removed a joint still coupled by the gear joint {:?}.",
                        other.handle
                    );
                }
            }
        }

        Some(joint)
    }

    /// Removes every joint attached to the given body, unlinking each of
    /// them from the body at its other end.
    pub(crate) fn remove_attached_joints(
        &mut self,
        bodies: &mut RigidBodySet,
        body: RigidBodyHandle,
    ) {
        let attached = match bodies.get_mut(body) {
            Some(rb) => std::mem::take(&mut rb.attached_joints),
            None => return,
        };

        for handle in attached {
            self.remove(handle, bodies);
        }
    }

    /// Should the two given bodies be allowed to collide with each other?
    ///
    /// Collision is suppressed whenever at least one joint with
    /// `collide_connected == false` attaches the two bodies, which is the
    /// default for every joint.
    pub fn collision_enabled_between(
        &self,
        bodies: &RigidBodySet,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
    ) -> bool {
        let rb1 = match bodies.get(body1) {
            Some(rb) => rb,
            None => return true,
        };

        for handle in &rb1.attached_joints {
            if let Some(joint) = self.get(*handle) {
                let attaches_both = (joint.body1 == body1 && joint.body2 == body2)
                    || (joint.body1 == body2 && joint.body2 == body1);
                if attaches_both && !joint.collide_connected {
                    return false;
                }
            }
        }

        true
    }
}

impl ops::Index<JointHandle> for JointSet {
    type Output = Joint;

    fn index(&self, index: JointHandle) -> &Joint {
        &self.joints[index.0]
    }
}

impl ops::IndexMut<JointHandle> for JointSet {
    fn index_mut(&mut self, index: JointHandle) -> &mut Joint {
        &mut self.joints[index.0]
    }
}

#[cfg(test)]
mod test {
    use crate::dynamics::{
        DistanceJoint, JointDef, JointSet, PulleyJoint, RevoluteJoint, RigidBodyBuilder,
        RigidBodySet,
    };
    use crate::math::{Point, Vector};

    fn make_bodies(n: usize) -> (RigidBodySet, Vec<crate::dynamics::RigidBodyHandle>) {
        let mut bodies = RigidBodySet::new();
        let handles = (0..n)
            .map(|i| {
                bodies.insert(
                    RigidBodyBuilder::dynamic()
                        .translation(Vector::new(i as f32, 0.0))
                        .build(),
                )
            })
            .collect();
        (bodies, handles)
    }

    fn distance_def(
        body1: crate::dynamics::RigidBodyHandle,
        body2: crate::dynamics::RigidBodyHandle,
    ) -> JointDef {
        JointDef::new(
            body1,
            body2,
            DistanceJoint::new(Point::origin(), Point::origin(), 1.0),
        )
    }

    #[test]
    fn insert_links_both_bodies() {
        let (mut bodies, h) = make_bodies(3);
        let mut joints = JointSet::new();

        let j0 = joints.insert(&mut bodies, distance_def(h[0], h[1]));
        let j1 = joints.insert(&mut bodies, distance_def(h[1], h[2]));

        assert_eq!(bodies[h[0]].attached_joints(), &[j0]);
        assert_eq!(bodies[h[1]].attached_joints(), &[j0, j1]);
        assert_eq!(bodies[h[2]].attached_joints(), &[j1]);
    }

    #[test]
    #[should_panic]
    fn insert_rejects_self_joint() {
        let (mut bodies, h) = make_bodies(1);
        let mut joints = JointSet::new();
        joints.insert(&mut bodies, distance_def(h[0], h[0]));
    }

    #[test]
    #[should_panic]
    fn insert_rejects_missing_body() {
        let (mut bodies, h) = make_bodies(2);
        let mut joints = JointSet::new();
        let removed = h[1];
        bodies.remove(removed, &mut joints);
        joints.insert(&mut bodies, distance_def(h[0], removed));
    }

    #[test]
    fn failed_insert_leaves_the_set_untouched() {
        let (mut bodies, h) = make_bodies(2);
        let mut joints = JointSet::new();
        let removed = h[1];
        bodies.remove(removed, &mut joints);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            joints.insert(&mut bodies, distance_def(h[0], removed));
        }));

        assert!(result.is_err());
        assert!(joints.is_empty());
        assert_eq!(bodies[h[0]].attached_joints(), &[]);
    }

    #[test]
    #[should_panic]
    fn gear_rejects_joints_without_a_rotational_or_sliding_axis() {
        let (mut bodies, h) = make_bodies(4);
        let mut joints = JointSet::new();
        let j0 = joints.insert(&mut bodies, distance_def(h[0], h[1]));
        let j1 = joints.insert(&mut bodies, distance_def(h[2], h[3]));
        joints.insert_gear(&mut bodies, j0, j1, 1.0);
    }

    #[test]
    #[should_panic]
    fn pulley_rejects_non_positive_ratio() {
        PulleyJoint::new(
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::origin(),
            Point::origin(),
            1.0,
            1.0,
            0.0,
        );
    }

    #[test]
    fn remove_unlinks_and_invalidates_handle() {
        let (mut bodies, h) = make_bodies(3);
        let mut joints = JointSet::new();

        let j0 = joints.insert(&mut bodies, distance_def(h[0], h[1]));
        let j1 = joints.insert(&mut bodies, distance_def(h[1], h[2]));

        assert!(joints.remove(j0, &mut bodies).is_some());
        assert!(!joints.contains(j0));
        assert!(joints.remove(j0, &mut bodies).is_none());
        assert_eq!(bodies[h[0]].attached_joints(), &[]);
        assert_eq!(bodies[h[1]].attached_joints(), &[j1]);

        // A recycled slot gets a fresh generation, so the old handle must
        // keep failing.
        let j2 = joints.insert(&mut bodies, distance_def(h[0], h[2]));
        assert!(!joints.contains(j0));
        assert!(joints.contains(j2));
    }

    #[test]
    fn removing_a_body_removes_its_joints() {
        let (mut bodies, h) = make_bodies(3);
        let mut joints = JointSet::new();

        let j0 = joints.insert(&mut bodies, distance_def(h[0], h[1]));
        let j1 = joints.insert(&mut bodies, distance_def(h[1], h[2]));
        let j2 = joints.insert(&mut bodies, distance_def(h[0], h[2]));

        bodies.remove(h[1], &mut joints);

        assert!(!joints.contains(j0));
        assert!(!joints.contains(j1));
        assert!(joints.contains(j2));
        assert_eq!(bodies[h[0]].attached_joints(), &[j2]);
        assert_eq!(bodies[h[2]].attached_joints(), &[j2]);
    }

    #[test]
    fn collision_enabled_between_respects_collide_connected() {
        let (mut bodies, h) = make_bodies(3);
        let mut joints = JointSet::new();

        joints.insert(&mut bodies, distance_def(h[0], h[1]));
        joints.insert(
            &mut bodies,
            distance_def(h[1], h[2]).collide_connected(true),
        );

        assert!(!joints.collision_enabled_between(&bodies, h[0], h[1]));
        assert!(!joints.collision_enabled_between(&bodies, h[1], h[0]));
        assert!(joints.collision_enabled_between(&bodies, h[1], h[2]));
        assert!(joints.collision_enabled_between(&bodies, h[0], h[2]));
    }

    #[test]
    fn gear_insertion_resolves_driven_bodies() {
        let mut bodies = RigidBodySet::new();
        let ground1 = bodies.insert(RigidBodyBuilder::fixed().build());
        let ground2 = bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(Vector::new(2.0, 0.0))
                .build(),
        );
        let wheel1 = bodies.insert(RigidBodyBuilder::dynamic().build());
        let wheel2 = bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(Vector::new(2.0, 0.0))
                .build(),
        );
        let mut joints = JointSet::new();

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

        let gear = joints.insert_gear(&mut bodies, rev1, rev2, 2.0);
        let joint = &joints[gear];
        assert_eq!(joint.body1(), wheel1);
        assert_eq!(joint.body2(), wheel2);

        let params = joint.params.as_gear().unwrap();
        assert_eq!(params.ratio, 2.0);
        assert_eq!(params.constant, 0.0);
        assert!(bodies[wheel1].attached_joints().contains(&gear));
        assert!(bodies[wheel2].attached_joints().contains(&gear));
    }
}
