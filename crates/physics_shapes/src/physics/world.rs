//! Collaborators of a collision shape
//!
//! The shape component talks to its surroundings through these traits: the
//! scene node it is attached to, the physics world that tracks every shape,
//! and the sibling rigid body that must rebuild when a shape changes.
//! Everything here runs on one thread, so shared collaborators are
//! `Rc<RefCell<_>>` and held weakly by the shape.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::Vec3;

new_key_type! {
    /// Handle of a shape registered with a physics world
    pub struct CollisionShapeKey;
}

/// Tracks the collision shapes of a scene
pub trait CollisionShapeRegistry {
    /// Register a shape, returning its handle
    fn add_collision_shape(&mut self, name: &str) -> CollisionShapeKey;

    /// Deregister a shape; false if it was not registered
    fn remove_collision_shape(&mut self, key: CollisionShapeKey) -> bool;
}

/// Rigid body that owns the collision shapes on its node
pub trait RigidBodyListener {
    /// Rebuild the body's compound shape from its collision shapes
    fn refresh_collision_shapes(&mut self);
}

/// Scene node a shape can attach to
pub trait SceneNode {
    /// Accumulated world scale of the node
    fn world_scale(&self) -> Vec3;

    /// Physics world of the node's scene, if any
    fn physics_world(&self) -> Option<Rc<RefCell<dyn CollisionShapeRegistry>>>;

    /// Rigid body component on the node, if any
    fn rigid_body(&self) -> Option<Rc<RefCell<dyn RigidBodyListener>>>;
}

/// Registry of the collision shapes in a scene
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    collision_shapes: SlotMap<CollisionShapeKey, String>,
}

impl PhysicsWorld {
    /// Create an empty physics world
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered shapes
    pub fn collision_shape_count(&self) -> usize {
        self.collision_shapes.len()
    }

    /// True if the handle is registered
    pub fn contains_collision_shape(&self, key: CollisionShapeKey) -> bool {
        self.collision_shapes.contains_key(key)
    }

    /// Registered shapes and their names
    pub fn collision_shapes(&self) -> impl Iterator<Item = (CollisionShapeKey, &str)> + '_ {
        self.collision_shapes.iter().map(|(key, name)| (key, name.as_str()))
    }
}

impl CollisionShapeRegistry for PhysicsWorld {
    fn add_collision_shape(&mut self, name: &str) -> CollisionShapeKey {
        let key = self.collision_shapes.insert(name.to_string());
        debug!("Registered collision shape '{}' ({:?})", name, key);
        key
    }

    fn remove_collision_shape(&mut self, key: CollisionShapeKey) -> bool {
        match self.collision_shapes.remove(key) {
            Some(name) => {
                debug!("Removed collision shape '{}' ({:?})", name, key);
                true
            }
            None => false,
        }
    }
}
