//! Collision shape component
//!
//! Owns a shape's placement on its node and the geometry built from its
//! attributes. Attribute changes only mark the shape dirty; the rebuild
//! happens in [`CollisionShapeComponent::apply_attributes`], so several
//! changes cost one rebuild. The shape rebuilds on its own when attached to
//! a node and when the node's world scale changes.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use log::{error, trace, warn};

use super::collision::heightfield::GridSize;
use super::collision::hull::{HullGenerator, QuickHullGenerator};
use super::collision::shape::{CollisionGeometry, CollisionShapeAttributes, ShapeType};
use super::world::{CollisionShapeKey, CollisionShapeRegistry, RigidBodyListener, SceneNode};
use super::ShapeError;
use crate::foundation::math::{Quat, Vec3};
use crate::geometry::Model;

/// Collision shape attached to a scene node
pub struct CollisionShapeComponent {
    name: String,
    attributes: CollisionShapeAttributes,
    model: Option<Arc<Model>>,
    position: Vec3,
    rotation: Quat,
    cached_world_scale: Vec3,
    dirty: bool,
    geometry: CollisionGeometry,
    hull_generator: Box<dyn HullGenerator>,
    node: Option<Weak<dyn SceneNode>>,
    physics_world: Option<Weak<RefCell<dyn CollisionShapeRegistry>>>,
    registry_key: Option<CollisionShapeKey>,
    rigid_body: Option<Weak<RefCell<dyn RigidBodyListener>>>,
}

impl CollisionShapeComponent {
    /// Create a detached shape with default attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: CollisionShapeAttributes::default(),
            model: None,
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            cached_world_scale: Vec3::new(1.0, 1.0, 1.0),
            dirty: false,
            geometry: CollisionGeometry::None,
            hull_generator: Box::new(QuickHullGenerator),
            node: None,
            physics_world: None,
            registry_key: None,
            rigid_body: None,
        }
    }

    /// Use a different convex hull generator
    #[must_use]
    pub fn with_hull_generator(mut self, generator: Box<dyn HullGenerator>) -> Self {
        self.hull_generator = generator;
        self
    }

    /// Replace all attributes
    pub fn set_attributes(&mut self, attributes: CollisionShapeAttributes) {
        self.attributes = attributes;
        self.dirty = true;
    }

    /// Set the shape kind
    pub fn set_shape_type(&mut self, shape_type: ShapeType) {
        self.attributes.shape_type = shape_type;
        self.dirty = true;
    }

    /// Set the unscaled primitive size
    pub fn set_size(&mut self, size: Vec3) {
        self.attributes.size = size;
        self.dirty = true;
    }

    /// Set the model LOD used for mesh shapes
    pub fn set_lod_level(&mut self, lod_level: u32) {
        self.attributes.lod_level = lod_level;
        self.dirty = true;
    }

    /// Set the convex hull skin width
    pub fn set_skin_width(&mut self, skin_width: f32) {
        self.attributes.skin_width = skin_width;
        self.dirty = true;
    }

    /// Set the heightfield grid size, `None` to derive it from the model
    pub fn set_heightfield_size(&mut self, size: Option<GridSize>) {
        self.attributes.heightfield_size = size;
        self.dirty = true;
    }

    /// Set the model mesh shapes are built from
    pub fn set_model(&mut self, model: Option<Arc<Model>>) {
        self.model = model;
        self.dirty = true;
    }

    /// Rebuild and notify the rigid body if attributes changed
    pub fn apply_attributes(&mut self) -> Result<(), ShapeError> {
        if self.dirty {
            self.update_collision_shape()?;
            self.notify_rigid_body();
        }
        Ok(())
    }

    /// Set the offset from the node
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.notify_rigid_body();
    }

    /// Set the rotation relative to the node
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.notify_rigid_body();
    }

    /// Set offset and rotation together
    pub fn set_transform(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
        self.notify_rigid_body();
    }

    /// Attach to a node, or detach with `None`
    ///
    /// Attaching registers the shape with the scene's physics world and
    /// builds its geometry.
    pub fn on_node_set(&mut self, node: Option<&Rc<dyn SceneNode>>) -> Result<(), ShapeError> {
        self.deregister();

        let Some(node) = node else {
            self.node = None;
            return Ok(());
        };

        self.node = Some(Rc::downgrade(node));
        if let Some(world) = node.physics_world() {
            self.registry_key = Some(world.borrow_mut().add_collision_shape(&self.name));
            self.physics_world = Some(Rc::downgrade(&world));
        }

        self.update_collision_shape()?;
        self.notify_rigid_body();
        Ok(())
    }

    /// React to the node's transform changing
    ///
    /// Only a change of world scale needs new geometry.
    pub fn on_marked_dirty(&mut self) -> Result<(), ShapeError> {
        let Some(node) = self.node.as_ref().and_then(Weak::upgrade) else {
            return Ok(());
        };

        if node.world_scale() != self.cached_world_scale {
            self.update_collision_shape()?;
            self.notify_rigid_body();
        }
        Ok(())
    }

    /// Forget the cached rigid body so the next notification looks it up again
    pub fn clear_rigid_body(&mut self) {
        self.rigid_body = None;
    }

    /// Shape name used for registration
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current attributes
    pub fn attributes(&self) -> &CollisionShapeAttributes {
        &self.attributes
    }

    /// Model used for mesh shapes
    pub fn model(&self) -> Option<&Arc<Model>> {
        self.model.as_ref()
    }

    /// Offset from the node
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Rotation relative to the node
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// World scale the current geometry was built at
    pub fn world_scale(&self) -> Vec3 {
        self.cached_world_scale
    }

    /// True when attributes changed since the last build
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Built geometry
    pub fn geometry(&self) -> &CollisionGeometry {
        &self.geometry
    }

    /// Handle in the physics world, while registered
    pub fn registry_key(&self) -> Option<CollisionShapeKey> {
        self.registry_key
    }

    fn update_collision_shape(&mut self) -> Result<(), ShapeError> {
        let world_scale = self
            .node
            .as_ref()
            .and_then(Weak::upgrade)
            .map_or(self.cached_world_scale, |node| node.world_scale());

        match CollisionGeometry::build(
            &self.attributes,
            self.model.as_deref(),
            &world_scale,
            self.hull_generator.as_ref(),
        ) {
            Ok(geometry) => {
                trace!("Rebuilt collision shape '{}' as {:?}", self.name, self.attributes.shape_type);
                self.geometry = geometry;
                self.cached_world_scale = world_scale;
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                error!("Failed to build collision shape '{}': {}", self.name, err);
                self.geometry = CollisionGeometry::None;
                Err(err)
            }
        }
    }

    fn notify_rigid_body(&mut self) {
        // Kept weakly so the body can still be told after the node is gone
        let body = match self.rigid_body.as_ref().and_then(Weak::upgrade) {
            Some(body) => Some(body),
            None => {
                let found = self.node.as_ref().and_then(Weak::upgrade).and_then(|node| node.rigid_body());
                self.rigid_body = found.as_ref().map(Rc::downgrade);
                found
            }
        };

        if let Some(body) = body {
            match body.try_borrow_mut() {
                Ok(mut body) => body.refresh_collision_shapes(),
                Err(_) => warn!("Rigid body busy, collision shape '{}' not refreshed", self.name),
            }
        }
    }

    fn deregister(&mut self) {
        let world = self.physics_world.take().and_then(|world| world.upgrade());
        let key = self.registry_key.take();

        if let (Some(world), Some(key)) = (world, key) {
            match world.try_borrow_mut() {
                Ok(mut world) => {
                    world.remove_collision_shape(key);
                }
                Err(_) => warn!("Physics world busy, collision shape '{}' left registered", self.name),
            }
        }
    }
}

impl Drop for CollisionShapeComponent {
    fn drop(&mut self) {
        self.deregister();
    }
}

impl std::fmt::Debug for CollisionShapeComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionShapeComponent")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("cached_world_scale", &self.cached_world_scale)
            .field("dirty", &self.dirty)
            .field("geometry", &self.geometry)
            .field("registry_key", &self.registry_key)
            .finish_non_exhaustive()
    }
}
