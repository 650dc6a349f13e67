//! Per-GameObject physics synchronization unit
//!
//! A `PhysicsActor` is the only structure that owns a native actor handle. It
//! aggregates non-owning keys to the colliders and the (at most one)
//! rigidbody of a single game object; those components stay owned by the
//! `PhysicsSystem` arenas. Teardown ordering is load-bearing: `remove_shapes`
//! must run before `remove_from_simulation` so no collider is left holding a
//! handle to a shape the world has already destroyed.

use crate::foundation::math::Transform;
use crate::physics::collider::{prepare_geometry, Collider};
use crate::physics::rigidbody::Rigidbody;
use crate::physics::simulation::{NativeActorId, PhysicsSimulation};
use crate::scene::component::{ColliderId, RigidbodyId};
use crate::scene::GameObjectId;
use slotmap::SlotMap;

/// Aggregates one game object's physics components around a native actor
#[derive(Debug)]
pub struct PhysicsActor {
    owner: GameObjectId,
    colliders: Vec<ColliderId>,
    rigidbody: Option<RigidbodyId>,
    native: Option<NativeActorId>,
}

impl PhysicsActor {
    pub(crate) fn new(owner: GameObjectId) -> Self {
        Self {
            owner,
            colliders: Vec::new(),
            rigidbody: None,
            native: None,
        }
    }

    /// The game object this actor synchronizes
    pub fn owner(&self) -> GameObjectId {
        self.owner
    }

    /// The owned native actor handle, if prepared
    pub fn native_handle(&self) -> Option<NativeActorId> {
        self.native
    }

    /// Colliders aggregated on this actor
    pub fn colliders(&self) -> &[ColliderId] {
        &self.colliders
    }

    /// The rigidbody aggregated on this actor, if any
    pub fn rigidbody(&self) -> Option<RigidbodyId> {
        self.rigidbody
    }

    /// True when no colliders and no rigidbody remain; the signal that the
    /// actor must be deleted outright
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty() && self.rigidbody.is_none()
    }

    // Bookkeeping only; native side effects happen in prepare/teardown.

    pub(crate) fn add_collider(&mut self, id: ColliderId) {
        self.colliders.push(id);
    }

    pub(crate) fn remove_collider(&mut self, id: ColliderId) {
        self.colliders.retain(|&c| c != id);
    }

    pub(crate) fn add_rigidbody(&mut self, id: RigidbodyId) {
        self.rigidbody = Some(id);
    }

    pub(crate) fn remove_rigidbody(&mut self) {
        self.rigidbody = None;
    }

    /// Create the native actor and its shapes from current component state
    ///
    /// Static owners get a static actor; everything else gets a dynamic actor,
    /// kinematic-flagged when no rigidbody drives it. Mass properties are
    /// recomputed from density only after every shape is attached; before
    /// that point they are undefined.
    pub(crate) fn prepare_for_simulation(
        &mut self,
        sim: &mut PhysicsSimulation,
        colliders: &mut SlotMap<ColliderId, Collider>,
        rigidbodies: &mut SlotMap<RigidbodyId, Rigidbody>,
        world_transform: &Transform,
        is_static: bool,
    ) {
        if self.native.is_none() {
            let native = if is_static {
                sim.create_static_actor(world_transform.position, world_transform.rotation)
            } else {
                let rb = self.rigidbody.and_then(|id| rigidbodies.get(id));
                let kinematic = rb.map_or(true, |rb| rb.is_kinematic);
                sim.create_dynamic_actor(
                    world_transform.position,
                    world_transform.rotation,
                    kinematic,
                )
            };
            let Some(native) = native else {
                log::error!("prepare_for_simulation: actor creation failed");
                return;
            };
            self.native = Some(native);
        }
        let Some(native) = self.native else {
            return;
        };

        for &collider_id in &self.colliders {
            let Some(collider) = colliders.get_mut(collider_id) else {
                log::error!("prepare_for_simulation: collider key is stale");
                continue;
            };
            let geometry = prepare_geometry(&collider.shape, world_transform.scale);
            let Some(material) = sim.create_material(&collider.material) else {
                continue;
            };
            let shape = sim.create_shape(
                geometry,
                material,
                collider.is_trigger,
                collider.center.component_mul(&world_transform.scale),
                collider.layer,
                collider.mask,
                Some(collider_id),
            );
            debug_assert!(
                shape.is_some(),
                "collider must have a native shape once the simulation exists"
            );
            if let Some(shape) = shape {
                // Ownership of the shape (and its material) transfers to the actor.
                sim.attach_shape(native, shape);
                collider.shape_handle = Some(shape);
            }
        }

        if let Some(rb_id) = self.rigidbody {
            if let Some(rb) = rigidbodies.get_mut(rb_id) {
                if !is_static {
                    sim.configure_dynamic(
                        native,
                        rb.mass(),
                        rb.use_gravity,
                        rb.linear_drag(),
                        rb.angular_drag(),
                        rb.constraints,
                        rb.collision_detection,
                    );
                    sim.update_mass_and_inertia(native, rb.density());
                }
                rb.actor_handle = Some(native);
            }
        }
    }

    /// Push the game object's authoritative pose into the native actor
    pub(crate) fn send_transform(&self, sim: &mut PhysicsSimulation, world: &Transform) {
        if let Some(native) = self.native {
            sim.set_global_pose(native, world.position, world.rotation);
        }
    }

    /// Pull the settled native pose back out (scale is untouched)
    pub(crate) fn retrieve_transform(
        &self,
        sim: &PhysicsSimulation,
        world: &mut Transform,
    ) -> bool {
        let Some(native) = self.native else {
            return false;
        };
        let Some((position, rotation)) = sim.global_pose(native) else {
            return false;
        };
        world.position = position;
        world.rotation = rotation;
        true
    }

    /// Detach and release every owned shape, nulling the colliders' handles
    ///
    /// Must run before `remove_from_simulation`.
    pub(crate) fn remove_shapes(
        &mut self,
        sim: &mut PhysicsSimulation,
        colliders: &mut SlotMap<ColliderId, Collider>,
    ) {
        for &collider_id in &self.colliders {
            let Some(collider) = colliders.get_mut(collider_id) else {
                continue;
            };
            let Some(handle) = collider.shape_handle.take() else {
                continue;
            };
            if let Some(native) = self.native {
                sim.detach_shape(native, handle);
            }
            sim.release_shape(handle);
        }
    }

    /// Destroy the native actor and clear the rigidbody's non-owning handle
    pub(crate) fn remove_from_simulation(
        &mut self,
        sim: &mut PhysicsSimulation,
        rigidbodies: &mut SlotMap<RigidbodyId, Rigidbody>,
    ) {
        if let Some(native) = self.native.take() {
            sim.release_actor(native);
        }
        if let Some(rb) = self.rigidbody.and_then(|id| rigidbodies.get_mut(id)) {
            rb.actor_handle = None;
        }
    }
}
