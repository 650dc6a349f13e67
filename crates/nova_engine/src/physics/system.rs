//! Physics orchestrator
//!
//! Owns every collider, rigidbody, and physics actor, and enforces the
//! cross-system invariants: exactly one `PhysicsActor` per game object with
//! physics components (zero otherwise), and the full-rebuild policy: an actor
//! with a live native handle is never patched in place, it is torn down and
//! recreated from current component state.

use crate::foundation::math::{Transform, Vec3};
use crate::physics::actor::PhysicsActor;
use crate::physics::collider::{
    prepare_geometry, Collider, CollisionInfo, ShapeKind, ShapeVariant,
};
use crate::physics::rigidbody::Rigidbody;
use crate::physics::simulation::{PhysicsSimulation, Ray, RayHit};
use crate::scene::component::{ColliderId, ComponentCore, Guid, RigidbodyId};
use crate::scene::{GameObjectId, Scene};
use serde::{Deserialize, Serialize};
use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Stable handle to a physics actor
    pub struct ActorId;
}

/// Physics tuning, loaded with the engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity
    pub gravity: Vec3,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Top-level owner of physics components and the simulation facade
pub struct PhysicsSystem {
    colliders: SlotMap<ColliderId, Collider>,
    rigidbodies: SlotMap<RigidbodyId, Rigidbody>,
    actors: SlotMap<ActorId, PhysicsActor>,
    actor_of: SecondaryMap<GameObjectId, ActorId>,
    simulation: PhysicsSimulation,
    config: PhysicsConfig,
    running: bool,
}

impl PhysicsSystem {
    /// Create the system with the given tuning; no simulation exists yet
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            colliders: SlotMap::with_key(),
            rigidbodies: SlotMap::with_key(),
            actors: SlotMap::with_key(),
            actor_of: SecondaryMap::new(),
            simulation: PhysicsSimulation::new(),
            config,
            running: false,
        }
    }

    // ---- component access -------------------------------------------------

    /// Look up a collider
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    /// Look up a collider mutably (parameter edits, event draining)
    pub fn collider_mut(&mut self, id: ColliderId) -> Option<&mut Collider> {
        self.colliders.get_mut(id)
    }

    /// Look up a rigidbody
    pub fn rigidbody(&self, id: RigidbodyId) -> Option<&Rigidbody> {
        self.rigidbodies.get(id)
    }

    /// Look up a rigidbody mutably
    pub fn rigidbody_mut(&mut self, id: RigidbodyId) -> Option<&mut Rigidbody> {
        self.rigidbodies.get_mut(id)
    }

    /// The physics actor synchronizing a game object, if it has one
    pub fn actor_for(&self, go: GameObjectId) -> Option<&PhysicsActor> {
        self.actor_of.get(go).and_then(|&id| self.actors.get(id))
    }

    /// Number of live physics actors
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Whether `start_physics` has been called without a matching stop
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Direct access to the simulation facade (queries, debug)
    pub fn simulation(&self) -> &PhysicsSimulation {
        &self.simulation
    }

    // ---- instance lifecycle -------------------------------------------------

    /// Attach a new collider to a game object
    ///
    /// Finds or creates the object's physics actor, then rebuilds it.
    pub fn add_collider_instance(
        &mut self,
        scene: &Scene,
        owner: GameObjectId,
        id: Guid,
        kind: ShapeKind,
    ) -> Option<ColliderId> {
        let collider_id = self
            .colliders
            .insert(Collider::new(ComponentCore::new(id, owner), kind));
        let actor_id = self.find_or_create_actor(owner);
        self.actors[actor_id].add_collider(collider_id);
        self.update_actor(scene, actor_id);
        Some(collider_id)
    }

    /// Attach a rigidbody to a game object (at most one per object)
    pub fn add_rigidbody_instance(
        &mut self,
        scene: &Scene,
        owner: GameObjectId,
        id: Guid,
    ) -> Option<RigidbodyId> {
        let actor_id = self.find_or_create_actor(owner);
        if self.actors[actor_id].rigidbody().is_some() {
            log::error!("add_rigidbody_instance: game object already has a rigidbody");
            if self.actors[actor_id].is_empty() {
                self.delete_actor(actor_id);
            }
            return None;
        }
        let rb_id = self
            .rigidbodies
            .insert(Rigidbody::new(ComponentCore::new(id, owner)));
        self.actors[actor_id].add_rigidbody(rb_id);
        self.update_actor(scene, actor_id);
        Some(rb_id)
    }

    /// Replace a collider's shape parameters
    ///
    /// Geometry-only edits bypass the rebuild path: when the collider is
    /// simulated, the new geometry is written into the existing native shape
    /// in place and the owning body's mass is recomputed from density.
    pub fn set_collider_shape(&mut self, scene: &Scene, id: ColliderId, shape: ShapeVariant) {
        let Some(collider) = self.colliders.get_mut(id) else {
            log::error!("set_collider_shape: collider not found");
            return;
        };
        collider.shape = shape;
        let Some(handle) = collider.shape_handle else {
            // Not simulated; the next prepare picks the new parameters up.
            return;
        };
        let owner = collider.core.owner;
        let scale = scene
            .world_transform(owner)
            .map_or_else(|| Vec3::new(1.0, 1.0, 1.0), |t| t.scale);
        let geometry = prepare_geometry(&collider.shape, scale);
        self.simulation.set_shape_geometry(handle, geometry);

        if let Some(actor) = self.actor_of.get(owner).and_then(|&a| self.actors.get(a)) {
            if let (Some(rb_id), Some(native)) = (actor.rigidbody(), actor.native_handle()) {
                if let Some(rb) = self.rigidbodies.get(rb_id) {
                    self.simulation.update_mass_and_inertia(native, rb.density());
                }
            }
        }
    }

    /// Detach a collider from its actor; deletes the actor when it empties
    pub fn remove_collider_instance(&mut self, scene: &Scene, id: ColliderId) {
        let Some(owner) = self.colliders.get(id).map(|c| c.core.owner) else {
            log::error!("remove_collider_instance: collider not found");
            return;
        };
        let Some(&actor_id) = self.actor_of.get(owner) else {
            log::error!("remove_collider_instance: owning actor cannot be found");
            return;
        };

        // Release this collider's shape before the ref is dropped so its
        // non-owning handle is always null on return.
        if let Some(handle) = self.colliders[id].shape_handle.take() {
            if let Some(native) = self.actors[actor_id].native_handle() {
                self.simulation.detach_shape(native, handle);
            }
            self.simulation.release_shape(handle);
        }

        self.actors[actor_id].remove_collider(id);
        if self.actors[actor_id].is_empty() {
            self.delete_actor(actor_id);
        } else {
            self.update_actor(scene, actor_id);
        }
    }

    /// Detach a rigidbody from its actor; deletes the actor when it empties
    pub fn remove_rigidbody_instance(&mut self, scene: &Scene, id: RigidbodyId) {
        let Some(owner) = self.rigidbodies.get(id).map(|rb| rb.core.owner) else {
            log::error!("remove_rigidbody_instance: rigidbody not found");
            return;
        };
        let Some(&actor_id) = self.actor_of.get(owner) else {
            log::error!("remove_rigidbody_instance: owning actor cannot be found");
            return;
        };

        self.rigidbodies[id].actor_handle = None;
        self.actors[actor_id].remove_rigidbody();
        if self.actors[actor_id].is_empty() {
            self.delete_actor(actor_id);
        } else {
            // Remaining colliders fall back to a kinematic dynamic actor.
            self.update_actor(scene, actor_id);
        }
    }

    pub(crate) fn erase_collider(&mut self, id: ColliderId) -> Option<Collider> {
        self.colliders.remove(id)
    }

    pub(crate) fn erase_rigidbody(&mut self, id: RigidbodyId) -> Option<Rigidbody> {
        self.rigidbodies.remove(id)
    }

    fn find_or_create_actor(&mut self, owner: GameObjectId) -> ActorId {
        if let Some(&actor_id) = self.actor_of.get(owner) {
            return actor_id;
        }
        let actor_id = self.actors.insert(PhysicsActor::new(owner));
        self.actor_of.insert(owner, actor_id);
        actor_id
    }

    fn delete_actor(&mut self, actor_id: ActorId) {
        if let Some(mut actor) = self.actors.remove(actor_id) {
            actor.remove_shapes(&mut self.simulation, &mut self.colliders);
            actor.remove_from_simulation(&mut self.simulation, &mut self.rigidbodies);
            self.actor_of.remove(actor.owner());
        }
    }

    /// Rebuild an actor from current component state
    ///
    /// Never mutates the native actor in place: an existing handle is fully
    /// torn down (shapes first) and recreated. An actor with no handle is
    /// prepared fresh when the simulation exists.
    pub fn update_actor(&mut self, scene: &Scene, actor_id: ActorId) {
        let Some(actor) = self.actors.get_mut(actor_id) else {
            log::error!("update_actor: actor not found");
            return;
        };
        let had_handle = actor.native_handle().is_some();
        if had_handle {
            actor.remove_shapes(&mut self.simulation, &mut self.colliders);
            actor.remove_from_simulation(&mut self.simulation, &mut self.rigidbodies);
        }
        if !self.simulation.is_created() {
            return;
        }
        let owner = actor.owner();
        let Some(go) = scene.get(owner) else {
            log::error!("update_actor: owner game object not found");
            return;
        };
        let world = scene
            .world_transform(owner)
            .unwrap_or_else(Transform::identity);
        actor.prepare_for_simulation(
            &mut self.simulation,
            &mut self.colliders,
            &mut self.rigidbodies,
            &world,
            go.is_static,
        );
    }

    // ---- scene lifecycle ----------------------------------------------------

    /// Create the simulation scene without running it (editor mode keeps the
    /// scene alive for gizmo raycasts)
    pub fn create_simulation(&mut self) {
        self.simulation.create(self.config.gravity);
    }

    /// Destroy the simulation scene, clearing every native handle first
    pub fn destroy_simulation(&mut self) {
        for (_, actor) in &mut self.actors {
            actor.remove_shapes(&mut self.simulation, &mut self.colliders);
            actor.remove_from_simulation(&mut self.simulation, &mut self.rigidbodies);
        }
        self.simulation.destroy();
    }

    /// Enter play mode: create the scene and bulk-prepare every registered actor
    pub fn start_physics(&mut self, scene: &Scene) {
        self.create_simulation();
        let actor_ids: Vec<ActorId> = self.actors.keys().collect();
        for actor_id in actor_ids {
            if self.actors[actor_id].native_handle().is_some() {
                continue;
            }
            self.update_actor(scene, actor_id);
        }
        self.running = true;
        log::info!("physics started with {} actor(s)", self.actors.len());
    }

    /// Leave play mode: clear all actors and destroy the scene
    pub fn stop_physics(&mut self) {
        self.destroy_simulation();
        self.running = false;
        log::info!("physics stopped");
    }

    // ---- per-frame synchronization -------------------------------------------

    /// Push authoritative game-object poses into the simulation
    ///
    /// Static objects are skipped; their native pose never changes.
    pub fn send_transforms(&mut self, scene: &Scene) {
        if !self.simulation.is_created() {
            return;
        }
        for (_, actor) in &self.actors {
            let Some(go) = scene.get(actor.owner()) else {
                continue;
            };
            if go.is_static {
                continue;
            }
            if let Some(world) = scene.world_transform(actor.owner()) {
                actor.send_transform(&mut self.simulation, &world);
            }
        }
    }

    /// Pull settled poses back into game-object transforms
    pub fn retrieve_transforms(&mut self, scene: &mut Scene) {
        if !self.simulation.is_created() {
            return;
        }
        for (_, actor) in &self.actors {
            let owner = actor.owner();
            let Some(go) = scene.get(owner) else {
                continue;
            };
            if go.is_static {
                continue;
            }
            let mut world = Transform::identity();
            if !actor.retrieve_transform(&self.simulation, &mut world) {
                continue;
            }
            // Convert the world pose back into the parent's space.
            let parent = go.parent();
            let local = match parent.and_then(|p| scene.world_transform(p)) {
                Some(parent_world) => parent_world.inverse().combine(&world),
                None => world,
            };
            if let Some(go) = scene.get_mut(owner) {
                go.transform.position = local.position;
                go.transform.rotation = local.rotation;
            }
        }
    }

    /// Advance the simulation one fixed step and deliver collision events
    pub fn fixed_update(&mut self, dt: f32) {
        if !self.simulation.is_created() {
            return;
        }
        self.simulation.step_simulation(dt);
        for event in self.simulation.take_events() {
            // Both colliders are notified; the normal flips for the second.
            if let Some(collider) = self.colliders.get_mut(event.a) {
                collider.push_event(
                    event.kind,
                    CollisionInfo {
                        other: event.b,
                        point: event.point,
                        normal: event.normal,
                    },
                );
            }
            if let Some(collider) = self.colliders.get_mut(event.b) {
                collider.push_event(
                    event.kind,
                    CollisionInfo {
                        other: event.a,
                        point: event.point,
                        normal: -event.normal,
                    },
                );
            }
        }
    }

    // ---- forces and queries ---------------------------------------------------

    /// Apply a force to a simulated rigidbody
    pub fn add_force(&mut self, id: RigidbodyId, force: Vec3) {
        match self.rigidbodies.get(id).and_then(Rigidbody::actor_handle) {
            Some(native) => self.simulation.add_force(native, force),
            None => log::warn!("add_force: rigidbody is not simulating"),
        }
    }

    /// Apply a torque to a simulated rigidbody
    pub fn add_torque(&mut self, id: RigidbodyId, torque: Vec3) {
        match self.rigidbodies.get(id).and_then(Rigidbody::actor_handle) {
            Some(native) => self.simulation.add_torque(native, torque),
            None => log::warn!("add_torque: rigidbody is not simulating"),
        }
    }

    /// Linear velocity of a simulated rigidbody
    pub fn velocity(&self, id: RigidbodyId) -> Option<Vec3> {
        let native = self.rigidbodies.get(id)?.actor_handle()?;
        self.simulation.linear_velocity(native)
    }

    /// Overwrite the linear velocity of a simulated rigidbody
    pub fn set_velocity(&mut self, id: RigidbodyId, velocity: Vec3) {
        match self.rigidbodies.get(id).and_then(Rigidbody::actor_handle) {
            Some(native) => self.simulation.set_linear_velocity(native, velocity),
            None => log::warn!("set_velocity: rigidbody is not simulating"),
        }
    }

    /// Overwrite the angular velocity of a simulated rigidbody
    pub fn set_angular_velocity(&mut self, id: RigidbodyId, velocity: Vec3) {
        match self.rigidbodies.get(id).and_then(Rigidbody::actor_handle) {
            Some(native) => self.simulation.set_angular_velocity(native, velocity),
            None => log::warn!("set_angular_velocity: rigidbody is not simulating"),
        }
    }

    /// Angular velocity of a simulated rigidbody
    pub fn angular_velocity(&self, id: RigidbodyId) -> Option<Vec3> {
        let native = self.rigidbodies.get(id)?.actor_handle()?;
        self.simulation.angular_velocity(native)
    }

    /// Closest raycast hit within `max_distance`, filtered by layer mask
    pub fn raycast(&self, ray: &Ray, max_distance: f32, layer_mask: u32) -> Option<RayHit> {
        self.simulation.raycast(ray, max_distance, layer_mask)
    }

    /// Closest hit whose actor does not belong to `exclude`
    ///
    /// Scans all returned hits rather than asking the native scene for a
    /// filtered query; hit counts are small.
    pub fn raycast_ignore_self(
        &self,
        ray: &Ray,
        max_distance: f32,
        layer_mask: u32,
        exclude: GameObjectId,
    ) -> Option<RayHit> {
        let excluded_native = self.actor_for(exclude).and_then(PhysicsActor::native_handle);
        self.simulation
            .raycast_all(ray, max_distance, layer_mask)
            .into_iter()
            .find(|hit| Some(hit.actor) != excluded_native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collider::CollisionEventKind;
    use crate::physics::collision_layers::CollisionLayers;
    use crate::scene::ComponentKind;
    use crate::systems::SystemManager;
    use crate::config::EngineConfig;
    use approx::assert_relative_eq;

    fn make_world() -> (Scene, SystemManager) {
        (Scene::new(), SystemManager::new(&EngineConfig::default()))
    }

    #[test]
    fn test_one_actor_per_physics_game_object() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("compound");
        scene
            .add_component(go, ComponentKind::Collider(ShapeKind::Sphere), &mut systems)
            .unwrap();
        scene
            .add_component(go, ComponentKind::Collider(ShapeKind::Box), &mut systems)
            .unwrap();
        scene
            .add_component(go, ComponentKind::Rigidbody, &mut systems)
            .unwrap();

        assert_eq!(systems.physics.actor_count(), 1);
        let actor = systems.physics.actor_for(go).unwrap();
        assert_eq!(actor.colliders().len(), 2);
        assert!(actor.rigidbody().is_some());
    }

    #[test]
    fn test_second_rigidbody_rejected() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("body");
        scene
            .add_component(go, ComponentKind::Rigidbody, &mut systems)
            .unwrap();
        assert!(scene
            .add_component(go, ComponentKind::Rigidbody, &mut systems)
            .is_none());
        assert_eq!(systems.physics.actor_count(), 1);
    }

    #[test]
    fn test_collider_removal_nulls_shape_handle() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("body");
        let Some(crate::scene::ComponentRef::Collider(id)) =
            scene.add_component(go, ComponentKind::Collider(ShapeKind::Sphere), &mut systems)
        else {
            panic!("collider expected");
        };

        systems.physics.start_physics(&scene);
        assert!(systems.physics.collider(id).unwrap().shape_handle().is_some());

        systems.physics.remove_collider_instance(&scene, id);
        assert!(systems.physics.collider(id).unwrap().shape_handle().is_none());
        // The actor emptied and was deleted with it.
        assert_eq!(systems.physics.actor_count(), 0);
    }

    #[test]
    fn test_stop_physics_clears_native_handles() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("body");
        let Some(crate::scene::ComponentRef::Collider(id)) =
            scene.add_component(go, ComponentKind::Collider(ShapeKind::Sphere), &mut systems)
        else {
            panic!("collider expected");
        };

        systems.physics.start_physics(&scene);
        systems.physics.stop_physics();

        assert!(!systems.physics.is_running());
        assert!(systems.physics.collider(id).unwrap().shape_handle().is_none());
        assert!(systems
            .physics
            .actor_for(go)
            .unwrap()
            .native_handle()
            .is_none());
    }

    #[test]
    fn test_send_retrieve_round_trip() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("body");
        scene.get_mut(go).unwrap().transform.position = Vec3::new(1.0, 2.0, 3.0);
        scene
            .add_component(go, ComponentKind::Collider(ShapeKind::Sphere), &mut systems)
            .unwrap();

        systems.physics.start_physics(&scene);
        scene.get_mut(go).unwrap().transform.position = Vec3::new(4.0, 5.0, 6.0);
        systems.physics.send_transforms(&scene);
        systems.physics.retrieve_transforms(&mut scene);

        let position = scene.get(go).unwrap().transform.position;
        assert_relative_eq!(position.x, 4.0);
        assert_relative_eq!(position.y, 5.0);
        assert_relative_eq!(position.z, 6.0);
    }

    #[test]
    fn test_trigger_enter_delivered_to_both_colliders() {
        let (mut scene, mut systems) = make_world();
        let sensor = scene.create_game_object("sensor");
        let intruder = scene.create_game_object("intruder");
        scene.get_mut(intruder).unwrap().transform.position = Vec3::new(0.5, 0.0, 0.0);

        let Some(crate::scene::ComponentRef::Collider(sensor_id)) = scene.add_component(
            sensor,
            ComponentKind::Collider(ShapeKind::Sphere),
            &mut systems,
        ) else {
            panic!("collider expected");
        };
        let Some(crate::scene::ComponentRef::Collider(intruder_id)) = scene.add_component(
            intruder,
            ComponentKind::Collider(ShapeKind::Sphere),
            &mut systems,
        ) else {
            panic!("collider expected");
        };
        systems.physics.collider_mut(sensor_id).unwrap().is_trigger = true;

        systems.physics.start_physics(&scene);
        systems.physics.fixed_update(1.0 / 60.0);

        let sensor_events = systems.physics.collider_mut(sensor_id).unwrap().take_events();
        let intruder_events = systems
            .physics
            .collider_mut(intruder_id)
            .unwrap()
            .take_events();

        assert_eq!(sensor_events.len(), 1);
        assert_eq!(sensor_events[0].kind, CollisionEventKind::TriggerEnter);
        assert_eq!(sensor_events[0].info.other, intruder_id);

        assert_eq!(intruder_events.len(), 1);
        assert_eq!(intruder_events[0].kind, CollisionEventKind::TriggerEnter);
        assert_eq!(intruder_events[0].info.other, sensor_id);

        // The normal flips between the two deliveries.
        assert_relative_eq!(
            sensor_events[0].info.normal.x,
            -intruder_events[0].info.normal.x
        );
    }

    #[test]
    fn test_raycast_ignore_self_skips_own_actor() {
        let (mut scene, mut systems) = make_world();
        let shooter = scene.create_game_object("shooter");
        let target = scene.create_game_object("target");
        scene.get_mut(target).unwrap().transform.position = Vec3::new(5.0, 0.0, 0.0);
        scene
            .add_component(
                shooter,
                ComponentKind::Collider(ShapeKind::Sphere),
                &mut systems,
            )
            .unwrap();
        scene
            .add_component(
                target,
                ComponentKind::Collider(ShapeKind::Sphere),
                &mut systems,
            )
            .unwrap();
        systems.physics.start_physics(&scene);

        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        let hit = systems
            .physics
            .raycast_ignore_self(&ray, 100.0, CollisionLayers::ALL, shooter)
            .unwrap();
        let target_native = systems.physics.actor_for(target).unwrap().native_handle();
        assert_eq!(Some(hit.actor), target_native);
        assert_relative_eq!(hit.distance, 4.5, epsilon = 1e-4);
    }

    #[test]
    fn test_shape_resize_writes_through_to_native_shape() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("resizable");
        let Some(crate::scene::ComponentRef::Collider(id)) =
            scene.add_component(go, ComponentKind::Collider(ShapeKind::Sphere), &mut systems)
        else {
            panic!("collider expected");
        };

        systems.physics.start_physics(&scene);
        systems
            .physics
            .set_collider_shape(&scene, id, crate::physics::ShapeVariant::Sphere { radius: 2.0 });

        // The live query geometry reflects the resize without a rebuild.
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = systems.physics.raycast(&ray, 100.0, CollisionLayers::ALL).unwrap();
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_shape_resize_recomputes_mass_from_density() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("resizable");
        let Some(crate::scene::ComponentRef::Collider(id)) =
            scene.add_component(go, ComponentKind::Collider(ShapeKind::Box), &mut systems)
        else {
            panic!("collider expected");
        };
        scene
            .add_component(go, ComponentKind::Rigidbody, &mut systems)
            .unwrap();

        systems.physics.start_physics(&scene);
        systems.physics.set_collider_shape(
            &scene,
            id,
            crate::physics::ShapeVariant::Box {
                half_extents: Vec3::new(1.0, 1.0, 1.0),
            },
        );

        // Density 1 over the resized 2x2x2 box gives mass 8: a force of 8
        // over one second yields unit velocity along x.
        let rb_id = systems.physics.actor_for(go).unwrap().rigidbody().unwrap();
        systems.physics.add_force(rb_id, Vec3::new(8.0, 0.0, 0.0));
        systems.physics.fixed_update(1.0);
        let velocity = systems.physics.velocity(rb_id).unwrap();
        assert_relative_eq!(velocity.x, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_remove_rigidbody_keeps_collider_actor() {
        let (mut scene, mut systems) = make_world();
        let go = scene.create_game_object("body");
        scene
            .add_component(go, ComponentKind::Collider(ShapeKind::Sphere), &mut systems)
            .unwrap();
        let Some(crate::scene::ComponentRef::Rigidbody(rb_id)) =
            scene.add_component(go, ComponentKind::Rigidbody, &mut systems)
        else {
            panic!("rigidbody expected");
        };

        systems.physics.start_physics(&scene);
        systems.physics.remove_rigidbody_instance(&scene, rb_id);

        // Actor survives on the remaining collider, rebuilt as kinematic.
        assert_eq!(systems.physics.actor_count(), 1);
        let actor = systems.physics.actor_for(go).unwrap();
        assert!(actor.rigidbody().is_none());
        assert!(actor.native_handle().is_some());
    }
}
