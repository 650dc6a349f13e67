//! Specialized systems and the frame dispatcher
//!
//! `SystemManager` owns every specialized system and is passed explicitly to
//! the scene operations that need it. Component lifecycles always route
//! through it so exactly one system accepts each component kind, and physical
//! arena erasure is deferred to the end-of-frame safe point while iteration
//! may still be in flight.

pub mod behavior;
pub mod particles;
pub mod render;
pub mod sound;

pub use behavior::BehaviorSystem;
pub use particles::ParticleSystem;
pub use render::RenderSystem;
pub use sound::SoundSystem;

use crate::config::EngineConfig;
use crate::physics::PhysicsSystem;
use crate::scene::component::{ComponentCore, ComponentKind, ComponentRef, Guid};
use crate::scene::{GameObjectId, Scene};

/// Owner of all specialized systems and driver of the frame loop
pub struct SystemManager {
    /// Scripted behavior store
    pub behaviors: BehaviorSystem,
    /// Mesh, light, and camera stores
    pub render: RenderSystem,
    /// Particle emitter store
    pub particles: ParticleSystem,
    /// Sound emitter/listener stores
    pub sound: SoundSystem,
    /// Physics components, actors, and the simulation facade
    pub physics: PhysicsSystem,
    fixed_timestep: f32,
    max_catchup_steps: Option<u32>,
    accumulator: f32,
    pending_destroy: Vec<ComponentRef>,
}

impl SystemManager {
    /// Build every system from the engine configuration
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            behaviors: BehaviorSystem::new(),
            render: RenderSystem::new(),
            particles: ParticleSystem::new(),
            sound: SoundSystem::new(),
            physics: PhysicsSystem::new(config.physics.clone()),
            fixed_timestep: config.fixed_timestep,
            max_catchup_steps: config.max_catchup_steps,
            accumulator: 0.0,
            pending_destroy: Vec::new(),
        }
    }

    /// The fixed step length the frame loop advances simulation with
    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Route a component creation to the one system that accepts its kind
    pub fn create_component(
        &mut self,
        scene: &Scene,
        owner: GameObjectId,
        kind: ComponentKind,
        id: Guid,
    ) -> Option<ComponentRef> {
        let comp = match kind {
            ComponentKind::Behavior => {
                ComponentRef::Behavior(self.behaviors.create(owner, id))
            }
            ComponentKind::Mesh => ComponentRef::Mesh(self.render.create_mesh(owner, id)),
            ComponentKind::SkeletalMesh => {
                ComponentRef::SkeletalMesh(self.render.create_skeletal_mesh(owner, id))
            }
            ComponentKind::Light => ComponentRef::Light(self.render.create_light(owner, id)),
            ComponentKind::Camera => ComponentRef::Camera(self.render.create_camera(owner, id)),
            ComponentKind::Particle => {
                ComponentRef::Particle(self.particles.create(owner, id))
            }
            ComponentKind::Collider(shape) => ComponentRef::Collider(
                self.physics.add_collider_instance(scene, owner, id, shape)?,
            ),
            ComponentKind::Rigidbody => ComponentRef::Rigidbody(
                self.physics.add_rigidbody_instance(scene, owner, id)?,
            ),
            ComponentKind::SoundEmitter => {
                ComponentRef::SoundEmitter(self.sound.create_emitter(owner, id))
            }
            ComponentKind::SoundListener => {
                ComponentRef::SoundListener(self.sound.create_listener(owner, id))
            }
        };
        Some(comp)
    }

    /// Request destruction of a component
    ///
    /// Idempotent: a second request for the same component is a logged no-op.
    /// System-side teardown (physics detach) happens now; arena erasure waits
    /// for the end-of-frame flush so live iterators stay valid.
    pub fn destroy_component(&mut self, scene: &Scene, comp: ComponentRef) {
        let Some(core) = self.core_mut(comp) else {
            log::warn!("destroy_component: component no longer exists");
            return;
        };
        if core.destroyed {
            log::warn!("destroy_component: already destroyed, ignoring");
            return;
        }
        core.destroyed = true;

        match comp {
            ComponentRef::Collider(id) => self.physics.remove_collider_instance(scene, id),
            ComponentRef::Rigidbody(id) => self.physics.remove_rigidbody_instance(scene, id),
            _ => {}
        }
        self.pending_destroy.push(comp);
    }

    /// Advance one frame
    ///
    /// Authoritative transforms are pushed into physics before any stepping,
    /// so teleports made since the last frame are visible even when the
    /// accumulator yields zero fixed steps. Settled poses come back once per
    /// frame, after the last fixed step.
    pub fn update(&mut self, scene: &mut Scene, delta_time: f32) {
        self.accumulator += delta_time;

        self.physics.send_transforms(scene);

        let mut steps = 0u32;
        while self.accumulator >= self.fixed_timestep {
            self.behaviors.fixed_update(scene, self.fixed_timestep);
            self.particles.fixed_update(scene, self.fixed_timestep);
            self.physics.fixed_update(self.fixed_timestep);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
            if let Some(max) = self.max_catchup_steps {
                if steps >= max {
                    // Drop the backlog instead of spiraling further behind.
                    self.accumulator = 0.0;
                    log::warn!("fixed-step catch-up capped at {max} step(s), dropping backlog");
                    break;
                }
            }
        }

        self.physics.retrieve_transforms(scene);

        self.behaviors.update(scene, delta_time);
        self.particles.update(scene, delta_time);
        self.render.update(scene, delta_time);
        self.sound.update(scene, delta_time);

        self.flush_destroyed(scene);
    }

    /// Physically erase every component destroyed this frame and unlink it
    /// from its owner's component list
    pub fn flush_destroyed(&mut self, scene: &mut Scene) {
        for comp in std::mem::take(&mut self.pending_destroy) {
            let owner = match comp {
                ComponentRef::Behavior(id) => self.behaviors.erase(id).map(|c| c.core.owner),
                ComponentRef::Mesh(id) => self.render.erase_mesh(id).map(|c| c.core.owner),
                ComponentRef::SkeletalMesh(id) => {
                    self.render.erase_skeletal_mesh(id).map(|c| c.core.owner)
                }
                ComponentRef::Light(id) => self.render.erase_light(id).map(|c| c.core.owner),
                ComponentRef::Camera(id) => self.render.erase_camera(id).map(|c| c.core.owner),
                ComponentRef::Particle(id) => self.particles.erase(id).map(|c| c.core.owner),
                ComponentRef::Collider(id) => {
                    self.physics.erase_collider(id).map(|c| c.core.owner)
                }
                ComponentRef::Rigidbody(id) => {
                    self.physics.erase_rigidbody(id).map(|c| c.core.owner)
                }
                ComponentRef::SoundEmitter(id) => {
                    self.sound.erase_emitter(id).map(|c| c.core.owner)
                }
                ComponentRef::SoundListener(id) => {
                    self.sound.erase_listener(id).map(|c| c.core.owner)
                }
            };
            // The owner may already be gone (whole-object destruction).
            if let Some(go) = owner.and_then(|o| scene.get_mut(o)) {
                go.components.retain(|&c| c != comp);
            }
        }
    }

    fn core_mut(&mut self, comp: ComponentRef) -> Option<&mut ComponentCore> {
        match comp {
            ComponentRef::Behavior(id) => self.behaviors.get_mut(id).map(|c| &mut c.core),
            ComponentRef::Mesh(id) => self.render.mesh_mut(id).map(|c| &mut c.core),
            ComponentRef::SkeletalMesh(id) => {
                self.render.skeletal_mesh_mut(id).map(|c| &mut c.core)
            }
            ComponentRef::Light(id) => self.render.light_mut(id).map(|c| &mut c.core),
            ComponentRef::Camera(id) => self.render.camera_mut(id).map(|c| &mut c.core),
            ComponentRef::Particle(id) => self.particles.get_mut(id).map(|c| &mut c.core),
            ComponentRef::Collider(id) => self.physics.collider_mut(id).map(|c| &mut c.core),
            ComponentRef::Rigidbody(id) => self.physics.rigidbody_mut(id).map(|c| &mut c.core),
            ComponentRef::SoundEmitter(id) => self.sound.emitter_mut(id).map(|c| &mut c.core),
            ComponentRef::SoundListener(id) => {
                self.sound.listener_mut(id).map(|c| &mut c.core)
            }
        }
    }
}
