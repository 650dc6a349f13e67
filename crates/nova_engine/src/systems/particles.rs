//! Particle emitter store
//!
//! Emission is accumulated on the fixed clock so burst counts are
//! deterministic regardless of frame rate; rendering the particles is the
//! host's concern.

use crate::scene::component::{ComponentCore, Guid, ParticleId};
use crate::scene::{GameObjectId, Scene};
use crate::systems::behavior::is_ticking;
use slotmap::SlotMap;

/// Continuous particle emitter
pub struct ParticleEmitter {
    /// Shared component state
    pub core: ComponentCore,
    /// Particles spawned per second
    pub emission_rate: f32,
    /// Seconds a spawned particle lives
    pub particle_lifetime: f32,
    /// Fractional emission carried between fixed steps
    emission_accumulator: f32,
    /// Particles currently alive, decayed on the variable clock
    live_particles: f32,
}

impl ParticleEmitter {
    /// Whole particles currently alive
    pub fn live_count(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            self.live_particles.max(0.0) as u32
        }
    }
}

/// Store and clock driver for particle emitters
#[derive(Default)]
pub struct ParticleSystem {
    emitters: SlotMap<ParticleId, ParticleEmitter>,
}

impl ParticleSystem {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create(&mut self, owner: GameObjectId, id: Guid) -> ParticleId {
        self.emitters.insert(ParticleEmitter {
            core: ComponentCore::new(id, owner),
            emission_rate: 10.0,
            particle_lifetime: 2.0,
            emission_accumulator: 0.0,
            live_particles: 0.0,
        })
    }

    pub(crate) fn erase(&mut self, id: ParticleId) -> Option<ParticleEmitter> {
        self.emitters.remove(id)
    }

    /// Look up an emitter
    pub fn get(&self, id: ParticleId) -> Option<&ParticleEmitter> {
        self.emitters.get(id)
    }

    /// Look up an emitter mutably
    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut ParticleEmitter> {
        self.emitters.get_mut(id)
    }

    /// Fixed-rate tick: accumulate emission
    pub fn fixed_update(&mut self, scene: &Scene, fixed_dt: f32) {
        for (_, emitter) in &mut self.emitters {
            if !is_ticking(&emitter.core, scene) {
                continue;
            }
            emitter.emission_accumulator += emitter.emission_rate * fixed_dt;
            let spawned = emitter.emission_accumulator.floor();
            emitter.emission_accumulator -= spawned;
            emitter.live_particles += spawned;
        }
    }

    /// Variable-rate tick: retire expired particles
    pub fn update(&mut self, scene: &Scene, dt: f32) {
        for (_, emitter) in &mut self.emitters {
            if !is_ticking(&emitter.core, scene) {
                continue;
            }
            if emitter.particle_lifetime > 0.0 {
                let decay = emitter.live_particles / emitter.particle_lifetime * dt;
                emitter.live_particles = (emitter.live_particles - decay).max(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emission_is_deterministic_on_fixed_clock() {
        let mut scene = Scene::new();
        let mut system = ParticleSystem::new();
        let go = scene.create_game_object("emitter");
        let id = system.create(go, Guid::new());
        system.get_mut(id).unwrap().emission_rate = 100.0;

        // 10 steps at 10 ms: exactly 10 particles regardless of step grouping.
        for _ in 0..10 {
            system.fixed_update(&scene, 0.01);
        }
        assert_eq!(system.get(id).unwrap().live_count(), 10);
    }
}
