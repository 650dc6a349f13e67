//! Sound component stores
//!
//! Mixing and playback are out of scope; emitters and listeners carry the
//! scene-side state an audio backend would poll.

use crate::scene::component::{ComponentCore, Guid, SoundEmitterId, SoundListenerId};
use crate::scene::{GameObjectId, Scene};
use crate::systems::behavior::is_ticking;
use slotmap::SlotMap;

/// Positional sound source
pub struct SoundEmitter {
    /// Shared component state
    pub core: ComponentCore,
    /// Linear volume, 0 to 1
    pub volume: f32,
    /// Whether the emitter is currently playing
    pub playing: bool,
    /// Seconds into the current clip
    pub playback_time: f32,
}

/// Receiving end of positional audio; usually one per scene
pub struct SoundListener {
    /// Shared component state
    pub core: ComponentCore,
}

/// Store for sound emitters and listeners
#[derive(Default)]
pub struct SoundSystem {
    emitters: SlotMap<SoundEmitterId, SoundEmitter>,
    listeners: SlotMap<SoundListenerId, SoundListener>,
}

impl SoundSystem {
    /// Create empty stores
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create_emitter(&mut self, owner: GameObjectId, id: Guid) -> SoundEmitterId {
        self.emitters.insert(SoundEmitter {
            core: ComponentCore::new(id, owner),
            volume: 1.0,
            playing: false,
            playback_time: 0.0,
        })
    }

    pub(crate) fn create_listener(&mut self, owner: GameObjectId, id: Guid) -> SoundListenerId {
        self.listeners.insert(SoundListener {
            core: ComponentCore::new(id, owner),
        })
    }

    pub(crate) fn erase_emitter(&mut self, id: SoundEmitterId) -> Option<SoundEmitter> {
        self.emitters.remove(id)
    }

    pub(crate) fn erase_listener(&mut self, id: SoundListenerId) -> Option<SoundListener> {
        self.listeners.remove(id)
    }

    /// Look up an emitter
    pub fn emitter(&self, id: SoundEmitterId) -> Option<&SoundEmitter> {
        self.emitters.get(id)
    }

    /// Look up an emitter mutably
    pub fn emitter_mut(&mut self, id: SoundEmitterId) -> Option<&mut SoundEmitter> {
        self.emitters.get_mut(id)
    }

    /// Look up a listener
    pub fn listener(&self, id: SoundListenerId) -> Option<&SoundListener> {
        self.listeners.get(id)
    }

    /// Look up a listener mutably
    pub fn listener_mut(&mut self, id: SoundListenerId) -> Option<&mut SoundListener> {
        self.listeners.get_mut(id)
    }

    /// Variable-rate tick: advance playback clocks
    pub fn update(&mut self, scene: &Scene, dt: f32) {
        for (_, emitter) in &mut self.emitters {
            if !emitter.playing || !is_ticking(&emitter.core, scene) {
                continue;
            }
            emitter.playback_time += dt;
        }
    }
}
