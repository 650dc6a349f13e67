//! Behavior component store
//!
//! Scripted game logic lives outside the engine; this system tracks behavior
//! lifecycles and drives their fixed and variable ticks in frame order.

use crate::scene::component::{BehaviorId, ComponentCore, Guid};
use crate::scene::{GameObjectId, Scene};
use slotmap::SlotMap;

/// Lifecycle state for one scripted behavior
pub struct Behavior {
    /// Shared component state
    pub core: ComponentCore,
    /// Variable-rate ticks received since creation
    pub update_count: u64,
    /// Fixed-rate ticks received since creation
    pub fixed_update_count: u64,
}

/// Store and tick driver for behavior components
#[derive(Default)]
pub struct BehaviorSystem {
    behaviors: SlotMap<BehaviorId, Behavior>,
}

impl BehaviorSystem {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create(&mut self, owner: GameObjectId, id: Guid) -> BehaviorId {
        self.behaviors.insert(Behavior {
            core: ComponentCore::new(id, owner),
            update_count: 0,
            fixed_update_count: 0,
        })
    }

    pub(crate) fn erase(&mut self, id: BehaviorId) -> Option<Behavior> {
        self.behaviors.remove(id)
    }

    /// Look up a behavior
    pub fn get(&self, id: BehaviorId) -> Option<&Behavior> {
        self.behaviors.get(id)
    }

    /// Look up a behavior mutably
    pub fn get_mut(&mut self, id: BehaviorId) -> Option<&mut Behavior> {
        self.behaviors.get_mut(id)
    }

    /// Number of live behaviors
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Fixed-rate tick, called once per fixed step before physics
    pub fn fixed_update(&mut self, scene: &Scene, _fixed_dt: f32) {
        for (_, behavior) in &mut self.behaviors {
            if !is_ticking(&behavior.core, scene) {
                continue;
            }
            behavior.fixed_update_count += 1;
        }
    }

    /// Variable-rate tick, called once per frame after transform retrieval
    pub fn update(&mut self, scene: &Scene, _dt: f32) {
        for (_, behavior) in &mut self.behaviors {
            if !is_ticking(&behavior.core, scene) {
                continue;
            }
            behavior.update_count += 1;
        }
    }
}

/// A component ticks iff it is live, its own flag is set, and its owner is
/// active through the whole ancestor chain
pub(crate) fn is_ticking(core: &ComponentCore, scene: &Scene) -> bool {
    !core.destroyed && core.active && scene.is_active_in_hierarchy(core.owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_owner_suppresses_ticks() {
        let mut scene = Scene::new();
        let mut system = BehaviorSystem::new();
        let go = scene.create_game_object("scripted");
        let id = system.create(go, Guid::new());

        system.update(&scene, 0.016);
        assert_eq!(system.get(id).unwrap().update_count, 1);

        scene.set_active(go, false);
        system.update(&scene, 0.016);
        assert_eq!(system.get(id).unwrap().update_count, 1);
    }
}
