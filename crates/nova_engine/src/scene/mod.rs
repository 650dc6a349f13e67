//! Scene graph and entity runtime
//!
//! The `Scene` owns every `GameObject` in a slot-mapped arena; hierarchy links
//! and component attachments are stable keys, never raw pointers. Component
//! creation and destruction always flow through the `SystemManager` dispatcher
//! so the owning specialized system sees every lifecycle event.

pub mod component;
pub mod game_object;

pub use component::{ComponentCore, ComponentKind, ComponentRef, Guid};
pub use game_object::GameObject;

use crate::foundation::math::{Mat4, Transform};
use crate::systems::SystemManager;
use slotmap::SlotMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Stable handle to a game object in the scene arena
    pub struct GameObjectId;
}

/// Errors raised by scene hierarchy operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// Re-parenting would create a cycle in the hierarchy
    #[error("re-parenting would make a game object its own ancestor")]
    HierarchyCycle,

    /// A referenced game object no longer exists
    #[error("game object not found in scene")]
    MissingGameObject,
}

/// Container and arbiter for all game objects
#[derive(Default)]
pub struct Scene {
    game_objects: SlotMap<GameObjectId, GameObject>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game object with a fresh id
    pub fn create_game_object(&mut self, name: impl Into<String>) -> GameObjectId {
        self.create_game_object_with_id(name, Guid::new())
    }

    /// Create a game object with a persisted id (scene-load path)
    pub fn create_game_object_with_id(
        &mut self,
        name: impl Into<String>,
        id: Guid,
    ) -> GameObjectId {
        self.game_objects.insert(GameObject::new(id, name))
    }

    /// Destroy a game object, all of its components, and its hierarchy links
    ///
    /// Children are owned by the scene, not the parent, so they are detached
    /// rather than destroyed.
    pub fn destroy_game_object(&mut self, id: GameObjectId, systems: &mut SystemManager) {
        let Some(go) = self.game_objects.get(id) else {
            log::warn!("destroy_game_object: game object already removed");
            return;
        };
        let components = go.components.clone();
        let children = go.children.clone();
        let parent = go.parent;

        for comp in components {
            systems.destroy_component(self, comp);
        }
        for child in children {
            if let Some(child_go) = self.game_objects.get_mut(child) {
                child_go.parent = None;
            }
        }
        if let Some(parent) = parent {
            if let Some(parent_go) = self.game_objects.get_mut(parent) {
                parent_go.children.retain(|&c| c != id);
            }
        }
        self.game_objects.remove(id);
    }

    /// Look up a game object
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.game_objects.get(id)
    }

    /// Look up a game object mutably
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.game_objects.get_mut(id)
    }

    /// Iterate over all game objects
    pub fn iter(&self) -> impl Iterator<Item = (GameObjectId, &GameObject)> {
        self.game_objects.iter()
    }

    /// Number of live game objects
    pub fn len(&self) -> usize {
        self.game_objects.len()
    }

    /// Whether the scene is empty
    pub fn is_empty(&self) -> bool {
        self.game_objects.is_empty()
    }

    /// Attach a component of the given kind, routed through the dispatcher
    ///
    /// Returns `None` (after logging) when the owner is missing or the
    /// accepting system rejects the creation.
    pub fn add_component(
        &mut self,
        owner: GameObjectId,
        kind: ComponentKind,
        systems: &mut SystemManager,
    ) -> Option<ComponentRef> {
        self.add_component_with_id(owner, kind, Guid::new(), systems)
    }

    /// Attach a component with a persisted id (scene-load path)
    pub fn add_component_with_id(
        &mut self,
        owner: GameObjectId,
        kind: ComponentKind,
        id: Guid,
        systems: &mut SystemManager,
    ) -> Option<ComponentRef> {
        if !self.game_objects.contains_key(owner) {
            log::error!("add_component: owner game object not found");
            return None;
        }
        let comp = systems.create_component(self, owner, kind, id)?;
        if let Some(go) = self.game_objects.get_mut(owner) {
            go.components.push(comp);
        }
        Some(comp)
    }

    /// Resolve a capability by name and attach it
    ///
    /// An unknown name is a reported error: logged, returns `None`.
    pub fn add_component_from_name(
        &mut self,
        owner: GameObjectId,
        name: &str,
        id: Guid,
        systems: &mut SystemManager,
    ) -> Option<ComponentRef> {
        let Some(kind) = ComponentKind::from_name(name) else {
            log::error!("add_component_from_name: unknown capability '{name}'");
            return None;
        };
        self.add_component_with_id(owner, kind, id, systems)
    }

    /// Request destruction of a component
    ///
    /// Safe to call during iteration: the component is marked destroyed and
    /// physically erased at the dispatcher's next safe point.
    pub fn destroy_component(&mut self, comp: ComponentRef, systems: &mut SystemManager) {
        systems.destroy_component(self, comp);
    }

    /// Re-link `child` under `parent` (or to the root with `None`)
    ///
    /// Rejects a parent that is `child` itself or one of its descendants: an
    /// accepted cycle would be a fatal programmer error, so the hierarchy is
    /// left unchanged and the error is surfaced.
    pub fn set_parent(
        &mut self,
        child: GameObjectId,
        parent: Option<GameObjectId>,
    ) -> Result<(), SceneError> {
        if !self.game_objects.contains_key(child) {
            return Err(SceneError::MissingGameObject);
        }
        if let Some(parent) = parent {
            if !self.game_objects.contains_key(parent) {
                return Err(SceneError::MissingGameObject);
            }
            if parent == child || self.is_descendant_of(parent, child) {
                log::error!("set_parent: rejected, would create a hierarchy cycle");
                return Err(SceneError::HierarchyCycle);
            }
        }

        // Unlink from the old parent first.
        let old_parent = self.game_objects[child].parent;
        if let Some(old) = old_parent {
            if let Some(old_go) = self.game_objects.get_mut(old) {
                old_go.children.retain(|&c| c != child);
            }
        }
        self.game_objects[child].parent = parent;
        if let Some(parent) = parent {
            self.game_objects[parent].children.push(child);
        }
        Ok(())
    }

    /// Detach a game object from its parent, keeping it in the scene
    pub fn detach_from_parent(&mut self, id: GameObjectId) -> Result<(), SceneError> {
        self.set_parent(id, None)
    }

    /// Whether `candidate` sits anywhere below `ancestor` in the tree
    fn is_descendant_of(&self, candidate: GameObjectId, ancestor: GameObjectId) -> bool {
        let mut current = self.game_objects.get(candidate).and_then(|go| go.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.game_objects.get(id).and_then(|go| go.parent);
        }
        false
    }

    /// Set a game object's own active flag
    pub fn set_active(&mut self, id: GameObjectId, active: bool) {
        if let Some(go) = self.game_objects.get_mut(id) {
            go.active = active;
        } else {
            log::warn!("set_active: game object not found");
        }
    }

    /// Effective activity: the object's own flag and every ancestor's flag
    pub fn is_active_in_hierarchy(&self, id: GameObjectId) -> bool {
        let mut current = Some(id);
        while let Some(go_id) = current {
            let Some(go) = self.game_objects.get(go_id) else {
                return false;
            };
            if !go.active {
                return false;
            }
            current = go.parent;
        }
        true
    }

    /// World-space transform, derived from the parent chain
    pub fn world_transform(&self, id: GameObjectId) -> Option<Transform> {
        let go = self.game_objects.get(id)?;
        let mut world = go.transform.clone();
        let mut current = go.parent;
        while let Some(parent_id) = current {
            let parent = self.game_objects.get(parent_id)?;
            world = parent.transform.combine(&world);
            current = parent.parent;
        }
        Some(world)
    }

    /// World-space transformation matrix
    pub fn world_matrix(&self, id: GameObjectId) -> Option<Mat4> {
        self.world_transform(id).map(|t| t.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_hierarchy_cycle_rejected() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("a");
        let b = scene.create_game_object("b");

        scene.set_parent(a, Some(b)).unwrap();
        let result = scene.set_parent(b, Some(a));
        assert_eq!(result, Err(SceneError::HierarchyCycle));

        // Hierarchy unchanged by the rejected call.
        assert_eq!(scene.get(a).unwrap().parent(), Some(b));
        assert_eq!(scene.get(b).unwrap().parent(), None);
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut scene = Scene::new();
        let a = scene.create_game_object("a");
        assert_eq!(scene.set_parent(a, Some(a)), Err(SceneError::HierarchyCycle));
    }

    #[test]
    fn test_reparent_unlinks_old_parent() {
        let mut scene = Scene::new();
        let parent_a = scene.create_game_object("a");
        let parent_b = scene.create_game_object("b");
        let child = scene.create_game_object("child");

        scene.set_parent(child, Some(parent_a)).unwrap();
        scene.set_parent(child, Some(parent_b)).unwrap();

        assert!(scene.get(parent_a).unwrap().children().is_empty());
        assert_eq!(scene.get(parent_b).unwrap().children(), &[child]);
    }

    #[test]
    fn test_world_transform_composes_parent_chain() {
        let mut scene = Scene::new();
        let parent = scene.create_game_object("parent");
        let child = scene.create_game_object("child");
        scene.set_parent(child, Some(parent)).unwrap();

        scene.get_mut(parent).unwrap().transform.position = Vec3::new(1.0, 2.0, 3.0);
        scene.get_mut(child).unwrap().transform.position = Vec3::new(0.0, 1.0, 0.0);

        let world = scene.world_transform(child).unwrap();
        assert_relative_eq!(world.position.y, 3.0);
        assert_relative_eq!(world.position.x, 1.0);
    }

    #[test]
    fn test_active_in_hierarchy() {
        let mut scene = Scene::new();
        let parent = scene.create_game_object("parent");
        let child = scene.create_game_object("child");
        scene.set_parent(child, Some(parent)).unwrap();

        assert!(scene.is_active_in_hierarchy(child));
        scene.set_active(parent, false);
        assert!(!scene.is_active_in_hierarchy(child));
        assert!(scene.get(child).unwrap().is_active());
    }
}
