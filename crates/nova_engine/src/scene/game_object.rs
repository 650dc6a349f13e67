//! Game object entity type

use super::component::{ComponentRef, Guid};
use super::GameObjectId;
use crate::foundation::math::Transform;

/// Engine entity: owns a transform and an ordered set of components, and is a
/// node in the parent/child scene tree
///
/// Component ownership is exclusive: destroying the game object destroys all
/// of its components. Parent and child links are non-owning ids; the scene
/// arena owns every game object.
#[derive(Debug)]
pub struct GameObject {
    id: Guid,
    /// Display name
    pub name: String,
    /// Static objects never move; physics wraps them in a static actor and
    /// skips transform synchronization for them
    pub is_static: bool,
    /// Local transform, relative to the parent (or the world when unparented)
    pub transform: Transform,
    pub(crate) active: bool,
    pub(crate) components: Vec<ComponentRef>,
    pub(crate) parent: Option<GameObjectId>,
    pub(crate) children: Vec<GameObjectId>,
}

impl GameObject {
    pub(crate) fn new(id: Guid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_static: false,
            transform: Transform::identity(),
            active: true,
            components: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Stable unique id
    pub fn id(&self) -> Guid {
        self.id
    }

    /// The object's own active flag (see `Scene::is_active_in_hierarchy` for
    /// the effective flag)
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ordered list of owned components
    pub fn components(&self) -> &[ComponentRef] {
        &self.components
    }

    /// Parent game object, if any
    pub fn parent(&self) -> Option<GameObjectId> {
        self.parent
    }

    /// Child game objects
    pub fn children(&self) -> &[GameObjectId] {
        &self.children
    }
}
