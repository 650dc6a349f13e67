//! Component identity, capability kinds, and handle types
//!
//! The source-of-truth for what can be attached to a `GameObject`. Capabilities
//! form a closed sum type resolved by name at the editor/deserialization
//! boundary; there is no runtime reflection registry.

use crate::physics::collider::ShapeKind;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

slotmap::new_key_type! {
    /// Stable handle to a behavior component
    pub struct BehaviorId;
    /// Stable handle to a mesh renderer component
    pub struct MeshId;
    /// Stable handle to a skeletal mesh renderer component
    pub struct SkeletalMeshId;
    /// Stable handle to a light component
    pub struct LightId;
    /// Stable handle to a camera component
    pub struct CameraId;
    /// Stable handle to a particle emitter component
    pub struct ParticleId;
    /// Stable handle to a collider component
    pub struct ColliderId;
    /// Stable handle to a rigidbody component
    pub struct RigidbodyId;
    /// Stable handle to a sound emitter component
    pub struct SoundEmitterId;
    /// Stable handle to a sound listener component
    pub struct SoundListenerId;
}

static NEXT_GUID: AtomicU64 = AtomicU64::new(1);

/// Stable unique identifier for game objects and components
///
/// Freshly created objects allocate from a process-wide counter; the scene
/// deserialization layer passes persisted ids through `from_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(u64);

impl Guid {
    /// Allocate a new unique id
    pub fn new() -> Self {
        Self(NEXT_GUID.fetch_add(1, Ordering::Relaxed))
    }

    /// Reconstruct an id from its persisted raw value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw id value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for Guid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The declared capability of a component, used for dispatch
///
/// Exactly one specialized system accepts each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// Scripted gameplay behavior
    Behavior,
    /// Static mesh renderer
    Mesh,
    /// Skinned mesh renderer
    SkeletalMesh,
    /// Light source
    Light,
    /// Camera
    Camera,
    /// Particle emitter
    Particle,
    /// Physics collider with the given default shape
    Collider(ShapeKind),
    /// Physics rigidbody
    Rigidbody,
    /// Positional sound source
    SoundEmitter,
    /// Sound listener
    SoundListener,
}

impl ComponentKind {
    /// Resolve a capability from its editor/serialization name
    ///
    /// Returns `None` for an unknown name; the caller logs and aborts the add.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Behavior" => Some(Self::Behavior),
            "MeshRenderer" => Some(Self::Mesh),
            "SkeletalMeshRenderer" => Some(Self::SkeletalMesh),
            "Light" => Some(Self::Light),
            "Camera" => Some(Self::Camera),
            "ParticleEmitter" => Some(Self::Particle),
            "BoxCollider" => Some(Self::Collider(ShapeKind::Box)),
            "CapsuleCollider" => Some(Self::Collider(ShapeKind::Capsule)),
            "SphereCollider" => Some(Self::Collider(ShapeKind::Sphere)),
            "TerrainCollider" => Some(Self::Collider(ShapeKind::Terrain)),
            "Rigidbody" => Some(Self::Rigidbody),
            "SoundEmitter" => Some(Self::SoundEmitter),
            "SoundListener" => Some(Self::SoundListener),
            _ => None,
        }
    }

    /// Get the canonical name of this capability
    pub fn name(&self) -> &'static str {
        match self {
            Self::Behavior => "Behavior",
            Self::Mesh => "MeshRenderer",
            Self::SkeletalMesh => "SkeletalMeshRenderer",
            Self::Light => "Light",
            Self::Camera => "Camera",
            Self::Particle => "ParticleEmitter",
            Self::Collider(ShapeKind::Box) => "BoxCollider",
            Self::Collider(ShapeKind::Capsule) => "CapsuleCollider",
            Self::Collider(ShapeKind::Sphere) => "SphereCollider",
            Self::Collider(ShapeKind::Terrain) => "TerrainCollider",
            Self::Rigidbody => "Rigidbody",
            Self::SoundEmitter => "SoundEmitter",
            Self::SoundListener => "SoundListener",
        }
    }
}

/// Tagged handle to a component living in its owning system's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentRef {
    /// Behavior component handle
    Behavior(BehaviorId),
    /// Mesh renderer handle
    Mesh(MeshId),
    /// Skeletal mesh renderer handle
    SkeletalMesh(SkeletalMeshId),
    /// Light handle
    Light(LightId),
    /// Camera handle
    Camera(CameraId),
    /// Particle emitter handle
    Particle(ParticleId),
    /// Collider handle
    Collider(ColliderId),
    /// Rigidbody handle
    Rigidbody(RigidbodyId),
    /// Sound emitter handle
    SoundEmitter(SoundEmitterId),
    /// Sound listener handle
    SoundListener(SoundListenerId),
}

/// Lifecycle state embedded in every concrete component
#[derive(Debug, Clone)]
pub struct ComponentCore {
    /// Stable unique id, fixed for the component's lifetime
    pub id: Guid,
    /// Owning game object, fixed for the component's lifetime
    pub owner: super::GameObjectId,
    /// The component's own active flag
    pub active: bool,
    /// Set when destruction has been requested; physical erasure is deferred
    pub destroyed: bool,
}

impl ComponentCore {
    /// Create lifecycle state for a freshly attached component
    pub fn new(id: Guid, owner: super::GameObjectId) -> Self {
        Self {
            id,
            owner,
            active: true,
            destroyed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_name_round_trip() {
        let kinds = [
            "Behavior",
            "MeshRenderer",
            "SkeletalMeshRenderer",
            "Light",
            "Camera",
            "ParticleEmitter",
            "BoxCollider",
            "CapsuleCollider",
            "SphereCollider",
            "TerrainCollider",
            "Rigidbody",
            "SoundEmitter",
            "SoundListener",
        ];
        for name in kinds {
            let kind = ComponentKind::from_name(name).expect(name);
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn test_unknown_kind_name() {
        assert_eq!(ComponentKind::from_name("FluxCapacitor"), None);
    }

    #[test]
    fn test_guid_uniqueness() {
        let a = Guid::new();
        let b = Guid::new();
        assert_ne!(a, b);
    }
}
