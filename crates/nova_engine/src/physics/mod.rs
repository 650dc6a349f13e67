//! Physics synchronization layer
//!
//! Bridges the scene's game objects to an internally owned rigid-body
//! simulation. Ownership is strictly layered: colliders and rigidbodies are
//! components holding non-owning native handles, each physics game object is
//! aggregated into exactly one `PhysicsActor` that exclusively owns its
//! native actor, and `PhysicsSimulation` exclusively owns the native world.

pub mod actor;
pub mod collider;
pub mod collision_layers;
pub mod rigidbody;
pub mod simulation;
pub mod system;

pub use actor::PhysicsActor;
pub use collider::{
    Collider, CollisionEvent, CollisionEventKind, CollisionInfo, PhysicsMaterial, ShapeKind,
    ShapeVariant,
};
pub use collision_layers::CollisionLayers;
pub use rigidbody::{CollisionDetectionMode, FreezeFlags, Rigidbody};
pub use simulation::{ContactEvent, PhysicsSimulation, Ray, RayHit};
pub use system::{ActorId, PhysicsConfig, PhysicsSystem};
