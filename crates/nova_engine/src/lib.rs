//! # Nova Engine
//!
//! A game-object/component runtime with a synchronized rigid-body physics
//! layer.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed game objects with stable handles, parent
//!   hierarchies, and activity propagation
//! - **Component Dispatch**: A closed set of component kinds routed through
//!   one dispatcher, with deferred end-of-frame destruction
//! - **Physics Synchronization**: Two-way transform sync between game objects
//!   and an exclusively owned rigid-body world
//! - **Fixed Timestep**: Deterministic accumulator-driven simulation stepping
//!   decoupled from the render frame rate
//! - **Collision Events**: Enter/stay/exit contacts and trigger events
//!   delivered to both colliders of each pair
//!
//! ## Quick Start
//!
//! ```rust
//! use nova_engine::prelude::*;
//!
//! let config = EngineConfig::default();
//! let mut scene = Scene::new();
//! let mut systems = SystemManager::new(&config);
//!
//! let ball = scene.create_game_object("ball");
//! scene.add_component(ball, ComponentKind::Collider(ShapeKind::Sphere), &mut systems);
//! scene.add_component(ball, ComponentKind::Rigidbody, &mut systems);
//!
//! systems.physics.start_physics(&scene);
//! systems.update(&mut scene, 1.0 / 60.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;
pub mod systems;

pub use config::{ConfigError, EngineConfig};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{ConfigError, EngineConfig},
        foundation::{
            math::{Mat4, Quat, Transform, Vec3},
            time::Timer,
        },
        physics::{
            Collider, CollisionEvent, CollisionEventKind, CollisionInfo, CollisionLayers,
            FreezeFlags, PhysicsMaterial, Ray, RayHit, Rigidbody, ShapeKind, ShapeVariant,
        },
        scene::{ComponentKind, ComponentRef, GameObject, GameObjectId, Guid, Scene, SceneError},
        systems::SystemManager,
    };
}
