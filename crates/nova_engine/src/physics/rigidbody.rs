//! Rigidbody component
//!
//! Declares dynamic-body intent (mass, drag, constraints) without owning the
//! native actor; the actor handle is a non-owning reference installed once the
//! owning actor has been prepared for simulation.

use crate::physics::simulation::NativeActorId;
use crate::scene::component::ComponentCore;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Collision detection mode for fast-moving bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionDetectionMode {
    /// Test collisions at the end-of-step pose only
    #[default]
    Discrete,
    /// Sweep the body along its motion
    Continuous,
    /// Speculative contacts along the predicted motion
    ContinuousSpeculative,
}

bitflags! {
    /// Per-axis position/rotation freeze constraints
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct FreezeFlags: u8 {
        /// Freeze translation along X
        const POSITION_X = 1 << 0;
        /// Freeze translation along Y
        const POSITION_Y = 1 << 1;
        /// Freeze translation along Z
        const POSITION_Z = 1 << 2;
        /// Freeze rotation about X
        const ROTATION_X = 1 << 3;
        /// Freeze rotation about Y
        const ROTATION_Y = 1 << 4;
        /// Freeze rotation about Z
        const ROTATION_Z = 1 << 5;
    }
}

/// Rigidbody component, at most one per game object
#[derive(Debug)]
pub struct Rigidbody {
    /// Lifecycle state
    pub core: ComponentCore,
    mass: f32,
    density: f32,
    linear_drag: f32,
    angular_drag: f32,
    /// Whether world gravity acts on this body
    pub use_gravity: bool,
    /// Kinematic bodies move only under explicit transform writes
    pub is_kinematic: bool,
    /// Collision detection mode
    pub collision_detection: CollisionDetectionMode,
    /// Per-axis freeze constraints
    pub constraints: FreezeFlags,
    pub(crate) actor_handle: Option<NativeActorId>,
}

impl Rigidbody {
    pub(crate) fn new(core: ComponentCore) -> Self {
        Self {
            core,
            mass: 1.0,
            density: 1.0,
            linear_drag: 0.0,
            angular_drag: 0.05,
            use_gravity: true,
            is_kinematic: false,
            collision_detection: CollisionDetectionMode::Discrete,
            constraints: FreezeFlags::empty(),
            actor_handle: None,
        }
    }

    /// Body mass in kilograms
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the body mass; a negative value is a logged no-op
    pub fn set_mass(&mut self, mass: f32) {
        if mass < 0.0 {
            log::warn!("set_mass: ignored negative mass {mass}");
            return;
        }
        self.mass = mass;
    }

    /// Density used when recomputing mass from attached shapes
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Set the density; a negative value is a logged no-op
    pub fn set_density(&mut self, density: f32) {
        if density < 0.0 {
            log::warn!("set_density: ignored negative density {density}");
            return;
        }
        self.density = density;
    }

    /// Linear drag coefficient
    pub fn linear_drag(&self) -> f32 {
        self.linear_drag
    }

    /// Set linear drag; a negative value is a logged no-op
    pub fn set_linear_drag(&mut self, drag: f32) {
        if drag < 0.0 {
            log::warn!("set_linear_drag: ignored negative drag {drag}");
            return;
        }
        self.linear_drag = drag;
    }

    /// Angular drag coefficient
    pub fn angular_drag(&self) -> f32 {
        self.angular_drag
    }

    /// Set angular drag; a negative value is a logged no-op
    pub fn set_angular_drag(&mut self, drag: f32) {
        if drag < 0.0 {
            log::warn!("set_angular_drag: ignored negative drag {drag}");
            return;
        }
        self.angular_drag = drag;
    }

    /// Non-owning handle to the native actor, if currently simulated
    pub fn actor_handle(&self) -> Option<NativeActorId> {
        self.actor_handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::component::Guid;
    use crate::scene::GameObjectId;
    use approx::assert_relative_eq;

    fn test_body() -> Rigidbody {
        Rigidbody::new(ComponentCore::new(Guid::new(), GameObjectId::default()))
    }

    #[test]
    fn test_negative_mass_rejected() {
        let mut rb = test_body();
        rb.set_mass(2.0);
        rb.set_mass(-1.0);
        assert_relative_eq!(rb.mass(), 2.0);
    }

    #[test]
    fn test_negative_drag_rejected() {
        let mut rb = test_body();
        rb.set_linear_drag(-0.5);
        assert_relative_eq!(rb.linear_drag(), 0.0);
    }

    #[test]
    fn test_freeze_flags_compose() {
        let flags = FreezeFlags::POSITION_X | FreezeFlags::ROTATION_Z;
        assert!(flags.contains(FreezeFlags::POSITION_X));
        assert!(!flags.contains(FreezeFlags::POSITION_Y));
    }
}
