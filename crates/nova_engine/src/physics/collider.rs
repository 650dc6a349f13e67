//! Collider component and shape parameter types
//!
//! A collider declares physics intent (shape, material, trigger flag) but
//! never owns a native physics object. Its only link to the simulation is a
//! non-owning shape handle, valid between `prepare_for_simulation` and the
//! next rebuild, and nulled in every teardown path.

use crate::foundation::math::Vec3;
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::simulation::NativeGeometry;
use crate::scene::component::{ColliderId, ComponentCore};
use crate::physics::simulation::NativeShapeId;
use serde::{Deserialize, Serialize};

/// Parameter-less shape discriminant, used for capability dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Axis-aligned box
    Box,
    /// Vertical capsule
    Capsule,
    /// Sphere
    Sphere,
    /// Height-field terrain
    Terrain,
}

/// Shape parameters in the collider's local space, before world scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeVariant {
    /// Box with half extents per axis
    Box {
        /// Half extents along x/y/z
        half_extents: Vec3,
    },
    /// Capsule aligned with the local Y axis
    Capsule {
        /// Capsule radius
        radius: f32,
        /// Half the cylindrical segment length (excluding the caps)
        half_height: f32,
    },
    /// Sphere
    Sphere {
        /// Sphere radius
        radius: f32,
    },
    /// Height-field terrain sampled on a regular grid
    Terrain {
        /// Row-major height samples, `rows * cols` entries
        heights: Vec<f32>,
        /// Number of sample rows (along z)
        rows: usize,
        /// Number of sample columns (along x)
        cols: usize,
        /// Distance between adjacent samples
        cell_size: f32,
    },
}

impl ShapeVariant {
    /// Default parameters for a freshly added collider of the given kind
    pub fn default_for(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Box => Self::Box {
                half_extents: Vec3::new(0.5, 0.5, 0.5),
            },
            ShapeKind::Capsule => Self::Capsule {
                radius: 0.5,
                half_height: 0.5,
            },
            ShapeKind::Sphere => Self::Sphere { radius: 0.5 },
            ShapeKind::Terrain => Self::Terrain {
                heights: Vec::new(),
                rows: 0,
                cols: 0,
                cell_size: 1.0,
            },
        }
    }

    /// The discriminant of this variant
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Box { .. } => ShapeKind::Box,
            Self::Capsule { .. } => ShapeKind::Capsule,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Terrain { .. } => ShapeKind::Terrain,
        }
    }
}

/// Surface response parameters for a collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction applied while at rest
    pub static_friction: f32,
    /// Friction applied while sliding
    pub dynamic_friction: f32,
    /// Bounciness in [0, 1]
    pub restitution: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            static_friction: 0.6,
            dynamic_friction: 0.6,
            restitution: 0.0,
        }
    }
}

/// Kind of contact or trigger notification delivered to a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEventKind {
    /// Contact began this step
    Enter,
    /// Contact persisted this step
    Stay,
    /// Contact ended this step
    Exit,
    /// Trigger overlap began this step
    TriggerEnter,
    /// Trigger overlap ended this step
    TriggerExit,
}

/// Payload delivered to behavior collaborators on contact/trigger events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// The other collider involved in the event
    pub other: ColliderId,
    /// Approximate contact point in world space
    pub point: Vec3,
    /// Contact normal, oriented away from the receiving collider
    pub normal: Vec3,
}

/// A queued contact/trigger notification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// What happened
    pub kind: CollisionEventKind,
    /// Who, where, which way
    pub info: CollisionInfo,
}

/// Physics collider component
#[derive(Debug)]
pub struct Collider {
    /// Lifecycle state
    pub core: ComponentCore,
    /// Shape parameters, local space
    pub shape: ShapeVariant,
    /// Trigger volumes detect overlap without physical response
    pub is_trigger: bool,
    /// Surface material
    pub material: PhysicsMaterial,
    /// Local center offset from the owner's origin
    pub center: Vec3,
    /// Collision layer for filtering
    pub layer: u32,
    /// Layers this collider interacts with
    pub mask: u32,
    pub(crate) shape_handle: Option<NativeShapeId>,
    pub(crate) events: Vec<CollisionEvent>,
}

impl Collider {
    pub(crate) fn new(core: ComponentCore, kind: ShapeKind) -> Self {
        Self {
            core,
            shape: ShapeVariant::default_for(kind),
            is_trigger: false,
            material: PhysicsMaterial::default(),
            center: Vec3::zeros(),
            layer: CollisionLayers::DEFAULT,
            mask: CollisionLayers::ALL,
            shape_handle: None,
            events: Vec::new(),
        }
    }

    /// Non-owning handle to the native shape, if currently simulated
    pub fn shape_handle(&self) -> Option<NativeShapeId> {
        self.shape_handle
    }

    /// Drain the contact/trigger events queued since the last call
    pub fn take_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, kind: CollisionEventKind, info: CollisionInfo) {
        self.events.push(CollisionEvent { kind, info });
    }
}

/// Build world-scaled native geometry from local shape parameters
///
/// Scale handling mirrors the usual rigid-body conventions: boxes scale per
/// axis, spheres by the largest axis, capsules radially by the larger of x/z
/// and lengthwise by y.
pub fn prepare_geometry(shape: &ShapeVariant, scale: Vec3) -> NativeGeometry {
    let scale = scale.abs();
    match shape {
        ShapeVariant::Box { half_extents } => NativeGeometry::Box {
            half_extents: half_extents.component_mul(&scale),
        },
        ShapeVariant::Capsule {
            radius,
            half_height,
        } => NativeGeometry::Capsule {
            radius: radius * scale.x.max(scale.z),
            half_height: half_height * scale.y,
        },
        ShapeVariant::Sphere { radius } => NativeGeometry::Sphere {
            radius: radius * scale.x.max(scale.y).max(scale.z),
        },
        ShapeVariant::Terrain {
            heights,
            rows,
            cols,
            cell_size,
        } => NativeGeometry::HeightField {
            heights: heights.iter().map(|h| h * scale.y).collect(),
            rows: *rows,
            cols: *cols,
            cell_size: cell_size * scale.x.max(scale.z),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_prepare_geometry_applies_scale() {
        let shape = ShapeVariant::Box {
            half_extents: Vec3::new(0.5, 1.0, 2.0),
        };
        let geometry = prepare_geometry(&shape, Vec3::new(2.0, 1.0, 0.5));
        match geometry {
            NativeGeometry::Box { half_extents } => {
                assert_relative_eq!(half_extents.x, 1.0);
                assert_relative_eq!(half_extents.y, 1.0);
                assert_relative_eq!(half_extents.z, 1.0);
            }
            _ => panic!("expected box geometry"),
        }
    }

    #[test]
    fn test_sphere_scales_by_largest_axis() {
        let shape = ShapeVariant::Sphere { radius: 1.0 };
        let geometry = prepare_geometry(&shape, Vec3::new(1.0, 3.0, 2.0));
        match geometry {
            NativeGeometry::Sphere { radius } => assert_relative_eq!(radius, 3.0),
            _ => panic!("expected sphere geometry"),
        }
    }

    #[test]
    fn test_default_shapes_match_kind() {
        for kind in [
            ShapeKind::Box,
            ShapeKind::Capsule,
            ShapeKind::Sphere,
            ShapeKind::Terrain,
        ] {
            assert_eq!(ShapeVariant::default_for(kind).kind(), kind);
        }
    }
}
