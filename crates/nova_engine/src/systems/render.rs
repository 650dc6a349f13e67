//! Render component stores
//!
//! The renderer itself lives outside this crate; these stores own the
//! scene-side state of everything a renderer would consume.

use crate::foundation::math::Vec3;
use crate::scene::component::{
    CameraId, ComponentCore, Guid, LightId, MeshId, SkeletalMeshId,
};
use crate::scene::{GameObjectId, Scene};
use crate::systems::behavior::is_ticking;
use slotmap::SlotMap;

/// Static mesh attachment
pub struct MeshRenderer {
    /// Shared component state
    pub core: ComponentCore,
    /// Asset key of the mesh to draw
    pub mesh_name: String,
    /// Draw toggle independent of activity
    pub visible: bool,
}

/// Skinned mesh attachment with an animation clock
pub struct SkeletalMeshRenderer {
    /// Shared component state
    pub core: ComponentCore,
    /// Asset key of the skinned mesh
    pub mesh_name: String,
    /// Seconds into the current animation
    pub animation_time: f32,
    /// Draw toggle independent of activity
    pub visible: bool,
}

/// Light source parameters
pub struct Light {
    /// Shared component state
    pub core: ComponentCore,
    /// Linear RGB color
    pub color: Vec3,
    /// Scalar intensity multiplier
    pub intensity: f32,
}

/// Camera projection parameters
pub struct Camera {
    /// Shared component state
    pub core: ComponentCore,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

/// Store for meshes, skeletal meshes, lights, and cameras
#[derive(Default)]
pub struct RenderSystem {
    meshes: SlotMap<MeshId, MeshRenderer>,
    skeletal_meshes: SlotMap<SkeletalMeshId, SkeletalMeshRenderer>,
    lights: SlotMap<LightId, Light>,
    cameras: SlotMap<CameraId, Camera>,
}

impl RenderSystem {
    /// Create empty stores
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create_mesh(&mut self, owner: GameObjectId, id: Guid) -> MeshId {
        self.meshes.insert(MeshRenderer {
            core: ComponentCore::new(id, owner),
            mesh_name: String::new(),
            visible: true,
        })
    }

    pub(crate) fn create_skeletal_mesh(
        &mut self,
        owner: GameObjectId,
        id: Guid,
    ) -> SkeletalMeshId {
        self.skeletal_meshes.insert(SkeletalMeshRenderer {
            core: ComponentCore::new(id, owner),
            mesh_name: String::new(),
            animation_time: 0.0,
            visible: true,
        })
    }

    pub(crate) fn create_light(&mut self, owner: GameObjectId, id: Guid) -> LightId {
        self.lights.insert(Light {
            core: ComponentCore::new(id, owner),
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
        })
    }

    pub(crate) fn create_camera(&mut self, owner: GameObjectId, id: Guid) -> CameraId {
        self.cameras.insert(Camera {
            core: ComponentCore::new(id, owner),
            fov_y: std::f32::consts::FRAC_PI_3,
            near: 0.1,
            far: 1000.0,
        })
    }

    pub(crate) fn erase_mesh(&mut self, id: MeshId) -> Option<MeshRenderer> {
        self.meshes.remove(id)
    }

    pub(crate) fn erase_skeletal_mesh(
        &mut self,
        id: SkeletalMeshId,
    ) -> Option<SkeletalMeshRenderer> {
        self.skeletal_meshes.remove(id)
    }

    pub(crate) fn erase_light(&mut self, id: LightId) -> Option<Light> {
        self.lights.remove(id)
    }

    pub(crate) fn erase_camera(&mut self, id: CameraId) -> Option<Camera> {
        self.cameras.remove(id)
    }

    /// Look up a mesh renderer
    pub fn mesh(&self, id: MeshId) -> Option<&MeshRenderer> {
        self.meshes.get(id)
    }

    /// Look up a mesh renderer mutably
    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut MeshRenderer> {
        self.meshes.get_mut(id)
    }

    /// Look up a skeletal mesh renderer
    pub fn skeletal_mesh(&self, id: SkeletalMeshId) -> Option<&SkeletalMeshRenderer> {
        self.skeletal_meshes.get(id)
    }

    /// Look up a skeletal mesh renderer mutably
    pub fn skeletal_mesh_mut(
        &mut self,
        id: SkeletalMeshId,
    ) -> Option<&mut SkeletalMeshRenderer> {
        self.skeletal_meshes.get_mut(id)
    }

    /// Look up a light
    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id)
    }

    /// Look up a light mutably
    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id)
    }

    /// Look up a camera
    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id)
    }

    /// Look up a camera mutably
    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id)
    }

    /// Variable-rate tick: advance skinned animation clocks
    pub fn update(&mut self, scene: &Scene, dt: f32) {
        for (_, skeletal) in &mut self.skeletal_meshes {
            if !is_ticking(&skeletal.core, scene) {
                continue;
            }
            skeletal.animation_time += dt;
        }
    }
}
