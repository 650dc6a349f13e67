//! Native rigid-body world facade
//!
//! `PhysicsSimulation` exclusively owns the physics world: actors, shapes, and
//! materials live in slot-mapped arenas, and every factory method transfers
//! ownership of the returned handle to the caller, which must release it.
//! Stepping is synchronous: `step_simulation` returns only after integration,
//! overlap detection, and event generation have completed on the calling
//! thread. The world is not safe for concurrent native calls; exclusive
//! borrows enforce that statically.
//!
//! Shape user-data carries the owning collider's arena key across the
//! boundary. A shape whose user-data is unset (created but not yet linked) is
//! skipped during event translation, never dereferenced.

use crate::foundation::math::{Quat, Vec3};
use crate::physics::collider::{CollisionEventKind, PhysicsMaterial};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::rigidbody::{CollisionDetectionMode, FreezeFlags};
use crate::scene::component::ColliderId;
use slotmap::SlotMap;
use std::collections::HashMap;

slotmap::new_key_type! {
    /// Handle to a native rigid actor
    pub struct NativeActorId;
    /// Handle to a native collision shape
    pub struct NativeShapeId;
    /// Handle to a native surface material
    pub struct NativeMaterialId;
}

/// Bodies never drop below this mass when recomputed from density
const MIN_MASS: f32 = 1.0e-3;

/// World-scaled geometry owned by a native shape
#[derive(Debug, Clone, PartialEq)]
pub enum NativeGeometry {
    /// Sphere
    Sphere {
        /// World-space radius
        radius: f32,
    },
    /// Box, tested as world-aligned bounds
    Box {
        /// World-space half extents
        half_extents: Vec3,
    },
    /// Capsule along the actor's local Y axis
    Capsule {
        /// World-space radius
        radius: f32,
        /// Half the cylindrical segment length
        half_height: f32,
    },
    /// Height-field grid anchored at the shape's world center
    HeightField {
        /// Row-major height samples
        heights: Vec<f32>,
        /// Sample rows (along z)
        rows: usize,
        /// Sample columns (along x)
        cols: usize,
        /// Sample spacing
        cell_size: f32,
    },
}

impl NativeGeometry {
    /// Volume used for density-based mass recomputation
    fn volume(&self) -> f32 {
        match self {
            Self::Sphere { radius } => 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3),
            Self::Box { half_extents } => 8.0 * half_extents.x * half_extents.y * half_extents.z,
            Self::Capsule {
                radius,
                half_height,
            } => {
                let cylinder = std::f32::consts::PI * radius * radius * (2.0 * half_height);
                let caps = 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3);
                cylinder + caps
            }
            // Height fields are static-only terrain; they contribute no mass.
            Self::HeightField { .. } => 0.0,
        }
    }
}

/// A ray for scene queries
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized on construction)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The actor whose shape was hit
    pub actor: NativeActorId,
    /// The collider linked to the hit shape, if linked
    pub collider: Option<ColliderId>,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// Contact/trigger notification produced by a simulation step
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    /// What happened
    pub kind: CollisionEventKind,
    /// First collider of the pair
    pub a: ColliderId,
    /// Second collider of the pair
    pub b: ColliderId,
    /// Approximate contact point in world space
    pub point: Vec3,
    /// Contact normal, oriented from `a` toward `b`
    pub normal: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActorKind {
    Static,
    Dynamic { kinematic: bool },
}

#[derive(Debug)]
struct NativeActor {
    kind: ActorKind,
    position: Vec3,
    rotation: Quat,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    mass: f32,
    use_gravity: bool,
    linear_drag: f32,
    angular_drag: f32,
    constraints: FreezeFlags,
    collision_detection: CollisionDetectionMode,
    force_accum: Vec3,
    torque_accum: Vec3,
    shapes: Vec<NativeShapeId>,
}

impl NativeActor {
    fn new(kind: ActorKind, position: Vec3, rotation: Quat) -> Self {
        Self {
            kind,
            position,
            rotation,
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            mass: 1.0,
            use_gravity: true,
            linear_drag: 0.0,
            angular_drag: 0.05,
            constraints: FreezeFlags::empty(),
            collision_detection: CollisionDetectionMode::Discrete,
            force_accum: Vec3::zeros(),
            torque_accum: Vec3::zeros(),
            shapes: Vec::new(),
        }
    }

    fn is_simulated(&self) -> bool {
        matches!(self.kind, ActorKind::Dynamic { kinematic: false })
    }

    fn inverse_mass(&self) -> f32 {
        if self.is_simulated() && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

#[derive(Debug)]
struct NativeShape {
    geometry: NativeGeometry,
    local_offset: Vec3,
    material: NativeMaterialId,
    is_trigger: bool,
    layer: u32,
    mask: u32,
    user_data: Option<ColliderId>,
}

#[derive(Debug, Clone, Copy)]
struct NativeMaterial {
    #[allow(dead_code)] // consumed once friction response lands (see step_simulation)
    static_friction: f32,
    #[allow(dead_code)]
    dynamic_friction: f32,
    restitution: f32,
}

type PairKey = (NativeShapeId, NativeShapeId);

#[derive(Debug, Clone, Copy)]
struct PairContact {
    point: Vec3,
    normal: Vec3,
    is_trigger: bool,
}

struct NativeWorld {
    gravity: Vec3,
    actors: SlotMap<NativeActorId, NativeActor>,
    shapes: SlotMap<NativeShapeId, NativeShape>,
    materials: SlotMap<NativeMaterialId, NativeMaterial>,
    previous_pairs: HashMap<PairKey, PairContact>,
    events: Vec<ContactEvent>,
}

impl NativeWorld {
    fn new(gravity: Vec3) -> Self {
        Self {
            gravity,
            actors: SlotMap::with_key(),
            shapes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            previous_pairs: HashMap::new(),
            events: Vec::new(),
        }
    }
}

/// Facade over the native physics world
///
/// `create`/`destroy` bracket the world's existence and are idempotent; every
/// other operation on a missing world is a logged no-op or empty query.
pub struct PhysicsSimulation {
    world: Option<NativeWorld>,
}

impl Default for PhysicsSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSimulation {
    /// Create the facade without a world
    pub fn new() -> Self {
        Self { world: None }
    }

    /// Create the native world; a second call is a no-op
    pub fn create(&mut self, gravity: Vec3) {
        if self.world.is_some() {
            log::debug!("physics simulation already created");
            return;
        }
        log::info!("creating physics simulation (gravity {gravity:?})");
        self.world = Some(NativeWorld::new(gravity));
    }

    /// Destroy the native world and everything it owns; idempotent
    pub fn destroy(&mut self) {
        if self.world.take().is_some() {
            log::info!("destroyed physics simulation");
        }
    }

    /// Whether the world currently exists
    pub fn is_created(&self) -> bool {
        self.world.is_some()
    }

    // ---- factories ------------------------------------------------------

    /// Create a native material; ownership transfers to the caller
    pub fn create_material(&mut self, material: &PhysicsMaterial) -> Option<NativeMaterialId> {
        let world = self.world_mut("create_material")?;
        Some(world.materials.insert(NativeMaterial {
            static_friction: material.static_friction,
            dynamic_friction: material.dynamic_friction,
            restitution: material.restitution,
        }))
    }

    /// Release a native material
    pub fn release_material(&mut self, id: NativeMaterialId) {
        if let Some(world) = &mut self.world {
            world.materials.remove(id);
        }
    }

    /// Create a native shape; ownership transfers to the caller
    pub fn create_shape(
        &mut self,
        geometry: NativeGeometry,
        material: NativeMaterialId,
        is_trigger: bool,
        local_offset: Vec3,
        layer: u32,
        mask: u32,
        user_data: Option<ColliderId>,
    ) -> Option<NativeShapeId> {
        let world = self.world_mut("create_shape")?;
        Some(world.shapes.insert(NativeShape {
            geometry,
            local_offset,
            material,
            is_trigger,
            layer,
            mask,
            user_data,
        }))
    }

    /// Release a native shape and forget any contact pairs it was part of
    pub fn release_shape(&mut self, id: NativeShapeId) {
        if let Some(world) = &mut self.world {
            if let Some(shape) = world.shapes.remove(id) {
                world.materials.remove(shape.material);
            }
            world.previous_pairs.retain(|&(a, b), _| a != id && b != id);
        }
    }

    /// Overwrite the geometry of an existing shape in place
    ///
    /// Attachment, material, filtering, and user-data are untouched; contact
    /// pairs involving the shape are re-evaluated on the next step.
    pub fn set_shape_geometry(&mut self, id: NativeShapeId, geometry: NativeGeometry) {
        let Some(world) = self.world_mut("set_shape_geometry") else {
            return;
        };
        if let Some(shape) = world.shapes.get_mut(id) {
            shape.geometry = geometry;
        } else {
            log::error!("set_shape_geometry: shape handle is stale");
        }
    }

    /// Cook a height-field geometry from row-major samples
    ///
    /// Returns `None` (logged) when the sample count does not match the grid.
    pub fn create_height_field(
        &self,
        heights: Vec<f32>,
        rows: usize,
        cols: usize,
        cell_size: f32,
    ) -> Option<NativeGeometry> {
        if heights.len() != rows * cols || rows < 2 || cols < 2 || cell_size <= 0.0 {
            log::error!(
                "create_height_field: invalid grid ({rows}x{cols}, {} samples)",
                heights.len()
            );
            return None;
        }
        Some(NativeGeometry::HeightField {
            heights,
            rows,
            cols,
            cell_size,
        })
    }

    /// Create a dynamic actor; ownership transfers to the caller
    pub fn create_dynamic_actor(
        &mut self,
        position: Vec3,
        rotation: Quat,
        kinematic: bool,
    ) -> Option<NativeActorId> {
        let world = self.world_mut("create_dynamic_actor")?;
        Some(
            world
                .actors
                .insert(NativeActor::new(ActorKind::Dynamic { kinematic }, position, rotation)),
        )
    }

    /// Create a static actor; ownership transfers to the caller
    pub fn create_static_actor(&mut self, position: Vec3, rotation: Quat) -> Option<NativeActorId> {
        let world = self.world_mut("create_static_actor")?;
        Some(
            world
                .actors
                .insert(NativeActor::new(ActorKind::Static, position, rotation)),
        )
    }

    /// Release a native actor, including any shapes still attached
    pub fn release_actor(&mut self, id: NativeActorId) {
        let Some(world) = &mut self.world else {
            return;
        };
        let Some(actor) = world.actors.remove(id) else {
            return;
        };
        // Callers normally detach and release shapes first; clean up stragglers.
        for shape in actor.shapes {
            if let Some(shape) = world.shapes.remove(shape) {
                world.materials.remove(shape.material);
            }
            world
                .previous_pairs
                .retain(|&(a, b), _| a != shape && b != shape);
        }
    }

    /// Attach a shape to an actor
    pub fn attach_shape(&mut self, actor: NativeActorId, shape: NativeShapeId) {
        let Some(world) = self.world_mut("attach_shape") else {
            return;
        };
        if !world.shapes.contains_key(shape) {
            log::error!("attach_shape: shape handle is stale");
            return;
        }
        if let Some(actor) = world.actors.get_mut(actor) {
            actor.shapes.push(shape);
        } else {
            log::error!("attach_shape: actor handle is stale");
        }
    }

    /// Detach a shape from an actor without releasing it
    pub fn detach_shape(&mut self, actor: NativeActorId, shape: NativeShapeId) {
        if let Some(world) = &mut self.world {
            if let Some(actor) = world.actors.get_mut(actor) {
                actor.shapes.retain(|&s| s != shape);
            }
        }
    }

    // ---- actor state ----------------------------------------------------

    /// Write an actor's world pose
    pub fn set_global_pose(&mut self, actor: NativeActorId, position: Vec3, rotation: Quat) {
        if let Some(actor) = self.actor_mut(actor, "set_global_pose") {
            actor.position = position;
            actor.rotation = rotation;
        }
    }

    /// Read an actor's world pose
    pub fn global_pose(&self, actor: NativeActorId) -> Option<(Vec3, Quat)> {
        let actor = self.world.as_ref()?.actors.get(actor)?;
        Some((actor.position, actor.rotation))
    }

    /// Read an actor's linear velocity
    pub fn linear_velocity(&self, actor: NativeActorId) -> Option<Vec3> {
        Some(self.world.as_ref()?.actors.get(actor)?.linear_velocity)
    }

    /// Write an actor's linear velocity
    pub fn set_linear_velocity(&mut self, actor: NativeActorId, velocity: Vec3) {
        if let Some(actor) = self.actor_mut(actor, "set_linear_velocity") {
            actor.linear_velocity = velocity;
        }
    }

    /// Read an actor's angular velocity
    pub fn angular_velocity(&self, actor: NativeActorId) -> Option<Vec3> {
        Some(self.world.as_ref()?.actors.get(actor)?.angular_velocity)
    }

    /// Write an actor's angular velocity
    pub fn set_angular_velocity(&mut self, actor: NativeActorId, velocity: Vec3) {
        if let Some(actor) = self.actor_mut(actor, "set_angular_velocity") {
            actor.angular_velocity = velocity;
        }
    }

    /// Accumulate a force, applied at the next step
    pub fn add_force(&mut self, actor: NativeActorId, force: Vec3) {
        if let Some(actor) = self.actor_mut(actor, "add_force") {
            actor.force_accum += force;
        }
    }

    /// Accumulate a torque, applied at the next step
    pub fn add_torque(&mut self, actor: NativeActorId, torque: Vec3) {
        if let Some(actor) = self.actor_mut(actor, "add_torque") {
            actor.torque_accum += torque;
        }
    }

    /// Configure a dynamic actor's simulation parameters
    ///
    /// The collision detection mode is recorded per actor; the solver steps
    /// all bodies discretely, so the mode currently only informs queries.
    pub fn configure_dynamic(
        &mut self,
        actor: NativeActorId,
        mass: f32,
        use_gravity: bool,
        linear_drag: f32,
        angular_drag: f32,
        constraints: FreezeFlags,
        collision_detection: CollisionDetectionMode,
    ) {
        if let Some(actor) = self.actor_mut(actor, "configure_dynamic") {
            actor.mass = mass.max(MIN_MASS);
            actor.use_gravity = use_gravity;
            actor.linear_drag = linear_drag;
            actor.angular_drag = angular_drag;
            actor.constraints = constraints;
            actor.collision_detection = collision_detection;
        }
    }

    /// Read an actor's configured collision detection mode
    pub fn collision_detection(&self, actor: NativeActorId) -> Option<CollisionDetectionMode> {
        Some(self.world.as_ref()?.actors.get(actor)?.collision_detection)
    }

    /// Recompute mass from density and attached shape volumes
    ///
    /// Mass properties are undefined before shapes are attached, so callers
    /// must invoke this after the last `attach_shape`.
    pub fn update_mass_and_inertia(&mut self, actor: NativeActorId, density: f32) {
        let Some(world) = &mut self.world else {
            log::error!("update_mass_and_inertia: no simulation");
            return;
        };
        let Some(native) = world.actors.get(actor) else {
            log::error!("update_mass_and_inertia: actor handle is stale");
            return;
        };
        let volume: f32 = native
            .shapes
            .iter()
            .filter_map(|&s| world.shapes.get(s))
            .map(|s| s.geometry.volume())
            .sum();
        let mass = (density * volume).max(MIN_MASS);
        world.actors[actor].mass = mass;
    }

    // ---- stepping -------------------------------------------------------

    /// Advance the world by exactly `dt` seconds
    ///
    /// Blocking: integration, overlap detection, contact response, and event
    /// generation all complete before this returns. The caller owns the
    /// choice of a stable `dt`.
    pub fn step_simulation(&mut self, dt: f32) {
        let Some(world) = &mut self.world else {
            log::warn!("step_simulation: no simulation created");
            return;
        };
        if dt <= 0.0 {
            return;
        }

        integrate(world, dt);
        let contacts = detect_overlaps(world);
        respond_and_emit(world, contacts);
    }

    /// Drain the events produced by steps since the last call
    pub fn take_events(&mut self) -> Vec<ContactEvent> {
        match &mut self.world {
            Some(world) => std::mem::take(&mut world.events),
            None => Vec::new(),
        }
    }

    // ---- queries --------------------------------------------------------

    /// Find all shapes intersecting the ray within `max_distance`, sorted by
    /// distance; `layer_mask` filters by shape layer
    pub fn raycast_all(&self, ray: &Ray, max_distance: f32, layer_mask: u32) -> Vec<RayHit> {
        let Some(world) = &self.world else {
            log::warn!("raycast: no simulation created");
            return Vec::new();
        };
        let mut hits = Vec::new();
        for (actor_id, actor) in &world.actors {
            for &shape_id in &actor.shapes {
                let Some(shape) = world.shapes.get(shape_id) else {
                    continue;
                };
                if shape.layer & layer_mask == 0 {
                    continue;
                }
                let center = actor.position + actor.rotation * shape.local_offset;
                if let Some((t, point, normal)) =
                    raycast_geometry(&shape.geometry, center, actor.rotation, ray, max_distance)
                {
                    hits.push(RayHit {
                        actor: actor_id,
                        collider: shape.user_data,
                        distance: t,
                        point,
                        normal,
                    });
                }
            }
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Find the closest shape intersecting the ray
    pub fn raycast(&self, ray: &Ray, max_distance: f32, layer_mask: u32) -> Option<RayHit> {
        self.raycast_all(ray, max_distance, layer_mask).into_iter().next()
    }

    // ---- internals ------------------------------------------------------

    fn world_mut(&mut self, op: &str) -> Option<&mut NativeWorld> {
        if self.world.is_none() {
            log::error!("{op}: no simulation created");
        }
        self.world.as_mut()
    }

    fn actor_mut(&mut self, id: NativeActorId, op: &str) -> Option<&mut NativeActor> {
        let world = self.world_mut(op)?;
        let actor = world.actors.get_mut(id);
        if actor.is_none() {
            log::error!("{op}: actor handle is stale");
        }
        actor
    }
}

/// Semi-implicit integration with a position term exact under constant
/// acceleration: `x += v*dt + a*dt^2/2`, then `v += a*dt`.
fn integrate(world: &mut NativeWorld, dt: f32) {
    let gravity = world.gravity;
    for (_, actor) in &mut world.actors {
        if !actor.is_simulated() {
            continue;
        }
        let mut accel = actor.force_accum / actor.mass;
        if actor.use_gravity {
            accel += gravity;
        }
        let mut ang_accel = actor.torque_accum / actor.mass;
        actor.force_accum = Vec3::zeros();
        actor.torque_accum = Vec3::zeros();

        apply_freeze(&mut accel, actor.constraints, false);
        apply_freeze(&mut ang_accel, actor.constraints, true);

        let mut delta = (actor.linear_velocity + accel * (0.5 * dt)) * dt;
        apply_freeze(&mut delta, actor.constraints, false);
        actor.position += delta;

        actor.linear_velocity += accel * dt;
        actor.linear_velocity /= 1.0 + actor.linear_drag * dt;
        apply_freeze(&mut actor.linear_velocity, actor.constraints, false);

        actor.angular_velocity += ang_accel * dt;
        actor.angular_velocity /= 1.0 + actor.angular_drag * dt;
        apply_freeze(&mut actor.angular_velocity, actor.constraints, true);

        if actor.angular_velocity.norm_squared() > 0.0 {
            let spin = nalgebra::UnitQuaternion::from_scaled_axis(actor.angular_velocity * dt);
            actor.rotation = spin * actor.rotation;
        }
    }
}

fn apply_freeze(v: &mut Vec3, constraints: FreezeFlags, rotation: bool) {
    let (fx, fy, fz) = if rotation {
        (
            FreezeFlags::ROTATION_X,
            FreezeFlags::ROTATION_Y,
            FreezeFlags::ROTATION_Z,
        )
    } else {
        (
            FreezeFlags::POSITION_X,
            FreezeFlags::POSITION_Y,
            FreezeFlags::POSITION_Z,
        )
    };
    if constraints.contains(fx) {
        v.x = 0.0;
    }
    if constraints.contains(fy) {
        v.y = 0.0;
    }
    if constraints.contains(fz) {
        v.z = 0.0;
    }
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    point: Vec3,
    /// Oriented from shape `a` toward shape `b`
    normal: Vec3,
    penetration: f32,
}

struct DetectedPair {
    key: PairKey,
    actors: (NativeActorId, NativeActorId),
    contact: Contact,
    is_trigger: bool,
}

/// Pairwise overlap detection across all attached shapes
///
/// Static-static pairs and same-actor pairs are skipped; the layer/mask
/// filter applies to everything else.
fn detect_overlaps(world: &NativeWorld) -> Vec<DetectedPair> {
    struct Entry {
        actor: NativeActorId,
        shape: NativeShapeId,
        center: Vec3,
        rotation: Quat,
    }
    let mut entries = Vec::new();
    for (actor_id, actor) in &world.actors {
        for &shape_id in &actor.shapes {
            let Some(shape) = world.shapes.get(shape_id) else {
                continue;
            };
            entries.push(Entry {
                actor: actor_id,
                shape: shape_id,
                center: actor.position + actor.rotation * shape.local_offset,
                rotation: actor.rotation,
            });
        }
    }

    let mut pairs = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let (ea, eb) = (&entries[i], &entries[j]);
            if ea.actor == eb.actor {
                continue;
            }
            let (actor_a, actor_b) = (&world.actors[ea.actor], &world.actors[eb.actor]);
            if actor_a.kind == ActorKind::Static && actor_b.kind == ActorKind::Static {
                continue;
            }
            let (sa, sb) = (&world.shapes[ea.shape], &world.shapes[eb.shape]);
            if !CollisionLayers::should_collide(sa.layer, sa.mask, sb.layer, sb.mask) {
                continue;
            }
            let Some(contact) = test_overlap(
                &sa.geometry,
                ea.center,
                ea.rotation,
                &sb.geometry,
                eb.center,
                eb.rotation,
            ) else {
                continue;
            };
            let key = if ea.shape <= eb.shape {
                (ea.shape, eb.shape)
            } else {
                (eb.shape, ea.shape)
            };
            // Keep the stored normal oriented min-key -> max-key.
            let contact = if key.0 == ea.shape {
                contact
            } else {
                Contact {
                    point: contact.point,
                    normal: -contact.normal,
                    penetration: contact.penetration,
                }
            };
            pairs.push(DetectedPair {
                key,
                actors: if key.0 == ea.shape {
                    (ea.actor, eb.actor)
                } else {
                    (eb.actor, ea.actor)
                },
                contact,
                is_trigger: sa.is_trigger || sb.is_trigger,
            });
        }
    }
    pairs
}

/// Contact response plus enter/stay/exit event synthesis
///
/// The current pair set is diffed against the previous step's set: new pairs
/// produce Enter events, surviving contact pairs Stay, vanished pairs Exit
/// (triggers get Enter/Exit only).
fn respond_and_emit(world: &mut NativeWorld, pairs: Vec<DetectedPair>) {
    let mut current: HashMap<PairKey, PairContact> = HashMap::with_capacity(pairs.len());

    for pair in &pairs {
        if !pair.is_trigger {
            resolve_contact(world, pair);
        }
        current.insert(
            pair.key,
            PairContact {
                point: pair.contact.point,
                normal: pair.contact.normal,
                is_trigger: pair.is_trigger,
            },
        );
        let existed = world.previous_pairs.contains_key(&pair.key);
        let kind = match (pair.is_trigger, existed) {
            (true, false) => Some(CollisionEventKind::TriggerEnter),
            (true, true) => None,
            (false, false) => Some(CollisionEventKind::Enter),
            (false, true) => Some(CollisionEventKind::Stay),
        };
        if let Some(kind) = kind {
            emit_event(world, pair.key, kind, pair.contact.point, pair.contact.normal);
        }
    }

    let previous = std::mem::take(&mut world.previous_pairs);
    for (key, last) in previous {
        if current.contains_key(&key) {
            continue;
        }
        let kind = if last.is_trigger {
            CollisionEventKind::TriggerExit
        } else {
            CollisionEventKind::Exit
        };
        emit_event(world, key, kind, last.point, last.normal);
    }
    world.previous_pairs = current;
}

fn emit_event(
    world: &mut NativeWorld,
    key: PairKey,
    kind: CollisionEventKind,
    point: Vec3,
    normal: Vec3,
) {
    // Unlinked shapes (user-data unset) are skipped, never dereferenced.
    let a = world.shapes.get(key.0).and_then(|s| s.user_data);
    let b = world.shapes.get(key.1).and_then(|s| s.user_data);
    if let (Some(a), Some(b)) = (a, b) {
        world.events.push(ContactEvent {
            kind,
            a,
            b,
            point,
            normal,
        });
    }
}

/// Minimal positional + velocity response for a non-trigger contact
fn resolve_contact(world: &mut NativeWorld, pair: &DetectedPair) {
    let (id_a, id_b) = pair.actors;
    let restitution = {
        let rest = |shape: NativeShapeId| {
            world
                .shapes
                .get(shape)
                .and_then(|s| world.materials.get(s.material))
                .map_or(0.0, |m| m.restitution)
        };
        rest(pair.key.0).max(rest(pair.key.1))
    };

    let inv_a = world.actors[id_a].inverse_mass();
    let inv_b = world.actors[id_b].inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    let normal = pair.contact.normal;

    // Positional correction, split by inverse mass.
    let correction = normal * (pair.contact.penetration / inv_sum);
    world.actors[id_a].position -= correction * inv_a;
    world.actors[id_b].position += correction * inv_b;

    // Impulse along the normal when approaching.
    let relative = world.actors[id_b].linear_velocity - world.actors[id_a].linear_velocity;
    let approach = relative.dot(&normal);
    if approach < 0.0 {
        let impulse = -(1.0 + restitution) * approach / inv_sum;
        let change = normal * impulse;
        world.actors[id_a].linear_velocity -= change * inv_a;
        world.actors[id_b].linear_velocity += change * inv_b;
    }
}

// ---- narrow phase --------------------------------------------------------

/// Capsule endpoints in world space (axis is the actor's local Y)
fn capsule_segment(center: Vec3, rotation: Quat, half_height: f32) -> (Vec3, Vec3) {
    let axis = rotation * Vec3::new(0.0, half_height, 0.0);
    (center - axis, center + axis)
}

fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

fn closest_points_between_segments(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> (Vec3, Vec3) {
    // Ericson, Real-Time Collision Detection, 5.1.9 (clamped to both segments).
    let d1 = a1 - a0;
    let d2 = b1 - b0;
    let r = a0 - b0;
    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let (s, t);
    if a <= f32::EPSILON && e <= f32::EPSILON {
        return (a0, b0);
    }
    if a <= f32::EPSILON {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e <= f32::EPSILON {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s_tmp = if denom > f32::EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t_tmp = (b * s_tmp + f) / e;
            if t_tmp < 0.0 {
                t_tmp = 0.0;
                s_tmp = (-c / a).clamp(0.0, 1.0);
            } else if t_tmp > 1.0 {
                t_tmp = 1.0;
                s_tmp = ((b - c) / a).clamp(0.0, 1.0);
            }
            s = s_tmp;
            t = t_tmp;
        }
    }
    (a0 + d1 * s, b0 + d2 * t)
}

fn sphere_sphere(ca: Vec3, ra: f32, cb: Vec3, rb: f32) -> Option<Contact> {
    let delta = cb - ca;
    let dist_sq = delta.norm_squared();
    let radius_sum = ra + rb;
    if dist_sq > radius_sum * radius_sum {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 1.0e-6 {
        delta / dist
    } else {
        Vec3::y()
    };
    let penetration = radius_sum - dist;
    Some(Contact {
        point: ca + normal * (ra - 0.5 * penetration),
        normal,
        penetration,
    })
}

fn sphere_aabb(ca: Vec3, ra: f32, cb: Vec3, hb: Vec3) -> Option<Contact> {
    let local = ca - cb;
    let clamped = Vec3::new(
        local.x.clamp(-hb.x, hb.x),
        local.y.clamp(-hb.y, hb.y),
        local.z.clamp(-hb.z, hb.z),
    );
    let closest = cb + clamped;
    let delta = closest - ca;
    let dist_sq = delta.norm_squared();
    if dist_sq > ra * ra {
        return None;
    }
    if dist_sq > 1.0e-12 {
        let dist = dist_sq.sqrt();
        Some(Contact {
            point: closest,
            normal: delta / dist,
            penetration: ra - dist,
        })
    } else {
        // Sphere center inside the box: exit along the axis of least depth.
        let depths = hb - local.abs();
        let (normal, depth) = if depths.x <= depths.y && depths.x <= depths.z {
            (Vec3::x() * local.x.signum(), depths.x)
        } else if depths.y <= depths.z {
            (Vec3::y() * local.y.signum(), depths.y)
        } else {
            (Vec3::z() * local.z.signum(), depths.z)
        };
        Some(Contact {
            point: ca,
            normal: -normal,
            penetration: depth + ra,
        })
    }
}

fn aabb_aabb(ca: Vec3, ha: Vec3, cb: Vec3, hb: Vec3) -> Option<Contact> {
    let delta = cb - ca;
    let overlap = ha + hb - delta.abs();
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }
    let (normal, penetration) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (Vec3::x() * delta.x.signum(), overlap.x)
    } else if overlap.y <= overlap.z {
        (Vec3::y() * delta.y.signum(), overlap.y)
    } else {
        (Vec3::z() * delta.z.signum(), overlap.z)
    };
    Some(Contact {
        point: ca + delta * 0.5,
        normal,
        penetration,
    })
}

fn height_at(heights: &[f32], rows: usize, cols: usize, cell: f32, x: f32, z: f32) -> Option<f32> {
    if rows < 2 || cols < 2 {
        return None;
    }
    let fx = x / cell;
    let fz = z / cell;
    if fx < 0.0 || fz < 0.0 {
        return None;
    }
    let (ix, iz) = (fx as usize, fz as usize);
    if ix + 1 >= cols || iz + 1 >= rows {
        return None;
    }
    let (tx, tz) = (fx - ix as f32, fz - iz as f32);
    let h00 = heights[iz * cols + ix];
    let h10 = heights[iz * cols + ix + 1];
    let h01 = heights[(iz + 1) * cols + ix];
    let h11 = heights[(iz + 1) * cols + ix + 1];
    let h0 = h00 + (h10 - h00) * tx;
    let h1 = h01 + (h11 - h01) * tx;
    Some(h0 + (h1 - h0) * tz)
}

/// Sphere (or bounding-sphere reduced shape) against a height field anchored
/// at `field_origin` (grid extends toward +x/+z)
fn sphere_height_field(
    ca: Vec3,
    ra: f32,
    field_origin: Vec3,
    heights: &[f32],
    rows: usize,
    cols: usize,
    cell: f32,
) -> Option<Contact> {
    let local = ca - field_origin;
    let height = height_at(heights, rows, cols, cell, local.x, local.z)?;
    let bottom = local.y - ra;
    if bottom > height {
        return None;
    }
    Some(Contact {
        point: Vec3::new(ca.x, field_origin.y + height, ca.z),
        // From the sphere toward the field surface below it.
        normal: -Vec3::y(),
        penetration: height - bottom,
    })
}

fn bounding_radius(geometry: &NativeGeometry) -> f32 {
    match geometry {
        NativeGeometry::Sphere { radius } => *radius,
        NativeGeometry::Box { half_extents } => half_extents.norm(),
        NativeGeometry::Capsule {
            radius,
            half_height,
        } => radius + half_height,
        NativeGeometry::HeightField { .. } => 0.0,
    }
}

/// Narrow-phase dispatch over world-space geometry pairs
///
/// Boxes are tested as world-aligned bounds (rotation does not shear the
/// extents); spheres and capsules are exact. The returned normal points from
/// shape `a` toward shape `b`.
fn test_overlap(
    ga: &NativeGeometry,
    ca: Vec3,
    qa: Quat,
    gb: &NativeGeometry,
    cb: Vec3,
    qb: Quat,
) -> Option<Contact> {
    use NativeGeometry as G;
    match (ga, gb) {
        (G::Sphere { radius: ra }, G::Sphere { radius: rb }) => sphere_sphere(ca, *ra, cb, *rb),
        (G::Sphere { radius }, G::Box { half_extents }) => sphere_aabb(ca, *radius, cb, *half_extents),
        (G::Box { half_extents }, G::Sphere { radius }) => {
            sphere_aabb(cb, *radius, ca, *half_extents).map(flip_contact)
        }
        (G::Box { half_extents: ha }, G::Box { half_extents: hb }) => aabb_aabb(ca, *ha, cb, *hb),
        (
            G::Capsule {
                radius,
                half_height,
            },
            G::Sphere { radius: rb },
        ) => {
            let (p0, p1) = capsule_segment(ca, qa, *half_height);
            let on_axis = closest_point_on_segment(cb, p0, p1);
            sphere_sphere(on_axis, *radius, cb, *rb)
        }
        (G::Sphere { .. }, G::Capsule { .. }) => {
            test_overlap(gb, cb, qb, ga, ca, qa).map(flip_contact)
        }
        (
            G::Capsule {
                radius: ra,
                half_height: ha,
            },
            G::Capsule {
                radius: rb,
                half_height: hb,
            },
        ) => {
            let (a0, a1) = capsule_segment(ca, qa, *ha);
            let (b0, b1) = capsule_segment(cb, qb, *hb);
            let (pa, pb) = closest_points_between_segments(a0, a1, b0, b1);
            sphere_sphere(pa, *ra, pb, *rb)
        }
        (
            G::Capsule {
                radius,
                half_height,
            },
            G::Box { half_extents },
        ) => {
            let (p0, p1) = capsule_segment(ca, qa, *half_height);
            let on_axis = closest_point_on_segment(cb, p0, p1);
            sphere_aabb(on_axis, *radius, cb, *half_extents)
        }
        (G::Box { .. }, G::Capsule { .. }) => {
            test_overlap(gb, cb, qb, ga, ca, qa).map(flip_contact)
        }
        // Two terrains never collide.
        (G::HeightField { .. }, G::HeightField { .. }) => None,
        (G::HeightField { .. }, _) => test_overlap(gb, cb, qb, ga, ca, qa).map(flip_contact),
        (
            _,
            G::HeightField {
                heights,
                rows,
                cols,
                cell_size,
            },
        ) => sphere_height_field(
            ca,
            bounding_radius(ga),
            cb,
            heights,
            *rows,
            *cols,
            *cell_size,
        ),
    }
}

fn flip_contact(c: Contact) -> Contact {
    Contact {
        point: c.point,
        normal: -c.normal,
        penetration: c.penetration,
    }
}

// ---- raycasts --------------------------------------------------------------

fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.dot(&oc) - radius * radius;
    let discriminant = b * b - 4.0 * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / 2.0;
    let t2 = (-b + sqrt_d) / 2.0;
    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        Some(t2)
    } else {
        None
    }
}

fn ray_aabb(ray: &Ray, center: Vec3, half: Vec3) -> Option<(f32, Vec3)> {
    // Slab method; returns entry distance and the face normal crossed there.
    let min = center - half;
    let max = center + half;
    let mut t_min = 0.0_f32;
    let mut t_max = f32::MAX;
    let mut normal = Vec3::zeros();
    for axis in 0..3 {
        let (o, d) = (ray.origin[axis], ray.direction[axis]);
        if d.abs() < 1.0e-8 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        let mut axis_normal = Vec3::zeros();
        axis_normal[axis] = -d.signum();
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_min {
            t_min = t0;
            normal = axis_normal;
        }
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    if t_min <= 0.0 {
        return None;
    }
    Some((t_min, normal))
}

fn ray_capsule(ray: &Ray, p0: Vec3, p1: Vec3, radius: f32) -> Option<f32> {
    // Cap spheres plus the finite cylinder between them.
    let mut best: Option<f32> = None;
    let mut consider = |t: Option<f32>| {
        if let Some(t) = t {
            best = Some(best.map_or(t, |b: f32| b.min(t)));
        }
    };
    consider(ray_sphere(ray, p0, radius));
    consider(ray_sphere(ray, p1, radius));

    let axis = p1 - p0;
    let len_sq = axis.norm_squared();
    if len_sq > f32::EPSILON {
        let m = ray.origin - p0;
        let nd = ray.direction.dot(&axis);
        let md = m.dot(&axis);
        let a = len_sq - nd * nd;
        if a.abs() > 1.0e-8 {
            let b = len_sq * m.dot(&ray.direction) - nd * md;
            let c = len_sq * (m.norm_squared() - radius * radius) - md * md;
            let disc = b * b - a * c;
            if disc >= 0.0 {
                let t = (-b - disc.sqrt()) / a;
                if t > 0.0 {
                    // Only within the cylindrical section.
                    let s = md + t * nd;
                    if s >= 0.0 && s <= len_sq {
                        consider(Some(t));
                    }
                }
            }
        }
    }
    best
}

fn ray_height_field(
    ray: &Ray,
    origin: Vec3,
    heights: &[f32],
    rows: usize,
    cols: usize,
    cell: f32,
    max_distance: f32,
) -> Option<f32> {
    // Coarse march, then one bisection refinement.
    let step = cell * 0.5;
    let mut t = step;
    let mut prev_t = 0.0;
    while t <= max_distance {
        let p = ray.point_at(t) - origin;
        if let Some(h) = height_at(heights, rows, cols, cell, p.x, p.z) {
            if p.y <= h {
                let mut lo = prev_t;
                let mut hi = t;
                for _ in 0..8 {
                    let mid = 0.5 * (lo + hi);
                    let q = ray.point_at(mid) - origin;
                    match height_at(heights, rows, cols, cell, q.x, q.z) {
                        Some(h) if q.y <= h => hi = mid,
                        _ => lo = mid,
                    }
                }
                return Some(hi);
            }
        }
        prev_t = t;
        t += step;
    }
    None
}

fn raycast_geometry(
    geometry: &NativeGeometry,
    center: Vec3,
    rotation: Quat,
    ray: &Ray,
    max_distance: f32,
) -> Option<(f32, Vec3, Vec3)> {
    let (t, normal) = match geometry {
        NativeGeometry::Sphere { radius } => {
            let t = ray_sphere(ray, center, *radius)?;
            let point = ray.point_at(t);
            (t, (point - center).normalize())
        }
        NativeGeometry::Box { half_extents } => {
            let (t, normal) = ray_aabb(ray, center, *half_extents)?;
            (t, normal)
        }
        NativeGeometry::Capsule {
            radius,
            half_height,
        } => {
            let (p0, p1) = capsule_segment(center, rotation, *half_height);
            let t = ray_capsule(ray, p0, p1, *radius)?;
            let point = ray.point_at(t);
            let on_axis = closest_point_on_segment(point, p0, p1);
            (t, (point - on_axis).normalize())
        }
        NativeGeometry::HeightField {
            heights,
            rows,
            cols,
            cell_size,
        } => {
            let t = ray_height_field(ray, center, heights, *rows, *cols, *cell_size, max_distance)?;
            (t, Vec3::y())
        }
    };
    if t > max_distance {
        return None;
    }
    Some((t, ray.point_at(t), normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sim_with_world() -> PhysicsSimulation {
        let mut sim = PhysicsSimulation::new();
        sim.create(Vec3::new(0.0, -9.81, 0.0));
        sim
    }

    fn sphere_shape(sim: &mut PhysicsSimulation, radius: f32, trigger: bool) -> NativeShapeId {
        let material = sim.create_material(&PhysicsMaterial::default()).unwrap();
        sim.create_shape(
            NativeGeometry::Sphere { radius },
            material,
            trigger,
            Vec3::zeros(),
            CollisionLayers::DEFAULT,
            CollisionLayers::ALL,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut sim = sim_with_world();
        let actor = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), false)
            .unwrap();
        sim.create(Vec3::zeros()); // no-op, must not wipe the world
        assert!(sim.global_pose(actor).is_some());
    }

    #[test]
    fn test_gravity_drop_matches_closed_form() {
        let mut sim = sim_with_world();
        let actor = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), false)
            .unwrap();
        let dt = 1.0 / 60.0;
        sim.step_simulation(dt);
        let (position, _) = sim.global_pose(actor).unwrap();
        assert_relative_eq!(position.y, -0.5 * 9.81 * dt * dt, epsilon = 1.0e-6);
    }

    #[test]
    fn test_kinematic_actor_ignores_gravity() {
        let mut sim = sim_with_world();
        let actor = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), true)
            .unwrap();
        sim.step_simulation(1.0 / 60.0);
        let (position, _) = sim.global_pose(actor).unwrap();
        assert_relative_eq!(position.y, 0.0);
    }

    #[test]
    fn test_freeze_y_blocks_fall() {
        let mut sim = sim_with_world();
        let actor = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), false)
            .unwrap();
        sim.configure_dynamic(
            actor,
            1.0,
            true,
            0.0,
            0.0,
            FreezeFlags::POSITION_Y,
            CollisionDetectionMode::Discrete,
        );
        sim.step_simulation(1.0 / 60.0);
        let (position, _) = sim.global_pose(actor).unwrap();
        assert_relative_eq!(position.y, 0.0);
    }

    #[test]
    fn test_collision_detection_mode_recorded() {
        let mut sim = sim_with_world();
        let actor = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), false)
            .unwrap();
        assert_eq!(
            sim.collision_detection(actor),
            Some(CollisionDetectionMode::Discrete)
        );
        sim.configure_dynamic(
            actor,
            1.0,
            true,
            0.0,
            0.0,
            FreezeFlags::empty(),
            CollisionDetectionMode::Continuous,
        );
        assert_eq!(
            sim.collision_detection(actor),
            Some(CollisionDetectionMode::Continuous)
        );
    }

    #[test]
    fn test_mass_from_density_after_attach() {
        let mut sim = sim_with_world();
        let actor = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), false)
            .unwrap();
        let material = sim.create_material(&PhysicsMaterial::default()).unwrap();
        let shape = sim
            .create_shape(
                NativeGeometry::Box {
                    half_extents: Vec3::new(0.5, 0.5, 0.5),
                },
                material,
                false,
                Vec3::zeros(),
                CollisionLayers::DEFAULT,
                CollisionLayers::ALL,
                None,
            )
            .unwrap();
        sim.attach_shape(actor, shape);
        sim.update_mass_and_inertia(actor, 2.0);
        // Unit cube volume 1.0, density 2.0.
        sim.add_force(actor, Vec3::new(2.0, 0.0, 0.0));
        sim.configure_dynamic(
            actor,
            2.0,
            false,
            0.0,
            0.0,
            FreezeFlags::empty(),
            CollisionDetectionMode::Discrete,
        );
        let dt = 1.0;
        sim.step_simulation(dt);
        let velocity = sim.linear_velocity(actor).unwrap();
        assert_relative_eq!(velocity.x, 1.0, epsilon = 1.0e-6);
    }

    #[test]
    fn test_events_skip_unlinked_user_data() {
        let mut sim = sim_with_world();
        let a = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), false)
            .unwrap();
        let b = sim
            .create_dynamic_actor(Vec3::new(0.5, 0.0, 0.0), Quat::identity(), false)
            .unwrap();
        // Neither shape is linked to a collider.
        let sa = sphere_shape(&mut sim, 0.5, true);
        let sb = sphere_shape(&mut sim, 0.5, true);
        sim.attach_shape(a, sa);
        sim.attach_shape(b, sb);
        sim.step_simulation(1.0 / 60.0);
        assert!(sim.take_events().is_empty());
    }

    #[test]
    fn test_trigger_enter_then_exit() {
        let mut sim = sim_with_world();
        let a = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), true)
            .unwrap();
        let b = sim
            .create_dynamic_actor(Vec3::new(0.5, 0.0, 0.0), Quat::identity(), true)
            .unwrap();
        let collider_a = ColliderId::default();
        let collider_b = ColliderId::default();
        let material = sim.create_material(&PhysicsMaterial::default()).unwrap();
        let sa = sim
            .create_shape(
                NativeGeometry::Sphere { radius: 0.5 },
                material,
                true,
                Vec3::zeros(),
                CollisionLayers::DEFAULT,
                CollisionLayers::ALL,
                Some(collider_a),
            )
            .unwrap();
        let material_b = sim.create_material(&PhysicsMaterial::default()).unwrap();
        let sb = sim
            .create_shape(
                NativeGeometry::Sphere { radius: 0.5 },
                material_b,
                true,
                Vec3::zeros(),
                CollisionLayers::DEFAULT,
                CollisionLayers::ALL,
                Some(collider_b),
            )
            .unwrap();
        sim.attach_shape(a, sa);
        sim.attach_shape(b, sb);

        sim.step_simulation(1.0 / 60.0);
        let events = sim.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CollisionEventKind::TriggerEnter);

        // Second overlapping step: triggers do not produce Stay.
        sim.step_simulation(1.0 / 60.0);
        assert!(sim.take_events().is_empty());

        // Separate and expect an exit.
        sim.set_global_pose(b, Vec3::new(5.0, 0.0, 0.0), Quat::identity());
        sim.step_simulation(1.0 / 60.0);
        let events = sim.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, CollisionEventKind::TriggerExit);
    }

    #[test]
    fn test_layer_filtering_suppresses_events() {
        let mut sim = sim_with_world();
        let a = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), true)
            .unwrap();
        let b = sim
            .create_dynamic_actor(Vec3::new(0.25, 0.0, 0.0), Quat::identity(), true)
            .unwrap();
        let material = sim.create_material(&PhysicsMaterial::default()).unwrap();
        let sa = sim
            .create_shape(
                NativeGeometry::Sphere { radius: 0.5 },
                material,
                true,
                Vec3::zeros(),
                CollisionLayers::PLAYER,
                CollisionLayers::ENEMY,
                Some(ColliderId::default()),
            )
            .unwrap();
        let material_b = sim.create_material(&PhysicsMaterial::default()).unwrap();
        let sb = sim
            .create_shape(
                NativeGeometry::Sphere { radius: 0.5 },
                material_b,
                true,
                Vec3::zeros(),
                CollisionLayers::ENVIRONMENT,
                CollisionLayers::ALL,
                Some(ColliderId::default()),
            )
            .unwrap();
        sim.attach_shape(a, sa);
        sim.attach_shape(b, sb);
        sim.step_simulation(1.0 / 60.0);
        assert!(sim.take_events().is_empty());
    }

    #[test]
    fn test_raycast_closest_sphere() {
        let mut sim = sim_with_world();
        for x in [5.0_f32, 10.0] {
            let actor = sim
                .create_static_actor(Vec3::new(x, 0.0, 0.0), Quat::identity())
                .unwrap();
            let shape = sphere_shape(&mut sim, 1.0, false);
            sim.attach_shape(actor, shape);
        }
        let ray = Ray::new(Vec3::zeros(), Vec3::x());
        let hit = sim.raycast(&ray, 100.0, CollisionLayers::ALL).unwrap();
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1.0e-4);
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn test_raycast_box_face_normal() {
        let mut sim = sim_with_world();
        let actor = sim
            .create_static_actor(Vec3::new(0.0, 0.0, 5.0), Quat::identity())
            .unwrap();
        let material = sim.create_material(&PhysicsMaterial::default()).unwrap();
        let shape = sim
            .create_shape(
                NativeGeometry::Box {
                    half_extents: Vec3::new(1.0, 1.0, 1.0),
                },
                material,
                false,
                Vec3::zeros(),
                CollisionLayers::DEFAULT,
                CollisionLayers::ALL,
                None,
            )
            .unwrap();
        sim.attach_shape(actor, shape);
        let ray = Ray::new(Vec3::zeros(), Vec3::z());
        let hit = sim.raycast(&ray, 100.0, CollisionLayers::ALL).unwrap();
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1.0e-4);
        assert_relative_eq!(hit.normal.z, -1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn test_contact_response_separates_dynamic_pair() {
        let mut sim = sim_with_world();
        let a = sim
            .create_dynamic_actor(Vec3::zeros(), Quat::identity(), false)
            .unwrap();
        let b = sim
            .create_dynamic_actor(Vec3::new(0.5, 0.0, 0.0), Quat::identity(), false)
            .unwrap();
        sim.configure_dynamic(
            a,
            1.0,
            false,
            0.0,
            0.0,
            FreezeFlags::empty(),
            CollisionDetectionMode::Discrete,
        );
        sim.configure_dynamic(
            b,
            1.0,
            false,
            0.0,
            0.0,
            FreezeFlags::empty(),
            CollisionDetectionMode::Discrete,
        );
        let sa = sphere_shape(&mut sim, 0.5, false);
        let sb = sphere_shape(&mut sim, 0.5, false);
        sim.attach_shape(a, sa);
        sim.attach_shape(b, sb);
        sim.step_simulation(1.0 / 60.0);

        let (pa, _) = sim.global_pose(a).unwrap();
        let (pb, _) = sim.global_pose(b).unwrap();
        assert!((pb.x - pa.x) > 0.5, "penetration should shrink");
    }

    #[test]
    fn test_height_field_rejects_bad_grid() {
        let sim = sim_with_world();
        assert!(sim.create_height_field(vec![0.0; 5], 2, 3, 1.0).is_none());
        assert!(sim.create_height_field(vec![0.0; 6], 2, 3, 1.0).is_some());
    }
}
