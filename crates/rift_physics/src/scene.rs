//! Collision scene - simulation container with portal awareness
//!
//! One fixed tick runs per rendered frame. After the solver runs, the scene
//! sweeps every transferable body against the portal transform table and
//! teleports bodies whose center crossed an open portal surface, then gathers
//! trigger overlaps into a deterministic event order.

use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

use rift_math::{Quat, Transform, Vec3};

use crate::body::{BodyTag, DynamicObjectDesc, ObjectHandle, StaticHandle};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{ContactEvent, PortalTransfer, StepResult, TriggerOverlap};
use crate::layers::CollisionLayers;
use crate::query::SceneQuery;

/// Half extent of the portal opening along its local X axis
pub const PORTAL_HALF_WIDTH: f32 = 0.5;
/// Half extent of the portal opening along its local Y axis
pub const PORTAL_HALF_HEIGHT: f32 = 0.9;

/// A dynamic body registered with the scene
struct DynamicEntry {
    body: rapier::RigidBodyHandle,
    collider: rapier::ColliderHandle,
    tag: BodyTag,
    room: usize,
    kinematic: bool,
    transferable: bool,
    /// Position at the end of the previous tick, for crossing detection
    prev_position: Vec3,
    alive: bool,
}

/// The collision scene containing all simulation state
pub struct CollisionScene {
    config: PhysicsConfig,

    pipeline: rapier::PhysicsPipeline,
    gravity: rapier::Vector<f32>,
    integration_params: rapier::IntegrationParameters,
    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd_solver: rapier::CCDSolver,
    query_pipeline: rapier::QueryPipeline,
    bodies: rapier::RigidBodySet,
    colliders: rapier::ColliderSet,

    /// The portal transform table. `None` means the portal is closed.
    portal_transforms: [Option<Transform>; 2],
    /// Room index on the far side of each portal
    portal_rooms: [usize; 2],

    /// Registered dynamic objects, indexed by [`ObjectHandle`]
    dynamic: Vec<DynamicEntry>,
    /// The player's object handle, if registered
    player: Option<ObjectHandle>,
    /// Sensor colliders in listener index order
    listeners: Vec<rapier::ColliderHandle>,
    /// Room each collider lives in, consulted by raycasts
    collider_rooms: HashMap<rapier::ColliderHandle, usize>,
}

impl CollisionScene {
    /// Create an empty scene
    pub fn new(config: PhysicsConfig) -> Self {
        let gravity = rapier::Vector::new(config.gravity[0], config.gravity[1], config.gravity[2]);

        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = config.timestep;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.velocity_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity,
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            portal_transforms: [None, None],
            portal_rooms: [0, 0],
            dynamic: Vec::new(),
            player: None,
            listeners: Vec::new(),
            collider_rooms: HashMap::new(),
        }
    }

    /// Get the scene configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    // ==================== Static Geometry ====================

    /// Add a static box collider (level quads, door panels, button bases)
    pub fn add_static_box(
        &mut self,
        transform: Transform,
        half_extents: Vec3,
        tag: BodyTag,
        layers: CollisionLayers,
        room: usize,
    ) -> StaticHandle {
        let collider =
            rapier::ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                .position(to_isometry(&transform))
                .friction(self.config.default_friction)
                .restitution(self.config.default_restitution)
                .collision_groups(to_groups(layers))
                .user_data(tag.pack())
                .build();
        let handle = self.colliders.insert(collider);
        self.collider_rooms.insert(handle, room);
        StaticHandle(handle)
    }

    /// Enable or disable a static collider (doors opening and closing)
    pub fn set_static_enabled(&mut self, handle: StaticHandle, enabled: bool) {
        if let Some(collider) = self.colliders.get_mut(handle.0) {
            collider.set_enabled(enabled);
        }
    }

    /// Add a trigger sensor volume for the listener at `listener_index`.
    ///
    /// Listeners must be added in ascending index order; overlap reports come
    /// back in that same order.
    pub fn add_trigger_volume(&mut self, center: Vec3, half_extents: Vec3, listener_index: usize) {
        debug_assert_eq!(listener_index, self.listeners.len());
        let collider =
            rapier::ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
                .translation(rapier::Vector::new(center.x, center.y, center.z))
                .sensor(true)
                .collision_groups(to_groups(CollisionLayers::trigger()))
                .active_collision_types(rapier::ActiveCollisionTypes::all())
                .active_events(rapier::ActiveEvents::COLLISION_EVENTS)
                .user_data(
                    BodyTag::TriggerListener {
                        index: listener_index as u32,
                    }
                    .pack(),
                )
                .build();
        self.listeners.push(self.colliders.insert(collider));
    }

    // ==================== Dynamic Objects ====================

    /// Add a dynamic object to the scene
    pub fn add_dynamic_object(&mut self, desc: DynamicObjectDesc) -> ObjectHandle {
        let mut builder = if desc.kinematic {
            rapier::RigidBodyBuilder::kinematic_position_based()
        } else {
            rapier::RigidBodyBuilder::dynamic()
        }
        .position(to_isometry(&desc.transform))
        .ccd_enabled(self.config.ccd_enabled);

        if matches!(desc.tag, BodyTag::Player) {
            builder = builder.lock_rotations();
        }

        let body = self.bodies.insert(builder.build());

        let collider = rapier::ColliderBuilder::new(desc.shape.to_rapier())
            .mass(desc.mass)
            .friction(self.config.default_friction)
            .restitution(self.config.default_restitution)
            .collision_groups(to_groups(desc.layers))
            .active_events(rapier::ActiveEvents::COLLISION_EVENTS)
            .user_data(desc.tag.pack())
            .build();
        let collider = self.colliders.insert_with_parent(collider, body, &mut self.bodies);

        self.collider_rooms.insert(collider, desc.room);

        let handle = ObjectHandle(self.dynamic.len());
        self.dynamic.push(DynamicEntry {
            body,
            collider,
            tag: desc.tag,
            room: desc.room,
            kinematic: desc.kinematic,
            transferable: desc.transferable,
            prev_position: desc.transform.position,
            alive: true,
        });
        handle
    }

    /// Add the player body and remember its handle
    pub fn set_player(&mut self, desc: DynamicObjectDesc) -> ObjectHandle {
        let handle = self.add_dynamic_object(desc.with_tag(BodyTag::Player));
        self.player = Some(handle);
        handle
    }

    /// The player's object handle, if one was registered
    pub fn player(&self) -> Option<ObjectHandle> {
        self.player
    }

    /// Remove a dynamic object from the scene
    pub fn remove_dynamic_object(&mut self, handle: ObjectHandle) -> Result<()> {
        let entry = self
            .dynamic
            .get_mut(handle.0)
            .filter(|e| e.alive)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        entry.alive = false;
        let body = entry.body;
        self.bodies.remove(
            body,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        if self.player == Some(handle) {
            self.player = None;
        }
        Ok(())
    }

    fn entry(&self, handle: ObjectHandle) -> Result<&DynamicEntry> {
        self.dynamic
            .get(handle.0)
            .filter(|e| e.alive)
            .ok_or(PhysicsError::ObjectNotFound(handle))
    }

    /// Get a dynamic object's transform
    pub fn object_transform(&self, handle: ObjectHandle) -> Result<Transform> {
        let entry = self.entry(handle)?;
        let body = self
            .bodies
            .get(entry.body)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        Ok(from_isometry(body.position()))
    }

    /// Set a dynamic object's transform. Kinematic bodies get a target for
    /// the next tick; simulated bodies are moved directly.
    pub fn set_object_transform(&mut self, handle: ObjectHandle, transform: Transform) -> Result<()> {
        let entry = self
            .dynamic
            .get(handle.0)
            .filter(|e| e.alive)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        let kinematic = entry.kinematic;
        let body_handle = entry.body;
        let body = self
            .bodies
            .get_mut(body_handle)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        let iso = to_isometry(&transform);
        if kinematic {
            body.set_next_kinematic_position(iso);
        } else {
            body.set_position(iso, true);
        }
        Ok(())
    }

    /// Get a dynamic object's linear velocity
    pub fn object_velocity(&self, handle: ObjectHandle) -> Result<Vec3> {
        let entry = self.entry(handle)?;
        let body = self
            .bodies
            .get(entry.body)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        let v = body.linvel();
        Ok(Vec3::new(v.x, v.y, v.z))
    }

    /// Set a dynamic object's linear velocity
    pub fn set_object_velocity(&mut self, handle: ObjectHandle, velocity: Vec3) -> Result<()> {
        let entry = self
            .dynamic
            .get(handle.0)
            .filter(|e| e.alive)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        let body_handle = entry.body;
        let body = self
            .bodies
            .get_mut(body_handle)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        body.set_linvel(rapier::Vector::new(velocity.x, velocity.y, velocity.z), true);
        Ok(())
    }

    /// Get the room a dynamic object currently occupies
    pub fn object_room(&self, handle: ObjectHandle) -> Result<usize> {
        Ok(self.entry(handle)?.room)
    }

    /// Move a dynamic object to another room
    pub fn set_object_room(&mut self, handle: ObjectHandle, room: usize) -> Result<()> {
        let entry = self
            .dynamic
            .get_mut(handle.0)
            .filter(|e| e.alive)
            .ok_or(PhysicsError::ObjectNotFound(handle))?;
        entry.room = room;
        self.collider_rooms.insert(entry.collider, room);
        Ok(())
    }

    /// Get a dynamic object's gameplay tag
    pub fn object_tag(&self, handle: ObjectHandle) -> Result<BodyTag> {
        Ok(self.entry(handle)?.tag)
    }

    // ==================== Portal Table ====================

    /// Commit a portal placement: where it stands and which room lies behind.
    pub fn open_portal(&mut self, index: usize, transform: Transform, room: usize) -> Result<()> {
        if index >= 2 {
            return Err(PhysicsError::InvalidPortalIndex(index));
        }
        log::debug!(
            "portal {} opened in room {} at {:?}",
            index,
            room,
            transform.position
        );
        self.portal_transforms[index] = Some(transform);
        self.portal_rooms[index] = room;
        Ok(())
    }

    /// Close a portal
    pub fn close_portal(&mut self, index: usize) -> Result<()> {
        if index >= 2 {
            return Err(PhysicsError::InvalidPortalIndex(index));
        }
        self.portal_transforms[index] = None;
        Ok(())
    }

    /// Transform of a portal, or `None` if it is closed
    pub fn portal_transform(&self, index: usize) -> Option<Transform> {
        self.portal_transforms.get(index).copied().flatten()
    }

    /// Room behind a portal
    pub fn portal_room(&self, index: usize) -> usize {
        self.portal_rooms.get(index).copied().unwrap_or(0)
    }

    /// Whether both portals are open and transfer is possible
    pub fn both_portals_open(&self) -> bool {
        self.portal_transforms[0].is_some() && self.portal_transforms[1].is_some()
    }

    // ==================== Simulation ====================

    /// Run one fixed simulation tick and return everything it produced.
    pub fn step(&mut self) -> StepResult {
        let (collision_send, collision_recv) = crossbeam_channel::unbounded();

        let event_handler = ChannelEventCollector {
            collision_events: collision_send,
        };

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut result = StepResult::default();

        // Solid contacts that started this tick
        while let Ok(event) = collision_recv.try_recv() {
            if let rapier::CollisionEvent::Started(h1, h2, _) = event {
                let c1 = self.colliders.get(h1);
                let c2 = self.colliders.get(h2);
                let is_sensor = c1.map(|c| c.is_sensor()).unwrap_or(false)
                    || c2.map(|c| c.is_sensor()).unwrap_or(false);
                if !is_sensor {
                    result.contacts.push(ContactEvent {
                        first: BodyTag::unpack(c1.map(|c| c.user_data).unwrap_or(0)),
                        second: BodyTag::unpack(c2.map(|c| c.user_data).unwrap_or(0)),
                    });
                }
            }
        }

        self.check_portal_transfers(&mut result);
        self.collect_trigger_overlaps(&mut result);

        self.query_pipeline.update(&self.colliders);

        result
    }

    /// Sweep every transferable body against the portal table.
    ///
    /// A body transfers when its center moved from the front half-space of an
    /// open portal to the back within the portal opening. A portal whose
    /// partner is closed never transfers anything.
    fn check_portal_transfers(&mut self, result: &mut StepResult) {
        for object_index in 0..self.dynamic.len() {
            let entry = &self.dynamic[object_index];
            if !entry.alive || !entry.transferable {
                continue;
            }
            let Some(body) = self.bodies.get(entry.body) else {
                continue;
            };
            let t = body.translation();
            let position = Vec3::new(t.x, t.y, t.z);
            let prev = entry.prev_position;

            let mut transferred = false;
            for portal in 0..2 {
                let Some(entry_portal) = self.portal_transforms[portal] else {
                    continue;
                };
                let exit_index = 1 - portal;
                let Some(exit_portal) = self.portal_transforms[exit_index] else {
                    continue;
                };

                let inv = entry_portal.inverse();
                let prev_local = inv.transform_point(prev);
                let cur_local = inv.transform_point(position);

                // Forward is -Z: in front of the surface means local z < 0
                let crossed = prev_local.z < 0.0 && cur_local.z >= 0.0;
                let inside = cur_local.x.abs() <= PORTAL_HALF_WIDTH
                    && cur_local.y.abs() <= PORTAL_HALF_HEIGHT;
                if !(crossed && inside) {
                    continue;
                }

                // Turn around by half a turn so "into the entry" becomes
                // "out of the exit"
                let flip = Transform::from_position_rotation(
                    Vec3::ZERO,
                    Quat::from_rotation_y(core::f32::consts::PI),
                );
                let rel = exit_portal * flip * inv;

                let new_room = self.portal_rooms[exit_index];
                self.teleport(object_index, &rel, new_room);

                let entry = &self.dynamic[object_index];
                result.transfers.push(PortalTransfer {
                    object: ObjectHandle(object_index),
                    tag: entry.tag,
                    entered_portal: portal,
                    new_room,
                });
                log::debug!(
                    "{:?} transferred through portal {} into room {}",
                    entry.tag,
                    portal,
                    new_room
                );
                transferred = true;
                break;
            }

            if !transferred {
                self.dynamic[object_index].prev_position = position;
            }
        }
    }

    /// Apply a relative transform to a body, carrying velocity along.
    fn teleport(&mut self, object_index: usize, rel: &Transform, new_room: usize) {
        let entry = &mut self.dynamic[object_index];
        let Some(body) = self.bodies.get_mut(entry.body) else {
            return;
        };

        let t = body.translation();
        let position = rel.transform_point(Vec3::new(t.x, t.y, t.z));
        let rot = body.rotation();
        let rotation =
            (rel.rotation * Quat::new(rot.i, rot.j, rot.k, rot.w)).normalize();
        let linvel = body.linvel();
        let new_linvel = rel.rotation * Vec3::new(linvel.x, linvel.y, linvel.z);
        let angvel = body.angvel();
        let new_angvel = rel.rotation * Vec3::new(angvel.x, angvel.y, angvel.z);

        body.set_translation(rapier::Vector::new(position.x, position.y, position.z), true);
        body.set_rotation(
            UnitQuaternion::from_quaternion(Quaternion::new(
                rotation.w, rotation.x, rotation.y, rotation.z,
            )),
            true,
        );
        body.set_linvel(
            rapier::Vector::new(new_linvel.x, new_linvel.y, new_linvel.z),
            true,
        );
        body.set_angvel(
            rapier::Vector::new(new_angvel.x, new_angvel.y, new_angvel.z),
            true,
        );

        entry.room = new_room;
        entry.prev_position = position;
        let collider = entry.collider;
        self.collider_rooms.insert(collider, new_room);
    }

    /// Gather trigger overlaps in listener index order; ties within one
    /// listener break by packed tag for determinism.
    fn collect_trigger_overlaps(&mut self, result: &mut StepResult) {
        for (listener_index, &listener) in self.listeners.iter().enumerate() {
            let mut overlaps: Vec<TriggerOverlap> = Vec::new();
            for (h1, h2, intersecting) in self.narrow_phase.intersection_pairs_with(listener) {
                if !intersecting {
                    continue;
                }
                let other = if h1 == listener { h2 } else { h1 };
                let Some(collider) = self.colliders.get(other) else {
                    continue;
                };
                let subject = BodyTag::unpack(collider.user_data);
                if !subject.is_trigger_subject() {
                    continue;
                }
                let p = collider.translation();
                overlaps.push(TriggerOverlap {
                    listener: listener_index,
                    subject,
                    subject_position: Vec3::new(p.x, p.y, p.z),
                });
            }
            overlaps.sort_by_key(|o| o.subject.pack());
            result.trigger_overlaps.extend(overlaps);
        }
    }

    // ==================== Queries ====================

    /// Get a query interface for raycasting
    pub fn query(&self) -> SceneQuery<'_> {
        SceneQuery {
            query_pipeline: &self.query_pipeline,
            colliders: &self.colliders,
            bodies: &self.bodies,
            rooms: &self.collider_rooms,
            player_collider: self
                .player
                .and_then(|h| self.dynamic.get(h.0))
                .filter(|e| e.alive)
                .map(|e| e.collider),
        }
    }

    /// Cast a ray against solid geometry.
    ///
    /// `room_hint` names the room the ray starts in; it backfills the hit's
    /// room when the hit collider carries none of its own.
    pub fn raycast(
        &self,
        ray: &rift_math::Ray,
        max_distance: f32,
        room_hint: Option<usize>,
    ) -> Option<crate::query::RaycastHit> {
        let (handle, mut hit) = self.query().raycast_raw(
            ray,
            &crate::query::RaycastOptions::default().with_max_distance(max_distance),
        )?;
        if !self.collider_rooms.contains_key(&handle) {
            hit.room = room_hint.unwrap_or(hit.room);
        }
        Some(hit)
    }

    /// Line list of every collider's world AABB for debug rendering
    pub fn debug_lines(&self) -> Vec<(Vec3, Vec3)> {
        let mut lines = Vec::with_capacity(self.colliders.len() * 12);
        for (_, collider) in self.colliders.iter() {
            let aabb = collider.compute_aabb();
            let lo = Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z);
            let hi = Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z);
            let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
            let c = [
                corner(lo.x, lo.y, lo.z),
                corner(hi.x, lo.y, lo.z),
                corner(hi.x, hi.y, lo.z),
                corner(lo.x, hi.y, lo.z),
                corner(lo.x, lo.y, hi.z),
                corner(hi.x, lo.y, hi.z),
                corner(hi.x, hi.y, hi.z),
                corner(lo.x, hi.y, hi.z),
            ];
            const EDGES: [(usize, usize); 12] = [
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 0),
                (4, 5),
                (5, 6),
                (6, 7),
                (7, 4),
                (0, 4),
                (1, 5),
                (2, 6),
                (3, 7),
            ];
            for (a, b) in EDGES {
                lines.push((c[a], c[b]));
            }
        }
        lines
    }

    /// Sync the query pipeline with current colliders. Call after building
    /// the scene if a query must run before the first tick.
    pub fn sync_queries(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    /// Number of rigid bodies in the scene
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders in the scene
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for CollisionScene {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

fn to_isometry(transform: &Transform) -> rapier::Isometry<f32> {
    rapier::Isometry::from_parts(
        rapier::Translation::new(
            transform.position.x,
            transform.position.y,
            transform.position.z,
        ),
        UnitQuaternion::from_quaternion(Quaternion::new(
            transform.rotation.w,
            transform.rotation.x,
            transform.rotation.y,
            transform.rotation.z,
        )),
    )
}

fn from_isometry(iso: &rapier::Isometry<f32>) -> Transform {
    let t = iso.translation;
    let r = iso.rotation;
    Transform::from_position_rotation(
        Vec3::new(t.x, t.y, t.z),
        Quat::new(r.i, r.j, r.k, r.w),
    )
}

fn to_groups(layers: CollisionLayers) -> rapier::InteractionGroups {
    rapier::InteractionGroups::new(
        rapier::Group::from_bits_truncate(layers.memberships),
        rapier::Group::from_bits_truncate(layers.filter),
    )
}

/// Channel-based event collector for Rapier
struct ChannelEventCollector {
    collision_events: crossbeam_channel::Sender<rapier::CollisionEvent>,
}

impl rapier::EventHandler for ChannelEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        event: rapier::CollisionEvent,
        _contact_pair: Option<&rapier::ContactPair>,
    ) {
        let _ = self.collision_events.send(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &rapier::RigidBodySet,
        _colliders: &rapier::ColliderSet,
        _contact_pair: &rapier::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}
