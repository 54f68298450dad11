//! Scene orchestrator
//!
//! Owns every runtime entity and runs the fixed per-frame order:
//!
//! 1. capture frame timing
//! 2. reset signals
//! 3. player update (produces the camera)
//! 4. portal fire checks
//! 5. cube updates
//! 6. button and door updates
//! 7. physics step, portal transfer, trigger dispatch
//! 8. level triggers keyed by player position
//! 9. cutscene runner update
//! 10. record CPU time
//!
//! Rendering walks visible rooms and recurses through open portals with the
//! camera re-expressed through the portal pair.

use std::time::Instant;

use rift_math::{Quat, Ray, Transform, Vec3};
use rift_physics::{
    BodyTag, CollisionLayers, CollisionScene, PhysicsConfig, StepResult, TriggerOverlap,
};
use rift_triggers::{RuleFire, TriggerListener};

use crate::audio::{sounds, SoundPlayer};
use crate::button::Button;
use crate::cube::Cube;
use crate::cutscene::CutsceneDirector;
use crate::door::Door;
use crate::input::{buttons, InputSource};
use crate::level::{LevelData, LevelError};
use crate::player::Player;
use crate::portal::Portal;
use crate::portal_surface;
use crate::render::{Fragment, ObjectKind, RenderProps, RenderState};
use crate::signals::SignalSet;

/// Below this |normal.y| a surface counts as a wall and portals stand on
/// world up; at or above it the player's up orients the portal instead.
pub const PORTAL_WALL_NORMAL_Y: f32 = 0.8;

/// Maximum portal shot distance
const PORTAL_FIRE_RANGE: f32 = 1_000_000.0;

/// Collision thickness of a level quad
const QUAD_THICKNESS: f32 = 0.05;

/// The whole running level
pub struct Scene {
    level: LevelData,
    physics: CollisionScene,
    signals: SignalSet,
    portals: [Portal; 2],
    listeners: Vec<TriggerListener>,
    player: Player,
    cubes: Vec<Cube>,
    buttons: Vec<Button>,
    doors: Vec<Door>,
    camera: Transform,
    debug_draw: bool,
    cpu_time_us: u64,
    last_frame_time_us: u64,
    last_frame_start: Option<Instant>,
}

impl Scene {
    /// Build the runtime scene from authored level data
    pub fn new(level: LevelData) -> Result<Self, LevelError> {
        level.validate()?;

        let mut physics = CollisionScene::new(PhysicsConfig::default());

        for (index, quad) in level.quads.iter().enumerate() {
            let layers = if quad.portalable {
                CollisionLayers::static_geometry()
            } else {
                CollisionLayers::static_no_portal()
            };
            physics.add_static_box(
                quad.transform,
                Vec3::new(quad.half_width, quad.half_height, QUAD_THICKNESS),
                BodyTag::LevelQuad {
                    index: index as u32,
                },
                layers,
                quad.room,
            );
        }

        let listeners: Vec<TriggerListener> = level
            .triggers
            .iter()
            .enumerate()
            .map(|(index, trigger)| TriggerListener::new(trigger.clone(), index))
            .collect();
        for listener in &listeners {
            listener.register(&mut physics);
        }

        let cubes = level
            .cubes
            .iter()
            .enumerate()
            .map(|(index, def)| Cube::new(&mut physics, index, def.transform, def.room))
            .collect();
        let buttons = level
            .buttons
            .iter()
            .enumerate()
            .map(|(index, def)| {
                Button::new(&mut physics, index, def.position, def.room, def.signal)
            })
            .collect();
        let doors = level
            .doors
            .iter()
            .enumerate()
            .map(|(index, def)| Door::new(&mut physics, index, def.transform, def.room, def.signal))
            .collect();

        let player = Player::new(&mut physics, level.player_start, level.player_start_room);
        let camera = player.camera(&physics);

        physics.sync_queries();

        let signals = SignalSet::new(level.signals);
        Ok(Self {
            level,
            physics,
            signals,
            portals: [Portal::new(0), Portal::new(1)],
            listeners,
            player,
            cubes,
            buttons,
            doors,
            camera,
            debug_draw: false,
            cpu_time_us: 0,
            last_frame_time_us: 0,
            last_frame_start: None,
        })
    }

    // ==================== Update ====================

    /// Run one fixed frame
    pub fn update(
        &mut self,
        input: &dyn InputSource,
        sound_player: &mut dyn SoundPlayer,
        director: &mut dyn CutsceneDirector,
    ) {
        let frame_start = Instant::now();
        if let Some(previous) = self.last_frame_start {
            self.last_frame_time_us = previous.elapsed().as_micros() as u64;
        }

        self.signals.reset();

        self.camera = self.player.update(&mut self.physics, input);
        self.check_portals(input, sound_player);

        for cube in &mut self.cubes {
            cube.update(&mut self.physics);
        }

        let weights = self.button_weights();
        for button in &mut self.buttons {
            button.update(&weights, &mut self.signals, sound_player);
        }
        for door in &mut self.doors {
            door.update(&self.signals, &mut self.physics, sound_player);
        }

        let result = self.physics.step();
        self.dispatch_step(&result, sound_player, director);
        self.check_player_triggers(&result, director);

        director.update();

        self.cpu_time_us = frame_start.elapsed().as_micros() as u64;
        self.last_frame_start = Some(frame_start);
    }

    /// Centers of every body heavy enough to press a button
    fn button_weights(&self) -> Vec<Vec3> {
        let mut weights = Vec::with_capacity(1 + self.cubes.len());
        if let Ok(transform) = self.physics.object_transform(self.player.object()) {
            weights.push(transform.position);
        }
        for cube in &self.cubes {
            weights.push(cube.transform(&self.physics).position);
        }
        weights
    }

    /// React to everything one physics tick produced, in order: transfers,
    /// contacts, then trigger rules.
    fn dispatch_step(
        &mut self,
        result: &StepResult,
        sound_player: &mut dyn SoundPlayer,
        director: &mut dyn CutsceneDirector,
    ) {
        for transfer in &result.transfers {
            if transfer.tag == BodyTag::Player {
                self.player.on_portal_transfer(&self.physics, transfer.new_room);
                sound_player.play(sounds::PORTAL_ENTER, 1.0, 1.0);
            } else {
                sound_player.play(sounds::PORTAL_ENTER, 0.5, 1.0);
            }
        }

        for contact in &result.contacts {
            let involves_cube = matches!(contact.first, BodyTag::Cube { .. })
                || matches!(contact.second, BodyTag::Cube { .. });
            if involves_cube {
                sound_player.play(sounds::CUBE_IMPACT, 0.6, 1.0);
            }
        }

        let mut fires = Vec::new();
        for overlap in &result.trigger_overlaps {
            if let Some(listener) = self.listeners.get(overlap.listener) {
                listener.process(overlap, &mut fires);
            }
        }
        self.dispatch_fires(&fires, director);
    }

    /// Level triggers keyed directly by player position. Skips listeners the
    /// physics step already reported a player overlap for, so a rule fires
    /// at most once per frame per path.
    fn check_player_triggers(&mut self, result: &StepResult, director: &mut dyn CutsceneDirector) {
        let Ok(transform) = self.physics.object_transform(self.player.object()) else {
            return;
        };
        let position = transform.position;

        let mut fires = Vec::new();
        for (index, listener) in self.listeners.iter().enumerate() {
            let reported = result
                .trigger_overlaps
                .iter()
                .any(|o| o.listener == index && o.subject == BodyTag::Player);
            if reported || !listener.trigger().volume.contains_point(position) {
                continue;
            }
            let overlap = TriggerOverlap {
                listener: index,
                subject: BodyTag::Player,
                subject_position: position,
            };
            listener.process(&overlap, &mut fires);
        }
        self.dispatch_fires(&fires, director);
    }

    /// Send signals and cutscenes for fired rules, in order
    fn dispatch_fires(&mut self, fires: &[RuleFire], director: &mut dyn CutsceneDirector) {
        for fire in fires {
            if let Some(signal) = fire.signal {
                self.signals.send(signal);
            }
            director.trigger(fire.cutscene, fire.trigger);
        }
    }

    // ==================== Portals ====================

    /// Fire both portal buttons if pressed
    fn check_portals(&mut self, input: &dyn InputSource, sound_player: &mut dyn SoundPlayer) {
        let room = self.player.room();
        let ray = self.player.aim_ray(&self.physics);
        let player_up = self.camera.up();

        if input.button_pressed(0, buttons::FIRE_PORTAL_0) {
            self.fire_portal(&ray, player_up, 0, room, sound_player);
        }
        if input.button_pressed(0, buttons::FIRE_PORTAL_1) {
            self.fire_portal(&ray, player_up, 1, room, sound_player);
        }
    }

    /// Shoot a portal along `ray`. Returns whether a portal opened.
    ///
    /// Only level quads accept portals. Walls orient on world up; floors and
    /// ceilings orient on the player's up. Portal 1 places facing into the
    /// surface (odd parity).
    pub fn fire_portal(
        &mut self,
        ray: &Ray,
        player_up: Vec3,
        index: usize,
        room: usize,
        sound_player: &mut dyn SoundPlayer,
    ) -> bool {
        let Some(hit) = self.physics.raycast(ray, PORTAL_FIRE_RANGE, Some(room)) else {
            return false;
        };
        let BodyTag::LevelQuad { index: quad } = hit.tag else {
            return false;
        };

        let mut facing = hit.normal;
        if index == 1 {
            facing = -facing;
        }
        let up = if hit.normal.y.abs() < PORTAL_WALL_NORMAL_Y {
            Vec3::UP
        } else {
            player_up
        };

        let at = Transform::from_position_rotation(hit.point, Quat::look_rotation(facing, up));
        self.open_portal(at, index, quad as usize, hit.room, sound_player)
    }

    /// Try to open a portal at an explicit placement. Returns whether a slot
    /// accepted it; failure leaves every portal and the collision table
    /// untouched.
    pub fn open_portal(
        &mut self,
        at: Transform,
        index: usize,
        quad: usize,
        room: usize,
        sound_player: &mut dyn SoundPlayer,
    ) -> bool {
        let Some(quad_data) = self.level.quads.get(quad) else {
            return false;
        };
        let Some(surface) = portal_surface::generate_for_quad(quad_data, &self.level.slots, &at)
        else {
            log::debug!("portal {} placement rejected on quad {}", index, quad);
            return false;
        };

        log::debug!("portal {} accepted by slot {}", index, surface.slot);
        self.portals[index].open(surface.transform, quad, room, &mut self.physics, sound_player);
        true
    }

    // ==================== Render ====================

    /// Compose the frame's fragments
    pub fn render(&self, state: &mut RenderState) {
        state.begin_frame();

        let props = RenderProps::primary(self.camera, self.player.room());
        self.render_view(&props, state);

        let gun = self.portal_gun_transform();
        let matrix = state.push_matrix(gun.to_matrix());
        state.push(Fragment::Object {
            kind: ObjectKind::PortalGun,
            index: 0,
            matrix,
        });

        state.push(Fragment::PerformanceBar {
            cpu_time_us: self.cpu_time_us,
            frame_time_us: self.last_frame_time_us,
        });

        if self.debug_draw {
            state.push(Fragment::DebugLines {
                lines: self.physics.debug_lines(),
            });
        }
    }

    /// Render one view: visible rooms, objects, then portals closer-first,
    /// recursing into their far views.
    fn render_view(&self, props: &RenderProps, state: &mut RenderState) {
        for room in 0..self.level.rooms {
            if self.level.room_visible(props.current_room, room) {
                state.push(Fragment::Room {
                    room,
                    depth: props.depth,
                });
            }
        }

        for (index, cube) in self.cubes.iter().enumerate() {
            let room = self.physics.object_room(cube.object()).unwrap_or(0);
            if self.level.room_visible(props.current_room, room) {
                let matrix = state.push_matrix(cube.transform(&self.physics).to_matrix());
                state.push(Fragment::Object {
                    kind: ObjectKind::Cube,
                    index,
                    matrix,
                });
            }
        }
        for (index, door) in self.doors.iter().enumerate() {
            if self.level.room_visible(props.current_room, self.level.doors[index].room) {
                let matrix = state.push_matrix(door.transform().to_matrix());
                state.push(Fragment::Object {
                    kind: ObjectKind::Door,
                    index,
                    matrix,
                });
            }
        }
        for (index, button) in self.buttons.iter().enumerate() {
            if self.level.room_visible(props.current_room, self.level.buttons[index].room) {
                let matrix =
                    state.push_matrix(Transform::from_position(button.position()).to_matrix());
                state.push(Fragment::Object {
                    kind: ObjectKind::Button,
                    index,
                    matrix,
                });
            }
        }

        for index in self.portal_render_order(props.camera.position) {
            let portal = &self.portals[index];
            if !portal.is_open() {
                continue;
            }
            let room_visible = self.level.room_visible(props.current_room, portal.room());
            if room_visible {
                state.push(Fragment::PortalSurface {
                    portal: index,
                    depth: props.depth,
                });
            }

            let counterpart = &self.portals[1 - index];
            if portal.should_render_view(counterpart, props.from_portal, props.depth, room_visible)
            {
                state.push(Fragment::PortalView {
                    portal: index,
                    depth: props.depth + 1,
                });
                let far_props = RenderProps {
                    camera: portal.far_view(counterpart, &props.camera),
                    from_portal: Some(1 - index),
                    depth: props.depth + 1,
                    current_room: counterpart.room(),
                };
                self.render_view(&far_props, state);
            }
        }
    }

    /// Portal indices ordered nearest-first from `eye`
    fn portal_render_order(&self, eye: Vec3) -> [usize; 2] {
        let distance = |portal: &Portal| {
            if portal.is_open() {
                portal.transform().position.distance_squared(eye)
            } else {
                f32::MAX
            }
        };
        if distance(&self.portals[1]) < distance(&self.portals[0]) {
            [1, 0]
        } else {
            [0, 1]
        }
    }

    /// Gun held at the lower right of the view
    fn portal_gun_transform(&self) -> Transform {
        self.camera * Transform::from_position(Vec3::new(0.2, -0.15, -0.4))
    }

    // ==================== Accessors ====================

    pub fn camera(&self) -> &Transform {
        &self.camera
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn portal(&self, index: usize) -> &Portal {
        &self.portals[index]
    }

    pub fn signals(&self) -> &SignalSet {
        &self.signals
    }

    pub fn physics(&self) -> &CollisionScene {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut CollisionScene {
        &mut self.physics
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    /// CPU time of the last update in microseconds
    pub fn cpu_time_us(&self) -> u64 {
        self.cpu_time_us
    }

    /// Wall time between the last two frames in microseconds
    pub fn last_frame_time_us(&self) -> u64 {
        self.last_frame_time_us
    }

    /// Toggle collider debug rendering
    pub fn set_debug_draw(&mut self, enabled: bool) {
        self.debug_draw = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullSoundPlayer;
    use crate::cutscene::{CutsceneDirector, CutsceneId, NullCutsceneDirector};
    use crate::input::NullInputSource;
    use crate::level::{ButtonDef, CubeDef, DoorDef, LevelQuad, PortalSlot, SlotRange};
    use approx::assert_abs_diff_eq;
    use rift_math::{Aabb, Vec2};
    use rift_triggers::{SubjectKind, Trigger};

    /// Two rooms. Room 0 holds the player, a portalable wall at z = -5 with
    /// three slots (two tiny, one usable), a floor, a trigger around the
    /// spawn, a button and a cube. Room 1 holds a portalable wall and a door.
    fn test_level() -> LevelData {
        let wall = |position: Vec3, rotation: Quat, room: usize, slots: SlotRange| LevelQuad {
            transform: Transform::from_position_rotation(position, rotation),
            half_width: 4.0,
            half_height: 2.5,
            room,
            portalable: true,
            slots,
        };

        LevelData {
            rooms: 2,
            room_visibility: vec![0b11, 0b11],
            signals: 8,
            quads: vec![
                // Floor of room 0: plane facing +Y
                LevelQuad {
                    transform: Transform::from_position_rotation(
                        Vec3::new(0.0, 0.0, 0.0),
                        Quat::from_rotation_x(core::f32::consts::FRAC_PI_2),
                    ),
                    half_width: 10.0,
                    half_height: 10.0,
                    room: 0,
                    portalable: true,
                    slots: SlotRange { min: 3, max: 4 },
                },
                // Wall of room 0 at z = -5, facing +Z back at the player
                wall(
                    Vec3::new(0.0, 1.5, -5.0),
                    Quat::from_rotation_y(core::f32::consts::PI),
                    0,
                    SlotRange { min: 0, max: 3 },
                ),
                // Wall of room 1 at z = 20, facing -Z
                wall(
                    Vec3::new(0.0, 1.5, 20.0),
                    Quat::IDENTITY,
                    1,
                    SlotRange { min: 4, max: 5 },
                ),
            ],
            slots: vec![
                PortalSlot {
                    min: Vec2::new(-3.9, -0.3),
                    max: Vec2::new(-3.5, 0.3),
                },
                PortalSlot {
                    min: Vec2::new(3.5, -0.3),
                    max: Vec2::new(3.9, 0.3),
                },
                PortalSlot {
                    min: Vec2::new(-2.0, -2.0),
                    max: Vec2::new(2.0, 2.0),
                },
                PortalSlot {
                    min: Vec2::new(-4.0, -4.0),
                    max: Vec2::new(4.0, 4.0),
                },
                PortalSlot {
                    min: Vec2::new(-2.0, -2.0),
                    max: Vec2::new(2.0, 2.0),
                },
            ],
            triggers: vec![Trigger::new(Aabb::new(
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, 2.0, 1.0),
            ))
            .with_rule(SubjectKind::Player, Some(0), CutsceneId::NONE)
            .with_rule(SubjectKind::Player, None, CutsceneId(9))],
            buttons: vec![ButtonDef {
                position: Vec3::new(3.0, 0.0, 0.0),
                room: 0,
                signal: 1,
            }],
            doors: vec![DoorDef {
                transform: Transform::from_position(Vec3::new(0.0, 1.0, 10.0)),
                room: 1,
                signal: 1,
            }],
            cubes: vec![CubeDef {
                transform: Transform::from_position(Vec3::new(2.0, 0.5, 0.0)),
                room: 0,
            }],
            player_start: Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            player_start_room: 0,
        }
    }

    fn scene() -> Scene {
        Scene::new(test_level()).expect("test level should validate")
    }

    struct RecordingDirector {
        fired: Vec<(CutsceneId, usize)>,
    }

    impl CutsceneDirector for RecordingDirector {
        fn trigger(&mut self, cutscene: CutsceneId, context: usize) {
            self.fired.push((cutscene, context));
        }
        fn update(&mut self) {}
    }

    #[test]
    fn test_fire_portal_on_wall_commits_hit_point() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        let opened = scene.fire_portal(&ray, Vec3::UP, 0, 0, &mut sound_player);
        assert!(opened);

        let portal = scene.portal(0);
        assert!(portal.is_open());
        assert_eq!(portal.quad(), Some(1));
        // Portal stands where the shot landed, on the wall's collision face
        let committed = scene.physics().portal_transform(0).expect("table entry");
        assert_abs_diff_eq!(committed.position.x, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(committed.position.y, 1.5, epsilon = 1e-4);
        assert_abs_diff_eq!(committed.position.z, -5.0 + QUAD_THICKNESS, epsilon = 1e-3);
        assert_eq!(scene.physics().portal_room(0), 0);
    }

    #[test]
    fn test_first_fit_uses_third_slot() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        // The wall's first two slots are slivers at the far edges; only the
        // third can host a portal near the middle
        let ray = Ray::new(Vec3::new(0.5, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(scene.fire_portal(&ray, Vec3::UP, 0, 0, &mut sound_player));
        let portal = scene.portal(0);
        assert_abs_diff_eq!(portal.transform().position.x, 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(portal.transform().position.y, 1.5, epsilon = 1e-4);
    }

    #[test]
    fn test_rejected_placement_changes_nothing() {
        let mut level = test_level();
        // Shrink every wall slot below the footprint
        for slot in &mut level.slots {
            slot.min = Vec2::new(-0.1, -0.1);
            slot.max = Vec2::new(0.1, 0.1);
        }
        let mut scene = Scene::new(level).unwrap();
        let mut sound_player = NullSoundPlayer;
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(!scene.fire_portal(&ray, Vec3::UP, 0, 0, &mut sound_player));
        assert!(!scene.portal(0).is_open());
        assert!(scene.physics().portal_transform(0).is_none());
    }

    #[test]
    fn test_miss_and_non_quad_hits_reject() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        // Straight up: nothing there
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(!scene.fire_portal(&ray, Vec3::UP, 0, 0, &mut sound_player));
    }

    #[test]
    fn test_floor_orientation_uses_player_up() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        // Aim down at the floor; the player's up is pitched toward -Z
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let player_up = Vec3::new(0.0, 0.5, -0.5).normalize();

        assert!(scene.fire_portal(&ray, player_up, 0, 0, &mut sound_player));

        // Portal forward points up off the floor; its up axis leans the way
        // the player's did, not along world up
        let portal = scene.portal(0);
        let forward = portal.transform().forward();
        assert!(forward.y > 0.9);
        let up = portal.transform().up();
        assert!(up.z < -0.5);
    }

    #[test]
    fn test_wall_orientation_uses_world_up() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));
        // Player badly tilted; the wall still orients on world up
        let player_up = Vec3::new(0.7, 0.1, 0.0).normalize();

        assert!(scene.fire_portal(&ray, player_up, 0, 0, &mut sound_player));
        let up = scene.portal(0).transform().up();
        assert!(up.y > 0.99);
    }

    #[test]
    fn test_portal_one_faces_into_wall() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        let ray = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(scene.fire_portal(&ray, Vec3::UP, 1, 0, &mut sound_player));

        // Placement faces into the wall (odd parity)...
        let placed_forward = scene.portal(1).transform().forward();
        assert!(placed_forward.z < -0.9);
        // ...but the collision table holds the outward-facing transform
        let committed = scene.physics().portal_transform(1).expect("table entry");
        let committed_forward = committed.rotation * Vec3::NEG_Z;
        assert!(committed_forward.z > 0.9);
    }

    #[test]
    fn test_trigger_rules_fire_in_order_with_cutscene() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        let mut director = RecordingDirector { fired: Vec::new() };

        // Player spawns inside the trigger volume
        scene.update(&NullInputSource, &mut sound_player, &mut director);

        // Rule 0 sent its signal; rule 1 skipped the send but still
        // dispatched its cutscene. Both cutscene dispatches arrive in order.
        assert!(scene.signals().is_active(0));
        assert_eq!(director.fired.len(), 2);
        assert_eq!(director.fired[0], (CutsceneId::NONE, 0));
        assert_eq!(director.fired[1], (CutsceneId(9), 0));
    }

    #[test]
    fn test_signal_resets_next_frame() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        let mut director = NullCutsceneDirector;

        scene.update(&NullInputSource, &mut sound_player, &mut director);
        assert!(scene.signals().is_active(0));

        // Teleport the player far from the trigger; next frame the signal
        // reads inactive again
        let player = scene.player().object();
        scene
            .physics_mut()
            .set_object_transform(player, Transform::from_position(Vec3::new(50.0, 1.0, 50.0)))
            .unwrap();
        scene.update(&NullInputSource, &mut sound_player, &mut director);
        assert!(!scene.signals().is_active(0));
    }

    #[test]
    fn test_button_press_holds_door_open() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        let mut director = NullCutsceneDirector;

        // Park the cube on the button pad
        let cube = scene.cubes[0].object();
        scene
            .physics_mut()
            .set_object_transform(cube, Transform::from_position(Vec3::new(3.0, 0.3, 0.0)))
            .unwrap();

        for _ in 0..30 {
            scene.update(&NullInputSource, &mut sound_player, &mut director);
        }

        assert!(scene.buttons[0].is_pressed());
        assert!(scene.signals().is_active(1));
        assert!(scene.doors[0].is_passable());
    }

    #[test]
    fn test_render_views_at_most_once_per_portal() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;

        // Open both portals facing each other across room 0
        let ray0 = Ray::new(Vec3::new(-0.5, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let ray1 = Ray::new(Vec3::new(0.5, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(scene.fire_portal(&ray0, Vec3::UP, 0, 0, &mut sound_player));
        assert!(scene.fire_portal(&ray1, Vec3::UP, 1, 0, &mut sound_player));

        let mut state = RenderState::new();
        scene.render(&mut state);

        assert!(state.portal_view_count(0) <= 1);
        assert!(state.portal_view_count(1) <= 1);
        // The primary view renders both far views exactly once
        assert_eq!(state.portal_view_count(0) + state.portal_view_count(1), 2);
    }

    #[test]
    fn test_render_emits_overlay_and_rooms() {
        let scene = scene();
        let mut state = RenderState::new();
        scene.render(&mut state);

        assert!(state
            .fragments()
            .iter()
            .any(|f| matches!(f, Fragment::PerformanceBar { .. })));
        assert!(state
            .fragments()
            .iter()
            .any(|f| matches!(f, Fragment::Room { room: 0, depth: 0 })));
        assert!(state
            .fragments()
            .iter()
            .any(|f| matches!(f, Fragment::Object { kind: ObjectKind::PortalGun, .. })));
    }

    #[test]
    fn test_debug_draw_fragment_toggles() {
        let mut scene = scene();
        let mut state = RenderState::new();
        scene.render(&mut state);
        assert!(!state
            .fragments()
            .iter()
            .any(|f| matches!(f, Fragment::DebugLines { .. })));

        scene.set_debug_draw(true);
        scene.render(&mut state);
        assert!(state
            .fragments()
            .iter()
            .any(|f| matches!(f, Fragment::DebugLines { .. })));
    }

    #[test]
    fn test_player_transfer_through_portal_pair() {
        let mut scene = scene();
        let mut sound_player = NullSoundPlayer;
        let mut director = NullCutsceneDirector;

        // Portal 0 on the room 0 wall, portal 1 on the room 1 wall
        let ray0 = Ray::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(scene.fire_portal(&ray0, Vec3::UP, 0, 0, &mut sound_player));
        let ray1 = Ray::new(Vec3::new(0.0, 1.5, 15.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(scene.fire_portal(&ray1, Vec3::UP, 1, 1, &mut sound_player));

        // Walk the player into portal 0
        let player = scene.player().object();
        scene
            .physics_mut()
            .set_object_transform(
                player,
                Transform::from_position(Vec3::new(0.0, 1.5, -4.0)),
            )
            .unwrap();
        scene.update(&NullInputSource, &mut sound_player, &mut director);
        scene
            .physics_mut()
            .set_object_transform(
                player,
                Transform::from_position(Vec3::new(0.0, 1.5, -5.2)),
            )
            .unwrap();
        scene.update(&NullInputSource, &mut sound_player, &mut director);

        assert_eq!(scene.player().room(), 1);
        let transform = scene
            .physics()
            .object_transform(player)
            .unwrap();
        // Player came out near the room 1 wall
        assert!((transform.position.z - 20.0).abs() < 2.0);
    }
}
