//! Headless playthrough of a tiny two-room level.
//!
//! Walks the player forward, fires both portals at opposite walls, and runs
//! the fixed update until the player has passed through the pair. Run with
//! `RUST_LOG=debug` to watch the scene's internal decisions.

use rift_math::{Quat, Transform, Vec2, Vec3};
use rift_scene::{
    buttons, ButtonDef, CubeDef, DoorDef, InputSource, LevelData, LevelQuad, NullCutsceneDirector,
    PortalSlot, Scene, SlotRange, SoundId, SoundPlayer,
};

/// Logs every sound instead of playing it
struct LoggingSoundPlayer;

impl SoundPlayer for LoggingSoundPlayer {
    fn play(&mut self, sound: SoundId, volume: f32, _pitch: f32) {
        log::info!("sound {:?} at volume {:.1}", sound, volume);
    }
}

/// Scripted input: fires portal buttons on chosen frames, then holds forward
struct ScriptedInput {
    frame: u64,
}

impl InputSource for ScriptedInput {
    fn button_pressed(&self, _player: usize, mask: u32) -> bool {
        mask == buttons::FIRE_PORTAL_0 && self.frame == 5
    }

    fn move_axes(&self, _player: usize) -> Vec2 {
        if self.frame > 15 {
            Vec2::new(0.0, 1.0)
        } else {
            Vec2::ZERO
        }
    }
}

fn demo_level() -> LevelData {
    LevelData {
        rooms: 2,
        room_visibility: vec![0b11, 0b11],
        signals: 4,
        quads: vec![
            // Floor of both rooms
            LevelQuad {
                transform: Transform::from_position_rotation(
                    Vec3::new(0.0, 0.0, 0.0),
                    Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
                ),
                half_width: 12.0,
                half_height: 12.0,
                room: 0,
                portalable: false,
                slots: SlotRange::EMPTY,
            },
            // Wall ahead of the player, room 0
            LevelQuad {
                transform: Transform::from_position_rotation(
                    Vec3::new(0.0, 1.5, -6.0),
                    Quat::from_rotation_y(std::f32::consts::PI),
                ),
                half_width: 4.0,
                half_height: 2.5,
                room: 0,
                portalable: true,
                slots: SlotRange { min: 0, max: 1 },
            },
            // Wall of room 1, facing back into it
            LevelQuad {
                transform: Transform::from_position_rotation(
                    Vec3::new(0.0, 1.5, 30.0),
                    Quat::IDENTITY,
                ),
                half_width: 4.0,
                half_height: 2.5,
                room: 1,
                portalable: true,
                slots: SlotRange { min: 1, max: 2 },
            },
        ],
        slots: vec![
            PortalSlot {
                min: Vec2::new(-3.0, -1.2),
                max: Vec2::new(3.0, 1.2),
            },
            PortalSlot {
                min: Vec2::new(-3.0, -1.2),
                max: Vec2::new(3.0, 1.2),
            },
        ],
        triggers: Vec::new(),
        buttons: vec![ButtonDef {
            position: Vec3::new(3.0, 0.0, 25.0),
            room: 1,
            signal: 0,
        }],
        doors: vec![DoorDef {
            transform: Transform::from_position(Vec3::new(0.0, 1.0, 35.0)),
            room: 1,
            signal: 0,
        }],
        cubes: vec![CubeDef {
            transform: Transform::from_position(Vec3::new(2.0, 0.5, 25.0)),
            room: 1,
        }],
        player_start: Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
        player_start_room: 0,
    }
}

fn main() {
    env_logger::init();

    let mut scene = Scene::new(demo_level()).expect("demo level should validate");
    let mut sound_player = LoggingSoundPlayer;
    let mut director = NullCutsceneDirector;

    // Portal 1 has to be fired from room 1's side; script it directly
    // instead of walking there first.
    let mut input = ScriptedInput { frame: 0 };
    for frame in 0..240 {
        input.frame = frame;
        if frame == 10 {
            let ray = rift_math::Ray::new(Vec3::new(0.0, 1.5, 25.0), Vec3::new(0.0, 0.0, 1.0));
            scene.fire_portal(&ray, Vec3::UP, 1, 1, &mut sound_player);
        }
        scene.update(&input, &mut sound_player, &mut director);

        if frame % 60 == 0 {
            let transform = scene
                .physics()
                .object_transform(scene.player().object())
                .expect("player exists");
            log::info!(
                "frame {:3}: room {} position {:?} cpu {}us",
                frame,
                scene.player().room(),
                transform.position,
                scene.cpu_time_us()
            );
        }
    }

    println!(
        "finished in room {} with portals open: {} / {}",
        scene.player().room(),
        scene.portal(0).is_open(),
        scene.portal(1).is_open()
    );
}
