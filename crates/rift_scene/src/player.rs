//! Player entity

use rift_math::{Quat, Ray, Transform, Vec3};
use rift_physics::{
    CollisionLayers, CollisionScene, CollisionShape, DynamicObjectDesc, ObjectHandle,
};

use crate::input::InputSource;

const EYE_HEIGHT: f32 = 0.65;
const CAPSULE_HALF_HEIGHT: f32 = 0.45;
const CAPSULE_RADIUS: f32 = 0.3;
const WALK_SPEED: f32 = 3.2;
const PITCH_LIMIT: f32 = 1.5;

/// The player: a rotation-locked capsule plus a look direction
pub struct Player {
    object: ObjectHandle,
    yaw: f32,
    pitch: f32,
    room: usize,
}

impl Player {
    /// Register the player body with the collision scene
    pub fn new(physics: &mut CollisionScene, start: Transform, room: usize) -> Self {
        let object = physics.set_player(
            DynamicObjectDesc::new(
                start,
                CollisionShape::capsule(CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS),
            )
            .with_room(room)
            .with_mass(60.0)
            .with_layers(CollisionLayers::player()),
        );
        Self {
            object,
            yaw: 0.0,
            pitch: 0.0,
            room,
        }
    }

    pub fn object(&self) -> ObjectHandle {
        self.object
    }

    pub fn room(&self) -> usize {
        self.room
    }

    /// Called when the physics step carried the player through a portal
    pub fn on_portal_transfer(&mut self, physics: &CollisionScene, new_room: usize) {
        self.room = new_room;
        // Keep the look direction consistent with the rotated body
        if let Ok(transform) = physics.object_transform(self.object) {
            let forward = transform.rotation * Vec3::NEG_Z;
            self.yaw = (-forward.x).atan2(-forward.z);
        }
    }

    /// Apply input and produce this frame's camera transform.
    ///
    /// Movement is expressed as velocity so the solver handles walls and
    /// floors; the camera follows the body at eye height.
    pub fn update(&mut self, physics: &mut CollisionScene, input: &dyn InputSource) -> Transform {
        let look = input.look_delta(0);
        self.yaw -= look.x;
        self.pitch = (self.pitch - look.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let axes = input.move_axes(0);
        let yaw_rotation = Quat::from_rotation_y(self.yaw);
        let wish = yaw_rotation * Vec3::new(axes.x, 0.0, -axes.y) * WALK_SPEED;

        if let Ok(velocity) = physics.object_velocity(self.object) {
            // Preserve vertical velocity so gravity and falls work
            let _ = physics.set_object_velocity(
                self.object,
                Vec3::new(wish.x, velocity.y, wish.z),
            );
        }

        self.camera(physics)
    }

    /// Camera transform derived from the body position and look angles
    pub fn camera(&self, physics: &CollisionScene) -> Transform {
        let position = physics
            .object_transform(self.object)
            .map(|t| t.position)
            .unwrap_or(Vec3::ZERO);
        let rotation =
            (Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)).normalize();
        Transform::from_position_rotation(position + Vec3::new(0.0, EYE_HEIGHT, 0.0), rotation)
    }

    /// Ray from the camera along the look direction, for firing portals
    pub fn aim_ray(&self, physics: &CollisionScene) -> Ray {
        Ray::from_aim(&self.camera(physics))
    }
}
