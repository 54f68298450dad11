//! Carryable cube entity

use rift_math::{Transform, Vec3};
use rift_physics::{BodyTag, CollisionScene, CollisionShape, DynamicObjectDesc, ObjectHandle};

const CUBE_HALF_EXTENT: f32 = 0.25;
const CUBE_MASS: f32 = 10.0;

/// Below this height a cube is considered lost and respawns
const KILL_PLANE_Y: f32 = -50.0;

/// A simulated cube, respawning at its authored spawn when it falls out of
/// the level
pub struct Cube {
    object: ObjectHandle,
    index: usize,
    spawn: Transform,
    spawn_room: usize,
}

impl Cube {
    pub fn new(
        physics: &mut CollisionScene,
        index: usize,
        spawn: Transform,
        room: usize,
    ) -> Self {
        let object = physics.add_dynamic_object(
            DynamicObjectDesc::new(
                spawn,
                CollisionShape::cuboid(CUBE_HALF_EXTENT, CUBE_HALF_EXTENT, CUBE_HALF_EXTENT),
            )
            .with_room(room)
            .with_mass(CUBE_MASS)
            .with_tag(BodyTag::Cube {
                index: index as u32,
            }),
        );
        Self {
            object,
            index,
            spawn,
            spawn_room: room,
        }
    }

    pub fn object(&self) -> ObjectHandle {
        self.object
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn transform(&self, physics: &CollisionScene) -> Transform {
        physics
            .object_transform(self.object)
            .unwrap_or(self.spawn)
    }

    /// Respawn the cube when it has fallen out of the level
    pub fn update(&mut self, physics: &mut CollisionScene) {
        let Ok(transform) = physics.object_transform(self.object) else {
            return;
        };
        if transform.position.y < KILL_PLANE_Y {
            log::debug!("cube {} fell out of the level, respawning", self.index);
            let _ = physics.set_object_transform(self.object, self.spawn);
            let _ = physics.set_object_velocity(self.object, Vec3::ZERO);
            let _ = physics.set_object_room(self.object, self.spawn_room);
        }
    }
}
