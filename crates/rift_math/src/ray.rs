//! Ray type for portal firing and physics queries

use crate::transform::Transform;
use crate::vector::Vec3;

/// Ray with normalized direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Aim ray for a body: origin at its position, direction along its
    /// forward axis. This is how the player fires portals.
    pub fn from_aim(body: &Transform) -> Self {
        Self::new(body.position, body.forward())
    }

    /// Point at distance t along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Re-express the ray in another frame
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self::new(
            transform.transform_point(self.origin),
            transform.transform_direction(self.direction),
        )
    }
}
