//! # rift_math - Math primitives for the Rift engine
//!
//! Vectors, quaternions, transforms and the small amount of 2D polygon
//! machinery the portal surface generator needs. Game logic composes
//! rotations through quaternions; matrices exist only for the render
//! scratch buffer.

pub mod vector;
pub mod quaternion;
pub mod matrix;
pub mod transform;
pub mod ray;
pub mod bounds;
pub mod polygon;

pub use vector::*;
pub use quaternion::*;
pub use matrix::*;
pub use transform::*;
pub use ray::*;
pub use bounds::*;
pub use polygon::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::matrix::Mat4;
    pub use crate::polygon::Polygon2;
    pub use crate::quaternion::Quat;
    pub use crate::ray::Ray;
    pub use crate::transform::Transform;
    pub use crate::vector::{Vec2, Vec3};
    pub use crate::{clamp, lerp};
}
