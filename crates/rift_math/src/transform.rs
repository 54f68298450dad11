//! Position/rotation/scale transform
//!
//! The portal subsystem leans hard on `inverse` and `combine`: a view seen
//! through a portal pair is `exit * FLIP * entry.inverse() * camera`.

use crate::matrix::Mat4;
use crate::quaternion::Quat;
use crate::vector::Vec3;

/// Complete 3D transform. Rotation stays unit-norm; scale is uniform in
/// practice for everything this engine simulates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Transform a point into world space
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (point * self.scale.x)
    }

    /// Transform a direction (ignores position and scale)
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Forward direction (-Z in local space)
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Right direction (+X in local space)
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Up direction (+Y in local space)
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Inverse transform. Assumes uniform scale.
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.conjugate();
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_position = inv_rotation * (-self.position * inv_scale.x);

        Self {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }

    /// Combine two transforms: `self` applied after `other`.
    /// `self.combine(&other).transform_point(p) ==
    /// self.transform_point(other.transform_point(p))`
    pub fn combine(&self, other: &Transform) -> Self {
        Self {
            position: self.position + self.rotation * (other.position * self.scale.x),
            rotation: (self.rotation * other.rotation).normalize(),
            scale: self.scale * other.scale.x,
        }
    }

    /// Convert to a matrix for the render scratch buffer
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * self.rotation.to_mat4() * Mat4::from_scale(self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl core::ops::Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.combine(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!((Transform::IDENTITY.transform_point(p) - p).length() < 1e-6);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = Transform::from_position_rotation(
            Vec3::new(4.0, -1.0, 2.0),
            Quat::from_axis_angle(Vec3::new(0.3, 1.0, -0.2), 0.7),
        );
        let p = Vec3::new(-3.0, 5.0, 1.5);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!((back - p).length() < 1e-4);
    }

    #[test]
    fn test_combine_matches_nested_apply() {
        let a = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_y(0.5),
        );
        let b = Transform::from_position_rotation(
            Vec3::new(0.0, 2.0, 0.0),
            Quat::from_rotation_x(-0.25),
        );
        let p = Vec3::new(0.5, 0.5, 0.5);
        let composed = a.combine(&b).transform_point(p);
        let nested = a.transform_point(b.transform_point(p));
        assert!((composed - nested).length() < 1e-5);
    }

    #[test]
    fn test_to_matrix_matches_transform_point() {
        let t = Transform::from_position_rotation(
            Vec3::new(2.0, 3.0, -1.0),
            Quat::from_rotation_y(1.1),
        );
        let p = Vec3::new(1.0, -2.0, 0.5);
        let via_matrix = t.to_matrix().transform_point(p);
        assert!((via_matrix - t.transform_point(p)).length() < 1e-4);
    }
}
