//! Quaternion for 3D rotations

use crate::matrix::Mat4;
use crate::vector::Vec3;
use core::ops::Mul;

/// Unit quaternion representing a 3D rotation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create from axis and angle (radians)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half = angle * 0.5;
        let (sin, cos) = half.sin_cos();
        let axis = axis.normalize();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(0.0, half.sin(), 0.0, half.cos())
    }

    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let half = angle * 0.5;
        Self::new(half.sin(), 0.0, 0.0, half.cos())
    }

    /// Rotation that points local -Z along `forward` with `up` as the up
    /// hint. This is what portal placement uses to orient a surface from a
    /// hit normal.
    ///
    /// An up hint parallel to `forward` carries no roll information; a fixed
    /// perpendicular axis substitutes so the result stays unit-norm.
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let z = -forward.normalize();
        let mut x = up.cross(z);
        if x.length_squared() < 1e-8 {
            x = Vec3::Y.cross(z);
            if x.length_squared() < 1e-8 {
                x = Vec3::Z.cross(z);
            }
        }
        let x = x.normalize();
        let y = z.cross(x);
        Self::from_basis(x, y, z)
    }

    /// Quaternion from an orthonormal basis (the columns of a rotation
    /// matrix). Shepperd's method, branching on the largest diagonal term.
    pub fn from_basis(x: Vec3, y: Vec3, z: Vec3) -> Self {
        let trace = x.x + y.y + z.z;

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((y.z - z.y) / s, (z.x - x.z) / s, (x.y - y.x) / s, 0.25 * s)
        } else if x.x > y.y && x.x > z.z {
            let s = (1.0 + x.x - y.y - z.z).sqrt() * 2.0;
            Self::new(0.25 * s, (x.y + y.x) / s, (z.x + x.z) / s, (y.z - z.y) / s)
        } else if y.y > z.z {
            let s = (1.0 + y.y - x.x - z.z).sqrt() * 2.0;
            Self::new((x.y + y.x) / s, 0.25 * s, (y.z + z.y) / s, (z.x - x.z) / s)
        } else {
            let s = (1.0 + z.z - x.x - y.y).sqrt() * 2.0;
            Self::new((z.x + x.z) / s, (y.z + z.y) / s, 0.25 * s, (x.y - y.x) / s)
        }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Renormalize. Composition drifts; callers keep rotations unit-norm.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate (inverse for unit quaternions)
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    #[inline]
    pub fn inverse(self) -> Self {
        self.conjugate()
    }

    /// Rotate a vector
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let qv = Vec3::new(self.x, self.y, self.z);
        let uv = qv.cross(v);
        let uuv = qv.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Convert to a 4x4 rotation matrix
    pub fn to_mat4(self) -> Mat4 {
        let x2 = self.x + self.x;
        let y2 = self.y + self.y;
        let z2 = self.z + self.z;
        let xx = self.x * x2;
        let xy = self.x * y2;
        let xz = self.x * z2;
        let yy = self.y * y2;
        let yz = self.y * z2;
        let zz = self.z * z2;
        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        Mat4::from_cols_array([
            1.0 - (yy + zz), xy + wz, xz - wy, 0.0,
            xy - wz, 1.0 - (xx + zz), yz + wx, 0.0,
            xz + wy, yz - wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[inline]
    pub fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.rotate(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rotation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!((Quat::IDENTITY * v - v).length() < 1e-6);
    }

    #[test]
    fn test_rotation_y() {
        let q = Quat::from_rotation_y(core::f32::consts::PI / 2.0);
        let r = q * Vec3::X;
        assert!((r - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_conjugate_undoes_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(1.0, 2.0, 0.5), 1.3);
        let v = Vec3::new(-2.0, 0.4, 7.0);
        let back = q.conjugate() * (q * v);
        assert!((back - v).length() < 1e-5);
    }

    #[test]
    fn test_look_rotation_forward() {
        // -Z is the look direction convention
        let q = Quat::look_rotation(Vec3::NEG_Z, Vec3::UP);
        let f = q * Vec3::NEG_Z;
        assert!((f - Vec3::NEG_Z).length() < 1e-5);

        let q = Quat::look_rotation(Vec3::X, Vec3::UP);
        let f = q * Vec3::NEG_Z;
        assert!((f - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_look_rotation_keeps_up() {
        let q = Quat::look_rotation(Vec3::X, Vec3::UP);
        let u = q * Vec3::Y;
        assert!((u - Vec3::UP).length() < 1e-4);
    }

    #[test]
    fn test_look_rotation_parallel_up_stays_unit() {
        // Looking straight along the up hint: roll is arbitrary but the
        // rotation must stay unit-norm and still aim -Z at the target
        for (forward, up) in [
            (Vec3::Y, Vec3::Y),
            (Vec3::NEG_Y, Vec3::Y),
            (Vec3::Z, Vec3::Z),
            (Vec3::Y, Vec3::NEG_Y),
        ] {
            let q = Quat::look_rotation(forward, up);
            assert!((q.length() - 1.0).abs() < 1e-5, "|q| = {}", q.length());
            let f = q * Vec3::NEG_Z;
            assert!((f - forward.normalize()).length() < 1e-4);
        }
    }
}
