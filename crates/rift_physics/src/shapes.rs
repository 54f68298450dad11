//! Collision shape descriptions

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Collision shape type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Sphere with radius
    Sphere { radius: f32 },
    /// Box with half-extents
    Box { half_extents: [f32; 3] },
    /// Capsule aligned along Y axis
    Capsule { half_height: f32, radius: f32 },
    /// Cylinder aligned along Y axis
    Cylinder { half_height: f32, radius: f32 },
    /// Convex hull from points
    ConvexHull { points: Vec<[f32; 3]> },
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

impl CollisionShape {
    /// Create a sphere shape
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a box shape from half-extents
    pub fn cuboid(hx: f32, hy: f32, hz: f32) -> Self {
        Self::Box {
            half_extents: [hx, hy, hz],
        }
    }

    /// Create a box shape from full size
    pub fn from_size(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: [width * 0.5, height * 0.5, depth * 0.5],
        }
    }

    /// Create a capsule shape (Y-aligned)
    pub fn capsule(half_height: f32, radius: f32) -> Self {
        Self::Capsule { half_height, radius }
    }

    /// Create a cylinder shape (Y-aligned)
    pub fn cylinder(half_height: f32, radius: f32) -> Self {
        Self::Cylinder { half_height, radius }
    }

    /// Build a Rapier shared shape
    pub(crate) fn to_rapier(&self) -> rapier::SharedShape {
        match self {
            Self::Sphere { radius } => rapier::SharedShape::ball(*radius),
            Self::Box { half_extents } => {
                rapier::SharedShape::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            Self::Capsule { half_height, radius } => {
                rapier::SharedShape::capsule_y(*half_height, *radius)
            }
            Self::Cylinder { half_height, radius } => {
                rapier::SharedShape::cylinder(*half_height, *radius)
            }
            Self::ConvexHull { points } => {
                let pts: Vec<rapier::Point<f32>> = points
                    .iter()
                    .map(|p| rapier::Point::new(p[0], p[1], p[2]))
                    .collect();
                rapier::SharedShape::convex_hull(&pts)
                    .unwrap_or_else(|| rapier::SharedShape::ball(0.1))
            }
        }
    }
}
