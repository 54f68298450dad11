//! Collision layers and filtering
//!
//! The scene only needs a handful of fixed layers, so membership and filter
//! masks are baked per object kind instead of going through a configurable
//! collision matrix.

use serde::{Deserialize, Serialize};

/// Membership/filter bitmask pair mapped onto Rapier interaction groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionLayers {
    /// Which groups this object belongs to
    pub memberships: u32,
    /// Which groups this object interacts with
    pub filter: u32,
}

impl CollisionLayers {
    /// Static level geometry (quads, doors when closed)
    pub const STATIC: u32 = 1 << 0;
    /// Tangible dynamic bodies (cubes, decor)
    pub const TANGIBLE: u32 = 1 << 1;
    /// Trigger sensor volumes
    pub const TRIGGER: u32 = 1 << 2;
    /// The player body
    pub const PLAYER: u32 = 1 << 3;
    /// Surfaces that can host a portal
    pub const PORTALABLE: u32 = 1 << 4;

    /// Interact with everything
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    pub const fn new(memberships: u32, filter: u32) -> Self {
        Self { memberships, filter }
    }

    /// Layers for static level geometry
    pub const fn static_geometry() -> Self {
        Self::new(
            Self::STATIC | Self::PORTALABLE,
            Self::TANGIBLE | Self::PLAYER,
        )
    }

    /// Layers for static geometry that refuses portals (glass, grates)
    pub const fn static_no_portal() -> Self {
        Self::new(Self::STATIC, Self::TANGIBLE | Self::PLAYER)
    }

    /// Layers for a tangible dynamic object
    pub const fn tangible() -> Self {
        Self::new(
            Self::TANGIBLE,
            Self::STATIC | Self::TANGIBLE | Self::PLAYER | Self::TRIGGER,
        )
    }

    /// Layers for the player body
    pub const fn player() -> Self {
        Self::new(
            Self::PLAYER,
            Self::STATIC | Self::TANGIBLE | Self::TRIGGER,
        )
    }

    /// Layers for a trigger sensor
    pub const fn trigger() -> Self {
        Self::new(Self::TRIGGER, Self::TANGIBLE | Self::PLAYER)
    }

    /// Filter that hits anything a portal shot can land on
    pub const fn portal_ray() -> Self {
        Self::new(u32::MAX, Self::STATIC | Self::PORTALABLE)
    }

    /// Check if two layer sets interact
    pub fn interacts_with(&self, other: &CollisionLayers) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::ALL
    }
}
