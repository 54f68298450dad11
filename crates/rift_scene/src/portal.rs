//! Portal entity
//!
//! Two portals exist for the whole scene lifetime, indexed 0 and 1, each the
//! other's counterpart. A portal starts unopened and becomes open the first
//! time a placement succeeds; re-placement overwrites in place and nothing
//! ever closes one.
//!
//! Portal 1 carries odd parity: its placement faces into the wall and its
//! surface winding is mirrored. The collision scene's table only ever holds
//! outward-facing transforms, so odd-parity placements are turned half a
//! turn before being committed.

use rift_math::{Quat, Transform, Vec3};
use rift_physics::CollisionScene;

use crate::audio::{sounds, SoundPlayer};

/// Maximum recursion depth of portal views. Depth 0 is the player's own
/// view; one level of "world seen through a portal" renders beyond it.
pub const MAX_PORTAL_DEPTH: usize = 1;

/// Half-turn about Y separating "into the entry portal" from "out of the
/// exit portal"
pub const FLIP_Y180: Quat = Quat::new(0.0, 1.0, 0.0, 0.0);

/// Portal lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalState {
    Unopened,
    Open,
}

/// One of the scene's two portals
#[derive(Debug, Clone)]
pub struct Portal {
    index: usize,
    state: PortalState,
    /// Transform as placed; odd parity faces into the wall
    transform: Transform,
    /// Quad hosting the portal, once open
    quad: Option<usize>,
    /// Room the portal surface sits in
    room: usize,
}

impl Portal {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: PortalState::Unopened,
            transform: Transform::IDENTITY,
            quad: None,
            room: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Odd parity mirrors the surface winding and the placement facing
    pub fn odd_parity(&self) -> bool {
        self.index == 1
    }

    pub fn is_open(&self) -> bool {
        self.state == PortalState::Open
    }

    /// Placement transform (meaningless until open)
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn quad(&self) -> Option<usize> {
        self.quad
    }

    pub fn room(&self) -> usize {
        self.room
    }

    /// The outward-facing transform committed to the collision scene
    pub fn outward_transform(&self) -> Transform {
        if self.odd_parity() {
            Transform::from_position_rotation(
                self.transform.position,
                (self.transform.rotation * FLIP_Y180).normalize(),
            )
        } else {
            self.transform
        }
    }

    /// Commit a placement: overwrite the portal, write the collision scene's
    /// table, play the placement sound.
    pub fn open(
        &mut self,
        transform: Transform,
        quad: usize,
        room: usize,
        physics: &mut CollisionScene,
        sound_player: &mut dyn SoundPlayer,
    ) {
        self.transform = transform;
        self.quad = Some(quad);
        self.room = room;
        self.state = PortalState::Open;

        // Index 0/1 is within range by construction
        let _ = physics.open_portal(self.index, self.outward_transform(), room);
        sound_player.play(sounds::PORTAL_OPEN, 1.0, 1.0);
        log::debug!(
            "portal {} opened on quad {} in room {}",
            self.index,
            quad,
            room
        );
    }

    /// Re-express a camera for the view seen through this portal: out of the
    /// counterpart, turned half a turn.
    pub fn far_view(&self, counterpart: &Portal, camera: &Transform) -> Transform {
        let relative = counterpart.outward_transform()
            * Transform::from_position_rotation(Vec3::ZERO, FLIP_Y180)
            * self.outward_transform().inverse();
        relative * *camera
    }

    /// Whether this portal's far view should render for the given
    /// render-pass state.
    pub fn should_render_view(
        &self,
        counterpart: &Portal,
        from_portal: Option<usize>,
        depth: usize,
        room_visible: bool,
    ) -> bool {
        self.is_open()
            && counterpart.is_open()
            && from_portal != Some(self.index)
            && depth < MAX_PORTAL_DEPTH
            && room_visible
    }
}
