//! Portal surface generation
//!
//! A portal may only open where its footprint fits almost entirely inside a
//! designer-authored slot rectangle. The footprint is an octagonal
//! approximation of the portal ellipse, projected into the quad's local 2D
//! space and clipped against each candidate slot in authoring order.

use rift_math::{Polygon2, Transform, Vec2};
use rift_physics::{PORTAL_HALF_HEIGHT, PORTAL_HALF_WIDTH};

use crate::level::{LevelQuad, PortalSlot};

/// Fraction of the footprint area a slot must retain to host the portal
pub const PORTAL_COVERAGE_MIN: f32 = 0.99;

/// Octagon segment count for the footprint
const FOOTPRINT_SEGMENTS: usize = 8;

/// A generated portal surface: which slot hosts it and the final transform
#[derive(Debug, Clone, Copy)]
pub struct PortalSurface {
    /// Index into the level's global slot table
    pub slot: usize,
    /// The portal transform as placed
    pub transform: Transform,
}

/// Footprint of a portal centered at `center` in quad-local 2D space
fn footprint(center: Vec2) -> Polygon2 {
    Polygon2::ellipse(
        center,
        PORTAL_HALF_WIDTH,
        PORTAL_HALF_HEIGHT,
        FOOTPRINT_SEGMENTS,
    )
}

/// Try to host the portal in one slot. Accepts iff the clipped footprint
/// keeps at least [`PORTAL_COVERAGE_MIN`] of its area.
pub fn generate(
    slot_index: usize,
    slot: &PortalSlot,
    quad: &LevelQuad,
    desired: &Transform,
) -> Option<PortalSurface> {
    let center = quad.to_local_2d(desired.position);
    let poly = footprint(center);
    let full_area = poly.area();
    if full_area <= 0.0 {
        return None;
    }

    let clipped = poly.clip_to_rect(slot.min, slot.max);
    let kept = clipped.area() / full_area;
    if kept < PORTAL_COVERAGE_MIN {
        log::trace!(
            "slot {} rejected portal at {:?}: {:.3} coverage",
            slot_index,
            desired.position,
            kept
        );
        return None;
    }

    Some(PortalSurface {
        slot: slot_index,
        transform: *desired,
    })
}

/// Try every slot of a quad in authoring order; first fit wins.
///
/// Returns `None` when the quad refuses portals or no slot can keep the
/// footprint covered.
pub fn generate_for_quad(
    quad: &LevelQuad,
    slots: &[PortalSlot],
    desired: &Transform,
) -> Option<PortalSurface> {
    if !quad.portalable {
        return None;
    }
    for slot_index in quad.slots.min..quad.slots.max {
        // Validated ranges stay inside the table; a stray index must not
        // end the scan early
        let Some(slot) = slots.get(slot_index) else {
            continue;
        };
        if let Some(surface) = generate(slot_index, slot, quad, desired) {
            return Some(surface);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::SlotRange;
    use rift_math::{Quat, Vec3};

    fn wall_quad(slots: SlotRange) -> LevelQuad {
        // Wall in the XY plane facing +Z
        LevelQuad {
            transform: Transform::from_position_rotation(
                Vec3::new(0.0, 1.0, -4.0),
                Quat::from_rotation_y(core::f32::consts::PI),
            ),
            half_width: 4.0,
            half_height: 2.0,
            room: 0,
            portalable: true,
            slots,
        }
    }

    fn big_slot() -> PortalSlot {
        PortalSlot {
            min: Vec2::new(-2.0, -2.0),
            max: Vec2::new(2.0, 2.0),
        }
    }

    fn tiny_slot() -> PortalSlot {
        PortalSlot {
            min: Vec2::new(-0.2, -0.2),
            max: Vec2::new(0.2, 0.2),
        }
    }

    #[test]
    fn test_fitting_slot_accepts() {
        let quad = wall_quad(SlotRange { min: 0, max: 1 });
        let slots = [big_slot()];
        let desired = Transform::from_position(Vec3::new(0.0, 1.0, -4.0));

        let surface = generate_for_quad(&quad, &slots, &desired).expect("portal should fit");
        assert_eq!(surface.slot, 0);
        assert_eq!(surface.transform.position, desired.position);
    }

    #[test]
    fn test_too_small_slot_rejects() {
        let quad = wall_quad(SlotRange { min: 0, max: 1 });
        let slots = [tiny_slot()];
        let desired = Transform::from_position(Vec3::new(0.0, 1.0, -4.0));

        assert!(generate_for_quad(&quad, &slots, &desired).is_none());
    }

    #[test]
    fn test_first_fit_skips_small_slots() {
        // First two slots too small, third hosts the portal
        let quad = wall_quad(SlotRange { min: 0, max: 3 });
        let slots = [tiny_slot(), tiny_slot(), big_slot()];
        let desired = Transform::from_position(Vec3::new(0.0, 1.0, -4.0));

        let surface = generate_for_quad(&quad, &slots, &desired).expect("third slot should fit");
        assert_eq!(surface.slot, 2);
    }

    #[test]
    fn test_scan_survives_range_past_table_end() {
        // Range claims four slots but the table holds three; the scan must
        // still reach the in-range fit and never cut off early
        let quad = wall_quad(SlotRange { min: 0, max: 4 });
        let slots = [tiny_slot(), tiny_slot(), big_slot()];
        let desired = Transform::from_position(Vec3::new(0.0, 1.0, -4.0));

        let surface = generate_for_quad(&quad, &slots, &desired).expect("third slot should fit");
        assert_eq!(surface.slot, 2);

        // All in-range slots too small: clean rejection, no panic
        let slots = [tiny_slot()];
        assert!(generate_for_quad(&quad, &slots, &desired).is_none());
    }

    #[test]
    fn test_footprint_near_slot_edge_rejects() {
        let quad = wall_quad(SlotRange { min: 0, max: 1 });
        let slots = [big_slot()];
        // Centered so the footprint pokes past the slot's right edge
        let desired = Transform::from_position(Vec3::new(1.8, 1.0, -4.0));

        assert!(generate_for_quad(&quad, &slots, &desired).is_none());
    }

    #[test]
    fn test_unportalable_quad_rejects() {
        let mut quad = wall_quad(SlotRange { min: 0, max: 1 });
        quad.portalable = false;
        let slots = [big_slot()];
        let desired = Transform::from_position(Vec3::new(0.0, 1.0, -4.0));

        assert!(generate_for_quad(&quad, &slots, &desired).is_none());
    }
}
