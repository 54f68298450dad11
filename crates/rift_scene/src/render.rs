//! Render pass state
//!
//! The scene does not rasterize. It appends opaque fragments to a
//! [`RenderState`] in draw order; the platform layer turns fragments into
//! actual display lists. A per-frame scratch matrix buffer backs object
//! fragments so the platform can upload them in one block.

use rift_math::{Mat4, Transform, Vec3};

/// State of one (possibly recursive) render pass
#[derive(Debug, Clone, Copy)]
pub struct RenderProps {
    /// Camera for this pass
    pub camera: Transform,
    /// Portal this view came out of, excluded from re-rendering
    pub from_portal: Option<usize>,
    /// Recursion depth; the player's own view is depth 0
    pub depth: usize,
    /// Room the camera is in for this pass
    pub current_room: usize,
}

impl RenderProps {
    /// Props for the player's own view
    pub fn primary(camera: Transform, room: usize) -> Self {
        Self {
            camera,
            from_portal: None,
            depth: 0,
            current_room: room,
        }
    }
}

/// Kinds of gameplay objects a fragment can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Cube,
    Button,
    Door,
    PortalGun,
}

/// One opaque draw fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Static geometry of one room
    Room { room: usize, depth: usize },
    /// A portal's own surface
    PortalSurface { portal: usize, depth: usize },
    /// The world seen through a portal
    PortalView { portal: usize, depth: usize },
    /// A dynamic object, transform in the scratch buffer
    Object {
        kind: ObjectKind,
        index: usize,
        matrix: usize,
    },
    /// Debug line list (collider AABBs, contact state)
    DebugLines { lines: Vec<(Vec3, Vec3)> },
    /// Diagnostic overlay bar
    PerformanceBar {
        cpu_time_us: u64,
        frame_time_us: u64,
    },
}

/// Accumulates fragments and scratch matrices for one frame
#[derive(Debug, Default)]
pub struct RenderState {
    fragments: Vec<Fragment>,
    matrices: Vec<Mat4>,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything from the previous frame
    pub fn begin_frame(&mut self) {
        self.fragments.clear();
        self.matrices.clear();
    }

    /// Append a fragment
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Reserve one scratch matrix, returning its index
    pub fn push_matrix(&mut self, matrix: Mat4) -> usize {
        self.matrices.push(matrix);
        self.matrices.len() - 1
    }

    /// Fragments in draw order
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The frame's scratch matrix buffer
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Count portal-view fragments for one portal
    pub fn portal_view_count(&self, portal: usize) -> usize {
        self.fragments
            .iter()
            .filter(|f| matches!(f, Fragment::PortalView { portal: p, .. } if *p == portal))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame_clears() {
        let mut state = RenderState::new();
        state.push(Fragment::Room { room: 0, depth: 0 });
        state.push_matrix(Mat4::IDENTITY);
        state.begin_frame();
        assert!(state.fragments().is_empty());
        assert!(state.matrices().is_empty());
    }

    #[test]
    fn test_matrix_indices_are_stable() {
        let mut state = RenderState::new();
        let a = state.push_matrix(Mat4::IDENTITY);
        let b = state.push_matrix(Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0)));
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(state.matrices().len(), 2);
    }

    #[test]
    fn test_portal_view_count() {
        let mut state = RenderState::new();
        state.push(Fragment::PortalView { portal: 0, depth: 1 });
        state.push(Fragment::PortalSurface { portal: 1, depth: 0 });
        assert_eq!(state.portal_view_count(0), 1);
        assert_eq!(state.portal_view_count(1), 0);
    }
}
