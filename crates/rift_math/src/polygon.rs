//! 2D convex polygon clipping
//!
//! The portal surface generator projects the portal footprint into a quad's
//! local 2D space and clips it against the candidate slot rectangle. The
//! surviving area decides whether the slot can host the portal.

use crate::vector::Vec2;

/// Convex polygon with counter-clockwise winding
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon2 {
    pub vertices: Vec<Vec2>,
}

impl Polygon2 {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Regular n-gon approximation of an ellipse, counter-clockwise.
    /// Portal footprints use this with n = 8.
    pub fn ellipse(center: Vec2, radius_x: f32, radius_y: f32, segments: usize) -> Self {
        let mut vertices = Vec::with_capacity(segments);
        for i in 0..segments {
            let angle = core::f32::consts::TAU * (i as f32) / (segments as f32);
            vertices.push(Vec2::new(
                center.x + radius_x * angle.cos(),
                center.y + radius_y * angle.sin(),
            ));
        }
        Self { vertices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Signed area via the shoelace formula; positive for counter-clockwise
    /// winding.
    pub fn area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let mut sum = 0.0;
        let n = self.vertices.len();
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            sum += a.cross(b);
        }
        sum * 0.5
    }

    /// Clip against an axis-aligned rectangle with Sutherland-Hodgman.
    /// Returns the surviving polygon, possibly empty.
    pub fn clip_to_rect(&self, min: Vec2, max: Vec2) -> Self {
        let mut current = self.vertices.clone();

        // Each edge as (inside test, intersection parameter)
        for edge in 0..4 {
            if current.is_empty() {
                break;
            }
            let mut next = Vec::with_capacity(current.len() + 4);
            let n = current.len();
            for i in 0..n {
                let a = current[i];
                let b = current[(i + 1) % n];
                let (a_in, b_in) = match edge {
                    0 => (a.x >= min.x, b.x >= min.x),
                    1 => (a.x <= max.x, b.x <= max.x),
                    2 => (a.y >= min.y, b.y >= min.y),
                    _ => (a.y <= max.y, b.y <= max.y),
                };
                if a_in {
                    next.push(a);
                }
                if a_in != b_in {
                    let t = match edge {
                        0 => (min.x - a.x) / (b.x - a.x),
                        1 => (max.x - a.x) / (b.x - a.x),
                        2 => (min.y - a.y) / (b.y - a.y),
                        _ => (max.y - a.y) / (b.y - a.y),
                    };
                    next.push(a.lerp(b, t));
                }
            }
            current = next;
        }

        Self { vertices: current }
    }
}
