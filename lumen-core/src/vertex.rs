//! Glyph-quad vertices as produced by a glyph layout engine.
//!
//! Every character of the laid-out text maps to one quad of four
//! consecutive vertices, wound clockwise from the top-left corner:
//!
//! ```text
//!   0 ──── 1
//!   │      │
//!   3 ──── 2
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Color32;
use crate::geometry::Vec2;

/// Number of vertices per character quad.
pub const VERTS_PER_QUAD: usize = 4;

/// Corner offsets within a quad.
pub const TOP_LEFT: usize = 0;
pub const TOP_RIGHT: usize = 1;
pub const BOTTOM_RIGHT: usize = 2;
pub const BOTTOM_LEFT: usize = 3;

/// A single vertex of a character quad.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Vertex {
    /// Position in layout pixels; `z` is carried through untouched.
    pub position: [f32; 3],
    pub color: Color32,
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(x: f32, y: f32, color: Color32) -> Self {
        Self {
            position: [x, y, 0.0],
            color,
            uv: [0.0, 0.0],
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position[1]
    }

    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }

    /// Copy of this vertex moved by `(dx, dy)`.
    #[inline]
    pub fn offset(mut self, dx: f32, dy: f32) -> Self {
        self.position[0] += dx;
        self.position[1] += dy;
        self
    }

    /// Build a quad in `0,1,2,3` corner order from its edges.
    pub fn quad(left: f32, top: f32, right: f32, bottom: f32, color: Color32) -> [Vertex; 4] {
        [
            Vertex {
                uv: [0.0, 1.0],
                ..Vertex::new(left, top, color)
            },
            Vertex {
                uv: [1.0, 1.0],
                ..Vertex::new(right, top, color)
            },
            Vertex {
                uv: [1.0, 0.0],
                ..Vertex::new(right, bottom, color)
            },
            Vertex::new(left, bottom, color),
        ]
    }

    /// A zero-area quad collapsed onto one point.
    pub fn degenerate(x: f32, y: f32, color: Color32) -> [Vertex; 4] {
        [Vertex::new(x, y, color); 4]
    }
}
