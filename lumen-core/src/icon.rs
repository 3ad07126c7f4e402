//! Inline icon descriptors and clickable regions.
//!
//! Both are rebuilt on every layout pass and handed to the host: icons to
//! the sprite pool, event rects to the hit-test registry.

use serde::{Deserialize, Serialize};

use crate::color::Color32;
use crate::geometry::{Rect, Vec2};

/// An inline image (or a synthesized underline bar) anchored into the text.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct IconDescriptor {
    /// Sprite names in frame order. Empty for underline bars and for
    /// image tags without a `sprite` attribute.
    pub sprites: Vec<String>,
    pub atlas: Option<String>,
    /// Frames per second; `<= 0` means a static sprite.
    pub frame_rate: f32,
    /// Vertical anchor in `[-1, 1]`.
    pub pivot: f32,
    /// Size in layout units.
    pub size: Vec2,
    /// First vertex of the placeholder run in the quad buffer.
    pub vertex_index: usize,
    /// Vertex length of the whole placeholder run (markup included).
    pub vertex_len: usize,
    /// Anchored centre in the owner's local space.
    pub position: Vec2,
    pub color: Color32,
    pub event: Option<String>,
    pub args: Option<String>,
}

impl Default for IconDescriptor {
    fn default() -> Self {
        Self {
            sprites: Vec::new(),
            atlas: None,
            frame_rate: -1.0,
            pivot: 0.0,
            size: Vec2::ZERO,
            vertex_index: 0,
            vertex_len: 0,
            position: Vec2::ZERO,
            color: Color32::WHITE,
            event: None,
            args: None,
        }
    }
}

impl IconDescriptor {
    /// A solid-colour bar with no sprite.
    pub fn bar(position: Vec2, size: Vec2, color: Color32) -> Self {
        Self {
            position,
            size,
            color,
            ..Self::default()
        }
    }

    pub fn has_sprite(&self) -> bool {
        !self.sprites.is_empty()
    }

    pub fn is_animated(&self) -> bool {
        self.frame_rate > 0.0
    }
}

/// A clickable rectangle carrying an event payload.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EventRect {
    pub rect: Rect,
    pub name: String,
    pub args: Option<String>,
}

impl EventRect {
    pub fn new(rect: Rect, name: impl Into<String>, args: Option<String>) -> Self {
        Self {
            rect,
            name: name.into(),
            args,
        }
    }
}
