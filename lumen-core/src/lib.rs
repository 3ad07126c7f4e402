//! # lumen-core
//!
//! Shared data model for the Lumen rich-text label and the `<material=…>`
//! markup parser.
//!
//! ## Architecture
//!
//! ```text
//! display text ──► markup::parse() ──► Vec<Tag { start, end, Effect }>
//!                                            │
//!                                            ▼
//!                          vertex effects (lumen-render) over Vec<Vertex>
//! ```
//!
//! - **`geometry`**: `Vec2` and `Rect` in layout-local space.
//! - **`color`**: `Color32` (RGBA8) with HTML-style parsing.
//! - **`vertex`**: one vertex of a glyph quad.
//! - **`tag`**: closed effect spans and their per-kind attributes.
//! - **`icon`**: inline image / underline descriptors and click rects.
//! - **`markup`**: the nested `<material>` tag parser.

pub mod color;
pub mod geometry;
pub mod icon;
pub mod markup;
pub mod tag;
pub mod vertex;

// Re-exports for ergonomic use.
pub use color::Color32;
pub use geometry::{Rect, Vec2};
pub use icon::{EventRect, IconDescriptor};
pub use markup::{MarkupIssue, TagInterpreter};
pub use tag::{Effect, GradientEffect, OffsetEffect, Tag, UnderlineEffect};
pub use vertex::{Vertex, VERTS_PER_QUAD};
