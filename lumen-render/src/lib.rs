//! # lumen-render
//!
//! Vertex effects and the final mesh for the Lumen rich-text label.
//!
//! ## Architecture
//!
//! ```text
//! LayoutOutput ──► TagInterpreter::parse(display text)
//!      │                     │
//!      ▼                     ▼
//!   quads ──► apply_effects (shadow, outline, gradient, underline)
//!                            │
//!                            ▼
//!     RenderedLabel { vertices (layout units), icons, events }
//!                            │
//!                            ▼
//!                 Vec<MeshVertex> (bytemuck::Pod)
//! ```
//!
//! - **`effects`**: per-character vertex effects over the quad buffer.
//! - **`bridge`**: layout output → finished frame.
//! - **`mesh`**: `#[repr(C)]` vertex type and quad indices for upload.

pub mod bridge;
pub mod effects;
pub mod mesh;

// Re-exports for ergonomic use.
pub use bridge::{effect_context, LabelRenderer, RenderedLabel};
pub use effects::{apply_effects, EffectContext, EffectSink};
pub use mesh::{build_mesh, quad_indices, MeshVertex};
