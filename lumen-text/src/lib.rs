//! # lumen-text
//!
//! Glyph layout engines for the Lumen rich-text label. An engine turns a
//! string with host markup into one quad per character (plus a trailing
//! sentinel), which is the contract every later stage indexes into.
//!
//! ## Architecture
//!
//! ```text
//! GenerationSettings ─┐
//!                     ▼
//! text ──► rich::scan ──► GlyphLayout::populate ──► &[Vertex]  (quad per char)
//!                              │
//!              ┌───────────────┴───────────────┐
//!        MonospaceLayout                 CosmicLayout
//!     (fixed advance, no fonts)    (cosmic-text shaping + LRU)
//! ```
//!
//! - **`engine`**: `GlyphLayout` trait, generation settings, alignment.
//! - **`rich`**: per-character styles from `<b>`, `<i>`, `<size>`, `<color>`.
//! - **`mono`**: deterministic fixed-advance engine.
//! - **`cosmic`**: shaping engine backed by `cosmic-text`.

pub mod cosmic;
pub mod engine;
pub mod mono;
pub mod rich;

// Re-exports for ergonomic use.
pub use cosmic::CosmicLayout;
pub use engine::{
    GenerationSettings, GlyphLayout, HorizontalWrapMode, TextAlign, TextAnchor, VerticalAlign,
    VerticalWrapMode,
};
pub use mono::MonospaceLayout;
pub use rich::CharStyle;
