//! # lumen-layout
//!
//! Placeholder layout for inline images and the click-region registry.
//!
//! ## Architecture
//!
//! ```text
//! markup ──► placeholder::substitute ──► GlyphLayout::populate (copied)
//!                                              │
//!                      wrap correction ◄───────┤
//!                      truncation      ◄───────┘
//!                              │
//!                              ▼
//!            LayoutOutput { text, vertices, icons, events }
//!                                              │
//!                                              ▼
//!                                     EventRegistry::hit_test
//! ```
//!
//! - **`placeholder`**: image tag scanning and invisible placeholder runs.
//! - **`engine`**: the layout passes producing a [`LayoutOutput`].
//! - **`hit`**: reverse-priority hit testing over event rects.

pub mod engine;
pub mod hit;
pub mod placeholder;

pub use engine::{anchor_offset, layout, LayoutOutput};
pub use hit::{EventRegistry, Hit};
