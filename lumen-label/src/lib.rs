//! # lumen-label
//!
//! The rich-text label a host embeds: text in, mesh plus icon sprites and
//! click dispatch out.
//!
//! ## Architecture
//!
//! ```text
//! LabelConfig (JSON) ──► GenerationSettings
//!                               │
//! RichLabel::set_text ──► populate_mesh ──► lumen_layout::layout
//!                               │                    │
//!                               │           LabelRenderer::render
//!                               ▼                    │
//!                      RenderedLabel ◄───────────────┘
//!                        │        │
//!            update(dt)  │        │  handle_click(point)
//!                        ▼        ▼
//!                  SpritePool   EventRegistry ──► listeners / fallback
//! ```
//!
//! - **`label`**: `RichLabel`: invalidation, callbacks, preferred sizes.
//! - **`pool`**: pooled sprite instances and frame animation.
//! - **`config`**: `LabelConfig` and `ConfigError`.

pub mod config;
pub mod label;
pub mod pool;

// Re-exports for ergonomic use.
pub use config::{ConfigError, LabelConfig};
pub use label::{ClickListener, RichLabel};
pub use pool::{SpriteGetter, SpriteInstance, SpritePool, SpriteResolver, SpriteSetter};
