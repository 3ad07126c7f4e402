//! The host-facing rich-text label.
//!
//! `RichLabel` owns the pipeline for one piece of text:
//!
//! ```text
//!   set_text ─► (dirty) ─► populate_mesh ─► RenderedLabel ─┬─► mesh upload
//!                                                          ├─► EventRegistry
//!                                                          └─► update ─► SpritePool
//! ```
//!
//! Nothing is laid out eagerly: setters mark the label dirty and the host
//! calls `populate_mesh` from its rebuild step and `update` once per frame.

use lumen_core::{Color32, Vec2, VERTS_PER_QUAD};
use lumen_layout::{layout, EventRegistry};
use lumen_render::bridge::scale_vertices;
use lumen_render::{effect_context, LabelRenderer, RenderedLabel};
use lumen_text::{GenerationSettings, GlyphLayout};

use crate::config::{ConfigError, LabelConfig};
use crate::pool::{SpriteInstance, SpritePool, SpriteResolver};

pub type ClickListener = Box<dyn FnMut(&str, Option<&str>)>;

pub struct RichLabel<G, S> {
    engine: G,
    settings: GenerationSettings,
    text: String,
    renderer: LabelRenderer,
    frame: RenderedLabel,
    registry: EventRegistry,
    pool: SpritePool<S>,
    resolver: Option<SpriteResolver<S>>,
    listeners: Vec<ClickListener>,
    click_fallback: Option<Box<dyn FnMut()>>,
    on_relayout: Option<Box<dyn FnOnce()>>,
    vertices_dirty: bool,
    images_dirty: bool,
    prefer_width_text: String,
    prefer_height_text: String,
}

impl<G: GlyphLayout, S> RichLabel<G, S> {
    pub fn new(engine: G, settings: GenerationSettings) -> Self {
        Self {
            engine,
            settings,
            text: String::new(),
            renderer: LabelRenderer::new(),
            frame: RenderedLabel::default(),
            registry: EventRegistry::new(),
            pool: SpritePool::new(),
            resolver: None,
            listeners: Vec::new(),
            click_fallback: None,
            on_relayout: None,
            vertices_dirty: true,
            images_dirty: false,
            prefer_width_text: String::new(),
            prefer_height_text: String::new(),
        }
    }

    pub fn from_config(engine: G, config: &LabelConfig) -> Result<Self, ConfigError> {
        let settings = config.generation_settings(config.extents())?;
        Ok(Self::new(engine, settings))
    }

    // ── Content ─────────────────────────────────────────────────────

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.set_vertices_dirty();
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GenerationSettings) {
        self.settings = settings;
        self.set_vertices_dirty();
    }

    pub fn set_rich_text(&mut self, rich_text: bool) {
        if self.settings.rich_text != rich_text {
            self.settings.rich_text = rich_text;
            self.set_vertices_dirty();
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        self.settings.color = color;
        self.set_vertices_dirty();
    }

    pub fn set_vertices_dirty(&mut self) {
        self.vertices_dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.vertices_dirty
    }

    // ── Callbacks ───────────────────────────────────────────────────

    /// Add a click listener; every listener sees every event hit.
    pub fn add_listener(&mut self, listener: impl FnMut(&str, Option<&str>) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn remove_all_listeners(&mut self) {
        self.clear_listeners();
    }

    /// Called for clicks that hit no event rect.
    pub fn set_click_fallback(&mut self, fallback: impl FnMut() + 'static) {
        self.click_fallback = Some(Box::new(fallback));
    }

    /// Called once after the next sprite reconciliation, then dropped.
    pub fn set_on_relayout(&mut self, callback: impl FnOnce() + 'static) {
        self.on_relayout = Some(Box::new(callback));
    }

    /// Resolve sprites by name. Replaces any setter.
    pub fn set_sprite_getter(&mut self, getter: impl FnMut(Option<&str>, &str) -> Option<S> + 'static) {
        self.resolver = Some(SpriteResolver::Getter(Box::new(getter)));
    }

    /// Assign sprites onto pool instances. Replaces any getter.
    pub fn set_sprite_setter(
        &mut self,
        setter: impl FnMut(&mut SpriteInstance<S>, Option<&str>, &str) + 'static,
    ) {
        self.resolver = Some(SpriteResolver::Setter(Box::new(setter)));
    }

    // ── Pipeline ────────────────────────────────────────────────────

    /// Lay out the current text and apply its effects.
    pub fn populate_mesh(&mut self) -> &RenderedLabel {
        self.vertices_dirty = false;
        self.images_dirty = true;

        if !self.settings.rich_text {
            let mut vertices = self.engine.populate(&self.text, &self.settings).to_vec();
            vertices.truncate(vertices.len().saturating_sub(VERTS_PER_QUAD));
            scale_vertices(&mut vertices, self.settings.units_per_pixel());
            self.prefer_width_text.clone_from(&self.text);
            self.prefer_height_text.clone_from(&self.text);
            self.registry.clear();
            self.frame = RenderedLabel {
                text: self.text.clone(),
                vertices,
                ..RenderedLabel::default()
            };
            return &self.frame;
        }

        let out = layout(&mut self.engine, &self.text, &self.settings);
        self.prefer_width_text.clone_from(&out.prefer_width_text);
        self.prefer_height_text.clone_from(&out.prefer_height_text);
        let ctx = effect_context(&self.settings, self.settings.color);
        self.frame = self.renderer.render(out, &ctx);
        self.registry.replace(self.frame.events.iter().cloned());
        log::debug!(
            "label populated: {} quads, {} icons, {} events",
            self.frame.vertices.len() / VERTS_PER_QUAD,
            self.frame.icons.len(),
            self.frame.events.len()
        );
        &self.frame
    }

    /// Per-frame tick: reconcile sprites after a layout, then animate.
    pub fn update(&mut self, dt: f32) {
        if self.images_dirty {
            self.images_dirty = false;
            self.pool.reconcile(&self.frame.icons, self.resolver.as_mut());
            if let Some(callback) = self.on_relayout.take() {
                callback();
            }
        }
        self.pool.tick(dt, self.resolver.as_mut());
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn frame(&self) -> &RenderedLabel {
        &self.frame
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &SpritePool<S> {
        &self.pool
    }

    /// Unwrapped width in layout units.
    pub fn preferred_width(&mut self) -> f32 {
        if self.vertices_dirty {
            self.populate_mesh();
        }
        let settings = self.settings.with_extents(Vec2::ZERO);
        self.engine.preferred_width(&self.prefer_width_text, &settings) * self.settings.units_per_pixel()
    }

    /// Height in layout units when wrapped to `width`.
    pub fn preferred_height(&mut self, width: f32) -> f32 {
        if self.vertices_dirty {
            self.populate_mesh();
        }
        let settings = self.settings.with_extents(Vec2::new(width, 0.0));
        self.engine.preferred_height(&self.prefer_height_text, &settings) * self.settings.units_per_pixel()
    }

    /// Dispatch a click at `point` (label-local, pivot-relative).
    ///
    /// Returns `true` when an event rect was hit.
    pub fn handle_click(&mut self, point: Vec2) -> bool {
        if let Some(hit) = self.registry.hit_test(point) {
            log::debug!("click hit {:?}", hit.name);
            for listener in self.listeners.iter_mut() {
                listener(hit.name, hit.args);
            }
            return true;
        }
        if let Some(fallback) = self.click_fallback.as_mut() {
            fallback();
        }
        false
    }
}

impl<G, S> std::fmt::Debug for RichLabel<G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RichLabel")
            .field("text", &self.text)
            .field("settings", &self.settings)
            .field("vertices_dirty", &self.vertices_dirty)
            .field("listeners", &self.listeners.len())
            .field("events", &self.registry.len())
            .finish_non_exhaustive()
    }
}

// ===================================================================
// Tests
// ===================================================================
