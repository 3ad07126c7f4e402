//! Layout → frame bridge: parses effect tags over the display text,
//! applies them to the layout's quads and scales the result into layout
//! units.

use lumen_core::{Color32, EventRect, IconDescriptor, Tag, TagInterpreter, Vertex};
use lumen_layout::{anchor_offset, LayoutOutput};
use lumen_text::GenerationSettings;

use crate::effects::{apply_effects, EffectContext, EffectSink};
use crate::mesh::{build_mesh, quad_indices, MeshVertex};

/// Effect context for a label with `settings` and colour `owner_color`.
pub fn effect_context(settings: &GenerationSettings, owner_color: Color32) -> EffectContext {
    EffectContext {
        font_size: settings.font_size,
        units_per_pixel: settings.units_per_pixel(),
        anchor: anchor_offset(settings),
        owner_color,
    }
}

/// One finished frame of a label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedLabel {
    pub text: String,
    /// Final quads in layout units, effects included.
    pub vertices: Vec<Vertex>,
    /// Image icons followed by underline bars.
    pub icons: Vec<IconDescriptor>,
    /// Image events in reverse icon order, then underline events.
    pub events: Vec<EventRect>,
    pub tags: Vec<Tag>,
}

impl RenderedLabel {
    pub fn mesh(&self) -> Vec<MeshVertex> {
        build_mesh(&self.vertices, 1.0)
    }

    pub fn indices(&self) -> Vec<u32> {
        quad_indices(self.vertices.len() / lumen_core::VERTS_PER_QUAD)
    }
}

/// Scale engine-pixel vertices into layout units in place.
pub fn scale_vertices(verts: &mut [Vertex], units_per_pixel: f32) {
    for v in verts.iter_mut() {
        v.position[0] *= units_per_pixel;
        v.position[1] *= units_per_pixel;
    }
}

/// Turns layout output into frames; keeps the parser's scratch buffers.
#[derive(Debug, Default)]
pub struct LabelRenderer {
    interpreter: TagInterpreter,
}

impl LabelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, layout: LayoutOutput, ctx: &EffectContext) -> RenderedLabel {
        let LayoutOutput {
            text,
            mut vertices,
            mut icons,
            mut events,
            ..
        } = layout;

        let tags = self.interpreter.parse(&text).to_vec();
        let usable = vertices.len();
        if !tags.is_empty() {
            let mut sink = EffectSink {
                icons: &mut icons,
                events: &mut events,
            };
            apply_effects(&tags, &mut vertices, usable, ctx, &mut sink);
        }
        scale_vertices(&mut vertices, ctx.units_per_pixel);

        RenderedLabel {
            text,
            vertices,
            icons,
            events,
            tags,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
