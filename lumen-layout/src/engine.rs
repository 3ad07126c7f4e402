//! Placeholder layout passes.
//!
//! ```text
//!   markup ─► substitute image tags ─► populate ─┬─► (≤ 1 quad) plain text
//!                                                │
//!                         wrap correction (≤ one re-populate per icon)
//!                                                │
//!                               truncate below the rect ─► resolve icons
//! ```
//!
//! Vertices stay in engine pixels; icon positions and event rects are in
//! layout units, relative to the centre of the label.

use lumen_core::{Color32, EventRect, IconDescriptor, Rect, Vec2, Vertex, VERTS_PER_QUAD};
use lumen_text::{GenerationSettings, GlyphLayout, HorizontalWrapMode, VerticalWrapMode};

use crate::placeholder;

/// Result of one layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutOutput {
    /// Display text: placeholders substituted, wrap breaks inserted.
    pub text: String,
    /// Usable quads in engine pixels; sentinel and truncated quads removed.
    pub vertices: Vec<Vertex>,
    pub icons: Vec<IconDescriptor>,
    pub events: Vec<EventRect>,
    /// Text to measure for the preferred width.
    pub prefer_width_text: String,
    /// Text to measure for the preferred height.
    pub prefer_height_text: String,
}

impl LayoutOutput {
    fn plain(text: String) -> Self {
        Self {
            prefer_width_text: text.clone(),
            prefer_height_text: text.clone(),
            text,
            ..Self::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Offset from the pivot-relative layout space to the label's centre.
pub fn anchor_offset(settings: &GenerationSettings) -> Vec2 {
    Vec2::new(
        settings.extents.x * (settings.pivot.x - 0.5),
        settings.extents.y * (settings.pivot.y - 0.5),
    )
}

fn insert_line_break(text: &mut String, char_offset: usize) {
    let at = text
        .char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(text.len());
    text.insert(at, '\n');
}

/// Run the layout passes for `markup` through `engine`.
pub fn layout<G>(engine: &mut G, markup: &str, settings: &GenerationSettings) -> LayoutOutput
where
    G: GlyphLayout + ?Sized,
{
    let upp = settings.units_per_pixel();
    let half = settings.font_size * 0.5;
    // Truncation is applied here, per quad, so the engine must not clip.
    let populate_settings = GenerationSettings {
        vertical_overflow: VerticalWrapMode::Overflow,
        ..settings.clone()
    };

    let (mut text, mut icons) = placeholder::substitute(engine, markup, &populate_settings);
    let mut verts = engine.populate(&text, &populate_settings).to_vec();
    if verts.len() <= VERTS_PER_QUAD {
        return LayoutOutput::plain(text);
    }
    let prefer_width_text = text.clone();

    // ── Wrap correction ──
    if settings.horizontal_overflow == HorizontalWrapMode::Wrap {
        for i in 0..icons.len() {
            let start = icons[i].vertex_index;
            let last = start + icons[i].vertex_len.max(1) - 1;
            let (Some(first), Some(last)) = (verts.get(start), verts.get(last)) else {
                continue;
            };
            if last.x() < first.x() {
                insert_line_break(&mut text, start / VERTS_PER_QUAD);
                for icon in &mut icons[i..] {
                    icon.vertex_index += VERTS_PER_QUAD;
                }
                verts = engine.populate(&text, &populate_settings).to_vec();
                log::debug!("image {i} split across lines; break inserted at char {}", start / VERTS_PER_QUAD);
            }
        }
    }

    // ── Truncation ──
    let mut count = verts.len().saturating_sub(VERTS_PER_QUAD);
    if settings.vertical_overflow == VerticalWrapMode::Truncate {
        let floor = settings.rect().y_min();
        let before = count;
        while count > 0 && verts[count - 2].y() * upp < floor {
            count -= VERTS_PER_QUAD;
        }
        if count < before {
            log::debug!("truncated {} quads below the rect", (before - count) / VERTS_PER_QUAD);
        }
    }
    verts.truncate(count);
    let prefer_height_text = text.clone();

    // ── Icon positions ──
    let anchor = anchor_offset(settings);
    let mut events = Vec::new();
    for i in (0..icons.len()).rev() {
        let index = icons[i].vertex_index;
        if index >= count {
            log::debug!("image {i} dropped: vertex {index} beyond {count}");
            icons.remove(i);
            continue;
        }
        let origin = verts[index].xy() * upp;
        let icon = &mut icons[i];
        icon.position = origin
            + Vec2::new(
                icon.size.x * 0.5,
                (half + icon.size.y * (0.5 - icon.pivot)) * 0.5,
            )
            + anchor;
        icon.color = Color32::WHITE;
        if let Some(name) = icon.event.as_deref().filter(|name| !name.is_empty()) {
            let rect = Rect::new(
                origin.x,
                origin.y + (half - icon.size.y) * 0.5,
                icon.size.x,
                icon.size.y,
            );
            events.push(EventRect::new(rect, name, icon.args.clone()));
        }
    }
    log::trace!("layout: {} quads, {} icons, {} events", count / VERTS_PER_QUAD, icons.len(), events.len());

    LayoutOutput {
        text,
        vertices: verts,
        icons,
        events,
        prefer_width_text,
        prefer_height_text,
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_text::MonospaceLayout;

    fn settings(font_size: f32, extents: Vec2) -> GenerationSettings {
        GenerationSettings {
            font_size,
            extents,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_text_passes_through() {
        let mut mono = MonospaceLayout::new();
        let s = GenerationSettings::default();
        let raw = mono.populate("hello", &s).to_vec();
        let out = layout(&mut mono, "hello", &s);
        assert_eq!(out.text, "hello");
        assert_eq!(out.vertices, raw[..raw.len() - VERTS_PER_QUAD]);
        assert!(out.icons.is_empty() && out.events.is_empty());
    }

    #[test]
    fn test_empty_text_short_circuits() {
        let mut mono = MonospaceLayout::new();
        let out = layout(&mut mono, "", &GenerationSettings::default());
        assert_eq!(out, LayoutOutput::plain(String::new()));
    }

    #[test]
    fn test_image_icon_position() {
        let mut mono = MonospaceLayout::new();
        let s = GenerationSettings::default();
        let out = layout(&mut mono, "<material=image sprite=a atlas=c w=30 h=30 pivot=0/></material>", &s);
        assert_eq!(out.icons.len(), 1);
        assert!(out.events.is_empty());
        let icon = &out.icons[0];
        assert_eq!(icon.size, Vec2::new(30.0, 30.0));
        assert_eq!(icon.pivot, 0.0);
        assert_eq!(icon.sprites, vec!["a"]);
        assert_eq!(icon.atlas.as_deref(), Some("c"));
        // Line of size 30 in a 160x30 rect centred on the pivot:
        // baseline at 15 - 24 = -9, left edge at -80.
        assert_eq!(icon.position, Vec2::new(-65.0, 2.0));
    }

    #[test]
    fn test_image_event_rect() {
        let mut mono = MonospaceLayout::new();
        let s = GenerationSettings::default();
        let out = layout(&mut mono, "<material=image w=30 h=30 event=tap args=9/></material>", &s);
        assert_eq!(out.events.len(), 1);
        assert_eq!(out.events[0].rect, Rect::new(-80.0, -20.5, 30.0, 30.0));
        assert_eq!(out.events[0].name, "tap");
        assert_eq!(out.events[0].args.as_deref(), Some("9"));
    }

    #[test]
    fn test_anchor_offset_applied() {
        let mut mono = MonospaceLayout::new();
        let s = GenerationSettings {
            pivot: Vec2::new(0.0, 1.0),
            ..Default::default()
        };
        assert_eq!(anchor_offset(&s), Vec2::new(-80.0, 15.0));
        let out = layout(&mut mono, "<material=image w=30 h=30/></material>", &s);
        // Rect now spans x in [0, 160], y in [-30, 0].
        assert_eq!(out.icons[0].position, Vec2::new(15.0 - 80.0, -24.0 + 11.0 + 15.0));
    }

    #[test]
    fn test_wrap_correction_moves_placeholder() {
        let mut mono = MonospaceLayout::new();
        let s = settings(10.0, Vec2::new(40.0, 200.0));
        let markup = "abcdef<material=image w=20 h=10/></material>";
        let out = layout(&mut mono, markup, &s);

        assert_eq!(out.text.chars().nth(6), Some('\n'));
        assert!(!out.prefer_width_text.contains('\n'));
        assert_eq!(out.prefer_height_text, out.text);
        let icon = &out.icons[0];
        assert_eq!(icon.vertex_index, 7 * 4);
        assert_eq!(out.vertices[icon.vertex_index].x(), out.vertices[0].x());
        assert_eq!(icon.position.x, -20.0 + 10.0);
    }

    #[test]
    fn test_wrap_correction_shifts_later_images() {
        let mut mono = MonospaceLayout::new();
        let s = settings(10.0, Vec2::new(40.0, 200.0));
        let image = "<material=image w=20 h=10/></material>";
        let markup = format!("abcdef{image}abcd{image}");
        let out = layout(&mut mono, &markup, &s);

        assert_eq!(out.text.matches('\n').count(), 2);
        assert_eq!(out.icons.len(), 2);
        let chars: Vec<char> = out.text.chars().collect();
        for icon in &out.icons {
            let at = icon.vertex_index / VERTS_PER_QUAD;
            assert_eq!(chars[at], '<');
            assert_eq!(chars[at - 1], '\n');
            assert_eq!(out.vertices[icon.vertex_index].x(), out.vertices[0].x());
        }
        assert!(out.icons[1].position.y < out.icons[0].position.y);
    }

    #[test]
    fn test_huge_image_width_is_bounded() {
        let mut mono = MonospaceLayout::new();
        let s = GenerationSettings::default();
        let out = layout(&mut mono, "a<material=image w=1e30 h=14/></material>", &s);
        let run = out.text.chars().filter(|&c| c == placeholder::PLACEHOLDER_CHAR).count();
        // Every other `i` comes from the `<size=…>` markup.
        assert!(run <= placeholder::MAX_HOLDER_LEN + 2);
        assert!(out.icons.len() <= 1);
    }

    #[test]
    fn test_overflow_skips_wrap_correction() {
        let mut mono = MonospaceLayout::new();
        let s = GenerationSettings {
            horizontal_overflow: HorizontalWrapMode::Overflow,
            ..settings(10.0, Vec2::new(40.0, 200.0))
        };
        let out = layout(&mut mono, "abcdef<material=image w=20 h=10/></material>", &s);
        assert!(!out.text.contains('\n'));
        assert_eq!(out.icons[0].vertex_index, 6 * 4);
    }

    #[test]
    fn test_truncation_drops_lines_and_icons() {
        let mut mono = MonospaceLayout::new();
        let s = settings(10.0, Vec2::new(40.0, 10.0));
        let out = layout(&mut mono, "abcdefghijklmnop<material=image w=5 h=10/></material>", &s);
        assert_eq!(out.vertex_count(), 8 * 4);
        assert!(out.icons.is_empty());
    }

    #[test]
    fn test_vertical_overflow_keeps_everything() {
        let mut mono = MonospaceLayout::new();
        let s = GenerationSettings {
            vertical_overflow: VerticalWrapMode::Overflow,
            ..settings(10.0, Vec2::new(40.0, 10.0))
        };
        let out = layout(&mut mono, "abcdefghijklmnop", &s);
        assert_eq!(out.vertex_count(), 16 * 4);
    }

    #[test]
    fn test_zero_width_image_reserves_no_glyphs() {
        let mut mono = MonospaceLayout::new();
        let out = layout(&mut mono, "a<material=image w=0 h=14/></material>", &GenerationSettings::default());
        assert_eq!(out.icons.len(), 1);
        assert!(out.text.contains("<size=14></size>"));
    }
}
