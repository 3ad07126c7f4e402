//! Shaping engine backed by `cosmic-text`.
//!
//! Visible characters are handed to a cosmic-text `Buffer` as styled spans
//! (one span per run of equal [`CharStyle`]); markup characters never reach
//! the shaper. Shaped glyphs are then mapped back to their source
//! character through the byte offsets cosmic-text reports, so the output
//! keeps the one-quad-per-character contract of [`GlyphLayout`].
//!
//! ```text
//!   text ─► rich::scan ─► visible spans ─► Buffer::set_rich_text
//!                                               │ layout_runs()
//!   quads[char] ◄── line byte offsets ◄── LayoutGlyph.start
//! ```
//!
//! Preferred widths are memoised in an LRU cache keyed by text + metrics.

use std::num::NonZeroUsize;
use std::ops::Range;

use cosmic_text::{
    Attrs, Buffer, Color as CColor, Family, FontSystem, Metrics, Shaping, Style as CStyle, Weight,
};
use lru::LruCache;

use lumen_core::vertex::TOP_RIGHT;
use lumen_core::{Vertex, VERTS_PER_QUAD};

use crate::engine::{GenerationSettings, GlyphLayout};
use crate::rich::{self, CharStyle};

const ASCENT: f32 = 0.8;
const DESCENT: f32 = 0.2;
/// Line height relative to font size before `line_spacing`.
const LINE_HEIGHT: f32 = 1.2;
const MEASURE_CACHE_SIZE: usize = 256;

/// Cache key for preferred-width measurements.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: String,
    font_size: u32,
    scale: u32,
    family: String,
    bold_weight: u16,
    rich: bool,
}

impl MeasureKey {
    fn new(text: &str, settings: &GenerationSettings) -> Self {
        Self {
            text: text.to_string(),
            font_size: settings.font_size.to_bits(),
            scale: settings.scale_factor.to_bits(),
            family: settings.family.clone(),
            bold_weight: settings.bold_weight,
            rich: settings.rich_text,
        }
    }
}

/// Byte offsets of every character in one buffer line.
struct LineMap {
    /// Index (into the visible characters) of the line's first character.
    first: usize,
    offsets: Vec<usize>,
}

struct Shaped {
    buffer: Buffer,
    /// Source character index of each visible character.
    origin: Vec<usize>,
    lines: Vec<LineMap>,
}

/// Map a CSS-style family chain to a cosmic-text family.
fn family_of(chain: &str) -> Family<'_> {
    let first = chain
        .split(',')
        .next()
        .unwrap_or(chain)
        .trim()
        .trim_matches('"')
        .trim_matches('\'');
    match first {
        "sans-serif" | "" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        concrete => Family::Name(concrete),
    }
}

fn attrs_for<'a>(style: &CharStyle, settings: &'a GenerationSettings) -> Attrs<'a> {
    let size_px = style.size * settings.scale_factor;
    let [r, g, b, a] = [style.color.r, style.color.g, style.color.b, style.color.a];
    Attrs::new()
        .family(family_of(&settings.family))
        .weight(if style.bold {
            Weight(settings.bold_weight)
        } else {
            Weight::NORMAL
        })
        .style(if style.italic {
            CStyle::Italic
        } else {
            CStyle::Normal
        })
        .color(CColor::rgba(r, g, b, a))
        .metrics(Metrics::new(size_px, size_px * LINE_HEIGHT * settings.line_spacing))
}

/// Glyph layout on top of cosmic-text shaping.
pub struct CosmicLayout {
    pub font_system: FontSystem,
    styles: Vec<CharStyle>,
    verts: Vec<Vertex>,
    width_cache: LruCache<MeasureKey, f32>,
}

impl Default for CosmicLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicLayout {
    /// Create an engine with system font discovery.
    pub fn new() -> Self {
        Self::with_font_system(FontSystem::new())
    }

    pub fn with_font_system(font_system: FontSystem) -> Self {
        let capacity = NonZeroUsize::new(MEASURE_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN);
        Self {
            font_system,
            styles: Vec::new(),
            verts: Vec::new(),
            width_cache: LruCache::new(capacity),
        }
    }

    fn shape(&mut self, text: &str, settings: &GenerationSettings, width: Option<f32>) -> Shaped {
        rich::scan(text, CharStyle::base(settings), settings.rich_text, &mut self.styles);

        let mut plain = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(self.styles.len());
        let mut spans: Vec<(Range<usize>, CharStyle)> = Vec::new();
        for (i, (ch, style)) in text.chars().zip(self.styles.iter()).enumerate() {
            if style.hidden {
                continue;
            }
            let at = plain.len();
            plain.push(ch);
            origin.push(i);
            match spans.last_mut() {
                Some((range, run)) if run.same_run(style) => range.end = plain.len(),
                _ => spans.push((at..plain.len(), *style)),
            }
        }

        let mut lines = Vec::new();
        let mut first = 0;
        for line in plain.split('\n') {
            let offsets: Vec<usize> = line.char_indices().map(|(b, _)| b).collect();
            let count = offsets.len();
            lines.push(LineMap { first, offsets });
            first += count + 1;
        }

        let base = CharStyle::base(settings);
        let size_px = settings.font_size * settings.scale_factor;
        let metrics = Metrics::new(size_px, size_px * LINE_HEIGHT * settings.line_spacing);
        let fs = &mut self.font_system;
        let mut buffer = Buffer::new(fs, metrics);
        buffer.set_size(fs, width, None);
        buffer.set_rich_text(
            fs,
            spans
                .iter()
                .map(|(range, style)| (&plain[range.clone()], attrs_for(style, settings))),
            attrs_for(&base, settings),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(fs, false);

        Shaped {
            buffer,
            origin,
            lines,
        }
    }

    /// Per-run geometry: (line width, top, height) in pixels, y-down.
    fn run_metrics(shaped: &Shaped, settings: &GenerationSettings) -> Vec<(f32, f32, f32)> {
        let base_px = settings.font_size * settings.scale_factor;
        shaped
            .buffer
            .layout_runs()
            .map(|run| {
                let width = run.glyphs.iter().map(|g| g.x + g.w).fold(0.0f32, f32::max);
                let size = run.glyphs.iter().map(|g| g.font_size).fold(base_px, f32::max);
                (width, run.line_top, size * LINE_HEIGHT * settings.line_spacing)
            })
            .collect()
    }

    fn total_height(runs: &[(f32, f32, f32)]) -> f32 {
        runs.iter().map(|&(_, top, height)| top + height).fold(0.0, f32::max)
    }
}

impl GlyphLayout for CosmicLayout {
    fn preferred_width(&mut self, text: &str, settings: &GenerationSettings) -> f32 {
        let key = MeasureKey::new(text, settings);
        if let Some(width) = self.width_cache.get(&key) {
            return *width;
        }
        let shaped = self.shape(text, settings, None);
        let width = Self::run_metrics(&shaped, settings)
            .iter()
            .map(|&(w, _, _)| w)
            .fold(0.0, f32::max);
        log::trace!("measured {} chars: {width}px", text.chars().count());
        self.width_cache.put(key, width);
        width
    }

    fn preferred_height(&mut self, text: &str, settings: &GenerationSettings) -> f32 {
        let wrap = settings.wrap_width();
        let shaped = self.shape(text, settings, wrap.is_finite().then_some(wrap));
        Self::total_height(&Self::run_metrics(&shaped, settings))
    }

    fn populate(&mut self, text: &str, settings: &GenerationSettings) -> &[Vertex] {
        let wrap = settings.wrap_width();
        let shaped = self.shape(text, settings, wrap.is_finite().then_some(wrap));
        let runs = Self::run_metrics(&shaped, settings);
        let top = settings.block_top(Self::total_height(&runs));

        // (quad, baseline) per source character that owns a glyph.
        let char_count = self.styles.len();
        let mut glyphs: Vec<Option<([Vertex; 4], f32)>> = vec![None; char_count];
        let mut first_pen = None;
        for (run, &(line_width, _, _)) in shaped.buffer.layout_runs().zip(runs.iter()) {
            let left = settings.line_left(line_width);
            let baseline = top - run.line_y;
            first_pen.get_or_insert((left, baseline));
            let Some(map) = shaped.lines.get(run.line_i) else {
                continue;
            };
            for glyph in run.glyphs.iter() {
                let visible = map.first + map.offsets.partition_point(|&b| b < glyph.start);
                let Some(&source) = shaped.origin.get(visible) else {
                    continue;
                };
                let Some(style) = self.styles.get(source) else {
                    continue;
                };
                if glyphs[source].is_some() {
                    continue;
                }
                let x = left + glyph.x;
                let quad = Vertex::quad(
                    x,
                    baseline + glyph.font_size * ASCENT,
                    x + glyph.w,
                    baseline - glyph.font_size * DESCENT,
                    style.color,
                );
                glyphs[source] = Some((quad, baseline));
            }
        }

        let mut pen = first_pen.unwrap_or_else(|| (settings.line_left(0.0), top - settings.font_size * settings.scale_factor * ASCENT));
        self.verts.clear();
        self.verts.reserve((char_count + 1) * VERTS_PER_QUAD);
        for (slot, style) in glyphs.iter().zip(self.styles.iter()) {
            match slot {
                Some((quad, baseline)) => {
                    self.verts.extend_from_slice(quad);
                    pen = (quad[TOP_RIGHT].x(), *baseline);
                }
                None => self.verts.extend_from_slice(&Vertex::degenerate(pen.0, pen.1, style.color)),
            }
        }
        self.verts
            .extend_from_slice(&Vertex::degenerate(pen.0, pen.1, settings.color));
        &self.verts
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::vertex::TOP_LEFT;

    fn has_fonts(engine: &CosmicLayout) -> bool {
        engine.font_system.db().faces().count() > 0
    }

    #[test]
    fn test_family_chain() {
        assert_eq!(family_of("sans-serif"), Family::SansSerif);
        assert_eq!(family_of("\"Noto Sans\", serif"), Family::Name("Noto Sans"));
        assert_eq!(family_of("monospace, serif"), Family::Monospace);
    }

    #[test]
    fn test_quad_count_matches_chars() {
        let mut engine = CosmicLayout::new();
        let settings = GenerationSettings::default();
        let text = "Hi <material=shadow>there</material>\n<size=20>big</size>";
        let verts = engine.populate(text, &settings);
        assert_eq!(verts.len(), (text.chars().count() + 1) * VERTS_PER_QUAD);
    }

    #[test]
    fn test_empty_text() {
        let mut engine = CosmicLayout::new();
        let verts = engine.populate("", &GenerationSettings::default());
        assert_eq!(verts.len(), VERTS_PER_QUAD);
    }

    #[test]
    fn test_markup_is_zero_area() {
        let mut engine = CosmicLayout::new();
        let verts = engine.populate("<b>A</b>", &GenerationSettings::default()).to_vec();
        for q in [0, 1, 2, 4, 5, 6, 7] {
            let quad = &verts[q * 4..q * 4 + 4];
            assert!(quad.iter().all(|v| v.xy() == quad[0].xy()), "quad {q} should be degenerate");
        }
    }

    #[test]
    fn test_glyphs_advance_left_to_right() {
        let mut engine = CosmicLayout::new();
        if !has_fonts(&engine) {
            return;
        }
        let settings = GenerationSettings {
            horizontal_overflow: crate::engine::HorizontalWrapMode::Overflow,
            ..Default::default()
        };
        let verts = engine.populate("AB", &settings);
        assert!(verts[4 + TOP_LEFT].x() > verts[TOP_LEFT].x());
    }

    #[test]
    fn test_preferred_width_cached() {
        let mut engine = CosmicLayout::new();
        if !has_fonts(&engine) {
            return;
        }
        let settings = GenerationSettings::default();
        let first = engine.preferred_width("Hello, Lumen!", &settings);
        assert!(first > 0.0);
        assert_eq!(engine.width_cache.len(), 1);
        let second = engine.preferred_width("Hello, Lumen!", &settings);
        assert_eq!(first, second);
        assert_eq!(engine.width_cache.len(), 1);
    }

    #[test]
    fn test_wrap_grows_height() {
        let mut engine = CosmicLayout::new();
        if !has_fonts(&engine) {
            return;
        }
        let wide = GenerationSettings::default().with_extents(lumen_core::Vec2::new(1000.0, 0.0));
        let narrow = wide.with_extents(lumen_core::Vec2::new(40.0, 0.0));
        let text = "Hello World Lumen Design";
        let one = engine.preferred_height(text, &wide);
        let many = engine.preferred_height(text, &narrow);
        assert!(many > one, "expected wrapped height {many} > {one}");
    }
}
