//! Deterministic fixed-advance engine.
//!
//! Every visible character advances the pen by `advance × size` pixels.
//! Lines break on `\n` and, when wrapping, before the first character that
//! would cross the wrap width. No font files are involved, so layouts are
//! identical on every machine; the label's tests and benches run on it.

use lumen_core::{Vertex, VERTS_PER_QUAD};

use crate::engine::{GenerationSettings, GlyphLayout};
use crate::rich::{self, CharStyle};

#[derive(Clone, Copy, Debug)]
struct Slot {
    line: usize,
    /// Pen x relative to the line start, in pixels.
    x: f32,
    advance: f32,
    /// Draws a glyph (as opposed to a zero-area pen quad).
    ink: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Line {
    width: f32,
    /// Largest font size on the line, in pixels.
    size: f32,
}

/// Fixed-advance glyph layout.
#[derive(Debug)]
pub struct MonospaceLayout {
    /// Horizontal advance as a fraction of the font size.
    pub advance: f32,
    /// Glyph ascent as a fraction of the font size.
    pub ascent: f32,
    /// Glyph descent as a fraction of the font size.
    pub descent: f32,
    styles: Vec<CharStyle>,
    slots: Vec<Slot>,
    lines: Vec<Line>,
    pen_end: f32,
    verts: Vec<Vertex>,
}

impl Default for MonospaceLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl MonospaceLayout {
    pub fn new() -> Self {
        Self {
            advance: 0.5,
            ascent: 0.8,
            descent: 0.2,
            styles: Vec::new(),
            slots: Vec::new(),
            lines: Vec::new(),
            pen_end: 0.0,
            verts: Vec::new(),
        }
    }

    fn break_lines(&mut self, text: &str, settings: &GenerationSettings, wrap_width: f32) {
        rich::scan(text, CharStyle::base(settings), settings.rich_text, &mut self.styles);
        self.slots.clear();
        self.lines.clear();

        let scale = settings.scale_factor;
        let base_px = settings.font_size * scale;
        let close = |line: Line| Line {
            size: if line.size > 0.0 { line.size } else { base_px },
            ..line
        };

        let mut line = Line::default();
        let mut pen = 0.0f32;
        for (ch, style) in text.chars().zip(self.styles.iter()) {
            if style.hidden || ch == '\n' {
                self.slots.push(Slot {
                    line: self.lines.len(),
                    x: pen,
                    advance: 0.0,
                    ink: false,
                });
                if !style.hidden {
                    self.lines.push(close(line));
                    line = Line::default();
                    pen = 0.0;
                }
                continue;
            }

            let size_px = style.size * scale;
            let advance = size_px * self.advance;
            if pen > 0.0 && pen + advance > wrap_width {
                self.lines.push(close(line));
                line = Line::default();
                pen = 0.0;
            }
            self.slots.push(Slot {
                line: self.lines.len(),
                x: pen,
                advance,
                ink: !ch.is_whitespace(),
            });
            pen += advance;
            line.width = pen;
            line.size = line.size.max(size_px);
        }
        self.lines.push(close(line));
        self.pen_end = pen;
    }

    fn total_height(&self, line_spacing: f32) -> f32 {
        self.lines.iter().map(|l| l.size * line_spacing).sum()
    }
}

impl GlyphLayout for MonospaceLayout {
    fn preferred_width(&mut self, text: &str, settings: &GenerationSettings) -> f32 {
        self.break_lines(text, settings, f32::INFINITY);
        self.lines.iter().map(|l| l.width).fold(0.0, f32::max)
    }

    fn preferred_height(&mut self, text: &str, settings: &GenerationSettings) -> f32 {
        self.break_lines(text, settings, settings.wrap_width());
        self.total_height(settings.line_spacing)
    }

    fn populate(&mut self, text: &str, settings: &GenerationSettings) -> &[Vertex] {
        self.break_lines(text, settings, settings.wrap_width());

        let scale = settings.scale_factor;
        let mut y = settings.block_top(self.total_height(settings.line_spacing));
        let placements: Vec<(f32, f32)> = self
            .lines
            .iter()
            .map(|line| {
                let baseline = y - line.size * self.ascent;
                y -= line.size * settings.line_spacing;
                (settings.line_left(line.width), baseline)
            })
            .collect();

        self.verts.clear();
        self.verts.reserve((self.slots.len() + 1) * VERTS_PER_QUAD);
        for (slot, style) in self.slots.iter().zip(self.styles.iter()) {
            let (left, baseline) = placements[slot.line];
            let x = left + slot.x;
            let quad = if slot.ink {
                let size_px = style.size * scale;
                Vertex::quad(
                    x,
                    baseline + size_px * self.ascent,
                    x + slot.advance,
                    baseline - size_px * self.descent,
                    style.color,
                )
            } else {
                Vertex::degenerate(x, baseline, style.color)
            };
            self.verts.extend_from_slice(&quad);
        }

        let (left, baseline) = placements.last().copied().unwrap_or_default();
        self.verts
            .extend_from_slice(&Vertex::degenerate(left + self.pen_end, baseline, settings.color));
        &self.verts
    }
}

// ===================================================================
// Tests
// ===================================================================
