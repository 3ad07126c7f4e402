//! Per-character vertex effects.
//!
//! Every effect addresses the quads of its span,
//! `[start × 4, min(end × 4 + 4, usable))`, where `usable` is the quad
//! buffer length before any effect ran. Effects run in the order the
//! parser closed their tags and see whatever earlier effects left behind.
//!
//! | effect    | glyph vertices     | appended                         |
//! |-----------|--------------------|----------------------------------|
//! | shadow    | untouched          | 1 offset copy (4 per char)       |
//! | outline   | untouched          | 4 offset copies + 1 plain copy   |
//! | gradient  | recoloured         | nothing                          |
//! | underline | untouched          | bars go to the icon list         |

use std::ops::Range;

use lumen_core::vertex::{BOTTOM_LEFT, BOTTOM_RIGHT, TOP_RIGHT};
use lumen_core::{
    Color32, Effect, EventRect, GradientEffect, IconDescriptor, OffsetEffect, Rect, Tag,
    UnderlineEffect, Vec2, Vertex, VERTS_PER_QUAD,
};

/// Outline passes, in application order.
const OUTLINE_SIGNS: [(f32, f32); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)];

/// Label properties the effects read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectContext {
    pub font_size: f32,
    pub units_per_pixel: f32,
    /// Offset from layout space to the label centre, in layout units.
    pub anchor: Vec2,
    /// Label colour, used by underlines that ask for it.
    pub owner_color: Color32,
}

/// Icons and click regions produced by effects.
#[derive(Debug)]
pub struct EffectSink<'a> {
    pub icons: &'a mut Vec<IconDescriptor>,
    pub events: &'a mut Vec<EventRect>,
}

/// Vertex range covered by `tag`, clamped to `usable`.
pub fn quad_range(tag: &Tag, usable: usize) -> Range<usize> {
    let start = tag.start * VERTS_PER_QUAD;
    let end = (tag.end * VERTS_PER_QUAD + VERTS_PER_QUAD).min(usable);
    start.min(end)..end
}

/// Vertices shadow and outline tags will append.
pub fn reserve_estimate(tags: &[Tag]) -> usize {
    tags.iter()
        .map(|tag| match tag.effect {
            Effect::Shadow(_) => tag.len() * VERTS_PER_QUAD,
            Effect::Outline(_) => tag.len() * VERTS_PER_QUAD * 5,
            _ => 0,
        })
        .sum()
}

/// Apply every tag in order.
pub fn apply_effects(
    tags: &[Tag],
    verts: &mut Vec<Vertex>,
    usable: usize,
    ctx: &EffectContext,
    sink: &mut EffectSink<'_>,
) {
    let usable = usable.min(verts.len());
    let extra = reserve_estimate(tags);
    if extra > 0 {
        verts.reserve(extra.max(16));
    }
    for tag in tags {
        let range = quad_range(tag, usable);
        match &tag.effect {
            Effect::Shadow(fx) => apply_shadow(fx, verts, range),
            Effect::Outline(fx) => apply_outline(fx, verts, range),
            Effect::Gradient(fx) => apply_gradient(fx, verts, range),
            Effect::Underline(fx) => apply_underline(fx, verts, range, ctx, sink),
        }
    }
    log::trace!("effects: {} tags, {usable} -> {} vertices", tags.len(), verts.len());
}

fn tinted(v: Vertex, dx: f32, dy: f32, color: Color32) -> Vertex {
    Vertex {
        color: color.with_alpha_scaled(v.color.a),
        ..v.offset(dx, dy)
    }
}

/// Append one offset, recoloured copy of the range.
pub fn apply_shadow(fx: &OffsetEffect, verts: &mut Vec<Vertex>, range: Range<usize>) {
    for i in range {
        let v = verts[i];
        verts.push(tinted(v, fx.offset.x, fx.offset.y, fx.color));
    }
}

/// Append four diagonal copies, then the unmodified range on top.
pub fn apply_outline(fx: &OffsetEffect, verts: &mut Vec<Vertex>, range: Range<usize>) {
    for (sx, sy) in OUTLINE_SIGNS {
        for i in range.clone() {
            let v = verts[i];
            verts.push(tinted(v, fx.offset.x * sx, fx.offset.y * sy, fx.color));
        }
    }
    verts.extend_from_within(range);
}

/// Recolour the range along the gradient direction.
pub fn apply_gradient(fx: &GradientEffect, verts: &mut [Vertex], range: Range<usize>) {
    let dir = fx.direction;
    let project = |v: &Vertex| v.x() * dir.x + v.y() * dir.y;

    let span = &mut verts[range];
    let (min, max) = span
        .iter()
        .map(project)
        .fold((f32::MAX, f32::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));
    let extent = max - min;
    for v in span.iter_mut() {
        let t = if extent > 0.0 { (project(&*v) - min) / extent } else { 0.0 };
        v.color = Color32::lerp(fx.from, fx.to, t);
    }
}

/// Emit one bar per visual line the range covers.
pub fn apply_underline(
    fx: &UnderlineEffect,
    verts: &[Vertex],
    range: Range<usize>,
    ctx: &EffectContext,
    sink: &mut EffectSink<'_>,
) {
    let Range { start, end } = range;
    if end < start + VERTS_PER_QUAD {
        return;
    }
    let upp = ctx.units_per_pixel;
    let half = ctx.font_size * 0.5;
    let color = fx.resolve_color(ctx.owner_color);
    let event = fx.event.as_deref().filter(|e| !e.is_empty());

    let mut head = verts[start + BOTTOM_LEFT];
    let mut min_y = head.y();
    let mut i = start + BOTTOM_RIGHT;
    while i + 2 <= end {
        let next = verts[i];
        let newline = (next.y() - head.y()).abs() > half;
        let last = i + 2 == end;
        if !(newline || last) {
            min_y = min_y.min(next.y());
            i += VERTS_PER_QUAD;
            continue;
        }

        let tail = if newline { i - VERTS_PER_QUAD } else { i };
        min_y = min_y.min(verts[tail].y());
        let size = Vec2::new((verts[tail].x() - head.x()) * upp, fx.thickness);
        let position = Vec2::new(head.x(), min_y) * upp
            + Vec2::new(size.x * 0.5, -fx.thickness * 0.5)
            + ctx.anchor;
        sink.icons.push(IconDescriptor::bar(position, size, color));

        if let Some(name) = event {
            let top = verts[tail - (BOTTOM_RIGHT - TOP_RIGHT)].y();
            let rect = Rect::new(head.x() * upp, min_y * upp, size.x, (top - min_y) * upp);
            sink.events.push(EventRect::new(rect, name, fx.args.clone()));
        }

        head = verts[i + 1];
        min_y = head.y();
        // A break on the final quad leaves that quad as its own line.
        if !(newline && last) {
            i += VERTS_PER_QUAD;
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
