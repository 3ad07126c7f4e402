//! Inline image tags and the invisible runs that stand in for them.
//!
//! ```text
//!   <material=image sprite=a+b atlas=faces frame=5 w=50 h=50 pivot=0/></material>
//!        │
//!        ▼
//!   <color=#00000000><size=50>ii</size></color>     + IconDescriptor
//! ```
//!
//! The run is sized so that one placeholder character has the icon's line
//! height and enough characters are emitted to cover the icon's width.

use std::ops::Range;

use lumen_core::markup::attributes;
use lumen_core::tag::parse_f32;
use lumen_core::{IconDescriptor, Vec2, VERTS_PER_QUAD};
use lumen_text::{GenerationSettings, GlyphLayout};

const IMAGE_OPEN: &str = "<material=image";
const IMAGE_CLOSE: &str = "</material>";

/// Character repeated to fill a placeholder run.
pub const PLACEHOLDER_CHAR: char = 'i';
/// Longest placeholder run, in characters.
pub const MAX_HOLDER_LEN: usize = 1024;

/// One image tag found in the text.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageTag<'a> {
    /// Byte range of the whole tag, closing suffix included.
    pub span: Range<usize>,
    /// Attribute region between the keyword and the tag's `>`.
    pub body: &'a str,
}

/// Find the first well-formed image tag at or after byte `from`.
///
/// The keyword must be followed by exactly one space and an attribute
/// region starting with a non-blank character, and the tag must be
/// closed by `></material>`.
pub fn find_image_tag(text: &str, from: usize) -> Option<ImageTag<'_>> {
    let mut cursor = from;
    while let Some(found) = text.get(cursor..)?.find(IMAGE_OPEN) {
        let at = cursor + found;
        let attrs_at = at + IMAGE_OPEN.len();
        cursor = attrs_at;

        let rest = &text[attrs_at..];
        let Some(after_space) = rest.strip_prefix(' ') else {
            continue;
        };
        if after_space.starts_with(|c: char| c.is_whitespace() || c == '>') {
            continue;
        }
        let gt = rest.find('>')?;
        let body = &rest[..gt];
        if !rest[gt + 1..].starts_with(IMAGE_CLOSE) {
            continue;
        }
        let end = attrs_at + gt + 1 + IMAGE_CLOSE.len();
        return Some(ImageTag { span: at..end, body });
    }
    None
}

/// Build the icon for an image tag's attributes.
///
/// `w` and `h` default to half the font size, `pivot` to 0 and `frame`
/// to -1 (static). Empty sprite names are dropped.
pub fn icon_from_attrs(body: &str, font_size: f32) -> IconDescriptor {
    let half = font_size * 0.5;
    let body = body.trim().trim_end_matches('/');
    let mut icon = IconDescriptor {
        size: Vec2::new(half, half),
        ..IconDescriptor::default()
    };
    for (key, value) in attributes(body) {
        match key {
            "frame" => icon.frame_rate = parse_f32(key, value, -1.0),
            "sprite" => {
                icon.sprites = value
                    .split('+')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            "atlas" => icon.atlas = Some(value.to_string()),
            "pivot" => icon.pivot = parse_f32(key, value, 0.0),
            "w" => icon.size.x = parse_f32(key, value, half),
            "h" => icon.size.y = parse_f32(key, value, half),
            "event" => icon.event = Some(value.to_string()),
            "args" => icon.args = Some(value.to_string()),
            _ => {}
        }
    }
    icon
}

/// Font size giving one placeholder character the icon's line height.
pub fn placeholder_size(font_size: f32, height: f32, pivot: f32) -> f32 {
    let size = (1.0 - pivot) * (height - font_size) + font_size;
    if size > 0.0 {
        size
    } else {
        font_size
    }
}

/// Number of placeholder characters needed to cover `width` layout units.
///
/// Capped at [`MAX_HOLDER_LEN`]; a non-finite count yields an empty run.
pub fn holder_len<G>(engine: &mut G, settings: &GenerationSettings, size: f32, width: f32) -> usize
where
    G: GlyphLayout + ?Sized,
{
    let one_cell = format!("<size={size}>{PLACEHOLDER_CHAR}</size>");
    let measure = settings.with_extents(Vec2::ZERO);
    let unit = engine.preferred_width(&one_cell, &measure) * settings.units_per_pixel();
    if !(unit > 0.0 && width > 0.0) {
        return 0;
    }
    let count = (width / unit).ceil();
    if !count.is_finite() {
        return 0;
    }
    (count as usize).min(MAX_HOLDER_LEN)
}

/// The invisible run for `len` characters at `size`.
pub fn holder_run(size: f32, len: usize) -> String {
    let mut run = format!("<color=#00000000><size={size}>");
    run.extend(std::iter::repeat(PLACEHOLDER_CHAR).take(len));
    run.push_str("</size></color>");
    run
}

/// Replace every image tag in `text` with its placeholder run.
///
/// Each icon records the placeholder's first vertex (`char offset × 4`)
/// and the vertex length of the whole run, markup included.
pub fn substitute<G>(engine: &mut G, text: &str, settings: &GenerationSettings) -> (String, Vec<IconDescriptor>)
where
    G: GlyphLayout + ?Sized,
{
    let mut out = String::with_capacity(text.len());
    let mut icons = Vec::new();
    let mut copied = 0;
    // Characters already written to `out`.
    let mut out_chars = 0;

    while let Some(tag) = find_image_tag(text, copied) {
        let before = &text[copied..tag.span.start];
        out.push_str(before);
        out_chars += before.chars().count();

        let mut icon = icon_from_attrs(tag.body, settings.font_size);
        let size = placeholder_size(settings.font_size, icon.size.y, icon.pivot);
        let len = holder_len(engine, settings, size, icon.size.x);
        let run = holder_run(size, len);
        let run_chars = run.chars().count();

        icon.vertex_index = out_chars * VERTS_PER_QUAD;
        icon.vertex_len = run_chars * VERTS_PER_QUAD;
        log::trace!(
            "image tag at char {out_chars}: {} x {} -> {len} placeholder chars",
            icon.size.x,
            icon.size.y
        );
        icons.push(icon);

        out.push_str(&run);
        out_chars += run_chars;
        copied = tag.span.end;
    }
    out.push_str(&text[copied..]);
    (out, icons)
}

// ===================================================================
// Tests
// ===================================================================
