//! Closed effect spans produced by the markup parser.
//!
//! Each effect kind carries only its own attributes. Attribute assignment
//! is one pure function per kind: start from the kind's defaults and
//! apply `key=value` pairs in order. Unknown keys are ignored; values that
//! do not parse leave the field at its default.

use serde::{Deserialize, Serialize};

use crate::color::Color32;
use crate::geometry::Vec2;
use crate::markup::MarkupIssue;

/// Effect kinds recognised in `<material=KIND …>`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    Shadow,
    Outline,
    Gradient,
    Underline,
}

impl TagKind {
    /// Resolve the `KIND` keyword of an opening tag. Case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "shadow" => Some(Self::Shadow),
            "outline" => Some(Self::Outline),
            "gradient" => Some(Self::Gradient),
            "underline" => Some(Self::Underline),
            _ => None,
        }
    }
}

/// A closed span `[start, end]` (inclusive character offsets) with its effect.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Tag {
    pub start: usize,
    pub end: usize,
    pub effect: Effect,
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        self.effect.kind()
    }

    /// Number of characters covered by the span.
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Effect {
    Shadow(OffsetEffect),
    Outline(OffsetEffect),
    Gradient(GradientEffect),
    Underline(UnderlineEffect),
}

impl Effect {
    /// Build the effect for `kind` from its attribute pairs.
    pub fn from_attrs<'a, I>(kind: TagKind, attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        match kind {
            TagKind::Shadow => Effect::Shadow(OffsetEffect::from_attrs(attrs)),
            TagKind::Outline => Effect::Outline(OffsetEffect::from_attrs(attrs)),
            TagKind::Gradient => Effect::Gradient(GradientEffect::from_attrs(attrs)),
            TagKind::Underline => Effect::Underline(UnderlineEffect::from_attrs(attrs)),
        }
    }

    pub fn kind(&self) -> TagKind {
        match self {
            Effect::Shadow(_) => TagKind::Shadow,
            Effect::Outline(_) => TagKind::Outline,
            Effect::Gradient(_) => TagKind::Gradient,
            Effect::Underline(_) => TagKind::Underline,
        }
    }
}

fn unparsable(key: &str, value: &str) {
    log::trace!(
        "{}",
        MarkupIssue::UnparsableAttributeValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    );
}

/// Parse a numeric attribute, falling back (and logging) on failure.
pub fn parse_f32(key: &str, value: &str, fallback: f32) -> f32 {
    match value.parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            unparsable(key, value);
            fallback
        }
    }
}

/// Parse a colour attribute, falling back (and logging) on failure.
pub fn parse_color(key: &str, value: &str, fallback: Color32) -> Color32 {
    Color32::parse_html(value).unwrap_or_else(|| {
        unparsable(key, value);
        fallback
    })
}

// ── Shadow / Outline ────────────────────────────────────────────────

/// Colour + offset, shared by shadow and outline.
///
/// Keys: `c` (colour), `x`, `y` (offset in layout pixels).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct OffsetEffect {
    pub color: Color32,
    pub offset: Vec2,
}

impl Default for OffsetEffect {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            offset: Vec2::new(1.0, -1.0),
        }
    }
}

impl OffsetEffect {
    pub fn from_attrs<'a, I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let defaults = Self::default();
        attrs.into_iter().fold(defaults, |mut fx, (key, value)| {
            match key {
                "c" => fx.color = parse_color(key, value, defaults.color),
                "x" => fx.offset.x = parse_f32(key, value, defaults.offset.x),
                "y" => fx.offset.y = parse_f32(key, value, defaults.offset.y),
                _ => {}
            }
            fx
        })
    }
}

// ── Gradient ────────────────────────────────────────────────────────

/// Linear gradient along an unnormalised direction.
///
/// Keys: `from`, `to` (colours), `x`, `y` (direction).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GradientEffect {
    pub from: Color32,
    pub to: Color32,
    pub direction: Vec2,
}

impl Default for GradientEffect {
    fn default() -> Self {
        Self {
            from: Color32::WHITE,
            to: Color32::BLACK,
            direction: Vec2::new(0.0, -1.0),
        }
    }
}

impl GradientEffect {
    pub fn from_attrs<'a, I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let defaults = Self::default();
        attrs.into_iter().fold(defaults, |mut fx, (key, value)| {
            match key {
                "from" => fx.from = parse_color(key, value, defaults.from),
                "to" => fx.to = parse_color(key, value, defaults.to),
                "x" => fx.direction.x = parse_f32(key, value, defaults.direction.x),
                "y" => fx.direction.y = parse_f32(key, value, defaults.direction.y),
                _ => {}
            }
            fx
        })
    }
}

// ── Underline ───────────────────────────────────────────────────────

/// Underline bar, optionally clickable.
///
/// Keys: `c` (colour; white means "use the label colour"), `h`
/// (thickness), `event`, `args`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct UnderlineEffect {
    pub color: Color32,
    pub thickness: f32,
    pub event: Option<String>,
    pub args: Option<String>,
}

impl Default for UnderlineEffect {
    fn default() -> Self {
        Self {
            color: Color32::WHITE,
            thickness: 1.5,
            event: None,
            args: None,
        }
    }
}

impl UnderlineEffect {
    /// Colour sentinel meaning "inherit the owner's colour".
    pub const OWNER_COLOR: Color32 = Color32::WHITE;

    pub fn from_attrs<'a, I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let defaults = Self::default();
        attrs.into_iter().fold(defaults, |mut fx, (key, value)| {
            match key {
                "c" => fx.color = parse_color(key, value, Self::OWNER_COLOR),
                "h" => fx.thickness = parse_f32(key, value, 1.5),
                "event" => fx.event = Some(value.to_string()),
                "args" => fx.args = Some(value.to_string()),
                _ => {}
            }
            fx
        })
    }

    /// The bar colour, resolving the owner-colour sentinel.
    pub fn resolve_color(&self, owner: Color32) -> Color32 {
        if self.color == Self::OWNER_COLOR {
            owner
        } else {
            self.color
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
