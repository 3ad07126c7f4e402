//! Glyph layout contract shared by every text engine.
//!
//! A [`GlyphLayout`] turns a (host-markup) string into a flat quad buffer:
//! exactly one quad of four vertices per character of the input, markup
//! characters included, followed by one trailing sentinel quad standing
//! for the implicit line terminator. Hidden characters (markup,
//! whitespace, line breaks) produce zero-area quads at the pen position,
//! so character offset `i` always maps to vertex `i * 4`.
//!
//! Positions are in pixels (`units * scale_factor`), y-up, relative to the
//! pivot of the rectangle described by `extents` and `pivot`.

use serde::{Deserialize, Serialize};

use lumen_core::{Color32, Rect, Vec2, Vertex};

// ── Alignment ───────────────────────────────────────────────────────

/// Horizontal text alignment.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical placement of the text block inside its rectangle.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Upper,
    Middle,
    Lower,
}

/// One of nine anchor points for the text block.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    #[default]
    UpperLeft,
    UpperCenter,
    UpperRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    LowerLeft,
    LowerCenter,
    LowerRight,
}

impl TextAnchor {
    pub fn parts(self) -> (TextAlign, VerticalAlign) {
        use TextAlign::*;
        use VerticalAlign::*;
        match self {
            TextAnchor::UpperLeft => (Left, Upper),
            TextAnchor::UpperCenter => (Center, Upper),
            TextAnchor::UpperRight => (Right, Upper),
            TextAnchor::MiddleLeft => (Left, Middle),
            TextAnchor::MiddleCenter => (Center, Middle),
            TextAnchor::MiddleRight => (Right, Middle),
            TextAnchor::LowerLeft => (Left, Lower),
            TextAnchor::LowerCenter => (Center, Lower),
            TextAnchor::LowerRight => (Right, Lower),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalWrapMode {
    #[default]
    Wrap,
    Overflow,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalWrapMode {
    #[default]
    Truncate,
    Overflow,
}

// ── Settings ────────────────────────────────────────────────────────

/// Everything an engine needs to lay out one string.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSettings {
    /// Base font size in layout units.
    pub font_size: f32,
    /// Line height multiplier.
    pub line_spacing: f32,
    /// Base text colour.
    pub color: Color32,
    /// Interpret host markup (`<color>`, `<size>`, `<b>`, `<i>`, `<material>`).
    pub rich_text: bool,
    /// Size of the layout rectangle in layout units.
    pub extents: Vec2,
    /// Pivot of the layout rectangle, as fractions of `extents`.
    pub pivot: Vec2,
    pub alignment: TextAnchor,
    pub horizontal_overflow: HorizontalWrapMode,
    pub vertical_overflow: VerticalWrapMode,
    /// Pixels per layout unit.
    pub scale_factor: f32,
    /// CSS-style font family chain.
    pub family: String,
    /// Weight used for `<b>` runs.
    pub bold_weight: u16,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            line_spacing: 1.0,
            color: Color32::WHITE,
            rich_text: true,
            extents: Vec2::new(160.0, 30.0),
            pivot: Vec2::new(0.5, 0.5),
            alignment: TextAnchor::UpperLeft,
            horizontal_overflow: HorizontalWrapMode::Wrap,
            vertical_overflow: VerticalWrapMode::Truncate,
            scale_factor: 1.0,
            family: String::from("sans-serif"),
            bold_weight: 700,
        }
    }
}

impl GenerationSettings {
    /// The layout rectangle in layout units.
    pub fn rect(&self) -> Rect {
        Rect::from_pivot(self.extents, self.pivot)
    }

    pub fn units_per_pixel(&self) -> f32 {
        1.0 / self.scale_factor
    }

    /// Line width limit in pixels; infinite when wrapping is off or the
    /// rectangle has no width.
    pub fn wrap_width(&self) -> f32 {
        match self.horizontal_overflow {
            HorizontalWrapMode::Wrap if self.extents.x > 0.0 => self.extents.x * self.scale_factor,
            _ => f32::INFINITY,
        }
    }

    /// Same settings over a different rectangle size.
    pub fn with_extents(&self, extents: Vec2) -> Self {
        Self {
            extents,
            ..self.clone()
        }
    }

    /// Top of the text block in pixels, given its total height.
    pub(crate) fn block_top(&self, total_height: f32) -> f32 {
        let rect = self.rect();
        let scale = self.scale_factor;
        match self.alignment.parts().1 {
            VerticalAlign::Upper => rect.y_max() * scale,
            VerticalAlign::Middle => (rect.y_min() + rect.y_max()) * 0.5 * scale + total_height * 0.5,
            VerticalAlign::Lower => rect.y_min() * scale + total_height,
        }
    }

    /// Left edge of a line in pixels, given its width.
    pub(crate) fn line_left(&self, line_width: f32) -> f32 {
        let rect = self.rect();
        let scale = self.scale_factor;
        match self.alignment.parts().0 {
            TextAlign::Left => rect.x_min() * scale,
            TextAlign::Center => (rect.x_min() + rect.x_max()) * 0.5 * scale - line_width * 0.5,
            TextAlign::Right => rect.x_max() * scale - line_width,
        }
    }
}

// ── Engine contract ─────────────────────────────────────────────────

/// A glyph layout engine.
///
/// `populate` returns a view into storage the engine reuses on the next
/// call; callers that keep vertices past that point must copy them.
pub trait GlyphLayout {
    /// Unwrapped width of `text` in pixels.
    fn preferred_width(&mut self, text: &str, settings: &GenerationSettings) -> f32;

    /// Height of `text` in pixels when wrapped to `settings.extents.x`.
    fn preferred_height(&mut self, text: &str, settings: &GenerationSettings) -> f32;

    /// Lay out `text`: one quad per character plus the trailing sentinel.
    fn populate(&mut self, text: &str, settings: &GenerationSettings) -> &[Vertex];
}

impl<G: GlyphLayout + ?Sized> GlyphLayout for Box<G> {
    fn preferred_width(&mut self, text: &str, settings: &GenerationSettings) -> f32 {
        (**self).preferred_width(text, settings)
    }

    fn preferred_height(&mut self, text: &str, settings: &GenerationSettings) -> f32 {
        (**self).preferred_height(text, settings)
    }

    fn populate(&mut self, text: &str, settings: &GenerationSettings) -> &[Vertex] {
        (**self).populate(text, settings)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let s = GenerationSettings::default();
        assert_eq!(s.font_size, 14.0);
        assert_eq!(s.alignment, TextAnchor::UpperLeft);
        assert_eq!(s.horizontal_overflow, HorizontalWrapMode::Wrap);
        assert_eq!(s.vertical_overflow, VerticalWrapMode::Truncate);
        assert!(s.rich_text);
    }

    #[test]
    fn test_wrap_width() {
        let mut s = GenerationSettings {
            extents: Vec2::new(100.0, 20.0),
            scale_factor: 2.0,
            ..Default::default()
        };
        assert_eq!(s.wrap_width(), 200.0);
        s.horizontal_overflow = HorizontalWrapMode::Overflow;
        assert!(s.wrap_width().is_infinite());
        s.horizontal_overflow = HorizontalWrapMode::Wrap;
        s.extents = Vec2::ZERO;
        assert!(s.wrap_width().is_infinite());
    }

    #[test]
    fn test_anchor_parts() {
        assert_eq!(TextAnchor::MiddleRight.parts(), (TextAlign::Right, VerticalAlign::Middle));
        assert_eq!(TextAnchor::LowerCenter.parts(), (TextAlign::Center, VerticalAlign::Lower));
    }

    #[test]
    fn test_block_placement() {
        let s = GenerationSettings {
            extents: Vec2::new(100.0, 40.0),
            pivot: Vec2::new(0.5, 0.5),
            ..Default::default()
        };
        assert_eq!(s.block_top(10.0), 20.0);
        assert_eq!(s.line_left(30.0), -50.0);

        let centered = GenerationSettings {
            alignment: TextAnchor::MiddleCenter,
            ..s.clone()
        };
        assert_eq!(centered.block_top(10.0), 5.0);
        assert_eq!(centered.line_left(30.0), -15.0);

        let lower_right = GenerationSettings {
            alignment: TextAnchor::LowerRight,
            ..s
        };
        assert_eq!(lower_right.block_top(10.0), -10.0);
        assert_eq!(lower_right.line_left(30.0), 20.0);
    }
}
