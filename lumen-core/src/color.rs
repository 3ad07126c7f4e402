//! RGBA8 colour with HTML-style parsing.
//!
//! Accepts `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA` and a fixed table of
//! named colours (matched case-insensitively).

use serde::{Deserialize, Serialize};

/// 8-bit-per-channel RGBA colour.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

const NAMED: &[(&str, Color32)] = &[
    ("aqua", Color32::rgb(0x00, 0xff, 0xff)),
    ("black", Color32::BLACK),
    ("blue", Color32::rgb(0x00, 0x00, 0xff)),
    ("brown", Color32::rgb(0xa5, 0x2a, 0x2a)),
    ("cyan", Color32::rgb(0x00, 0xff, 0xff)),
    ("darkblue", Color32::rgb(0x00, 0x00, 0xa0)),
    ("fuchsia", Color32::rgb(0xff, 0x00, 0xff)),
    ("green", Color32::rgb(0x00, 0x80, 0x00)),
    ("grey", Color32::rgb(0x80, 0x80, 0x80)),
    ("lightblue", Color32::rgb(0xad, 0xd8, 0xe6)),
    ("lime", Color32::rgb(0x00, 0xff, 0x00)),
    ("magenta", Color32::rgb(0xff, 0x00, 0xff)),
    ("maroon", Color32::rgb(0x80, 0x00, 0x00)),
    ("navy", Color32::rgb(0x00, 0x00, 0x80)),
    ("olive", Color32::rgb(0x80, 0x80, 0x00)),
    ("orange", Color32::rgb(0xff, 0xa5, 0x00)),
    ("purple", Color32::rgb(0x80, 0x00, 0x80)),
    ("red", Color32::rgb(0xff, 0x00, 0x00)),
    ("silver", Color32::rgb(0xc0, 0xc0, 0xc0)),
    ("teal", Color32::rgb(0x00, 0x80, 0x80)),
    ("white", Color32::WHITE),
    ("yellow", Color32::rgb(0xff, 0xff, 0x00)),
];

impl Color32 {
    pub const WHITE: Color32 = Color32::rgba(255, 255, 255, 255);
    pub const BLACK: Color32 = Color32::rgba(0, 0, 0, 255);
    pub const CLEAR: Color32 = Color32::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse an HTML-style colour string. Returns `None` for anything
    /// unrecognised; callers fall back to their own default.
    pub fn parse_html(value: &str) -> Option<Self> {
        if let Some(hex) = value.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|&(_, color)| color)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Channel-wise linear interpolation; `t` is clamped to `[0, 1]` and
    /// each channel truncates toward zero.
    pub fn lerp(from: Color32, to: Color32, t: f32) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Color32::rgba(
            mix(from.r, to.r),
            mix(from.g, to.g),
            mix(from.b, to.b),
            mix(from.a, to.a),
        )
    }

    /// This colour with its alpha scaled by `alpha / 255`, rounded to
    /// nearest.
    pub fn with_alpha_scaled(self, alpha: u8) -> Color32 {
        let a = ((self.a as u16 * alpha as u16 + 127) / 255) as u8;
        Color32 { a, ..self }
    }

    /// Channels normalised to `[0.0, 1.0]`.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color32::parse_html("#ff3300"), Some(Color32::rgb(0xff, 0x33, 0x00)));
        assert_eq!(Color32::parse_html("#00000000"), Some(Color32::CLEAR));
        assert_eq!(Color32::parse_html("#f30"), Some(Color32::rgb(0xff, 0x33, 0x00)));
        assert_eq!(Color32::parse_html("#f308"), Some(Color32::rgba(0xff, 0x33, 0x00, 0x88)));
        assert_eq!(Color32::parse_html("#33FF33"), Some(Color32::rgb(0x33, 0xff, 0x33)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Color32::parse_html("ff3300"), None);
        assert_eq!(Color32::parse_html("#ff330"), None);
        assert_eq!(Color32::parse_html("#gg0000"), None);
        assert_eq!(Color32::parse_html("#"), None);
        assert_eq!(Color32::parse_html("notacolor"), None);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color32::parse_html("red"), Some(Color32::rgb(255, 0, 0)));
        assert_eq!(Color32::parse_html("White"), Some(Color32::WHITE));
        assert_eq!(Color32::parse_html("orange"), Some(Color32::rgb(0xff, 0xa5, 0x00)));
    }

    #[test]
    fn test_lerp_endpoints_and_clamp() {
        let a = Color32::rgb(0, 0, 0);
        let b = Color32::rgb(200, 100, 50);
        assert_eq!(Color32::lerp(a, b, 0.0), a);
        assert_eq!(Color32::lerp(a, b, 1.0), b);
        assert_eq!(Color32::lerp(a, b, 0.5), Color32::rgb(100, 50, 25));
        assert_eq!(Color32::lerp(a, b, 2.0), b);
        assert_eq!(Color32::lerp(a, b, -1.0), a);
        assert_eq!(Color32::lerp(a, b, f32::NAN), a);
    }

    #[test]
    fn test_lerp_truncates() {
        let a = Color32::rgb(0, 0, 0);
        let b = Color32::rgb(3, 3, 3);
        // 3 * 0.5 = 1.5 → 1
        assert_eq!(Color32::lerp(a, b, 0.5).r, 1);
    }

    #[test]
    fn test_alpha_scaled() {
        assert_eq!(Color32::BLACK.with_alpha_scaled(255).a, 255);
        assert_eq!(Color32::BLACK.with_alpha_scaled(0).a, 0);
        assert_eq!(Color32::rgba(0, 0, 0, 128).with_alpha_scaled(128).a, 64);
    }

    #[test]
    fn test_alpha_scaled_rounds_to_nearest() {
        // 100 * 130 / 255 = 50.98
        assert_eq!(Color32::rgba(0, 0, 0, 100).with_alpha_scaled(130).a, 51);
        // 3 * 40 / 255 = 0.47
        assert_eq!(Color32::rgba(0, 0, 0, 3).with_alpha_scaled(40).a, 0);
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let json = serde_json::to_string(&Color32::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, r#"{"r":1,"g":2,"b":3,"a":255}"#);
    }
}
