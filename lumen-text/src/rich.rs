//! Host rich-text markup scanner.
//!
//! Resolves a per-character style for the markup every engine understands:
//!
//! ```text
//!   <b> </b>  <i> </i>  <size=N> </size>  <color=C> </color>
//!   <material…> </material>      (hidden, no style change)
//! ```
//!
//! Characters of a recognised tag are hidden; every other character keeps
//! its own entry so the style vector stays aligned with character
//! offsets. Closing tags without a matching open are left visible.

use lumen_core::Color32;

use crate::engine::GenerationSettings;

/// Resolved style of one character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharStyle {
    /// Part of a markup tag (or a carriage return); never drawn.
    pub hidden: bool,
    /// Font size in layout units.
    pub size: f32,
    pub color: Color32,
    pub bold: bool,
    pub italic: bool,
}

impl CharStyle {
    pub fn base(settings: &GenerationSettings) -> Self {
        Self {
            hidden: false,
            size: settings.font_size,
            color: settings.color,
            bold: false,
            italic: false,
        }
    }

    /// Same visual run (ignoring visibility).
    pub fn same_run(&self, other: &CharStyle) -> bool {
        self.size == other.size
            && self.color == other.color
            && self.bold == other.bold
            && self.italic == other.italic
    }
}

#[derive(Debug, PartialEq)]
enum HostTag {
    Bold(bool),
    Italic(bool),
    Size(Option<f32>),
    Color(Option<Color32>),
    Material(bool),
}

/// Recognise the body of `<…>` (without the angle brackets).
fn classify(body: &str) -> Option<HostTag> {
    let (closing, body) = match body.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    match (name, value, closing) {
        ("b", None, c) => Some(HostTag::Bold(!c)),
        ("i", None, c) => Some(HostTag::Italic(!c)),
        ("size", None, true) => Some(HostTag::Size(None)),
        ("size", Some(v), false) => {
            let v = v.trim().trim_matches('"');
            v.parse::<f32>().ok().filter(|s| s.is_finite() && *s > 0.0).map(|s| HostTag::Size(Some(s)))
        }
        ("color", None, true) => Some(HostTag::Color(None)),
        ("color", Some(v), false) => Color32::parse_html(v.trim().trim_matches('"')).map(|c| HostTag::Color(Some(c))),
        ("material", None, true) => Some(HostTag::Material(false)),
        (name, _, false) if name.starts_with("material") => Some(HostTag::Material(true)),
        _ => None,
    }
}

/// Resolve styles for every character of `text` into `out`.
///
/// With `rich` off no markup is interpreted and only carriage returns are
/// hidden.
pub fn scan(text: &str, base: CharStyle, rich: bool, out: &mut Vec<CharStyle>) {
    out.clear();
    let mut sizes: Vec<f32> = Vec::new();
    let mut colors: Vec<Color32> = Vec::new();
    let mut bold = 0usize;
    let mut italic = 0usize;
    let mut materials = 0usize;

    let current = |sizes: &Vec<f32>, colors: &Vec<Color32>, bold: usize, italic: usize| CharStyle {
        hidden: false,
        size: sizes.last().copied().unwrap_or(base.size),
        color: colors.last().copied().unwrap_or(base.color),
        bold: bold > 0,
        italic: italic > 0,
    };

    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let tag = if rich && rest.starts_with('<') {
            rest.find('>').and_then(|close| {
                let body = &rest[1..close];
                let tag = classify(body)?;
                let accepted = match &tag {
                    HostTag::Bold(false) => bold > 0,
                    HostTag::Italic(false) => italic > 0,
                    HostTag::Size(None) => !sizes.is_empty(),
                    HostTag::Color(None) => !colors.is_empty(),
                    HostTag::Material(false) => materials > 0,
                    _ => true,
                };
                accepted.then_some((tag, close + 1))
            })
        } else {
            None
        };

        match tag {
            Some((tag, byte_len)) => {
                let hidden = CharStyle {
                    hidden: true,
                    ..current(&sizes, &colors, bold, italic)
                };
                let chars = rest[..byte_len].chars().count();
                out.extend(std::iter::repeat(hidden).take(chars));
                match tag {
                    HostTag::Bold(true) => bold += 1,
                    HostTag::Bold(false) => bold -= 1,
                    HostTag::Italic(true) => italic += 1,
                    HostTag::Italic(false) => italic -= 1,
                    HostTag::Size(Some(s)) => sizes.push(s),
                    HostTag::Size(None) => {
                        sizes.pop();
                    }
                    HostTag::Color(Some(c)) => colors.push(c),
                    HostTag::Color(None) => {
                        colors.pop();
                    }
                    HostTag::Material(true) => materials += 1,
                    HostTag::Material(false) => materials -= 1,
                }
                pos += byte_len;
            }
            None => {
                let ch = rest.chars().next().unwrap_or('\0');
                out.push(CharStyle {
                    hidden: ch == '\r',
                    ..current(&sizes, &colors, bold, italic)
                });
                pos += ch.len_utf8().max(1);
            }
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CharStyle {
        CharStyle {
            hidden: false,
            size: 14.0,
            color: Color32::WHITE,
            bold: false,
            italic: false,
        }
    }

    fn hidden_mask(styles: &[CharStyle]) -> String {
        styles.iter().map(|s| if s.hidden { '_' } else { 'x' }).collect()
    }

    #[test]
    fn test_plain_text_one_style_per_char() {
        let mut out = Vec::new();
        scan("héllo", base(), true, &mut out);
        assert_eq!(out.len(), 5);
        assert!(out.iter().all(|s| *s == base()));
    }

    #[test]
    fn test_size_and_color_apply_inside() {
        let mut out = Vec::new();
        scan("a<size=20><color=#ff0000>b</color></size>c", base(), true, &mut out);
        assert_eq!(out.len(), "a<size=20><color=#ff0000>b</color></size>c".chars().count());
        assert_eq!(out[0].size, 14.0);
        let b = out.iter().find(|s| !s.hidden && s.size == 20.0).copied();
        let b = b.map(|s| (s.size, s.color));
        assert_eq!(b, Some((20.0, Color32::rgb(255, 0, 0))));
        let last = out.last().copied().map(|s| (s.hidden, s.size, s.color));
        assert_eq!(last, Some((false, 14.0, Color32::WHITE)));
    }

    #[test]
    fn test_material_tags_hidden() {
        let mut out = Vec::new();
        scan("<material=shadow x=1>ab</material>", base(), true, &mut out);
        let mask = hidden_mask(&out);
        assert_eq!(mask, format!("{}xx{}", "_".repeat(21), "_".repeat(11)));
    }

    #[test]
    fn test_bold_italic_flags() {
        let mut out = Vec::new();
        scan("<b>a<i>b</i></b>", base(), true, &mut out);
        let visible: Vec<_> = out.iter().filter(|s| !s.hidden).collect();
        assert_eq!(visible.len(), 2);
        assert!(visible[0].bold && !visible[0].italic);
        assert!(visible[1].bold && visible[1].italic);
    }

    #[test]
    fn test_unmatched_close_stays_visible() {
        let mut out = Vec::new();
        scan("a</b>", base(), true, &mut out);
        assert_eq!(hidden_mask(&out), "xxxxx");
    }

    #[test]
    fn test_invalid_tags_visible() {
        let mut out = Vec::new();
        scan("<size=abc>x<color=nope>", base(), true, &mut out);
        assert!(out.iter().all(|s| !s.hidden));
    }

    #[test]
    fn test_rich_off_keeps_markup_visible() {
        let mut out = Vec::new();
        scan("<b>a</b>\r", base(), false, &mut out);
        assert_eq!(hidden_mask(&out), "xxxxxxxx_");
    }

    #[test]
    fn test_transparent_placeholder() {
        let mut out = Vec::new();
        scan("<color=#00000000><size=30>ii</size></color>", base(), true, &mut out);
        let visible: Vec<_> = out.iter().filter(|s| !s.hidden).collect();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|s| s.size == 30.0 && s.color == Color32::CLEAR));
    }
}
