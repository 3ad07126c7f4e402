//! `<material=KIND key=value …>…</material>` markup parser.
//!
//! Tokens are located in the display text and resolved against a stack of
//! open frames:
//!
//! ```text
//! "<material=shadow x=2>Hi</material>"
//!   ├── open token  → push OpenFrame { start = 21 }
//!   └── close token → pop, end = 22, resolve Tag { 21..=22, Shadow }
//! ```
//!
//! Matching is strictly LIFO and ignores kinds: every `</material>` pops
//! whichever frame is on top. Closes with an empty stack are ignored,
//! frames still open at the end of the text are dropped, and spans that
//! end before they start never become tags. Nothing here fails; anomalies
//! are logged at `trace` and absorbed.
//!
//! All offsets are character (Unicode scalar) offsets, not byte offsets,
//! so that `offset * 4` indexes the glyph-quad buffer.

use std::fmt;
use std::ops::Range;

use crate::tag::{Effect, Tag, TagKind};

const TAG_NAME: &str = "material";
const CLOSE_TOKEN: &str = "</material>";
const OPEN_PREFIX: &str = "<material=";

/// Silently absorbed markup anomalies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupIssue {
    UnrecognizedTagKind(String),
    UnparsableAttributeValue { key: String, value: String },
    UnmatchedCloseToken { offset: usize },
    UnmatchedOpenToken { offset: usize },
}

impl fmt::Display for MarkupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedTagKind(kind) => write!(f, "unrecognized tag kind {kind:?}"),
            Self::UnparsableAttributeValue { key, value } => {
                write!(f, "unparsable value {value:?} for attribute {key:?}")
            }
            Self::UnmatchedCloseToken { offset } => write!(f, "unmatched close token at {offset}"),
            Self::UnmatchedOpenToken { offset } => write!(f, "unmatched open token at {offset}"),
        }
    }
}

// ── Tokens ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
    Open,
    Close,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    bytes: Range<usize>,
    /// Character offset of the leading `<`.
    char_start: usize,
    /// Character offset just past the trailing `>`.
    char_end: usize,
}

/// Finds `<` `/`* `material` … `>` tokens, left to right.
struct Tokens<'a> {
    text: &'a str,
    pos: usize,
    chars_before_pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            chars_before_pos: 0,
        }
    }

    fn advance_to(&mut self, byte: usize) {
        self.chars_before_pos += self.text[self.pos..byte].chars().count();
        self.pos = byte;
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut search = self.pos;
        loop {
            let lt = search + self.text[search..].find('<')?;
            let name_at = lt + 1 + self.text[lt + 1..].len() - self.text[lt + 1..].trim_start_matches('/').len();
            if !self.text[name_at..].starts_with(TAG_NAME) {
                search = lt + 1;
                continue;
            }
            // No `>` anywhere after this point means no token can close.
            let gt = name_at + self.text[name_at..].find('>')?;
            let bytes = lt..gt + 1;

            self.advance_to(lt);
            let char_start = self.chars_before_pos;
            self.advance_to(gt + 1);
            let char_end = self.chars_before_pos;

            let kind = if &self.text[bytes.clone()] == CLOSE_TOKEN {
                TokenKind::Close
            } else {
                TokenKind::Open
            };
            return Some(Token {
                kind,
                bytes,
                char_start,
                char_end,
            });
        }
    }
}

// ── Attributes ──────────────────────────────────────────────────────

/// Iterate `key=value` pairs in a whitespace-delimited attribute region.
///
/// The key is the trailing run of word characters before the first `=`;
/// the value is everything after it up to the next whitespace. Tokens
/// without a key or a value are skipped.
pub fn attributes(region: &str) -> impl Iterator<Item = (&str, &str)> {
    region.split_whitespace().filter_map(|token| {
        let eq = token.find('=')?;
        let head = &token[..eq];
        let key_start = head
            .char_indices()
            .rev()
            .take_while(|&(_, c)| c.is_alphanumeric() || c == '_')
            .last()
            .map(|(i, _)| i)?;
        let key = &head[key_start..];
        let value = &token[eq + 1..];
        if value.is_empty() {
            return None;
        }
        Some((key, value))
    })
}

// ── Interpreter ─────────────────────────────────────────────────────

/// An opening token awaiting its close.
#[derive(Clone, Debug)]
struct OpenFrame {
    token: Range<usize>,
    /// Character offset just past the opening token.
    start: usize,
}

/// Resolve an opening token into an effect, if its kind is recognised.
fn resolve(token: &str) -> Option<Effect> {
    let at = token.find(OPEN_PREFIX)?;
    let rest = token[at + OPEN_PREFIX.len()..].trim_end_matches('>');
    let kind_len = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let (keyword, region) = rest.split_at(kind_len);
    if keyword.is_empty() {
        return None;
    }
    match TagKind::from_keyword(keyword) {
        Some(kind) => Some(Effect::from_attrs(kind, attributes(region))),
        None => {
            log::trace!("{}", MarkupIssue::UnrecognizedTagKind(keyword.to_string()));
            None
        }
    }
}

/// Stack-based `<material>` interpreter with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct TagInterpreter {
    open: Vec<OpenFrame>,
    closed: Vec<Tag>,
}

impl TagInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and return the closed tags in close order.
    pub fn parse(&mut self, text: &str) -> &[Tag] {
        self.open.clear();
        self.closed.clear();

        for token in Tokens::new(text) {
            match token.kind {
                TokenKind::Open => self.open.push(OpenFrame {
                    token: token.bytes,
                    start: token.char_end,
                }),
                TokenKind::Close => {
                    let Some(frame) = self.open.pop() else {
                        log::trace!(
                            "{}",
                            MarkupIssue::UnmatchedCloseToken {
                                offset: token.char_start
                            }
                        );
                        continue;
                    };
                    // end = close - 1 must not precede start.
                    if token.char_start <= frame.start {
                        continue;
                    }
                    if let Some(effect) = resolve(&text[frame.token]) {
                        self.closed.push(Tag {
                            start: frame.start,
                            end: token.char_start - 1,
                            effect,
                        });
                    }
                }
            }
        }

        for frame in self.open.drain(..) {
            log::trace!("{}", MarkupIssue::UnmatchedOpenToken { offset: frame.start });
        }
        &self.closed
    }
}

/// One-shot convenience wrapper around [`TagInterpreter::parse`].
pub fn parse(text: &str) -> Vec<Tag> {
    TagInterpreter::new().parse(text).to_vec()
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color32;
    use crate::geometry::Vec2;
    use crate::tag::{OffsetEffect, UnderlineEffect};

    fn kinds(tags: &[Tag]) -> Vec<TagKind> {
        tags.iter().map(Tag::kind).collect()
    }

    // ─────────────── attributes ───────────────

    #[test]
    fn test_attributes_basic() {
        let attrs: Vec<_> = attributes(" c=#000000 x=1 y=-1").collect();
        assert_eq!(attrs, vec![("c", "#000000"), ("x", "1"), ("y", "-1")]);
    }

    #[test]
    fn test_attributes_skip_malformed_tokens() {
        let attrs: Vec<_> = attributes("bare =novalue key= a=b=c -x=2").collect();
        assert_eq!(attrs, vec![("a", "b=c"), ("x", "2")]);
    }

    // ─────────────── basic spans ───────────────

    #[test]
    fn test_parse_no_tags() {
        assert!(parse("plain text").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_single_shadow() {
        let tags = parse("<material=shadow x=2 y=-2>Hi</material>");
        assert_eq!(tags.len(), 1);
        let tag = &tags[0];
        assert_eq!(tag.start, 26);
        assert_eq!(tag.end, 27);
        match &tag.effect {
            Effect::Shadow(fx) => {
                assert_eq!(fx.offset, Vec2::new(2.0, -2.0));
                assert_eq!(fx.color, Color32::BLACK);
            }
            other => panic!("expected shadow, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_offsets_are_char_based() {
        // Each CJK character is 3 bytes but one offset.
        let tags = parse("阴影<material=shadow>阴影</material>");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start, 2 + "<material=shadow>".len());
        assert_eq!(tags[0].end, tags[0].start + 1);
    }

    #[test]
    fn test_parse_defaults_when_no_attrs() {
        let tags = parse("<material=underline>link</material>");
        assert_eq!(tags[0].effect, Effect::Underline(UnderlineEffect::default()));
    }

    // ─────────────── nesting ───────────────

    #[test]
    fn test_nested_tags_in_close_order() {
        let text = "<material=outline><material=gradient from=#ff0000 to=#00ff00>ab</material></material>";
        let tags = parse(text);
        assert_eq!(kinds(&tags), vec![TagKind::Gradient, TagKind::Outline]);
        // Inner span is the two letters; outer span also covers the inner tags.
        assert_eq!(tags[0].len(), 2);
        assert_eq!(tags[1].start, "<material=outline>".chars().count());
        assert!(tags[1].end > tags[0].end);
    }

    #[test]
    fn test_host_tags_inside_effect_are_part_of_the_span() {
        let tags = parse("<material=shadow><color=#ff0000>x</color></material>");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].len(), "<color=#ff0000>x</color>".len());
    }

    /// Closes pop the top frame regardless of kind. With overlapping
    /// markup the first close ends whichever span opened last.
    #[test]
    fn test_mismatched_nesting_is_lifo() {
        let text = "<material=shadow>a<material=underline>b</material>c</material>";
        let tags = parse(text);
        assert_eq!(kinds(&tags), vec![TagKind::Underline, TagKind::Shadow]);

        // The third close has nothing left to pop, and the trailing
        // gradient is never closed.
        let text = "<material=outline>x<material=shadow>y</material></material></material>z<material=gradient>w";
        let tags = parse(text);
        assert_eq!(kinds(&tags), vec![TagKind::Shadow, TagKind::Outline]);
    }

    // ─────────────── degenerate input ───────────────

    #[test]
    fn test_empty_span_discarded() {
        assert!(parse("<material=shadow></material>").is_empty());
    }

    #[test]
    fn test_unmatched_close_ignored() {
        let tags = parse("</material>a<material=shadow>b</material></material>");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].kind(), TagKind::Shadow);
    }

    #[test]
    fn test_unmatched_open_dropped() {
        assert!(parse("<material=shadow>never closed").is_empty());
    }

    #[test]
    fn test_unknown_kind_and_color_keyword_produce_nothing() {
        assert!(parse("<material=glow>a</material>").is_empty());
        assert!(parse("<material=#ff0000>a</material>").is_empty());
        assert!(parse("<material>a</material>").is_empty());
    }

    #[test]
    fn test_unknown_kind_still_consumes_a_close() {
        // The bogus frame is popped by the first close, so the shadow is
        // resolved by the second.
        let tags = parse("<material=shadow>a<material=blur>b</material>c</material>");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start, "<material=shadow>".len());
    }

    #[test]
    fn test_token_without_closing_bracket_stops_scan() {
        assert!(parse("<material=shadow x=1").is_empty());
    }

    #[test]
    fn test_interpreter_reuse_clears_state() {
        let mut interp = TagInterpreter::new();
        assert_eq!(interp.parse("<material=shadow>a</material>").len(), 1);
        assert!(interp.parse("<material=shadow>unterminated").is_empty());
        let tags = interp.parse("<material=outline c=red>z</material>");
        assert_eq!(tags.len(), 1);
        assert_eq!(
            tags[0].effect,
            Effect::Outline(OffsetEffect {
                color: Color32::rgb(255, 0, 0),
                ..OffsetEffect::default()
            })
        );
    }

    // ─────────────── properties ───────────────

    #[test]
    fn test_close_count_bounded_by_open_count() {
        let samples = [
            "<material=shadow>a</material></material></material>",
            "<material=shadow><material=shadow>a</material>",
            "x</material><material=outline>y</material>",
            "<material=gradient>a<material=underline>b</material>c</material>d</material>",
        ];
        for text in samples {
            let opens = text.matches("<material=").count();
            let tags = parse(text);
            assert!(tags.len() <= opens, "{text}: {} > {opens}", tags.len());
            assert!(tags.iter().all(|t| t.start <= t.end));
        }
    }
}
