//! Click regions for inline images and underlines.
//!
//! A flat list queried back to front: the most recently registered rect
//! that contains the point wins. Lists stay short (one entry per clickable
//! icon or underlined line), so a linear scan needs no acceleration grid.

use lumen_core::{EventRect, Rect, Vec2};

/// Payload of a successful hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit<'a> {
    pub name: &'a str,
    pub args: Option<&'a str>,
}

#[derive(Clone, Debug, Default)]
pub struct EventRegistry {
    rects: Vec<EventRect>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rect: Rect, name: impl Into<String>, args: Option<String>) {
        self.rects.push(EventRect::new(rect, name, args));
    }

    /// Replace the registered rects, keeping their order.
    pub fn replace(&mut self, rects: impl IntoIterator<Item = EventRect>) {
        self.rects.clear();
        self.rects.extend(rects);
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[EventRect] {
        &self.rects
    }

    /// Topmost (last registered) rect containing `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<Hit<'_>> {
        self.rects
            .iter()
            .rev()
            .find(|e| e.rect.contains(point))
            .map(|e| Hit {
                name: &e.name,
                args: e.args.as_deref(),
            })
    }
}

impl Extend<EventRect> for EventRegistry {
    fn extend<T: IntoIterator<Item = EventRect>>(&mut self, iter: T) {
        self.rects.extend(iter);
    }
}

// ===================================================================
// Tests
// ===================================================================
