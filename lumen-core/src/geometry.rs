use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 2-D vector in layout units (or pixels, depending on the stage).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle stored as origin + size.
///
/// Layout space is y-up: `y` is the bottom edge and `y + height` the top.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `size` placed so that `pivot` (fractions of the size)
    /// sits on the origin.
    pub fn from_pivot(size: Vec2, pivot: Vec2) -> Self {
        Self {
            x: -size.x * pivot.x,
            y: -size.y * pivot.y,
            width: size.x,
            height: size.y,
        }
    }

    #[inline]
    pub fn x_min(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn y_min(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: min edges are inside, max edges are not.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x_min()
            && point.x < self.x_max()
            && point.y >= self.y_min()
            && point.y < self.y_max()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_ops() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
    }

    #[test]
    fn test_rect_from_pivot_center() {
        let r = Rect::from_pivot(Vec2::new(100.0, 40.0), Vec2::new(0.5, 0.5));
        assert_eq!(r.x_min(), -50.0);
        assert_eq!(r.x_max(), 50.0);
        assert_eq!(r.y_min(), -20.0);
        assert_eq!(r.y_max(), 20.0);
    }

    #[test]
    fn test_rect_contains_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.99, 9.99)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 10.0)));
        assert!(!r.contains(Vec2::new(-0.01, 5.0)));
    }

    #[test]
    fn test_rect_negative_height_contains_nothing() {
        let r = Rect::new(0.0, 0.0, 10.0, -5.0);
        assert!(!r.contains(Vec2::new(5.0, -2.0)));
    }
}
