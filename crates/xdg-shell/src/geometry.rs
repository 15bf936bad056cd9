//! Geometry primitives
//!
//! Integer surface-local and global coordinates as used by the protocol.
//! Window geometry handed in by the window layer is global (absolute),
//! positioner values are relative to the parent surface.

use std::ops::{Add, Sub};

/// A 2D point in logical pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair
///
/// A zero (or negative) dimension makes the size empty. In a toplevel
/// configure an empty size means the client picks its own size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top_left(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(self) -> bool {
        self.size().is_empty()
    }
}

/// Decoration insets around a window's content area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }
}

/// A set of rectangles needing repaint
///
/// Empty rectangles are dropped on insertion, so a region is empty exactly
/// when it holds no rectangles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Self::new();
        region.add(rect);
        region
    }

    pub fn add(&mut self, rect: Rect) {
        if !rect.is_empty() {
            self.rects.push(rect);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        let mut region = Region::new();
        for rect in iter {
            region.add(rect);
        }
        region
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(150, 140);
        let b = Point::new(100, 100);
        assert_eq!(a - b, Point::new(50, 40));
        assert_eq!((a - b) + b, a);
    }

    #[test]
    fn zero_size_is_empty() {
        assert!(Size::new(0, 0).is_empty());
        assert!(Size::new(800, 0).is_empty());
        assert!(Size::new(0, 600).is_empty());
        assert!(!Size::new(800, 600).is_empty());
    }

    #[test]
    fn negative_size_is_empty() {
        assert!(Size::new(-1, 10).is_empty());
    }

    #[test]
    fn rect_accessors() {
        let rect = Rect::new(100, 100, 300, 200);
        assert_eq!(rect.top_left(), Point::new(100, 100));
        assert_eq!(rect.size(), Size::new(300, 200));
    }

    #[test]
    fn region_drops_empty_rects() {
        let mut region = Region::new();
        region.add(Rect::new(0, 0, 0, 10));
        assert!(region.is_empty());

        region.add(Rect::new(0, 0, 10, 10));
        assert!(!region.is_empty());
        assert_eq!(region.rects().len(), 1);
    }

    #[test]
    fn region_from_iter() {
        let region: Region = [Rect::new(0, 0, 5, 5), Rect::new(0, 0, 0, 0), Rect::new(5, 5, 5, 5)]
            .into_iter()
            .collect();
        assert_eq!(region.rects().len(), 2);
    }
}
