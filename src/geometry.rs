// geometry.rs - Integer point, size and rectangle types.
//
// Coordinates are pixel units with the origin at the first pixel of the
// buffer. `Rect` uses a "bottom-left origin" naming for its corners: the
// origin is `bottom_left`, and `top_right` is origin + size.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Point { x, y }
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Width × height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Size { width, height }
    }

    /// Number of pixels covered. Computed in `usize` so large images
    /// do not overflow `u32`.
    #[inline]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Size { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.width, self.height)
    }
}

/// Axis-aligned rectangle: an origin plus a size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Rect { origin, size }
    }

    /// Rectangle at the origin covering `size`.
    pub const fn from_size(size: Size) -> Self {
        Rect {
            origin: Point::new(0, 0),
            size,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.size.area()
    }

    pub fn bottom_left(&self) -> Point {
        self.origin
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.origin.x + self.size.width, self.origin.y)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.origin.x, self.origin.y + self.size.height)
    }

    pub fn top_right(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height,
        )
    }

    /// Centre of the rectangle, rounded down.
    pub fn midpoint(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2,
            self.origin.y + self.size.height / 2,
        )
    }

    /// True if `self` lies entirely inside `outer` (edges may touch).
    pub fn within(&self, outer: &Rect) -> bool {
        outer.contains(self)
    }

    /// True if `inner` lies entirely inside `self` (edges may touch).
    pub fn contains(&self, inner: &Rect) -> bool {
        // u64 so origin + size never wraps.
        let (ix0, iy0) = (inner.origin.x as u64, inner.origin.y as u64);
        let (ix1, iy1) = (ix0 + inner.size.width as u64, iy0 + inner.size.height as u64);
        let (ox0, oy0) = (self.origin.x as u64, self.origin.y as u64);
        let (ox1, oy1) = (ox0 + self.size.width as u64, oy0 + self.size.height as u64);
        ix0 >= ox0 && iy0 >= oy0 && ix1 <= ox1 && iy1 <= oy1
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.origin, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect::new(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_default_is_empty() {
        let r = Rect::default();
        assert_eq!(r.bottom_left(), Point::default());
        assert_eq!(r.top_right(), Point::default());
        assert_eq!(r.area(), 0);
    }

    #[test]
    fn test_corners() {
        let r = rect(5, 5, 10, 10);
        assert_eq!(r.bottom_left(), Point::new(5, 5));
        assert_eq!(r.bottom_right(), Point::new(15, 5));
        assert_eq!(r.top_left(), Point::new(5, 15));
        assert_eq!(r.top_right(), Point::new(15, 15));
    }

    #[test]
    fn test_within() {
        let r = rect(5, 5, 10, 10);
        assert!(r.within(&rect(5, 5, 10, 10)));
        assert!(r.within(&rect(0, 0, 20, 20)));
        assert!(!r.within(&rect(6, 0, 8, 8)));
        assert!(!r.within(&rect(0, 0, 10, 20)));
        assert!(!r.within(&rect(0, 0, 20, 10)));
    }

    #[test]
    fn test_contains() {
        let r = rect(5, 5, 10, 10);
        assert!(r.contains(&rect(6, 6, 8, 8)));
        assert!(!r.contains(&rect(4, 6, 8, 8)));
        assert!(!r.contains(&rect(6, 4, 8, 8)));
        assert!(!r.contains(&rect(6, 6, 8, 10)));
        assert!(!r.contains(&rect(6, 6, 10, 8)));
    }

    #[test]
    fn test_midpoint_and_display() {
        assert_eq!(rect(5, 5, 10, 10).midpoint(), Point::new(10, 10));
        assert_eq!(rect(1, 1, 20, 20).to_string(), "(1,1) -> [20,20]");
        assert_eq!(Rect::from_size(Size::new(10, 10)), rect(0, 0, 10, 10));
    }
}
