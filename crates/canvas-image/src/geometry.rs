use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size that cannot be divided by: zero, negative or not finite on either axis.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn scaled(self, factor: f64) -> Size {
        Size::new(self.width * factor, self.height * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(min: Point, size: Size) -> Self {
        Self { min, size }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(Point::default(), size)
    }

    pub fn max(&self) -> Point {
        Point::new(self.min.x + self.size.width, self.min.y + self.size.height)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + self.size.width / 2.0,
            self.min.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.y >= self.min.y && p.x <= max.x && p.y <= max.y
    }
}

/// `value.clamp(min, max)` that never panics: an empty range collapses onto `min`.
pub(crate) fn between(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);
        assert_eq!(a.distance(b), 50.0);
        assert_eq!(a.midpoint(b), Point::new(15.0, 20.0));
    }

    #[test]
    fn degenerate_sizes() {
        assert!(Size::new(0.0, 10.0).is_degenerate());
        assert!(Size::new(10.0, -1.0).is_degenerate());
        assert!(Size::new(f64::NAN, 10.0).is_degenerate());
        assert!(Size::new(f64::INFINITY, 10.0).is_degenerate());
        assert!(!Size::new(1.0, 1.0).is_degenerate());
    }

    #[test]
    fn between_with_inverted_range_does_not_panic() {
        assert_eq!(between(5.0, 0.0, 10.0), 5.0);
        assert_eq!(between(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(between(15.0, 0.0, 10.0), 10.0);
        assert_eq!(between(5.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(Point::new(10.0, 10.0), Size::new(20.0, 20.0));
        assert!(rect.contains(Point::new(10.0, 30.0)));
        assert!(!rect.contains(Point::new(9.9, 15.0)));
        assert_eq!(rect.center(), Point::new(20.0, 20.0));
    }
}
