//! Axis-aligned rectangles on the level plane
//!
//! The level is generated in 2D. `x` grows right, `y` grows "up" the map
//! (towards `Side::Top`); world space is 3D with y up, so a plane point
//! `(x, y)` maps to `(x, 0, y)`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::approx_eq;

/// One of the four sides of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Side {
    Left,
    Right,
    Bottom,
    Top,
}

impl Side {
    /// The side facing this one across a shared boundary
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
        }
    }

    /// Left and right walls run along the y axis
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Overlap between two edge-aligned rectangles
///
/// `start` is measured from the querying rectangle's origin along the side's
/// axis (y for Left/Right, x for Bottom/Top).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeShare {
    pub side: Side,
    pub start: f64,
    pub length: f64,
}

impl EdgeShare {
    /// Start of the shared interval in world coordinates, given the rect the
    /// query was made from
    pub fn world_start(&self, from: &Rect) -> f64 {
        from.side_origin(self.side) + self.start
    }

    /// End of the shared interval in world coordinates
    pub fn world_end(&self, from: &Rect) -> f64 {
        self.world_start(from) + self.length
    }
}

/// A rectangle given by its bottom-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same size, different bottom-left corner
    pub fn at(&self, x: f64, y: f64) -> Self {
        Self { x, y, ..*self }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bottom-left corner in world space
    pub fn world_position(&self) -> (f64, f64, f64) {
        (self.x, 0.0, self.y)
    }

    /// Center in world space
    pub fn world_center(&self) -> (f64, f64, f64) {
        let (cx, cy) = self.center();
        (cx, 0.0, cy)
    }

    /// Check if the rectangle has positive area
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Coordinate where a side's local axis starts (y for vertical sides, x otherwise)
    pub fn side_origin(&self, side: Side) -> f64 {
        if side.is_vertical() { self.y } else { self.x }
    }

    /// Length of a side
    pub fn side_length(&self, side: Side) -> f64 {
        if side.is_vertical() {
            self.height
        } else {
            self.width
        }
    }

    /// Fixed coordinate of a side's boundary line
    pub fn side_coordinate(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
            Side::Bottom => self.bottom(),
            Side::Top => self.top(),
        }
    }

    /// Check if this rectangle contains another. Edges that differ by
    /// rounding noise count as aligned.
    pub fn contains(&self, other: &Rect) -> bool {
        let le = |a: f64, b: f64| a <= b || approx_eq(a, b);
        le(self.left(), other.left())
            && le(other.right(), self.right())
            && le(self.bottom(), other.bottom())
            && le(other.top(), self.top())
    }

    /// Check if this rectangle overlaps another. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() <= other.left()
            || self.left() >= other.right()
            || self.top() <= other.bottom()
            || self.bottom() >= other.top())
    }

    /// Check if a rectangle of this size fits inside `other`, ignoring position
    pub fn can_fit_in(&self, other: &Rect) -> bool {
        self.width <= other.width && self.height <= other.height
    }

    /// Shrink by `margin` on every side. `None` if nothing is left.
    pub fn inset(&self, margin: f64) -> Option<Rect> {
        let r = Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        );
        r.is_valid().then_some(r)
    }

    /// Find the boundary segment shared with `other`
    ///
    /// The rectangles must touch along one side (within tolerance) and overlap
    /// along it by at least `min_length`. The side is reported from `self`'s
    /// point of view; asking from `other` gives the opposite side and the same
    /// world interval.
    pub fn share_edge(&self, other: &Rect, min_length: f64) -> Option<EdgeShare> {
        let a = self;
        let b = other;

        let r_align = approx_eq(a.right(), b.left());
        let l_align = approx_eq(a.left(), b.right());
        if r_align || l_align {
            let side = if r_align { Side::Right } else { Side::Left };
            let lo = a.bottom().max(b.bottom());
            let hi = a.top().min(b.top());
            if let Some(share) = Self::overlap(a, side, lo, hi, min_length) {
                return Some(share);
            }
        }

        let t_align = approx_eq(a.top(), b.bottom());
        let b_align = approx_eq(a.bottom(), b.top());
        if t_align || b_align {
            let side = if t_align { Side::Top } else { Side::Bottom };
            let lo = a.left().max(b.left());
            let hi = a.right().min(b.right());
            return Self::overlap(a, side, lo, hi, min_length);
        }

        None
    }

    fn overlap(a: &Rect, side: Side, lo: f64, hi: f64, min_length: f64) -> Option<EdgeShare> {
        let length = hi - lo;
        if length <= 0.0 || length < min_length {
            return None;
        }
        Some(EdgeShare {
            side,
            start: lo - a.side_origin(side),
            length,
        })
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[pos: ({:.2}, {:.2}) | width: {:.2} | height: {:.2}]",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_rect_dimensions() {
        let r = Rect::new(10.0, 20.0, 6.0, 4.0);
        assert_eq!(r.right(), 16.0);
        assert_eq!(r.top(), 24.0);
        assert_eq!(r.area(), 24.0);
        assert_eq!(r.center(), (13.0, 22.0));
        assert_eq!(r.world_position(), (10.0, 0.0, 20.0));
    }

    #[test]
    fn test_rect_contains() {
        let outer = Rect::new(0.0, 0.0, 20.0, 20.0);
        let inner = Rect::new(5.0, 5.0, 5.0, 5.0);
        let outside = Rect::new(25.0, 25.0, 5.0, 5.0);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&outside));
    }

    #[test]
    fn test_contains_tolerates_rounded_far_edge() {
        let parent = Rect::new(0.0, 0.0, 100.0, 117.81072151699941);
        let child = Rect::new(0.0, 60.0, 100.0, 57.81072151699942);
        assert!(parent.top() < child.top());
        assert!(parent.contains(&child));
        assert!(!parent.contains(&Rect::new(0.0, 60.0, 100.0, 57.9)));
    }

    #[test]
    fn test_rect_intersects() {
        let r1 = Rect::new(0.0, 0.0, 10.0, 10.0);
        let r2 = Rect::new(5.0, 5.0, 10.0, 10.0);
        let r3 = Rect::new(20.0, 20.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 5.0, 5.0);

        assert!(r1.intersects(&r2));
        assert!(r2.intersects(&r1));
        assert!(!r1.intersects(&r3));
        assert!(!r1.intersects(&touching));
    }

    #[test]
    fn test_can_fit_in_ignores_position() {
        let container = Rect::new(50.0, 50.0, 4.0, 3.0);
        assert!(Rect::new(0.0, 0.0, 4.0, 3.0).can_fit_in(&container));
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).can_fit_in(&container));
        assert!(!Rect::new(0.0, 0.0, 4.5, 1.0).can_fit_in(&container));
    }

    #[test]
    fn test_inset() {
        let r = Rect::new(0.0, 0.0, 10.0, 6.0);
        assert_eq!(r.inset(1.5), Some(Rect::new(1.5, 1.5, 7.0, 3.0)));
        assert_eq!(r.inset(3.0), None);
    }

    #[test]
    fn test_share_edge_right() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 4.0, 5.0, 20.0);

        let share = a.share_edge(&b, 1.0).unwrap();
        assert_eq!(share.side, Side::Right);
        assert_eq!(share.start, 4.0);
        assert_eq!(share.length, 6.0);
    }

    #[test]
    fn test_share_edge_is_symmetric() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(3.0, 10.0, 20.0, 5.0);

        let ab = a.share_edge(&b, 1.0).unwrap();
        let ba = b.share_edge(&a, 1.0).unwrap();
        assert_eq!(ab.side, Side::Top);
        assert_eq!(ba.side, Side::Bottom);
        assert_eq!(ab.length, ba.length);
        assert_eq!(ab.world_start(&a), ba.world_start(&b));
        assert_eq!(ab.start, 3.0);
        assert_eq!(ba.start, 0.0);
    }

    #[test]
    fn test_share_edge_tolerates_float_noise() {
        let a = Rect::new(0.0, 0.0, 0.1 + 0.2, 1.0);
        let b = Rect::new(0.3, 0.0, 1.0, 1.0);
        assert!(a.share_edge(&b, 0.5).is_some());
    }

    #[test]
    fn test_share_edge_rejects_short_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 8.0, 5.0, 5.0);
        assert!(a.share_edge(&b, 3.0).is_none());
        assert!(a.share_edge(&b, 2.0).is_some());
    }

    #[test]
    fn test_share_edge_corner_touch_is_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(a.share_edge(&b, 0.0).is_none());
    }

    #[test]
    fn test_share_edge_detached_is_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(11.0, 0.0, 5.0, 5.0);
        assert!(a.share_edge(&b, 0.0).is_none());
    }

    #[test]
    fn test_sides() {
        for side in Side::iter() {
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.is_vertical(), side.opposite().is_vertical());
        }
        let r = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(r.side_origin(Side::Left), 3.0);
        assert_eq!(r.side_origin(Side::Top), 2.0);
        assert_eq!(r.side_length(Side::Right), 5.0);
        assert_eq!(r.side_coordinate(Side::Top), 8.0);
    }
}
