//! Grid-space geometry: [`Point`] and [`Range`].
//!
//! Grid coordinates are integral; pixel coordinates live in the view crate
//! as plain `f32` pairs.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Sub};

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell coordinate. X grows right, Y grows down.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// King-move distance: the larger of the two axis distances.
    pub fn chebyshev(self, other: Point) -> i32 {
        let d = self - other;
        d.x.abs().max(d.y.abs())
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Row-major: compares `y` first.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.shift(rhs.x, rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise integer division, truncating toward zero.
impl Div<i32> for Point {
    type Output = Point;

    fn div(self, rhs: i32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// The cells `min.x..max.x` by `min.y..max.y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Corners may come in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn len(self) -> usize {
        (self.width().max(0) as usize) * (self.height().max(0) as usize)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Every point of the range, row by row.
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            front: 0,
            back: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// Iterator returned by [`Range::iter`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    front: usize,
    back: usize,
}

impl RangeIter {
    fn point_at(&self, i: usize) -> Point {
        let w = self.range.width() as usize;
        self.range.min.shift((i % w) as i32, (i / w) as i32)
    }
}

impl Iterator for RangeIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.front >= self.back {
            return None;
        }
        let p = self.point_at(self.front);
        self.front += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for RangeIter {
    fn next_back(&mut self) -> Option<Point> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.point_at(self.back))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_and_halving() {
        let p = Point::new(9, -3);
        assert_eq!(p.shift(1, 3), Point::new(10, 0));
        assert_eq!(p - Point::new(4, 4), Point::new(5, -7));
        assert_eq!(p + Point::new(-9, 3), Point::ZERO);
        assert_eq!(p / 2, Point::new(4, -1));
    }

    #[test]
    fn chebyshev_takes_the_longer_axis() {
        assert_eq!(Point::ZERO.chebyshev(Point::new(3, -5)), 5);
        assert_eq!(Point::new(2, 2).chebyshev(Point::new(2, 2)), 0);
    }

    #[test]
    fn sorting_is_row_major() {
        let mut pts = vec![Point::new(1, 1), Point::new(5, 0), Point::new(0, 1)];
        pts.sort();
        assert_eq!(pts, [Point::new(5, 0), Point::new(0, 1), Point::new(1, 1)]);
    }

    #[test]
    fn swapped_corners() {
        let r = Range::new(4, 3, 1, 0);
        assert_eq!((r.min, r.max), (Point::new(1, 0), Point::new(4, 3)));
        assert_eq!(r.len(), 9);
        assert!(Range::new(2, 0, 2, 5).is_empty());
    }

    #[test]
    fn contains_excludes_max_edge() {
        let r = Range::new(0, 0, 2, 2);
        assert!(r.contains(Point::new(1, 1)));
        assert!(!r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(0, -1)));
    }

    #[test]
    fn iterates_rows_then_columns() {
        let r = Range::new(1, 1, 3, 3);
        let pts: Vec<_> = r.iter().collect();
        assert_eq!(
            pts,
            [Point::new(1, 1), Point::new(2, 1), Point::new(1, 2), Point::new(2, 2)]
        );
        assert_eq!(r.iter().next_back(), Some(Point::new(2, 2)));

        let mut it = Range::new(0, 0, 3, 2).iter();
        it.next();
        assert_eq!(it.len(), 5);
        assert_eq!(Range::default().into_iter().count(), 0);
    }
}
