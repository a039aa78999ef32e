//! The [`Grid`] type: a fixed-size, row-major 2D container.
//!
//! A grid starts unsized, is sized exactly once with
//! [`set_dimensions`](Grid::set_dimensions) (or built directly with
//! [`Grid::sized`]), and from then on always holds `width * height`
//! populated cells. Cells are mutated in place; the grid is never resized.

use crate::error::GridError;
use crate::geom::{Point, Range};

/// A 2D grid of `T` stored row-major in a single `Vec`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGrid<T>"))]
pub struct Grid<T> {
    cells: Vec<T>,
    width: i32,
    height: i32,
}

impl<T> Default for Grid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Grid<T> {
    /// An unsized 0x0 grid. Call [`set_dimensions`](Grid::set_dimensions)
    /// before use.
    pub const fn new() -> Self {
        Self {
            cells: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Build a `width x height` grid holding distinct clones of `value`.
    pub fn sized(width: i32, height: i32, value: T) -> Result<Self, GridError>
    where
        T: Clone,
    {
        check_dimensions(width, height)?;
        Ok(Self {
            cells: vec![value; (width as usize) * (height as usize)],
            width,
            height,
        })
    }

    /// Allocate storage for `width x height` cells, each `T::default()`.
    ///
    /// Fails with [`GridError::AlreadySized`] on a second call.
    pub fn set_dimensions(&mut self, width: i32, height: i32) -> Result<(), GridError>
    where
        T: Default,
    {
        if self.width != 0 || self.height != 0 {
            return Err(GridError::AlreadySized);
        }
        check_dimensions(width, height)?;
        let n = (width as usize) * (height as usize);
        self.cells = std::iter::repeat_with(T::default).take(n).collect();
        self.width = width;
        self.height = height;
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// The range `[0, width) x [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    fn out_of_bounds(&self, p: Point) -> GridError {
        GridError::OutOfBounds {
            point: p,
            width: self.width,
            height: self.height,
        }
    }

    /// The cell at `p`; out of range is a [`GridError::OutOfBounds`].
    pub fn get(&self, p: Point) -> Result<&T, GridError> {
        match self.index(p) {
            Some(i) => Ok(&self.cells[i]),
            None => Err(self.out_of_bounds(p)),
        }
    }

    pub fn get_mut(&mut self, p: Point) -> Result<&mut T, GridError> {
        match self.index(p) {
            Some(i) => Ok(&mut self.cells[i]),
            None => Err(self.out_of_bounds(p)),
        }
    }

    /// Coordinate form of [`get`](Grid::get).
    #[inline]
    pub fn at(&self, x: i32, y: i32) -> Result<&T, GridError> {
        self.get(Point::new(x, y))
    }

    /// Like [`get`](Grid::get) but returns `None` out of range, for callers
    /// that pre-filter camera-relative coordinates.
    #[inline]
    pub fn try_get(&self, p: Point) -> Option<&T> {
        self.index(p).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn try_get_mut(&mut self, p: Point) -> Option<&mut T> {
        self.index(p).map(|i| &mut self.cells[i])
    }

    /// Replace the cell at `p`.
    pub fn set(&mut self, p: Point, value: T) -> Result<(), GridError> {
        *self.get_mut(p)? = value;
        Ok(())
    }

    /// Make every cell a distinct clone of `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.cells.fill(value);
    }

    /// Visit every cell mutably in row-major order.
    pub fn for_each(&mut self, mut f: impl FnMut(Point, &mut T)) {
        let w = self.width.max(1);
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let i = i as i32;
            f(Point::new(i % w, i / w), cell);
        }
    }

    /// Row-major iterator over `(Point, &T)` pairs.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Point, &T)> + '_ {
        self.bounds().iter().zip(self.cells.iter())
    }
}

/// Unchecked wire form of a [`Grid`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid<T> {
    cells: Vec<T>,
    width: i32,
    height: i32,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = GridError;

    /// An unsized grid comes back unsized; anything else needs positive
    /// dimensions and exactly `width * height` cells.
    fn try_from(raw: RawGrid<T>) -> Result<Self, GridError> {
        if raw.width == 0 && raw.height == 0 && raw.cells.is_empty() {
            return Ok(Self::new());
        }
        check_dimensions(raw.width, raw.height)?;
        let expected = (raw.width as usize) * (raw.height as usize);
        if raw.cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            cells: raw.cells,
            width: raw.width,
            height: raw.height,
        })
    }
}

fn check_dimensions(width: i32, height: i32) -> Result<(), GridError> {
    if width <= 0 || height <= 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_dimensions_populates_every_cell() {
        for (w, h) in [(1, 1), (3, 7), (10, 10), (64, 2)] {
            let mut g: Grid<u8> = Grid::new();
            g.set_dimensions(w, h).unwrap();
            assert_eq!(g.size(), Point::new(w, h));
            assert_eq!(g.iter().count(), (w * h) as usize);
        }
    }

    #[test]
    fn set_dimensions_only_once() {
        let mut g: Grid<u8> = Grid::new();
        g.set_dimensions(2, 2).unwrap();
        assert_eq!(g.set_dimensions(3, 3), Err(GridError::AlreadySized));
        assert_eq!(g.size(), Point::new(2, 2));
    }

    #[test]
    fn rejects_empty_dimensions() {
        let mut g: Grid<u8> = Grid::new();
        assert_eq!(
            g.set_dimensions(0, 4),
            Err(GridError::InvalidDimensions { width: 0, height: 4 })
        );
        assert!(Grid::sized(-1, 1, 0u8).is_err());
    }

    #[test]
    fn get_out_of_range_is_an_error() {
        let g = Grid::sized(4, 3, 0u8).unwrap();
        assert!(g.get(Point::new(3, 2)).is_ok());
        assert_eq!(
            g.at(4, 0),
            Err(GridError::OutOfBounds {
                point: Point::new(4, 0),
                width: 4,
                height: 3
            })
        );
        assert!(g.at(0, -1).is_err());
        assert!(g.try_get(Point::new(0, 3)).is_none());
    }

    #[test]
    fn set_and_fill() {
        let mut g = Grid::sized(3, 2, '.').unwrap();
        g.set(Point::new(2, 1), '#').unwrap();
        assert_eq!(g.at(2, 1), Ok(&'#'));
        assert!(g.set(Point::new(3, 0), '#').is_err());
        g.fill('x');
        assert!(g.iter().all(|(_, c)| *c == 'x'));
    }

    #[test]
    fn fill_clones_are_distinct() {
        let mut g = Grid::sized(2, 1, Vec::<u8>::new()).unwrap();
        g.fill(vec![1]);
        g.get_mut(Point::new(0, 0)).unwrap().push(2);
        assert_eq!(g.at(0, 0).unwrap(), &vec![1, 2]);
        assert_eq!(g.at(1, 0).unwrap(), &vec![1]);
    }

    #[test]
    fn for_each_is_row_major() {
        let mut g = Grid::sized(3, 2, 0i32).unwrap();
        let mut order = Vec::new();
        g.for_each(|p, c| {
            order.push(p);
            *c = p.y * 10 + p.x;
        });
        assert_eq!(order, Range::new(0, 0, 3, 2).iter().collect::<Vec<_>>());
        assert_eq!(g.at(2, 1), Ok(&12));
    }

    #[test]
    fn iter_pairs_points_with_cells() {
        let mut g = Grid::sized(2, 2, 0u8).unwrap();
        g.set(Point::new(1, 0), 5).unwrap();
        let items: Vec<_> = g.iter().collect();
        assert_eq!(items[1], (Point::new(1, 0), &5));
    }
}
