//! Integer rectangles on the cell grid
//!
//! Rectangles are half-open: a rectangle covers `x_min..x_max` by
//! `y_min..y_max`, so two rectangles that merely touch do not overlap.

use serde::{Deserialize, Serialize};

use super::{Cell, Point};

/// An axis-aligned rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellRect {
    /// Left x coordinate (inclusive)
    pub x_min: i32,
    /// Bottom y coordinate (inclusive)
    pub y_min: i32,
    /// Right x coordinate (exclusive)
    pub x_max: i32,
    /// Top y coordinate (exclusive)
    pub y_max: i32,
}

impl CellRect {
    /// Create a new rectangle from its half-open extents
    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Create a rectangle from its bottom-left corner and size
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Bounding rectangle of the cells swept by one straight segment
    ///
    /// Both the start cell and the end cell (`start + segment`) are covered.
    pub fn from_segment(start: Cell, segment: Cell) -> Self {
        let end = start + segment;
        Self::new(
            start.x.min(end.x),
            start.y.min(end.y),
            start.x.max(end.x) + 1,
            start.y.max(end.y) + 1,
        )
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        (self.x_max - self.x_min).max(0)
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        (self.y_max - self.y_min).max(0)
    }

    /// Number of cells covered
    pub fn area(&self) -> i64 {
        i64::from(self.width()) * i64::from(self.height())
    }

    /// Check if the rectangle covers no cells
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Check if a cell lies inside the rectangle
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x_min && cell.x < self.x_max && cell.y >= self.y_min && cell.y < self.y_max
    }

    /// Check if this rectangle contains another
    pub fn contains_rect(&self, other: &CellRect) -> bool {
        self.x_min <= other.x_min
            && self.x_max >= other.x_max
            && self.y_min <= other.y_min
            && self.y_max >= other.y_max
    }

    /// Check if this rectangle shares at least one cell with another
    pub fn overlaps(&self, other: &CellRect) -> bool {
        !(self.x_min >= other.x_max
            || self.y_min >= other.y_max
            || self.x_max <= other.x_min
            || self.y_max <= other.y_min)
    }

    /// Calculate the intersection of two rectangles
    pub fn intersection(&self, other: &CellRect) -> Option<CellRect> {
        if !self.overlaps(other) {
            return None;
        }

        Some(CellRect {
            x_min: self.x_min.max(other.x_min),
            y_min: self.y_min.max(other.y_min),
            x_max: self.x_max.min(other.x_max),
            y_max: self.y_max.min(other.y_max),
        })
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &CellRect) -> CellRect {
        CellRect {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// Move each edge inward by its own amount (negative grows)
    pub fn shrink(&self, left: i32, right: i32, bottom: i32, top: i32) -> CellRect {
        CellRect {
            x_min: self.x_min + left,
            x_max: self.x_max - right,
            y_min: self.y_min + bottom,
            y_max: self.y_max - top,
        }
    }

    /// Move every edge inward by `amount` (negative grows)
    pub fn inset(&self, amount: i32) -> CellRect {
        self.shrink(amount, amount, amount, amount)
    }

    /// The same rectangle moved by an offset
    pub fn translated(&self, offset: Cell) -> CellRect {
        CellRect {
            x_min: self.x_min + offset.x,
            x_max: self.x_max + offset.x,
            y_min: self.y_min + offset.y,
            y_max: self.y_max + offset.y,
        }
    }

    /// Central cell, rounding toward the bottom-left
    pub fn center(&self) -> Cell {
        Cell::new(
            (self.x_min + self.x_max - 1).div_euclid(2),
            (self.y_min + self.y_max - 1).div_euclid(2),
        )
    }

    /// Geometric center in continuous coordinates
    pub fn center_point(&self) -> Point {
        Point::new(
            f64::from(self.x_min + self.x_max) / 2.0,
            f64::from(self.y_min + self.y_max) / 2.0,
        )
    }

    /// Iterate every cell, row by row from the bottom
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (x_min, x_max) = (self.x_min, self.x_max);
        (self.y_min..self.y_max).flat_map(move |y| (x_min..x_max).map(move |x| Cell::new(x, y)))
    }

    /// Per-axis distance from a cell to the rectangle (0 inside)
    fn axis_distances(&self, cell: Cell) -> (i32, i32) {
        let dx = if cell.x >= self.x_max {
            cell.x - self.x_max + 1
        } else if cell.x < self.x_min {
            self.x_min - cell.x
        } else {
            0
        };
        let dy = if cell.y >= self.y_max {
            cell.y - self.y_max + 1
        } else if cell.y < self.y_min {
            self.y_min - cell.y
        } else {
            0
        };
        (dx, dy)
    }

    /// Chebyshev (L-infinity) distance from a cell to the rectangle
    pub fn chebyshev_distance(&self, cell: Cell) -> i32 {
        let (dx, dy) = self.axis_distances(cell);
        dx.max(dy)
    }

    /// Manhattan distance from a cell to the rectangle
    pub fn manhattan_distance(&self, cell: Cell) -> i32 {
        let (dx, dy) = self.axis_distances(cell);
        dx + dy
    }
}

impl core::fmt::Display for CellRect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_dimensions() {
        let r = CellRect::new(10, 20, 16, 26);
        assert_eq!(r.width(), 6);
        assert_eq!(r.height(), 6);
        assert_eq!(r.area(), 36);
        assert!(CellRect::new(3, 3, 3, 8).is_empty());
    }

    #[test]
    fn test_rect_contains() {
        let outer = CellRect::new(0, 0, 20, 20);
        let inner = CellRect::new(5, 5, 10, 10);
        let outside = CellRect::new(25, 25, 30, 30);

        assert!(outer.contains_rect(&inner));
        assert!(!inner.contains_rect(&outer));
        assert!(!outer.contains_rect(&outside));
        assert!(outer.contains(Cell::new(0, 0)));
        assert!(!outer.contains(Cell::new(20, 0)));
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let r1 = CellRect::new(0, 0, 10, 10);
        let r2 = CellRect::new(10, 0, 15, 10);
        let r3 = CellRect::new(9, 9, 15, 15);

        assert!(!r1.overlaps(&r2));
        assert!(r1.overlaps(&r3));
        assert!(r3.overlaps(&r1));
        assert_eq!(r1.intersection(&r3), Some(CellRect::new(9, 9, 10, 10)));
        assert_eq!(r1.intersection(&r2), None);
    }

    #[test]
    fn test_inset_and_translate() {
        let r = CellRect::new(0, 0, 7, 7);
        assert_eq!(r.inset(1), CellRect::new(1, 1, 6, 6));
        assert_eq!(r.inset(-1), CellRect::new(-1, -1, 8, 8));
        assert_eq!(r.shrink(0, 0, 0, 2), CellRect::new(0, 0, 7, 5));
        assert_eq!(r.translated(Cell::new(2, -3)), CellRect::new(2, -3, 9, 4));
    }

    #[test]
    fn test_center() {
        assert_eq!(CellRect::new(0, 0, 3, 3).center(), Cell::new(1, 1));
        assert_eq!(CellRect::new(0, 0, 4, 2).center(), Cell::new(1, 0));
        assert_eq!(CellRect::new(-3, -3, 0, 0).center(), Cell::new(-2, -2));
        let p = CellRect::new(0, 0, 4, 2).center_point();
        assert_eq!((p.x, p.y), (2.0, 1.0));
    }

    #[test]
    fn test_cells_iterates_area() {
        let r = CellRect::new(2, 3, 5, 5);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(2, 3));
        assert_eq!(cells[5], Cell::new(4, 4));
        assert!(cells.iter().all(|c| r.contains(*c)));
    }

    #[test]
    fn test_distances() {
        let r = CellRect::new(0, 0, 3, 3);
        assert_eq!(r.chebyshev_distance(Cell::new(1, 1)), 0);
        assert_eq!(r.chebyshev_distance(Cell::new(5, 1)), 3);
        assert_eq!(r.chebyshev_distance(Cell::new(5, -2)), 3);
        assert_eq!(r.manhattan_distance(Cell::new(5, -2)), 5);
        assert_eq!(r.manhattan_distance(Cell::new(-1, 3)), 2);
    }

    #[test]
    fn test_from_segment() {
        let r = CellRect::from_segment(Cell::new(2, 2), Cell::new(-3, 0));
        assert_eq!(r, CellRect::new(-1, 2, 3, 3));
        let r = CellRect::from_segment(Cell::new(0, 0), Cell::new(0, 4));
        assert_eq!(r, CellRect::new(0, 0, 1, 5));
    }
}
