//! Integer grid coordinates and axis directions

use core::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A grid cell coordinate, also used as an integer offset between cells
///
/// `y` grows upward: "up" is `+y`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

/// Offset between two cells
pub type Offset = Cell;

impl Cell {
    pub const ZERO: Cell = Cell { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        self + dir.offset()
    }

    /// Squared euclidean length when used as an offset
    pub fn length_squared(self) -> i64 {
        i64::from(self.x) * i64::from(self.x) + i64::from(self.y) * i64::from(self.y)
    }

    /// Dot product when used as an offset
    pub fn dot(self, other: Cell) -> i64 {
        i64::from(self.x) * i64::from(other.x) + i64::from(self.y) * i64::from(other.y)
    }

    /// True if both offsets are non-zero and point the same way
    pub fn same_direction(self, other: Cell) -> bool {
        let prod = self.dot(other);
        prod > 0 && prod * prod == self.length_squared() * other.length_squared()
    }

    /// The 4 orthogonal neighbors, in [`Direction::ALL`] order
    pub fn neighbors(self) -> [Cell; 4] {
        Direction::ALL.map(|dir| self.step(dir))
    }

    /// The 8 surrounding cells
    pub fn neighbors8(self) -> [Cell; 8] {
        [
            self + Cell::new(-1, -1),
            self + Cell::new(0, -1),
            self + Cell::new(1, -1),
            self + Cell::new(-1, 0),
            self + Cell::new(1, 0),
            self + Cell::new(-1, 1),
            self + Cell::new(0, 1),
            self + Cell::new(1, 1),
        ]
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Cell {
    fn add_assign(&mut self, rhs: Cell) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, rhs: Cell) -> Cell {
        Cell::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Cell {
    type Output = Cell;

    fn neg(self) -> Cell {
        Cell::new(-self.x, -self.y)
    }
}

impl Mul<i32> for Cell {
    type Output = Cell;

    fn mul(self, rhs: i32) -> Cell {
        Cell::new(self.x * rhs, self.y * rhs)
    }
}

impl core::fmt::Display for Cell {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Down,
    Right,
    Up,
}

impl Direction {
    /// All directions, in the order searches expand them
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];

    /// Unit offset of one step
    pub const fn offset(self) -> Cell {
        match self {
            Direction::Left => Cell::new(-1, 0),
            Direction::Down => Cell::new(0, -1),
            Direction::Right => Cell::new(1, 0),
            Direction::Up => Cell::new(0, 1),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Direction of a unit offset, if it is one
    pub fn from_offset(offset: Cell) -> Option<Direction> {
        Direction::ALL.into_iter().find(|dir| dir.offset() == offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_and_opposite() {
        let c = Cell::new(3, 4);
        for dir in Direction::ALL {
            assert_eq!(c.step(dir).step(dir.opposite()), c);
            assert_eq!(Direction::from_offset(dir.offset()), Some(dir));
        }
        assert_eq!(c.step(Direction::Up), Cell::new(3, 5));
        assert_eq!(Direction::from_offset(Cell::new(2, 0)), None);
    }

    #[test]
    fn test_same_direction() {
        assert!(Cell::new(3, 0).same_direction(Cell::new(1, 0)));
        assert!(!Cell::new(3, 0).same_direction(Cell::new(-1, 0)));
        assert!(!Cell::new(3, 0).same_direction(Cell::new(0, 2)));
        assert!(!Cell::ZERO.same_direction(Cell::new(0, 2)));
    }

    #[test]
    fn test_neighbors8_excludes_center() {
        let c = Cell::new(0, 0);
        let around = c.neighbors8();
        assert!(!around.contains(&c));
        assert!(around.iter().all(|n| (n.x - c.x).abs() <= 1 && (n.y - c.y).abs() <= 1));
    }
}
