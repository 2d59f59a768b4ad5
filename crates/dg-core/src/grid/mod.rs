//! Tile grid the generators render into
//!
//! Generators only talk to the [`TileMap`] trait. [`TileGrid`] is the
//! in-memory implementation used by the CLI and the tests.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::geometry::{Cell, CellRect, Point};

/// Position in world space
pub type WorldPos = Point;

/// Terrain of one grid cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Tile {
    #[default]
    Empty,
    Floor,
    Wall,
    Start,
    End,
}

impl Tile {
    /// Character used by the ASCII rendering
    pub const fn symbol(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Start => '<',
            Tile::End => '>',
        }
    }

    pub fn from_symbol(c: char) -> Option<Tile> {
        match c {
            ' ' => Some(Tile::Empty),
            '.' => Some(Tile::Floor),
            '#' => Some(Tile::Wall),
            '<' => Some(Tile::Start),
            '>' => Some(Tile::End),
            _ => None,
        }
    }

    /// Check if a walker can stand here
    pub const fn is_walkable(self) -> bool {
        matches!(self, Tile::Floor | Tile::Start | Tile::End)
    }
}

/// A rectangular grid of tiles
pub trait TileMap {
    /// Cells that exist in the grid
    fn bounds(&self) -> CellRect;

    /// Tile at `cell`, or None outside the grid
    fn tile(&self, cell: Cell) -> Option<Tile>;

    /// Set the tile at `cell`; cells outside the grid are ignored
    fn set_tile(&mut self, cell: Cell, tile: Tile);

    fn fill(&mut self, tile: Tile) {
        self.fill_rect(self.bounds(), tile);
    }

    fn fill_rect(&mut self, rect: CellRect, tile: Tile) {
        for cell in rect.cells() {
            self.set_tile(cell, tile);
        }
    }

    fn contains(&self, cell: Cell) -> bool {
        self.bounds().contains(cell)
    }

    /// World-space size of one cell
    fn cell_size(&self) -> Point {
        Point::new(1.0, 1.0)
    }

    /// World position of the bottom-left corner of `cell`
    fn cell_to_world(&self, cell: Cell) -> WorldPos {
        let size = self.cell_size();
        Point::new(f64::from(cell.x) * size.x, f64::from(cell.y) * size.y)
    }

    fn cell_center_to_world(&self, cell: Cell) -> WorldPos {
        self.cell_to_world(cell) + self.cell_size() * 0.5
    }
}

/// In-memory tile grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    bounds: CellRect,
    cell_size: Point,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Grid covering `0..width` by `0..height`, filled with [`Tile::Empty`]
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_bounds(CellRect::from_size(0, 0, width, height))
    }

    pub fn with_bounds(bounds: CellRect) -> Self {
        let bounds = CellRect::new(
            bounds.x_min,
            bounds.y_min,
            bounds.x_max.max(bounds.x_min),
            bounds.y_max.max(bounds.y_min),
        );
        let len = usize::try_from(bounds.area()).unwrap_or(0);
        Self {
            bounds,
            cell_size: Point::new(1.0, 1.0),
            tiles: vec![Tile::Empty; len],
        }
    }

    pub fn with_cell_size(mut self, cell_size: Point) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if !self.bounds.contains(cell) {
            return None;
        }
        let dx = (cell.x - self.bounds.x_min) as usize;
        let dy = (cell.y - self.bounds.y_min) as usize;
        Some(dy * self.bounds.width() as usize + dx)
    }

    /// Number of cells holding `tile`
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// First cell holding `tile`, scanning rows from the bottom
    pub fn find(&self, tile: Tile) -> Option<Cell> {
        self.bounds.cells().find(|&cell| self.tile(cell) == Some(tile))
    }

    /// Rows as text, top row first
    pub fn rows(&self) -> Vec<String> {
        (self.bounds.y_min..self.bounds.y_max)
            .rev()
            .map(|y| {
                (self.bounds.x_min..self.bounds.x_max)
                    .map(|x| self.tile(Cell::new(x, y)).unwrap_or_default().symbol())
                    .collect()
            })
            .collect()
    }
}

impl TileMap for TileGrid {
    fn bounds(&self) -> CellRect {
        self.bounds
    }

    fn tile(&self, cell: Cell) -> Option<Tile> {
        self.index(cell).map(|i| self.tiles[i])
    }

    fn set_tile(&mut self, cell: Cell, tile: Tile) {
        if let Some(i) = self.index(cell) {
            self.tiles[i] = tile;
        }
    }

    fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    fn cell_size(&self) -> Point {
        self.cell_size
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }
}
