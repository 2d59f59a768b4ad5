//! Rooms of the graph generator

use serde::{Deserialize, Serialize};

use crate::geometry::{Cell, CellRect};
use crate::grid::{Tile, TileMap};

/// Stable handle of a room within one generated layout
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct RoomId(pub usize);

impl core::fmt::Display for RoomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// A room and the empty margin reserved around it
///
/// `bounds` includes the padding. Inside the padding the room is drawn as
/// floor, except for the top `wall_height` rows which are wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub bounds: CellRect,
}

impl Room {
    pub fn new(id: RoomId, bounds: CellRect) -> Self {
        Self { id, bounds }
    }

    /// Bounds without padding: the cells the room draws into
    pub fn unpadded(&self, padding: i32) -> CellRect {
        self.bounds.inset(padding)
    }

    /// Walkable part of the room
    pub fn floor(&self, padding: i32, wall_height: i32) -> CellRect {
        self.unpadded(padding).shrink(0, 0, 0, wall_height)
    }

    /// Central floor cell, used for start and finish markers
    pub fn floor_center(&self, padding: i32, wall_height: i32) -> Cell {
        self.floor(padding, wall_height).center()
    }

    pub fn translate(&mut self, offset: Cell) {
        self.bounds = self.bounds.translated(offset);
    }

    /// Draw floor and top wall rows; the padding is left untouched
    pub fn render(&self, grid: &mut dyn TileMap, padding: i32, wall_height: i32) {
        let floor = self.floor(padding, wall_height);
        for cell in self.unpadded(padding).cells() {
            let tile = if floor.contains(cell) { Tile::Floor } else { Tile::Wall };
            grid.set_tile(cell, tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_bounds() {
        let room = Room::new(RoomId(0), CellRect::new(0, 0, 5, 6));
        assert_eq!(room.unpadded(1), CellRect::new(1, 1, 4, 5));
        assert_eq!(room.floor(1, 1), CellRect::new(1, 1, 4, 4));
        assert_eq!(room.floor_center(1, 1), Cell::new(2, 2));
        assert_eq!(room.floor(0, 0), room.bounds);
    }

    #[test]
    fn test_translate() {
        let mut room = Room::new(RoomId(3), CellRect::new(0, 0, 5, 5));
        room.translate(Cell::new(-2, 4));
        assert_eq!(room.bounds, CellRect::new(-2, 4, 3, 9));
        assert_eq!(room.id.to_string(), "room#3");
    }

    #[test]
    fn test_render_draws_wall_on_top() {
        use crate::grid::TileGrid;

        let mut grid = TileGrid::new(6, 6);
        let room = Room::new(RoomId(0), CellRect::new(0, 0, 5, 5));
        room.render(&mut grid, 1, 1);
        assert_eq!(grid.tile(Cell::new(0, 0)), Some(Tile::Empty));
        assert_eq!(grid.tile(Cell::new(1, 1)), Some(Tile::Floor));
        assert_eq!(grid.tile(Cell::new(3, 2)), Some(Tile::Floor));
        assert_eq!(grid.tile(Cell::new(2, 3)), Some(Tile::Wall));
        assert_eq!(grid.count(Tile::Floor), 6);
        assert_eq!(grid.count(Tile::Wall), 3);
    }
}
