//! Result of one generator run

use serde::Serialize;

use crate::dungeon::{Corridor, LayoutReport, Room, RoomId};
use crate::geometry::Cell;
use crate::graph::DistanceGraph;
use crate::grid::{TileMap, WorldPos};
use crate::props::PropPlacement;

/// Everything a generator decided while filling the grid
///
/// Generators that have no notion of rooms leave the room fields empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    /// Surviving rooms
    pub rooms: Vec<Room>,
    /// Room connectivity, one edge per carved corridor
    pub graph: DistanceGraph<RoomId>,
    /// Rooms from start to finish along the longest backbone path
    pub critical_path: Vec<RoomId>,
    pub corridors: Vec<Corridor>,
    /// Room pairs no corridor could be carved between
    pub unpathable: Vec<(RoomId, RoomId)>,
    /// Rooms removed because they could not be reached from the start
    pub pruned: Vec<RoomId>,
    pub start: Option<Cell>,
    pub finish: Option<Cell>,
    pub props: Vec<PropPlacement>,
    pub report: Option<LayoutReport>,
}

impl Layout {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    /// World-space centre of the start cell
    pub fn starting_position(&self, grid: &dyn TileMap) -> Option<WorldPos> {
        self.start.map(|cell| grid.cell_center_to_world(cell))
    }

    /// World-space centre of the finish cell
    pub fn finish_position(&self, grid: &dyn TileMap) -> Option<WorldPos> {
        self.finish.map(|cell| grid.cell_center_to_world(cell))
    }
}
