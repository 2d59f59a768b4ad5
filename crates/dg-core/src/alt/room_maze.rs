//! Room maze
//!
//! Rooms are dropped at random positions, each kept at least `padding` cells
//! from the others, and a room that finds no free spot is skipped. Every pair
//! of rooms whose floors lie within `connection_distance` of each other is
//! joined by the shortest four-connected path between the floor centres that
//! stays clear of the other rooms' padding and of earlier corridors.

use hashbrown::HashSet;
use tracing::{debug, info, warn};

use crate::config::RoomMazeConfig;
use crate::dungeon::{Corridor, Room, RoomId};
use crate::error::GenerateError;
use crate::generator::MazeGenerator;
use crate::geometry::{Cell, CellRect};
use crate::graph::DistanceGraph;
use crate::grid::{Tile, TileMap};
use crate::layout::Layout;
use crate::props::PropSink;
use crate::rng::DungeonRng;

/// Randomly placed rooms joined by A* corridors
#[derive(Debug, Clone, Default)]
pub struct RoomMazeGenerator {
    config: RoomMazeConfig,
}

impl RoomMazeGenerator {
    pub fn new(config: RoomMazeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoomMazeConfig {
        &self.config
    }

    /// Floor plus wall rows, placed so that its padding fits in `bounds`
    fn random_room(&self, bounds: &CellRect, rng: &mut DungeonRng) -> CellRect {
        let c = &self.config;
        let width = rng.range_inclusive(c.min_width, c.max_width);
        let height = rng.range_inclusive(c.min_height, c.max_height) + c.wall_height;
        let x = rng.range(bounds.x_min + c.padding, bounds.x_max - c.padding - width + 1);
        let y = rng.range(bounds.y_min + c.padding, bounds.y_max - c.padding - height + 1);
        CellRect::from_size(x, y, width, height)
    }

    fn place_rooms(&self, bounds: &CellRect, rng: &mut DungeonRng) -> Vec<Room> {
        let padding = self.config.padding;
        let mut rooms: Vec<Room> = Vec::new();
        for _ in 0..self.config.room_count {
            let placed = (0..self.config.max_tries).find_map(|_| {
                let padded = self.random_room(bounds, rng).inset(-padding);
                let free = !rooms.iter().any(|room| room.unpadded(padding).overlaps(&padded));
                free.then_some(padded)
            });
            match placed {
                Some(padded) => {
                    let room = Room::new(RoomId(rooms.len()), padded);
                    debug!(room = %room.unpadded(padding), "room placed");
                    rooms.push(room);
                }
                None => warn!(tries = self.config.max_tries, "skipped a room"),
            }
        }
        rooms
    }

    /// Room pairs close enough to be joined, in carving order
    fn neighbour_pairs(&self, rooms: &[Room]) -> Vec<(usize, usize)> {
        let (padding, wall) = (self.config.padding, self.config.wall_height);
        let mut pairs = Vec::new();
        for (i, a) in rooms.iter().enumerate() {
            for (j, b) in rooms.iter().enumerate().skip(i + 1) {
                let gap = gap_distance(&a.floor(padding, wall), &b.floor(padding, wall));
                if gap <= self.config.connection_distance {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Cells a corridor between `a` and `b` may not enter
    ///
    /// Earlier corridors stay blocked except where they run inside `a` or
    /// `b`, so a room centre already used by another corridor stays reachable.
    fn blocked_cells(
        &self,
        rooms: &[Room],
        corridors: &[Corridor],
        a: &Room,
        b: &Room,
    ) -> HashSet<Cell> {
        let padding = self.config.padding;
        let mut blocked: HashSet<Cell> = rooms
            .iter()
            .filter(|room| room.id != a.id && room.id != b.id)
            .flat_map(|room| room.bounds.cells())
            .collect();
        let (a_tiles, b_tiles) = (a.unpadded(padding), b.unpadded(padding));
        blocked.extend(
            corridors
                .iter()
                .flat_map(|corridor| corridor.cells.iter().copied())
                .filter(|&cell| !a_tiles.contains(cell) && !b_tiles.contains(cell)),
        );
        blocked
    }
}

/// Empty cells between two rectangles along x plus those along y
fn gap_distance(a: &CellRect, b: &CellRect) -> i32 {
    let dx = (a.x_min - b.x_max).max(b.x_min - a.x_max).max(0);
    let dy = (a.y_min - b.y_max).max(b.y_min - a.y_max).max(0);
    dx + dy
}

fn manhattan(a: Cell, b: Cell) -> f64 {
    f64::from((a.x - b.x).abs() + (a.y - b.y).abs())
}

/// Four-connected unit-weight graph over the free cells of `bounds`
fn walk_graph(bounds: &CellRect, blocked: &HashSet<Cell>) -> DistanceGraph<Cell> {
    let free = |cell: Cell| bounds.contains(cell) && !blocked.contains(&cell);
    let mut graph = DistanceGraph::new();
    for cell in bounds.cells().filter(|&cell| free(cell)) {
        graph.add_node(cell);
        for next in cell.neighbors().into_iter().filter(|&next| free(next)) {
            graph.add_directed(cell, next, 1.0);
        }
    }
    graph
}

/// Shortest path from `src` to `dst`, both included
fn find_path(
    bounds: &CellRect,
    blocked: &HashSet<Cell>,
    src: Cell,
    dst: Cell,
) -> Option<Vec<Cell>> {
    walk_graph(bounds, blocked).a_star(src, dst, manhattan)
}

impl MazeGenerator for RoomMazeGenerator {
    fn name(&self) -> &'static str {
        "room_maze"
    }

    fn generate(
        &mut self,
        grid: &mut dyn TileMap,
        rng: &mut DungeonRng,
        _props: &mut dyn PropSink,
    ) -> Result<Layout, GenerateError> {
        self.config.validate()?;
        if self.config.room_count == 0 {
            return Err(GenerateError::NoRooms);
        }
        let bounds = grid.bounds();
        let (needed_width, needed_height) = self.config.max_padded_size();
        if needed_width > bounds.width() || needed_height > bounds.height() {
            return Err(GenerateError::GridTooSmall {
                width: bounds.width(),
                height: bounds.height(),
                needed: needed_width.max(needed_height),
            });
        }
        let (padding, wall) = (self.config.padding, self.config.wall_height);

        self.clear(grid, Tile::Empty);
        let rooms = self.place_rooms(&bounds, rng);
        for room in &rooms {
            room.render(grid, padding, wall);
        }

        let mut graph = DistanceGraph::new();
        for room in &rooms {
            graph.add_node(room.id);
        }
        let mut corridors: Vec<Corridor> = Vec::new();
        let mut unpathable = Vec::new();
        for (i, j) in self.neighbour_pairs(&rooms) {
            let (a, b) = (&rooms[i], &rooms[j]);
            let blocked = self.blocked_cells(&rooms, &corridors, a, b);
            let (src, dst) = (a.floor_center(padding, wall), b.floor_center(padding, wall));
            let Some(cells) = find_path(&bounds, &blocked, src, dst) else {
                warn!(from = %a.id, to = %b.id, "unpathable rooms");
                unpathable.push((a.id, b.id));
                continue;
            };
            for &cell in &cells {
                grid.set_tile(cell, Tile::Floor);
            }
            graph.add_directed(a.id, b.id, cells.len().saturating_sub(1) as f64);
            corridors.push(Corridor {
                from: a.id,
                to: b.id,
                cells,
            });
        }

        let start = rooms.first().map(|room| room.floor_center(padding, wall));
        info!(
            seed = rng.seed(),
            rooms = rooms.len(),
            corridors = corridors.len(),
            unpathable = unpathable.len(),
            "room maze generated"
        );
        Ok(Layout {
            rooms,
            graph,
            corridors,
            unpathable,
            start,
            ..Layout::default()
        })
    }
}
