//! Random walk room graph
//!
//! A walker hops between rooms. Each step leaves the current room through a
//! random point on its floor edge, then either follows a corridor already
//! heading that way, joins whatever a new corridor runs into, or opens a new
//! room at the corridor's end. Collisions are exact rectangle tests on the
//! corridor segments; nothing is carved until the walk is over.

use tracing::{debug, info};

use crate::config::RandomWalkConfig;
use crate::dungeon::{Corridor, Room, RoomId};
use crate::error::GenerateError;
use crate::generator::MazeGenerator;
use crate::geometry::{Cell, CellRect, Direction, Offset};
use crate::graph::DistanceGraph;
use crate::grid::{Tile, TileMap};
use crate::layout::Layout;
use crate::props::PropSink;
use crate::rng::DungeonRng;

/// Rooms and straight corridors grown by a random walk
#[derive(Debug, Clone, Default)]
pub struct RandomWalkGenerator {
    config: RandomWalkConfig,
}

impl RandomWalkGenerator {
    pub fn new(config: RandomWalkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RandomWalkConfig {
        &self.config
    }
}

#[derive(Debug, Clone)]
struct WalkRoom {
    /// Floor plus wall rows on top
    bounds: CellRect,
    floor: CellRect,
    /// Indices of corridors leaving this room
    outgoing: Vec<usize>,
}

/// A corridor as a start cell and a chain of straight segments
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hall {
    from: usize,
    to: usize,
    start: Cell,
    segments: Vec<Offset>,
}

impl Hall {
    fn end(&self) -> Cell {
        self.segments.iter().fold(self.start, |pos, &seg| pos + seg)
    }

    /// The same corridor walked from the other end
    fn reversed(&self) -> Hall {
        Hall {
            from: self.to,
            to: self.from,
            start: self.end(),
            segments: self.segments.iter().rev().map(|&seg| -seg).collect(),
        }
    }

    fn pieces(&self) -> Vec<CellRect> {
        segment_rects(self.start, &self.segments)
    }

    fn cells(&self) -> Vec<Cell> {
        let mut pos = self.start;
        let mut cells = vec![pos];
        for &seg in &self.segments {
            let step = unit(seg);
            for _ in 0..seg.x.abs().max(seg.y.abs()) {
                pos += step;
                cells.push(pos);
            }
        }
        cells
    }

    fn length(&self) -> f64 {
        self.segments
            .iter()
            .map(|seg| f64::from(seg.x.abs() + seg.y.abs()))
            .sum()
    }
}

fn unit(offset: Offset) -> Offset {
    Cell::new(offset.x.signum(), offset.y.signum())
}

/// Rectangles swept by consecutive segments starting at `start`
fn segment_rects(start: Cell, segments: &[Offset]) -> Vec<CellRect> {
    let mut pos = start;
    segments
        .iter()
        .map(|&seg| {
            let rect = CellRect::from_segment(pos, seg);
            pos += seg;
            rect
        })
        .collect()
}

fn pieces_overlap(a: &[CellRect], b: &[CellRect]) -> bool {
    let (Some(box_a), Some(box_b)) = (
        a.iter().copied().reduce(|acc, r| acc.union(&r)),
        b.iter().copied().reduce(|acc, r| acc.union(&r)),
    ) else {
        return false;
    };
    if !box_a.overlaps(&box_b) {
        return false;
    }
    a.iter().any(|x| b.iter().any(|y| x.overlaps(y)))
}

struct Walk<'a> {
    config: &'a RandomWalkConfig,
    rooms: Vec<WalkRoom>,
    halls: Vec<Hall>,
}

impl<'a> Walk<'a> {
    fn new(config: &'a RandomWalkConfig) -> Self {
        Self {
            config,
            rooms: Vec::new(),
            halls: Vec::new(),
        }
    }

    /// Room whose floor contains `at`, entered while moving in `heading`
    ///
    /// The room extends away from the entry cell; with no heading `at` lands
    /// somewhere inside.
    fn random_room(&self, rng: &mut DungeonRng, at: Cell, heading: Option<Direction>) -> CellRect {
        let c = self.config;
        let width = rng.range_inclusive(c.min_room_size, c.max_room_size);
        let height = rng.range_inclusive(c.min_room_size, c.max_room_size);
        let (mut x, mut y) = (at.x, at.y);
        match heading {
            Some(Direction::Right) => y -= rng.range(1, height - 1),
            Some(Direction::Left) => {
                x -= width - 1;
                y -= rng.range(1, height - 1);
            }
            Some(Direction::Up) => x -= rng.range(1, width - 1),
            Some(Direction::Down) => {
                x -= rng.range(1, width - 1);
                y -= height - 1;
            }
            None => {
                x -= rng.range(1, width - 1);
                y -= rng.range(1, height - 1);
            }
        }
        let bounds = CellRect::from_size(x, y, width, height + c.wall_height);
        debug!(%at, ?heading, %bounds, "random room");
        bounds
    }

    fn add_room(&mut self, bounds: CellRect) -> usize {
        self.rooms.push(WalkRoom {
            bounds,
            floor: bounds.shrink(0, 0, 0, self.config.wall_height),
            outgoing: Vec::new(),
        });
        self.rooms.len() - 1
    }

    fn connect_two_way(&mut self, from: usize, start: Cell, segments: Vec<Offset>, to: usize) {
        let forward = Hall {
            from,
            to,
            start,
            segments,
        };
        let backward = forward.reversed();
        for hall in [forward, backward] {
            let owner = hall.from;
            self.halls.push(hall);
            let index = self.halls.len() - 1;
            self.rooms[owner].outgoing.push(index);
        }
    }

    /// Existing corridor crossed by any of `pieces`, in room order
    fn find_hall(&self, pieces: &[CellRect]) -> Option<&Hall> {
        self.rooms
            .iter()
            .flat_map(|room| room.outgoing.iter().map(|&h| &self.halls[h]))
            .find(|hall| pieces_overlap(pieces, &hall.pieces()))
    }

    /// First room other than `exclude` that the segments run into
    ///
    /// Returns the room and the segments cut short at the first cell inside it.
    fn find_room_along(
        &self,
        exclude: usize,
        start: Cell,
        segments: &[Offset],
    ) -> Option<(usize, Vec<Offset>)> {
        let mut pos = start;
        let mut path = Vec::new();
        for &seg in segments {
            let piece = CellRect::from_segment(pos, seg);
            let hit = self
                .rooms
                .iter()
                .enumerate()
                .find(|(i, room)| *i != exclude && room.bounds.overlaps(&piece));
            if let Some((index, room)) = hit {
                let step = unit(seg);
                let length = seg.x.abs().max(seg.y.abs());
                let reach = (0..=length)
                    .map(|k| step * k)
                    .find(|&offset| room.bounds.contains(pos + offset))
                    .unwrap_or(seg);
                if reach != Cell::ZERO {
                    path.push(reach);
                }
                return Some((index, path));
            }
            path.push(seg);
            pos += seg;
        }
        None
    }

    fn random_exit(&self, rng: &mut DungeonRng, floor: CellRect) -> (Cell, Direction) {
        if rng.one_in(2) {
            let dir = if rng.one_in(2) { Direction::Right } else { Direction::Left };
            let x = if dir == Direction::Right { floor.x_max - 1 } else { floor.x_min };
            let y = rng.range(floor.y_min + 1, floor.y_max - 1);
            (Cell::new(x, y), dir)
        } else {
            let dir = if rng.one_in(2) { Direction::Up } else { Direction::Down };
            let x = rng.range(floor.x_min + 1, floor.x_max - 1);
            let y = if dir == Direction::Up { floor.y_max - 1 } else { floor.y_min };
            (Cell::new(x, y), dir)
        }
    }

    /// One walk step from room `current`; returns the room the walker ends in
    fn step(&mut self, rng: &mut DungeonRng, current: usize) -> usize {
        let (start, exit) = self.random_exit(rng, self.rooms[current].floor);

        let existing = self.rooms[current].outgoing.iter().map(|&h| &self.halls[h]).find(|hall| {
            hall.segments
                .first()
                .is_some_and(|&seg| seg.same_direction(exit.offset()))
        });
        if let Some(hall) = existing {
            debug!(room = current, "following existing corridor");
            return hall.to;
        }

        let mut heading = exit;
        let mut segments = Vec::with_capacity(self.config.corridor_segments);
        for i in 0..self.config.corridor_segments {
            if i > 0 {
                let turns: Vec<Direction> = Direction::ALL
                    .into_iter()
                    .filter(|&dir| dir != heading.opposite())
                    .collect();
                if let Some(&dir) = rng.choose(&turns) {
                    heading = dir;
                }
            }
            let length =
                rng.range_inclusive(self.config.min_corridor_length, self.config.max_corridor_length);
            segments.push(heading.offset() * length);
        }

        if let Some(hall) = self.find_hall(&segment_rects(start, &segments)) {
            debug!(room = current, "corridor crosses another one, following it");
            return hall.to;
        }
        if let Some((room, trimmed)) = self.find_room_along(current, start, &segments) {
            debug!(room = current, target = room, "corridor runs into a room");
            self.connect_two_way(current, start, trimmed, room);
            return room;
        }

        let end = segments.iter().fold(start, |pos, &seg| pos + seg);
        let bounds = self.random_room(rng, end, Some(heading));
        let grown = bounds.inset(-1);
        if let Some(room) = self.rooms.iter().position(|r| r.bounds.overlaps(&grown)) {
            debug!(room = current, target = room, "new room would collide, jumping");
            return room;
        }

        let room = self.add_room(bounds);
        self.connect_two_way(current, start, segments, room);
        debug!(room = current, target = room, "new corridor and room");
        room
    }

    fn render(&self, grid: &mut dyn TileMap) {
        for room in &self.rooms {
            for cell in room.bounds.cells() {
                let tile = if room.floor.contains(cell) { Tile::Floor } else { Tile::Wall };
                grid.set_tile(cell, tile);
            }
        }
        for hall in self.rooms.iter().flat_map(|room| room.outgoing.iter().map(|&h| &self.halls[h])) {
            for cell in hall.cells() {
                grid.set_tile(cell, Tile::Floor);
            }
        }
    }

    fn into_layout(self) -> Layout {
        let mut graph = DistanceGraph::new();
        let rooms: Vec<Room> = self
            .rooms
            .iter()
            .enumerate()
            .map(|(i, room)| Room::new(RoomId(i), room.bounds))
            .collect();
        for room in &rooms {
            graph.add_node(room.id);
        }
        let mut corridors = Vec::new();
        for hall in self.rooms.iter().flat_map(|room| room.outgoing.iter().map(|&h| &self.halls[h])) {
            let (from, to) = (RoomId(hall.from), RoomId(hall.to));
            graph.add_directed(from, to, hall.length());
            corridors.push(Corridor {
                from,
                to,
                cells: hall.cells(),
            });
        }
        let start = self.rooms.first().map(|room| room.floor.center());
        Layout {
            rooms,
            graph,
            corridors,
            start,
            ..Layout::default()
        }
    }
}

impl MazeGenerator for RandomWalkGenerator {
    fn name(&self) -> &'static str {
        "random_walk"
    }

    fn generate(
        &mut self,
        grid: &mut dyn TileMap,
        rng: &mut DungeonRng,
        _props: &mut dyn PropSink,
    ) -> Result<Layout, GenerateError> {
        self.config.validate()?;
        self.clear(grid, Tile::Empty);

        let mut walk = Walk::new(&self.config);
        let first = walk.random_room(rng, grid.bounds().center(), None);
        let mut current = walk.add_room(first);
        for _ in 0..self.config.steps {
            current = walk.step(rng, current);
        }
        walk.render(grid);

        info!(
            seed = rng.seed(),
            rooms = walk.rooms.len(),
            corridors = walk.halls.len(),
            "random walk layout generated"
        );
        Ok(walk.into_layout())
    }
}
