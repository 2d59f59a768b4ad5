//! Corridor search between two rendered rooms
//!
//! A best-first search over grid cells from every floor cell of the source
//! room to any floor cell of the destination room. Scores are compared after
//! integer division by the straightness factor, so small detours tie with the
//! direct route and the tie-break toward straight moves takes over. A cell is
//! only entered if its 3x3 neighbourhood keeps clear of everything but the
//! two rooms, which keeps corridors from touching each other or other rooms.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use super::room::{Room, RoomId};
use crate::geometry::{Cell, CellRect, Direction};
use crate::grid::{Tile, TileMap};

/// A carved path between two rooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub from: RoomId,
    pub to: RoomId,
    /// From a floor cell of `from` to a floor cell of `to`
    pub cells: Vec<Cell>,
}

/// Room geometry the search needs
#[derive(Debug, Clone, Copy)]
pub struct CorridorSpec {
    pub padding: i32,
    pub wall_height: i32,
    pub straightness: i32,
}

struct Search<'a> {
    grid: &'a dyn TileMap,
    /// Cells the room owns, walls included
    src_area: CellRect,
    dst_area: CellRect,
    src_floor: CellRect,
    dst_floor: CellRect,
    straightness: i32,
    open: Vec<Cell>,
    in_open: HashSet<Cell>,
    g_score: HashMap<Cell, i32>,
    f_score: HashMap<Cell, i32>,
    came_from: HashMap<Cell, Cell>,
}

impl Search<'_> {
    fn heuristic(&self, cell: Cell) -> i32 {
        self.dst_floor.chebyshev_distance(cell)
    }

    fn push(&mut self, cell: Cell) {
        if self.in_open.insert(cell) {
            self.open.push(cell);
        }
    }

    /// True if the last two moves into `cell` point the same way
    fn arrived_straight(&self, cell: Cell) -> bool {
        let Some(&p1) = self.came_from.get(&cell) else {
            return true;
        };
        let Some(&p2) = self.came_from.get(&p1) else {
            return true;
        };
        cell - p1 == p1 - p2
    }

    /// Remove and return the best open cell
    fn pop(&mut self) -> Option<Cell> {
        let s = self.straightness;
        let (index, _) = self
            .open
            .iter()
            .enumerate()
            .map(|(i, &cell)| {
                let f = self.f_score.get(&cell).copied().unwrap_or(i32::MAX);
                (i, (f / s, !self.arrived_straight(cell)))
            })
            // later entries win ties
            .min_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))?;
        let cell = self.open.remove(index);
        self.in_open.remove(&cell);
        Some(cell)
    }

    fn blocked(&self, cell: Cell, dir: Direction) -> bool {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let x = cell + Cell::new(dx, dy);
                let orthogonal = dx == 0 || dy == 0;
                let tile = self.grid.tile(x);
                let is_wall = tile == Some(Tile::Wall);
                let in_src = self.src_area.contains(x);
                let in_dst = self.dst_area.contains(x);
                if is_wall && orthogonal && in_src && dir != Direction::Up {
                    return true;
                }
                if is_wall && orthogonal && in_dst && dir != Direction::Down {
                    return true;
                }
                if !in_src && !in_dst && tile != Some(Tile::Empty) {
                    return true;
                }
            }
        }
        false
    }

    fn reconstruct(&self, mut cell: Cell) -> Vec<Cell> {
        let mut path = vec![cell];
        while !self.src_floor.contains(cell) {
            let Some(&prev) = self.came_from.get(&cell) else {
                break;
            };
            path.push(prev);
            cell = prev;
        }
        path.reverse();
        path
    }

    fn run(mut self) -> Option<Vec<Cell>> {
        for cell in self.src_floor.cells() {
            self.g_score.insert(cell, 0);
            self.f_score.insert(cell, self.heuristic(cell));
            self.push(cell);
        }

        let s = self.straightness;
        while let Some(current) = self.pop() {
            if self.dst_floor.contains(current) {
                return Some(self.reconstruct(current));
            }
            let g_current = self.g_score.get(&current).copied().unwrap_or(0);
            for dir in Direction::ALL {
                let next = current.step(dir);
                if !self.grid.contains(next) || self.blocked(next, dir) {
                    continue;
                }
                let tentative = g_current + 1;
                let improves = match self.g_score.get(&next) {
                    Some(&best) => tentative / s < best / s,
                    None => true,
                };
                if improves {
                    self.came_from.insert(next, current);
                    self.g_score.insert(next, tentative);
                    self.f_score.insert(next, tentative + self.heuristic(next));
                    self.push(next);
                }
            }
        }
        None
    }
}

/// Find a corridor from `src` to `dst` without touching the grid
///
/// Both rooms must already be rendered. Returns None when no path exists.
pub fn search_corridor(
    grid: &dyn TileMap,
    src: &Room,
    dst: &Room,
    spec: CorridorSpec,
) -> Option<Vec<Cell>> {
    let search = Search {
        grid,
        src_area: src.unpadded(spec.padding),
        dst_area: dst.unpadded(spec.padding),
        src_floor: src.floor(spec.padding, spec.wall_height),
        dst_floor: dst.floor(spec.padding, spec.wall_height),
        straightness: spec.straightness.max(1),
        open: Vec::new(),
        in_open: HashSet::new(),
        g_score: HashMap::new(),
        f_score: HashMap::new(),
        came_from: HashMap::new(),
    };
    search.run()
}

/// Search a corridor and paint it as floor
pub fn carve_corridor(
    grid: &mut dyn TileMap,
    src: &Room,
    dst: &Room,
    spec: CorridorSpec,
) -> Option<Corridor> {
    let cells = search_corridor(grid, src, dst, spec)?;
    for &cell in &cells {
        grid.set_tile(cell, Tile::Floor);
    }
    Some(Corridor {
        from: src.id,
        to: dst.id,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;

    const SPEC: CorridorSpec = CorridorSpec {
        padding: 1,
        wall_height: 1,
        straightness: 4,
    };

    fn two_rooms() -> (TileGrid, Room, Room) {
        let mut grid = TileGrid::new(30, 20);
        let a = Room::new(RoomId(0), CellRect::new(2, 2, 9, 9));
        let b = Room::new(RoomId(1), CellRect::new(14, 2, 21, 9));
        a.render(&mut grid, SPEC.padding, SPEC.wall_height);
        b.render(&mut grid, SPEC.padding, SPEC.wall_height);
        (grid, a, b)
    }

    fn assert_connected_path(path: &[Cell]) {
        for pair in path.windows(2) {
            let step = pair[1] - pair[0];
            assert!(Direction::from_offset(step).is_some(), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_corridor_between_side_by_side_rooms() {
        let (mut grid, a, b) = two_rooms();
        let corridor = carve_corridor(&mut grid, &a, &b, SPEC).unwrap();
        let cells = &corridor.cells;
        assert!(a.floor(1, 1).contains(cells[0]));
        assert!(b.floor(1, 1).contains(*cells.last().unwrap()));
        assert_connected_path(cells);
        assert!(cells.iter().all(|&c| grid.tile(c) == Some(Tile::Floor)));
        assert_eq!((corridor.from, corridor.to), (RoomId(0), RoomId(1)));
    }

    #[test]
    fn test_search_does_not_paint() {
        let (grid, a, b) = two_rooms();
        let before = grid.clone();
        assert!(search_corridor(&grid, &a, &b, SPEC).is_some());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_walled_off_room_is_unreachable() {
        let (mut grid, a, b) = two_rooms();
        for cell in b.bounds.cells() {
            if !b.unpadded(1).contains(cell) {
                grid.set_tile(cell, Tile::Wall);
            }
        }
        assert_eq!(search_corridor(&grid, &a, &b, SPEC), None);
    }

    #[test]
    fn test_vertical_neighbours_enter_from_above() {
        let mut grid = TileGrid::new(20, 30);
        let low = Room::new(RoomId(0), CellRect::new(5, 2, 12, 9));
        let high = Room::new(RoomId(1), CellRect::new(5, 15, 12, 22));
        low.render(&mut grid, 1, 1);
        high.render(&mut grid, 1, 1);
        let path = search_corridor(&grid, &high, &low, SPEC).unwrap();
        assert!(high.floor(1, 1).contains(path[0]));
        assert!(low.floor(1, 1).contains(*path.last().unwrap()));
        assert_connected_path(&path);
    }
}
