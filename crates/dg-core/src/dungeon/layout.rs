//! Random room placement and overlap resolution
//!
//! Rooms are dropped at random positions, then pushed apart ("jiggled") pass
//! after pass until no padded bounds overlap or the pass cap is reached.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::room::{Room, RoomId};
use crate::config::GraphConfig;
use crate::geometry::{Cell, CellRect};
use crate::rng::DungeonRng;

/// Upper bound on jiggle passes
pub const MAX_JIGGLE_PASSES: usize = 1000;

/// Outcome of [`resolve_overlaps`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Passes run, including the final one that moved nothing
    pub passes: usize,
    pub converged: bool,
}

/// Generate `config.room_count` rooms inside `grid`
///
/// Sizes (padding included) lean toward the middle of the configured range.
/// Positions are uniform over the spots where the room fits in the grid.
pub fn random_rooms(config: &GraphConfig, grid: CellRect, rng: &mut DungeonRng) -> Vec<Room> {
    let lo = config.min_room_size + 2 * config.padding;
    let hi = config.max_room_size + 2 * config.padding;
    (0..config.room_count)
        .map(|i| {
            let width = rng.approx_normal(lo, hi);
            let height = rng.approx_normal(lo, hi);
            let x = rng.range_inclusive(grid.x_min, grid.x_max - width);
            let y = rng.range_inclusive(grid.y_min, grid.y_max - height);
            Room::new(RoomId(i), CellRect::from_size(x, y, width, height))
        })
        .collect()
}

/// Smallest single-axis shift of `mover` that stops it overlapping `anchor`
pub fn separation(anchor: &CellRect, mover: &CellRect) -> Cell {
    if !anchor.overlaps(mover) {
        return Cell::ZERO;
    }
    let right = anchor.x_max - mover.x_min;
    let left = anchor.x_min - mover.x_max;
    let up = anchor.y_max - mover.y_min;
    let down = anchor.y_min - mover.y_max;
    let dx = if right <= -left { right } else { left };
    let dy = if up <= -down { up } else { down };
    if dx.abs() <= dy.abs() {
        Cell::new(dx, 0)
    } else {
        Cell::new(0, dy)
    }
}

/// Shift that brings `rect` back inside `grid`
///
/// A rectangle larger than the grid is aligned to its bottom-left corner.
pub fn clamp_shift(grid: &CellRect, rect: &CellRect) -> Cell {
    let mut shift = Cell::ZERO;
    if rect.x_max > grid.x_max {
        shift.x = grid.x_max - rect.x_max;
    }
    if rect.x_min + shift.x < grid.x_min {
        shift.x = grid.x_min - rect.x_min;
    }
    if rect.y_max > grid.y_max {
        shift.y = grid.y_max - rect.y_max;
    }
    if rect.y_min + shift.y < grid.y_min {
        shift.y = grid.y_min - rect.y_min;
    }
    shift
}

/// One pass over every anchor/mover pair; returns true if anything moved
fn jiggle_pass(rooms: &mut [Room], grid: &CellRect, rng: &mut DungeonRng) -> bool {
    let mut anchors: Vec<usize> = (0..rooms.len()).collect();
    rng.shuffle(&mut anchors);
    let mut movers: Vec<usize> = (0..rooms.len()).collect();
    rng.shuffle(&mut movers);

    let mut moved = false;
    for &a in &anchors {
        for &m in &movers {
            if a == m {
                continue;
            }
            let shift = separation(&rooms[a].bounds, &rooms[m].bounds);
            if shift != Cell::ZERO {
                rooms[m].translate(shift);
                moved = true;
            }
        }
    }
    for &m in &movers {
        let shift = clamp_shift(grid, &rooms[m].bounds);
        if shift != Cell::ZERO {
            rooms[m].translate(shift);
            moved = true;
        }
    }
    moved
}

/// Push rooms apart until their padded bounds no longer overlap
pub fn resolve_overlaps(rooms: &mut [Room], grid: &CellRect, rng: &mut DungeonRng) -> LayoutReport {
    let mut passes = 0;
    while passes < MAX_JIGGLE_PASSES {
        passes += 1;
        if !jiggle_pass(rooms, grid, rng) {
            debug!(passes, rooms = rooms.len(), "room layout converged");
            return LayoutReport {
                passes,
                converged: true,
            };
        }
    }
    debug!(passes, rooms = rooms.len(), "room layout did not converge");
    LayoutReport {
        passes,
        converged: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separation_picks_cheaper_axis() {
        let anchor = CellRect::new(0, 0, 5, 5);
        assert_eq!(separation(&anchor, &CellRect::new(4, 1, 9, 6)), Cell::new(1, 0));
        assert_eq!(separation(&anchor, &CellRect::new(1, -3, 4, 1)), Cell::new(0, -1));
        assert_eq!(separation(&anchor, &CellRect::new(-4, 0, 1, 5)), Cell::new(-1, 0));
        assert_eq!(separation(&anchor, &CellRect::new(5, 0, 9, 5)), Cell::ZERO);
    }

    #[test]
    fn test_separation_resolves_overlap() {
        let anchor = CellRect::new(0, 0, 5, 5);
        let mover = CellRect::new(2, 2, 6, 6);
        let moved = mover.translated(separation(&anchor, &mover));
        assert!(!anchor.overlaps(&moved));
    }

    #[test]
    fn test_clamp_shift() {
        let grid = CellRect::new(0, 0, 10, 10);
        assert_eq!(clamp_shift(&grid, &CellRect::new(-2, 3, 3, 8)), Cell::new(2, 0));
        assert_eq!(clamp_shift(&grid, &CellRect::new(7, 8, 12, 13)), Cell::new(-2, -3));
        assert_eq!(clamp_shift(&grid, &CellRect::new(2, 2, 5, 5)), Cell::ZERO);
        assert_eq!(clamp_shift(&grid, &CellRect::new(-1, 0, 13, 3)), Cell::new(1, 0));
    }

    #[test]
    fn test_random_rooms_fit() {
        let config = GraphConfig {
            room_count: 20,
            min_room_size: 3,
            max_room_size: 7,
            ..GraphConfig::default()
        };
        let grid = CellRect::new(0, 0, 40, 30);
        let mut rng = DungeonRng::new(5);
        let rooms = random_rooms(&config, grid, &mut rng);
        assert_eq!(rooms.len(), 20);
        for (i, room) in rooms.iter().enumerate() {
            assert_eq!(room.id, RoomId(i));
            assert!(grid.contains_rect(&room.bounds));
            assert!((5..=9).contains(&room.bounds.width()));
            assert!((5..=9).contains(&room.bounds.height()));
        }
    }

    #[test]
    fn test_converged_layout_has_no_overlaps() {
        let config = GraphConfig {
            room_count: 6,
            ..GraphConfig::default()
        };
        let grid = CellRect::new(0, 0, 30, 30);
        let mut converged = 0;
        for seed in 0..10 {
            let mut rng = DungeonRng::new(seed);
            let mut rooms = random_rooms(&config, grid, &mut rng);
            let report = resolve_overlaps(&mut rooms, &grid, &mut rng);
            assert!(report.passes <= MAX_JIGGLE_PASSES);
            if !report.converged {
                continue;
            }
            converged += 1;
            for (i, a) in rooms.iter().enumerate() {
                assert!(grid.contains_rect(&a.bounds));
                for b in &rooms[i + 1..] {
                    assert!(!a.bounds.overlaps(&b.bounds));
                }
            }
        }
        assert!(converged > 0);
    }
}
