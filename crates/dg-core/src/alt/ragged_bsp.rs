//! Ragged binary space partition
//!
//! The whole grid starts as floor. A region is split by growing two blobs from
//! random seed cells, one cell per blob per round, until neither can grow.
//! Cells of the first blob touching the second become walls, then both blobs
//! are split again. Boundaries follow the growth order, so they wander instead
//! of running straight.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::RaggedBspConfig;
use crate::error::GenerateError;
use crate::generator::MazeGenerator;
use crate::geometry::Cell;
use crate::grid::{Tile, TileMap};
use crate::layout::Layout;
use crate::props::PropSink;
use crate::rng::DungeonRng;

/// Recursive ragged partition of the whole grid
#[derive(Debug, Clone, Default)]
pub struct RaggedBspGenerator {
    config: RaggedBspConfig,
}

impl RaggedBspGenerator {
    pub fn new(config: RaggedBspConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RaggedBspConfig {
        &self.config
    }
}

/// Move the first cell of `remaining` adjacent to `blob` into it
fn annex(blob: &mut BTreeSet<Cell>, remaining: &mut Vec<Cell>) -> bool {
    let Some(i) = remaining
        .iter()
        .position(|cell| cell.neighbors().iter().any(|n| blob.contains(n)))
    else {
        return false;
    };
    blob.insert(remaining.remove(i));
    true
}

/// Grow two blobs inside `region` and wall off their common border
///
/// Returns the two blobs with the new walls removed.
fn split(
    region: &BTreeSet<Cell>,
    rng: &mut DungeonRng,
    walls: &mut Vec<Cell>,
) -> Option<(BTreeSet<Cell>, BTreeSet<Cell>)> {
    let mut remaining: Vec<Cell> = region.iter().copied().collect();
    rng.shuffle(&mut remaining);
    let mut a = BTreeSet::from([remaining.pop()?]);
    let mut b = BTreeSet::from([remaining.pop()?]);

    loop {
        let grew_a = annex(&mut a, &mut remaining);
        let grew_b = annex(&mut b, &mut remaining);
        if !grew_a && !grew_b {
            break;
        }
    }

    let border: Vec<Cell> = a
        .iter()
        .copied()
        .filter(|cell| cell.neighbors8().iter().any(|n| b.contains(n)))
        .collect();
    for cell in &border {
        a.remove(cell);
    }
    walls.extend(border);
    Some((a, b))
}

fn partition(region: BTreeSet<Cell>, depth: u32, rng: &mut DungeonRng, walls: &mut Vec<Cell>) {
    if depth == 0 {
        return;
    }
    let Some((a, b)) = split(&region, rng, walls) else {
        return;
    };
    partition(a, depth - 1, rng, walls);
    partition(b, depth - 1, rng, walls);
}

impl MazeGenerator for RaggedBspGenerator {
    fn name(&self) -> &'static str {
        "ragged_bsp"
    }

    fn generate(
        &mut self,
        grid: &mut dyn TileMap,
        rng: &mut DungeonRng,
        _props: &mut dyn PropSink,
    ) -> Result<Layout, GenerateError> {
        self.clear(grid, Tile::Floor);
        let all: BTreeSet<Cell> = grid.bounds().cells().collect();
        let mut walls = Vec::new();
        partition(all, self.config.depth, rng, &mut walls);
        debug!(walls = walls.len(), "partition done");
        for &cell in &walls {
            grid.set_tile(cell, Tile::Wall);
        }
        info!(seed = rng.seed(), depth = self.config.depth, "ragged partition generated");
        Ok(Layout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;
    use crate::props::NoProps;

    fn run(depth: u32, seed: u64) -> TileGrid {
        let mut grid = TileGrid::new(16, 12);
        RaggedBspGenerator::new(RaggedBspConfig { depth })
            .generate(&mut grid, &mut DungeonRng::new(seed), &mut NoProps)
            .unwrap();
        grid
    }

    #[test]
    fn test_depth_zero_is_all_floor() {
        let grid = run(0, 3);
        assert_eq!(grid.count(Tile::Floor), 16 * 12);
    }

    #[test]
    fn test_split_separates_blobs() {
        let region: BTreeSet<Cell> = (0..6)
            .flat_map(|x| (0..6).map(move |y| Cell::new(x, y)))
            .collect();
        let mut walls = Vec::new();
        let (a, b) = split(&region, &mut DungeonRng::new(9), &mut walls).unwrap();
        assert!(a.is_disjoint(&b));
        assert_eq!(a.len() + b.len() + walls.len(), region.len());
        for cell in &a {
            assert!(cell.neighbors8().iter().all(|n| !b.contains(n)));
        }
    }

    #[test]
    fn test_single_cell_region_is_left_alone() {
        let region = BTreeSet::from([Cell::new(0, 0)]);
        let mut walls = Vec::new();
        assert!(split(&region, &mut DungeonRng::new(1), &mut walls).is_none());
        assert!(walls.is_empty());
    }

    #[test]
    fn test_partition_adds_walls_and_only_walls() {
        let grid = run(3, 8);
        assert!(grid.count(Tile::Wall) > 0);
        assert_eq!(grid.count(Tile::Floor) + grid.count(Tile::Wall), 16 * 12);
        assert_eq!(run(3, 8), grid);
    }
}
