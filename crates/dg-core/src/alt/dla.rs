//! Diffusion limited aggregation caves
//!
//! Starting from the grid centre, each step picks a random existing point and
//! a direction, then shoots past the occupied cells in that direction and
//! sticks a new point where it leaves the cluster.

use hashbrown::HashSet;
use tracing::info;

use crate::config::DlaConfig;
use crate::error::GenerateError;
use crate::generator::MazeGenerator;
use crate::geometry::{Cell, Direction};
use crate::grid::{Tile, TileMap};
use crate::layout::Layout;
use crate::props::PropSink;
use crate::rng::DungeonRng;

#[derive(Debug, Clone, Default)]
pub struct DlaGenerator {
    config: DlaConfig,
}

impl DlaGenerator {
    pub fn new(config: DlaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DlaConfig {
        &self.config
    }
}

/// Points in insertion order with constant-time membership
#[derive(Debug, Default)]
struct Cluster {
    members: HashSet<Cell>,
    ordered: Vec<Cell>,
}

impl Cluster {
    fn add(&mut self, cell: Cell) {
        if self.members.insert(cell) {
            self.ordered.push(cell);
        }
    }

    fn contains(&self, cell: Cell) -> bool {
        self.members.contains(&cell)
    }

    fn grow(&mut self, rng: &mut DungeonRng, step_depth: usize) {
        let Some(&origin) = rng.choose(&self.ordered) else {
            return;
        };
        let dir = Direction::ALL[rng.index(Direction::ALL.len())];
        let mut point = origin.step(dir);
        for _ in 0..step_depth {
            while self.contains(point) {
                point = point.step(dir);
            }
            self.add(point);
        }
    }
}

impl MazeGenerator for DlaGenerator {
    fn name(&self) -> &'static str {
        "dla"
    }

    fn generate(
        &mut self,
        grid: &mut dyn TileMap,
        rng: &mut DungeonRng,
        _props: &mut dyn PropSink,
    ) -> Result<Layout, GenerateError> {
        self.clear(grid, Tile::Empty);
        let start = grid.bounds().center();
        let mut cluster = Cluster::default();
        cluster.add(start);
        for _ in 0..self.config.steps {
            cluster.grow(rng, self.config.step_depth);
        }

        // points that wandered off the grid are dropped
        for &cell in &cluster.ordered {
            grid.set_tile(cell, Tile::Floor);
        }
        info!(seed = rng.seed(), points = cluster.ordered.len(), "aggregation generated");
        Ok(Layout {
            start: Some(start),
            ..Layout::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;
    use crate::props::NoProps;

    #[test]
    fn test_each_step_adds_depth_points() {
        let mut cluster = Cluster::default();
        cluster.add(Cell::ZERO);
        let mut rng = DungeonRng::new(4);
        for _ in 0..10 {
            cluster.grow(&mut rng, 2);
        }
        assert_eq!(cluster.ordered.len(), 21);
        assert_eq!(cluster.members.len(), 21);
    }

    #[test]
    fn test_cluster_is_connected() {
        let mut cluster = Cluster::default();
        cluster.add(Cell::ZERO);
        let mut rng = DungeonRng::new(12);
        for _ in 0..50 {
            cluster.grow(&mut rng, 1);
        }
        for &cell in &cluster.ordered[1..] {
            assert!(cell.neighbors().iter().any(|&n| cluster.contains(n)));
        }
    }

    #[test]
    fn test_generate_starts_at_centre() {
        let mut grid = TileGrid::new(9, 9);
        let mut generator = DlaGenerator::new(DlaConfig {
            steps: 200,
            step_depth: 1,
        });
        let layout = generator
            .generate(&mut grid, &mut DungeonRng::new(2), &mut NoProps)
            .unwrap();
        assert_eq!(layout.start, Some(Cell::new(4, 4)));
        assert_eq!(grid.tile(Cell::new(4, 4)), Some(Tile::Floor));
        assert!(grid.count(Tile::Floor) <= 81);
        assert!(grid.count(Tile::Floor) > 1);
    }
}
