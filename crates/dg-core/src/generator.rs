//! Generator strategy trait and selection

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::alt::{
    DlaGenerator, RaggedBspGenerator, RandomWalkGenerator, RoomMazeGenerator,
};
use crate::config::DungenConfig;
use crate::dungeon::GraphGenerator;
use crate::error::GenerateError;
use crate::grid::{Tile, TileMap};
use crate::layout::Layout;
use crate::props::PropSink;
use crate::rng::DungeonRng;

/// A strategy that fills a tile grid with a layout
pub trait MazeGenerator {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Clear `grid` and generate a fresh layout into it
    ///
    /// All randomness comes from `rng`, so the same seed, config and grid
    /// produce the same result.
    fn generate(
        &mut self,
        grid: &mut dyn TileMap,
        rng: &mut DungeonRng,
        props: &mut dyn PropSink,
    ) -> Result<Layout, GenerateError>;

    /// Reset every cell of `grid` to `fill`
    fn clear(&mut self, grid: &mut dyn TileMap, fill: Tile) {
        grid.fill(fill);
    }
}

/// Available generators
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeneratorKind {
    /// Rooms joined along a triangulation backbone
    #[default]
    Graph,
    /// Rooms and corridors grown by a random walk
    RandomWalk,
    /// Recursive ragged partition of the whole grid
    RaggedBsp,
    /// Diffusion limited aggregation cave
    Dla,
    /// Scattered rooms joined by shortest paths to their near neighbours
    RoomMaze,
}

impl GeneratorKind {
    /// Build the generator with its section of `config`
    pub fn build(self, config: &DungenConfig) -> Box<dyn MazeGenerator> {
        match self {
            GeneratorKind::Graph => Box::new(GraphGenerator::new(config.graph.clone())),
            GeneratorKind::RandomWalk => {
                Box::new(RandomWalkGenerator::new(config.random_walk.clone()))
            }
            GeneratorKind::RaggedBsp => Box::new(RaggedBspGenerator::new(config.ragged_bsp.clone())),
            GeneratorKind::Dla => Box::new(DlaGenerator::new(config.dla.clone())),
            GeneratorKind::RoomMaze => {
                Box::new(RoomMazeGenerator::new(config.room_maze.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_kind_builds() {
        let config = DungenConfig::default();
        let names: Vec<&str> = GeneratorKind::iter()
            .map(|kind| kind.build(&config).name())
            .collect();
        assert_eq!(names, vec!["graph", "random_walk", "ragged_bsp", "dla", "room_maze"]);
    }

    #[test]
    fn test_kind_names_match_serde() {
        for kind in GeneratorKind::iter() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
