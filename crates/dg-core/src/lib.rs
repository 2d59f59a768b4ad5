//! dg-core: procedural 2D dungeon layouts
//!
//! Rooms are scattered on a tile grid, pushed apart, linked through a
//! Delaunay triangulation of their centres and joined with carved corridors.
//! A few organic generators share the same grid and output types.
//!
//! All randomness flows through one seeded [`DungeonRng`], so a seed, a config
//! and a grid size always reproduce the same layout.

pub mod alt;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod layout;
pub mod props;
mod rng;

pub use config::DungenConfig;
pub use error::{ConfigError, GenerateError, GraphError, Result};
pub use generator::{GeneratorKind, MazeGenerator};
pub use grid::{Tile, TileGrid, TileMap};
pub use layout::Layout;
pub use props::{NoProps, PropPlacement, PropSink};
pub use rng::DungeonRng;
