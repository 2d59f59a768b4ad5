//! Generator configuration
//!
//! Every generator takes a plain config struct. [`DungenConfig`] bundles them
//! with the grid size and the generator choice and can be loaded from JSON.
//! Missing fields take their default value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generator::GeneratorKind;

/// One entry of the clutter table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClutterEntry {
    pub name: String,
    pub weight: u32,
}

impl ClutterEntry {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Settings of the room graph generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub room_count: usize,
    /// Smallest floor+wall width and height, padding excluded
    pub min_room_size: i32,
    pub max_room_size: i32,
    /// Empty margin kept around every room
    pub padding: i32,
    /// Wall rows at the top of every room
    pub wall_height: i32,
    /// Probability of keeping each non-spanning triangulation edge
    pub edge_density: f64,
    /// Larger values favour long straight corridors over short ones
    pub corridor_straightness: i32,
    pub clutter_min: usize,
    pub clutter_max: usize,
    pub clutter_table: Vec<ClutterEntry>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            room_count: 3,
            min_room_size: 3,
            max_room_size: 3,
            padding: 1,
            wall_height: 1,
            edge_density: 0.1,
            corridor_straightness: 4,
            clutter_min: 0,
            clutter_max: 2,
            clutter_table: vec![ClutterEntry::new("barrel", 3), ClutterEntry::new("chest", 1)],
        }
    }
}

impl GraphConfig {
    /// Width and height of the largest room including padding
    pub fn max_padded_size(&self) -> i32 {
        self.max_room_size + 2 * self.padding
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_room_size < 1 {
            return Err(ConfigError::invalid("min_room_size", "must be at least 1"));
        }
        if self.max_room_size < self.min_room_size {
            return Err(ConfigError::invalid(
                "max_room_size",
                format!("{} is below min_room_size {}", self.max_room_size, self.min_room_size),
            ));
        }
        if self.padding < 0 {
            return Err(ConfigError::invalid("padding", "must not be negative"));
        }
        if self.wall_height < 0 || self.wall_height >= self.min_room_size {
            return Err(ConfigError::invalid(
                "wall_height",
                "must leave at least one floor row in the smallest room",
            ));
        }
        if !(0.0..=1.0).contains(&self.edge_density) {
            return Err(ConfigError::invalid("edge_density", "must be within 0..=1"));
        }
        if self.corridor_straightness < 1 {
            return Err(ConfigError::invalid("corridor_straightness", "must be at least 1"));
        }
        if self.clutter_max < self.clutter_min {
            return Err(ConfigError::invalid("clutter_max", "is below clutter_min"));
        }
        Ok(())
    }
}

/// Settings of the random walk generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalkConfig {
    pub wall_height: i32,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub min_corridor_length: i32,
    pub max_corridor_length: i32,
    pub corridor_segments: usize,
    pub steps: usize,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            wall_height: 1,
            min_room_size: 3,
            max_room_size: 5,
            min_corridor_length: 2,
            max_corridor_length: 3,
            corridor_segments: 1,
            steps: 3,
        }
    }
}

impl RandomWalkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // edge points are drawn strictly inside the floor
        if self.min_room_size < 3 {
            return Err(ConfigError::invalid("min_room_size", "must be at least 3"));
        }
        if self.max_room_size < self.min_room_size {
            return Err(ConfigError::invalid("max_room_size", "is below min_room_size"));
        }
        if self.wall_height < 0 {
            return Err(ConfigError::invalid("wall_height", "must not be negative"));
        }
        if self.min_corridor_length < 1 {
            return Err(ConfigError::invalid("min_corridor_length", "must be at least 1"));
        }
        if self.max_corridor_length < self.min_corridor_length {
            return Err(ConfigError::invalid(
                "max_corridor_length",
                "is below min_corridor_length",
            ));
        }
        if self.corridor_segments < 1 {
            return Err(ConfigError::invalid("corridor_segments", "must be at least 1"));
        }
        Ok(())
    }
}

/// Settings of the ragged partition generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaggedBspConfig {
    /// Number of times the grid is split
    pub depth: u32,
}

impl Default for RaggedBspConfig {
    fn default() -> Self {
        Self { depth: 3 }
    }
}

/// Settings of the diffusion limited aggregation generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DlaConfig {
    pub steps: usize,
    pub step_depth: usize,
}

impl Default for DlaConfig {
    fn default() -> Self {
        Self {
            steps: 3,
            step_depth: 1,
        }
    }
}

/// Settings of the room maze generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomMazeConfig {
    pub room_count: usize,
    /// Floor width range
    pub min_width: i32,
    pub max_width: i32,
    /// Floor height range, wall rows excluded
    pub min_height: i32,
    pub max_height: i32,
    pub wall_height: i32,
    /// Smallest gap between two rooms, and between a corridor and a room it
    /// does not serve
    pub padding: i32,
    /// Largest gap between two floors that still gets a corridor
    pub connection_distance: i32,
    /// Placement attempts before a room is skipped
    pub max_tries: usize,
}

impl Default for RoomMazeConfig {
    fn default() -> Self {
        Self {
            room_count: 3,
            min_width: 3,
            max_width: 6,
            min_height: 3,
            max_height: 6,
            wall_height: 1,
            padding: 2,
            connection_distance: 5,
            max_tries: 128,
        }
    }
}

impl RoomMazeConfig {
    /// Width and height of the largest room including padding
    pub fn max_padded_size(&self) -> (i32, i32) {
        (
            self.max_width + 2 * self.padding,
            self.max_height + self.wall_height + 2 * self.padding,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width < 1 {
            return Err(ConfigError::invalid("min_width", "must be at least 1"));
        }
        if self.max_width < self.min_width {
            return Err(ConfigError::invalid("max_width", "is below min_width"));
        }
        if self.min_height < 1 {
            return Err(ConfigError::invalid("min_height", "must be at least 1"));
        }
        if self.max_height < self.min_height {
            return Err(ConfigError::invalid("max_height", "is below min_height"));
        }
        if self.wall_height < 0 {
            return Err(ConfigError::invalid("wall_height", "must not be negative"));
        }
        if self.padding < 0 {
            return Err(ConfigError::invalid("padding", "must not be negative"));
        }
        if self.connection_distance < 0 {
            return Err(ConfigError::invalid("connection_distance", "must not be negative"));
        }
        if self.max_tries < 1 {
            return Err(ConfigError::invalid("max_tries", "must be at least 1"));
        }
        Ok(())
    }
}

/// Full configuration of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungenConfig {
    pub generator: GeneratorKind,
    pub width: i32,
    pub height: i32,
    pub graph: GraphConfig,
    pub random_walk: RandomWalkConfig,
    pub ragged_bsp: RaggedBspConfig,
    pub dla: DlaConfig,
    pub room_maze: RoomMazeConfig,
}

impl Default for DungenConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::Graph,
            width: 30,
            height: 30,
            graph: GraphConfig::default(),
            random_walk: RandomWalkConfig::default(),
            ragged_bsp: RaggedBspConfig::default(),
            dla: DlaConfig::default(),
            room_maze: RoomMazeConfig::default(),
        }
    }
}

impl DungenConfig {
    /// Load a configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a JSON configuration and validate it
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 1 || self.height < 1 {
            return Err(ConfigError::invalid("width", "grid must be at least 1x1"));
        }
        self.graph.validate()?;
        self.random_walk.validate()?;
        self.room_maze.validate()?;
        Ok(())
    }
}
