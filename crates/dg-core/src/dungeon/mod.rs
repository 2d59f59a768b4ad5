//! Room-and-corridor dungeons
//!
//! Rooms are placed and separated (`layout`), connected by corridors carved
//! with a grid search (`corridor`) and dressed with clutter (`clutter`).
//! [`GraphGenerator`] runs the whole pipeline.

mod clutter;
mod corridor;
mod generation;
mod layout;
mod room;

pub use clutter::populate_room;
pub use corridor::{Corridor, CorridorSpec, carve_corridor, search_corridor};
pub use generation::GraphGenerator;
pub use layout::{
    LayoutReport, MAX_JIGGLE_PASSES, clamp_shift, random_rooms, resolve_overlaps, separation,
};
pub use room::{Room, RoomId};
