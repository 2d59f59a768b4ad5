//! Organic generators that share only the grid primitives
//!
//! None of these use the room graph pipeline; each fills the grid in its own
//! way and reports what little structure it has through [`Layout`].
//!
//! [`Layout`]: crate::layout::Layout

mod dla;
mod ragged_bsp;
mod random_walk;
mod room_maze;

pub use dla::DlaGenerator;
pub use ragged_bsp::RaggedBspGenerator;
pub use random_walk::RandomWalkGenerator;
pub use room_maze::RoomMazeGenerator;
