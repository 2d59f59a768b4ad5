//! Grid and continuous geometry
//!
//! Integer cells and rectangles for the tile grid, continuous points for the
//! triangulation.

mod cell;
pub mod delaunay;
mod point;
mod rect;

pub use cell::{Cell, Direction, Offset};
pub use delaunay::{Circle, DelaunayTriangle, Triangulation, triangulate};
pub use point::Point;
pub use rect::CellRect;
