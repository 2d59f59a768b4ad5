//! Prop placement callbacks
//!
//! Generators do not own props. They describe each placement and hand it to a
//! [`PropSink`] supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::dungeon::RoomId;
use crate::geometry::Cell;
use crate::grid::WorldPos;

/// One prop dropped into the layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    /// Clutter table entry name
    pub name: String,
    pub cell: Cell,
    /// World-space centre of `cell`
    pub position: WorldPos,
    pub room: RoomId,
}

/// Receiver of prop placements
pub trait PropSink {
    fn place_prop(&mut self, placement: &PropPlacement);
}

/// Sink that discards every placement
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProps;

impl PropSink for NoProps {
    fn place_prop(&mut self, _placement: &PropPlacement) {}
}

impl PropSink for Vec<PropPlacement> {
    fn place_prop(&mut self, placement: &PropPlacement) {
        self.push(placement.clone());
    }
}

impl<F: FnMut(&PropPlacement)> PropSink for F {
    fn place_prop(&mut self, placement: &PropPlacement) {
        self(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn barrel() -> PropPlacement {
        PropPlacement {
            name: "barrel".to_string(),
            cell: Cell::new(2, 3),
            position: Point::new(2.5, 3.5),
            room: RoomId(0),
        }
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<PropPlacement> = Vec::new();
        sink.place_prop(&barrel());
        assert_eq!(sink, vec![barrel()]);
    }

    #[test]
    fn test_closure_sink() {
        let mut names = Vec::new();
        let mut sink = |p: &PropPlacement| names.push(p.name.clone());
        sink.place_prop(&barrel());
        NoProps.place_prop(&barrel());
        assert_eq!(names, vec!["barrel".to_string()]);
    }
}
