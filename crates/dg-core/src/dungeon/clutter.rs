//! Clutter population of finished rooms

use crate::config::GraphConfig;
use crate::geometry::Cell;
use crate::grid::{Tile, TileMap};
use crate::props::{PropPlacement, PropSink};
use crate::rng::DungeonRng;

use super::room::Room;

/// Drop a random number of weighted clutter props on free floor cells
///
/// Only cells that are still plain floor are used, so markers and corridors
/// entering the room stay clear. Returns the placements made.
pub fn populate_room(
    grid: &dyn TileMap,
    room: &Room,
    config: &GraphConfig,
    rng: &mut DungeonRng,
    sink: &mut dyn PropSink,
) -> Vec<PropPlacement> {
    let mut free: Vec<Cell> = room
        .floor(config.padding, config.wall_height)
        .cells()
        .filter(|&cell| grid.tile(cell) == Some(Tile::Floor))
        .collect();
    rng.shuffle(&mut free);

    let lo = i32::try_from(config.clutter_min).unwrap_or(i32::MAX);
    let hi = i32::try_from(config.clutter_max).unwrap_or(i32::MAX);
    let count = usize::try_from(rng.range_inclusive(lo, hi)).unwrap_or(0);

    let mut placed = Vec::new();
    for &cell in free.iter().take(count) {
        let Some(entry) = rng.choose_weighted(&config.clutter_table, |e| e.weight) else {
            continue;
        };
        let placement = PropPlacement {
            name: entry.name.clone(),
            cell,
            position: grid.cell_center_to_world(cell),
            room: room.id,
        };
        sink.place_prop(&placement);
        placed.push(placement);
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClutterEntry;
    use crate::dungeon::RoomId;
    use crate::geometry::CellRect;
    use crate::grid::TileGrid;

    fn setup() -> (TileGrid, Room) {
        let mut grid = TileGrid::new(12, 12);
        let room = Room::new(RoomId(0), CellRect::new(0, 0, 7, 7));
        room.render(&mut grid, 1, 1);
        (grid, room)
    }

    #[test]
    fn test_props_land_on_free_floor() {
        let (mut grid, room) = setup();
        grid.set_tile(Cell::new(3, 3), Tile::Start);
        let config = GraphConfig {
            clutter_min: 30,
            clutter_max: 30,
            ..GraphConfig::default()
        };
        let mut rng = DungeonRng::new(11);
        let mut sink: Vec<PropPlacement> = Vec::new();
        let placed = populate_room(&grid, &room, &config, &mut rng, &mut sink);
        // 5x4 floor minus the start marker
        assert_eq!(placed.len(), 19);
        assert_eq!(placed, sink);
        assert!(placed.iter().all(|p| grid.tile(p.cell) == Some(Tile::Floor)));
        assert!(placed.iter().all(|p| p.name == "barrel" || p.name == "chest"));
    }

    #[test]
    fn test_zero_weight_table_places_nothing() {
        let (grid, room) = setup();
        let config = GraphConfig {
            clutter_min: 2,
            clutter_max: 2,
            clutter_table: vec![ClutterEntry::new("ghost", 0)],
            ..GraphConfig::default()
        };
        let mut rng = DungeonRng::new(1);
        let placed = populate_room(&grid, &room, &config, &mut rng, &mut crate::props::NoProps);
        assert!(placed.is_empty());
    }

    #[test]
    fn test_count_within_range() {
        let (grid, room) = setup();
        let config = GraphConfig::default();
        let mut rng = DungeonRng::new(3);
        for _ in 0..20 {
            let placed = populate_room(&grid, &room, &config, &mut rng, &mut crate::props::NoProps);
            assert!(placed.len() <= config.clutter_max);
        }
    }
}
