//! Room graph generator
//!
//! Rooms are scattered and jiggled apart, then joined along a Delaunay
//! triangulation of their floor centres: the minimal spanning tree forms the
//! backbone and a few extra triangulation edges add loops. The longest path
//! through the backbone becomes the critical path from start to finish.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::clutter::populate_room;
use super::corridor::{Corridor, CorridorSpec, carve_corridor};
use super::layout::{random_rooms, resolve_overlaps};
use super::room::{Room, RoomId};
use crate::config::GraphConfig;
use crate::error::GenerateError;
use crate::generator::MazeGenerator;
use crate::geometry::{Cell, Point, triangulate};
use crate::graph::DistanceGraph;
use crate::grid::{Tile, TileMap};
use crate::layout::Layout;
use crate::props::PropSink;
use crate::rng::DungeonRng;

/// Rooms plus connectivity graph built from a triangulation backbone
#[derive(Debug, Clone, Default)]
pub struct GraphGenerator {
    config: GraphConfig,
}

/// Connectivity before any corridor is carved
struct Connectivity {
    backbone: DistanceGraph<RoomId>,
    graph: DistanceGraph<RoomId>,
}

impl GraphGenerator {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn corridor_spec(&self) -> CorridorSpec {
        CorridorSpec {
            padding: self.config.padding,
            wall_height: self.config.wall_height,
            straightness: self.config.corridor_straightness,
        }
    }

    /// Triangulate the floor centres, keep the spanning tree and sprinkle in
    /// extra edges
    fn connect(&self, rooms: &[Room], rng: &mut DungeonRng) -> Connectivity {
        let (padding, wall) = (self.config.padding, self.config.wall_height);
        let centres: Vec<Point> = rooms
            .iter()
            .map(|room| room.floor(padding, wall).center_point())
            .collect();

        let mut candidates = DistanceGraph::new();
        for room in rooms {
            candidates.add_node(room.id);
        }
        for (i, j, _) in triangulate(&centres).edges() {
            let distance = centres[i].manhattan_distance(centres[j]);
            candidates.add_undirected(rooms[i].id, rooms[j].id, distance);
        }

        let backbone = candidates.minimal_spanning_tree();
        let mut graph = backbone.clone();
        // one draw per unordered pair
        for (a, b, &distance) in candidates.edges().filter(|(a, b, _)| a < b) {
            let include = rng.chance(self.config.edge_density);
            if include && !graph.connected(a, b) {
                graph.add_directed(a, b, distance);
            }
        }
        debug!(
            backbone = backbone.edge_count(),
            edges = graph.edge_count(),
            "room graph built"
        );
        Connectivity { backbone, graph }
    }

    /// Room pairs in carving order: critical path first, then the rest of the
    /// graph in depth-first order from the start room
    fn carving_order(
        graph: &DistanceGraph<RoomId>,
        critical_path: &[RoomId],
    ) -> Vec<(RoomId, RoomId)> {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        let mut visit = |a: RoomId, b: RoomId| {
            if seen.insert((a.min(b), a.max(b))) {
                order.push((a, b));
            }
        };

        for pair in critical_path.windows(2) {
            visit(pair[0], pair[1]);
        }

        let mut nodes = Vec::new();
        graph.traverse_depth_first(critical_path.first().copied(), |n| nodes.push(n), |_, _, _| {});
        let reached: BTreeSet<RoomId> = nodes.iter().copied().collect();
        nodes.extend(graph.nodes().filter(|n| !reached.contains(n)));

        for node in nodes {
            for &dst in graph.edges_from(node).into_iter().flatten().map(|(dst, _)| dst) {
                visit(node, dst);
            }
            for &src in graph.edges_to(node).into_iter().flatten().map(|(src, _)| src) {
                visit(src, node);
            }
        }
        order
    }

    /// Carve every pair; failed pairs are dropped from the graph afterwards
    fn carve_all(
        &self,
        grid: &mut dyn TileMap,
        rooms: &[Room],
        graph: &mut DistanceGraph<RoomId>,
        critical_path: &[RoomId],
    ) -> (Vec<Corridor>, Vec<(RoomId, RoomId)>) {
        let spec = self.corridor_spec();
        let mut corridors = Vec::new();
        let mut unpathable = Vec::new();
        for (a, b) in Self::carving_order(graph, critical_path) {
            let (Some(src), Some(dst)) = (room_by_id(rooms, a), room_by_id(rooms, b)) else {
                continue;
            };
            match carve_corridor(grid, src, dst, spec) {
                Some(corridor) => corridors.push(corridor),
                None => {
                    warn!(from = %src.bounds, to = %dst.bounds, "unpathable rooms");
                    unpathable.push((a, b));
                }
            }
        }
        for &(a, b) in &unpathable {
            graph.remove_undirected(a, b);
        }
        (corridors, unpathable)
    }

    /// Remove rooms the start cannot reach, together with their corridors
    fn prune_unreachable(
        grid: &mut dyn TileMap,
        rooms: &mut Vec<Room>,
        graph: &mut DistanceGraph<RoomId>,
        corridors: &mut Vec<Corridor>,
        start: RoomId,
        padding: i32,
    ) -> Vec<RoomId> {
        let reached = graph.reachable_from(start);
        let pruned: Vec<RoomId> = rooms
            .iter()
            .map(|room| room.id)
            .filter(|id| !reached.contains(id))
            .collect();
        if pruned.is_empty() {
            return pruned;
        }

        // only the unpadded area was rendered; corridors of surviving rooms may
        // cross the padding
        for room in rooms.iter().filter(|room| !reached.contains(&room.id)) {
            grid.fill_rect(room.unpadded(padding), Tile::Empty);
            graph.remove_node(room.id);
        }
        rooms.retain(|room| reached.contains(&room.id));

        let (orphans, kept): (Vec<Corridor>, Vec<Corridor>) = corridors
            .drain(..)
            .partition(|c| !reached.contains(&c.from) && !reached.contains(&c.to));
        *corridors = kept;
        let kept_cells: BTreeSet<Cell> =
            corridors.iter().flat_map(|c| c.cells.iter().copied()).collect();
        for cell in orphans.iter().flat_map(|c| c.cells.iter().copied()) {
            let inside_room = rooms.iter().any(|room| room.bounds.contains(cell));
            if !inside_room && !kept_cells.contains(&cell) {
                grid.set_tile(cell, Tile::Empty);
            }
        }

        warn!(count = pruned.len(), "pruned unreachable rooms");
        pruned
    }

    /// Longest path over the breadth-first tree of what is left
    fn recompute_critical_path(
        graph: &DistanceGraph<RoomId>,
        start: RoomId,
    ) -> Result<Vec<RoomId>, GenerateError> {
        let mut tree = DistanceGraph::new();
        tree.add_node(start);
        graph.traverse_breadth_first(Some(start), |_| {}, |a, b, &d| tree.add_directed(a, b, d));
        Ok(tree.longest_path_global()?.unwrap_or_else(|| vec![start]))
    }
}

fn room_by_id(rooms: &[Room], id: RoomId) -> Option<&Room> {
    rooms.iter().find(|room| room.id == id)
}

impl MazeGenerator for GraphGenerator {
    fn name(&self) -> &'static str {
        "graph"
    }

    fn generate(
        &mut self,
        grid: &mut dyn TileMap,
        rng: &mut DungeonRng,
        props: &mut dyn PropSink,
    ) -> Result<Layout, GenerateError> {
        self.config.validate()?;
        if self.config.room_count == 0 {
            return Err(GenerateError::NoRooms);
        }
        let bounds = grid.bounds();
        let needed = self.config.max_padded_size();
        if needed > bounds.width() || needed > bounds.height() {
            return Err(GenerateError::GridTooSmall {
                width: bounds.width(),
                height: bounds.height(),
                needed,
            });
        }
        let (padding, wall) = (self.config.padding, self.config.wall_height);

        self.clear(grid, Tile::Empty);
        let mut rooms = random_rooms(&self.config, bounds, rng);
        let report = resolve_overlaps(&mut rooms, &bounds, rng);

        let Connectivity { backbone, mut graph } = self.connect(&rooms, rng);
        let mut critical_path = backbone
            .undirected()
            .longest_path_global()?
            .unwrap_or_else(|| vec![rooms[0].id]);

        for room in &rooms {
            room.render(grid, padding, wall);
        }
        let (mut corridors, unpathable) = self.carve_all(grid, &rooms, &mut graph, &critical_path);

        let start_room = critical_path[0];
        let pruned = Self::prune_unreachable(
            grid,
            &mut rooms,
            &mut graph,
            &mut corridors,
            start_room,
            padding,
        );
        if critical_path.windows(2).any(|pair| !graph.connected(pair[0], pair[1])) {
            critical_path = Self::recompute_critical_path(&graph, start_room)?;
            debug!(len = critical_path.len(), "critical path recomputed");
        }

        let start = room_by_id(&rooms, start_room).map(|r| r.floor_center(padding, wall));
        let finish = critical_path
            .last()
            .and_then(|&id| room_by_id(&rooms, id))
            .map(|r| r.floor_center(padding, wall));
        if let Some(cell) = finish {
            grid.set_tile(cell, Tile::End);
        }
        if let Some(cell) = start {
            grid.set_tile(cell, Tile::Start);
        }

        let mut placed = Vec::new();
        for room in &rooms {
            placed.extend(populate_room(grid, room, &self.config, rng, props));
        }

        info!(
            seed = rng.seed(),
            rooms = rooms.len(),
            corridors = corridors.len(),
            critical = critical_path.len(),
            props = placed.len(),
            "graph layout generated"
        );
        Ok(Layout {
            rooms,
            graph,
            critical_path,
            corridors,
            unpathable,
            pruned,
            start,
            finish,
            props: placed,
            report: Some(report),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CellRect;
    use crate::grid::TileGrid;
    use crate::props::NoProps;

    fn generate(config: GraphConfig, seed: u64, size: i32) -> (TileGrid, Layout) {
        let mut grid = TileGrid::new(size, size);
        let mut rng = DungeonRng::new(seed);
        let layout = GraphGenerator::new(config)
            .generate(&mut grid, &mut rng, &mut NoProps)
            .unwrap();
        (grid, layout)
    }

    #[test]
    fn test_no_rooms_is_an_error() {
        let mut grid = TileGrid::new(30, 30);
        let mut generator = GraphGenerator::new(GraphConfig {
            room_count: 0,
            ..GraphConfig::default()
        });
        let result = generator.generate(&mut grid, &mut DungeonRng::new(1), &mut NoProps);
        assert!(matches!(result, Err(GenerateError::NoRooms)));
    }

    #[test]
    fn test_grid_too_small() {
        let mut grid = TileGrid::new(4, 30);
        let mut generator = GraphGenerator::new(GraphConfig::default());
        let result = generator.generate(&mut grid, &mut DungeonRng::new(1), &mut NoProps);
        assert!(matches!(result, Err(GenerateError::GridTooSmall { needed: 5, .. })));
    }

    #[test]
    fn test_single_room() {
        let (grid, layout) = generate(
            GraphConfig {
                room_count: 1,
                ..GraphConfig::default()
            },
            4,
            12,
        );
        assert_eq!(layout.critical_path, vec![RoomId(0)]);
        assert_eq!(layout.start, layout.finish);
        assert_eq!(grid.count(Tile::Start), 1);
        assert!(layout.corridors.is_empty());
    }

    #[test]
    fn test_carving_order_puts_critical_path_first() {
        let mut graph = DistanceGraph::new();
        graph.add_directed(RoomId(0), RoomId(1), 1.0);
        graph.add_directed(RoomId(2), RoomId(1), 1.0);
        graph.add_directed(RoomId(1), RoomId(3), 1.0);
        graph.add_directed(RoomId(3), RoomId(2), 1.0);
        let critical = [RoomId(3), RoomId(1), RoomId(0)];
        let order = GraphGenerator::carving_order(&graph, &critical);
        assert_eq!(&order[..2], &[(RoomId(3), RoomId(1)), (RoomId(1), RoomId(0))]);
        assert_eq!(order.len(), 4);
        assert!(order.contains(&(RoomId(3), RoomId(2))));
        assert!(order.contains(&(RoomId(2), RoomId(1))));
    }

    #[test]
    fn test_prune_unreachable_clears_rooms_and_corridors() {
        let mut grid = TileGrid::new(30, 10);
        let mut rooms = vec![
            Room::new(RoomId(0), CellRect::new(0, 0, 5, 5)),
            Room::new(RoomId(1), CellRect::new(10, 0, 15, 5)),
            Room::new(RoomId(2), CellRect::new(20, 0, 25, 5)),
        ];
        for room in &rooms {
            room.render(&mut grid, 1, 1);
        }
        let orphan = Corridor {
            from: RoomId(1),
            to: RoomId(2),
            cells: (4..23).map(|x| Cell::new(x, 2)).collect(),
        };
        for &cell in &orphan.cells {
            grid.set_tile(cell, Tile::Floor);
        }
        let mut corridors = vec![orphan];
        let mut graph = DistanceGraph::new();
        graph.add_node(RoomId(0));
        graph.add_undirected(RoomId(1), RoomId(2), 10.0);

        let pruned = GraphGenerator::prune_unreachable(
            &mut grid,
            &mut rooms,
            &mut graph,
            &mut corridors,
            RoomId(0),
            1,
        );
        assert_eq!(pruned, vec![RoomId(1), RoomId(2)]);
        assert_eq!(rooms.len(), 1);
        assert!(corridors.is_empty());
        assert_eq!(graph.len(), 1);
        assert_eq!(grid.count(Tile::Wall), 3);
        assert_eq!(grid.tile(Cell::new(7, 2)), Some(Tile::Empty));
        // inside the surviving room's padding
        assert_eq!(grid.tile(Cell::new(4, 2)), Some(Tile::Floor));
    }

    #[test]
    fn test_prune_keeps_corridors_crossing_padding() {
        let padding = 2;
        let mut grid = TileGrid::new(40, 14);
        let mut rooms = vec![
            Room::new(RoomId(0), CellRect::new(0, 0, 10, 10)),
            Room::new(RoomId(1), CellRect::new(30, 0, 40, 10)),
            Room::new(RoomId(2), CellRect::new(14, 3, 24, 13)),
        ];
        for room in &rooms {
            room.render(&mut grid, padding, 1);
        }
        // runs through the padding ring of room 2, clear of its floor
        let corridor = Corridor {
            from: RoomId(0),
            to: RoomId(1),
            cells: (8..32).map(|x| Cell::new(x, 3)).collect(),
        };
        for &cell in &corridor.cells {
            grid.set_tile(cell, Tile::Floor);
        }
        let mut corridors = vec![corridor.clone()];
        let mut graph = DistanceGraph::new();
        graph.add_undirected(RoomId(0), RoomId(1), 30.0);
        graph.add_node(RoomId(2));

        let pruned = GraphGenerator::prune_unreachable(
            &mut grid,
            &mut rooms,
            &mut graph,
            &mut corridors,
            RoomId(0),
            padding,
        );
        assert_eq!(pruned, vec![RoomId(2)]);
        assert_eq!(corridors, vec![corridor.clone()]);
        for &cell in &corridor.cells {
            assert_eq!(grid.tile(cell), Some(Tile::Floor), "{cell}");
        }
        for cell in CellRect::new(14, 3, 24, 13).inset(padding).cells() {
            assert_eq!(grid.tile(cell), Some(Tile::Empty), "{cell}");
        }
    }

    fn scattered_rooms() -> Vec<Room> {
        let origins = [
            (0, 0),
            (11, 2),
            (23, 1),
            (1, 12),
            (13, 10),
            (22, 13),
            (2, 24),
            (12, 21),
            (24, 23),
        ];
        origins
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Room::new(RoomId(i), CellRect::from_size(x, y, 5, 5)))
            .collect()
    }

    fn candidate_pairs(rooms: &[Room], config: &GraphConfig) -> usize {
        let centres: Vec<Point> = rooms
            .iter()
            .map(|room| room.floor(config.padding, config.wall_height).center_point())
            .collect();
        triangulate(&centres).edges().filter(|(a, b, _)| a < b).count()
    }

    #[test]
    fn test_connect_draws_once_per_pair() {
        let rooms = scattered_rooms();
        let generator = GraphGenerator::new(GraphConfig {
            edge_density: 0.5,
            ..GraphConfig::default()
        });
        let pairs = candidate_pairs(&rooms, generator.config());

        let mut rng = DungeonRng::new(77);
        generator.connect(&rooms, &mut rng);
        let mut expected = DungeonRng::new(77);
        for _ in 0..pairs {
            expected.chance(0.5);
        }
        assert_eq!(rng.range(0, 1_000_000), expected.range(0, 1_000_000));
    }

    #[test]
    fn test_extra_edge_rate_follows_density() {
        let rooms = scattered_rooms();
        let generator = GraphGenerator::new(GraphConfig {
            edge_density: 0.5,
            ..GraphConfig::default()
        });
        let pairs = candidate_pairs(&rooms, generator.config());
        let non_tree = pairs - (rooms.len() - 1);
        assert!(non_tree > 0);

        let (mut extra, mut trials) = (0, 0);
        for seed in 0..400 {
            let Connectivity { backbone, graph } =
                generator.connect(&rooms, &mut DungeonRng::new(seed));
            extra += graph.edge_count() - backbone.edge_count();
            trials += non_tree;
        }
        let rate = extra as f64 / trials as f64;
        assert!((0.45..0.55).contains(&rate), "rate {rate}");
    }

    #[test]
    fn test_layout_is_consistent() {
        for seed in 0..8 {
            let (grid, layout) = generate(
                GraphConfig {
                    room_count: 6,
                    edge_density: 0.5,
                    ..GraphConfig::default()
                },
                seed,
                40,
            );
            assert!(!layout.critical_path.is_empty());
            let reached = layout.graph.reachable_from(layout.critical_path[0]);
            assert_eq!(reached.len(), layout.rooms.len());
            for (a, b) in &layout.unpathable {
                assert!(!layout.graph.connected(*a, *b));
            }
            for pair in layout.critical_path.windows(2) {
                assert!(layout.graph.connected(pair[0], pair[1]));
            }
            assert_eq!(grid.count(Tile::Start), 1);
            assert_eq!(layout.rooms.len() + layout.pruned.len(), 6);
        }
    }
}
