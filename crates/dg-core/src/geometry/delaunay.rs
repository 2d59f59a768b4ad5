//! Incremental Delaunay triangulation
//!
//! Points are inserted one at a time into a large enclosing triangle
//! (Bowyer-Watson). Every insertion removes the triangles whose circumcircle
//! contains the new point and fans the hole from it. Edges created by the
//! insertion are then checked for legality and flipped until the queue
//! drains. Triangles that still touch the enclosing triangle are dropped at
//! the end.
//!
//! Triangle adjacency is kept in a [`Graph`] keyed by triangle handle, with
//! the shared edge as payload.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::f64::consts::{FRAC_PI_2, PI};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Point;
use crate::graph::{DisjointSets, DistanceGraph, Graph};

/// Radius of the enclosing circle, in multiples of the input's spread
const SUPER_SCALE: f64 = 16.0;

/// Relative tolerance for the in-circle test
const IN_CIRCLE_EPSILON: f64 = 1e-9;

/// Relative tolerance for orientation tests
const ORIENT_EPSILON: f64 = 1e-12;

/// A circle in continuous grid space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    /// Circumcircle of a triangle
    ///
    /// Collinear points produce an infinite radius, so the degenerate
    /// triangle contains every point.
    pub fn through(a: Point, b: Point, c: Point) -> Self {
        let ab = b - a;
        let ac = c - a;
        let d = 2.0 * ab.cross(ac);
        let scale = ab.length_squared().max(ac.length_squared()).max(1.0);
        if d.abs() <= ORIENT_EPSILON * scale {
            return Circle {
                center: (a + b + c) / 3.0,
                radius: f64::INFINITY,
            };
        }
        let ab2 = ab.length_squared();
        let ac2 = ac.length_squared();
        let offset = Point::new(
            (ac.y * ab2 - ab.y * ac2) / d,
            (ab.x * ac2 - ac.x * ab2) / d,
        );
        Circle {
            center: a + offset,
            radius: offset.length(),
        }
    }

    /// Inclusive containment
    pub fn contains(&self, p: Point) -> bool {
        self.radius.is_infinite() || (p - self.center).length_squared() <= self.radius * self.radius
    }

    /// Containment with the boundary, and a small band around it, excluded
    pub fn strictly_contains(&self, p: Point) -> bool {
        if self.radius.is_infinite() {
            return true;
        }
        let r2 = self.radius * self.radius;
        (p - self.center).length_squared() < r2 - IN_CIRCLE_EPSILON * r2.max(1.0)
    }
}

/// Handle of a point inside the triangulation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct PointId(usize);

/// Handle of a triangle in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct TriangleId(usize);

/// Shared edge between two adjacent triangles, endpoints sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeData {
    a: PointId,
    b: PointId,
}

impl EdgeData {
    fn new(a: PointId, b: PointId) -> Self {
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }
}

#[derive(Debug, Clone)]
struct Triangle {
    vertices: [PointId; 3],
    circle: Circle,
}

impl Triangle {
    fn edges(&self) -> [EdgeData; 3] {
        let [a, b, c] = self.vertices;
        [EdgeData::new(a, b), EdgeData::new(b, c), EdgeData::new(c, a)]
    }

    fn has_vertex(&self, p: PointId) -> bool {
        self.vertices.contains(&p)
    }

    fn has_edge(&self, edge: EdgeData) -> bool {
        self.has_vertex(edge.a) && self.has_vertex(edge.b)
    }

    /// The vertex not on `edge`
    fn far_vertex(&self, edge: EdgeData) -> Option<PointId> {
        self.vertices
            .iter()
            .copied()
            .find(|&v| v != edge.a && v != edge.b)
    }
}

/// A triangle of the finished triangulation, in input indices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelaunayTriangle {
    pub vertices: [usize; 3],
    pub circle: Circle,
}

struct Engine {
    points: Vec<Point>,
    first_super: usize,
    triangles: Vec<Triangle>,
    adjacency: Graph<TriangleId, EdgeData>,
    pending: VecDeque<(TriangleId, TriangleId, EdgeData)>,
    flips: usize,
}

impl Engine {
    fn new(mut points: Vec<Point>) -> Self {
        let count = points.len().max(1) as f64;
        let centroid = points.iter().fold(Point::ZERO, |acc, &p| acc + p) / count;
        let spread = points
            .iter()
            .map(|&p| p.distance(centroid))
            .fold(0.0_f64, f64::max)
            .max(1.0);
        let radius = SUPER_SCALE * spread;

        // equilateral triangle whose incircle has `radius`
        let first_super = points.len();
        for k in 0..3_i32 {
            let angle = FRAC_PI_2 + f64::from(k) * 2.0 * PI / 3.0;
            points.push(centroid + Point::new(angle.cos(), angle.sin()) * (2.0 * radius));
        }

        let mut engine = Self {
            points,
            first_super,
            triangles: Vec::new(),
            adjacency: Graph::new(),
            pending: VecDeque::new(),
            flips: 0,
        };
        engine.push_triangle([
            PointId(first_super),
            PointId(first_super + 1),
            PointId(first_super + 2),
        ]);
        engine
    }

    fn is_super(&self, p: PointId) -> bool {
        p.0 >= self.first_super
    }

    fn point(&self, p: PointId) -> Point {
        self.points[p.0]
    }

    fn push_triangle(&mut self, vertices: [PointId; 3]) -> TriangleId {
        let [a, b, c] = vertices.map(|v| self.point(v));
        let id = TriangleId(self.triangles.len());
        self.triangles.push(Triangle {
            vertices,
            circle: Circle::through(a, b, c),
        });
        self.adjacency.add_node(id);
        id
    }

    fn orient(&self, a: PointId, b: PointId, c: PointId) -> f64 {
        let (a, b, c) = (self.point(a), self.point(b), self.point(c));
        (b - a).cross(c - a)
    }

    fn geometrically_contains(&self, t: TriangleId, p: Point) -> bool {
        let [a, b, c] = self.triangles[t.0].vertices.map(|v| self.point(v));
        let d1 = (b - a).cross(p - a);
        let d2 = (c - b).cross(p - b);
        let d3 = (a - c).cross(p - c);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    fn neighbour_across(&self, t: TriangleId, edge: EdgeData) -> Option<TriangleId> {
        self.adjacency
            .edges_from(t)?
            .iter()
            .find(|(_, data)| **data == edge)
            .map(|(&n, _)| n)
    }

    fn insert(&mut self, p: PointId) {
        let location = self.point(p);
        let alive: Vec<TriangleId> = self.adjacency.nodes().collect();
        let mut cavity: BTreeSet<TriangleId> = alive
            .iter()
            .copied()
            .filter(|t| self.triangles[t.0].circle.strictly_contains(location))
            .collect();
        if cavity.is_empty() {
            // only reachable through rounding: fall back to the enclosing triangle
            match alive.iter().find(|&&t| self.geometrically_contains(t, location)) {
                Some(&t) => {
                    cavity.insert(t);
                }
                None => return,
            }
        }

        let mut boundary = Vec::new();
        for &t in &cavity {
            for edge in self.triangles[t.0].edges() {
                match self.neighbour_across(t, edge) {
                    Some(n) if cavity.contains(&n) => {}
                    outer => boundary.push((edge, outer)),
                }
            }
        }
        for &t in &cavity {
            self.adjacency.remove_node(t);
        }

        let mut fan: BTreeMap<PointId, Vec<TriangleId>> = BTreeMap::new();
        for (edge, outer) in boundary {
            let id = self.push_triangle([edge.a, edge.b, p]);
            if let Some(outer) = outer {
                self.adjacency.add_undirected(id, outer, edge);
                self.pending.push_back((id, outer, edge));
            }
            fan.entry(edge.a).or_default().push(id);
            fan.entry(edge.b).or_default().push(id);
        }
        for (vertex, tris) in fan {
            if let [t1, t2] = tris[..] {
                let edge = EdgeData::new(vertex, p);
                self.adjacency.add_undirected(t1, t2, edge);
                self.pending.push_back((t1, t2, edge));
            }
        }

        while let Some((t1, t2, edge)) = self.pending.pop_front() {
            self.legalize(t1, t2, edge);
        }
    }

    /// Flip the edge between `t1` and `t2` if it is not locally Delaunay
    fn legalize(&mut self, t1: TriangleId, t2: TriangleId, edge: EdgeData) {
        if !self.adjacency.contains_edge(t1, t2) {
            return;
        }
        let (tri1, tri2) = (&self.triangles[t1.0], &self.triangles[t2.0]);
        let (Some(far1), Some(far2)) = (tri1.far_vertex(edge), tri2.far_vertex(edge)) else {
            return;
        };
        let illegal = tri1.circle.strictly_contains(self.point(far2))
            || tri2.circle.strictly_contains(self.point(far1));
        if !illegal || !self.strictly_convex(far1, edge.a, far2, edge.b) {
            return;
        }

        let n1 = self.push_triangle([far1, edge.a, far2]);
        let n2 = self.push_triangle([far1, edge.b, far2]);
        self.adjacency.add_undirected(n1, n2, EdgeData::new(far1, far2));
        for old in [t1, t2] {
            let outer: Vec<(TriangleId, EdgeData)> = self
                .adjacency
                .edges_from(old)
                .into_iter()
                .flatten()
                .filter(|(n, _)| **n != t1 && **n != t2)
                .map(|(&n, &data)| (n, data))
                .collect();
            for (other, data) in outer {
                for new in [n1, n2] {
                    if self.triangles[new.0].has_edge(data) {
                        self.adjacency.add_undirected(new, other, data);
                        self.pending.push_back((new, other, data));
                    }
                }
            }
        }
        self.adjacency.remove_node(t1);
        self.adjacency.remove_node(t2);
        self.flips += 1;
    }

    /// True if the diagonals `a-c` and `b-d` properly cross
    fn strictly_convex(&self, a: PointId, b: PointId, c: PointId, d: PointId) -> bool {
        let sides_ac = self.orient(a, c, b) * self.orient(a, c, d);
        let sides_bd = self.orient(b, d, a) * self.orient(b, d, c);
        sides_ac < 0.0 && sides_bd < 0.0
    }

    /// Surviving triangles not touching the enclosing triangle
    fn finish(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.adjacency
            .nodes()
            .map(|t| &self.triangles[t.0])
            .filter(|tri| !tri.vertices.iter().any(|&v| self.is_super(v)))
    }
}

/// Delaunay triangulation of a point set
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    points: Vec<Point>,
    triangles: Vec<DelaunayTriangle>,
    /// `(duplicate, first occurrence)` input index pairs
    duplicates: Vec<(usize, usize)>,
}

impl Triangulation {
    pub fn new(points: &[Point]) -> Self {
        let mut first_seen: HashMap<(u64, u64), usize> = HashMap::new();
        let mut distinct = Vec::new();
        let mut duplicates = Vec::new();
        for (index, p) in points.iter().enumerate() {
            let key = (p.x.to_bits(), p.y.to_bits());
            match first_seen.get(&key) {
                Some(&first) => duplicates.push((index, first)),
                None => {
                    first_seen.insert(key, index);
                    distinct.push(index);
                }
            }
        }

        let mut engine = Engine::new(distinct.iter().map(|&i| points[i]).collect());
        for id in 0..distinct.len() {
            engine.insert(PointId(id));
        }
        let triangles: Vec<DelaunayTriangle> = engine
            .finish()
            .map(|tri| DelaunayTriangle {
                vertices: tri.vertices.map(|v| distinct[v.0]),
                circle: tri.circle,
            })
            .collect();
        debug!(
            points = points.len(),
            distinct = distinct.len(),
            triangles = triangles.len(),
            flips = engine.flips,
            "triangulated"
        );

        Self {
            points: points.to_vec(),
            triangles,
            duplicates,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn triangles(&self) -> &[DelaunayTriangle] {
        &self.triangles
    }

    /// Edge graph over input indices, weighted by euclidean length
    ///
    /// Duplicate points hang off their first occurrence with a zero length
    /// edge. Points the triangles leave disconnected (collinear input) are
    /// joined to their lexicographic neighbour, so the graph always spans
    /// every input point.
    pub fn to_graph(&self) -> DistanceGraph<usize> {
        let mut graph = DistanceGraph::new();
        for index in 0..self.points.len() {
            graph.add_node(index);
        }
        for tri in &self.triangles {
            let [a, b, c] = tri.vertices;
            for (u, v) in [(a, b), (b, c), (c, a)] {
                graph.add_undirected(u, v, self.points[u].distance(self.points[v]));
            }
        }
        for &(duplicate, first) in &self.duplicates {
            graph.add_undirected(duplicate, first, 0.0);
        }

        let mut sets = DisjointSets::new();
        for (u, v, _) in graph.edges() {
            sets.union(u, v);
        }
        let duplicate_set: BTreeSet<usize> = self.duplicates.iter().map(|&(d, _)| d).collect();
        let mut order: Vec<usize> = (0..self.points.len())
            .filter(|i| !duplicate_set.contains(i))
            .collect();
        order.sort_by(|&a, &b| self.points[a].lexicographic_cmp(&self.points[b]).then(a.cmp(&b)));
        let mut repaired = 0;
        for pair in order.windows(2) {
            let (u, v) = (pair[0], pair[1]);
            if !sets.same_set(u, v) {
                sets.union(u, v);
                graph.add_undirected(u, v, self.points[u].distance(self.points[v]));
                repaired += 1;
            }
        }
        if repaired > 0 {
            debug!(repaired, "joined disconnected triangulation components");
        }
        graph
    }
}

/// Triangulate `points` and return the edge graph over their indices
pub fn triangulate(points: &[Point]) -> DistanceGraph<usize> {
    Triangulation::new(points).to_graph()
}
