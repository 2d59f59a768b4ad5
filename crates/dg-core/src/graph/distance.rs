//! Weighted graph algorithms
//!
//! Kruskal spanning trees, A* search and longest paths over graphs whose edge
//! payload is a distance.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{DisjointSets, Graph};
use crate::error::GraphError;

/// A graph whose edges carry a distance
pub type DistanceGraph<N> = Graph<N, f64>;

impl<N: Ord + Copy> Graph<N, f64> {
    /// Kruskal minimal spanning tree
    ///
    /// Edges keep their original orientation. A disconnected input yields a
    /// spanning forest. Every node of `self` is present in the result.
    pub fn minimal_spanning_tree(&self) -> Self {
        let mut sorted: Vec<(N, N, f64)> = self.edges().map(|(s, d, w)| (s, d, *w)).collect();
        sorted.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut tree = Self::new();
        for node in self.nodes() {
            tree.add_node(node);
        }
        let wanted = self.len().saturating_sub(1);
        let mut sets = DisjointSets::new();
        let mut taken = 0;
        for (src, dst, weight) in sorted {
            if taken >= wanted {
                break;
            }
            if sets.same_set(src, dst) {
                continue;
            }
            sets.union(src, dst);
            tree.add_directed(src, dst, weight);
            taken += 1;
        }
        tree
    }

    /// A* search following outgoing edges
    ///
    /// The returned path includes both `src` and `dst`. Ties on f-score go to
    /// the smallest node.
    pub fn a_star(&self, src: N, dst: N, heuristic: impl Fn(N, N) -> f64) -> Option<Vec<N>> {
        if !self.contains_node(src) {
            return None;
        }
        let mut open = BTreeSet::from([src]);
        let mut came_from: BTreeMap<N, N> = BTreeMap::new();
        let mut g_score = BTreeMap::from([(src, 0.0)]);
        let mut f_score = BTreeMap::from([(src, heuristic(src, dst))]);

        while let Some(current) = arg_min(&open, &f_score) {
            if current == dst {
                return Some(reconstruct_path(src, dst, &came_from));
            }
            open.remove(&current);
            let g_current = g_score.get(&current).copied().unwrap_or(f64::INFINITY);
            for (&next, &weight) in self.edges_from(current).into_iter().flatten() {
                let tentative = g_current + weight;
                if tentative < g_score.get(&next).copied().unwrap_or(f64::INFINITY) {
                    came_from.insert(next, current);
                    g_score.insert(next, tentative);
                    f_score.insert(next, tentative + heuristic(next, dst));
                    open.insert(next);
                }
            }
        }
        None
    }

    /// Dijkstra: A* with a zero heuristic
    pub fn shortest_path(&self, src: N, dst: N) -> Option<Vec<N>> {
        self.a_star(src, dst, |_, _| 0.0)
    }

    /// Summed edge weights along `path`; a missing edge counts as infinite
    pub fn total_distance(&self, path: &[N]) -> f64 {
        path.windows(2)
            .map(|pair| self.find_edge(pair[0], pair[1]).copied().unwrap_or(f64::INFINITY))
            .sum()
    }

    /// True if the graph, viewed undirected, has no cycle
    ///
    /// An edge present in both directions counts once.
    pub fn is_forest(&self) -> bool {
        let mut sets = DisjointSets::new();
        for (src, dst, _) in self.edges() {
            if src > dst && self.contains_edge(dst, src) {
                continue;
            }
            if sets.same_set(src, dst) {
                return false;
            }
            sets.union(src, dst);
        }
        true
    }

    /// Copy of the component of `src` with every edge pointing away from
    /// `src` and its weight negated
    fn negated_away_from(&self, src: N) -> Self {
        let view = self.undirected();
        let mut oriented = Self::new();
        oriented.add_node(src);
        let mut visited = BTreeSet::from([src]);
        let mut queue = VecDeque::from([src]);
        while let Some(current) = queue.pop_front() {
            for (&next, &weight) in view.edges_from(current).into_iter().flatten() {
                if visited.insert(next) {
                    oriented.add_directed(current, next, -weight);
                    queue.push_back(next);
                }
            }
        }
        oriented
    }

    /// Longest simple path from `src` to `dst`
    ///
    /// Only defined on forests, where it is the unique path between the two
    /// nodes. Returns `Ok(None)` if `dst` is unreachable.
    pub fn longest_path(&self, src: N, dst: N) -> Result<Option<Vec<N>>, GraphError> {
        if !self.is_forest() {
            return Err(GraphError::Cyclic);
        }
        if !self.contains_node(src) {
            return Ok(None);
        }
        Ok(self.negated_away_from(src).shortest_path(src, dst))
    }

    /// Longest path between any two distinct nodes
    ///
    /// The first pair found wins ties. Returns `Ok(None)` when no two nodes
    /// are connected.
    pub fn longest_path_global(&self) -> Result<Option<Vec<N>>, GraphError> {
        if !self.is_forest() {
            return Err(GraphError::Cyclic);
        }
        let view = self.undirected();
        let mut best: Option<(f64, Vec<N>)> = None;
        for src in self.nodes() {
            let oriented = self.negated_away_from(src);
            for dst in self.nodes() {
                if src == dst {
                    continue;
                }
                let Some(path) = oriented.shortest_path(src, dst) else {
                    continue;
                };
                let length = view.total_distance(&path);
                if best.as_ref().is_none_or(|(longest, _)| length > *longest) {
                    best = Some((length, path));
                }
            }
        }
        Ok(best.map(|(_, path)| path))
    }
}

fn arg_min<N: Ord + Copy>(open: &BTreeSet<N>, score: &BTreeMap<N, f64>) -> Option<N> {
    let mut best: Option<(N, f64)> = None;
    for &node in open {
        let value = score.get(&node).copied().unwrap_or(f64::INFINITY);
        if best.is_none_or(|(_, min)| value < min) {
            best = Some((node, value));
        }
    }
    best.map(|(node, _)| node)
}

fn reconstruct_path<N: Ord + Copy>(src: N, dst: N, came_from: &BTreeMap<N, N>) -> Vec<N> {
    let mut path = vec![dst];
    let mut current = dst;
    while current != src {
        let Some(&prev) = came_from.get(&current) else {
            break;
        };
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
