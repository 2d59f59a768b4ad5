//! Generic graphs keyed by node value
//!
//! A [`Graph`] stores, for every node, the outgoing and incoming edges keyed by
//! the neighbour. All maps are ordered so iteration, and therefore every
//! algorithm built on it, is deterministic.

mod disjoint_sets;
mod distance;

pub use disjoint_sets::DisjointSets;
pub use distance::DistanceGraph;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone)]
struct Node<N, E> {
    outgoing: BTreeMap<N, E>,
    incoming: BTreeMap<N, E>,
}

impl<N, E> Default for Node<N, E> {
    fn default() -> Self {
        Self {
            outgoing: BTreeMap::new(),
            incoming: BTreeMap::new(),
        }
    }
}

/// Directed multigraph with at most one edge per ordered pair
#[derive(Debug, Clone)]
pub struct Graph<N, E> {
    nodes: BTreeMap<N, Node<N, E>>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }
}

impl<N: Ord + Copy, E: Clone> Graph<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn add_node(&mut self, node: N) {
        self.nodes.entry(node).or_default();
    }

    /// Add an edge from `src` to `dst`
    ///
    /// An existing edge between the same ordered pair keeps its payload.
    pub fn add_directed(&mut self, src: N, dst: N, edge: E) {
        self.nodes
            .entry(src)
            .or_default()
            .outgoing
            .entry(dst)
            .or_insert_with(|| edge.clone());
        self.nodes
            .entry(dst)
            .or_default()
            .incoming
            .entry(src)
            .or_insert(edge);
    }

    /// Add edges in both directions sharing the same payload
    pub fn add_undirected(&mut self, a: N, b: N, edge: E) {
        self.add_directed(a, b, edge.clone());
        self.add_directed(b, a, edge);
    }

    pub fn remove_directed(&mut self, src: N, dst: N) {
        if !self.nodes.contains_key(&src) || !self.nodes.contains_key(&dst) {
            return;
        }
        if let Some(node) = self.nodes.get_mut(&src) {
            node.outgoing.remove(&dst);
        }
        if let Some(node) = self.nodes.get_mut(&dst) {
            node.incoming.remove(&src);
        }
    }

    pub fn remove_undirected(&mut self, a: N, b: N) {
        self.remove_directed(a, b);
        self.remove_directed(b, a);
    }

    /// Remove a node together with every edge touching it
    pub fn remove_node(&mut self, node: N) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        for dst in removed.outgoing.keys() {
            if let Some(other) = self.nodes.get_mut(dst) {
                other.incoming.remove(&node);
            }
        }
        for src in removed.incoming.keys() {
            if let Some(other) = self.nodes.get_mut(src) {
                other.outgoing.remove(&node);
            }
        }
    }

    pub fn contains_node(&self, node: N) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn contains_edge(&self, src: N, dst: N) -> bool {
        self.nodes
            .get(&src)
            .is_some_and(|node| node.outgoing.contains_key(&dst))
    }

    /// True if an edge exists in either direction
    pub fn connected(&self, a: N, b: N) -> bool {
        self.contains_edge(a, b) || self.contains_edge(b, a)
    }

    pub fn find_edge(&self, src: N, dst: N) -> Option<&E> {
        self.nodes.get(&src)?.outgoing.get(&dst)
    }

    /// Outgoing edges of `src`, or None for an unknown node
    pub fn edges_from(&self, src: N) -> Option<&BTreeMap<N, E>> {
        self.nodes.get(&src).map(|node| &node.outgoing)
    }

    /// Incoming edges of `dst`, or None for an unknown node
    pub fn edges_to(&self, dst: N) -> Option<&BTreeMap<N, E>> {
        self.nodes.get(&dst).map(|node| &node.incoming)
    }

    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.keys().copied()
    }

    /// Every directed edge as `(src, dst, payload)`
    pub fn edges(&self) -> impl Iterator<Item = (N, N, &E)> + '_ {
        self.nodes.iter().flat_map(|(&src, node)| {
            node.outgoing.iter().map(move |(&dst, edge)| (src, dst, edge))
        })
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.outgoing.len()).sum()
    }

    pub fn for_each_node(&self, mut on_node: impl FnMut(N)) {
        for node in self.nodes() {
            on_node(node);
        }
    }

    pub fn for_each_edge(&self, mut on_edge: impl FnMut(N, N, &E)) {
        for (src, dst, edge) in self.edges() {
            on_edge(src, dst, edge);
        }
    }

    /// Copy of the graph where every edge also exists in reverse
    pub fn undirected(&self) -> Self {
        let mut ret = Self::new();
        for node in self.nodes() {
            ret.add_node(node);
        }
        for (src, dst, edge) in self.edges() {
            ret.add_undirected(src, dst, edge.clone());
        }
        ret
    }

    fn resolve_seed(&self, seed: Option<N>) -> Option<N> {
        match seed {
            Some(node) => self.contains_node(node).then_some(node),
            None => self.nodes.keys().next().copied(),
        }
    }

    /// Visit the component of `seed` depth first, ignoring edge direction
    ///
    /// `seed` of None starts from the smallest node. `on_node` runs once per
    /// reached node; `on_edge` runs once for the edge that discovered each
    /// node, with the edge's own orientation.
    pub fn traverse_depth_first(
        &self,
        seed: Option<N>,
        mut on_node: impl FnMut(N),
        mut on_edge: impl FnMut(N, N, &E),
    ) {
        let Some(seed) = self.resolve_seed(seed) else {
            return;
        };
        let mut visited = BTreeSet::from([seed]);
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            on_node(current);
            self.discover(current, &mut visited, &mut on_edge, |n| stack.push(n));
        }
    }

    /// Visit the component of `seed` breadth first, ignoring edge direction
    ///
    /// Same callback contract as [`Graph::traverse_depth_first`].
    pub fn traverse_breadth_first(
        &self,
        seed: Option<N>,
        mut on_node: impl FnMut(N),
        mut on_edge: impl FnMut(N, N, &E),
    ) {
        let Some(seed) = self.resolve_seed(seed) else {
            return;
        };
        let mut visited = BTreeSet::from([seed]);
        let mut queue = VecDeque::from([seed]);
        while let Some(current) = queue.pop_front() {
            on_node(current);
            self.discover(current, &mut visited, &mut on_edge, |n| queue.push_back(n));
        }
    }

    fn discover(
        &self,
        current: N,
        visited: &mut BTreeSet<N>,
        on_edge: &mut impl FnMut(N, N, &E),
        mut schedule: impl FnMut(N),
    ) {
        let Some(node) = self.nodes.get(&current) else {
            return;
        };
        for (&dst, edge) in &node.outgoing {
            if visited.insert(dst) {
                on_edge(current, dst, edge);
                schedule(dst);
            }
        }
        for (&src, edge) in &node.incoming {
            if visited.insert(src) {
                on_edge(src, current, edge);
                schedule(src);
            }
        }
    }

    /// Nodes reachable from `seed`, ignoring edge direction
    pub fn reachable_from(&self, seed: N) -> BTreeSet<N> {
        let mut reached = BTreeSet::new();
        self.traverse_breadth_first(
            Some(seed),
            |n| {
                reached.insert(n);
            },
            |_, _, _| {},
        );
        reached
    }
}

/// Serialized as the node list plus `(src, dst, payload)` triples
impl<N: Ord + Copy + Serialize, E: Serialize> Serialize for Graph<N, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a, N, E> {
            nodes: Vec<N>,
            edges: Vec<(N, N, &'a E)>,
        }

        let repr = Repr {
            nodes: self.nodes.keys().copied().collect(),
            edges: self
                .nodes
                .iter()
                .flat_map(|(&src, node)| node.outgoing.iter().map(move |(&dst, e)| (src, dst, e)))
                .collect(),
        };
        repr.serialize(serializer)
    }
}

impl<N: Ord + Copy + fmt::Display, E: fmt::Display> fmt::Display for Graph<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "edges {{")?;
        for (src, node) in &self.nodes {
            for (dst, edge) in &node.outgoing {
                writeln!(f, "  {src} -> {dst} [{edge}]")?;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph<u32, &'static str> {
        let mut g = Graph::new();
        g.add_directed(1, 2, "a");
        g.add_directed(2, 3, "b");
        g.add_directed(4, 3, "c");
        g.add_node(9);
        g
    }

    #[test]
    fn test_add_directed_keeps_first_payload() {
        let mut g = Graph::new();
        g.add_directed(1, 2, 5);
        g.add_directed(1, 2, 7);
        assert_eq!(g.find_edge(1, 2), Some(&5));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_undirected_edges() {
        let mut g = Graph::new();
        g.add_undirected(1, 2, 1.5);
        assert!(g.contains_edge(1, 2));
        assert!(g.contains_edge(2, 1));
        g.remove_directed(1, 2);
        assert!(!g.contains_edge(1, 2));
        assert!(g.contains_edge(2, 1));
        assert!(g.connected(1, 2));
        g.remove_undirected(2, 1);
        assert!(!g.connected(1, 2));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut g = sample();
        g.remove_node(3);
        assert!(!g.contains_node(3));
        assert_eq!(g.edges_from(2).map(BTreeMap::len), Some(0));
        assert_eq!(g.edges_from(4).map(BTreeMap::len), Some(0));
        assert_eq!(g.edge_count(), 1);
        g.remove_node(42);
        assert_eq!(g.len(), 4);
    }

    #[test]
    fn test_edges_iterate_in_key_order() {
        let g = sample();
        let edges: Vec<_> = g.edges().map(|(s, d, e)| (s, d, *e)).collect();
        assert_eq!(edges, vec![(1, 2, "a"), (2, 3, "b"), (4, 3, "c")]);
        assert!(g.edges_from(5).is_none());
    }

    #[test]
    fn test_traversal_ignores_direction() {
        let g = sample();
        let mut dfs = Vec::new();
        let mut tree = Vec::new();
        g.traverse_depth_first(None, |n| dfs.push(n), |s, d, _| tree.push((s, d)));
        assert_eq!(dfs.len(), 4);
        assert_eq!(dfs[0], 1);
        assert!(!dfs.contains(&9));
        assert_eq!(tree, vec![(1, 2), (2, 3), (4, 3)]);

        let mut bfs = Vec::new();
        g.traverse_breadth_first(Some(3), |n| bfs.push(n), |_, _, _| {});
        assert_eq!(bfs, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_traversal_from_unknown_seed_is_empty() {
        let g = sample();
        let mut seen = 0;
        g.traverse_breadth_first(Some(100), |_| seen += 1, |_, _, _| {});
        assert_eq!(seen, 0);
        assert_eq!(g.reachable_from(9), BTreeSet::from([9]));
    }

    #[test]
    fn test_undirected_copy() {
        let g = sample().undirected();
        assert!(g.contains_edge(3, 4));
        assert!(g.contains_node(9));
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn test_display_lists_edges() {
        let text = sample().to_string();
        assert!(text.contains("1 -> 2 [a]"));
        assert!(text.contains("4 -> 3 [c]"));
    }

    #[test]
    fn test_serialize_as_nodes_and_edges() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["nodes"], serde_json::json!([1, 2, 3, 4, 9]));
        assert_eq!(json["edges"][0], serde_json::json!([1, 2, "a"]));
    }
}
