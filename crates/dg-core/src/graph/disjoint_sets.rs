//! Union-find over arbitrary ordered keys

use std::collections::BTreeMap;

/// Disjoint set forest
///
/// Elements never seen before are their own singleton set. Union does no
/// rank balancing; path compression keeps lookups short in practice.
#[derive(Debug, Clone, Default)]
pub struct DisjointSets<T: Ord + Copy> {
    parent: BTreeMap<T, T>,
}

impl<T: Ord + Copy> DisjointSets<T> {
    pub fn new() -> Self {
        Self {
            parent: BTreeMap::new(),
        }
    }

    /// Representative of the set containing `x`
    pub fn find(&mut self, x: T) -> T {
        let Some(&parent) = self.parent.get(&x) else {
            return x;
        };
        if parent == x {
            return x;
        }
        let root = self.find(parent);
        self.parent.insert(x, root);
        root
    }

    /// Merge the sets of `a` and `b`, with `b`'s root becoming the new root
    pub fn union(&mut self, a: T, b: T) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent.insert(root_a, root_b);
        }
    }

    pub fn same_set(&mut self, a: T, b: T) -> bool {
        self.find(a) == self.find(b)
    }

    pub fn clear(&mut self) {
        self.parent.clear();
    }
}
