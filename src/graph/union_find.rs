//! Disjoint-set forest.
//!
//! # Algorithm
//! Path compression (halving) in `find`, union by rank in `union`.
//! Both run in amortized O(α(n)).
//!
//! # Reference
//! Tarjan (1975), "Efficiency of a Good But Not Linear Set Union Algorithm"

/// Disjoint sets over `0..n`.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest is empty.
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merges the sets of `a` and `b`. Returns `false` if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }

    /// Groups elements by set, ordered by each set's smallest element.
    /// Elements within a group are ascending.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for x in 0..n {
            let root = self.find(x);
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(x);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut ds = DisjointSet::new(3);
        assert_eq!(ds.len(), 3);
        assert_ne!(ds.find(0), ds.find(1));
        assert_eq!(ds.groups(), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_union_transitive() {
        let mut ds = DisjointSet::new(5);
        assert!(ds.union(0, 3));
        assert!(ds.union(3, 4));
        assert!(!ds.union(4, 0));
        assert_eq!(ds.find(0), ds.find(4));
        assert_ne!(ds.find(1), ds.find(2));
        assert_eq!(ds.groups(), vec![vec![0, 3, 4], vec![1], vec![2]]);
    }

    #[test]
    fn test_long_chain_compresses() {
        let n = 1000;
        let mut ds = DisjointSet::new(n);
        for i in 1..n {
            ds.union(i - 1, i);
        }
        let root = ds.find(0);
        assert!((0..n).all(|i| ds.find(i) == root));
        assert_eq!(ds.groups().len(), 1);
    }

    #[test]
    fn test_empty() {
        let mut ds = DisjointSet::new(0);
        assert!(ds.is_empty());
        assert!(ds.groups().is_empty());
    }
}
