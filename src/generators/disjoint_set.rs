/// Union-find over cell indices, with path compression and union by rank.
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// One singleton set per element in `0..size`.
    pub fn new(size: usize) -> Self {
        DisjointSet {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        // Iterative so long chains can't blow the stack before compression kicks in
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets containing `x` and `y`.
    /// Returns `false` if they were already the same set.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false; // Already in same set
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        true
    }

    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut sets = DisjointSet::new(4);
        assert!((0..4).all(|i| sets.find(i) == i));
        assert!(!sets.connected(0, 1));
    }

    #[test]
    fn test_union_and_cycle_detection() {
        let mut sets = DisjointSet::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(1, 2));
        assert!(sets.union(3, 4));
        assert!(sets.connected(0, 2));
        assert!(!sets.connected(2, 3));
        // Joining two members of the same set would close a cycle
        assert!(!sets.union(0, 2));
        assert!(sets.union(2, 4));
        assert!(sets.connected(0, 3));
    }

    #[test]
    fn test_long_chain() {
        let n = 100_000;
        let mut sets = DisjointSet::new(n);
        for i in 1..n {
            sets.union(i - 1, i);
        }
        assert!(sets.connected(0, n - 1));
    }
}
