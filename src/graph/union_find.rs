/// Disjoint sets over the node ids `0..len`, merged by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        UnionFind {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    /// Returns the representative of the set containing `x`.
    /// Every node on the way up is pointed directly at the root afterwards.
    pub fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }

        root
    }

    /// Merges the sets of `x` and `y`.
    /// Returns false if they already were in the same set.
    pub fn unite(&mut self, x: usize, y: usize) -> bool {
        let x_root = self.find(x);
        let y_root = self.find(y);
        if x_root == y_root {
            return false;
        }

        if self.rank[x_root] < self.rank[y_root] {
            self.parent[x_root] = y_root;
        } else if self.rank[x_root] > self.rank[y_root] {
            self.parent[y_root] = x_root;
        } else {
            self.parent[y_root] = x_root;
            self.rank[x_root] += 1;
        }

        true
    }

    /// Returns the amount of disjoint sets left.
    pub fn count_roots(&self) -> usize {
        self.parent
            .iter()
            .enumerate()
            .filter(|(i, parent)| i == *parent)
            .count()
    }
}
