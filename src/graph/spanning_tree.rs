use std::cmp::Ordering;

/// Rooted tree over node ids, stored as one ordered child list per node.
/// Nodes which are not reachable from the root have no entry in the tree.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    root: usize,
    children: Vec<Vec<usize>>,
    in_tree: Vec<bool>,
}

impl SpanningTree {
    /// Builds the tree hanging from `root` out of undirected edges.
    /// Children keep the order in which their edges were given.
    pub fn from_edges(root: usize, node_count: usize, edges: &[(usize, usize)]) -> Self {
        assert!(root < node_count, "Root {} is not a node.", root);

        let mut neighbors = vec![Vec::new(); node_count];
        for &(a, b) in edges {
            neighbors[a].push(b);
            neighbors[b].push(a);
        }

        let mut children = vec![Vec::new(); node_count];
        let mut in_tree = vec![false; node_count];
        in_tree[root] = true;
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            for &child in neighbors[parent].iter() {
                if !in_tree[child] {
                    in_tree[child] = true;
                    children[parent].push(child);
                    stack.push(child);
                }
            }
        }

        SpanningTree {
            root,
            children,
            in_tree,
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn children(&self, id: usize) -> &[usize] {
        &self.children[id]
    }

    pub fn contains(&self, id: usize) -> bool {
        self.in_tree.get(id).copied().unwrap_or(false)
    }

    /// Returns the number of nodes hanging in the tree, root included.
    pub fn order(&self) -> usize {
        self.in_tree.iter().filter(|&&x| x).count()
    }

    /// Returns the number of parent-child links.
    pub fn size(&self) -> usize {
        self.children.iter().map(Vec::len).sum()
    }

    /// Depth first walk below the root. Siblings are visited in ascending priority.
    /// A node is only emitted if it is flagged in `visiting`, but its subtree is walked either way.
    /// The root itself is not emitted.
    pub fn preorder(&self, priorities: &[f64], visiting: &[bool]) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.children.len());
        let mut stack = self.sorted_children(self.root, priorities);
        stack.reverse();

        while let Some(id) = stack.pop() {
            if visiting[id] {
                order.push(id);
            }

            let mut below = self.sorted_children(id, priorities);
            below.reverse();
            stack.append(&mut below);
        }

        order
    }

    fn sorted_children(&self, id: usize, priorities: &[f64]) -> Vec<usize> {
        let mut sorted = self.children[id].clone();
        sorted.sort_by(|a, b| {
            priorities[*a]
                .partial_cmp(&priorities[*b])
                .unwrap_or(Ordering::Equal)
        });
        sorted
    }
}
