use decorum::N64;
use std::collections::BTreeMap;

use crate::graph::{Edge, GraphError, SpanningTree, UnionFind};

/// Directed graph with a cost and a reward per arc and a designated start node.
///
/// Node ids are dense in `0..size`. Asking for a node outside of that range panics,
/// since it can only be caused by a broken caller.
///
/// Before any path related query, `analyze` has to be called once. It fills the
/// all-pairs tables (cheapest cost, reward along that path and first hop) and
/// optionally builds a minimum spanning tree rooted at the start node.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    start: usize,
    adjacency: Vec<BTreeMap<usize, Edge>>,
    min_costs: Vec<Vec<f64>>,
    max_rewards: Vec<Vec<u32>>,
    paths: Vec<Vec<usize>>,
    blacklist: Vec<usize>,
    spanning_tree: Option<SpanningTree>,
    analyzed: bool,
}

impl WeightedGraph {
    /// Creates a graph with `size` nodes and no arcs.
    /// Panics if the graph would be empty or `start` is not one of its nodes.
    pub fn new(size: usize, start: usize) -> Self {
        assert!(size != 0, "A graph needs at least one node.");
        assert!(start < size, "Start node {} is not in the graph.", start);

        WeightedGraph {
            start,
            adjacency: vec![BTreeMap::new(); size],
            min_costs: Vec::new(),
            max_rewards: Vec::new(),
            paths: Vec::new(),
            blacklist: Vec::new(),
            spanning_tree: None,
            analyzed: false,
        }
    }

    /// Same as `new`, but reports invalid dimensions instead of panicking.
    pub fn try_new(size: usize, start: usize) -> Result<Self, GraphError> {
        if size == 0 {
            return Err(GraphError::EmptyGraph);
        } else if start >= size {
            return Err(GraphError::InvalidStart(start));
        }

        Ok(WeightedGraph::new(size, start))
    }

    /// Inserts a directed arc, replacing any arc between the same nodes.
    /// Costs are not validated; negative costs are the callers responsibility.
    pub fn add_edge(&mut self, from: usize, to: usize, cost: f64, reward: u32) {
        assert!(to < self.size(), "Node {} is not in the graph.", to);
        self.adjacency[from].insert(to, Edge::new(cost, reward));
    }

    pub fn try_add_edge(
        &mut self,
        from: usize,
        to: usize,
        cost: f64,
        reward: u32,
    ) -> Result<(), GraphError> {
        if from >= self.size() {
            return Err(GraphError::MissingNode(from));
        } else if to >= self.size() {
            return Err(GraphError::MissingNode(to));
        }

        self.add_edge(from, to, cost, reward);
        Ok(())
    }

    /// Computes the all-pairs tables and the blacklist, and the spanning tree if requested.
    /// Calling it again recomputes everything from scratch.
    pub fn analyze(&mut self, build_mst: bool) {
        self.floyd_warshall();
        self.spanning_tree = if build_mst {
            Some(self.kruskal())
        } else {
            None
        };
        self.analyzed = true;
    }

    fn floyd_warshall(&mut self) {
        let n = self.size();
        let mut d = vec![vec![f64::INFINITY; n]; n];
        let mut m = vec![vec![0; n]; n];
        let mut p = vec![vec![n; n]; n];

        for (i, arcs) in self.adjacency.iter().enumerate() {
            for (j, edge) in arcs.iter() {
                let j = *j;
                d[i][j] = edge.cost();
                m[i][j] = edge.reward();
                p[i][j] = j;
            }
        }

        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let through_k = d[i][k] + d[k][j];
                    if d[i][j] > through_k {
                        d[i][j] = through_k;
                        m[i][j] = m[i][k].saturating_add(m[k][j]);
                        p[i][j] = p[i][k];
                    }
                }
            }
        }

        // staying on a node is never a move
        for i in 0..n {
            d[i][i] = f64::INFINITY;
            m[i][i] = 0;
            p[i][i] = n;
        }

        self.blacklist = d
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().all(|cost| cost.is_infinite()))
            .map(|(i, _)| i)
            .collect();
        self.min_costs = d;
        self.max_rewards = m;
        self.paths = p;
    }

    fn kruskal(&self) -> SpanningTree {
        // every undirected edge once, seen from its lower id
        let mut candidates: Vec<(usize, usize, f64)> = self
            .adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, arcs)| {
                arcs.iter()
                    .filter(move |(j, edge)| i < **j && edge.exists())
                    .map(move |(j, edge)| (i, *j, edge.cost()))
            })
            .collect();
        candidates.sort_by_key(|&(_, _, cost)| N64::from_inner(cost));

        let mut uf = UnionFind::new(self.size());
        let selected: Vec<(usize, usize)> = candidates
            .into_iter()
            .filter(|&(a, b, _)| uf.unite(a, b))
            .map(|(a, b, _)| (a, b))
            .collect();

        SpanningTree::from_edges(self.start, self.size(), &selected)
    }

    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns a copy of the arc, or an infinitely expensive arc without reward if there is none.
    pub fn edge(&self, from: usize, to: usize) -> Edge {
        assert!(to < self.size(), "Node {} is not in the graph.", to);
        self.adjacency[from]
            .get(&to)
            .copied()
            .unwrap_or_else(Edge::missing)
    }

    /// Returns an iterator over all arcs in the form (from, to, edge).
    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, usize, Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, arcs)| arcs.iter().map(move |(j, edge)| (i, *j, *edge)))
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    pub fn min_cost(&self, from: usize, to: usize) -> f64 {
        self.assert_analyzed();
        self.min_costs[from][to]
    }

    pub fn max_reward(&self, from: usize, to: usize) -> u32 {
        self.assert_analyzed();
        self.max_rewards[from][to]
    }

    /// Nodes which can't reach any node, themselves included.
    pub fn blacklist(&self) -> &[usize] {
        self.assert_analyzed();
        &self.blacklist
    }

    pub fn spanning_tree(&self) -> Option<&SpanningTree> {
        self.spanning_tree.as_ref()
    }

    /// Returns the nodes of the cheapest path from `from` to `to`, excluding `from`.
    /// The result is empty if `to` can't be reached.
    pub fn best_path(&self, from: usize, to: usize) -> Vec<usize> {
        self.assert_analyzed();
        let sentinel = self.size();
        let mut path = Vec::new();
        if self.paths[from][to] == sentinel {
            return path;
        }

        let mut current = from;
        // a negative cycle could keep the table from ever reaching `to`
        while current != to && path.len() < sentinel {
            current = self.paths[current][to];
            path.push(current);
        }

        path
    }

    /// Walks the spanning tree in preorder, children sorted by `priorities`,
    /// emitting only nodes flagged in `visiting`, and returns to the start node.
    /// Panics if `analyze` was not asked to build the tree.
    pub fn preorder(&self, priorities: &[f64], visiting: &[bool]) -> Vec<usize> {
        let tree = match &self.spanning_tree {
            Some(tree) => tree,
            None => panic!("Spanning tree was not built, call analyze(true) first."),
        };

        let mut order = tree.preorder(priorities, visiting);
        order.push(self.start);
        order
    }

    fn assert_analyzed(&self) {
        assert!(self.analyzed, "Graph has to be analyzed before querying paths.");
    }
}
