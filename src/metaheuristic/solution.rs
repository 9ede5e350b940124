use crate::graph::WeightedGraph;

use std::collections::HashSet;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Cost and reward collected by walking a route once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteValue {
    pub cost: f64,
    pub reward: u32,
    /// Some arc was walked twice, in either direction.
    pub double_use: bool,
}

/// An ordered walk through the graph, given by its node ids.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Solution {
    node_list: Vec<usize>,
}

impl Solution {
    pub fn from_nodes(nodes: Vec<usize>) -> Self {
        Solution { node_list: nodes }
    }

    pub fn insert_node(&mut self, position: usize, node: usize) {
        self.node_list.insert(position, node);
    }

    pub fn extend<I: IntoIterator<Item = usize>>(&mut self, nodes: I) {
        self.node_list.extend(nodes);
    }

    pub fn first(&self) -> Option<usize> {
        self.node_list.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.node_list.last().copied()
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.node_list
            .iter()
            .zip(self.node_list.iter().skip(1))
            .map(|(from, to)| (*from, *to))
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = &usize> + '_ {
        self.node_list.iter()
    }

    pub fn nodes(&self) -> &[usize] {
        &self.node_list
    }

    /// Sums the cost of every step. The reward of an arc is only collected the
    /// first time it or its reverse is walked.
    pub fn value(&self, graph: &WeightedGraph) -> RouteValue {
        let mut used = HashSet::new();
        let mut value = RouteValue {
            cost: 0.0,
            reward: 0,
            double_use: false,
        };

        for (from, to) in self.iter_edges() {
            let edge = graph.edge(from, to);
            value.cost += edge.cost();
            if used.insert((from.min(to), from.max(to))) {
                value.reward = value.reward.saturating_add(edge.reward());
            } else {
                value.double_use = true;
            }
        }

        value
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.node_list
                .iter()
                .map(|x| format!("{}", x))
                .collect::<Vec<String>>()
                .join(" -> ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn node_list() -> Vec<usize> {
        vec![0, 1, 2, 1, 0]
    }

    fn valid_solution() -> Solution {
        Solution {
            node_list: node_list(),
        }
    }

    fn line_graph() -> WeightedGraph {
        let mut graph = WeightedGraph::new(3, 0);
        graph.add_edge(0, 1, 1.0, 4);
        graph.add_edge(1, 0, 1.5, 4);
        graph.add_edge(1, 2, 2.0, 3);
        graph.add_edge(2, 1, 2.0, 3);
        graph
    }

    #[test]
    fn iter_edges_works() {
        let solution = valid_solution();
        let edges: Vec<(usize, usize)> = solution.iter_edges().collect();

        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 1), (1, 0)]);
    }

    #[test]
    fn insert_node_works() {
        let mut solution = Solution::from_nodes(vec![0, 2]);
        solution.insert_node(1, 1);
        solution.extend(vec![0]);

        assert_eq!(solution.nodes(), &[0, 1, 2, 0]);
        assert_eq!(solution.first(), Some(0));
        assert_eq!(solution.last(), Some(0));
    }

    #[test]
    fn empty_solution_has_no_edges() {
        let solution = Solution::default();

        assert!(solution.nodes().is_empty());
        assert_eq!(solution.iter_edges().count(), 0);
        assert_eq!(solution.last(), None);
    }

    #[test]
    fn value_counts_reversed_arc_once() {
        let graph = line_graph();
        let value = valid_solution().value(&graph);

        assert!(approx_eq!(f64, value.cost, 6.5), "Every step costs.");
        assert_eq!(value.reward, 7, "Each arc pair pays once.");
        assert!(value.double_use, "Arcs were walked back.");
    }

    #[test]
    fn value_of_simple_path() {
        let graph = line_graph();
        let value = Solution::from_nodes(vec![0, 1, 2]).value(&graph);

        assert!(approx_eq!(f64, value.cost, 3.0));
        assert_eq!(value.reward, 7);
        assert!(!value.double_use);
    }

    #[test]
    fn display_joins_nodes() {
        assert_eq!(format!("{}", valid_solution()), "0 -> 1 -> 2 -> 1 -> 0");
    }
}
