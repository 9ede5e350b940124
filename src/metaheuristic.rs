pub mod pso;
mod solution;
mod supervisor;

use crate::graph::WeightedGraph;
pub use pso::Pso;
pub use solution::{RouteValue, Solution};
pub use supervisor::{Message, MessageInfo};

/// The graph to optimize on together with the feasibility window [c_min, c_max]
/// the cost of a route has to fall into.
#[derive(Debug, Clone, Copy)]
pub struct ProblemInstance<'a> {
    graph: &'a WeightedGraph,
    c_min: f64,
    c_max: f64,
}

impl<'a> ProblemInstance<'a> {
    pub fn new(graph: &'a WeightedGraph, c_min: f64, c_max: f64) -> Self {
        ProblemInstance {
            graph,
            c_min,
            c_max,
        }
    }

    pub fn graph(&self) -> &'a WeightedGraph {
        self.graph
    }

    pub fn c_min(&self) -> f64 {
        self.c_min
    }

    pub fn c_max(&self) -> f64 {
        self.c_max
    }
}
