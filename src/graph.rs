mod edge;
mod error;
pub mod import;
mod spanning_tree;
mod union_find;
mod weighted_graph;

pub use edge::Edge;
pub use error::GraphError;
pub use spanning_tree::SpanningTree;
pub use union_find::UnionFind;
pub use weighted_graph::WeightedGraph;
