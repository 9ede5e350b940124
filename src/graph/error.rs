use std::error::Error;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum GraphError {
    EmptyGraph,
    InvalidStart(usize),
    MissingNode(usize),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGraph => write!(f, "A graph needs at least one node."),
            Self::InvalidStart(id) => write!(f, "Start node {} is not in the graph.", id),
            Self::MissingNode(id) => write!(f, "Node {} is not in the graph.", id),
        }
    }
}

impl Error for GraphError {}
