use std::error::Error;
use std::fmt;

use crate::graph::GraphError;

#[derive(Debug, PartialEq)]
pub enum ImportError {
    MissingFile(String),
    InvalidFormat(String),
    Graph(GraphError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile(file) => write!(f, "Missing file: {}", file),
            Self::InvalidFormat(msg) => write!(f, "Invalid format on file: {}", msg),
            Self::Graph(err) => write!(f, "Invalid graph: {}", err),
        }
    }
}

impl Error for ImportError {}

impl From<GraphError> for ImportError {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}
