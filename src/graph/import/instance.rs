use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::graph::import::ImportError;
use crate::graph::WeightedGraph;

/// A problem instance as read from disk. The graph is not analyzed yet.
#[derive(Debug, Clone)]
pub struct Instance {
    pub c_min: f64,
    pub c_max: f64,
    pub graph: WeightedGraph,
}

/// Reads an instance file, see `parse_instance` for the format.
pub fn import_instance(path: &Path) -> Result<Instance, ImportError> {
    if !path.exists() {
        return Err(ImportError::MissingFile(path.display().to_string()));
    }

    let content = fs::read_to_string(path)
        .map_err(|err| ImportError::InvalidFormat(format!("{}: {}", path.display(), err)))?;
    parse_instance(&content)
}

/// Parses whitespace separated tokens:
/// `Cmin Cmax V E S0` followed by `E` arcs of the form `id from to cost reward`.
/// Node ids in the text start at 1 and are shifted to start at 0.
pub fn parse_instance(content: &str) -> Result<Instance, ImportError> {
    let mut tokens = content.split_whitespace();

    let c_min: f64 = next_token(&mut tokens, "Cmin")?;
    let c_max: f64 = next_token(&mut tokens, "Cmax")?;
    let node_count: usize = next_token(&mut tokens, "node count")?;
    let edge_count: usize = next_token(&mut tokens, "edge count")?;
    let start = one_based(next_token(&mut tokens, "start node")?, "start node")?;

    let mut graph = WeightedGraph::try_new(node_count, start)?;
    for i in 0..edge_count {
        let _id: usize = next_token(&mut tokens, "arc id")?;
        let from = one_based(next_token(&mut tokens, "arc origin")?, "arc origin")?;
        let to = one_based(next_token(&mut tokens, "arc destination")?, "arc destination")?;
        let cost: f64 = next_token(&mut tokens, "arc cost")?;
        let reward: u32 = next_token(&mut tokens, "arc reward")?;

        if !cost.is_finite() {
            return Err(ImportError::InvalidFormat(format!("arc {} has no valid cost", i + 1)));
        }
        graph.try_add_edge(from, to, cost, reward)?;
    }

    Ok(Instance {
        c_min,
        c_max,
        graph,
    })
}

fn next_token<'a, T: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<T, ImportError> {
    let token = tokens
        .next()
        .ok_or_else(|| ImportError::InvalidFormat(format!("missing {}", what)))?;

    token
        .parse()
        .map_err(|_| ImportError::InvalidFormat(format!("{} is not a valid {}", token, what)))
}

fn one_based(id: usize, what: &str) -> Result<usize, ImportError> {
    id.checked_sub(1)
        .ok_or_else(|| ImportError::InvalidFormat(format!("{} ids start at 1", what)))
}
