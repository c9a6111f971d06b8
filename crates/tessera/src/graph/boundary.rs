use super::arena::NodeArena;
use super::error::{GraphError, GraphResult};
use super::node::NodeId;

/// Declared entry and exit points of a traced subgraph.
///
/// A `Graph` does not list its members; [`listup_nodes`](super::listup_nodes)
/// derives them from the boundaries on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
}

impl Graph {
    /// Declares a graph over nodes of `arena`; every boundary must exist there.
    pub fn new(arena: &NodeArena, inputs: Vec<NodeId>, outputs: Vec<NodeId>) -> GraphResult<Self> {
        for &node in inputs.iter().chain(outputs.iter()) {
            if !arena.contains(node) {
                return Err(GraphError::UnknownNode { node });
            }
        }
        Ok(Self { inputs, outputs })
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    pub fn is_input(&self, node: NodeId) -> bool {
        self.inputs.contains(&node)
    }

    pub fn is_output(&self, node: NodeId) -> bool {
        self.outputs.contains(&node)
    }
}
