use thiserror::Error;

use super::node::NodeId;
use super::order::Axis;

/// Errors raised while assembling an operator graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {node:?} does not exist in this arena")]
    UnknownNode { node: NodeId },
    #[error("variable {variable:?} is already produced by {producer:?}; {rejected:?} cannot produce it too")]
    MultipleProducers {
        variable: NodeId,
        producer: NodeId,
        rejected: NodeId,
    },
    #[error("node {node:?} is not a variable")]
    NotAVariable { node: NodeId },
    #[error("node {node:?} is not an operator")]
    NotAnOperator { node: NodeId },
    #[error("operator {operator:?} already has a slot named `{slot}`")]
    DuplicateSlot { operator: NodeId, slot: String },
    #[error("shape has rank {shape_rank} but order `{order}` has rank {order_rank}")]
    RankMismatch {
        shape_rank: usize,
        order_rank: usize,
        order: String,
    },
    #[error("axis {axis} appears more than once in an order")]
    DuplicateAxis { axis: Axis },
}

pub type GraphResult<T> = Result<T, GraphError>;
