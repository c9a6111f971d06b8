use thiserror::Error;

use crate::graph::{GraphError, NodeId, OperatorKind};

/// Errors raised while turning operators into kernels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("malformed template at byte {offset}: {reason}")]
    MalformedTemplate { offset: usize, reason: String },
    #[error("template loads `{name}` but no buffer or value is registered under that name")]
    UnknownBufferName { name: String },
    #[error("`{name}` is already registered with this injector")]
    DuplicateBufferName { name: String },
    #[error("placeholder `{placeholder}` was left unresolved in kernel `{symbol}`")]
    UnresolvedPlaceholder { symbol: String, placeholder: String },
    #[error("entry symbol `{symbol}` has no source")]
    MissingEntry { symbol: String },
    #[error("no kernel handler registered for operator kind `{kind}`")]
    MissingHandler { kind: OperatorKind },
    #[error("no buffer assigned to variable {variable:?}")]
    MissingBuffer { variable: NodeId },
    #[error("operator {operator:?} has no `{slot}` slot")]
    MissingSlot { operator: NodeId, slot: String },
    #[error("operator {operator:?} has no `{name}` parameter")]
    MissingParameter { operator: NodeId, name: String },
    #[error("operator {operator:?}: invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        operator: NodeId,
        name: String,
        reason: String,
    },
    #[error("no value supplied for unresolved symbol `{symbol}`")]
    UnresolvedSymbol { symbol: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type CodegenResult<T> = Result<T, CodegenError>;
