//! Operator graph model and the boundary-aware traversal engine.
//!
//! Nodes live in a [`NodeArena`] and reference each other by [`NodeId`]. A
//! [`Graph`] only records declared inputs and outputs; its members are
//! computed on demand by [`listup_nodes`].

mod arena;
mod attribute;
mod boundary;
mod error;
mod node;
mod operator;
mod order;
mod traverse;
mod variable;

pub use arena::NodeArena;
pub use attribute::{Attribute, AttributeClass, AttributeKind};
pub use boundary::Graph;
pub use error::{GraphError, GraphResult};
pub use node::{Adjacency, Node, NodeId, NodeKind, NodeType};
pub use operator::{Operator, OperatorKind, Parameter, ReduceKind};
pub use order::{Axis, Order};
pub use traverse::{
    check_attribute_match, check_node_type_match, dump_graph, filter_nodes, listup_nodes,
    listup_nodes_with, listup_operators, listup_variables, search_sub_structure,
    search_sub_structure_with, sort_nodes, MatchPolicy, Query, TraverseOptions,
};
pub use variable::Variable;
