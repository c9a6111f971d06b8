use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::attribute::{Attribute, AttributeClass};
use super::operator::{Operator, OperatorKind};
use super::variable::Variable;

/// Stable index of a node inside its [`NodeArena`](super::NodeArena).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Bare vertex with no payload.
    Plain,
    Variable(Variable),
    Operator(Operator),
}

/// Node-type predicate used by pattern queries.
///
/// `OperatorKind` is the narrowest form: it matches only operators of that
/// exact kind, while `Operator` matches every operator and `Node` matches
/// everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    Node,
    Variable,
    Operator,
    OperatorKind(OperatorKind),
}

impl NodeType {
    pub fn matches(&self, kind: &NodeKind) -> bool {
        match (self, kind) {
            (NodeType::Node, _) => true,
            (NodeType::Variable, NodeKind::Variable(_)) => true,
            (NodeType::Operator, NodeKind::Operator(_)) => true,
            (NodeType::OperatorKind(expected), NodeKind::Operator(op)) => op.kind() == expected,
            _ => false,
        }
    }
}

pub type Adjacency = SmallVec<[NodeId; 4]>;

#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    seq: u64,
    kind: NodeKind,
    prevs: Adjacency,
    nexts: Adjacency,
    attributes: Vec<Attribute>,
}

impl Node {
    pub(crate) fn new(name: String, seq: u64, kind: NodeKind) -> Self {
        Self {
            name,
            seq,
            kind,
            prevs: Adjacency::new(),
            nexts: Adjacency::new(),
            attributes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation sequence number; strictly increasing within an arena.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            NodeKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<&Operator> {
        match &self.kind {
            NodeKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub(crate) fn as_operator_mut(&mut self) -> Option<&mut Operator> {
        match &mut self.kind {
            NodeKind::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable(_))
    }

    pub fn is_operator(&self) -> bool {
        matches!(self.kind, NodeKind::Operator(_))
    }

    pub fn prevs(&self) -> &[NodeId] {
        &self.prevs
    }

    pub fn nexts(&self) -> &[NodeId] {
        &self.nexts
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn has_attribute(&self, class: &AttributeClass) -> bool {
        self.attributes
            .iter()
            .any(|attribute| class.matches(&attribute.kind))
    }

    pub(crate) fn push_prev(&mut self, node: NodeId) {
        if !self.prevs.contains(&node) {
            self.prevs.push(node);
        }
    }

    pub(crate) fn push_next(&mut self, node: NodeId) {
        if !self.nexts.contains(&node) {
            self.nexts.push(node);
        }
    }

    pub(crate) fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }
}
