use std::ops::Index;

use log::trace;

use super::attribute::Attribute;
use super::error::{GraphError, GraphResult};
use super::node::{Node, NodeId, NodeKind};
use super::operator::Operator;
use super::variable::Variable;

/// Owner of every node of one compile.
///
/// Nodes reference each other by [`NodeId`]; adjacency is kept mirrored, so
/// an edge `a -> b` always appears in both `a.nexts()` and `b.prevs()`.
/// Edges are only ever added.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    next_seq: u64,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.get(id).ok_or(GraphError::UnknownNode { node: id })
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx as u32), node))
    }

    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(name.into(), NodeKind::Plain)
    }

    pub fn add_variable(&mut self, name: impl Into<String>, variable: Variable) -> NodeId {
        self.insert(name.into(), NodeKind::Variable(variable))
    }

    pub fn add_operator(&mut self, name: impl Into<String>, operator: Operator) -> NodeId {
        self.insert(name.into(), NodeKind::Operator(operator))
    }

    fn insert(&mut self, name: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!("created node {id:?} `{name}` (seq {seq})");
        self.nodes.push(Node::new(name, seq, kind));
        id
    }

    pub fn variable(&self, id: NodeId) -> GraphResult<&Variable> {
        self.node(id)?
            .as_variable()
            .ok_or(GraphError::NotAVariable { node: id })
    }

    pub fn operator(&self, id: NodeId) -> GraphResult<&Operator> {
        self.node(id)?
            .as_operator()
            .ok_or(GraphError::NotAnOperator { node: id })
    }

    pub fn operator_mut(&mut self, id: NodeId) -> GraphResult<&mut Operator> {
        self.nodes
            .get_mut(id.index())
            .ok_or(GraphError::UnknownNode { node: id })?
            .as_operator_mut()
            .ok_or(GraphError::NotAnOperator { node: id })
    }

    /// Adds the edge `from -> to`. Adding an existing edge is a no-op.
    ///
    /// A variable accepts at most one producer.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> GraphResult<()> {
        self.node(from)?;
        let target = self.node(to)?;
        if target.is_variable() {
            if let Some(&producer) = target.prevs().first() {
                if producer != from {
                    return Err(GraphError::MultipleProducers {
                        variable: to,
                        producer,
                        rejected: from,
                    });
                }
            }
        }
        self.nodes[from.index()].push_next(to);
        self.nodes[to.index()].push_prev(from);
        Ok(())
    }

    /// Binds `variable` to the input slot `slot` of `operator`.
    pub fn append_input(
        &mut self,
        operator: NodeId,
        slot: impl Into<String>,
        variable: NodeId,
    ) -> GraphResult<()> {
        let slot = slot.into();
        if self.operator(operator)?.input(&slot).is_some() {
            return Err(GraphError::DuplicateSlot { operator, slot });
        }
        self.variable(variable)?;
        self.connect(variable, operator)?;
        self.operator_mut(operator)?.push_input(slot, variable);
        Ok(())
    }

    /// Binds `variable` to the output slot `slot` of `operator`, making the
    /// operator its producer.
    pub fn append_output(
        &mut self,
        operator: NodeId,
        slot: impl Into<String>,
        variable: NodeId,
    ) -> GraphResult<()> {
        let slot = slot.into();
        if self.operator(operator)?.output(&slot).is_some() {
            return Err(GraphError::DuplicateSlot { operator, slot });
        }
        self.variable(variable)?;
        self.connect(operator, variable)?;
        self.operator_mut(operator)?.push_output(slot, variable);
        Ok(())
    }

    pub fn attach(&mut self, node: NodeId, attribute: Attribute) -> GraphResult<()> {
        self.nodes
            .get_mut(node.index())
            .ok_or(GraphError::UnknownNode { node })?
            .push_attribute(attribute);
        Ok(())
    }

    /// The operator producing `variable`, if any.
    pub fn producer(&self, variable: NodeId) -> Option<NodeId> {
        let node = self.get(variable)?;
        if node.is_variable() {
            node.prevs().first().copied()
        } else {
            None
        }
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
