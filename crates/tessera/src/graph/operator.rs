use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::order::Axis;

/// Associative accumulations supported by axis reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReduceKind {
    Prod,
    Sum,
    Max,
    Min,
}

impl ReduceKind {
    pub const ALL: [ReduceKind; 4] = [
        ReduceKind::Prod,
        ReduceKind::Sum,
        ReduceKind::Max,
        ReduceKind::Min,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ReduceKind::Prod => "prod",
            ReduceKind::Sum => "sum",
            ReduceKind::Max => "max",
            ReduceKind::Min => "min",
        }
    }

    /// Identity element of the accumulation.
    pub fn identity(self) -> f32 {
        match self {
            ReduceKind::Prod => 1.0,
            ReduceKind::Sum => 0.0,
            ReduceKind::Max => f32::NEG_INFINITY,
            ReduceKind::Min => f32::INFINITY,
        }
    }

    pub fn combine(self, acc: f32, value: f32) -> f32 {
        match self {
            ReduceKind::Prod => acc * value,
            ReduceKind::Sum => acc + value,
            ReduceKind::Max => acc.max(value),
            ReduceKind::Min => acc.min(value),
        }
    }
}

/// Closed set of operator kinds; handlers are registered per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Generic,
    Reduce(ReduceKind),
    Custom(String),
}

impl OperatorKind {
    pub fn label(&self) -> &str {
        match self {
            OperatorKind::Generic => "operator",
            OperatorKind::Reduce(kind) => kind.label(),
            OperatorKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Parameter {
    Int(i64),
    Float(f64),
    Bool(bool),
    Axis(Axis),
}

/// Operator payload: named input/output slots plus static parameters.
///
/// Slots keep insertion order so handlers and dumps see them the way the
/// graph was assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    kind: OperatorKind,
    inputs: Vec<(String, NodeId)>,
    outputs: Vec<(String, NodeId)>,
    parameters: BTreeMap<String, Parameter>,
}

impl Operator {
    pub fn new(kind: OperatorKind) -> Self {
        Self {
            kind,
            inputs: Vec::new(),
            outputs: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: Parameter) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn kind(&self) -> &OperatorKind {
        &self.kind
    }

    pub fn inputs(&self) -> &[(String, NodeId)] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[(String, NodeId)] {
        &self.outputs
    }

    pub fn input(&self, slot: &str) -> Option<NodeId> {
        lookup_slot(&self.inputs, slot)
    }

    pub fn output(&self, slot: &str) -> Option<NodeId> {
        lookup_slot(&self.outputs, slot)
    }

    pub fn parameters(&self) -> &BTreeMap<String, Parameter> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: Parameter) {
        self.parameters.insert(name.into(), value);
    }

    pub(crate) fn push_input(&mut self, slot: String, variable: NodeId) {
        self.inputs.push((slot, variable));
    }

    pub(crate) fn push_output(&mut self, slot: String, variable: NodeId) {
        self.outputs.push((slot, variable));
    }
}

fn lookup_slot(slots: &[(String, NodeId)], slot: &str) -> Option<NodeId> {
    slots
        .iter()
        .find(|(name, _)| name == slot)
        .map(|(_, node)| *node)
}
