use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::order::Axis;

/// Tag kinds that passes attach to nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Input,
    Output,
    Constant,
    Inplace,
    Elementwise,
    Axiswise(Axis),
    Tag(String),
}

impl AttributeKind {
    pub fn class(&self) -> AttributeClass {
        match self {
            AttributeKind::Input => AttributeClass::Input,
            AttributeKind::Output => AttributeClass::Output,
            AttributeKind::Constant => AttributeClass::Constant,
            AttributeKind::Inplace => AttributeClass::Inplace,
            AttributeKind::Elementwise => AttributeClass::Elementwise,
            AttributeKind::Axiswise(_) => AttributeClass::Axiswise,
            AttributeKind::Tag(name) => AttributeClass::Tag(name.clone()),
        }
    }
}

/// Payload-free attribute predicate. `Any` matches every attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeClass {
    Any,
    Input,
    Output,
    Constant,
    Inplace,
    Elementwise,
    Axiswise,
    Tag(String),
}

impl AttributeClass {
    pub fn matches(&self, kind: &AttributeKind) -> bool {
        match self {
            AttributeClass::Any => true,
            AttributeClass::Tag(name) => matches!(kind, AttributeKind::Tag(tag) if tag == name),
            class => *class == kind.class(),
        }
    }
}

/// A tag attached to one node, optionally describing another node.
///
/// `base` is a plain reference; it creates no adjacency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub base: Option<NodeId>,
}

impl Attribute {
    pub fn new(kind: AttributeKind) -> Self {
        Self { kind, base: None }
    }

    pub fn describing(kind: AttributeKind, base: NodeId) -> Self {
        Self {
            kind,
            base: Some(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_matching_ignores_payload() {
        let axiswise = AttributeKind::Axiswise(Axis::C);
        assert!(AttributeClass::Axiswise.matches(&axiswise));
        assert!(AttributeClass::Any.matches(&axiswise));
        assert!(!AttributeClass::Elementwise.matches(&axiswise));
    }

    #[test]
    fn tags_match_by_name() {
        let tag = AttributeKind::Tag("fused".to_string());
        assert!(AttributeClass::Tag("fused".to_string()).matches(&tag));
        assert!(!AttributeClass::Tag("other".to_string()).matches(&tag));
    }
}
