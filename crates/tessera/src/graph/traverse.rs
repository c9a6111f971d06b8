//! Boundary-aware membership, deterministic ordering and chain pattern search.
//!
//! Membership follows path validity: a node belongs to a graph when it lies on
//! some path from a declared input to a declared output whose interior avoids
//! declared boundaries, unless the caller opts into seeing through them.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt::Write;

use log::{debug, trace, warn};

use super::arena::NodeArena;
use super::attribute::AttributeClass;
use super::boundary::Graph;
use super::node::{Node, NodeId, NodeKind, NodeType};

/// Which declared boundaries a path may cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraverseOptions {
    pub ignore_internal_input_bound: bool,
    pub ignore_internal_output_bound: bool,
}

impl Default for TraverseOptions {
    fn default() -> Self {
        Self {
            ignore_internal_input_bound: false,
            ignore_internal_output_bound: true,
        }
    }
}

impl TraverseOptions {
    pub fn new(ignore_internal_input_bound: bool, ignore_internal_output_bound: bool) -> Self {
        Self {
            ignore_internal_input_bound,
            ignore_internal_output_bound,
        }
    }
}

/// True when any attribute on `node` belongs to `class`.
pub fn check_attribute_match(node: &Node, class: &AttributeClass) -> bool {
    node.has_attribute(class)
}

/// True when `node`'s variant satisfies `ty`.
pub fn check_node_type_match(node: &Node, ty: &NodeType) -> bool {
    ty.matches(node.kind())
}

/// Keeps the nodes carrying an attribute of `class`, preserving input order.
pub fn filter_nodes(arena: &NodeArena, nodes: &[NodeId], class: &AttributeClass) -> Vec<NodeId> {
    nodes
        .iter()
        .copied()
        .filter(|id| {
            arena
                .get(*id)
                .is_some_and(|node| check_attribute_match(node, class))
        })
        .collect()
}

fn sort_key(arena: &NodeArena, id: NodeId) -> (u64, &str, NodeId) {
    let node = &arena[id];
    (node.seq(), node.name(), id)
}

/// Orders nodes by creation sequence, then name.
pub fn sort_nodes(arena: &NodeArena, nodes: &[NodeId]) -> Vec<NodeId> {
    let mut sorted: Vec<NodeId> = nodes
        .iter()
        .copied()
        .filter(|id| arena.contains(*id))
        .collect();
    sorted.sort_by(|a, b| sort_key(arena, *a).cmp(&sort_key(arena, *b)));
    sorted.dedup();
    sorted
}

/// Members of `graph` under the default boundary flags (internal inputs
/// block, internal outputs are crossed).
pub fn listup_nodes(arena: &NodeArena, graph: &Graph) -> Vec<NodeId> {
    listup_nodes_with(arena, graph, TraverseOptions::default())
}

/// Members of `graph` in topological order, ties broken by [`sort_nodes`]
/// order.
pub fn listup_nodes_with(arena: &NodeArena, graph: &Graph, options: TraverseOptions) -> Vec<NodeId> {
    let passable = |id: NodeId| {
        let blocked_input = graph.is_input(id) && !options.ignore_internal_input_bound;
        let blocked_output = graph.is_output(id) && !options.ignore_internal_output_bound;
        !blocked_input && !blocked_output
    };

    let forward = reach(arena, graph.inputs(), Node::nexts, &passable);
    let backward = reach(arena, graph.outputs(), Node::prevs, &passable);

    let mut members = vec![false; arena.len()];
    for &boundary in graph.inputs().iter().chain(graph.outputs()) {
        if let Some(member) = members.get_mut(boundary.index()) {
            *member = true;
        }
    }
    for (idx, member) in members.iter_mut().enumerate() {
        let id = NodeId(idx as u32);
        if forward[idx] && backward[idx] && passable(id) {
            *member = true;
        }
    }

    let ordered = topological_order(arena, &members);
    debug!(
        "listup_nodes: {} of {} nodes are members (ignore_input={}, ignore_output={})",
        ordered.len(),
        arena.len(),
        options.ignore_internal_input_bound,
        options.ignore_internal_output_bound
    );
    ordered
}

/// Nodes reachable from `starts` along `step`, expanding only through
/// passable nodes. Start nodes are expanded unconditionally but are not
/// marked unless reached from another start.
fn reach<F>(
    arena: &NodeArena,
    starts: &[NodeId],
    step: fn(&Node) -> &[NodeId],
    passable: &F,
) -> Vec<bool>
where
    F: Fn(NodeId) -> bool,
{
    let mut seen = vec![false; arena.len()];
    let mut expanded = vec![false; arena.len()];
    let mut stack: Vec<NodeId> = starts
        .iter()
        .copied()
        .filter(|id| arena.contains(*id))
        .collect();
    while let Some(current) = stack.pop() {
        if std::mem::replace(&mut expanded[current.index()], true) {
            continue;
        }
        for &next in step(&arena[current]) {
            trace!("reach: {current:?} -> {next:?}");
            seen[next.index()] = true;
            if passable(next) && !expanded[next.index()] {
                stack.push(next);
            }
        }
    }
    seen
}

fn topological_order(arena: &NodeArena, members: &[bool]) -> Vec<NodeId> {
    let is_member = |id: NodeId| members.get(id.index()).copied().unwrap_or(false);
    let mut in_degree = vec![0usize; arena.len()];
    let mut ready = BinaryHeap::new();
    for (id, node) in arena.iter() {
        if !is_member(id) {
            continue;
        }
        in_degree[id.index()] = node.prevs().iter().filter(|prev| is_member(**prev)).count();
        if in_degree[id.index()] == 0 {
            ready.push(Reverse(sort_key(arena, id)));
        }
    }

    let total = members.iter().filter(|member| **member).count();
    let mut ordered = Vec::with_capacity(total);
    while let Some(Reverse((_, _, id))) = ready.pop() {
        ordered.push(id);
        for &next in arena[id].nexts() {
            if !is_member(next) {
                continue;
            }
            in_degree[next.index()] -= 1;
            if in_degree[next.index()] == 0 {
                ready.push(Reverse(sort_key(arena, next)));
            }
        }
    }

    if ordered.len() < total {
        warn!(
            "listup_nodes: {} member nodes sit on a cycle; appending them in creation order",
            total - ordered.len()
        );
        let placed: HashSet<NodeId> = ordered.iter().copied().collect();
        let rest: Vec<NodeId> = (0..arena.len())
            .map(|idx| NodeId(idx as u32))
            .filter(|id| is_member(*id) && !placed.contains(id))
            .collect();
        ordered.extend(sort_nodes(arena, &rest));
    }
    ordered
}

pub fn listup_operators(arena: &NodeArena, graph: &Graph) -> Vec<NodeId> {
    listup_nodes(arena, graph)
        .into_iter()
        .filter(|id| arena[*id].is_operator())
        .collect()
}

pub fn listup_variables(arena: &NodeArena, graph: &Graph) -> Vec<NodeId> {
    listup_nodes(arena, graph)
        .into_iter()
        .filter(|id| arena[*id].is_variable())
        .collect()
}

/// One element of a chain pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Node(NodeType),
    Attribute(AttributeClass),
}

impl Query {
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Query::Node(ty) => check_node_type_match(node, ty),
            Query::Attribute(class) => check_attribute_match(node, class),
        }
    }
}

impl From<NodeType> for Query {
    fn from(value: NodeType) -> Self {
        Query::Node(value)
    }
}

impl From<AttributeClass> for Query {
    fn from(value: AttributeClass) -> Self {
        Query::Attribute(value)
    }
}

/// How a partial match extends past a node with several successors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Every successor that satisfies the next query forks its own match.
    #[default]
    AllBranches,
    /// A partial match whose tail has more than one member successor is
    /// dropped.
    UniqueSuccessor,
}

/// Every chain `n0 -> n1 -> ... -> nk` of graph members with `ni` matching
/// `pattern[i]`. Overlapping matches are all reported.
pub fn search_sub_structure(
    arena: &NodeArena,
    graph: &Graph,
    pattern: &[Query],
) -> Vec<Vec<NodeId>> {
    search_sub_structure_with(arena, graph, pattern, MatchPolicy::default())
}

pub fn search_sub_structure_with(
    arena: &NodeArena,
    graph: &Graph,
    pattern: &[Query],
    policy: MatchPolicy,
) -> Vec<Vec<NodeId>> {
    let Some((head, rest)) = pattern.split_first() else {
        return Vec::new();
    };
    let members = listup_nodes(arena, graph);
    let member_set: HashSet<NodeId> = members.iter().copied().collect();

    let mut partial: Vec<Vec<NodeId>> = sort_nodes(arena, &members)
        .into_iter()
        .filter(|id| head.matches(&arena[*id]))
        .map(|id| vec![id])
        .collect();

    for query in rest {
        let mut extended = Vec::new();
        for chain in partial {
            let Some(&tail) = chain.last() else {
                continue;
            };
            let successors: Vec<NodeId> = arena[tail]
                .nexts()
                .iter()
                .copied()
                .filter(|next| member_set.contains(next))
                .collect();
            if policy == MatchPolicy::UniqueSuccessor && successors.len() > 1 {
                trace!("search_sub_structure: dropping chain at branching node {tail:?}");
                continue;
            }
            for next in sort_nodes(arena, &successors) {
                if query.matches(&arena[next]) {
                    let mut grown = chain.clone();
                    grown.push(next);
                    extended.push(grown);
                }
            }
        }
        partial = extended;
        if partial.is_empty() {
            break;
        }
    }

    debug!(
        "search_sub_structure: {} match(es) for a {}-node pattern",
        partial.len(),
        pattern.len()
    );
    partial
}

/// One line per member node, in traversal order.
pub fn dump_graph(arena: &NodeArena, graph: &Graph) -> String {
    let mut out = String::new();
    for id in listup_nodes(arena, graph) {
        let node = &arena[id];
        let kind = match node.kind() {
            NodeKind::Plain => "node".to_string(),
            NodeKind::Variable(variable) => {
                format!("variable{:?} order={}", variable.shape(), variable.order())
            }
            NodeKind::Operator(op) => format!("operator({})", op.kind()),
        };
        let _ = writeln!(
            out,
            "{id:?} `{}` {kind} prevs={:?} nexts={:?}",
            node.name(),
            node.prevs(),
            node.nexts()
        );
    }
    out
}
