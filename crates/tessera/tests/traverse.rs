use rstest::rstest;
use tessera::graph::{
    check_attribute_match, check_node_type_match, dump_graph, filter_nodes, listup_nodes,
    listup_nodes_with, listup_operators, listup_variables, search_sub_structure,
    search_sub_structure_with, sort_nodes, Attribute, AttributeClass, AttributeKind, Graph,
    MatchPolicy, NodeArena, NodeId, NodeType, Operator, OperatorKind, Order, Query,
    TraverseOptions, Variable,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_kind() -> OperatorKind {
    OperatorKind::Custom("test".to_string())
}

fn variable(arena: &mut NodeArena, name: &str, channels: usize) -> NodeId {
    let var = Variable::new(vec![1, channels], Order::nc()).expect("nc variable");
    arena.add_variable(name, var)
}

struct Fixture {
    arena: NodeArena,
    graph: Graph,
    v0: NodeId,
    v1: NodeId,
    v2: NodeId,
    v3: NodeId,
    op1: NodeId,
    op2: NodeId,
    op3: NodeId,
}

/// v0 --[op1]--> v1 --[op2]--> v2 --[op3]--> v3
fn sequential() -> Fixture {
    let mut arena = NodeArena::new();
    let v0 = variable(&mut arena, "v0", 1);
    let op1 = arena.add_operator("op1", Operator::new(OperatorKind::Generic));
    let v1 = variable(&mut arena, "v1", 2);
    let op2 = arena.add_operator("op2", Operator::new(test_kind()));
    let v2 = variable(&mut arena, "v2", 3);
    let op3 = arena.add_operator("op3", Operator::new(OperatorKind::Generic));
    let v3 = variable(&mut arena, "v3", 4);

    arena.append_input(op1, "v0", v0).expect("op1 input");
    arena.append_output(op1, "v1", v1).expect("op1 output");
    arena.append_input(op2, "v1", v1).expect("op2 input");
    arena.append_output(op2, "v2", v2).expect("op2 output");
    arena.append_input(op3, "v2", v2).expect("op3 input");
    arena.append_output(op3, "v3", v3).expect("op3 output");

    let graph = Graph::new(&arena, vec![v0], vec![v3]).expect("graph");
    Fixture {
        arena,
        graph,
        v0,
        v1,
        v2,
        v3,
        op1,
        op2,
        op3,
    }
}

/// v0 --[op1]--> v1 -+----------------+--[op3]--> v3
///                   +--[op2]--> v2 --+
fn residual() -> Fixture {
    let mut arena = NodeArena::new();
    let v0 = variable(&mut arena, "v0", 1);
    let op1 = arena.add_operator("op1", Operator::new(OperatorKind::Generic));
    let v1 = variable(&mut arena, "v1", 2);
    let op2 = arena.add_operator("op2", Operator::new(test_kind()));
    let v2 = variable(&mut arena, "v2", 3);
    let op3 = arena.add_operator("op3", Operator::new(OperatorKind::Generic));
    let v3 = variable(&mut arena, "v3", 4);

    arena.append_input(op1, "v0", v0).expect("op1 input");
    arena.append_output(op1, "v1", v1).expect("op1 output");
    arena.append_input(op2, "v1", v1).expect("op2 input");
    arena.append_output(op2, "v2", v2).expect("op2 output");
    arena.append_input(op3, "v1", v1).expect("op3 input v1");
    arena.append_input(op3, "v2", v2).expect("op3 input v2");
    arena.append_output(op3, "v3", v3).expect("op3 output");

    let graph = Graph::new(&arena, vec![v0], vec![v3]).expect("graph");
    Fixture {
        arena,
        graph,
        v0,
        v1,
        v2,
        v3,
        op1,
        op2,
        op3,
    }
}

#[test]
fn attribute_match_checks_attached_kinds() {
    let mut f = sequential();
    let first = AttributeKind::Tag("first".to_string());
    let second = AttributeKind::Tag("second".to_string());
    f.arena
        .attach(f.op1, Attribute::describing(first, f.op2))
        .expect("attach");
    f.arena
        .attach(f.op2, Attribute::describing(second, f.op2))
        .expect("attach");

    let class = AttributeClass::Tag("first".to_string());
    assert!(check_attribute_match(&f.arena[f.op1], &class));
    assert!(!check_attribute_match(&f.arena[f.op2], &class));
    assert!(check_attribute_match(&f.arena[f.op2], &AttributeClass::Any));
    assert!(!check_attribute_match(&f.arena[f.op3], &AttributeClass::Any));
}

#[test]
fn node_type_match_respects_operator_kind() {
    let f = sequential();
    let test_op = NodeType::OperatorKind(test_kind());
    assert!(!check_node_type_match(&f.arena[f.op1], &test_op));
    assert!(check_node_type_match(&f.arena[f.op2], &test_op));
    assert!(check_node_type_match(&f.arena[f.op2], &NodeType::Operator));
    assert!(check_node_type_match(&f.arena[f.v1], &NodeType::Node));
    assert!(!check_node_type_match(&f.arena[f.v1], &NodeType::Operator));
}

#[test]
fn search_finds_overlapping_chains() {
    init_logging();
    let f = sequential();
    let pattern = [
        Query::Node(NodeType::Operator),
        Query::Node(NodeType::Variable),
        Query::Node(NodeType::Operator),
    ];
    let matches = search_sub_structure(&f.arena, &f.graph, &pattern);
    assert_eq!(matches, vec![vec![f.op1, f.v1, f.op2], vec![f.op2, f.v2, f.op3]]);
}

#[test]
fn search_matches_the_full_chain() {
    let f = sequential();
    let pattern: Vec<Query> = [
        NodeType::Operator,
        NodeType::Variable,
        NodeType::Operator,
        NodeType::Variable,
        NodeType::Operator,
    ]
    .into_iter()
    .map(Query::from)
    .collect();
    let matches = search_sub_structure(&f.arena, &f.graph, &pattern);
    assert_eq!(matches, vec![vec![f.op1, f.v1, f.op2, f.v2, f.op3]]);
}

#[test]
fn search_accepts_attribute_queries() {
    let mut f = sequential();
    f.arena
        .attach(f.op2, Attribute::new(AttributeKind::Elementwise))
        .expect("attach");
    let pattern = [
        Query::from(AttributeClass::Elementwise),
        Query::from(NodeType::Variable),
    ];
    let matches = search_sub_structure(&f.arena, &f.graph, &pattern);
    assert_eq!(matches, vec![vec![f.op2, f.v2]]);
}

#[test]
fn empty_pattern_yields_no_matches() {
    let f = sequential();
    assert!(search_sub_structure(&f.arena, &f.graph, &[]).is_empty());
}

#[test]
fn branching_reports_every_branch_by_default() {
    let f = residual();
    let pattern = [Query::from(NodeType::Variable), Query::from(NodeType::Operator)];
    let matches = search_sub_structure(&f.arena, &f.graph, &pattern);
    assert_eq!(
        matches,
        vec![
            vec![f.v0, f.op1],
            vec![f.v1, f.op2],
            vec![f.v1, f.op3],
            vec![f.v2, f.op3],
        ]
    );
}

#[test]
fn unique_successor_policy_drops_branching_matches() {
    let f = residual();
    let pattern = [Query::from(NodeType::Variable), Query::from(NodeType::Operator)];
    let matches =
        search_sub_structure_with(&f.arena, &f.graph, &pattern, MatchPolicy::UniqueSuccessor);
    assert_eq!(matches, vec![vec![f.v0, f.op1], vec![f.v2, f.op3]]);
}

#[test]
fn filter_nodes_keeps_tagged_nodes_in_order() {
    let mut f = sequential();
    let tag = AttributeKind::Tag("first".to_string());
    f.arena
        .attach(f.op1, Attribute::describing(tag.clone(), f.op1))
        .expect("attach");
    f.arena
        .attach(f.op2, Attribute::describing(tag, f.op2))
        .expect("attach");

    let ops = filter_nodes(
        &f.arena,
        &[f.op1, f.op2, f.op3],
        &AttributeClass::Tag("first".to_string()),
    );
    assert_eq!(ops, vec![f.op1, f.op2]);
}

#[test]
fn listup_sequential() {
    init_logging();
    let f = sequential();
    assert_eq!(
        listup_nodes(&f.arena, &f.graph),
        vec![f.v0, f.op1, f.v1, f.op2, f.v2, f.op3, f.v3]
    );
    assert_eq!(
        listup_operators(&f.arena, &f.graph),
        vec![f.op1, f.op2, f.op3]
    );
    assert_eq!(
        listup_variables(&f.arena, &f.graph),
        vec![f.v0, f.v1, f.v2, f.v3]
    );
}

#[test]
fn listup_residual() {
    let f = residual();
    assert_eq!(
        listup_nodes(&f.arena, &f.graph),
        vec![f.v0, f.op1, f.v1, f.op2, f.v2, f.op3, f.v3]
    );
    assert_eq!(
        listup_operators(&f.arena, &f.graph),
        vec![f.op1, f.op2, f.op3]
    );
    assert_eq!(
        listup_variables(&f.arena, &f.graph),
        vec![f.v0, f.v1, f.v2, f.v3]
    );
}

#[test]
fn listup_stops_at_hidden_outputs() {
    let mut arena = NodeArena::new();
    let v0 = variable(&mut arena, "v0", 1);
    let op1 = arena.add_operator("op1", Operator::new(OperatorKind::Generic));
    let v1 = variable(&mut arena, "v1", 2);
    let op2 = arena.add_operator("op2", Operator::new(test_kind()));
    let v2 = variable(&mut arena, "v2", 3);
    let op3 = arena.add_operator("op3", Operator::new(OperatorKind::Generic));
    let v3 = variable(&mut arena, "v3", 4);

    arena.append_input(op1, "v0", v0).expect("op1 input");
    arena.append_output(op1, "v1", v1).expect("op1 output");
    arena.append_input(op2, "v1", v1).expect("op2 input");
    arena.append_output(op2, "v2", v2).expect("op2 output");
    arena.append_input(op3, "v2", v2).expect("op3 input");
    arena.append_output(op3, "v3", v3).expect("op3 output");

    let graph = Graph::new(&arena, vec![v0], vec![v1, v2]).expect("graph");
    assert_eq!(listup_nodes(&arena, &graph), vec![v0, op1, v1, op2, v2]);
}

#[test]
fn sort_nodes_follows_creation_order() {
    let mut arena = NodeArena::new();
    let n1 = arena.add_node("n1");
    let n2 = arena.add_node("n2");
    let n3 = arena.add_node("n3");

    assert_eq!(sort_nodes(&arena, &[n2, n3, n1]), vec![n1, n2, n3]);
    assert_eq!(sort_nodes(&arena, &[n3, n1, n2]), vec![n1, n2, n3]);
    assert_eq!(sort_nodes(&arena, &[n1, n2, n3]), vec![n1, n2, n3]);
}

#[test]
fn graph_without_boundaries_is_empty() {
    let f = sequential();
    let graph = Graph::new(&f.arena, vec![], vec![]).expect("graph");
    assert!(listup_nodes(&f.arena, &graph).is_empty());
    assert!(search_sub_structure(&f.arena, &graph, &[Query::from(NodeType::Node)]).is_empty());
}

struct Diamond {
    arena: NodeArena,
    graph: Graph,
    n: [NodeId; 6],
}

///     +-2-3-4-5-+
///   1-+         +-6-
///     +---------+
fn diamond() -> Diamond {
    let mut arena = NodeArena::new();
    let n: [NodeId; 6] = std::array::from_fn(|idx| arena.add_node(format!("n{}", idx + 1)));
    let [n1, n2, n3, n4, n5, n6] = n;
    for (from, to) in [(n1, n2), (n2, n3), (n3, n4), (n4, n5), (n1, n6), (n5, n6)] {
        arena.connect(from, to).expect("edge");
    }
    let graph = Graph::new(&arena, vec![n1, n3], vec![n4, n6]).expect("graph");
    Diamond { arena, graph, n }
}

fn position(result: &[NodeId], node: NodeId) -> usize {
    result
        .iter()
        .position(|candidate| *candidate == node)
        .expect("node in result")
}

#[rstest]
#[case(false, false, &[1, 3, 4, 6])]
#[case(false, true, &[1, 3, 4, 5, 6])]
#[case(true, false, &[1, 2, 3, 4, 6])]
#[case(true, true, &[1, 2, 3, 4, 5, 6])]
fn internal_bound_flags_select_members(
    #[case] ignore_input: bool,
    #[case] ignore_output: bool,
    #[case] expected: &[usize],
) {
    init_logging();
    let d = diamond();
    let options = TraverseOptions::new(ignore_input, ignore_output);
    let result = listup_nodes_with(&d.arena, &d.graph, options);

    let mut members: Vec<usize> = result.iter().map(|id| id.index() + 1).collect();
    members.sort_unstable();
    assert_eq!(members, expected);
    assert_eq!(result.len(), expected.len());

    // every edge inside the member set points forward in the result
    for &from in &result {
        for &to in d.arena[from].nexts() {
            if result.contains(&to) {
                assert!(position(&result, from) < position(&result, to), "{from:?} -> {to:?}");
            }
        }
    }
}

#[test]
fn default_flags_cross_internal_outputs_only() {
    let d = diamond();
    assert_eq!(
        listup_nodes(&d.arena, &d.graph),
        listup_nodes_with(&d.arena, &d.graph, TraverseOptions::new(false, true))
    );
    assert_eq!(listup_nodes(&d.arena, &d.graph).len(), 5);
    assert!(!listup_nodes(&d.arena, &d.graph).contains(&d.n[1]));
}

#[test]
fn dump_lists_member_nodes() {
    let f = sequential();
    let dump = dump_graph(&f.arena, &f.graph);
    assert_eq!(dump.lines().count(), 7);
    assert!(dump.contains("`op2` operator(test)"));
    assert!(dump.contains("`v3` variable[1, 4] order=N,C"));
}
