use std::collections::HashSet;

use graph::{emit_dot, Graph};
use parse::{count_nodes, parse_translation_unit, Node};

const YEAR_C: &str = include_str!("../../parse/tests/fixtures/year.c");

fn node_lines(dot: &str) -> Vec<&str> {
    dot.lines().filter(|l| l.contains("[label=")).collect()
}

fn edge_lines(dot: &str) -> Vec<&str> {
    dot.lines().filter(|l| l.contains(" -> ")).collect()
}

#[test]
fn emitting_twice_is_byte_identical() {
    let tu = parse_translation_unit(YEAR_C).unwrap();
    let a = emit_dot(&tu, "AST");
    let b = emit_dot(&tu, "AST");
    assert_eq!(a, b);
    let again = parse_translation_unit(YEAR_C).unwrap();
    assert_eq!(a, emit_dot(&again, "AST"));
}

#[test]
fn edges_match_parent_child_pairs() {
    let tu = parse_translation_unit(YEAR_C).unwrap();
    let dot = emit_dot(&tu, "AST");
    let total = count_nodes(Node::from(&tu));
    assert_eq!(node_lines(&dot).len(), total);
    // a tree: every node but the root has exactly one parent
    assert_eq!(edge_lines(&dot).len(), total - 1);
    let g = Graph::build("AST", Node::from(&tu));
    assert_eq!(g.edge_count(), total - 1);
}

#[test]
fn node_ids_are_unique_and_sequential() {
    let tu = parse_translation_unit(YEAR_C).unwrap();
    let dot = emit_dot(&tu, "AST");
    let ids: Vec<_> = node_lines(&dot)
        .iter()
        .map(|l| l.trim().split_whitespace().next().unwrap().to_string())
        .collect();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(id, &format!("n{}", i));
    }
}

#[test]
fn every_child_is_declared_before_edges_point_back() {
    let tu = parse_translation_unit("int f(int a) { if (a) return 1; return a * 2; }").unwrap();
    let g = Graph::build("AST", Node::from(&tu));
    for n in &g.nodes {
        for &c in &n.children {
            // pre-order: children come after their parent
            assert!(c > n.id);
        }
        // siblings keep source order
        assert!(n.children.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn precedence_shows_in_edges() {
    let tu = parse_translation_unit("int v = 1+2*3;").unwrap();
    let g = Graph::build("AST", Node::from(&tu));
    let labels: Vec<_> = g.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "FileAST",
            "Decl: v",
            "TypeDecl: v",
            "IdentifierType: int",
            "BinaryOp: +",
            "Constant: 1",
            "BinaryOp: *",
            "Constant: 2",
            "Constant: 3",
        ]
    );
    let plus = &g.nodes[4];
    assert_eq!(plus.children, [5, 6]);
    assert_eq!(g.nodes[6].children, [7, 8]);
}

#[test]
fn string_constants_are_escaped() {
    let tu = parse_translation_unit(r#"char *s = "say \"hi\"\n";"#).unwrap();
    let dot = emit_dot(&tu, "AST");
    assert!(dot.contains(r#"[label="Constant: \"say \\\"hi\\\"\\n\""];"#), "{}", dot);
}

#[test]
fn enumerator_labels_carry_values() {
    let tu = parse_translation_unit("enum suit { club = 0, diamonds = 10, hearts = 20, spades = 3 };").unwrap();
    let dot = emit_dot(&tu, "AST");
    for want in ["Enum: suit", "Enumerator: club = 0", "Enumerator: diamonds = 10", "Enumerator: spades = 3"] {
        assert!(dot.contains(&format!("[label=\"{}\"]", want)), "missing {} in\n{}", want, dot);
    }
}

#[test]
fn graph_name_is_quoted_when_needed() {
    let tu = parse_translation_unit("int x;").unwrap();
    assert!(emit_dot(&tu, "year.c").starts_with("digraph \"year.c\" {\n"));
    assert!(emit_dot(&tu, "year_c").starts_with("digraph year_c {\n"));
}

#[test]
fn display_matches_render() {
    let tu = parse_translation_unit("int main(void) { return 0; }").unwrap();
    let g = Graph::build("AST", Node::from(&tu));
    let mut rendered = String::new();
    g.render(&mut rendered).unwrap();
    assert_eq!(g.to_string(), rendered);
    assert!(rendered.ends_with("}\n"));
}

#[test]
fn pragmas_become_leaf_nodes() {
    let src = "#pragma pack(1)\nstruct s { char c; int i; };\nvoid f(void) {\n#pragma omp parallel\n  ;\n}\n";
    let tu = parse_translation_unit(src).unwrap();
    let dot = emit_dot(&tu, "AST");
    assert!(dot.contains("n1 [label=\"Pragma: pack(1)\"];"), "{}", dot);
    assert!(dot.contains("[label=\"Pragma: omp parallel\"];"), "{}", dot);
    assert_eq!(edge_lines(&dot).len(), node_lines(&dot).len() - 1);

    let g = Graph::build("AST", Node::from(&tu));
    for n in g.nodes.iter().filter(|n| n.label.starts_with("Pragma")) {
        assert!(n.children.is_empty());
    }
}
